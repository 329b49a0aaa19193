// src/services/text.rs
// PURPOSE: Escaping and truncation shared by the renderers

/// Escape text for HTML element content and attribute values
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

/// Escape text for XML (sitemap, SVG)
pub fn escape_xml(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            // Control characters are not allowed in XML 1.0
            c if (c as u32) < 0x20 && !matches!(c, '\t' | '\n' | '\r') => {}
            other => out.push(other),
        }
    }
    out
}

/// Truncate to at most `max_chars`, cutting on a word boundary
/// DOCUMENTATION: Trailing punctuation left by the cut is removed.
/// A single word longer than the limit is hard-cut.
pub fn truncate_words(input: &str, max_chars: usize) -> String {
    let trimmed = input.trim();
    if trimmed.chars().count() <= max_chars {
        return trimmed.to_string();
    }

    let hard_cut: String = trimmed.chars().take(max_chars).collect();
    let next_char = trimmed.chars().nth(max_chars);

    let cut = if next_char.map_or(false, char::is_whitespace) {
        hard_cut.as_str()
    } else {
        match hard_cut.rfind(char::is_whitespace) {
            Some(idx) if idx > 0 => &hard_cut[..idx],
            _ => hard_cut.as_str(),
        }
    };

    cut.trim_end_matches(|c: char| c.is_whitespace() || TRAILING_PUNCTUATION.contains(c))
        .to_string()
}

/// Stripped from the end of a cut; closing brackets and quotes stay balanced
const TRAILING_PUNCTUATION: &str = ",;:.!?-–—…(/&|";

/// Truncate to `max_chars` characters, appending an ellipsis when cut
pub fn ellipsize(input: &str, max_chars: usize) -> String {
    let trimmed = input.trim();
    if trimmed.chars().count() <= max_chars {
        return trimmed.to_string();
    }
    let kept: String = trimmed.chars().take(max_chars.saturating_sub(1)).collect();
    format!("{}…", kept.trim_end())
}

/// Capitalise the first letter of each dash/space separated word
pub fn title_case(input: &str) -> String {
    input
        .split(|c: char| c == '-' || c.is_whitespace())
        .filter(|w| !w.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<b>"Tom" & 'Jerry'</b>"#),
            "&lt;b&gt;&quot;Tom&quot; &amp; &#39;Jerry&#39;&lt;/b&gt;"
        );
    }

    #[test]
    fn test_escape_xml_drops_control_chars() {
        assert_eq!(escape_xml("a\u{0007}b & c"), "ab &amp; c");
    }

    #[test]
    fn test_truncate_words() {
        assert_eq!(truncate_words("short text", 60), "short text");
        assert_eq!(truncate_words("one two three four", 9), "one two");
        assert_eq!(truncate_words("one two, three", 8), "one two");
        assert_eq!(truncate_words("abcdefghij", 4), "abcd");
        assert_eq!(truncate_words("one two three", 7), "one two");
        assert_eq!(truncate_words("Relax. Unwind today", 10), "Relax");
        assert_eq!(truncate_words("Open now! Book today", 12), "Open now");
        assert_eq!(truncate_words("Spa near you? Call us", 15), "Spa near you");
        assert_eq!(truncate_words("Great spa ( Madrid centre", 12), "Great spa");
        assert_eq!(truncate_words("Done.", 60), "Done.");
    }

    #[test]
    fn test_ellipsize() {
        assert_eq!(ellipsize("abc", 5), "abc");
        assert_eq!(ellipsize("abcdefgh", 5), "abcd…");
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("massage-parlour"), "Massage Parlour");
        assert_eq!(title_case("independent"), "Independent");
    }
}
