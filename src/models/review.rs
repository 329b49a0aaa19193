// src/models/review.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

/// Visitor review; hidden until a moderator approves it
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Review {
    pub id: Uuid,
    pub listing_kind: String,
    pub listing_id: Uuid,
    pub author: String,
    pub rating: i32,
    pub text: Option<String>,
    pub is_approved: bool,
    pub created_at: DateTime<Utc>,
}

/// Request to create a new review
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateReviewRequest {
    #[validate(length(min = 1, max = 80))]
    pub author: String,
    #[validate(range(min = 1, max = 5))]
    pub rating: i32,
    #[validate(length(max = 2000))]
    #[serde(default)]
    pub text: Option<String>,
}

/// Review response DTO exposed via API
#[derive(Debug, Clone, Serialize)]
pub struct ReviewResponse {
    pub id: Uuid,
    pub author: String,
    pub rating: i32,
    pub text: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Review {
    pub fn to_response(&self) -> ReviewResponse {
        ReviewResponse {
            id: self.id,
            author: self.author.clone(),
            rating: self.rating,
            text: self.text.clone(),
            created_at: self.created_at,
        }
    }
}

/// Mean rating of a set of reviews, None when empty
pub fn average_rating(reviews: &[Review]) -> Option<f64> {
    if reviews.is_empty() {
        return None;
    }
    let sum: i64 = reviews.iter().map(|r| r.rating as i64).sum();
    Some(((sum as f64 / reviews.len() as f64) * 10.0).round() / 10.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    fn review(rating: i32) -> Review {
        Review {
            id: Uuid::new_v4(),
            listing_kind: "profile".to_string(),
            listing_id: Uuid::new_v4(),
            author: "anon".to_string(),
            rating,
            text: None,
            is_approved: true,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_average_rating() {
        assert_eq!(average_rating(&[]), None);
        assert_eq!(average_rating(&[review(5), review(4), review(4)]), Some(4.3));
    }

    #[test]
    fn test_rating_range_validation() {
        let req = CreateReviewRequest {
            author: "A".to_string(),
            rating: 6,
            text: None,
        };
        assert!(req.validate().is_err());

        let req = CreateReviewRequest {
            author: "A".to_string(),
            rating: 5,
            text: Some("Great".to_string()),
        };
        assert!(req.validate().is_ok());
    }
}
