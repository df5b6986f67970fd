use serde::{Deserialize, Serialize};
use validator::Validate;

/// Nueva reseña; queda pendiente de aprobación
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NewReviewRequest {
    #[validate(range(min = 1, max = 5))]
    pub rating: u8,
    #[validate(length(max = 1000))]
    pub comment: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModerateReviewRequest {
    pub approved: bool,
}
