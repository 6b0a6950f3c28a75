use thiserror::Error;

use crate::ir::Aesthetic;

#[derive(Error, Debug)]
pub enum LegendError {
    #[error("Unknown aesthetic '{0}' (expected one of color, fill, shape, size, linetype, alpha)")]
    UnknownAesthetic(String),

    #[error("Unsupported scale type '{0}' (expected 'discrete' or 'continuous')")]
    UnsupportedScaleKind(String),

    #[error("Invalid {aesthetic} value '{value}'")]
    InvalidVisualValue { aesthetic: Aesthetic, value: String },

    #[error("Legend group for column '{0}' has no labels")]
    EmptyGroup(String),

    #[error("Aesthetic '{0}' has no standalone legend key")]
    NoStandaloneKey(Aesthetic),

    #[error("Invalid legend document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Surface rejected overlay: {0}")]
    Surface(String),
}
