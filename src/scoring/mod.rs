pub mod config;
pub mod engine;
pub mod validation;

pub use config::*;
pub use engine::{compute_points, evaluate_tip, PointsBreakdown, TipEvaluation};
pub use validation::{validate_settings, validate_tips};
