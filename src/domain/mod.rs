// src/domain/mod.rs
pub mod errors;
pub mod models;

// Re-export common types for convenience
pub use errors::{AppError, AppResult, ValuationError, ValuationResult};
pub use models::{
    CapitalStructure, DcfResult, FcfProjection, MarginPath, MarginSchedule,
    ProjectionAssumptions, ScenarioName, ScenarioResult, ScenarioSpec, Segment, ShareChange,
    ShareCountPath, ValuationContext,
};
