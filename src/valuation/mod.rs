// src/valuation/mod.rs
pub mod discount;
pub mod implied_growth;
pub mod projection;
pub mod shares;
pub mod wacc;

pub use discount::discount;
pub use implied_growth::{implied_growth, ImpliedGrowthInputs, SolverSettings};
pub use projection::{
    margin_glide, project, project_constant_growth, project_direct_growth,
    project_margin_expansion, project_revenue_margin, project_segments,
};
pub use shares::evolve_shares;
pub use wacc::calculate_wacc;
