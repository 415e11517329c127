// src/lib.rs
// Main library module declarations

pub mod config;
pub mod domain;
pub mod profile;
pub mod scenario;
pub mod valuation;
