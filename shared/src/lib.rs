//! Shared types and models for the Glass Rental Management Platform
//!
//! This crate contains the domain entities, derived-field calculations and
//! validation rules shared between the backend and the browser (via WASM).

pub mod models;
pub mod types;
pub mod validation;

pub use models::*;
pub use types::*;
pub use validation::*;
