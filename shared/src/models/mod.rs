//! Domain models for the Glass Rental Management Platform

mod customer;
mod glassware;
mod order;
mod report;
mod stock;

pub use customer::*;
pub use glassware::*;
pub use order::*;
pub use report::*;
pub use stock::*;
