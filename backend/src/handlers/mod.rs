//! HTTP handlers

pub mod auth;
pub mod customer;
pub mod glassware;
pub mod health;
pub mod order;
pub mod reporting;
pub mod stock;

pub use auth::*;
pub use customer::*;
pub use glassware::*;
pub use health::*;
pub use order::*;
pub use reporting::*;
pub use stock::*;

use serde::Serialize;
use uuid::Uuid;

/// Body returned by cascading deletes
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletedResponse {
    pub id: Uuid,
    pub removed_orders: usize,
}
