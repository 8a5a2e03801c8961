//! Business logic services for the Glass Rental Management Platform

use std::future::Future;

use crate::error::{AppError, AppResult};

pub mod auth;
pub mod customer;
pub mod glassware;
pub mod order;
pub mod reporting;
pub mod stock;

pub use auth::AuthService;
pub use customer::CustomerService;
pub use glassware::GlasswareService;
pub use order::OrderService;
pub use reporting::ReportingService;
pub use stock::StockService;

/// Re-run an operation that lost a compare-and-set race
///
/// Each attempt re-reads and re-validates, so a retry never applies a stale
/// decision. Other errors are returned as they are.
pub(crate) async fn retry_on_conflict<T, F, Fut>(
    operation: &'static str,
    max_attempts: u32,
    mut attempt_once: F,
) -> AppResult<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = AppResult<T>>,
{
    let mut attempt = 1;
    loop {
        match attempt_once().await {
            Err(AppError::Conflict(what)) if attempt < max_attempts => {
                tracing::warn!(operation, attempt, "{} changed concurrently, retrying", what);
                attempt += 1;
            }
            result => return result,
        }
    }
}
