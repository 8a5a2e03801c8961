//! Customer management service

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;
use validator::Validate;

use shared::models::{Customer, CustomerPatch, NewCustomer};
use shared::types::SearchQuery;

use crate::error::{AppResult, StoreResultExt};
use crate::store::Store;

/// Customer service
#[derive(Clone)]
pub struct CustomerService {
    store: Arc<dyn Store>,
}

impl CustomerService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Customers matching the search, newest first
    pub async fn list(&self, query: &SearchQuery) -> AppResult<Vec<Customer>> {
        let customers = self.store.list_customers().await.during("list customers")?;
        Ok(match query.term() {
            Some(term) => customers
                .into_iter()
                .filter(|customer| customer.matches_search(&term))
                .collect(),
            None => customers,
        })
    }

    pub async fn get(&self, id: Uuid) -> AppResult<Customer> {
        self.store.get_customer(id).await.during("get customer")
    }

    pub async fn create(&self, input: NewCustomer) -> AppResult<Customer> {
        input.validate()?;

        let customer = Customer {
            id: Uuid::new_v4(),
            name: input.name.trim().to_string(),
            email: input.email.trim().to_string(),
            phone: input.phone.trim().to_string(),
            event_date: input.event_date,
            event_location: input.event_location.trim().to_string(),
            event_type: input.event_type.trim().to_string(),
            created_at: Utc::now(),
        };

        self.store
            .insert_customer(&customer)
            .await
            .during("insert customer")?;

        tracing::info!(customer_id = %customer.id, "Customer created");
        Ok(customer)
    }

    /// Merge the provided fields; absent fields keep their stored values
    pub async fn update(&self, id: Uuid, patch: CustomerPatch) -> AppResult<Customer> {
        patch.validate()?;
        if patch.is_empty() {
            return self.get(id).await;
        }

        let customer = self
            .store
            .update_customer(id, &patch)
            .await
            .during("update customer")?;

        tracing::info!(customer_id = %id, "Customer updated");
        Ok(customer)
    }

    /// Delete a customer and every order placed for it
    ///
    /// Stock held by the removed orders goes back to its rows. Returns the
    /// number of orders removed.
    pub async fn delete(&self, id: Uuid) -> AppResult<usize> {
        let removed = self
            .store
            .delete_customer(id)
            .await
            .during("delete customer")?;

        tracing::info!(
            customer_id = %id,
            removed_orders = removed.len(),
            "Customer deleted"
        );
        Ok(removed.len())
    }
}
