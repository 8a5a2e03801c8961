//! Shared fixtures for integration tests

#![allow(dead_code)]

use std::sync::Arc;

use chrono::NaiveDate;
use uuid::Uuid;

use glass_rental_backend::config::Config;
use glass_rental_backend::services::{
    CustomerService, GlasswareService, OrderService, ReportingService, StockService,
};
use glass_rental_backend::store::{MemoryStore, Store};
use shared::models::{Customer, Glassware, NewCustomer, NewGlassware, NewOrder, OrderStatus};

pub const JWT_SECRET: &str = "integration-test-secret-key";

pub struct TestApp {
    pub store: Arc<dyn Store>,
    pub config: Config,
    pub customers: CustomerService,
    pub glassware: GlasswareService,
    pub stock: StockService,
    pub orders: OrderService,
    pub reporting: ReportingService,
}

pub fn test_app() -> TestApp {
    let store: Arc<dyn Store> = Arc::new(MemoryStore::new());
    let config = Config::in_memory(JWT_SECRET);
    TestApp {
        customers: CustomerService::new(store.clone()),
        glassware: GlasswareService::new(store.clone(), &config.stock),
        stock: StockService::new(store.clone(), &config.stock),
        orders: OrderService::new(store.clone(), &config.stock),
        reporting: ReportingService::new(store.clone()),
        store,
        config,
    }
}

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

pub fn new_customer(name: &str, email: &str) -> NewCustomer {
    NewCustomer {
        name: name.to_string(),
        email: email.to_string(),
        phone: "+250 788 123 456".to_string(),
        event_date: date(2024, 2, 14),
        event_location: "Kigali Serena Hotel".to_string(),
        event_type: "Wedding".to_string(),
    }
}

pub async fn seed_customer(app: &TestApp, name: &str, email: &str) -> Customer {
    app.customers.create(new_customer(name, email)).await.unwrap()
}

pub async fn seed_glassware(
    app: &TestApp,
    catalog_type: &str,
    quantity: i32,
    price: i64,
) -> Glassware {
    app.glassware
        .create(NewGlassware {
            glassware_type: catalog_type.to_string(),
            description: format!("{} for events", catalog_type),
            quantity_available: quantity,
            price_per_unit: price,
            low_stock_threshold: Some(10),
        })
        .await
        .unwrap()
}

pub fn new_order(customer_id: Uuid, glassware_id: Uuid, quantity: i32) -> NewOrder {
    NewOrder {
        customer_id,
        glassware_id,
        quantity,
        order_date: date(2024, 2, 10),
        delivery_date: date(2024, 2, 14),
        status: OrderStatus::Pending,
    }
}

pub async fn current_stock(app: &TestApp, glassware_id: Uuid) -> i32 {
    app.store
        .get_stock_row(glassware_id)
        .await
        .unwrap()
        .current_stock
}
