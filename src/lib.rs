//! Card Inventory - trading card collection tracker
//!
//! Records purchases, sales and inventory details for a personal card
//! collection in a single SQLite table, served through a small web UI.

pub mod database;
pub mod error;
pub mod models;
pub mod views;
pub mod web;

pub use database::{
    dashboard_summary, delete_item, get_item, init_schema, insert_item, list_items, update_item,
    Store,
};
pub use error::{Error, InventoryError, Result};
pub use models::{
    CardForm, CardInput, DashboardSummary, FieldError, InventoryItem, SearchFilter, SearchForm,
};
