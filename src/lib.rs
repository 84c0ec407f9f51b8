//! OpenSASE Storefront
//!
//! Client-side core of the storefront: product catalog, shopping basket and
//! a two-step checkout, wired together as Model-View-Presenter over a
//! synchronous event broker.
//!
//! ## Features
//! - Catalog loaded from the shop backend
//! - Basket with live header counter and totals
//! - Two-step checkout (payment/address, then contacts) with live validation
//! - Order submission with retry-safe failure handling

pub mod api;
pub mod broker;
pub mod config;
pub mod domain;
pub mod presenter;
pub mod view;

pub use api::{CatalogResponse, HttpShopApi, OrderResponse, ShopGateway};
pub use broker::{EventBroker, EventPattern, SubscriptionId};
pub use config::ShopConfig;
pub use domain::events::{ModelChange, ShopEvent, ViewIntent};
pub use domain::models::{Basket, Catalog, Customer, CustomerData, OrderRequest, Product};
pub use domain::value_objects::{CustomerField, FieldErrors, Payment};
pub use presenter::{ModalState, Presenter};
pub use view::{MemoryScreen, Node, Screen};

use thiserror::Error;

// =============================================================================
// Error Types
// =============================================================================

#[derive(Error, Debug)]
pub enum ShopError {
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Handler failed for {event}: {message}")]
    Handler { event: &'static str, message: String },
}

pub type Result<T> = std::result::Result<T, ShopError>;
