//! Storefront domain: models, value objects and events
pub mod events;
pub mod models;
pub mod value_objects;
