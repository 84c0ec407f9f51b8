//! Domain models
//!
//! Each model owns its state behind interior mutability and emits a
//! [`ModelChange`](crate::domain::events::ModelChange) through the shared
//! broker after every mutation. Borrows are always released before emitting,
//! so handlers may read the model that notified them.
pub mod basket;
pub mod catalog;
pub mod customer;
pub mod product;

pub use basket::Basket;
pub use catalog::Catalog;
pub use customer::{Customer, CustomerData};
pub use product::{OrderRequest, Product};
