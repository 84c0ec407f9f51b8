//! Basket model

use std::cell::RefCell;
use std::rc::Rc;

use rust_decimal::Decimal;

use crate::broker::EventBroker;
use crate::domain::events::{ModelChange, ShopEvent};
use crate::domain::models::Product;
use crate::Result;

/// Products keyed by id, kept in insertion order. The basket stores what it
/// is given; keeping priceless items out is the caller's job.
pub struct Basket {
    broker: Rc<EventBroker<ShopEvent>>,
    items: RefCell<Vec<Product>>,
}

impl Basket {
    pub fn new(broker: Rc<EventBroker<ShopEvent>>) -> Self {
        Self { broker, items: RefCell::new(Vec::new()) }
    }

    pub fn items(&self) -> Vec<Product> { self.items.borrow().clone() }
    pub fn count(&self) -> usize { self.items.borrow().len() }
    pub fn is_empty(&self) -> bool { self.items.borrow().is_empty() }

    pub fn contains(&self, id: &str) -> bool { self.items.borrow().iter().any(|p| p.id == id) }

    pub fn total(&self) -> Decimal {
        self.items.borrow().iter().fold(Decimal::ZERO, |acc, p| acc + p.price.unwrap_or(Decimal::ZERO))
    }

    pub fn item_ids(&self) -> Vec<String> { self.items.borrow().iter().map(|p| p.id.clone()).collect() }

    /// Returns `false` without emitting when the id is already present.
    pub fn add(&self, item: Product) -> Result<bool> {
        if self.contains(&item.id) {
            return Ok(false);
        }
        tracing::debug!(id = %item.id, "basket add");
        self.items.borrow_mut().push(item);
        self.changed()?;
        Ok(true)
    }

    pub fn remove(&self, id: &str) -> Result<bool> {
        let removed = {
            let mut items = self.items.borrow_mut();
            let before = items.len();
            items.retain(|p| p.id != id);
            items.len() != before
        };
        if removed {
            tracing::debug!(id, "basket remove");
            self.changed()?;
        }
        Ok(removed)
    }

    pub fn clear(&self) -> Result<()> {
        self.items.borrow_mut().clear();
        self.changed()
    }

    fn changed(&self) -> Result<()> { self.broker.emit(&ModelChange::BasketChanged.into()) }
}
