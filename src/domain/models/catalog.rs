//! Product catalog with an optional selection for the preview modal

use std::cell::RefCell;
use std::rc::Rc;

use crate::broker::EventBroker;
use crate::domain::events::{ModelChange, ShopEvent};
use crate::domain::models::Product;
use crate::Result;

pub struct Catalog {
    broker: Rc<EventBroker<ShopEvent>>,
    items: RefCell<Vec<Product>>,
    selected: RefCell<Option<Product>>,
}

impl Catalog {
    pub fn new(broker: Rc<EventBroker<ShopEvent>>) -> Self {
        Self { broker, items: RefCell::new(Vec::new()), selected: RefCell::new(None) }
    }

    pub fn items(&self) -> Vec<Product> { self.items.borrow().clone() }
    pub fn len(&self) -> usize { self.items.borrow().len() }
    pub fn is_empty(&self) -> bool { self.items.borrow().is_empty() }
    pub fn selected(&self) -> Option<Product> { self.selected.borrow().clone() }

    /// Replaces the whole sequence. A selection survives only if its id is
    /// still present; otherwise it is dropped and `product:deselect` follows
    /// `items:changed`.
    pub fn replace_all(&self, items: Vec<Product>) -> Result<()> {
        let dropped = {
            let mut selected = self.selected.borrow_mut();
            match selected.as_ref().map(|p| p.id.clone()) {
                Some(id) => match items.iter().find(|p| p.id == id) {
                    Some(fresh) => {
                        *selected = Some(fresh.clone());
                        false
                    }
                    None => {
                        *selected = None;
                        true
                    }
                },
                None => false,
            }
        };
        *self.items.borrow_mut() = items.clone();
        tracing::debug!(count = items.len(), dropped_selection = dropped, "catalog replaced");
        self.broker.emit(&ModelChange::ItemsChanged { items }.into())?;
        if dropped {
            self.broker.emit(&ModelChange::ProductDeselect.into())?;
        }
        Ok(())
    }

    pub fn select_by_id(&self, id: &str) -> Result<bool> {
        let Some(item) = self.find_by_id(id) else {
            tracing::warn!(id, "selected product is not in the catalog");
            return Ok(false);
        };
        *self.selected.borrow_mut() = Some(item.clone());
        self.broker.emit(&ModelChange::ProductSelect { item }.into())?;
        Ok(true)
    }

    pub fn clear_selection(&self) -> Result<()> {
        self.selected.borrow_mut().take();
        self.broker.emit(&ModelChange::ProductDeselect.into())
    }

    pub fn find_by_id(&self, id: &str) -> Option<Product> {
        self.items.borrow().iter().find(|p| p.id == id).cloned()
    }

    pub fn is_purchasable(&self, item: &Product) -> bool { item.is_purchasable() }
}
