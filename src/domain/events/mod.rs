//! Storefront events
//!
//! Views raise [`ViewIntent`]s naming what the user did; models raise
//! [`ModelChange`]s after every mutation. Both travel through the broker as
//! a [`ShopEvent`] and are addressed by their wire name.
use crate::domain::models::{CustomerData, Product};
use crate::domain::value_objects::Payment;

#[derive(Clone, Debug, PartialEq)]
pub enum ShopEvent {
    Intent(ViewIntent),
    Change(ModelChange),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ViewIntent {
    CardSelect { id: String },
    CardAction { id: String },
    BasketOpen,
    BasketRemove { id: String },
    OrderOpen,
    OrderSubmit,
    PaymentChange { payment: Payment },
    AddressChange { address: String },
    ContactsSubmit,
    EmailChange { email: String },
    PhoneChange { phone: String },
    SuccessClose,
    ModalClose,
}

#[derive(Clone, Debug, PartialEq)]
pub enum ModelChange {
    ItemsChanged { items: Vec<Product> },
    ProductSelect { item: Product },
    ProductDeselect,
    BasketChanged,
    CustomerChanged { data: CustomerData },
}

/// Anything the broker can route by name.
pub trait NamedEvent {
    fn name(&self) -> &'static str;
}

impl NamedEvent for ShopEvent {
    fn name(&self) -> &'static str {
        match self {
            Self::Intent(intent) => intent.name(),
            Self::Change(change) => change.name(),
        }
    }
}

impl ViewIntent {
    pub fn name(&self) -> &'static str {
        match self {
            Self::CardSelect { .. } => "card:select",
            Self::CardAction { .. } => "card:action",
            Self::BasketOpen => "basket:open",
            Self::BasketRemove { .. } => "basket:remove",
            Self::OrderOpen => "order:open",
            Self::OrderSubmit => "order:submit",
            Self::PaymentChange { .. } => "order.payment:change",
            Self::AddressChange { .. } => "order.address:change",
            Self::ContactsSubmit => "contacts:submit",
            Self::EmailChange { .. } => "contacts.email:change",
            Self::PhoneChange { .. } => "contacts.phone:change",
            Self::SuccessClose => "success:close",
            Self::ModalClose => "modal:close",
        }
    }
}

impl ModelChange {
    pub fn name(&self) -> &'static str {
        match self {
            Self::ItemsChanged { .. } => "items:changed",
            Self::ProductSelect { .. } => "product:select",
            Self::ProductDeselect => "product:deselect",
            Self::BasketChanged => "basket:changed",
            Self::CustomerChanged { .. } => "customer:changed",
        }
    }
}

impl From<ViewIntent> for ShopEvent {
    fn from(intent: ViewIntent) -> Self { Self::Intent(intent) }
}

impl From<ModelChange> for ShopEvent {
    fn from(change: ModelChange) -> Self { Self::Change(change) }
}
