//! Customer model: contact and delivery details filled in across checkout

use std::cell::RefCell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::broker::EventBroker;
use crate::domain::events::{ModelChange, ShopEvent};
use crate::domain::value_objects::{CustomerField, FieldErrors, Payment};
use crate::Result;

/// Partial customer record. Also used as the patch passed to
/// [`Customer::update`], where `None` means "leave as is".
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment: Option<Payment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

impl CustomerData {
    pub fn payment(payment: Payment) -> Self { Self { payment: Some(payment), ..Self::default() } }
    pub fn email(email: impl Into<String>) -> Self { Self { email: Some(email.into()), ..Self::default() } }
    pub fn phone(phone: impl Into<String>) -> Self { Self { phone: Some(phone.into()), ..Self::default() } }
    pub fn address(address: impl Into<String>) -> Self { Self { address: Some(address.into()), ..Self::default() } }
}

/// Snapshot with blanks stripped, checked by `validator`.
#[derive(Debug, Validate)]
struct CheckoutForm {
    #[validate(required(message = "Choose a payment method"))]
    payment: Option<Payment>,
    #[validate(required(message = "Enter an email"))]
    email: Option<String>,
    #[validate(required(message = "Enter a phone number"))]
    phone: Option<String>,
    #[validate(required(message = "Enter a delivery address"))]
    address: Option<String>,
}

fn non_blank(value: &Option<String>) -> Option<String> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty()).map(str::to_string)
}

impl From<&CustomerData> for CheckoutForm {
    fn from(data: &CustomerData) -> Self {
        Self {
            payment: data.payment,
            email: non_blank(&data.email),
            phone: non_blank(&data.phone),
            address: non_blank(&data.address),
        }
    }
}

pub struct Customer {
    broker: Rc<EventBroker<ShopEvent>>,
    data: RefCell<CustomerData>,
}

impl Customer {
    pub fn new(broker: Rc<EventBroker<ShopEvent>>) -> Self {
        Self { broker, data: RefCell::new(CustomerData::default()) }
    }

    pub fn get(&self) -> CustomerData { self.data.borrow().clone() }

    /// Merges the fields present in `patch`. Emits `customer:changed` only
    /// when at least one stored value actually changed; returns whether it
    /// did.
    pub fn update(&self, patch: CustomerData) -> Result<bool> {
        let snapshot = {
            let mut data = self.data.borrow_mut();
            let mut changed = false;
            if patch.payment.is_some() && patch.payment != data.payment {
                data.payment = patch.payment;
                changed = true;
            }
            changed |= merge(&mut data.email, patch.email);
            changed |= merge(&mut data.phone, patch.phone);
            changed |= merge(&mut data.address, patch.address);
            changed.then(|| data.clone())
        };
        match snapshot {
            Some(data) => {
                self.broker.emit(&ModelChange::CustomerChanged { data }.into())?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Resets every field. Always emits.
    pub fn clear(&self) -> Result<()> {
        *self.data.borrow_mut() = CustomerData::default();
        self.broker.emit(&ModelChange::CustomerChanged { data: CustomerData::default() }.into())
    }

    /// One message per missing or blank field.
    pub fn validate(&self) -> FieldErrors {
        let form = CheckoutForm::from(&*self.data.borrow());
        match form.validate() {
            Ok(()) => FieldErrors::new(),
            Err(errors) => errors
                .field_errors()
                .into_iter()
                .filter_map(|(name, list)| {
                    let field = name.parse::<CustomerField>().ok()?;
                    let message = list.first()?.message.as_ref()?.to_string();
                    Some((field, message))
                })
                .collect(),
        }
    }

    pub fn has_errors(&self) -> bool { !self.validate().is_empty() }

    pub fn is_filled(&self, field: CustomerField) -> bool { !self.validate().contains_key(&field) }
}

fn merge(slot: &mut Option<String>, incoming: Option<String>) -> bool {
    match incoming {
        Some(value) if slot.as_deref() != Some(value.as_str()) => {
            *slot = Some(value);
            true
        }
        _ => false,
    }
}
