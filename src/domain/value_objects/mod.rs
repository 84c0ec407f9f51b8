//! Value Objects for the storefront

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Payment method chosen on the order step
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Payment {
    Card,
    Cash,
}

impl Payment {
    pub const ALL: [Payment; 2] = [Payment::Card, Payment::Cash];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Card => "card",
            Self::Cash => "cash",
        }
    }
}

impl fmt::Display for Payment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{}", self.as_str()) }
}

impl FromStr for Payment {
    type Err = PaymentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "card" => Ok(Self::Card),
            "cash" => Ok(Self::Cash),
            other => Err(PaymentError::Unknown(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)] pub enum PaymentError { Unknown(String) }
impl std::error::Error for PaymentError {}
impl fmt::Display for PaymentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self { Self::Unknown(v) => write!(f, "Unknown payment method: {v}") }
    }
}

/// Customer field subject to checkout validation
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CustomerField {
    Payment,
    Email,
    Phone,
    Address,
}

impl CustomerField {
    /// Fields collected on the first checkout step.
    pub const ORDER_STEP: [CustomerField; 2] = [CustomerField::Payment, CustomerField::Address];
    /// Fields collected on the contacts step.
    pub const CONTACTS_STEP: [CustomerField; 2] = [CustomerField::Email, CustomerField::Phone];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Payment => "payment",
            Self::Email => "email",
            Self::Phone => "phone",
            Self::Address => "address",
        }
    }
}

impl FromStr for CustomerField {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "payment" => Ok(Self::Payment),
            "email" => Ok(Self::Email),
            "phone" => Ok(Self::Phone),
            "address" => Ok(Self::Address),
            _ => Err(()),
        }
    }
}

/// Human-readable validation messages keyed by field, in field order.
pub type FieldErrors = BTreeMap<CustomerField, String>;

/// Keeps only the errors for `fields`.
pub fn restrict(errors: &FieldErrors, fields: &[CustomerField]) -> FieldErrors {
    errors
        .iter()
        .filter(|(field, _)| fields.contains(field))
        .map(|(field, message)| (*field, message.clone()))
        .collect()
}

/// Joins messages into the single line shown under a form.
pub fn summary(errors: &FieldErrors) -> String {
    errors.values().map(String::as_str).collect::<Vec<_>>().join(", ")
}
