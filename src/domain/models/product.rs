//! Product and order payloads exchanged with the shop backend

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::models::CustomerData;
use crate::domain::value_objects::Payment;

/// A catalog entry. `price: None` marks a priceless item that is shown but
/// never sold.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub category: String,
    pub price: Option<Decimal>,
}

impl Product {
    pub fn is_purchasable(&self) -> bool { self.price.is_some() }
}

/// Order body posted at checkout, assembled from the customer and basket.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRequest {
    pub payment: Payment,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub total: Decimal,
    pub items: Vec<String>,
}

impl OrderRequest {
    /// Returns `None` while any customer field is still missing.
    pub fn assemble(customer: &CustomerData, total: Decimal, items: Vec<String>) -> Option<Self> {
        Some(Self {
            payment: customer.payment?,
            email: customer.email.clone()?,
            phone: customer.phone.clone()?,
            address: customer.address.clone()?,
            total,
            items,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    #[test]
    fn test_product_from_feed() {
        let json = r#"{"id":"b","title":"Mask","description":"d","image":"/m.svg","category":"other","price":null}"#;
        let p: Product = serde_json::from_str(json).unwrap();
        assert!(!p.is_purchasable());
        let p: Product = serde_json::from_str(r#"{"id":"a","title":"Pen","price":750}"#).unwrap();
        assert_eq!(p.price, Some(Decimal::new(750, 0)));
    }
    #[test]
    fn test_assemble_requires_all_fields() {
        let mut data = CustomerData { payment: Some(Payment::Card), email: Some("e@x.com".into()), phone: Some("1".into()), address: None };
        assert!(OrderRequest::assemble(&data, Decimal::ZERO, vec![]).is_none());
        data.address = Some("x".into());
        let order = OrderRequest::assemble(&data, Decimal::new(100, 0), vec!["a".into()]).unwrap();
        let body = serde_json::to_value(&order).unwrap();
        assert_eq!(body["payment"], "card");
        assert_eq!(body["total"], 100.0);
        assert_eq!(body["items"][0], "a");
    }
}
