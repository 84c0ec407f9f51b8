//! Shop backend gateway
//!
//! The presenter only ever needs two calls: load the catalog and submit an
//! order. [`HttpShopApi`] talks JSON over HTTP; tests swap in their own
//! [`ShopGateway`].

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::domain::models::{OrderRequest, Product};
use crate::{Result, ShopError};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogResponse {
    pub total: u32,
    pub items: Vec<Product>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderResponse {
    pub id: String,
    pub total: Decimal,
}

/// Error body the backend sends with non-2xx responses.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

#[async_trait(?Send)]
pub trait ShopGateway {
    async fn fetch_catalog(&self) -> Result<CatalogResponse>;
    async fn submit_order(&self, order: &OrderRequest) -> Result<OrderResponse>;
}

#[derive(Clone, Debug)]
pub struct HttpShopApi {
    http: Client,
    base_url: String,
}

impl HttpShopApi {
    pub fn new(base_url: &Url, timeout: Duration) -> Result<Self> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self { http, base_url: base_url.as_str().trim_end_matches('/').to_string() })
    }

    fn endpoint(&self, path: &str) -> String { format!("{}{path}", self.base_url) }

    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            let message = serde_json::from_str::<ErrorBody>(&body)
                .map(|b| b.error)
                .unwrap_or_else(|_| status.canonical_reason().unwrap_or("request failed").to_string());
            return Err(ShopError::Api { status: status.as_u16(), message });
        }
        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait(?Send)]
impl ShopGateway for HttpShopApi {
    async fn fetch_catalog(&self) -> Result<CatalogResponse> {
        let response = self.http.get(self.endpoint("/product")).send().await?;
        Self::decode(response).await
    }

    async fn submit_order(&self, order: &OrderRequest) -> Result<OrderResponse> {
        let response = self.http.post(self.endpoint("/order")).json(order).send().await?;
        Self::decode(response).await
    }
}
