//! HTTP implementation of the backend traits.

use super::{AddressBackend, CartBackend, CatalogBackend, OrderBackend};
use crate::cart::Cart;
use crate::catalog::{
    normalize_brands, normalize_categories, normalize_product, normalize_products, Brand,
    Category, Listing, Page, Product, ProductQuery,
};
use crate::checkout::{Address, Order, OrderConfirmation, OrderRequest};
use crate::ids::{LineItemId, OrderId, ProductId};
use crate::CommerceError;
use async_trait::async_trait;
use mart_data::{ClientRequestBuilder, Credentials, FetchClient, Response, TimeoutConfig};
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, warn};

/// Connection settings for [`ApiClient`].
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// e.g. `https://api.example.in/api`
    pub base_url: String,
    pub timeout: Duration,
    pub connect_timeout: Duration,
    /// Cart calls get a longer budget than everything else.
    pub cart_timeout: Duration,
}

impl ApiConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: Duration::from_secs(10),
            connect_timeout: Duration::from_secs(5),
            cart_timeout: ApiClient::DEFAULT_CART_TIMEOUT,
        }
    }
}

/// The storefront REST API.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: FetchClient,
    cart_timeout: Duration,
}

impl ApiClient {
    pub const DEFAULT_CART_TIMEOUT: Duration = Duration::from_secs(20);

    pub fn new(http: FetchClient) -> Self {
        Self {
            http,
            cart_timeout: Self::DEFAULT_CART_TIMEOUT,
        }
    }

    pub fn from_config(config: &ApiConfig, credentials: Credentials) -> Result<Self, CommerceError> {
        let http = FetchClient::new(TimeoutConfig::new(config.connect_timeout, config.timeout))?
            .with_base_url(config.base_url.clone())
            .with_credentials(credentials);
        Ok(Self::new(http).with_cart_timeout(config.cart_timeout))
    }

    pub fn with_cart_timeout(mut self, timeout: Duration) -> Self {
        self.cart_timeout = timeout;
        self
    }

    pub fn credentials(&self) -> &Credentials {
        self.http.credentials()
    }

    async fn send_json(builder: ClientRequestBuilder<'_>) -> Result<Value, CommerceError> {
        let response = builder.send().await?.error_for_status()?;
        body_json(&response)
    }

    async fn cart_call(&self, builder: ClientRequestBuilder<'_>) -> Result<Cart, CommerceError> {
        let body = Self::send_json(builder.timeout(self.cart_timeout)).await?;
        Cart::from_response(body)
    }
}

fn body_json(response: &Response) -> Result<Value, CommerceError> {
    if response.is_empty() {
        return Ok(Value::Null);
    }
    Ok(response.json::<Value>()?)
}

/// A list body that may be a bare array or a paginated envelope.
fn list_of<T>(
    body: Value,
    what: &'static str,
    mut parse: impl FnMut(Value) -> Result<T, CommerceError>,
) -> Result<Vec<T>, CommerceError> {
    if body.is_null() {
        return Ok(Vec::new());
    }
    let listing: Listing<Value> = serde_json::from_value(body)?;
    Ok(listing
        .into_page(|item| {
            parse(item)
                .inspect_err(|e| warn!(error = %e, what, "skipping malformed entry"))
                .ok()
        })
        .into_items())
}

#[async_trait]
impl CartBackend for ApiClient {
    async fn fetch_cart(&self) -> Result<Cart, CommerceError> {
        let response = self.http.get("/cart/").timeout(self.cart_timeout).send().await?;
        if response.status == 404 {
            debug!("no server cart yet");
            return Ok(Cart::empty());
        }
        Cart::from_response(body_json(&response.error_for_status()?)?)
    }

    async fn add_item(&self, product_id: &ProductId, quantity: u32) -> Result<Cart, CommerceError> {
        let body = json!({ "product_id": product_id, "quantity": quantity });
        self.cart_call(self.http.post("/cart/add/").json(&body)?).await
    }

    async fn update_item(&self, line_item_id: &LineItemId, quantity: u32) -> Result<Cart, CommerceError> {
        let url = format!("/cart/item/{}/", line_item_id);
        self.cart_call(self.http.put(url).json(&json!({ "quantity": quantity }))?)
            .await
    }

    async fn remove_item(&self, line_item_id: &LineItemId) -> Result<Cart, CommerceError> {
        self.cart_call(self.http.delete(format!("/cart/remove/{}/", line_item_id)))
            .await
    }

    async fn clear(&self) -> Result<Cart, CommerceError> {
        self.cart_call(self.http.delete("/cart/clear/")).await
    }
}

#[async_trait]
impl CatalogBackend for ApiClient {
    async fn products(&self, query: &ProductQuery) -> Result<Page<Product>, CommerceError> {
        let mut builder = self.http.get("/products/").anonymous();
        for (key, value) in query.to_params() {
            builder = builder.query(key, value);
        }
        normalize_products(Self::send_json(builder).await?)
    }

    async fn product(&self, id: &ProductId) -> Result<Product, CommerceError> {
        let response = self
            .http
            .get(format!("/products/{}/", id))
            .anonymous()
            .send()
            .await?;
        if response.status == 404 {
            return Err(CommerceError::ProductNotFound(id.to_string()));
        }
        normalize_product(body_json(&response.error_for_status()?)?)
    }

    async fn categories(&self) -> Result<Vec<Category>, CommerceError> {
        normalize_categories(Self::send_json(self.http.get("/categories/").anonymous()).await?)
    }

    async fn brands(&self) -> Result<Vec<Brand>, CommerceError> {
        normalize_brands(Self::send_json(self.http.get("/brands/").anonymous()).await?)
    }
}

#[async_trait]
impl OrderBackend for ApiClient {
    async fn place_order(&self, request: &OrderRequest) -> Result<OrderConfirmation, CommerceError> {
        let body = Self::send_json(self.http.post("/orders/").json(request)?).await?;
        OrderConfirmation::from_response(&body)
    }

    async fn orders(&self) -> Result<Vec<Order>, CommerceError> {
        let body = Self::send_json(self.http.get("/orders/")).await?;
        list_of(body, "order", |v| Order::from_value(&v))
    }

    async fn order(&self, id: &OrderId) -> Result<Order, CommerceError> {
        let body = Self::send_json(self.http.get(format!("/orders/{}/", id))).await?;
        Order::from_value(&body)
    }
}

#[async_trait]
impl AddressBackend for ApiClient {
    async fn addresses(&self) -> Result<Vec<Address>, CommerceError> {
        let body = Self::send_json(self.http.get("/user/addresses/")).await?;
        list_of(body, "address", |v| Ok(serde_json::from_value(v)?))
    }

    async fn add_address(&self, address: &Address) -> Result<Address, CommerceError> {
        let body = Self::send_json(self.http.post("/user/addresses/").json(address)?).await?;
        Ok(serde_json::from_value(body)?)
    }
}
