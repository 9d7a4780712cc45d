//! services/storefront/src/adapters/http.rs
//!
//! This module contains the HTTP adapter, the concrete implementation of the
//! `CatalogService`, `AuthService` and `RemoteCartService` ports. It talks JSON
//! to a DummyJSON-compatible service using `reqwest`.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use storefront_core::domain::{
    CartItemRef, LoginCredentials, Product, ProductPage, RemoteCart, RemoteCartLine, User,
};
use storefront_core::ports::{
    AuthService, CatalogService, PortError, PortResult, RemoteCartService,
};
use tracing::debug;

use crate::config::Config;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An HTTP adapter for the remote catalog, auth and cart endpoints.
#[derive(Clone, Debug)]
pub struct HttpAdapter {
    http: Client,
    base_url: String,
}

impl HttpAdapter {
    /// Builds an adapter with a client honouring the configured timeout.
    pub fn new(config: &Config) -> Result<Self, reqwest::Error> {
        let http = Client::builder().timeout(config.http_timeout).build()?;
        Ok(Self::with_client(&config.api_base, http))
    }

    /// Builds an adapter from an existing client (useful for testing).
    pub fn with_client(base_url: &str, http: Client) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send(&self, request: RequestBuilder, what: &str) -> PortResult<Response> {
        request.send().await.map_err(|e| {
            debug!("{} request did not complete: {}", what, e);
            PortError::Network(format!("{what}: {e}"))
        })
    }
}

/// Maps a non-success status onto the port taxonomy, then decodes the body.
async fn read_json<T: DeserializeOwned>(response: Response, what: &str) -> PortResult<T> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(match status {
            StatusCode::NOT_FOUND => PortError::NotFound(what.to_string()),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => PortError::Unauthorized,
            _ => PortError::Network(format!("{what} failed with status {status}: {body}")),
        });
    }

    response
        .json::<T>()
        .await
        .map_err(|e| PortError::InvalidData(format!("{what}: {e}")))
}

//=========================================================================================
// "Impure" Wire Record Structs
//=========================================================================================

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProductRecord {
    id: u64,
    title: String,
    #[serde(default)]
    description: String,
    price: Decimal,
    #[serde(default)]
    discount_percentage: Decimal,
    #[serde(default)]
    stock: u32,
    #[serde(default)]
    rating: Decimal,
    #[serde(default)]
    category: String,
    #[serde(default)]
    brand: Option<String>,
    #[serde(default)]
    thumbnail: String,
    #[serde(default)]
    images: Vec<String>,
}
impl ProductRecord {
    fn to_domain(self) -> Product {
        Product {
            id: self.id,
            title: self.title,
            description: self.description,
            price: self.price,
            discount_percentage: self.discount_percentage,
            stock: self.stock,
            rating: self.rating,
            category: self.category,
            brand: self.brand,
            thumbnail: self.thumbnail,
            images: self.images,
        }
    }
}

#[derive(Deserialize)]
struct ProductPageRecord {
    products: Vec<ProductRecord>,
    #[serde(default)]
    total: u64,
    #[serde(default)]
    skip: u64,
    #[serde(default)]
    limit: u64,
}
impl ProductPageRecord {
    fn to_domain(self) -> ProductPage {
        ProductPage {
            products: self
                .products
                .into_iter()
                .map(ProductRecord::to_domain)
                .collect(),
            total: self.total,
            skip: self.skip,
            limit: self.limit,
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UserRecord {
    id: u64,
    username: String,
    #[serde(default)]
    email: String,
    #[serde(default)]
    first_name: String,
    #[serde(default)]
    last_name: String,
    #[serde(default)]
    image: String,
}
impl UserRecord {
    fn to_domain(self) -> User {
        User {
            id: self.id,
            username: self.username,
            email: self.email,
            first_name: self.first_name,
            last_name: self.last_name,
            image: self.image,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    expires_in_mins: Option<u32>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LoginResponse {
    #[serde(flatten)]
    user: UserRecord,
    #[serde(alias = "token")]
    access_token: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RemoteCartLineRecord {
    id: u64,
    #[serde(default)]
    title: String,
    #[serde(default)]
    price: Decimal,
    #[serde(default)]
    quantity: u32,
    #[serde(default)]
    discount_percentage: Decimal,
    #[serde(default)]
    thumbnail: String,
}
impl RemoteCartLineRecord {
    fn to_domain(self) -> RemoteCartLine {
        RemoteCartLine {
            product_id: self.id,
            title: self.title,
            price: self.price,
            quantity: self.quantity,
            discount_percentage: self.discount_percentage,
            thumbnail: self.thumbnail,
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RemoteCartRecord {
    id: u64,
    user_id: u64,
    #[serde(default)]
    products: Vec<RemoteCartLineRecord>,
    #[serde(default)]
    total: Decimal,
    #[serde(default)]
    discounted_total: Decimal,
    #[serde(default)]
    total_products: u32,
    #[serde(default)]
    total_quantity: u32,
}
impl RemoteCartRecord {
    fn to_domain(self) -> RemoteCart {
        RemoteCart {
            id: self.id,
            user_id: self.user_id,
            lines: self
                .products
                .into_iter()
                .map(RemoteCartLineRecord::to_domain)
                .collect(),
            total: self.total,
            discounted_total: self.discounted_total,
            total_products: self.total_products,
            total_quantity: self.total_quantity,
        }
    }
}

#[derive(Deserialize)]
struct UserCartsRecord {
    #[serde(default)]
    carts: Vec<RemoteCartRecord>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AddToCartRequest {
    user_id: u64,
    products: Vec<CartItemRecord>,
}

#[derive(Serialize)]
struct CartItemRecord {
    id: u64,
    quantity: u32,
}

//=========================================================================================
// Port Implementations
//=========================================================================================

#[async_trait]
impl CatalogService for HttpAdapter {
    async fn list_products(&self, skip: u64, limit: u64) -> PortResult<ProductPage> {
        let request = self
            .http
            .get(self.url("/products"))
            .query(&[("limit", limit), ("skip", skip)]);
        let response = self.send(request, "fetch products").await?;
        let page: ProductPageRecord = read_json(response, "fetch products").await?;
        Ok(page.to_domain())
    }

    async fn search_products(
        &self,
        query: &str,
        skip: u64,
        limit: u64,
    ) -> PortResult<ProductPage> {
        let request = self
            .http
            .get(self.url("/products/search"))
            .query(&[("q", query)])
            .query(&[("limit", limit), ("skip", skip)]);
        let response = self.send(request, "search products").await?;
        let page: ProductPageRecord = read_json(response, "search products").await?;
        Ok(page.to_domain())
    }

    async fn get_product(&self, id: u64) -> PortResult<Product> {
        let request = self.http.get(self.url(&format!("/products/{id}")));
        let response = self.send(request, "fetch product").await?;
        let product: ProductRecord = read_json(response, &format!("product {id}")).await?;
        Ok(product.to_domain())
    }
}

#[async_trait]
impl AuthService for HttpAdapter {
    async fn login(&self, credentials: &LoginCredentials) -> PortResult<(User, String)> {
        let body = LoginRequest {
            username: &credentials.username,
            password: &credentials.password,
            expires_in_mins: credentials.expires_in_mins,
        };
        let request = self.http.post(self.url("/auth/login")).json(&body);
        let response = self.send(request, "login").await?;

        // The service answers bad credentials with 400 rather than 401.
        if response.status() == StatusCode::BAD_REQUEST {
            return Err(PortError::Unauthorized);
        }

        let login: LoginResponse = read_json(response, "login").await?;
        Ok((login.user.to_domain(), login.access_token))
    }

    async fn current_user(&self, token: &str) -> PortResult<User> {
        let request = self.http.get(self.url("/auth/me")).bearer_auth(token);
        let response = self.send(request, "get user info").await?;
        let user: UserRecord = read_json(response, "get user info").await?;
        Ok(user.to_domain())
    }
}

#[async_trait]
impl RemoteCartService for HttpAdapter {
    async fn user_cart(&self, user_id: u64, token: &str) -> PortResult<RemoteCart> {
        let request = self
            .http
            .get(self.url(&format!("/carts/user/{user_id}")))
            .bearer_auth(token);
        let response = self.send(request, "fetch cart").await?;
        let carts: UserCartsRecord = read_json(response, "fetch cart").await?;

        Ok(carts
            .carts
            .into_iter()
            .next()
            .map(RemoteCartRecord::to_domain)
            .unwrap_or_else(|| RemoteCart::empty(user_id)))
    }

    async fn add_to_cart(
        &self,
        user_id: u64,
        items: &[CartItemRef],
        token: &str,
    ) -> PortResult<RemoteCart> {
        let body = AddToCartRequest {
            user_id,
            products: items
                .iter()
                .map(|item| CartItemRecord {
                    id: item.product_id,
                    quantity: item.quantity,
                })
                .collect(),
        };
        let request = self
            .http
            .post(self.url("/carts/add"))
            .bearer_auth(token)
            .json(&body);
        let response = self.send(request, "add to cart").await?;
        let cart: RemoteCartRecord = read_json(response, "add to cart").await?;
        Ok(cart.to_domain())
    }
}
