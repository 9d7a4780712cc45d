//! services/storefront/src/storefront.rs
//!
//! The composition root. `Storefront` owns every store explicitly and wires
//! them to the ports; hosts hold one value instead of reaching for globals.

use std::sync::Arc;

use storefront_core::domain::{LoginCredentials, Notice, Product, RemoteCart, Session};
use storefront_core::ports::{
    AuthService, CatalogService, KeyValueStore, NotificationSink, RemoteCartService,
};
use tracing::info;

use crate::adapters::{FileStore, HttpAdapter};
use crate::config::Config;
use crate::error::StorefrontError;
use crate::stores::{CartStore, CatalogBrowser, NotificationCenter, SessionStore};

/// The ports a storefront is assembled from.
#[derive(Clone)]
pub struct Services {
    pub catalog: Arc<dyn CatalogService>,
    pub auth: Arc<dyn AuthService>,
    pub remote_cart: Arc<dyn RemoteCartService>,
    pub storage: Arc<dyn KeyValueStore>,
}

/// Session and cart are only reachable through `Storefront` methods, so a
/// logout always drops the in-memory cart along with the persisted one.
pub struct Storefront {
    pub catalog: CatalogBrowser,
    session: SessionStore,
    cart: CartStore,
    notifications: Arc<NotificationCenter>,
    remote_cart: Arc<dyn RemoteCartService>,
}

impl Storefront {
    /// Builds the production wiring from `config` and restores persisted state.
    pub async fn start(config: &Config) -> Result<Self, StorefrontError> {
        let http = Arc::new(HttpAdapter::new(config)?);
        tokio::fs::create_dir_all(&config.data_dir).await?;
        let storage = Arc::new(FileStore::new(config.data_dir.clone()));

        info!(
            "Starting storefront against {} with data in {}",
            config.api_base,
            config.data_dir.display()
        );

        let services = Services {
            catalog: http.clone(),
            auth: http.clone(),
            remote_cart: http,
            storage,
        };
        let mut storefront = Self::with_services(config, services);
        storefront.restore().await;
        Ok(storefront)
    }

    /// Wires the stores to the given ports without touching persisted state.
    pub fn with_services(config: &Config, services: Services) -> Self {
        let notifications = Arc::new(NotificationCenter::new(config.notification_ttl));
        let notifier: Arc<dyn NotificationSink> = notifications.clone();

        Self {
            catalog: CatalogBrowser::new(services.catalog, config.page_size),
            session: SessionStore::new(
                services.auth,
                services.storage.clone(),
                notifier.clone(),
            )
            .with_token_ttl(config.token_ttl_mins),
            cart: CartStore::new(services.storage, notifier),
            notifications,
            remote_cart: services.remote_cart,
        }
    }

    /// Startup reconciliation for both persisted stores. Never fails.
    pub async fn restore(&mut self) {
        self.cart.restore().await;
        self.session.restore().await;
        info!(
            "Storefront ready: {} cart line(s), {}.",
            self.cart.lines().len(),
            if self.session.is_authenticated() {
                "signed in"
            } else {
                "anonymous"
            }
        );
    }

    pub fn notifications(&self) -> &Arc<NotificationCenter> {
        &self.notifications
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    pub fn cart(&self) -> &CartStore {
        &self.cart
    }

    pub async fn login(&mut self, credentials: LoginCredentials) -> Result<&Session, StorefrontError> {
        Ok(self.session.login(credentials).await?)
    }

    /// Ends the session. The persisted cart is erased by the session store, so
    /// the in-memory copy is dropped too.
    pub async fn logout(&mut self) {
        self.session.logout().await;
        self.cart.reset();
    }

    pub async fn add_to_cart(&mut self, product: &Product, quantity: u32) {
        self.cart.add_item(product, quantity).await;
    }

    pub async fn remove_from_cart(&mut self, product_id: u64) {
        self.cart.remove_item(product_id).await;
    }

    pub async fn set_cart_quantity(&mut self, product_id: u64, quantity: i64) {
        self.cart.set_quantity(product_id, quantity).await;
    }

    pub async fn clear_cart(&mut self) {
        self.cart.clear().await;
    }

    /// Fetches the signed-in user's remote cart and merges it into the local one.
    pub async fn sync_remote_cart(&mut self) -> Result<RemoteCart, StorefrontError> {
        let session = self
            .session
            .session()
            .ok_or(StorefrontError::NotAuthenticated)?;

        let remote = self
            .remote_cart
            .user_cart(session.user.id, &session.token)
            .await?;
        info!(
            "Fetched remote cart {} with {} line(s) for user {}.",
            remote.id,
            remote.lines.len(),
            remote.user_id
        );

        self.cart.merge_remote(&remote).await;
        Ok(remote)
    }

    /// Sends the local cart lines to the remote cart endpoint.
    pub async fn push_cart(&self) -> Result<RemoteCart, StorefrontError> {
        let session = self
            .session
            .session()
            .ok_or(StorefrontError::NotAuthenticated)?;

        let items = self.cart.cart().item_refs();
        let remote = self
            .remote_cart
            .add_to_cart(session.user.id, &items, &session.token)
            .await?;
        info!("Pushed {} line(s) to remote cart {}.", items.len(), remote.id);
        Ok(remote)
    }

    /// Placeholder checkout: announces itself and changes nothing.
    pub fn checkout(&self) {
        self.notifications.notify(Notice::new(
            "Checkout initiated",
            "Thank you for your purchase! Redirecting to payment...",
        ));
    }
}
