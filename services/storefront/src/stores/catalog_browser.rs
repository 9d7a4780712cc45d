//! services/storefront/src/stores/catalog_browser.rs
//!
//! Paged product listing and search on top of the `CatalogService` port.
//!
//! Every fetch is tagged with a generation number. Issuing a new fetch cancels
//! the previous one and only a response carrying the latest generation may
//! update the view, so a slow answer to an old query can never overwrite a
//! newer one.

use std::sync::Arc;

use storefront_core::domain::{Product, ProductPage};
use storefront_core::ports::{CatalogService, PortError, PortResult};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error};

pub const FETCH_ERROR_MESSAGE: &str = "Failed to fetch products. Please try again.";

/// What the host renders.
#[derive(Debug, Clone, Default)]
pub struct CatalogView {
    pub products: Vec<Product>,
    pub total: u64,
    pub error: Option<String>,
    pub loading: bool,
}

#[derive(Debug)]
pub enum FetchOutcome {
    Loaded(ProductPage),
    Failed(PortError),
    Cancelled,
}

#[derive(Debug)]
pub struct CatalogResponse {
    pub generation: u64,
    pub outcome: FetchOutcome,
}

/// A fetch that has been issued but not yet run. It can be awaited in place
/// or moved onto a task.
pub struct CatalogRequest {
    generation: u64,
    query: Option<String>,
    skip: u64,
    limit: u64,
    cancel: CancellationToken,
    catalog: Arc<dyn CatalogService>,
}

impl CatalogRequest {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    pub async fn execute(self) -> CatalogResponse {
        let fetch = async {
            match &self.query {
                Some(query) => {
                    self.catalog
                        .search_products(query, self.skip, self.limit)
                        .await
                }
                None => self.catalog.list_products(self.skip, self.limit).await,
            }
        };

        let outcome = tokio::select! {
            biased;
            _ = self.cancel.cancelled() => FetchOutcome::Cancelled,
            result = fetch => match result {
                Ok(page) => FetchOutcome::Loaded(page),
                Err(e) => FetchOutcome::Failed(e),
            },
        };

        CatalogResponse {
            generation: self.generation,
            outcome,
        }
    }
}

pub struct CatalogBrowser {
    catalog: Arc<dyn CatalogService>,
    page_size: u32,
    query: String,
    page: u32,
    generation: u64,
    in_flight: Option<CancellationToken>,
    view: CatalogView,
}

impl CatalogBrowser {
    pub fn new(catalog: Arc<dyn CatalogService>, page_size: u32) -> Self {
        Self {
            catalog,
            page_size: page_size.max(1),
            query: String::new(),
            page: 1,
            generation: 0,
            in_flight: None,
            view: CatalogView::default(),
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    /// 1-based.
    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn view(&self) -> &CatalogView {
        &self.view
    }

    /// Changing the query always returns to the first page.
    pub fn set_query(&mut self, query: &str) {
        self.query = query.trim().to_string();
        self.page = 1;
    }

    pub fn set_page(&mut self, page: u32) {
        self.page = page.max(1);
    }

    pub fn total_pages(&self) -> u64 {
        self.view.total.div_ceil(u64::from(self.page_size))
    }

    /// Zero-based `(start, end)` of the products shown on the current page.
    pub fn range(&self) -> (u64, u64) {
        let page_size = u64::from(self.page_size);
        let start = u64::from(self.page - 1) * page_size;
        let end = (start + page_size).min(self.view.total);
        (start, end)
    }

    /// Issues a fetch for the current query and page, superseding any fetch
    /// still in flight.
    pub fn begin_fetch(&mut self) -> CatalogRequest {
        if let Some(previous) = self.in_flight.take() {
            previous.cancel();
        }

        self.generation += 1;
        let cancel = CancellationToken::new();
        self.in_flight = Some(cancel.clone());
        self.view.loading = true;

        let limit = u64::from(self.page_size);
        CatalogRequest {
            generation: self.generation,
            query: (!self.query.is_empty()).then(|| self.query.clone()),
            skip: u64::from(self.page - 1) * limit,
            limit,
            cancel,
            catalog: self.catalog.clone(),
        }
    }

    /// Applies a response if it answers the latest fetch. Returns whether the
    /// view changed.
    pub fn apply(&mut self, response: CatalogResponse) -> bool {
        if response.generation != self.generation {
            debug!(
                "Ignoring catalog response for generation {} (latest is {}).",
                response.generation, self.generation
            );
            return false;
        }

        self.in_flight = None;
        self.view.loading = false;

        match response.outcome {
            FetchOutcome::Loaded(page) => {
                self.view.products = page.products;
                self.view.total = page.total;
                self.view.error = None;
            }
            FetchOutcome::Failed(e) => {
                error!("Error fetching products: {}", e);
                self.view.error = Some(FETCH_ERROR_MESSAGE.to_string());
            }
            FetchOutcome::Cancelled => return false,
        }
        true
    }

    /// Fetches the current query and page and applies the result.
    pub async fn refresh(&mut self) -> bool {
        let request = self.begin_fetch();
        let response = request.execute().await;
        self.apply(response)
    }

    /// Manual retry after a failed fetch.
    pub async fn retry(&mut self) -> bool {
        self.refresh().await
    }

    /// Cancels the in-flight fetch, if any.
    pub fn cancel(&mut self) {
        if let Some(token) = self.in_flight.take() {
            token.cancel();
            self.view.loading = false;
        }
    }

    pub async fn product(&self, id: u64) -> PortResult<Product> {
        self.catalog.get_product(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use rust_decimal::Decimal;
    use std::sync::Mutex;

    /// Answers with one product titled after the request; optionally fails.
    #[derive(Default)]
    struct FakeCatalog {
        calls: Mutex<Vec<(Option<String>, u64, u64)>>,
        fail: Mutex<bool>,
    }

    impl FakeCatalog {
        fn page(&self, title: &str) -> PortResult<ProductPage> {
            if *self.fail.lock().unwrap() {
                return Err(PortError::Network("connection refused".to_string()));
            }
            Ok(ProductPage {
                products: vec![product(1, title)],
                total: 45,
                skip: 0,
                limit: 20,
            })
        }
    }

    fn product(id: u64, title: &str) -> Product {
        Product {
            id,
            title: title.to_string(),
            description: String::new(),
            price: Decimal::ONE,
            discount_percentage: Decimal::ZERO,
            stock: 1,
            rating: Decimal::ZERO,
            category: String::new(),
            brand: None,
            thumbnail: String::new(),
            images: Vec::new(),
        }
    }

    #[async_trait]
    impl CatalogService for FakeCatalog {
        async fn list_products(&self, skip: u64, limit: u64) -> PortResult<ProductPage> {
            self.calls.lock().unwrap().push((None, skip, limit));
            self.page("all")
        }

        async fn search_products(
            &self,
            query: &str,
            skip: u64,
            limit: u64,
        ) -> PortResult<ProductPage> {
            self.calls
                .lock()
                .unwrap()
                .push((Some(query.to_string()), skip, limit));
            self.page(query)
        }

        async fn get_product(&self, id: u64) -> PortResult<Product> {
            Ok(product(id, "detail"))
        }
    }

    #[tokio::test]
    async fn blank_query_lists_and_text_searches() {
        let catalog = Arc::new(FakeCatalog::default());
        let mut browser = CatalogBrowser::new(catalog.clone(), 20);

        assert!(browser.refresh().await);
        browser.set_query("  phone ");
        browser.set_page(3);
        assert!(browser.refresh().await);

        let calls = catalog.calls.lock().unwrap().clone();
        assert_eq!(
            calls,
            vec![(None, 0, 20), (Some("phone".to_string()), 40, 20)]
        );
        assert_eq!(browser.view().products[0].title, "phone");
        assert!(!browser.view().loading);
    }

    #[tokio::test]
    async fn new_query_resets_to_first_page() {
        let mut browser = CatalogBrowser::new(Arc::new(FakeCatalog::default()), 20);
        browser.set_page(4);
        browser.set_query("laptop");
        assert_eq!(browser.page(), 1);

        browser.set_page(0);
        assert_eq!(browser.page(), 1);
    }

    #[tokio::test]
    async fn paging_math_follows_total() {
        let mut browser = CatalogBrowser::new(Arc::new(FakeCatalog::default()), 20);
        browser.set_page(3);
        browser.refresh().await;

        assert_eq!(browser.view().total, 45);
        assert_eq!(browser.total_pages(), 3);
        assert_eq!(browser.range(), (40, 45));
    }

    #[tokio::test]
    async fn late_response_from_older_fetch_is_ignored() {
        let mut browser = CatalogBrowser::new(Arc::new(FakeCatalog::default()), 20);

        browser.set_query("phone");
        let old = browser.begin_fetch();
        // The old request completes, but its answer arrives after a newer fetch went out.
        let old_response = old.execute().await;

        browser.set_query("laptop");
        let new = browser.begin_fetch();
        let new_response = new.execute().await;

        assert!(browser.apply(new_response));
        assert!(!browser.apply(old_response));
        assert_eq!(browser.view().products[0].title, "laptop");
    }

    #[tokio::test]
    async fn superseded_fetch_is_cancelled() {
        let mut browser = CatalogBrowser::new(Arc::new(FakeCatalog::default()), 20);

        let first = browser.begin_fetch();
        let second = browser.begin_fetch();
        assert!(first.is_cancelled());
        assert!(!second.is_cancelled());

        let response = first.execute().await;
        assert!(matches!(response.outcome, FetchOutcome::Cancelled));
        assert!(!browser.apply(response));
        assert!(browser.view().loading);

        assert!(browser.apply(second.execute().await));
        assert!(!browser.view().loading);
    }

    #[tokio::test]
    async fn failure_sets_message_and_retry_clears_it() {
        let catalog = Arc::new(FakeCatalog::default());
        *catalog.fail.lock().unwrap() = true;
        let mut browser = CatalogBrowser::new(catalog.clone(), 20);

        assert!(browser.refresh().await);
        assert_eq!(browser.view().error.as_deref(), Some(FETCH_ERROR_MESSAGE));

        *catalog.fail.lock().unwrap() = false;
        assert!(browser.retry().await);
        assert!(browser.view().error.is_none());
        assert_eq!(browser.view().products.len(), 1);
    }

    #[tokio::test]
    async fn product_detail_comes_from_the_catalog() {
        let catalog = Arc::new(FakeCatalog::default());
        let browser = CatalogBrowser::new(catalog.clone(), 20);

        let detail = browser.product(42).await.unwrap();
        assert_eq!(detail.id, 42);
        assert_eq!(detail.title, "detail");
        assert!(catalog.calls.lock().unwrap().is_empty());
        assert!(browser.view().products.is_empty());
    }

    #[tokio::test]
    async fn explicit_cancel_clears_loading() {
        let mut browser = CatalogBrowser::new(Arc::new(FakeCatalog::default()), 20);
        let request = browser.begin_fetch();
        browser.cancel();

        assert!(!browser.view().loading);
        let response = request.execute().await;
        assert!(!browser.apply(response));
    }
}
