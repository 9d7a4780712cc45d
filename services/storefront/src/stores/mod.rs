pub mod cart_store;
pub mod catalog_browser;
pub mod notifications;
pub mod persisted;
pub mod session_store;

pub use cart_store::CartStore;
pub use catalog_browser::{CatalogBrowser, CatalogRequest, CatalogResponse, CatalogView, FetchOutcome};
pub use notifications::{Notification, NotificationCenter};
pub use session_store::SessionStore;
