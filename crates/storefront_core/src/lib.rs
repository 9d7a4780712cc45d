pub mod cart;
pub mod domain;
pub mod ports;

pub use cart::{Cart, CartChange, CartLine};
pub use domain::{
    CartItemRef, LoginCredentials, Notice, NoticeVariant, Product, ProductPage, RemoteCart,
    RemoteCartLine, Session, User,
};
pub use ports::{
    AuthService, CatalogService, KeyValueStore, NotificationSink, PortError, PortResult,
    RemoteCartService,
};
