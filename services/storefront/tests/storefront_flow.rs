use std::path::Path;

use rust_decimal_macros::dec;
use serde_json::json;
use storefront_core::domain::LoginCredentials;
use storefront_lib::{Config, Storefront, StorefrontError};
use tempfile::TempDir;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config(server: &MockServer, data_dir: &Path) -> Config {
    Config {
        api_base: server.uri(),
        data_dir: data_dir.to_path_buf(),
        ..Config::default()
    }
}

fn user_json() -> serde_json::Value {
    json!({
        "id": 1,
        "username": "emilys",
        "email": "emily.johnson@x.dummyjson.com",
        "firstName": "Emily",
        "lastName": "Johnson",
        "image": "https://dummyjson.com/icon/emilys/128"
    })
}

async fn mock_backend() -> MockServer {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/products"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "products": [{
                "id": 1,
                "title": "Essence Mascara Lash Princess",
                "description": "Volumizing mascara",
                "price": 10,
                "discountPercentage": 20,
                "rating": 4.94,
                "stock": 5,
                "category": "beauty",
                "thumbnail": "mascara.png"
            }],
            "total": 1,
            "skip": 0,
            "limit": 20
        })))
        .mount(&server)
        .await;

    let mut login = user_json();
    login["accessToken"] = json!("jwt-access");
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(login))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/auth/me"))
        .and(header("authorization", "Bearer jwt-access"))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_json()))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/auth/me"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "message": "Invalid/expired Token!"
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/carts/user/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "carts": [{
                "id": 3,
                "userId": 1,
                "products": [
                    {"id": 1, "title": "Essence Mascara Lash Princess", "price": 10,
                     "quantity": 1, "discountPercentage": 20, "thumbnail": "mascara.png"},
                    {"id": 2, "title": "Eyeshadow Palette", "price": 19.99,
                     "quantity": 2, "discountPercentage": 0, "thumbnail": "palette.png"}
                ],
                "total": 49.98,
                "discountedTotal": 47.98,
                "totalProducts": 2,
                "totalQuantity": 3
            }]
        })))
        .mount(&server)
        .await;

    server
}

#[tokio::test]
async fn cart_survives_a_restart() {
    let server = mock_backend().await;
    let dir = TempDir::new().unwrap();
    let config = config(&server, dir.path());

    let mut storefront = Storefront::start(&config).await.unwrap();
    assert!(storefront.cart().lines().is_empty());
    assert!(!storefront.session().is_authenticated());

    assert!(storefront.catalog.refresh().await);
    let mascara = storefront.catalog.view().products[0].clone();
    storefront.add_to_cart(&mascara, 2).await;
    storefront.add_to_cart(&mascara, 3).await;
    assert_eq!(storefront.cart().total(), dec!(40));
    drop(storefront);

    let restarted = Storefront::start(&config).await.unwrap();
    assert_eq!(restarted.cart().total_quantity(), 5);
    assert_eq!(restarted.cart().lines()[0].line_total(), dec!(50));
    assert_eq!(restarted.cart().total(), dec!(40));
}

#[tokio::test]
async fn session_is_revalidated_on_start() {
    let server = mock_backend().await;
    let dir = TempDir::new().unwrap();
    let config = config(&server, dir.path());

    let mut storefront = Storefront::start(&config).await.unwrap();
    storefront
        .login(LoginCredentials::new("emilys", "emilyspass"))
        .await
        .unwrap();
    drop(storefront);

    let restarted = Storefront::start(&config).await.unwrap();
    assert_eq!(
        restarted.session().user().map(|u| u.first_name.as_str()),
        Some("Emily")
    );
    assert_eq!(restarted.session().token(), Some("jwt-access"));
}

#[tokio::test]
async fn stale_token_is_discarded_on_start() {
    let server = mock_backend().await;
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("access_token"), "expired").unwrap();

    let storefront = Storefront::start(&config(&server, dir.path())).await.unwrap();

    assert!(!storefront.session().is_authenticated());
    assert!(!dir.path().join("access_token").exists());
}

#[tokio::test]
async fn malformed_cart_file_starts_empty() {
    let server = mock_backend().await;
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("cart"), "[{\"id\":").unwrap();

    let storefront = Storefront::start(&config(&server, dir.path())).await.unwrap();
    assert!(storefront.cart().lines().is_empty());
}

#[tokio::test]
async fn remote_cart_sync_requires_login_and_merges() {
    let server = mock_backend().await;
    let dir = TempDir::new().unwrap();
    let mut storefront = Storefront::start(&config(&server, dir.path())).await.unwrap();

    assert!(matches!(
        storefront.sync_remote_cart().await,
        Err(StorefrontError::NotAuthenticated)
    ));

    storefront.catalog.refresh().await;
    let mascara = storefront.catalog.view().products[0].clone();
    storefront.add_to_cart(&mascara, 1).await;
    storefront
        .login(LoginCredentials::new("emilys", "emilyspass"))
        .await
        .unwrap();

    let remote = storefront.sync_remote_cart().await.unwrap();
    assert_eq!(remote.id, 3);

    let cart = storefront.cart().cart();
    assert_eq!(cart.len(), 2);
    assert_eq!(cart.line(1).unwrap().quantity, 2);
    assert_eq!(cart.line(2).unwrap().quantity, 2);
    assert_eq!(cart.total(), dec!(55.98));
}

#[tokio::test]
async fn logout_clears_token_and_cart() {
    let server = mock_backend().await;
    let dir = TempDir::new().unwrap();
    let mut storefront = Storefront::start(&config(&server, dir.path())).await.unwrap();

    storefront.catalog.refresh().await;
    let mascara = storefront.catalog.view().products[0].clone();
    storefront.add_to_cart(&mascara, 1).await;
    storefront
        .login(LoginCredentials::new("emilys", "emilyspass"))
        .await
        .unwrap();
    assert!(dir.path().join("cart").exists());
    assert!(dir.path().join("access_token").exists());

    storefront.logout().await;

    assert!(!storefront.session().is_authenticated());
    assert!(storefront.cart().lines().is_empty());
    assert!(!dir.path().join("cart").exists());
    assert!(!dir.path().join("access_token").exists());
}

#[tokio::test]
async fn checkout_only_announces() {
    let server = mock_backend().await;
    let dir = TempDir::new().unwrap();
    let mut storefront = Storefront::start(&config(&server, dir.path())).await.unwrap();

    storefront.catalog.refresh().await;
    let mascara = storefront.catalog.view().products[0].clone();
    storefront.add_to_cart(&mascara, 1).await;
    storefront.checkout();

    assert_eq!(storefront.cart().total_quantity(), 1);
    let last = storefront.notifications().active().pop().unwrap();
    assert_eq!(last.title, "Checkout initiated");
}

#[tokio::test]
async fn push_cart_requires_login_and_posts_local_lines() {
    let server = mock_backend().await;
    let dir = TempDir::new().unwrap();
    let mut storefront = Storefront::start(&config(&server, dir.path())).await.unwrap();

    storefront.catalog.refresh().await;
    let mascara = storefront.catalog.view().products[0].clone();
    storefront.add_to_cart(&mascara, 2).await;

    assert!(matches!(
        storefront.push_cart().await,
        Err(StorefrontError::NotAuthenticated)
    ));

    Mock::given(method("POST"))
        .and(path("/carts/add"))
        .and(header("authorization", "Bearer jwt-access"))
        .and(body_json(json!({
            "userId": 1,
            "products": [{"id": 1, "quantity": 2}]
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": 51,
            "userId": 1,
            "products": [],
            "total": 20,
            "discountedTotal": 16,
            "totalProducts": 1,
            "totalQuantity": 2
        })))
        .expect(1)
        .mount(&server)
        .await;

    storefront
        .login(LoginCredentials::new("emilys", "emilyspass"))
        .await
        .unwrap();
    let remote = storefront.push_cart().await.unwrap();

    assert_eq!(remote.id, 51);
    assert_eq!(remote.total_quantity, 2);
    assert_eq!(storefront.cart().total_quantity(), 2);
}

#[tokio::test]
async fn cart_after_logout_persists_only_new_items() {
    let server = mock_backend().await;
    let dir = TempDir::new().unwrap();
    let mut storefront = Storefront::start(&config(&server, dir.path())).await.unwrap();

    storefront.catalog.refresh().await;
    let mascara = storefront.catalog.view().products[0].clone();
    storefront
        .login(LoginCredentials::new("emilys", "emilyspass"))
        .await
        .unwrap();
    storefront.sync_remote_cart().await.unwrap();
    assert_eq!(storefront.cart().lines().len(), 2);

    storefront.logout().await;
    storefront.add_to_cart(&mascara, 1).await;

    let raw = std::fs::read_to_string(dir.path().join("cart")).unwrap();
    let persisted: Vec<serde_json::Value> = serde_json::from_str(&raw).unwrap();
    assert_eq!(persisted.len(), 1);
    assert_eq!(persisted[0]["id"], 1);
    assert_eq!(persisted[0]["quantity"], 1);
}

#[tokio::test]
async fn cart_mutations_go_through_the_storefront() {
    let server = mock_backend().await;
    let dir = TempDir::new().unwrap();
    let mut storefront = Storefront::start(&config(&server, dir.path())).await.unwrap();

    storefront.catalog.refresh().await;
    let mascara = storefront.catalog.view().products[0].clone();
    storefront.add_to_cart(&mascara, 1).await;
    storefront.set_cart_quantity(1, 4).await;
    assert_eq!(storefront.cart().total(), dec!(32));

    storefront.remove_from_cart(1).await;
    assert!(storefront.cart().lines().is_empty());

    storefront.add_to_cart(&mascara, 1).await;
    storefront.clear_cart().await;
    assert_eq!(storefront.cart().total_quantity(), 0);
}
