//! HTTP route handlers for the storefront API.
//!
//! # Route Structure
//!
//! ```text
//! # Catalogue
//! GET  /products               - Products of a store (summaries)
//! GET  /product                - One product with description, or null
//! GET  /products/category      - Products of a store in one category
//! GET  /categories             - Distinct categories of a store
//! GET  /faq                    - FAQ of a registered store
//!
//! # Admin session
//! POST /admin/login            - Email/password login (rate limited)
//! GET  /admin/logout           - Clear the flag, redirect to /
//! GET  /admin/isloggedin       - {"logged_in": bool}
//!
//! # Admin catalogue
//! POST /admin/product/create   - Add a product
//! POST /admin/product/edit     - Partial update of a product
//! POST /admin/product/delete   - Remove a product
//!
//! # Shoppers
//! POST /contact                - Leave a message for the store
//! POST /purchase               - Check out a client-side cart
//! ```
//!
//! Every handler returns JSON; failures go through
//! [`AppError`](crate::error::AppError).

pub mod admin;
pub mod auth;
pub mod contact;
pub mod faq;
pub mod products;
pub mod purchase;

use axum::{
    Json, Router,
    routing::{get, post},
};
use serde::Serialize;

use crate::middleware::auth_rate_limiter;
use crate::state::AppState;

/// Body of every successful mutating request.
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status_message: String,
    pub success: bool,
}

impl StatusResponse {
    /// A success envelope carrying `message`.
    pub fn success(message: impl Into<String>) -> Json<Self> {
        Json(Self {
            status_message: message.into(),
            success: true,
        })
    }
}

/// Create the admin routes router.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(auth::login).layer(auth_rate_limiter()))
        .route("/logout", get(auth::logout))
        .route("/isloggedin", get(auth::is_logged_in))
        .route("/product/create", post(admin::create_product))
        .route("/product/edit", post(admin::edit_product))
        .route("/product/delete", post(admin::delete_product))
}

/// Create all API routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/products", get(products::list))
        .route("/product", get(products::show))
        .route("/products/category", get(products::by_category))
        .route("/categories", get(products::categories))
        .route("/faq", get(faq::show))
        .route("/contact", post(contact::submit))
        .route("/purchase", post(purchase::purchase))
        .nest("/admin", admin_routes())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use axum::Router;
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use brickexchange_core::{Email, Price, ProductId, Quantity, StoreName};

    use crate::db::{Datastore, MemoryDatastore};
    use crate::error::SERVER_ERROR_MESSAGE;
    use crate::models::NewProduct;
    use crate::services::auth::hash_password;
    use crate::test_support::test_app;

    const CLIENT_IP: &str = "203.0.113.10";

    struct TestApp {
        router: Router,
        datastore: Arc<MemoryDatastore>,
    }

    impl TestApp {
        fn new() -> Self {
            let datastore = Arc::new(MemoryDatastore::new());
            let router = test_app(datastore.clone());
            Self { router, datastore }
        }

        async fn send(&self, request: Request<Body>) -> (StatusCode, Option<String>, Value) {
            let response = self.router.clone().oneshot(request).await.unwrap();
            let status = response.status();
            let cookie = response
                .headers()
                .get(header::SET_COOKIE)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.split(';').next())
                .map(ToString::to_string);
            let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
                .await
                .unwrap();
            let body = if bytes.is_empty() {
                Value::Null
            } else {
                serde_json::from_slice(&bytes).unwrap()
            };
            (status, cookie, body)
        }

        async fn get(&self, uri: &str) -> (StatusCode, Value) {
            let (status, _, body) = self
                .send(Request::builder().uri(uri).body(Body::empty()).unwrap())
                .await;
            (status, body)
        }

        async fn post_json(&self, uri: &str, body: &Value) -> (StatusCode, Value) {
            let (status, _, body) = self.send(json_request(uri, body, None)).await;
            (status, body)
        }

        async fn seed(&self, store: &str, category: &str, quantity: i32) -> ProductId {
            self.datastore
                .create_product(&NewProduct {
                    store_name: StoreName::parse(store).unwrap(),
                    image_url: Some("https://cdn.rebrickable.com/media/sets/10243-1.jpg".into()),
                    category: category.to_string(),
                    title: "Parisian Restaurant".to_string(),
                    description: "Modular building with a rooftop terrace.".to_string(),
                    price: Price::parse("179.99").unwrap(),
                    quantity: Quantity::new(quantity).unwrap(),
                })
                .await
                .unwrap()
        }
    }

    fn json_request(uri: &str, body: &Value, cookie: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .header("x-forwarded-for", CLIENT_IP);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    fn status_message(body: &Value) -> &str {
        body["status_message"].as_str().unwrap()
    }

    fn create_body() -> Value {
        json!({
            "store_name": "BrickExchange",
            "title": "Millennium Falcon",
            "description": "Ultimate Collector Series.",
            "price": "849.99",
            "quantity": "2",
            "category": "Star Wars",
        })
    }

    #[tokio::test]
    async fn test_products_require_store_name() {
        let app = TestApp::new();
        let (status, body) = app.get("/products").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "status_message": "Missing GET parameter: store name." }));
    }

    #[tokio::test]
    async fn test_store_name_is_case_insensitive() {
        let app = TestApp::new();
        app.seed("brickexchange", "Creator", 4).await;

        let (_, mixed) = app.get("/products?store_name=BrickExchange").await;
        let (_, lower) = app.get("/products?store_name=brickexchange").await;
        assert_eq!(mixed, lower);
        assert_eq!(mixed.as_array().unwrap().len(), 1);
        assert!(mixed[0].get("description").is_none());
        assert_eq!(mixed[0]["price"], json!(179.99));
    }

    #[tokio::test]
    async fn test_product_detail_and_null() {
        let app = TestApp::new();
        let id = app.seed("brickexchange", "Creator", 4).await;

        let (status, body) = app.get(&format!("/product?product_id={id}")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["description"], "Modular building with a rooftop terrace.");

        let (status, body) = app.get("/product?product_id=999").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, Value::Null);

        let (status, body) = app.get("/product").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(status_message(&body), "Missing GET parameter: product_id.");

        let (status, body) = app.get("/product?product_id=abc").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(status_message(&body), "Invalid GET parameter: product_id.");
    }

    #[tokio::test]
    async fn test_category_listing_and_categories() {
        let app = TestApp::new();
        app.seed("brickexchange", "Creator", 1).await;
        app.seed("brickexchange", "Creator", 1).await;
        app.seed("brickexchange", "Technic", 1).await;

        let (_, body) = app
            .get("/products/category?store_name=brickexchange&category=Creator")
            .await;
        assert_eq!(body.as_array().unwrap().len(), 2);

        let (_, body) = app
            .get("/products/category?store_name=brickexchange&category=creator")
            .await;
        assert_eq!(body, json!([]));

        let (status, body) = app.get("/products/category?store_name=brickexchange").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            status_message(&body),
            "Missing GET parameter: store name and category."
        );

        let (_, body) = app.get("/categories?store_name=BRICKEXCHANGE").await;
        assert_eq!(body, json!([{ "category": "Creator" }, { "category": "Technic" }]));
    }

    #[tokio::test]
    async fn test_faq() {
        let app = TestApp::new();

        let (status, body) = app.get("/faq?store_name=BrickExchange").await;
        assert_eq!(status, StatusCode::OK);
        let faq = body.as_object().unwrap();
        assert_eq!(faq.len(), 6);
        assert_eq!(
            faq["How long does delivery typically take?"],
            "The expected delivery time is 2-3 weeks."
        );

        let (status, body) = app.get("/faq?store_name=legoland").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(status_message(&body), "Invalid store name!");

        let (status, body) = app.get("/faq").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(status_message(&body), "Missing GET parameter: store name.");
    }

    #[tokio::test]
    async fn test_create_product() {
        let app = TestApp::new();
        let (status, body) = app.post_json("/admin/product/create", &create_body()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({
                "status_message": "Request to add Millennium Falcon to BrickExchange successfully processed!",
                "success": true,
            })
        );

        let (_, products) = app.get("/products?store_name=brickexchange").await;
        assert_eq!(products[0]["title"], "Millennium Falcon");
        assert_eq!(products[0]["image_url"], Value::Null);
    }

    #[tokio::test]
    async fn test_create_missing_any_field_writes_nothing() {
        let app = TestApp::new();
        for field in ["store_name", "title", "description", "price", "quantity", "category"] {
            let mut body = create_body();
            body.as_object_mut().unwrap().remove(field);
            let (status, response) = app.post_json("/admin/product/create", &body).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "without {field}");
            assert_eq!(
                status_message(&response),
                "Missing POST parameter: store name, title, description, price, quantity, and/or category."
            );
        }
        assert_eq!(app.datastore.product_count().await, 0);
    }

    #[tokio::test]
    async fn test_create_negative_quantity_writes_nothing() {
        let app = TestApp::new();
        let mut body = create_body();
        body["quantity"] = json!(-1);
        let (status, response) = app.post_json("/admin/product/create", &body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            status_message(&response),
            "Quantity of product should not be negative."
        );
        assert_eq!(app.datastore.product_count().await, 0);
    }

    #[tokio::test]
    async fn test_create_accepts_urlencoded_form() {
        let app = TestApp::new();
        let request = Request::builder()
            .method("POST")
            .uri("/admin/product/create")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(
                "store_name=brickexchange&title=Blacksmith+Shop&description=Medieval\
                 &price=149.5&quantity=0&category=Ideas",
            ))
            .unwrap();
        let (status, _, _) = app.send(request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(app.datastore.product_count().await, 1);
    }

    fn multipart_request(uri: &str, fields: &[(&str, &str)]) -> Request<Body> {
        const BOUNDARY: &str = "brickexchange-form-boundary";
        let mut body = String::new();
        for (name, value) in fields {
            body.push_str(&format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            ));
        }
        body.push_str(&format!("--{BOUNDARY}--\r\n"));

        Request::builder()
            .method("POST")
            .uri(uri)
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .header("x-forwarded-for", CLIENT_IP)
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn test_create_accepts_multipart_form() {
        let app = TestApp::new();
        let request = multipart_request(
            "/admin/product/create",
            &[
                ("store_name", "BrickExchange"),
                ("title", "Ecto-1"),
                ("description", "Ghostbusters car."),
                ("price", "199.99"),
                ("quantity", "3"),
                ("category", "Creator Expert"),
            ],
        );
        let (status, _, body) = app.send(request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            status_message(&body),
            "Request to add Ecto-1 to BrickExchange successfully processed!"
        );
        assert_eq!(app.datastore.product_count().await, 1);

        let request = multipart_request(
            "/admin/product/create",
            &[("store_name", "BrickExchange"), ("title", "Half a product")],
        );
        let (status, _, _) = app.send(request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(app.datastore.product_count().await, 1);
    }

    #[tokio::test]
    async fn test_edit_and_contact_accept_multipart_form() {
        let app = TestApp::new();
        let id = app.seed("brickexchange", "Modular", 1).await;
        let id_text = id.to_string();

        let request = multipart_request(
            "/admin/product/edit",
            &[("product_id", &id_text), ("quantity", "8")],
        );
        let (status, _, _) = app.send(request).await;
        assert_eq!(status, StatusCode::OK);
        let product = app.datastore.get_product(id).await.unwrap().unwrap();
        assert_eq!(product.quantity.as_i32(), 8);
        assert_eq!(product.title, "Parisian Restaurant");

        let request = multipart_request(
            "/contact",
            &[
                ("store_name", "BrickExchange"),
                ("email", "fan@example.com"),
                ("message", "Any Modulars in stock?"),
            ],
        );
        let (status, _, body) = app.send(request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(status_message(&body), "Successfully sent message!");
        assert_eq!(app.datastore.contact_messages().await.len(), 1);
    }

    #[tokio::test]
    async fn test_edit_changes_only_supplied_fields() {
        let app = TestApp::new();
        let id = app.seed("brickexchange", "Creator", 4).await;
        let (_, before) = app.get(&format!("/product?product_id={id}")).await;

        let (status, body) = app
            .post_json(
                "/admin/product/edit",
                &json!({ "product_id": id.to_string(), "price": "150" }),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            status_message(&body),
            format!("Request to edit product {id} successfully processed!")
        );

        let (_, after) = app.get(&format!("/product?product_id={id}")).await;
        assert_eq!(after["price"].as_f64(), Some(150.0));
        for field in ["title", "description", "quantity", "category", "image_url"] {
            assert_eq!(after[field], before[field], "{field} changed");
        }
    }

    #[tokio::test]
    async fn test_edit_rejections() {
        let app = TestApp::new();
        let id = app.seed("brickexchange", "Creator", 4).await;

        let (status, body) = app.post_json("/admin/product/edit", &json!({})).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(status_message(&body), "Missing POST parameter: product id.");

        let (status, body) = app
            .post_json(
                "/admin/product/edit",
                &json!({ "product_id": id.to_string(), "quantity": "-5" }),
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            status_message(&body),
            "Quantity of product should not be negative."
        );
        let (_, product) = app.get(&format!("/product?product_id={id}")).await;
        assert_eq!(product["quantity"], 4);

        let (status, body) = app
            .post_json("/admin/product/edit", &json!({ "product_id": "404" }))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(status_message(&body), "Product 404 does not exist.");
    }

    #[tokio::test]
    async fn test_delete_product() {
        let app = TestApp::new();
        let id = app.seed("brickexchange", "Creator", 4).await;

        let (status, body) = app
            .post_json("/admin/product/delete", &json!({ "product_id": id.as_i32() }))
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            status_message(&body),
            format!("Request to delete product {id} successfully processed!")
        );
        assert_eq!(app.datastore.product_count().await, 0);

        let (status, _) = app
            .post_json("/admin/product/delete", &json!({ "product_id": id.as_i32() }))
            .await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_login_flow() {
        let app = TestApp::new();
        let hash = hash_password("correct horse battery").unwrap();
        app.datastore
            .create_admin(Email::parse("admin@test.edu").unwrap(), hash)
            .await
            .unwrap();

        let (status, _, body) = app
            .send(json_request(
                "/admin/login",
                &json!({ "email": "admin@test.edu", "password": "wrong password" }),
                None,
            ))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(status_message(&body), "Invalid password.");

        let (status, _, body) = app
            .send(json_request(
                "/admin/login",
                &json!({ "email": "nobody@test.edu", "password": "whatever1" }),
                None,
            ))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(status_message(&body), "User does not exist.");

        let (status, _, body) = app
            .send(json_request("/admin/login", &json!({ "email": "admin@test.edu" }), None))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            status_message(&body),
            "Missing POST parameters: email and/or password."
        );

        let (status, cookie, body) = app
            .send(json_request(
                "/admin/login",
                &json!({ "email": "admin@test.edu", "password": "correct horse battery" }),
                None,
            ))
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({ "status_message": "Successfully logged into admin portal!", "success": true })
        );
        let cookie = cookie.unwrap();
        assert!(cookie.starts_with("bx_session="));

        let (_, _, body) = app
            .send(
                Request::builder()
                    .uri("/admin/isloggedin")
                    .header(header::COOKIE, &cookie)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await;
        assert_eq!(body, json!({ "logged_in": true }));

        let (status, _, _) = app
            .send(
                Request::builder()
                    .uri("/admin/logout")
                    .header(header::COOKIE, &cookie)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await;
        assert_eq!(status, StatusCode::SEE_OTHER);

        let (_, _, body) = app
            .send(
                Request::builder()
                    .uri("/admin/isloggedin")
                    .header(header::COOKIE, &cookie)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await;
        assert_eq!(body, json!({ "logged_in": false }));
    }

    #[tokio::test]
    async fn test_rate_limited_login_stays_json() {
        let app = TestApp::new();
        let credentials = json!({ "email": "nobody@test.edu", "password": "whatever1" });

        for _ in 0..5 {
            let (status, _, body) = app
                .send(json_request("/admin/login", &credentials, None))
                .await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(status_message(&body), "User does not exist.");
        }

        let response = app
            .router
            .clone()
            .oneshot(json_request("/admin/login", &credentials, None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "application/json");
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(
            body,
            json!({ "status_message": "Too many login attempts, please try again later." })
        );
    }

    #[tokio::test]
    async fn test_isloggedin_without_cookie() {
        let app = TestApp::new();
        let (status, body) = app.get("/admin/isloggedin").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "logged_in": false }));
    }

    #[tokio::test]
    async fn test_contact() {
        let app = TestApp::new();
        let (status, body) = app
            .post_json(
                "/contact",
                &json!({
                    "store_name": "BrickExchange",
                    "email": "fan@example.com",
                    "message": "Do you buy used Technic sets?",
                }),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({ "status_message": "Successfully sent message!", "success": true })
        );
        let messages = app.datastore.contact_messages().await;
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].store_name.as_str(), "brickexchange");

        let (status, body) = app
            .post_json("/contact", &json!({ "store_name": "brickexchange", "email": "x@y.z" }))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            status_message(&body),
            "Missing POST parameter: store name, email, and/or message."
        );
    }

    #[tokio::test]
    async fn test_purchase_clamps_stock_at_zero() {
        let app = TestApp::new();
        let id = app.seed("brickexchange", "Creator", 3).await;

        let cart = format!(r#"{{"{id}": 5}}"#);
        let (status, body) = app.post_json("/purchase", &json!({ "cart": cart })).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({ "status_message": "Successfully purchased items!", "success": true })
        );

        let (_, product) = app.get(&format!("/product?product_id={id}")).await;
        assert_eq!(product["quantity"], 0);
    }

    #[tokio::test]
    async fn test_purchase_rejections() {
        let app = TestApp::new();

        let (status, body) = app.post_json("/purchase", &json!({})).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(status_message(&body), "Missing POST parameter: cart.");

        let (status, body) = app
            .post_json("/purchase", &json!({ "cart": { "7": -1 } }))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(status_message(&body), "Invalid POST parameter: cart.");
    }

    #[tokio::test]
    async fn test_data_failure_is_generic_server_error() {
        let app = TestApp::new();
        app.datastore.set_failing(true);

        let reads = [
            "/products?store_name=brickexchange",
            "/product?product_id=1",
            "/products/category?store_name=brickexchange&category=Creator",
            "/categories?store_name=brickexchange",
        ];
        for uri in reads {
            let (status, body) = app.get(uri).await;
            assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR, "{uri}");
            assert_eq!(body, json!({ "status_message": SERVER_ERROR_MESSAGE }), "{uri}");
        }

        let writes = [
            ("/admin/product/create", create_body()),
            ("/admin/product/edit", json!({ "product_id": "1", "title": "New" })),
            ("/admin/product/delete", json!({ "product_id": "1" })),
            (
                "/admin/login",
                json!({ "email": "admin@test.edu", "password": "password" }),
            ),
            (
                "/contact",
                json!({ "store_name": "a", "email": "b@c.d", "message": "hi" }),
            ),
            ("/purchase", json!({ "cart": { "1": 1 } })),
        ];
        for (uri, body) in writes {
            let (status, body) = app.post_json(uri, &body).await;
            assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR, "{uri}");
            assert_eq!(body, json!({ "status_message": SERVER_ERROR_MESSAGE }), "{uri}");
        }
    }
}
