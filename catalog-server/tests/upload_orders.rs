mod common;

use axum::body::Body;
use common::TestApp;
use http::{Method, Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::json;
use std::io::Cursor;
use std::time::Duration;
use tower::ServiceExt;

const BOUNDARY: &str = "catalog-test-boundary";

fn png_bytes() -> Vec<u8> {
    let img = image::RgbImage::from_pixel(8, 8, image::Rgb([10, 120, 200]));
    let mut out = Vec::new();
    image::DynamicImage::ImageRgb8(img)
        .write_to(&mut Cursor::new(&mut out), image::ImageFormat::Png)
        .unwrap();
    out
}

fn multipart_body(field: &str, filename: Option<&str>, data: &[u8]) -> Vec<u8> {
    let disposition = match filename {
        Some(name) => format!("form-data; name=\"{field}\"; filename=\"{name}\""),
        None => format!("form-data; name=\"{field}\""),
    };
    let mut body = format!(
        "--{BOUNDARY}\r\nContent-Disposition: {disposition}\r\nContent-Type: image/png\r\n\r\n"
    )
    .into_bytes();
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
    body
}

fn upload_request(app: &TestApp, body: Vec<u8>, authorized: bool) -> Request<Body> {
    let mut builder = Request::builder()
        .method(Method::POST)
        .uri("/upload")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        );
    if authorized {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", app.token));
    }
    builder.body(Body::from(body)).unwrap()
}

#[tokio::test]
async fn test_upload_and_serve() {
    let app = TestApp::new().await;

    let request = upload_request(&app, multipart_body("image", Some("shot.png"), &png_bytes()), true);
    let (status, body) = app.send(request).await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    let filename = body["filename"].as_str().unwrap().to_string();
    assert!(filename.ends_with(".jpg"));
    assert_eq!(
        body["url"],
        format!("http://localhost:5000/uploads/{filename}")
    );

    // same content under the legacy field name maps to the same file
    let request = upload_request(&app, multipart_body("file", Some("copy.png"), &png_bytes()), true);
    let (status, again) = app.send(request).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(again["filename"], filename.as_str());

    let router = catalog_server::api::build_app(&app.state).with_state(app.state.clone());
    let response = router
        .oneshot(
            Request::builder()
                .uri(format!("/uploads/{filename}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "image/jpeg");
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(bytes.len() as u64, body["size"].as_u64().unwrap());
}

#[tokio::test]
async fn test_upload_rejections() {
    let app = TestApp::new().await;

    let (status, _) = app
        .send(upload_request(&app, multipart_body("image", Some("a.png"), &png_bytes()), false))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = app
        .send(upload_request(&app, multipart_body("other", Some("a.png"), &png_bytes()), true))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 6504);

    let (status, body) = app
        .send(upload_request(&app, multipart_body("image", None, &png_bytes()), true))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 6506);

    let (status, body) = app
        .send(upload_request(&app, multipart_body("image", Some("a.gif"), &png_bytes()), true))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 6502);

    let (status, body) = app
        .send(upload_request(&app, multipart_body("image", Some("a.png"), b"garbage"), true))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 6503);
}

#[tokio::test]
async fn test_serve_rejects_traversal_and_missing() {
    let app = TestApp::new().await;

    let (status, body) = app.get("/uploads/..%2F..%2Fetc%2Fpasswd").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 6506);

    let (status, _) = app.get("/uploads/missing.jpg").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_order_is_forwarded() {
    let app = TestApp::new().await;

    let (status, body) = app
        .call(
            Method::POST,
            "/orders",
            Some(json!({
                "productId": 42,
                "buyerName": "Sara",
                "buyerPhone": "0600000000",
                "buyerAddress": "1 Rue Atlas",
                "buyerCity": "Rabat",
                "price": "900"
            })),
            false,
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Order saved successfully");

    let mut orders = app.orders.lock().await;
    let order = tokio::time::timeout(Duration::from_secs(2), orders.recv())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(order.product, "42");
    assert_eq!(order.buyer_city, "Rabat");
    assert_eq!(order.price, 900.0);
}

#[tokio::test]
async fn test_invalid_order_is_not_forwarded() {
    let app = TestApp::new().await;

    let (status, body) = app
        .call(
            Method::POST,
            "/orders",
            Some(json!({"productId": 42, "buyerName": "Sara", "price": 10})),
            false,
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 7001);
    assert_eq!(body["details"]["field"], "buyerPhone");

    let mut orders = app.orders.lock().await;
    assert!(orders.try_recv().is_err());
}

#[tokio::test]
async fn test_health() {
    let app = TestApp::new().await;
    let (status, body) = app.get("/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}
