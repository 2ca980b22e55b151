//! Integration tests for the HTTP API using in-process requests.
//!
//! Requests are driven through `tower::ServiceExt::oneshot` against the
//! real router, with a scripted provider standing in for the LLM backend.
//! Upload validation rejects before pdfium is touched, so everything here
//! runs without the native library — except the full-pipeline test at the
//! bottom, which is gated behind `E2E_ENABLED` because rendering a page
//! needs libpdfium on the host.

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use plan2data::api::create_router;
use plan2data::{ExtractError, PlanContent, PlanProvider, RawExtraction, ServiceConfig};
use serde_json::{json, Value};
use tower::ServiceExt;

// ── Test helpers ─────────────────────────────────────────────────────────────

/// Provider returning a canned reply object, no network involved.
struct ScriptedProvider {
    reply: Value,
}

#[async_trait]
impl PlanProvider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn extract(&self, _content: &PlanContent) -> Result<RawExtraction, ExtractError> {
        Ok(self
            .reply
            .as_object()
            .cloned()
            .expect("scripted reply must be an object"))
    }
}

fn config() -> ServiceConfig {
    ServiceConfig::builder().api_key("sk-test").build().unwrap()
}

fn router_with(reply: Value) -> Router {
    create_router(config(), Arc::new(ScriptedProvider { reply }))
}

const BOUNDARY: &str = "X-BOUNDARY";

/// Hand-built multipart body with a single form part.
fn multipart_part(field: &str, filename: &str, bytes: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{BOUNDARY}\r\n\
             Content-Disposition: form-data; name=\"{field}\"; filename=\"{filename}\"\r\n\
             Content-Type: application/pdf\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(bytes);
    body.extend_from_slice(b"\r\n");
    body
}

fn close_multipart(mut body: Vec<u8>) -> Vec<u8> {
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

fn post_extract(body: Vec<u8>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/extract")
        .header(
            "content-type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .header("content-length", body.len())
        .body(Body::from(body))
        .expect("Failed to build request")
}

async fn detail_of(response: axum::response::Response) -> String {
    let bytes = to_bytes(response.into_body(), 1_000_000).await.unwrap();
    let value: Value = serde_json::from_slice(&bytes).expect("error body should be JSON");
    value["detail"].as_str().expect("detail field").to_string()
}

// ── Health ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn health_reports_ok_and_version() {
    let response = router_with(json!({}))
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = to_bytes(response.into_body(), 1024).await.unwrap();
    let value: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(value["status"], "ok");
    assert_eq!(value["version"], env!("CARGO_PKG_VERSION"));
}

// ── Upload validation ────────────────────────────────────────────────────────

#[tokio::test]
async fn missing_file_field_is_400_with_french_detail() {
    let body = close_multipart(multipart_part("autre", "plan.pdf", b"%PDF-1.4"));
    let response = router_with(json!({})).oneshot(post_extract(body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(detail_of(response).await, "Aucun fichier fourni");
}

#[tokio::test]
async fn non_pdf_extension_is_400_with_french_detail() {
    let body = close_multipart(multipart_part("file", "plan.docx", b"%PDF-1.4"));
    let response = router_with(json!({})).oneshot(post_extract(body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(detail_of(response).await, "Le fichier doit être un PDF");
}

#[tokio::test]
async fn empty_upload_is_400_with_french_detail() {
    let body = close_multipart(multipart_part("file", "plan.pdf", b""));
    let response = router_with(json!({})).oneshot(post_extract(body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(detail_of(response).await, "Le fichier PDF est vide ou corrompu");
}

#[tokio::test]
async fn non_pdf_magic_is_400() {
    let body = close_multipart(multipart_part("file", "plan.pdf", b"<html>hello</html>"));
    let response = router_with(json!({})).oneshot(post_extract(body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(detail_of(response).await, "Le fichier PDF est vide ou corrompu");
}

#[tokio::test]
async fn last_file_field_wins_and_unknown_fields_are_ignored() {
    // First part: wrong extension. Second part: pdf name but bad magic.
    // The handler must keep the second, so the error is the magic check,
    // plus a stray field that should be skipped entirely.
    let mut body = multipart_part("file", "plan.docx", b"%PDF-1.4");
    body.extend_from_slice(multipart_part("notes", "notes.txt", b"ignore me").as_slice());
    body.extend_from_slice(multipart_part("file", "plan.pdf", b"not a pdf at all").as_slice());
    let body = close_multipart(body);

    let response = router_with(json!({})).oneshot(post_extract(body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(detail_of(response).await, "Le fichier PDF est vide ou corrompu");
}

#[tokio::test]
async fn non_multipart_post_is_rejected() {
    let response = router_with(json!({}))
        .oneshot(
            Request::post("/extract")
                .header("content-type", "application/json")
                .body(Body::from("{}"))
                .unwrap(),
        )
        .await
        .unwrap();
    assert!(response.status().is_client_error());
}

#[tokio::test]
async fn oversize_upload_is_413() {
    let config = ServiceConfig::builder()
        .api_key("sk-test")
        .max_upload_bytes(1024)
        .build()
        .unwrap();
    let router = create_router(config, Arc::new(ScriptedProvider { reply: json!({}) }));

    let big = vec![b'a'; 8 * 1024];
    let mut upload = b"%PDF-1.4".to_vec();
    upload.extend_from_slice(&big);
    let body = close_multipart(multipart_part("file", "plan.pdf", &upload));

    let response = router.oneshot(post_extract(body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
}

// ── CORS ─────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn preflight_is_permissive_by_default() {
    let response = router_with(json!({}))
        .oneshot(
            Request::builder()
                .method("OPTIONS")
                .uri("/extract")
                .header("origin", "https://app.example.com")
                .header("access-control-request-method", "POST")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert!(response.status().is_success());
    assert_eq!(
        response
            .headers()
            .get("access-control-allow-origin")
            .and_then(|v| v.to_str().ok()),
        Some("*")
    );
}

// ── Full pipeline (needs libpdfium) ──────────────────────────────────────────

/// Build a valid one-page blank PDF with a correct xref table.
fn minimal_pdf() -> Vec<u8> {
    let header = "%PDF-1.4\n";
    let obj1 = "1 0 obj\n<< /Type /Catalog /Pages 2 0 R >>\nendobj\n";
    let obj2 = "2 0 obj\n<< /Type /Pages /Kids [3 0 R] /Count 1 >>\nendobj\n";
    let obj3 = "3 0 obj\n<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] >>\nendobj\n";

    let off1 = header.len();
    let off2 = off1 + obj1.len();
    let off3 = off2 + obj2.len();
    let xref_off = off3 + obj3.len();

    let mut out = Vec::new();
    out.extend_from_slice(header.as_bytes());
    out.extend_from_slice(obj1.as_bytes());
    out.extend_from_slice(obj2.as_bytes());
    out.extend_from_slice(obj3.as_bytes());
    out.extend_from_slice(
        format!(
            "xref\n0 4\n0000000000 65535 f \n{off1:010} 00000 n \n{off2:010} 00000 n \n\
             {off3:010} 00000 n \ntrailer\n<< /Size 4 /Root 1 0 R >>\nstartxref\n{xref_off}\n%%EOF\n"
        )
        .as_bytes(),
    );
    out
}

#[tokio::test]
async fn full_pipeline_normalises_a_scripted_reply() {
    if std::env::var("E2E_ENABLED").is_err() {
        println!("SKIP — set E2E_ENABLED=1 (requires libpdfium) to run this test");
        return;
    }
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();

    let reply = json!({
        "type_de_bien": "Appartement T2",
        "surface_totale": "45.0",
        "surface_sejour": "18.5",
        "surface_wc": 0,
        "surface_bureau": "9.0",
        "caracteristiques": ["Balcon", "Cave"],
        "vision_analysis": { "orientation_document": "Nord en haut" }
    });

    let body = close_multipart(multipart_part("file", "plan.pdf", &minimal_pdf()));
    let response = router_with(reply).oneshot(post_extract(body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = to_bytes(response.into_body(), 1_000_000).await.unwrap();
    let value: Value = serde_json::from_slice(&bytes).unwrap();

    assert_eq!(value["property_type"], "Appartement T2");
    assert_eq!(value["surfaces"]["total_area"], 45.0);
    assert_eq!(
        value["surfaces"]["rooms"],
        json!([
            { "name": "Séjour / Cuisine", "area": 18.5 },
            { "name": "Bureau", "area": 9.0 }
        ])
    );
    assert_eq!(value["features"], json!(["Balcon", "Cave"]));
    assert_eq!(value["vision_note"], "Orientation du document : Nord en haut");
}
