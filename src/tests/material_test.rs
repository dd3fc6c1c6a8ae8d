use actix_web::http::header::CONTENT_DISPOSITION;
use actix_web::http::StatusCode;
use actix_web::test;
use serde_json::Value;

use super::{multipart, TestContext};

const PDF_BYTES: &[u8] = b"%PDF-1.4 lecture notes";

fn upload_request(
    uri: &str,
    bearer: &str,
    fields: &[(&str, &str)],
    file: Option<(&str, &[u8])>,
) -> test::TestRequest {
    let (content_type, body) = multipart(fields, file);
    test::TestRequest::post()
        .uri(uri)
        .insert_header(("Authorization", bearer.to_string()))
        .insert_header(("Content-Type", content_type))
        .set_payload(body)
}

async fn upload_download_delete(ctx: TestContext) {
    let bearer = ctx.admin_bearer().await;
    let app = init_app!(ctx);

    let req = upload_request(
        "/api/materials",
        &bearer,
        &[("title", "Normalization"), ("category", "DBMS")],
        Some(("normal-forms.pdf", PDF_BYTES)),
    )
    .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let body: Value = test::read_body_json(resp).await;
    let material = &body["data"];
    assert_eq!(material["type"], "PDF");
    assert_eq!(material["category"], "DBMS");
    assert_eq!(material["originalName"], "normal-forms.pdf");
    assert_eq!(material["size"], "22 B");
    assert_eq!(material["downloads"], 0);
    let id = material["_id"].as_str().unwrap().to_string();
    let file_path = material["filePath"].as_str().unwrap().to_string();
    assert!(file_path.ends_with(".pdf"));
    assert_eq!(std::fs::read(ctx.upload_path(&file_path)).unwrap(), PDF_BYTES);

    let req = test::TestRequest::get().uri(&format!("/uploads/{}", file_path)).to_request();
    let served = test::call_and_read_body(&app, req).await;
    assert_eq!(served.as_ref(), PDF_BYTES);

    for expected in 1..=2 {
        let req = test::TestRequest::get()
            .uri(&format!("/api/materials/download/{}", id))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let disposition = resp
            .headers()
            .get(CONTENT_DISPOSITION)
            .unwrap()
            .to_str()
            .unwrap()
            .to_string();
        assert!(disposition.starts_with("attachment"));
        assert!(disposition.contains("normal-forms.pdf"));
        let bytes = test::read_body(resp).await;
        assert_eq!(bytes.as_ref(), PDF_BYTES);

        let req = test::TestRequest::get().uri(&format!("/api/materials/{}", id)).to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"]["downloads"], expected);
    }

    let req = test::TestRequest::delete()
        .uri(&format!("/api/materials/{}", id))
        .insert_header(("Authorization", bearer))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(!ctx.upload_path(&file_path).exists());

    let req = test::TestRequest::get()
        .uri(&format!("/api/materials/download/{}", id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_rt::test]
async fn test_upload_download_delete_sqlite() {
    upload_download_delete(TestContext::sqlite().await).await;
}

#[actix_rt::test]
async fn test_upload_download_delete_json() {
    upload_download_delete(TestContext::json().await).await;
}

async fn download_of_missing_file(ctx: TestContext) {
    let bearer = ctx.admin_bearer().await;
    let app = init_app!(ctx);

    let req = upload_request(
        "/api/materials",
        &bearer,
        &[("title", "Lost notes"), ("category", "Algorithms")],
        Some(("lost.pdf", PDF_BYTES)),
    )
    .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let id = body["data"]["_id"].as_str().unwrap().to_string();
    let file_path = body["data"]["filePath"].as_str().unwrap().to_string();
    std::fs::remove_file(ctx.upload_path(&file_path)).unwrap();

    let req = test::TestRequest::get()
        .uri(&format!("/api/materials/download/{}", id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "File not found on server");

    let req = test::TestRequest::get().uri(&format!("/api/materials/{}", id)).to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["downloads"], 0);
}

#[actix_rt::test]
async fn test_download_missing_file_sqlite() {
    download_of_missing_file(TestContext::sqlite().await).await;
}

#[actix_rt::test]
async fn test_download_missing_file_json() {
    download_of_missing_file(TestContext::json().await).await;
}

#[actix_rt::test]
async fn test_rejects_disallowed_extension() {
    let ctx = TestContext::sqlite().await;
    let bearer = ctx.admin_bearer().await;
    let app = init_app!(ctx);

    let req = upload_request(
        "/api/materials",
        &bearer,
        &[("title", "Setup"), ("category", "Programming")],
        Some(("installer.exe", &b"MZ\x90\x00"[..])),
    )
    .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], false);

    assert_eq!(ctx.stored_uploads(), 0);
    let req = test::TestRequest::get().uri("/api/materials").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["count"], 0);
}

#[actix_rt::test]
async fn test_rejects_incomplete_form() {
    let ctx = TestContext::json().await;
    let bearer = ctx.admin_bearer().await;
    let app = init_app!(ctx);

    // File accepted by the intake, then discarded when the title is missing.
    let req = upload_request(
        "/api/materials",
        &bearer,
        &[("category", "DBMS")],
        Some(("notes.pdf", PDF_BYTES)),
    )
    .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(ctx.stored_uploads(), 0);

    let req = upload_request(
        "/api/materials",
        &bearer,
        &[("title", "Notes"), ("category", "Astrology")],
        Some(("notes.pdf", PDF_BYTES)),
    )
    .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(ctx.stored_uploads(), 0);

    let req = upload_request(
        "/api/materials",
        &bearer,
        &[("title", "Notes"), ("category", "DBMS")],
        None,
    )
    .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_rt::test]
async fn test_rejects_oversized_file() {
    let mut ctx = TestContext::sqlite().await;
    ctx.config.max_upload_bytes = 16;
    let bearer = ctx.admin_bearer().await;
    let app = init_app!(ctx);

    let req = upload_request(
        "/api/materials",
        &bearer,
        &[("title", "Big"), ("category", "DBMS")],
        Some(("big.pdf", &[b'x'; 64][..])),
    )
    .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(ctx.stored_uploads(), 0);
}

#[actix_rt::test]
async fn test_upload_requires_token() {
    let ctx = TestContext::sqlite().await;
    let app = init_app!(ctx);

    let (content_type, body) = multipart(
        &[("title", "Notes"), ("category", "DBMS")],
        Some(("notes.pdf", PDF_BYTES)),
    );
    let req = test::TestRequest::post()
        .uri("/api/materials")
        .insert_header(("Content-Type", content_type))
        .set_payload(body)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(ctx.stored_uploads(), 0);
}

#[actix_rt::test]
async fn test_update_replaces_file() {
    let ctx = TestContext::sqlite().await;
    let bearer = ctx.admin_bearer().await;
    let app = init_app!(ctx);

    let req = upload_request(
        "/api/materials",
        &bearer,
        &[("title", "Slides"), ("category", "Networking")],
        Some(("week1.pdf", PDF_BYTES)),
    )
    .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let id = body["data"]["_id"].as_str().unwrap().to_string();
    let old_path = body["data"]["filePath"].as_str().unwrap().to_string();

    let (content_type, payload) = multipart(
        &[("title", "Slides v2")],
        Some(("week1.pptx", &b"pptx bytes"[..])),
    );
    let req = test::TestRequest::put()
        .uri(&format!("/api/materials/{}", id))
        .insert_header(("Authorization", bearer.clone()))
        .insert_header(("Content-Type", content_type))
        .set_payload(payload)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    let material = &body["data"];
    assert_eq!(material["title"], "Slides v2");
    assert_eq!(material["category"], "Networking");
    assert_eq!(material["type"], "PPT");
    assert_eq!(material["originalName"], "week1.pptx");
    let new_path = material["filePath"].as_str().unwrap();
    assert_ne!(new_path, old_path);
    assert!(ctx.upload_path(new_path).exists());
    assert!(!ctx.upload_path(&old_path).exists());
    assert_eq!(ctx.stored_uploads(), 1);

    let (content_type, payload) = multipart(&[("title", "Ghost")], Some(("ghost.pdf", PDF_BYTES)));
    let req = test::TestRequest::put()
        .uri("/api/materials/unknown")
        .insert_header(("Authorization", bearer))
        .insert_header(("Content-Type", content_type))
        .set_payload(payload)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(ctx.stored_uploads(), 1);
}

#[actix_rt::test]
async fn test_list_filters_by_category_and_type() {
    let ctx = TestContext::json().await;
    let bearer = ctx.admin_bearer().await;
    let app = init_app!(ctx);

    for (title, category, filename) in [
        ("ER Diagrams", "DBMS", "er.pdf"),
        ("SQL Slides", "DBMS", "sql.ppt"),
        ("Routing", "Networking", "routing.docx"),
    ] {
        let req = upload_request(
            "/api/materials",
            &bearer,
            &[("title", title), ("category", category)],
            Some((filename, PDF_BYTES)),
        )
        .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
    }

    let req = test::TestRequest::get().uri("/api/materials?category=DBMS").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["count"], 2);
    assert_eq!(body["data"][0]["title"], "SQL Slides");

    let req = test::TestRequest::get()
        .uri("/api/materials?category=DBMS&type=PDF")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["count"], 1);
    assert_eq!(body["data"][0]["title"], "ER Diagrams");

    let req = test::TestRequest::get().uri("/api/materials?category=All").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["count"], 3);
}
