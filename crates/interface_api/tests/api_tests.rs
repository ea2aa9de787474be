//! Integration tests for the HTTP API
//!
//! Each test runs the full router against a fresh data file and uploads
//! directory in a temporary directory.

use std::sync::Arc;

use axum::http::StatusCode;
use axum_test::multipart::{MultipartForm, Part};
use axum_test::TestServer;
use chrono::{Duration, TimeZone, Utc};
use serde_json::{json, Value};
use tempfile::TempDir;

use domain_casefile::{CaseFile, CaseFileService, CaseFileStore, CaseStatus, ClaimType, DocumentType};
use infra_store::{JsonCaseFileStore, LocalDocumentStorage};
use interface_api::{config::ApiConfig, create_router};
use test_utils::{CaseFileBuilder, DocumentFixtures};

struct TestApp {
    server: TestServer,
    store: Arc<JsonCaseFileStore>,
    _dir: TempDir,
}

async fn spawn_app_with(files: Vec<CaseFile>, max_upload_bytes: usize) -> TestApp {
    let dir = TempDir::new().unwrap();
    let config = ApiConfig {
        data_file: dir.path().join("database.json"),
        uploads_dir: dir.path().join("uploads"),
        max_upload_bytes,
        ..ApiConfig::default()
    };

    let store = Arc::new(JsonCaseFileStore::open(&config.data_file).await.unwrap());
    for file in files {
        store.create(file).await.unwrap();
    }
    let documents = Arc::new(LocalDocumentStorage::new(&config.uploads_dir).await.unwrap());

    let service = CaseFileService::new(store.clone(), documents)
        .with_upload_policy(config.upload_policy());
    let server = TestServer::new(create_router(Arc::new(service), config)).unwrap();

    TestApp {
        server,
        store,
        _dir: dir,
    }
}

async fn spawn_app(files: Vec<CaseFile>) -> TestApp {
    spawn_app_with(files, ApiConfig::default().max_upload_bytes).await
}

fn pdf_form(document_type: &str) -> MultipartForm {
    MultipartForm::new().add_text("type", document_type.to_string()).add_part(
        "document",
        Part::bytes(DocumentFixtures::pdf_bytes())
            .file_name("tutanak.pdf")
            .mime_type("application/pdf"),
    )
}

// ============================================================================
// Health Tests
// ============================================================================

mod health_tests {
    use super::*;

    #[tokio::test]
    async fn test_health_reports_version() {
        let app = spawn_app(vec![]).await;
        let response = app.server.get("/health").await;

        assert_eq!(response.status_code(), StatusCode::OK);
        let body: Value = response.json();
        assert_eq!(body["status"], "healthy");
        assert!(body["version"].is_string());
    }

    #[tokio::test]
    async fn test_readiness_checks_adapters() {
        let app = spawn_app(vec![]).await;
        let response = app.server.get("/health/ready").await;

        assert_eq!(response.status_code(), StatusCode::OK);
        let body: Value = response.json();
        assert_eq!(body["adapters"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_request_id_is_returned() {
        let app = spawn_app(vec![]).await;
        let response = app.server.get("/api/files").await;

        let request_id = response.header("x-request-id");
        assert!(!request_id.is_empty());
    }
}

// ============================================================================
// Case File Tests
// ============================================================================

mod case_file_tests {
    use super::*;

    #[tokio::test]
    async fn test_create_file_with_defaults() {
        let app = spawn_app(vec![]).await;

        let response = app
            .server
            .post("/api/files")
            .json(&json!({
                "clientName": "  Ayşe Kaya ",
                "plate": "06 XYZ 42",
                "fileTypes": ["Değer Kaybı", "İkame Araç Bedeli"],
                "insuranceApplicationDate": "2024-05-02",
                "id": "ignored"
            }))
            .await;

        assert_eq!(response.status_code(), StatusCode::CREATED);
        let body: Value = response.json();
        assert_eq!(body["success"], true);
        assert_eq!(body["file"]["clientName"], "Ayşe Kaya");
        assert_eq!(body["file"]["fileStatus"], "Başvuruya Hazır");
        assert_eq!(body["file"]["fileTypes"], json!(["Değer Kaybı", "İkame Araç Bedeli"]));
        assert_eq!(body["file"]["insuranceApplicationDate"], "2024-05-02");
        assert_eq!(body["file"]["badge"], "7 eksik");
        assert_ne!(body["file"]["id"], "ignored");

        assert_eq!(app.store.list_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_create_accepts_legacy_single_type() {
        let app = spawn_app(vec![]).await;

        let response = app
            .server
            .post("/api/files")
            .json(&json!({
                "clientName": "Ali",
                "plate": "35 K 1234",
                "fileType": "Pert Farkı"
            }))
            .await;

        assert_eq!(response.status_code(), StatusCode::CREATED);
        let body: Value = response.json();
        assert_eq!(body["file"]["fileTypes"], json!(["Pert Farkı"]));
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_input() {
        let app = spawn_app(vec![]).await;

        let blank_name = app
            .server
            .post("/api/files")
            .json(&json!({ "clientName": "", "plate": "34 A 1", "fileTypes": ["Diğer"] }))
            .await;
        assert_eq!(blank_name.status_code(), StatusCode::UNPROCESSABLE_ENTITY);

        let no_types = app
            .server
            .post("/api/files")
            .json(&json!({ "clientName": "Ali", "plate": "34 A 1" }))
            .await;
        assert_eq!(no_types.status_code(), StatusCode::UNPROCESSABLE_ENTITY);

        let bad_status = app
            .server
            .post("/api/files")
            .json(&json!({
                "clientName": "Ali",
                "plate": "34 A 1",
                "fileTypes": ["Diğer"],
                "fileStatus": "Arşiv"
            }))
            .await;
        assert_eq!(bad_status.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
        let body: Value = bad_status.json();
        assert_eq!(body["error"], "validation_error");

        assert!(app.store.list_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unreadable_body_gets_error_envelope() {
        let app = spawn_app(vec![]).await;

        let missing_field = app
            .server
            .post("/api/files")
            .json(&json!({ "plate": "34 A 1", "fileTypes": ["Diğer"] }))
            .await;
        assert_eq!(missing_field.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
        let body: Value = missing_field.json();
        assert_eq!(body["error"], "validation_error");
        assert!(body["message"].as_str().unwrap().contains("clientName"));

        let malformed = app
            .server
            .post("/api/files")
            .bytes("{ not json".into())
            .content_type("application/json")
            .await;
        assert_eq!(malformed.status_code(), StatusCode::BAD_REQUEST);
        let body: Value = malformed.json();
        assert_eq!(body["error"], "bad_request");

        let plain_text = app.server.post("/api/files").text("clientName=Ali").await;
        assert_eq!(plain_text.status_code(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
        let body: Value = plain_text.json();
        assert_eq!(body["error"], "unsupported_media_type");

        assert!(app.store.list_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_with_multiple_types_marker_keeps_tags() {
        let file = CaseFileBuilder::new()
            .with_claim_types(vec![ClaimType::DiminishedValue, ClaimType::ReplacementVehicle])
            .build();
        let id = file.id.to_string();
        let app = spawn_app(vec![file]).await;

        let response = app
            .server
            .put(&format!("/api/files/{}", id))
            .json(&json!({ "fileType": "Çoklu", "notes": "güncellendi" }))
            .await;

        assert_eq!(response.status_code(), StatusCode::OK);
        let body: Value = response.json();
        assert_eq!(body["file"]["fileTypes"], json!(["Değer Kaybı", "İkame Araç Bedeli"]));
        assert_eq!(body["file"]["notes"], "güncellendi");
    }

    #[tokio::test]
    async fn test_document_of_another_file_is_rejected() {
        let app = spawn_app(vec![]).await;

        let uploaded: Value = app
            .server
            .post("/api/upload")
            .multipart(pdf_form("Vekaletname"))
            .await
            .json();
        let document = uploaded["document"].clone();

        let first = app
            .server
            .post("/api/files")
            .json(&json!({
                "clientName": "Ayşe",
                "plate": "34 A 1",
                "fileTypes": ["Diğer"],
                "documents": [document.clone()]
            }))
            .await;
        assert_eq!(first.status_code(), StatusCode::CREATED);

        let second = app
            .server
            .post("/api/files")
            .json(&json!({
                "clientName": "Veli",
                "plate": "35 B 2",
                "fileTypes": ["Diğer"],
                "documents": [document]
            }))
            .await;
        assert_eq!(second.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
        let body: Value = second.json();
        assert_eq!(body["error"], "validation_error");
        assert_eq!(app.store.list_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_get_unknown_file_is_not_found() {
        let app = spawn_app(vec![]).await;
        let response = app.server.get("/api/files/does-not-exist").await;

        assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
        let body: Value = response.json();
        assert_eq!(body["error"], "not_found");
    }

    #[tokio::test]
    async fn test_list_uses_listing_order() {
        let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let closed = CaseFileBuilder::new()
            .with_client_name("Kapalı")
            .with_status(CaseStatus::Closed)
            .registered_at(base + Duration::days(30))
            .build();
        let pending = CaseFileBuilder::new()
            .with_client_name("Bekleyen")
            .with_status(CaseStatus::DocumentGatheringInProgress)
            .registered_at(base + Duration::days(20))
            .build();
        let old_ready = CaseFileBuilder::new()
            .with_client_name("Eski")
            .registered_at(base)
            .build();
        let new_ready = CaseFileBuilder::new()
            .with_client_name("Yeni")
            .registered_at(base + Duration::days(10))
            .build();
        let app = spawn_app(vec![closed, pending, old_ready, new_ready]).await;

        let body: Value = app.server.get("/api/files").await.json();
        let names: Vec<&str> = body
            .as_array()
            .unwrap()
            .iter()
            .map(|f| f["clientName"].as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["Yeni", "Eski", "Bekleyen", "Kapalı"]);
    }

    #[tokio::test]
    async fn test_search_is_case_insensitive() {
        let app = spawn_app(vec![
            CaseFileBuilder::new().with_client_name("Zeynep").with_plate("34 ABC 1").build(),
            CaseFileBuilder::new()
                .with_client_name("Murat")
                .with_plate("06 XYZ 2")
                .with_opponent("Kemal Arslan", "35 KM 77")
                .build(),
        ])
        .await;

        let by_plate: Value = app.server.get("/api/files/search").add_query_param("q", "abc").await.json();
        assert_eq!(by_plate.as_array().unwrap().len(), 1);
        assert_eq!(by_plate[0]["clientName"], "Zeynep");

        let by_opponent: Value = app.server.get("/api/files/search").add_query_param("q", "ARSLAN").await.json();
        assert_eq!(by_opponent.as_array().unwrap().len(), 1);
        assert_eq!(by_opponent[0]["clientName"], "Murat");

        let blank: Value = app.server.get("/api/files/search").add_query_param("q", "  ").await.json();
        assert_eq!(blank.as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_update_merges_and_clears_dates() {
        let file = CaseFileBuilder::new()
            .with_notes("ilk not")
            .with_insurance_application_date(test_utils::TemporalFixtures::insurance_application())
            .build();
        let id = file.id.to_string();
        let app = spawn_app(vec![file]).await;

        let response = app
            .server
            .put(&format!("/api/files/{}", id))
            .json(&json!({
                "fileStatus": "Tahkimde",
                "insuranceApplicationDate": ""
            }))
            .await;

        assert_eq!(response.status_code(), StatusCode::OK);
        let body: Value = response.json();
        assert_eq!(body["success"], true);
        assert_eq!(body["file"]["fileStatus"], "Tahkimde");
        assert_eq!(body["file"]["notes"], "ilk not");
        assert!(body["file"].get("insuranceApplicationDate").is_none());
        assert_eq!(body["file"]["id"], id.as_str());
    }

    #[tokio::test]
    async fn test_delete_file() {
        let file = CaseFileBuilder::new().build();
        let id = file.id.to_string();
        let app = spawn_app(vec![file]).await;

        let response = app.server.delete(&format!("/api/files/{}", id)).await;
        assert_eq!(response.status_code(), StatusCode::OK);
        let body: Value = response.json();
        assert_eq!(body["success"], true);

        let again = app.server.get(&format!("/api/files/{}", id)).await;
        assert_eq!(again.status_code(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_missing_documents_report() {
        let file = CaseFileBuilder::new()
            .with_document(DocumentType::AccidentReport)
            .with_document(DocumentType::General)
            .build();
        let id = file.id.to_string();
        let app = spawn_app(vec![file]).await;

        let body: Value = app
            .server
            .get(&format!("/api/files/{}/missing-documents", id))
            .await
            .json();

        assert_eq!(body["fileId"], id.as_str());
        assert_eq!(body["missing"].as_array().unwrap().len(), 6);
        assert_eq!(body["missing"][0], "Araç Fotoğrafları");
        assert_eq!(body["badge"], "6 eksik");
        assert_eq!(body["completeness"]["state"], "missing");
    }
}

// ============================================================================
// Workflow Tests
// ============================================================================

mod workflow_tests {
    use super::*;

    #[tokio::test]
    async fn test_mark_ready_closes_empty_view() {
        let file = CaseFileBuilder::new()
            .with_status(CaseStatus::DocumentGatheringInProgress)
            .build();
        let id = file.id.to_string();
        let app = spawn_app(vec![file]).await;

        let response = app.server.post(&format!("/api/files/{}/mark-ready", id)).await;

        assert_eq!(response.status_code(), StatusCode::OK);
        let body: Value = response.json();
        assert_eq!(body["file"]["fileStatus"], "Başvuruya Hazır");
        assert_eq!(body["closeView"], true);
        assert_eq!(body["statistics"]["readyFilesCount"], 1);
        assert_eq!(body["statistics"]["pendingFilesCount"], 0);
    }

    #[tokio::test]
    async fn test_mark_applied_keeps_view_open_while_files_remain() {
        let first = CaseFileBuilder::new().build();
        let second = CaseFileBuilder::new().build();
        let id = first.id.to_string();
        let app = spawn_app(vec![first, second]).await;

        let body: Value = app
            .server
            .post(&format!("/api/files/{}/mark-applied", id))
            .await
            .json();

        assert_eq!(body["file"]["fileStatus"], "Başvuru Yapıldı");
        assert_eq!(body["closeView"], false);

        let ready: Value = app.server.get("/api/files/ready").await.json();
        assert_eq!(ready.as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_transition_from_wrong_status_conflicts() {
        let file = CaseFileBuilder::new().with_status(CaseStatus::Closed).build();
        let id = file.id.to_string();
        let app = spawn_app(vec![file]).await;

        let ready = app.server.post(&format!("/api/files/{}/mark-ready", id)).await;
        assert_eq!(ready.status_code(), StatusCode::CONFLICT);

        let applied = app.server.post(&format!("/api/files/{}/mark-applied", id)).await;
        assert_eq!(applied.status_code(), StatusCode::CONFLICT);

        let stored = app.store.list_all().await.unwrap();
        assert_eq!(stored[0].status, CaseStatus::Closed);
    }

    #[tokio::test]
    async fn test_pending_view() {
        let app = spawn_app(vec![
            CaseFileBuilder::new().with_status(CaseStatus::DocumentGatheringInProgress).build(),
            CaseFileBuilder::new().with_status(CaseStatus::InEnforcement).build(),
        ])
        .await;

        let body: Value = app.server.get("/api/files/pending").await.json();
        assert_eq!(body.as_array().unwrap().len(), 1);
        assert_eq!(body[0]["fileStatus"], "Evrak Tedarik Aşamasında");
    }
}

// ============================================================================
// Statistics Tests
// ============================================================================

mod stats_tests {
    use super::*;

    #[tokio::test]
    async fn test_stats_count_every_key() {
        let app = spawn_app(vec![
            CaseFileBuilder::new()
                .with_claim_types(vec![ClaimType::DiminishedValue, ClaimType::ReplacementVehicle])
                .build(),
            CaseFileBuilder::new()
                .with_claim_types(vec![ClaimType::DiminishedValue])
                .with_status(CaseStatus::DocumentGatheringInProgress)
                .build(),
        ])
        .await;

        let body: Value = app.server.get("/api/stats").await.json();

        assert_eq!(body["totalFiles"], 2);
        assert_eq!(body["typeStats"]["Değer Kaybı"], 2);
        assert_eq!(body["typeStats"]["İkame Araç Bedeli"], 1);
        assert_eq!(body["typeStats"]["İcra Takibi"], 0);
        assert_eq!(body["statusStats"]["Kapandı"], 0);
        assert_eq!(body["readyFilesCount"], 1);
        assert_eq!(body["pendingFilesCount"], 1);
        assert_eq!(body["statusStats"].as_object().unwrap().len(), 6);
    }
}

// ============================================================================
// Document Tests
// ============================================================================

mod document_tests {
    use super::*;

    #[tokio::test]
    async fn test_attach_download_and_remove() {
        let file = CaseFileBuilder::new().build();
        let id = file.id.to_string();
        let app = spawn_app(vec![file]).await;

        let response = app
            .server
            .post(&format!("/api/files/{}/documents", id))
            .multipart(pdf_form("Vekaletname"))
            .await;

        assert_eq!(response.status_code(), StatusCode::CREATED);
        let body: Value = response.json();
        let document = &body["file"]["documents"][0];
        assert_eq!(document["type"], "Vekaletname");
        assert_eq!(document["originalname"], "tutanak.pdf");
        assert_eq!(document["mimetype"], "application/pdf");
        assert_eq!(body["file"]["badge"], "6 eksik");

        let filename = document["filename"].as_str().unwrap().to_string();
        assert!(filename.ends_with(".pdf"));
        assert_eq!(document["path"], format!("/uploads/{}", filename));

        let download = app.server.get(&format!("/api/download/{}", filename)).await;
        assert_eq!(download.status_code(), StatusCode::OK);
        assert_eq!(download.as_bytes().to_vec(), DocumentFixtures::pdf_bytes());
        assert!(download
            .header("content-disposition")
            .to_str()
            .unwrap()
            .starts_with("attachment"));

        let view = app.server.get(&format!("/api/view/{}", filename)).await;
        assert_eq!(view.header("content-type"), "application/pdf");
        assert!(view.header("content-disposition").to_str().unwrap().starts_with("inline"));

        let public = app.server.get(&format!("/uploads/{}", filename)).await;
        assert_eq!(public.status_code(), StatusCode::OK);

        let doc_id = document["id"].as_str().unwrap();
        let removed = app
            .server
            .delete(&format!("/api/files/{}/documents/{}", id, doc_id))
            .await;
        assert_eq!(removed.status_code(), StatusCode::OK);
        let body: Value = removed.json();
        assert_eq!(body["file"]["documents"], json!([]));

        let gone = app.server.get(&format!("/api/download/{}", filename)).await;
        assert_eq!(gone.status_code(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_standalone_upload() {
        let app = spawn_app(vec![]).await;

        let response = app.server.post("/api/upload").multipart(pdf_form("Ekspertiz Raporu")).await;

        assert_eq!(response.status_code(), StatusCode::OK);
        let body: Value = response.json();
        assert_eq!(body["success"], true);
        assert_eq!(body["document"]["type"], "Ekspertiz Raporu");
        assert_eq!(body["document"]["size"], DocumentFixtures::pdf_bytes().len());
    }

    #[tokio::test]
    async fn test_unknown_type_label_stored_as_generic() {
        let app = spawn_app(vec![]).await;

        let body: Value = app.server.post("/api/upload").multipart(pdf_form("Fatura")).await.json();
        assert_eq!(body["document"]["type"], "Belge");
    }

    #[tokio::test]
    async fn test_upload_without_file_is_bad_request() {
        let app = spawn_app(vec![]).await;

        let form = MultipartForm::new().add_text("type", "Vekaletname");
        let response = app.server.post("/api/upload").multipart(form).await;

        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_disallowed_media_type_rejected() {
        let file = CaseFileBuilder::new().build();
        let id = file.id.to_string();
        let app = spawn_app(vec![file]).await;

        let form = MultipartForm::new().add_part(
            "document",
            Part::bytes(b"MZ\x90\x00".to_vec())
                .file_name("setup.exe")
                .mime_type("application/x-msdownload"),
        );
        let response = app
            .server
            .post(&format!("/api/files/{}/documents", id))
            .multipart(form)
            .await;

        assert_eq!(response.status_code(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
        assert!(app.store.list_all().await.unwrap()[0].documents.is_empty());
    }

    #[tokio::test]
    async fn test_oversized_upload_rejected() {
        let file = CaseFileBuilder::new().build();
        let id = file.id.to_string();
        let app = spawn_app_with(vec![file], 8).await;

        let response = app
            .server
            .post(&format!("/api/files/{}/documents", id))
            .multipart(pdf_form("Vekaletname"))
            .await;

        assert_eq!(response.status_code(), StatusCode::PAYLOAD_TOO_LARGE);
        assert!(app.store.list_all().await.unwrap()[0].documents.is_empty());
    }

    #[tokio::test]
    async fn test_attach_to_unknown_file_is_not_found() {
        let app = spawn_app(vec![]).await;

        let response = app
            .server
            .post("/api/files/missing/documents")
            .multipart(pdf_form("Vekaletname"))
            .await;

        assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_download_rejects_path_traversal() {
        let app = spawn_app(vec![]).await;

        let response = app.server.get("/api/download/..%2Fdatabase.json").await;

        assert!(response.status_code().is_client_error());
    }
}
