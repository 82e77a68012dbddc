use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::{json, Value};

use super::domain::{AgreementRecord, DocumentKind};
use super::drafts::{DraftError, DraftRepository};
use super::export::{ExportError, ExportFormat};
use super::service::DocumentService;
use crate::error::AppError;

/// Router builder exposing preview, export, draft and clause endpoints.
pub fn document_router<D>(service: Arc<DocumentService<D>>) -> Router
where
    D: DraftRepository + 'static,
{
    Router::new()
        .route("/api/v1/clauses", get(clauses_handler::<D>))
        .route(
            "/api/v1/documents/:kind/preview",
            post(preview_handler::<D>),
        )
        .route("/api/v1/documents/:kind/export", post(export_handler::<D>))
        .route(
            "/api/v1/drafts/:kind",
            get(load_draft_handler::<D>)
                .put(save_draft_handler::<D>)
                .delete(clear_draft_handler::<D>),
        )
        .route("/api/v1/exports/pending", get(pending_handler::<D>))
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub(crate) struct ExportQuery {
    #[serde(default)]
    format: Option<String>,
}

fn resolve_kind(raw: &str) -> Result<DocumentKind, AppError> {
    DocumentKind::from_slug(raw).ok_or_else(|| AppError::UnknownKind(raw.to_string()))
}

fn parse_record(raw_kind: &str, body: Value) -> Result<AgreementRecord, AppError> {
    let kind = resolve_kind(raw_kind)?;
    Ok(AgreementRecord::from_json_value(kind, body)?)
}

pub(crate) async fn clauses_handler<D>(State(service): State<Arc<DocumentService<D>>>) -> Response
where
    D: DraftRepository + 'static,
{
    (StatusCode::OK, axum::Json(service.clause_library())).into_response()
}

pub(crate) async fn preview_handler<D>(
    State(service): State<Arc<DocumentService<D>>>,
    Path(kind): Path<String>,
    axum::Json(body): axum::Json<Value>,
) -> Result<Response, AppError>
where
    D: DraftRepository + 'static,
{
    let record = parse_record(&kind, body)?;
    Ok((StatusCode::OK, axum::Json(service.preview(&record))).into_response())
}

pub(crate) async fn export_handler<D>(
    State(service): State<Arc<DocumentService<D>>>,
    Path(kind): Path<String>,
    Query(query): Query<ExportQuery>,
    axum::Json(body): axum::Json<Value>,
) -> Result<Response, AppError>
where
    D: DraftRepository + 'static,
{
    let record = parse_record(&kind, body)?;
    let format = query
        .format
        .as_deref()
        .unwrap_or("pdf")
        .parse::<ExportFormat>()?;

    // Rendering is CPU-bound; keep it off the async workers.
    let artifact = tokio::task::spawn_blocking(move || service.export(&record, format))
        .await
        .map_err(ExportError::from)??;

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, artifact.content_type.to_string()),
            (header::CONTENT_DISPOSITION, artifact.content_disposition()),
        ],
        artifact.bytes,
    )
        .into_response())
}

pub(crate) async fn load_draft_handler<D>(
    State(service): State<Arc<DocumentService<D>>>,
    Path(kind): Path<String>,
) -> Result<Response, AppError>
where
    D: DraftRepository + 'static,
{
    let kind = resolve_kind(&kind)?;
    let record = service
        .load_draft(kind)?
        .ok_or(AppError::DraftNotFound(kind))?;
    let body = record.to_json_value().map_err(DraftError::from)?;

    let payload = json!({ "key": kind.draft_key(), "data": body });
    Ok((StatusCode::OK, axum::Json(payload)).into_response())
}

pub(crate) async fn save_draft_handler<D>(
    State(service): State<Arc<DocumentService<D>>>,
    Path(kind): Path<String>,
    axum::Json(body): axum::Json<Value>,
) -> Result<StatusCode, AppError>
where
    D: DraftRepository + 'static,
{
    let record = parse_record(&kind, body)?;
    service.save_draft(&record)?;
    Ok(StatusCode::NO_CONTENT)
}

pub(crate) async fn clear_draft_handler<D>(
    State(service): State<Arc<DocumentService<D>>>,
    Path(kind): Path<String>,
) -> Result<StatusCode, AppError>
where
    D: DraftRepository + 'static,
{
    service.clear_draft(resolve_kind(&kind)?)?;
    Ok(StatusCode::NO_CONTENT)
}

pub(crate) async fn pending_handler<D>(State(service): State<Arc<DocumentService<D>>>) -> Response
where
    D: DraftRepository + 'static,
{
    let payload = json!({ "pending_exports": service.pending_exports() });
    (StatusCode::OK, axum::Json(payload)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::documents::drafts::InMemoryDraftRepository;
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    fn router() -> Router {
        document_router(Arc::new(DocumentService::new(
            InMemoryDraftRepository::default(),
        )))
    }

    fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(&body).expect("encode body")))
            .expect("request")
    }

    async fn read_json(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("read body");
        serde_json::from_slice(&bytes).expect("json body")
    }

    fn tenancy_body() -> Value {
        json!({
            "dateOfAgreement": "2025-06-03",
            "landlordName": "Akosua Mensah",
            "tenantName": "Kwame Boateng",
            "rentAmount": 500,
            "rentFrequency": "Month",
            "durationValue": 1,
            "durationUnit": "Years",
            "customClauses": ["No pets."]
        })
    }

    #[tokio::test]
    async fn clause_library_lists_categories() {
        let response = router()
            .oneshot(
                Request::get("/api/v1/clauses")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);
        let body = read_json(response).await;
        assert_eq!(body.as_array().map(Vec::len), Some(4));
        assert_eq!(body[0]["name"], "Restrictions & Rules");
    }

    #[tokio::test]
    async fn preview_returns_canonical_text() {
        let response = router()
            .oneshot(json_request(
                "POST",
                "/api/v1/documents/tenancy/preview",
                tenancy_body(),
            ))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);

        let body = read_json(response).await;
        let text = body["text"].as_str().expect("text");
        assert!(text.starts_with("TENANCY AGREEMENT\n"));
        assert!(text.contains("4. ADDITIONAL TERMS"));
        assert_eq!(body["preview"]["elements"][0]["role"], "title");
    }

    #[tokio::test]
    async fn export_docx_is_an_attachment() {
        let response = router()
            .oneshot(json_request(
                "POST",
                "/api/v1/documents/tenancy/export?format=docx",
                tenancy_body(),
            ))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"Tenancy_Agreement_Kwame Boateng.docx\"; filename*=UTF-8''Tenancy_Agreement_Kwame%20Boateng.docx"
        );
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("read body");
        assert_eq!(&bytes[..2], b"PK");
    }

    #[tokio::test]
    async fn export_header_carries_non_ascii_names() {
        let response = router()
            .oneshot(json_request(
                "POST",
                "/api/v1/documents/vehicle-transfer/export?format=pdf",
                json!({ "buyerName": "Ɛfua Ɔwusu", "totalPrice": 1000 }),
            ))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);
        let disposition = response.headers()[header::CONTENT_DISPOSITION]
            .to_str()
            .expect("ascii header");
        assert!(disposition.contains("filename=\"Vehicle_Transfer_Agreement__fua _wusu.pdf\""));
        assert!(disposition
            .ends_with("filename*=UTF-8''Vehicle_Transfer_Agreement_%C6%90fua%20%C6%86wusu.pdf"));
    }

    #[tokio::test]
    async fn export_print_is_inline_html() {
        let response = router()
            .oneshot(json_request(
                "POST",
                "/api/v1/documents/vehicle-transfer/export?format=print",
                json!({ "buyerName": "Efua Owusu", "totalPrice": 1000 }),
            ))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "text/html; charset=utf-8"
        );
        let disposition = response.headers()[header::CONTENT_DISPOSITION]
            .to_str()
            .expect("ascii header");
        assert!(disposition.starts_with("inline;"));
    }

    #[tokio::test]
    async fn unknown_kind_and_format_are_rejected() {
        let response = router()
            .oneshot(json_request(
                "POST",
                "/api/v1/documents/lease/preview",
                json!({}),
            ))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            read_json(response).await["error"],
            "unknown document kind `lease`"
        );

        let response = router()
            .oneshot(json_request(
                "POST",
                "/api/v1/documents/tenancy/export?format=rtf",
                tenancy_body(),
            ))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            read_json(response).await["error"],
            "unknown export format `rtf`"
        );
    }

    #[tokio::test]
    async fn invalid_record_is_unprocessable() {
        let response = router()
            .oneshot(json_request(
                "POST",
                "/api/v1/documents/tenancy/preview",
                json!({ "rentAmount": "a lot" }),
            ))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let message = read_json(response).await["error"]
            .as_str()
            .map(str::to_string)
            .expect("error message");
        assert!(message.starts_with("invalid record:"), "{message}");
    }

    #[tokio::test]
    async fn unknown_kind_is_rejected_on_every_route() {
        let router = router();
        let requests = [
            json_request("PUT", "/api/v1/drafts/lease", tenancy_body()),
            json_request("POST", "/api/v1/documents/lease/export", tenancy_body()),
            Request::get("/api/v1/drafts/lease")
                .body(Body::empty())
                .expect("request"),
            Request::delete("/api/v1/drafts/lease")
                .body(Body::empty())
                .expect("request"),
        ];
        for request in requests {
            let response = router.clone().oneshot(request).await.expect("response");
            assert_eq!(response.status(), StatusCode::NOT_FOUND);
        }
    }

    #[tokio::test]
    async fn drafts_round_trip_over_http() {
        let router = router();

        let missing = router
            .clone()
            .oneshot(
                Request::get("/api/v1/drafts/tenancy")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);
        assert_eq!(read_json(missing).await["error"], "no draft saved");

        let saved = router
            .clone()
            .oneshot(json_request("PUT", "/api/v1/drafts/tenancy", tenancy_body()))
            .await
            .expect("response");
        assert_eq!(saved.status(), StatusCode::NO_CONTENT);

        let loaded = router
            .clone()
            .oneshot(
                Request::get("/api/v1/drafts/tenancy")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");
        assert_eq!(loaded.status(), StatusCode::OK);
        let body = read_json(loaded).await;
        assert_eq!(body["key"], "legal_doc_draft_tenancy");
        assert_eq!(body["data"]["tenantName"], "Kwame Boateng");

        let cleared = router
            .clone()
            .oneshot(
                Request::delete("/api/v1/drafts/tenancy")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");
        assert_eq!(cleared.status(), StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn pending_exports_idle_at_zero() {
        let response = router()
            .oneshot(
                Request::get("/api/v1/exports/pending")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");
        let body = read_json(response).await;
        assert_eq!(body["pending_exports"], 0);
    }
}
