//! Serve command - HTTP upload endpoint for statement parsing.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::{DefaultBodyLimit, Multipart, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use clap::Args;
use tower_http::cors::CorsLayer;
use tracing::{error, info};

use cardstmt_core::models::config::DecodeConfig;
use cardstmt_core::{decoder_for, DocumentKind, ExtractionResult, StatementError, StatementExtractor};

/// Maximum accepted upload size.
pub const MAX_UPLOAD_SIZE: usize = 10 * 1024 * 1024;

/// Multipart field carrying the statement file.
const UPLOAD_FIELD: &str = "statement";

/// Arguments for the serve command.
#[derive(Args)]
pub struct ServeArgs {
    /// Address to bind
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Port to listen on
    #[arg(short, long, default_value = "5000")]
    port: u16,
}

/// Shared state for the upload server.
#[derive(Clone)]
pub struct AppState {
    pub extractor: Arc<StatementExtractor>,
    pub decode: DecodeConfig,
}

/// Error response carrying a single user-facing message.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }
}

impl From<StatementError> for ApiError {
    fn from(err: StatementError) -> Self {
        let status = match err {
            StatementError::Decode(_) | StatementError::UnsupportedIssuer => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            StatementError::Config(_) | StatementError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self::new(status, err.user_message())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(serde_json::json!({ "error": self.message }))).into_response()
    }
}

pub async fn run(args: ServeArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = super::load_config(config_path)?;
    let state = AppState {
        extractor: Arc::new(StatementExtractor::new(&config)?),
        decode: config.decode.clone(),
    };

    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    info!("Starting server at http://{}", addr);
    eprintln!("Server running on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, create_router(state)).await?;

    Ok(())
}

/// Create the router with all routes.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/api/upload", post(upload_statement))
        .route("/api/health", get(|| async { "ok" }))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_SIZE + 64 * 1024))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// POST /api/upload - parse one uploaded statement
async fn upload_statement(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ExtractionResult>, ApiError> {
    let mut file_data = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::new(e.status(), e.body_text()))?
    {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }

        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::new(e.status(), e.body_text()))?;

        if bytes.len() > MAX_UPLOAD_SIZE {
            return Err(ApiError::new(
                StatusCode::PAYLOAD_TOO_LARGE,
                format!("File too large. Maximum size is {} MB", MAX_UPLOAD_SIZE / 1024 / 1024),
            ));
        }

        file_data = Some(bytes);
    }

    let data = file_data
        .filter(|d| !d.is_empty())
        .ok_or_else(|| ApiError::new(StatusCode::BAD_REQUEST, "No file uploaded."))?;

    info!("Received statement upload ({} bytes)", data.len());

    let extractor = Arc::clone(&state.extractor);
    let decode = state.decode.clone();
    let result = tokio::task::spawn_blocking(move || {
        let decoder = decoder_for(DocumentKind::sniff(&data), &decode).map_err(StatementError::from)?;
        extractor.parse_document(decoder.as_ref(), &data)
    })
    .await
    .map_err(|e| {
        error!("Extraction task failed: {}", e);
        ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "Failed to parse the document.")
    })?;

    match result {
        Ok(result) => Ok(Json(result)),
        Err(e) => {
            error!("Error parsing statement: {}", e);
            Err(e.into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use cardstmt_core::StatementConfig;
    use pretty_assertions::assert_eq;
    use tower::ServiceExt;

    const BOUNDARY: &str = "cardstmt-test-boundary";

    fn app(config: &StatementConfig) -> Router {
        create_router(AppState {
            extractor: Arc::new(StatementExtractor::new(config).unwrap()),
            decode: config.decode.clone(),
        })
    }

    fn multipart_request(field: &str, filename: &str, content: &[u8]) -> Request<Body> {
        let mut body = Vec::new();
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
                field, filename
            )
            .as_bytes(),
        );
        body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
        body.extend_from_slice(content);
        body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());

        Request::builder()
            .method("POST")
            .uri("/api/upload")
            .header(
                "content-type",
                format!("multipart/form-data; boundary={}", BOUNDARY),
            )
            .body(Body::from(body))
            .unwrap()
    }

    async fn json_body(response: Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_upload_text_statement() {
        let statement = b"ICICI Bank\nPayment Due Date 05-Jan-2025\nTotal Amount Due INR 15,250.00\nCard Number ending 4321\n";
        let response = app(&StatementConfig::default())
            .oneshot(multipart_request("statement", "statement.txt", statement))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = json_body(response).await;
        assert_eq!(json["issuer"], "ICICI");
        assert_eq!(json["totalDue"], "15250.00");
        assert_eq!(json["confidence"], "3/5 fields found");
    }

    #[tokio::test]
    async fn test_missing_file_field() {
        let response = app(&StatementConfig::default())
            .oneshot(multipart_request("other", "x.txt", b"ICICI Bank Total Due 1.00"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["error"], "No file uploaded.");
    }

    #[tokio::test]
    async fn test_corrupt_pdf_is_single_error() {
        let response = app(&StatementConfig::default())
            .oneshot(multipart_request("statement", "s.pdf", b"%PDF-1.4 garbage"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let json = json_body(response).await;
        assert_eq!(
            json,
            serde_json::json!({
                "error": "Failed to parse the document. It may be corrupted or protected."
            })
        );
    }

    #[tokio::test]
    async fn test_strict_mode_rejects_unknown_issuer() {
        let mut config = StatementConfig::default();
        config.extraction.require_known_issuer = true;

        let response = app(&config)
            .oneshot(multipart_request("statement", "s.txt", b"Acme Card\nTotal Due: 99.00\n"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let json = json_body(response).await;
        assert!(json["error"].as_str().unwrap().starts_with("Unsupported statement"));
    }

    #[tokio::test]
    async fn test_health() {
        let response = app(&StatementConfig::default())
            .oneshot(
                Request::builder()
                    .uri("/api/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }
}
