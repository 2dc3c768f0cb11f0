// HTTP response utilities for JSON+Brotli encoding
use crate::domain::error::AnalysisError;
use async_compression::tokio::bufread::BrotliEncoder;
use axum::{
    body::Body,
    http::{header, HeaderMap, HeaderValue, Response, StatusCode},
    response::IntoResponse,
};
use serde::Serialize;
use tokio::io::AsyncReadExt;

/// Whether the client advertised Brotli support with a non-zero quality.
pub fn accepts_brotli(headers: &HeaderMap) -> bool {
    headers
        .get_all(header::ACCEPT_ENCODING)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(','))
        .any(|token| {
            let mut params = token.split(';').map(str::trim);
            let coding = params.next().unwrap_or_default();
            coding.eq_ignore_ascii_case("br") && quality(params) > 0.0
        })
}

/// The `q` parameter of an encoding token; 1 when absent, 0 when malformed.
fn quality<'a>(mut params: impl Iterator<Item = &'a str>) -> f32 {
    params
        .find_map(|p| p.strip_prefix("q=").or_else(|| p.strip_prefix("Q=")))
        .map(|q| q.trim().parse().unwrap_or(0.0))
        .unwrap_or(1.0)
}

/// Serialize to JSON and optionally compress with Brotli
pub async fn json_response<T: Serialize>(
    status: StatusCode,
    data: &T,
    compress: bool,
) -> Result<Response<Body>, StatusCode> {
    let json_bytes = serde_json::to_vec(data).map_err(|e| {
        tracing::error!("JSON serialization error: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    let (body_bytes, content_encoding) = if compress {
        let mut encoder = BrotliEncoder::new(json_bytes.as_slice());
        let mut compressed = Vec::new();
        encoder.read_to_end(&mut compressed).await.map_err(|e| {
            tracing::error!("Brotli compression error: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?;
        tracing::debug!(
            "Compressed: {} -> {} bytes",
            json_bytes.len(),
            compressed.len()
        );
        (compressed, Some("br"))
    } else {
        (json_bytes, None)
    };

    let mut response_builder = Response::builder()
        .status(status)
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::CONTENT_LENGTH, HeaderValue::from(body_bytes.len()));

    if let Some(encoding) = content_encoding {
        response_builder = response_builder.header(header::CONTENT_ENCODING, encoding);
    }

    response_builder.body(Body::from(body_bytes)).map_err(|e| {
        tracing::error!("Response build error: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })
}

/// A successful JSON payload, or the status code if encoding failed.
pub async fn ok_response<T: Serialize>(data: &T, compress: bool) -> Response<Body> {
    match json_response(StatusCode::OK, data, compress).await {
        Ok(response) => response,
        Err(status) => status.into_response(),
    }
}

pub fn status_for(error: &anyhow::Error) -> StatusCode {
    match error.downcast_ref::<AnalysisError>() {
        Some(AnalysisError::NotFound { .. }) => StatusCode::NOT_FOUND,
        Some(AnalysisError::Validation(_)) | Some(AnalysisError::DateParse { .. }) => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

/// Render an error as `{"error": "..."}` with a matching status.
pub async fn error_response(error: anyhow::Error, compress: bool) -> Response<Body> {
    let status = status_for(&error);
    if status == StatusCode::INTERNAL_SERVER_ERROR {
        tracing::error!("Request failed: {:#}", error);
    } else {
        tracing::debug!("Request rejected: {}", error);
    }
    let body = ErrorBody {
        error: error.to_string(),
    };
    match json_response(status, &body, compress).await {
        Ok(response) => response,
        Err(status) => status.into_response(),
    }
}

/// Collapse a service result into a response.
pub async fn result_response<T: Serialize>(
    result: anyhow::Result<T>,
    compress: bool,
) -> Response<Body> {
    match result {
        Ok(data) => ok_response(&data, compress).await,
        Err(e) => error_response(e, compress).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let not_found = anyhow::Error::from(AnalysisError::not_found("equipment", "42"));
        assert_eq!(status_for(&not_found), StatusCode::NOT_FOUND);

        let invalid = anyhow::Error::from(AnalysisError::Validation("bad".to_string()));
        assert_eq!(status_for(&invalid), StatusCode::UNPROCESSABLE_ENTITY);

        let date = anyhow::Error::from(AnalysisError::date_parse("nope", "invalid"));
        assert_eq!(status_for(&date), StatusCode::UNPROCESSABLE_ENTITY);

        assert_eq!(
            status_for(&anyhow::anyhow!("lock poisoned")),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_accepts_brotli() {
        let mut headers = HeaderMap::new();
        assert!(!accepts_brotli(&headers));
        headers.insert(header::ACCEPT_ENCODING, HeaderValue::from_static("gzip, br"));
        assert!(accepts_brotli(&headers));

        let accepts = |value: &'static str| {
            let mut headers = HeaderMap::new();
            headers.insert(header::ACCEPT_ENCODING, HeaderValue::from_static(value));
            accepts_brotli(&headers)
        };
        assert!(accepts("BR"));
        assert!(accepts("gzip;q=1.0, br;q=0.5"));
        assert!(!accepts("br;q=0"));
        assert!(!accepts("gzip, br; q=0.0"));
        assert!(!accepts("br;q=abc"));
        assert!(!accepts("brotli, gzip"));
    }

    #[tokio::test]
    async fn test_plain_json_response() {
        let response = json_response(StatusCode::OK, &vec![1, 2, 3], false)
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().get(header::CONTENT_ENCODING).is_none());
        assert_eq!(response.headers()[header::CONTENT_LENGTH], "7");
    }

    #[tokio::test]
    async fn test_compressed_response() {
        let payload: Vec<String> = (0..200).map(|i| format!("reading-{}", i)).collect();
        let response = json_response(StatusCode::OK, &payload, true).await.unwrap();
        assert_eq!(response.headers()[header::CONTENT_ENCODING], "br");
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert!(bytes.len() < serde_json::to_vec(&payload).unwrap().len());
    }

    #[tokio::test]
    async fn test_error_body() {
        let response = error_response(
            AnalysisError::not_found("livestock", "7").into(),
            false,
        )
        .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["error"], "livestock '7' not found");
    }
}
