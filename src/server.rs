//! # HTTP Server
//!
//! Thin HTTP/1 transport over [`LabelService`]. Every API response is a JSON
//! envelope: `{"status":"success","data":...}` or `{"status":"error","message":...}`.

use std::convert::Infallible;
use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use http_body_util::{BodyExt, Full, LengthLimitError, Limited};
use hyper::body::{Bytes, Incoming};
use hyper::header::{HeaderValue, CONTENT_TYPE};
use hyper::server::conn::http1;
use hyper::{Method, Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use metrics_exporter_prometheus::PrometheusHandle;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::net::TcpListener;
use tracing::Instrument;

use crate::config::ServerConfig;
use crate::errors::{error_logging, LabelResult};
use crate::observability;
use crate::product::ProductRequest;
use crate::service::{AnalyzeCompoundRequest, CheckIngredientRequest, LabelService};

/// Response envelope shared by all API routes
#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ApiResponse<T: Serialize> {
    Success { data: T },
    Error { message: String },
}

/// Shared state of the accept loop
#[derive(Clone)]
struct ServerState {
    service: Arc<LabelService>,
    max_body_bytes: usize,
    metrics: Option<PrometheusHandle>,
}

type HttpResponse = Response<Full<Bytes>>;

fn json_response<T: Serialize>(status: StatusCode, payload: &ApiResponse<T>) -> HttpResponse {
    match serde_json::to_vec(payload) {
        Ok(body) => {
            let mut response = Response::new(Full::new(Bytes::from(body)));
            *response.status_mut() = status;
            response.headers_mut().insert(
                CONTENT_TYPE,
                HeaderValue::from_static("application/json; charset=utf-8"),
            );
            response
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to serialize response");
            text_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error".to_string())
        }
    }
}

fn text_response(status: StatusCode, body: String) -> HttpResponse {
    let mut response = Response::new(Full::new(Bytes::from(body)));
    *response.status_mut() = status;
    response.headers_mut().insert(
        CONTENT_TYPE,
        HeaderValue::from_static("text/plain; charset=utf-8"),
    );
    response
}

/// JSON error envelope with the given status
pub fn error_response(status: StatusCode, message: impl Into<String>) -> HttpResponse {
    json_response::<()>(
        status,
        &ApiResponse::Error {
            message: message.into(),
        },
    )
}

fn label_response<T: Serialize>(result: LabelResult<T>) -> HttpResponse {
    match result {
        Ok(data) => json_response(StatusCode::OK, &ApiResponse::Success { data }),
        Err(err) if err.is_client_error() => error_response(StatusCode::BAD_REQUEST, err.to_string()),
        Err(err) => error_response(StatusCode::INTERNAL_SERVER_ERROR, err.to_string()),
    }
}

fn parse_body<T: DeserializeOwned>(path: &str, body: &[u8]) -> Result<T, HttpResponse> {
    serde_json::from_slice(body).map_err(|e| {
        error_logging::log_validation_error(&e, "parse_body", path, None);
        error_response(StatusCode::BAD_REQUEST, format!("Invalid JSON body: {}", e))
    })
}

/// Dispatch one fully-read request
pub fn route(
    service: &LabelService,
    method: &Method,
    path: &str,
    body: &[u8],
    metrics: Option<&PrometheusHandle>,
) -> HttpResponse {
    match (method, path) {
        (&Method::POST, "/api/check-ingredient") => {
            match parse_body::<CheckIngredientRequest>(path, body) {
                Ok(request) => {
                    label_response(service.check_ingredient(request.name.as_deref().unwrap_or("")))
                }
                Err(response) => response,
            }
        }
        (&Method::POST, "/api/analyze-compound") => {
            match parse_body::<AnalyzeCompoundRequest>(path, body) {
                Ok(request) => label_response(
                    service.analyze_compound(request.details.as_deref().unwrap_or("")),
                ),
                Err(response) => response,
            }
        }
        (&Method::POST, "/api/generate-label") => match parse_body::<ProductRequest>(path, body) {
            Ok(request) => label_response(service.generate_label(&request)),
            Err(response) => response,
        },
        (&Method::GET, "/health/live") => text_response(StatusCode::OK, "OK".to_string()),
        (&Method::GET, "/metrics") => match metrics {
            Some(handle) => {
                let mut response = text_response(StatusCode::OK, handle.render());
                response.headers_mut().insert(
                    CONTENT_TYPE,
                    HeaderValue::from_static("text/plain; version=0.0.4; charset=utf-8"),
                );
                response
            }
            None => error_response(StatusCode::NOT_FOUND, "Metrics export is disabled"),
        },
        _ => error_response(StatusCode::NOT_FOUND, "Not Found"),
    }
}

async fn handle(req: Request<Incoming>, state: Arc<ServerState>) -> Result<HttpResponse, Infallible> {
    let start = Instant::now();
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let span = observability::request_span(method.as_str(), &path);

    let response = async {
        match Limited::new(req.into_body(), state.max_body_bytes).collect().await {
            Ok(collected) => route(
                &state.service,
                &method,
                &path,
                &collected.to_bytes(),
                state.metrics.as_ref(),
            ),
            Err(err) if err.downcast_ref::<LengthLimitError>().is_some() => error_response(
                StatusCode::PAYLOAD_TOO_LARGE,
                format!("Request body exceeds {} bytes", state.max_body_bytes),
            ),
            Err(err) => {
                error_logging::log_network_error(&err, "read_body", Some(path.as_str()));
                error_response(StatusCode::BAD_REQUEST, "Failed to read request body")
            }
        }
    }
    .instrument(span)
    .await;

    let duration = start.elapsed();
    observability::record_request_metrics(method.as_str(), response.status().as_u16(), duration);
    tracing::info!(
        method = %method,
        path = %path,
        status = response.status().as_u16(),
        duration_ms = duration.as_millis() as u64,
        "Request handled"
    );

    Ok(response)
}

/// Bind the configured address and serve until Ctrl-C
pub async fn serve(
    service: Arc<LabelService>,
    config: &ServerConfig,
    metrics: Option<PrometheusHandle>,
) -> Result<()> {
    let addr = config.socket_addr()?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!("Label server listening on {}", addr);

    serve_with_shutdown(listener, service, config.max_body_bytes, metrics, async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for shutdown signal: {}", e);
        }
    })
    .await
}

/// Serve connections from `listener` until `shutdown` completes
pub async fn serve_with_shutdown<F>(
    listener: TcpListener,
    service: Arc<LabelService>,
    max_body_bytes: usize,
    metrics: Option<PrometheusHandle>,
    shutdown: F,
) -> Result<()>
where
    F: Future<Output = ()>,
{
    let state = Arc::new(ServerState {
        service,
        max_body_bytes,
        metrics,
    });
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = &mut shutdown => {
                tracing::info!("Shutdown signal received, stopping accept loop");
                break;
            }
            accepted = listener.accept() => match accepted {
                Ok((stream, peer)) => {
                    let state = Arc::clone(&state);

                    tokio::spawn(async move {
                        let io = TokioIo::new(stream);
                        let service = hyper::service::service_fn(move |req: Request<Incoming>| {
                            handle(req, Arc::clone(&state))
                        });

                        if let Err(err) = http1::Builder::new().serve_connection(io, service).await {
                            let peer = peer.to_string();
                            error_logging::log_network_error(&err, "serve_connection", Some(peer.as_str()));
                        }
                    });
                }
                Err(e) => {
                    error_logging::log_network_error(&e, "accept", None);
                }
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_json(response: HttpResponse) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_check_ingredient_route() {
        let service = LabelService::with_bundled_data().unwrap();
        let response = route(
            &service,
            &Method::POST,
            "/api/check-ingredient",
            r#"{"name":"醤油"}"#.as_bytes(),
            None,
        );
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_json(response).await,
            serde_json::json!({"status": "success", "data": {"isCompound": true}})
        );
    }

    #[tokio::test]
    async fn test_malformed_json_is_bad_request() {
        let service = LabelService::with_bundled_data().unwrap();
        let response = route(&service, &Method::POST, "/api/generate-label", b"{not json", None);
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["status"], "error");
        assert!(body["message"].as_str().unwrap().starts_with("Invalid JSON body"));
    }

    #[tokio::test]
    async fn test_missing_field_is_bad_request() {
        let service = LabelService::with_bundled_data().unwrap();
        let response = route(&service, &Method::POST, "/api/analyze-compound", b"{}", None);
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert!(body["message"].as_str().unwrap().contains("details"));
    }

    #[tokio::test]
    async fn test_unknown_route_and_disabled_metrics() {
        let service = LabelService::with_bundled_data().unwrap();
        let response = route(&service, &Method::GET, "/api/unknown", b"", None);
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = route(&service, &Method::GET, "/metrics", b"", None);
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = route(&service, &Method::GET, "/health/live", b"", None);
        assert_eq!(response.status(), StatusCode::OK);
    }
}
