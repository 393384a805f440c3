use std::convert::Infallible;
use std::path::PathBuf;
use std::sync::Arc;
use http_body_util::Full;
use bytes::Bytes;
use hyper::header::{CONTENT_TYPE, HeaderValue};
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Method, Request, Response, StatusCode};
use serde::Serialize;
use tracing::debug;
use uuid::Uuid;

use crate::docker;
use crate::logging::{log_request, RequestLog};
use crate::translator::ConfigTranslator;

pub const CONFIG_PATH: &str = "/traefik/config";
pub const HEALTH_PATH: &str = "/healthcheck";

#[derive(Debug, Serialize)]
struct HealthStatus {
    ok: bool,
}

pub struct RequestHandler {
    translator: ConfigTranslator,
    socket_path: PathBuf,
}

impl RequestHandler {
    pub fn new(translator: ConfigTranslator, socket_path: PathBuf) -> Self {
        Self { translator, socket_path }
    }

    pub async fn handle_request<B>(
        &self,
        req: Request<B>,
    ) -> Result<Response<Full<Bytes>>, Infallible> {
        let mut log = RequestLog::new(Uuid::new_v4().to_string());
        log.with_request(&req);

        let is_read = matches!(*req.method(), Method::GET | Method::HEAD);
        let response = match req.uri().path() {
            CONFIG_PATH if is_read => self.traefik_config(&mut log).await,
            HEALTH_PATH if is_read => self.health_check().await,
            CONFIG_PATH | HEALTH_PATH => {
                text_response(StatusCode::METHOD_NOT_ALLOWED, "Method Not Allowed".to_string())
            }
            _ => text_response(StatusCode::NOT_FOUND, "Not Found".to_string()),
        };

        log.with_response(response.status());
        log_request(&log);
        Ok(response)
    }

    /// 매 요청마다 컨테이너를 다시 조회합니다. 캐시는 없습니다.
    async fn traefik_config(&self, log: &mut RequestLog) -> Response<Full<Bytes>> {
        let config = match self.translator.build_configuration().await {
            Ok(config) => config,
            Err(e) => {
                log.with_error(&e);
                return text_response(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("Failed to get Traefik config: {}", e),
                );
            }
        };

        match serde_json::to_vec(&config.provider_sections()) {
            Ok(body) => json_response(StatusCode::OK, body),
            Err(e) => {
                log.with_error(&e);
                text_response(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("Failed to get Traefik config: {}", e),
                )
            }
        }
    }

    async fn health_check(&self) -> Response<Full<Bytes>> {
        let ok = docker::socket_available(&self.socket_path).await;
        debug!(socket = %self.socket_path.display(), ok, "헬스 체크");

        let status = if ok { StatusCode::OK } else { StatusCode::INTERNAL_SERVER_ERROR };
        match serde_json::to_vec(&HealthStatus { ok }) {
            Ok(body) => json_response(status, body),
            Err(e) => text_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
        }
    }

    pub async fn handle_connection<I>(self: Arc<Self>, io: I) -> Result<(), hyper::Error>
    where
        I: hyper::rt::Read + hyper::rt::Write + Send + Unpin + 'static,
    {
        http1::Builder::new()
            .serve_connection(
                io,
                service_fn(|req| {
                    let handler = self.clone();
                    async move { handler.handle_request(req).await }
                }),
            )
            .await
    }
}

fn json_response(status: StatusCode, body: Vec<u8>) -> Response<Full<Bytes>> {
    build_response(status, "application/json", Bytes::from(body))
}

fn text_response(status: StatusCode, body: String) -> Response<Full<Bytes>> {
    build_response(status, "text/plain; charset=utf-8", Bytes::from(body))
}

fn build_response(status: StatusCode, content_type: &'static str, body: Bytes) -> Response<Full<Bytes>> {
    let mut response = Response::new(Full::new(body));
    *response.status_mut() = status;
    response.headers_mut().insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
    response
}
