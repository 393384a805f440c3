use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use hyper_util::rt::TokioIo;
use tokio::net::TcpListener;
use tracing::instrument::WithSubscriber;
use tracing::{error, info, Dispatch};

use crate::settings::ServerSettings;
use super::handler::RequestHandler;
use super::Result;

pub struct ServerListener {
    http_listener: TcpListener,
    dispatch: Dispatch,
}

impl ServerListener {
    pub async fn bind(settings: &ServerSettings, dispatch: Dispatch) -> Result<Self> {
        let http_listener = TcpListener::bind((settings.host.as_str(), settings.port))
            .await
            .map_err(|e| {
                error!(error = %e, host = %settings.host, port = settings.port, "HTTP 포트 바인딩 실패");
                e
            })?;

        info!(host = %settings.host, port = settings.port, "HTTP 리스너 시작");
        Ok(Self::from_listener(http_listener, dispatch))
    }

    /// 이미 바인딩된 리스너로 생성합니다. 테스트에서 임의 포트를 쓸 때 사용합니다.
    pub fn from_listener(http_listener: TcpListener, dispatch: Dispatch) -> Self {
        Self { http_listener, dispatch }
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.http_listener.local_addr()?)
    }

    /// Ctrl-C 를 받을 때까지 요청을 처리합니다.
    pub async fn run(self, handler: Arc<RequestHandler>) -> Result<()> {
        self.run_until(handler, async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!(error = %e, "종료 시그널 대기 실패");
                std::future::pending::<()>().await;
            }
        })
        .await
    }

    pub async fn run_until<F>(self, handler: Arc<RequestHandler>, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                result = self.http_listener.accept() => {
                    match result {
                        Ok((stream, peer)) => {
                            let handler = handler.clone();
                            tokio::spawn(
                                async move {
                                    let io = TokioIo::new(stream);
                                    if let Err(err) = handler.handle_connection(io).await {
                                        error!(error = %err, peer = %peer, "HTTP 연결 처리 실패");
                                    }
                                }
                                .with_subscriber(self.dispatch.clone()),
                            );
                        }
                        Err(e) => {
                            error!(error = %e, "HTTP 연결 수락 실패");
                        }
                    }
                }
                _ = &mut shutdown => {
                    info!("종료 시그널 수신, 서버를 멈춥니다");
                    return Ok(());
                }
            }
        }
    }
}
