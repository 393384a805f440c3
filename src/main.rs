use std::sync::Arc;
use podman_traefik_config::{
    docker::PodmanClient,
    logging::{init_logging, Logger},
    server::{RequestHandler, ServerListener},
    settings::Settings,
    translator::ConfigTranslator,
};
use tracing::{error, info};

#[tokio::main]
async fn main() {
    let settings = match Settings::load().await {
        Ok(settings) => settings,
        Err(e) => {
            let logger = Logger::fallback();
            tracing::dispatcher::with_default(&logger.dispatch, || {
                error!(error = %e, "설정 로드 실패");
            });
            std::process::exit(1);
        }
    };

    let logger = match init_logging(&settings.logging) {
        Ok(logger) => logger,
        Err(e) => {
            let logger = Logger::fallback();
            tracing::dispatcher::with_default(&logger.dispatch, || {
                error!(error = %e, "로깅 초기화 실패");
            });
            std::process::exit(1);
        }
    };
    let _default = tracing::dispatcher::set_default(&logger.dispatch);

    info!(
        socket = %settings.docker.socket_path.display(),
        bind_ip = %settings.docker.bind_ip,
        label_prefix = %settings.docker.label_prefix,
        "설정 로드 완료"
    );

    let client = PodmanClient::new(&settings.docker);
    let translator = ConfigTranslator::new(Arc::new(client), &settings.docker);
    let handler = Arc::new(RequestHandler::new(translator, settings.docker.socket_path.clone()));

    let listener = match ServerListener::bind(&settings.server, logger.dispatch.clone()).await {
        Ok(listener) => listener,
        Err(e) => {
            error!(error = %e, "서버 시작 실패");
            std::process::exit(1);
        }
    };

    if let Err(e) = listener.run(handler).await {
        error!(error = %e, "서버 실행 중 오류");
        std::process::exit(1);
    }
}
