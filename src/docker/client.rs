use async_trait::async_trait;
use bollard::container::ListContainersOptions;
use bollard::Docker;
use std::collections::HashMap;
use std::path::PathBuf;
use tracing::{debug, error, info};

use crate::settings::DockerSettings;
use super::{Container, DockerError};

/// 라벨로 라우팅 대상이 표시된 실행 중 컨테이너를 조회합니다.
#[async_trait]
pub trait ContainerLister: Send + Sync {
    async fn list_containers(&self) -> Result<Vec<Container>, DockerError>;
}

/// Podman 의 Docker 호환 API 를 사용하는 실제 구현
#[derive(Debug, Clone)]
pub struct PodmanClient {
    socket_path: PathBuf,
    label_filter: String,
}

impl PodmanClient {
    /// bollard 기본 요청 타임아웃 (초)
    const TIMEOUT_SECS: u64 = 120;

    pub fn new(settings: &DockerSettings) -> Self {
        Self {
            socket_path: settings.socket_path.clone(),
            label_filter: settings.enabled_label_filter(),
        }
    }

    /// 요청마다 새로 연결합니다.
    fn connect(&self) -> Result<Docker, DockerError> {
        let socket = self.socket_path.to_string_lossy();
        debug!(socket = %socket, "컨테이너 런타임 연결");

        #[cfg(unix)]
        let docker = Docker::connect_with_unix(&socket, Self::TIMEOUT_SECS, bollard::API_DEFAULT_VERSION);
        #[cfg(not(unix))]
        let docker = Docker::connect_with_local_defaults();

        docker.map_err(|e| DockerError::ConnectionError {
            source: e,
            context: format!("unix://{}", socket),
        })
    }
}

#[async_trait]
impl ContainerLister for PodmanClient {
    async fn list_containers(&self) -> Result<Vec<Container>, DockerError> {
        let docker = self.connect()?;

        let options = Some(ListContainersOptions::<String> {
            filters: HashMap::from([("label".to_string(), vec![self.label_filter.clone()])]),
            ..Default::default()
        });

        let containers = match docker.list_containers(options).await {
            Ok(containers) => {
                info!(count = containers.len(), "컨테이너 목록 조회 성공");
                containers
            }
            Err(e) => {
                error!(error = %e, "컨테이너 목록 조회 실패");
                return Err(DockerError::ListContainersError {
                    source: e,
                    context: format!("filter label={}", self.label_filter),
                });
            }
        };

        Ok(containers.into_iter().map(Container::from).collect())
    }
}
