use std::fmt;

#[derive(Debug)]
pub enum DockerError {
    /// 컨테이너 런타임 소켓 연결 실패
    ConnectionError {
        source: bollard::errors::Error,
        context: String,
    },
    /// 컨테이너 목록 조회 실패
    ListContainersError {
        source: bollard::errors::Error,
        context: String,
    },
}

impl fmt::Display for DockerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DockerError::ConnectionError { source, context } =>
                write!(f, "unable to connect to container runtime ({}): {}", context, source),
            DockerError::ListContainersError { source, context } =>
                write!(f, "unable to list containers ({}): {}", context, source),
        }
    }
}

impl std::error::Error for DockerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DockerError::ConnectionError { source, .. } => Some(source),
            DockerError::ListContainersError { source, .. } => Some(source),
        }
    }
}

impl From<bollard::errors::Error> for DockerError {
    fn from(err: bollard::errors::Error) -> Self {
        DockerError::ConnectionError {
            source: err,
            context: "컨테이너 런타임 연결".to_string(),
        }
    }
}
