mod client;
mod container;
mod error_types;

pub use client::{ContainerLister, PodmanClient};
pub use container::{Container, PortMapping};
pub use error_types::DockerError;

use std::path::Path;
use tracing::debug;

/// 런타임 소켓 파일이 존재하는지 확인합니다.
pub async fn socket_available(path: &Path) -> bool {
    match tokio::fs::try_exists(path).await {
        Ok(exists) => exists,
        Err(e) => {
            debug!(path = %path.display(), error = %e, "소켓 경로 확인 실패");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_socket_available() {
        let dir = tempfile::tempdir().unwrap();
        let socket = dir.path().join("podman.sock");
        assert!(!socket_available(&socket).await);

        std::fs::write(&socket, b"").unwrap();
        assert!(socket_available(&socket).await);
    }
}
