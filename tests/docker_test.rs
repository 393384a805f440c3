use podman_traefik_config::docker::{socket_available, ContainerLister, DockerError, PodmanClient};
use podman_traefik_config::settings::DockerSettings;

fn settings_with_socket(path: &std::path::Path) -> DockerSettings {
    DockerSettings {
        socket_path: path.to_path_buf(),
        ..Default::default()
    }
}

#[cfg(unix)]
#[tokio::test]
async fn test_list_containers_fails_without_runtime() {
    let dir = tempfile::tempdir().unwrap();
    let socket_path = dir.path().join("podman.sock");
    let client = PodmanClient::new(&settings_with_socket(&socket_path));

    // 소켓이 없으므로 목록 조회가 실패해야 합니다.
    let err = client.list_containers().await.unwrap_err();
    assert!(matches!(
        err,
        DockerError::ConnectionError { .. } | DockerError::ListContainersError { .. }
    ));
    assert!(err.to_string().starts_with("unable to"));
    assert!(!socket_available(&socket_path).await);
}

#[test]
fn test_enabled_label_filter_follows_prefix() {
    let settings = DockerSettings {
        label_prefix: "proxy.".to_string(),
        ..Default::default()
    };
    assert_eq!(settings.enabled_label_filter(), "proxy.enabled=true");
    assert_eq!(DockerSettings::default().enabled_label_filter(), "traefik.enabled=true");
}
