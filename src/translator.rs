//! 컨테이너 라벨과 공개 포트를 Traefik 동적 설정으로 변환합니다.

use std::collections::BTreeMap;
use std::net::Ipv6Addr;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::docker::{Container, ContainerLister, DockerError};
use crate::dynamic::{self, Configuration, Server, Service};
use crate::labels;
use crate::settings::DockerSettings;

pub struct ConfigTranslator {
    lister: Arc<dyn ContainerLister>,
    bind_ip: String,
    label_prefix: String,
}

impl ConfigTranslator {
    pub fn new(lister: Arc<dyn ContainerLister>, settings: &DockerSettings) -> Self {
        Self {
            lister,
            bind_ip: settings.bind_ip.clone(),
            label_prefix: settings.label_prefix.clone(),
        }
    }

    /// 실행 중인 컨테이너를 조회해 하나의 설정으로 합칩니다.
    /// 목록 조회 실패는 그대로 반환하고, 컨테이너/라우터 단위 오류는 로그만 남기고 건너뜁니다.
    pub async fn build_configuration(&self) -> Result<Configuration, DockerError> {
        let containers = self.lister.list_containers().await?;

        let mut fragments = BTreeMap::new();
        for container in &containers {
            if let Some(fragment) = self.translate_container(container) {
                fragments.insert(container.id.clone(), fragment);
            }
        }

        info!(
            containers = containers.len(),
            fragments = fragments.len(),
            "Traefik 설정 생성"
        );
        Ok(dynamic::merge(fragments))
    }

    /// 컨테이너 하나의 설정 조각. 라벨 디코딩에 실패하면 `None` 입니다.
    pub fn translate_container(&self, container: &Container) -> Option<Configuration> {
        let mut config = match labels::decode_configuration(&container.labels, &self.label_prefix) {
            Ok(config) => config,
            Err(e) => {
                warn!(
                    container_id = %container.id,
                    container = %container.display_name(),
                    error = %e,
                    "라벨 디코딩 실패, 컨테이너를 건너뜁니다"
                );
                return None;
            }
        };

        let router_names: Vec<String> = config.http.routers.keys().cloned().collect();
        for router_name in router_names {
            let port_label = format!(
                "{}http.services.{}.loadbalancer.server.port",
                self.label_prefix, router_name
            );
            let Some(port) = container.labels.get(&port_label).map(|p| p.trim()) else {
                warn!(
                    container_id = %container.id,
                    router = %router_name,
                    label = %port_label,
                    "포트 라벨 없음, 라우터를 건너뜁니다"
                );
                continue;
            };

            let bind_ip = self.resolve_bind_ip(container, port);

            // 서비스 조회 전에 라우터의 서비스 이름을 채웁니다.
            let Some(router) = config.http.routers.get_mut(&router_name) else {
                continue;
            };
            if router.service.is_empty() {
                router.service = router_name.clone();
            }
            let service_name = router.service.clone();

            match config.http.services.get_mut(&service_name) {
                None => {
                    let url = backend_url("http", &bind_ip, port);
                    debug!(router = %router_name, service = %service_name, url = %url, "서비스 생성");
                    config.http.services.insert(
                        service_name,
                        Service::with_servers(vec![Server::with_url(url)]),
                    );
                }
                Some(service) => {
                    let servers = &mut service.load_balancer.servers;
                    if servers.first().is_some_and(|first| first.url.is_empty()) {
                        let first = &mut servers[0];
                        let scheme = if first.scheme.is_empty() { "http" } else { first.scheme.as_str() };
                        let server_port = if first.port.is_empty() { port } else { first.port.as_str() };
                        let url = backend_url(scheme, &bind_ip, server_port);
                        debug!(router = %router_name, service = %service_name, url = %url, "백엔드 URL 설정");
                        first.url = url;
                    } else {
                        let url = backend_url("http", &bind_ip, port);
                        debug!(router = %router_name, service = %service_name, url = %url, "백엔드 추가");
                        servers.push(Server::with_url(url));
                    }
                }
            }
        }

        Some(config)
    }

    /// 라우터 포트와 같은 호스트 포트가 구체적인 IP 에 바인딩되어 있으면 그 IP 를,
    /// 아니면 설정된 기본 IP 를 사용합니다. 여러 개가 맞으면 마지막 매핑이 이깁니다.
    pub fn resolve_bind_ip(&self, container: &Container, port: &str) -> String {
        let Ok(port) = port.parse::<u16>() else {
            return self.bind_ip.clone();
        };

        container.ports.iter()
            .filter(|mapping| mapping.host_port == Some(port))
            .filter_map(|mapping| mapping.concrete_host_ip())
            .last()
            .unwrap_or(self.bind_ip.as_str())
            .to_string()
    }
}

/// `scheme://ip:port`, IPv6 주소는 대괄호로 감쌉니다.
pub fn backend_url(scheme: &str, ip: &str, port: &str) -> String {
    if ip.parse::<Ipv6Addr>().is_ok() {
        format!("{}://[{}]:{}", scheme, ip, port)
    } else {
        format!("{}://{}:{}", scheme, ip, port)
    }
}
