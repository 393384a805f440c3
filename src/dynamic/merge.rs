use std::collections::{BTreeMap, BTreeSet, HashSet};
use tracing::error;

use super::{Configuration, Service, TcpService, UdpService};

/// 같은 이름의 서비스를 여러 컨테이너가 정의했을 때 서버 목록을 합칩니다.
/// 서버 목록 외의 설정이 다르면 `false` 를 돌려주고 아무것도 바꾸지 않습니다.
trait ServerUnion {
    fn union_servers(&mut self, other: Self) -> bool;
}

impl ServerUnion for Service {
    fn union_servers(&mut self, other: Self) -> bool {
        if !self.load_balancer.mergeable(&other.load_balancer) {
            return false;
        }
        let mut known: HashSet<String> = self.load_balancer.servers.iter()
            .map(|server| server.url.clone())
            .collect();
        for server in other.load_balancer.servers {
            if known.insert(server.url.clone()) {
                self.load_balancer.servers.push(server);
            }
        }
        true
    }
}

impl ServerUnion for TcpService {
    fn union_servers(&mut self, other: Self) -> bool {
        if !self.load_balancer.mergeable(&other.load_balancer) {
            return false;
        }
        let mut known: HashSet<String> = self.load_balancer.servers.iter()
            .map(|server| server.address.clone())
            .collect();
        for server in other.load_balancer.servers {
            if known.insert(server.address.clone()) {
                self.load_balancer.servers.push(server);
            }
        }
        true
    }
}

impl ServerUnion for UdpService {
    fn union_servers(&mut self, other: Self) -> bool {
        let mut known: HashSet<String> = self.load_balancer.servers.iter()
            .map(|server| server.address.clone())
            .collect();
        for server in other.load_balancer.servers {
            if known.insert(server.address.clone()) {
                self.load_balancer.servers.push(server);
            }
        }
        true
    }
}

/// 이름별 정의 출처와 충돌 여부 기록
struct Definitions {
    kind: &'static str,
    origins: BTreeMap<String, Vec<String>>,
    conflicts: BTreeSet<String>,
}

impl Definitions {
    fn new(kind: &'static str) -> Self {
        Self {
            kind,
            origins: BTreeMap::new(),
            conflicts: BTreeSet::new(),
        }
    }

    /// 라우터/미들웨어: 동일한 정의만 중복을 허용합니다.
    fn add_exact<T: PartialEq>(&mut self, target: &mut BTreeMap<String, T>, origin: &str, name: String, value: T) {
        self.origins.entry(name.clone()).or_default().push(origin.to_string());
        match target.get(&name) {
            None => {
                target.insert(name, value);
            }
            Some(existing) if *existing == value => {}
            Some(_) => {
                self.conflicts.insert(name);
            }
        }
    }

    fn add_service<T: ServerUnion>(&mut self, target: &mut BTreeMap<String, T>, origin: &str, name: String, value: T) {
        self.origins.entry(name.clone()).or_default().push(origin.to_string());
        match target.get_mut(&name) {
            None => {
                target.insert(name, value);
            }
            Some(existing) => {
                if !existing.union_servers(value) {
                    self.conflicts.insert(name);
                }
            }
        }
    }

    /// 충돌한 정의를 로그로 남기고 결과에서 제거합니다.
    fn purge<T>(self, target: &mut BTreeMap<String, T>) {
        for name in self.conflicts {
            let origins = self.origins.get(&name).cloned().unwrap_or_default();
            error!(
                kind = self.kind,
                name = %name,
                containers = ?origins,
                "서로 다른 설정으로 여러 번 정의되어 제외합니다"
            );
            target.remove(&name);
        }
    }
}

/// 컨테이너별 설정 조각을 하나의 설정으로 병합합니다.
///
/// 조각은 키(컨테이너 ID) 오름차순으로 처리됩니다. 같은 이름의 라우터나 미들웨어가
/// 서로 다르게 정의되어 있으면 결과에서 빠지고, 서비스는 서버 목록 외의 설정이 같을 때만
/// 서버 목록을 합칩니다.
pub fn merge(configurations: BTreeMap<String, Configuration>) -> Configuration {
    let mut merged = Configuration::default();

    let mut http_routers = Definitions::new("http router");
    let mut http_services = Definitions::new("http service");
    let mut http_middlewares = Definitions::new("http middleware");
    let mut tcp_routers = Definitions::new("tcp router");
    let mut tcp_services = Definitions::new("tcp service");
    let mut tcp_middlewares = Definitions::new("tcp middleware");
    let mut udp_routers = Definitions::new("udp router");
    let mut udp_services = Definitions::new("udp service");

    for (origin, configuration) in configurations {
        let Configuration { http, tcp, udp } = configuration;

        for (name, service) in http.services {
            http_services.add_service(&mut merged.http.services, &origin, name, service);
        }
        for (name, router) in http.routers {
            http_routers.add_exact(&mut merged.http.routers, &origin, name, router);
        }
        for (name, middleware) in http.middlewares {
            http_middlewares.add_exact(&mut merged.http.middlewares, &origin, name, middleware);
        }

        for (name, service) in tcp.services {
            tcp_services.add_service(&mut merged.tcp.services, &origin, name, service);
        }
        for (name, router) in tcp.routers {
            tcp_routers.add_exact(&mut merged.tcp.routers, &origin, name, router);
        }
        for (name, middleware) in tcp.middlewares {
            tcp_middlewares.add_exact(&mut merged.tcp.middlewares, &origin, name, middleware);
        }

        for (name, service) in udp.services {
            udp_services.add_service(&mut merged.udp.services, &origin, name, service);
        }
        for (name, router) in udp.routers {
            udp_routers.add_exact(&mut merged.udp.routers, &origin, name, router);
        }
    }

    http_services.purge(&mut merged.http.services);
    http_routers.purge(&mut merged.http.routers);
    http_middlewares.purge(&mut merged.http.middlewares);
    tcp_services.purge(&mut merged.tcp.services);
    tcp_routers.purge(&mut merged.tcp.routers);
    tcp_middlewares.purge(&mut merged.tcp.middlewares);
    udp_services.purge(&mut merged.udp.services);
    udp_routers.purge(&mut merged.udp.routers);

    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dynamic::{Router, Server, TcpServer, TcpServersLoadBalancer};

    fn http_fragment(router: &str, rule: &str, service: &str, url: &str) -> Configuration {
        let mut config = Configuration::default();
        config.http.routers.insert(
            router.to_string(),
            Router {
                rule: rule.to_string(),
                service: service.to_string(),
                ..Default::default()
            },
        );
        config.http.services.insert(
            service.to_string(),
            Service::with_servers(vec![Server::with_url(url)]),
        );
        config
    }

    #[test]
    fn test_merge_disjoint_fragments() {
        let mut fragments = BTreeMap::new();
        fragments.insert("a".to_string(), http_fragment("web", "Host(`a`)", "web", "http://10.0.0.1:80"));
        fragments.insert("b".to_string(), http_fragment("api", "Host(`b`)", "api", "http://10.0.0.2:80"));

        let merged = merge(fragments);
        assert_eq!(merged.http.routers.len(), 2);
        assert_eq!(merged.http.services.len(), 2);
    }

    #[test]
    fn test_merge_unions_servers_of_identical_services() {
        let mut fragments = BTreeMap::new();
        fragments.insert("a".to_string(), http_fragment("web", "Host(`a`)", "web", "http://10.0.0.1:80"));
        fragments.insert("b".to_string(), http_fragment("web", "Host(`a`)", "web", "http://10.0.0.2:80"));
        fragments.insert("c".to_string(), http_fragment("web", "Host(`a`)", "web", "http://10.0.0.1:80"));

        let merged = merge(fragments);
        let urls: Vec<&str> = merged.http.services["web"].load_balancer.servers.iter()
            .map(|s| s.url.as_str())
            .collect();
        assert_eq!(urls, vec!["http://10.0.0.1:80", "http://10.0.0.2:80"]);
        assert!(merged.http.routers.contains_key("web"));
    }

    #[test]
    fn test_merge_drops_conflicting_routers() {
        let mut fragments = BTreeMap::new();
        fragments.insert("a".to_string(), http_fragment("web", "Host(`a`)", "web", "http://10.0.0.1:80"));
        fragments.insert("b".to_string(), http_fragment("web", "Host(`b`)", "web", "http://10.0.0.2:80"));

        let merged = merge(fragments);
        assert!(!merged.http.routers.contains_key("web"));
        // 서비스는 로드밸런서 설정이 같으므로 유지됩니다.
        assert_eq!(merged.http.services["web"].load_balancer.servers.len(), 2);
    }

    #[test]
    fn test_merge_drops_conflicting_services() {
        let mut a = http_fragment("web", "Host(`a`)", "web", "http://10.0.0.1:80");
        let b = http_fragment("web", "Host(`a`)", "web", "http://10.0.0.2:80");
        a.http.services.get_mut("web").unwrap().load_balancer.pass_host_header = Some(false);

        let mut fragments = BTreeMap::new();
        fragments.insert("a".to_string(), a);
        fragments.insert("b".to_string(), b);

        let merged = merge(fragments);
        assert!(!merged.http.services.contains_key("web"));
        assert!(merged.http.routers.contains_key("web"));
    }

    #[test]
    fn test_merge_tcp_services_by_address() {
        let fragment = |address: &str| {
            let mut config = Configuration::default();
            config.tcp.services.insert(
                "db".to_string(),
                TcpService {
                    load_balancer: TcpServersLoadBalancer {
                        servers: vec![TcpServer {
                            address: address.to_string(),
                            ..Default::default()
                        }],
                        ..Default::default()
                    },
                },
            );
            config
        };

        let mut fragments = BTreeMap::new();
        fragments.insert("a".to_string(), fragment("10.0.0.1:5432"));
        fragments.insert("b".to_string(), fragment("10.0.0.2:5432"));

        let merged = merge(fragments);
        assert_eq!(merged.tcp.services["db"].load_balancer.servers.len(), 2);
    }
}
