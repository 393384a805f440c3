use crate::dynamic::{Cookie, HttpConfiguration, Server, ServersLoadBalancer, Service};
use super::{apply_domain, parse_bool, parse_int, parse_list, Entry, Result};

pub(super) fn apply_router(http: &mut HttpConfiguration, entry: &Entry) -> Result<()> {
    let router = http.routers.entry(entry.name.to_string()).or_default();
    let value = entry.value.to_string();

    match entry.path().as_slice() {
        ["entrypoints"] => router.entry_points = parse_list(entry.value),
        ["middlewares"] => router.middlewares = parse_list(entry.value),
        ["service"] => router.service = value,
        ["rule"] => router.rule = value,
        ["rulesyntax"] => router.rule_syntax = Some(value),
        ["priority"] => router.priority = Some(parse_int(entry)?),
        ["tls"] => {
            if parse_bool(entry)? {
                router.tls.get_or_insert_with(Default::default);
            } else {
                router.tls = None;
            }
        }
        ["tls", "certresolver"] => router.tls.get_or_insert_with(Default::default).cert_resolver = Some(value),
        ["tls", "options"] => router.tls.get_or_insert_with(Default::default).options = Some(value),
        ["tls", domains, field] if domains.starts_with("domains[") => {
            let tls = router.tls.get_or_insert_with(Default::default);
            apply_domain(&mut tls.domains, entry, domains, field)?
        }
        ["observability", "accesslogs"] => {
            router.observability.get_or_insert_with(Default::default).access_logs = Some(parse_bool(entry)?)
        }
        ["observability", "metrics"] => {
            router.observability.get_or_insert_with(Default::default).metrics = Some(parse_bool(entry)?)
        }
        ["observability", "tracing"] => {
            router.observability.get_or_insert_with(Default::default).tracing = Some(parse_bool(entry)?)
        }
        _ => return Err(entry.unknown()),
    }

    Ok(())
}

pub(super) fn apply_service(http: &mut HttpConfiguration, entry: &Entry) -> Result<()> {
    let service = http.services.entry(entry.name.to_string()).or_insert_with(Service::decoded);

    match entry.path().as_slice() {
        ["loadbalancer", rest @ ..] if !rest.is_empty() => {
            apply_load_balancer(&mut service.load_balancer, entry, rest)
        }
        _ => Err(entry.unknown()),
    }
}

/// 라벨은 첫 번째 서버만 기술할 수 있습니다.
fn first_server(lb: &mut ServersLoadBalancer) -> &mut Server {
    if lb.servers.is_empty() {
        lb.servers.push(Server::decoded());
    }
    &mut lb.servers[0]
}

fn cookie(lb: &mut ServersLoadBalancer) -> &mut Cookie {
    lb.sticky.get_or_insert_with(Default::default)
        .cookie.get_or_insert_with(Default::default)
}

fn apply_load_balancer(lb: &mut ServersLoadBalancer, entry: &Entry, path: &[&str]) -> Result<()> {
    let value = entry.value.to_string();

    match path {
        ["server", "port"] => first_server(lb).port = value.trim().to_string(),
        ["server", "scheme"] => first_server(lb).scheme = value,
        ["server", "weight"] => first_server(lb).weight = Some(parse_int(entry)?),
        ["server", "preservepath"] => first_server(lb).preserve_path = Some(parse_bool(entry)?),
        ["server", "url"] => {
            url::Url::parse(entry.value).map_err(|e| entry.invalid(e.to_string()))?;
            first_server(lb).url = value;
        }
        ["passhostheader"] => lb.pass_host_header = Some(parse_bool(entry)?),
        ["serverstransport"] => lb.servers_transport = Some(value),
        ["sticky", "cookie"] => {
            if parse_bool(entry)? {
                cookie(lb);
            } else {
                lb.sticky = None;
            }
        }
        ["sticky", "cookie", "name"] => cookie(lb).name = Some(value),
        ["sticky", "cookie", "secure"] => cookie(lb).secure = Some(parse_bool(entry)?),
        ["sticky", "cookie", "httponly"] => cookie(lb).http_only = Some(parse_bool(entry)?),
        ["sticky", "cookie", "samesite"] => cookie(lb).same_site = Some(value),
        ["sticky", "cookie", "maxage"] => cookie(lb).max_age = Some(parse_int(entry)?),
        ["sticky", "cookie", "path"] => cookie(lb).path = Some(value),
        ["healthcheck", rest @ ..] => {
            let health_check = lb.health_check.get_or_insert_with(Default::default);
            match rest {
                ["scheme"] => health_check.scheme = Some(value),
                ["mode"] => health_check.mode = Some(value),
                ["path"] => health_check.path = Some(value),
                ["method"] => health_check.method = Some(value),
                ["status"] => health_check.status = Some(parse_int(entry)?),
                ["port"] => health_check.port = Some(parse_int(entry)?),
                ["interval"] => health_check.interval = Some(value),
                ["timeout"] => health_check.timeout = Some(value),
                ["hostname"] => health_check.hostname = Some(value),
                ["followredirects"] => health_check.follow_redirects = Some(parse_bool(entry)?),
                ["headers", _] => {
                    // 헤더 이름은 원래 대소문자를 유지합니다.
                    let header = entry.raw_fields[entry.raw_fields.len() - 1];
                    health_check.headers.insert(header.to_string(), value);
                }
                _ => return Err(entry.unknown()),
            }
        }
        ["responseforwarding", "flushinterval"] => {
            lb.response_forwarding.get_or_insert_with(Default::default).flush_interval = Some(value)
        }
        _ => return Err(entry.unknown()),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::labels::{decode_configuration, LabelError};
    use std::collections::HashMap;

    fn decode(pairs: &[(&str, &str)]) -> crate::labels::Result<crate::dynamic::Configuration> {
        let labels: HashMap<String, String> = pairs.iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        decode_configuration(&labels, "traefik.")
    }

    #[test]
    fn test_router_tls_and_domains() {
        let config = decode(&[
            ("traefik.http.routers.web.tls", "true"),
            ("traefik.http.routers.web.tls.certresolver", "le"),
            ("traefik.http.routers.web.tls.domains[0].main", "example.com"),
            ("traefik.http.routers.web.tls.domains[0].sans", "a.example.com,b.example.com"),
        ]).unwrap();

        let tls = config.http.routers["web"].tls.as_ref().unwrap();
        assert_eq!(tls.cert_resolver.as_deref(), Some("le"));
        assert_eq!(tls.domains.len(), 1);
        assert_eq!(tls.domains[0].main, "example.com");
        assert_eq!(tls.domains[0].sans, vec!["a.example.com", "b.example.com"]);
    }

    #[test]
    fn test_router_tls_false_leaves_tls_unset() {
        let config = decode(&[("traefik.http.routers.web.tls", "false")]).unwrap();
        assert!(config.http.routers["web"].tls.is_none());
    }

    #[test]
    fn test_service_options() {
        let config = decode(&[
            ("traefik.http.services.web.loadbalancer.server.port", "8080"),
            ("traefik.http.services.web.loadbalancer.server.scheme", "https"),
            ("traefik.http.services.web.loadbalancer.passhostheader", "false"),
            ("traefik.http.services.web.loadbalancer.sticky.cookie.name", "sid"),
            ("traefik.http.services.web.loadbalancer.sticky.cookie.httponly", "true"),
            ("traefik.http.services.web.loadbalancer.healthcheck.path", "/health"),
            ("traefik.http.services.web.loadbalancer.healthcheck.interval", "10s"),
            ("traefik.http.services.web.loadbalancer.healthcheck.headers.X-Probe", "ptoc"),
        ]).unwrap();

        let lb = &config.http.services["web"].load_balancer;
        assert_eq!(lb.servers[0].scheme, "https");
        assert_eq!(lb.servers[0].port, "8080");
        assert_eq!(lb.pass_host_header, Some(false));
        let cookie = lb.sticky.as_ref().and_then(|s| s.cookie.as_ref()).unwrap();
        assert_eq!(cookie.name.as_deref(), Some("sid"));
        assert_eq!(cookie.http_only, Some(true));
        let health_check = lb.health_check.as_ref().unwrap();
        assert_eq!(health_check.path.as_deref(), Some("/health"));
        assert_eq!(health_check.headers.get("X-Probe").map(String::as_str), Some("ptoc"));
    }

    #[test]
    fn test_healthcheck_mode() {
        let config = decode(&[
            ("traefik.http.routers.web.rule", "Host(`web.local`)"),
            ("traefik.http.services.web.loadbalancer.server.port", "8080"),
            ("traefik.http.services.web.loadbalancer.healthcheck.mode", "grpc"),
        ]).unwrap();

        let health_check = config.http.services["web"].load_balancer.health_check.as_ref().unwrap();
        assert_eq!(health_check.mode.as_deref(), Some("grpc"));
        assert!(config.http.routers.contains_key("web"));
    }

    #[test]
    fn test_server_weight() {
        let config = decode(&[
            ("traefik.http.routers.web.rule", "Host(`web.local`)"),
            ("traefik.http.services.web.loadbalancer.server.port", "8080"),
            ("traefik.http.services.web.loadbalancer.server.weight", "2"),
        ]).unwrap();

        let server = &config.http.services["web"].load_balancer.servers[0];
        assert_eq!(server.weight, Some(2));
        assert_eq!(server.port, "8080");

        let result = decode(&[("traefik.http.services.web.loadbalancer.server.weight", "heavy")]);
        assert!(matches!(result, Err(LabelError::InvalidValue { .. })));
    }

    #[test]
    fn test_server_preserve_path() {
        let config = decode(&[
            ("traefik.http.services.web.loadbalancer.server.port", "8080"),
            ("traefik.http.services.web.loadbalancer.server.preservepath", "true"),
        ]).unwrap();

        let servers = &config.http.services["web"].load_balancer.servers;
        assert_eq!(servers.len(), 1);
        assert_eq!(servers[0].preserve_path, Some(true));
    }

    #[test]
    fn test_service_url_must_parse() {
        let result = decode(&[("traefik.http.services.web.loadbalancer.server.url", "not a url")]);
        assert!(matches!(result, Err(LabelError::InvalidValue { .. })));

        let config = decode(&[("traefik.http.services.web.loadbalancer.server.url", "http://10.1.1.1:81")]).unwrap();
        assert_eq!(config.http.services["web"].load_balancer.servers[0].url, "http://10.1.1.1:81");
    }

    #[test]
    fn test_unsupported_service_kind_fails() {
        let result = decode(&[("traefik.http.services.web.weighted.services[0].name", "a")]);
        assert!(matches!(result, Err(LabelError::UnknownField { .. })));
    }

    #[test]
    fn test_invalid_bool_fails() {
        let result = decode(&[("traefik.http.services.web.loadbalancer.passhostheader", "maybe")]);
        assert!(matches!(result, Err(LabelError::InvalidValue { .. })));
    }
}
