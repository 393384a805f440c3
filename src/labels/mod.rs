//! 컨테이너 라벨을 Traefik 동적 설정 조각으로 디코딩합니다.
//!
//! 키 형식은 `<prefix><http|tcp|udp>.<routers|services|middlewares>.<name>.<field...>` 이며
//! 프로토콜/종류/필드 이름은 대소문자를 구분하지 않고, 라우터·서비스 이름은 그대로 유지합니다.

mod error;
mod http;
mod tcp;
mod tree;
mod udp;

pub use error::LabelError;

use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashMap};
use crate::dynamic::{Configuration, Domain};

pub type Result<T> = std::result::Result<T, LabelError>;

/// 목록 인덱스 상한 (`domains[n]` 등)
const MAX_INDEX: usize = 255;

/// 디코딩 중인 라벨 하나
pub(crate) struct Entry<'a> {
    pub key: &'a str,
    pub name: &'a str,
    /// 소문자로 바꾼 필드 경로
    pub fields: Vec<String>,
    /// 원래 대소문자를 유지한 필드 경로
    pub raw_fields: Vec<&'a str>,
    pub value: &'a str,
}

impl<'a> Entry<'a> {
    pub fn path(&self) -> Vec<&str> {
        self.fields.iter().map(String::as_str).collect()
    }

    pub fn unknown(&self) -> LabelError {
        LabelError::UnknownField { key: self.key.to_string() }
    }

    pub fn malformed(&self, reason: impl Into<String>) -> LabelError {
        LabelError::MalformedKey {
            key: self.key.to_string(),
            reason: reason.into(),
        }
    }

    pub fn invalid(&self, reason: impl Into<String>) -> LabelError {
        LabelError::InvalidValue {
            key: self.key.to_string(),
            value: self.value.to_string(),
            reason: reason.into(),
        }
    }
}

/// 라벨 집합을 설정 조각으로 디코딩합니다. 관련 없는 라벨은 무시합니다.
pub fn decode_configuration(labels: &HashMap<String, String>, prefix: &str) -> Result<Configuration> {
    let mut configuration = Configuration::default();

    // 키 순서대로 처리해야 `tls` 와 `tls.options` 같은 라벨이 일정하게 적용됩니다.
    let sorted: BTreeMap<&str, &str> = labels.iter()
        .map(|(k, v)| (k.as_str(), v.as_str()))
        .collect();

    for (key, value) in sorted {
        let Some(rest) = strip_prefix_ignore_case(key, prefix) else {
            continue;
        };

        let segments: Vec<&str> = rest.split('.').collect();
        let protocol = segments[0].to_ascii_lowercase();
        if !matches!(protocol.as_str(), "http" | "tcp" | "udp") {
            continue;
        }

        if segments.len() < 4 {
            return Err(LabelError::MalformedKey {
                key: key.to_string(),
                reason: "<protocol>.<kind>.<name>.<field> 형식이어야 합니다".to_string(),
            });
        }
        if segments.iter().any(|segment| segment.is_empty()) {
            return Err(LabelError::MalformedKey {
                key: key.to_string(),
                reason: "빈 구간이 있습니다".to_string(),
            });
        }

        let kind = segments[1].to_ascii_lowercase();
        let entry = Entry {
            key,
            name: segments[2],
            fields: segments[3..].iter().map(|s| s.to_ascii_lowercase()).collect(),
            raw_fields: segments[3..].to_vec(),
            value,
        };

        match (protocol.as_str(), kind.as_str()) {
            ("http", "routers") => http::apply_router(&mut configuration.http, &entry)?,
            ("http", "services") => http::apply_service(&mut configuration.http, &entry)?,
            ("http", "middlewares") => {
                let middleware = configuration.http.middlewares
                    .entry(entry.name.to_string())
                    .or_insert_with(|| Value::Object(Map::new()));
                tree::insert(middleware, &entry)?
            }
            ("tcp", "routers") => tcp::apply_router(&mut configuration.tcp, &entry)?,
            ("tcp", "services") => tcp::apply_service(&mut configuration.tcp, &entry)?,
            ("tcp", "middlewares") => {
                let middleware = configuration.tcp.middlewares
                    .entry(entry.name.to_string())
                    .or_insert_with(|| Value::Object(Map::new()));
                tree::insert(middleware, &entry)?
            }
            ("udp", "routers") => udp::apply_router(&mut configuration.udp, &entry)?,
            ("udp", "services") => udp::apply_service(&mut configuration.udp, &entry)?,
            _ => return Err(LabelError::UnknownField { key: key.to_string() }),
        }
    }

    Ok(configuration)
}

fn strip_prefix_ignore_case<'a>(key: &'a str, prefix: &str) -> Option<&'a str> {
    let head = key.get(..prefix.len())?;
    if head.eq_ignore_ascii_case(prefix) {
        key.get(prefix.len()..)
    } else {
        None
    }
}

/// 쉼표로 구분된 목록
pub(crate) fn parse_list(value: &str) -> Vec<String> {
    value.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

pub(crate) fn parse_bool(entry: &Entry) -> Result<bool> {
    match entry.value.trim().to_ascii_lowercase().as_str() {
        "true" | "t" | "1" => Ok(true),
        "false" | "f" | "0" => Ok(false),
        _ => Err(entry.invalid("true 또는 false 여야 합니다")),
    }
}

pub(crate) fn parse_int(entry: &Entry) -> Result<i64> {
    entry.value.trim().parse::<i64>()
        .map_err(|e| entry.invalid(e.to_string()))
}

/// `name[3]` 형태의 구간을 이름과 인덱스로 나눕니다.
pub(crate) fn split_index<'s>(entry: &Entry, segment: &'s str) -> Result<(&'s str, Option<usize>)> {
    match segment.strip_suffix(']').and_then(|s| s.split_once('[')) {
        Some((name, index)) => {
            let index: usize = index.parse()
                .map_err(|_| entry.malformed(format!("잘못된 인덱스: {}", segment)))?;
            if index > MAX_INDEX {
                return Err(entry.malformed(format!("인덱스가 너무 큽니다 (최대 {})", MAX_INDEX)));
            }
            Ok((name, Some(index)))
        }
        None if segment.contains('[') || segment.contains(']') => {
            Err(entry.malformed(format!("잘못된 인덱스: {}", segment)))
        }
        None => Ok((segment, None)),
    }
}

pub(crate) fn slot<T: Default>(items: &mut Vec<T>, index: usize) -> &mut T {
    if items.len() <= index {
        items.resize_with(index + 1, T::default);
    }
    &mut items[index]
}

/// `tls.domains[n].main|sans`
pub(crate) fn apply_domain(domains: &mut Vec<Domain>, entry: &Entry, segment: &str, field: &str) -> Result<()> {
    let (_, index) = split_index(entry, segment)?;
    let index = index.ok_or_else(|| entry.malformed("domains 는 인덱스가 필요합니다"))?;
    let domain = slot(domains, index);
    match field {
        "main" => domain.main = entry.value.to_string(),
        "sans" => domain.sans = parse_list(entry.value),
        _ => return Err(entry.unknown()),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn test_ignores_unrelated_labels() {
        let config = decode_configuration(
            &labels(&[
                ("traefik.enabled", "true"),
                ("traefik.docker.network", "proxy"),
                ("com.example.owner", "me"),
            ]),
            "traefik.",
        ).unwrap();
        assert!(config.is_empty());
    }

    #[test]
    fn test_decodes_http_router_and_service() {
        let config = decode_configuration(
            &labels(&[
                ("traefik.http.routers.web.rule", "Host(`example.com`)"),
                ("traefik.http.routers.web.entrypoints", "web, websecure"),
                ("traefik.http.routers.web.priority", "10"),
                ("traefik.http.services.web.loadbalancer.server.port", "8080"),
            ]),
            "traefik.",
        ).unwrap();

        let router = &config.http.routers["web"];
        assert_eq!(router.rule, "Host(`example.com`)");
        assert_eq!(router.entry_points, vec!["web", "websecure"]);
        assert_eq!(router.priority, Some(10));
        assert!(router.service.is_empty());

        let lb = &config.http.services["web"].load_balancer;
        assert_eq!(lb.pass_host_header, Some(true));
        assert_eq!(lb.servers.len(), 1);
        assert_eq!(lb.servers[0].port, "8080");
        assert_eq!(lb.servers[0].scheme, "http");
        assert!(lb.servers[0].url.is_empty());
    }

    #[test]
    fn test_field_names_are_case_insensitive_but_names_are_not() {
        let config = decode_configuration(
            &labels(&[("Traefik.HTTP.Routers.MyApp.Rule", "Host(`a`)")]),
            "traefik.",
        ).unwrap();
        assert_eq!(config.http.routers["MyApp"].rule, "Host(`a`)");
    }

    #[test]
    fn test_custom_prefix() {
        let config = decode_configuration(
            &labels(&[
                ("proxy.http.routers.web.rule", "Host(`a`)"),
                ("traefik.http.routers.other.rule", "Host(`b`)"),
            ]),
            "proxy.",
        ).unwrap();
        assert!(config.http.routers.contains_key("web"));
        assert!(!config.http.routers.contains_key("other"));
    }

    #[test]
    fn test_unknown_field_fails() {
        let result = decode_configuration(
            &labels(&[("traefik.http.routers.web.bogus", "1")]),
            "traefik.",
        );
        assert!(matches!(result, Err(LabelError::UnknownField { .. })));
    }

    #[test]
    fn test_unknown_kind_fails() {
        let result = decode_configuration(
            &labels(&[("traefik.http.gateways.web.rule", "x")]),
            "traefik.",
        );
        assert!(matches!(result, Err(LabelError::UnknownField { .. })));
    }

    #[test]
    fn test_invalid_integer_fails() {
        let result = decode_configuration(
            &labels(&[("traefik.http.routers.web.priority", "high")]),
            "traefik.",
        );
        assert!(matches!(result, Err(LabelError::InvalidValue { .. })));
    }

    #[test]
    fn test_short_key_fails() {
        let result = decode_configuration(&labels(&[("traefik.http.routers", "x")]), "traefik.");
        assert!(matches!(result, Err(LabelError::MalformedKey { .. })));
    }

    #[test]
    fn test_split_index() {
        let entry = Entry {
            key: "k",
            name: "n",
            fields: vec![],
            raw_fields: vec![],
            value: "",
        };
        assert_eq!(split_index(&entry, "domains[2]").unwrap(), ("domains", Some(2)));
        assert_eq!(split_index(&entry, "domains").unwrap(), ("domains", None));
        assert!(split_index(&entry, "domains[x]").is_err());
        assert!(split_index(&entry, "domains[9999]").is_err());
        assert!(split_index(&entry, "domains]").is_err());
    }

    #[test]
    fn test_parse_list_trims_and_skips_empty() {
        assert_eq!(parse_list(" a, b ,,c"), vec!["a", "b", "c"]);
        assert!(parse_list("").is_empty());
    }
}
