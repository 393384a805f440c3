use serde_json::{Map, Number, Value};
use super::{parse_list, split_index, Entry, Result};

/// 값이 항상 문자열인 맵 필드 (헤더 이름 → 값)
const MAP_FIELDS: &[&str] = &["customrequestheaders", "customresponseheaders", "sslproxyheaders"];

/// 숫자처럼 보여도 문자열로 남겨야 하는 필드
const STRING_FIELDS: &[&str] = &["port", "path", "prefix", "replacement", "regex"];

fn is_list_field(parent: &str, field: &str) -> bool {
    matches!(
        (parent, field),
        ("stripprefixregex", "regex")
            | (
                _,
                "prefixes"
                    | "sourcerange"
                    | "excludedips"
                    | "trustedips"
                    | "middlewares"
                    | "status"
                    | "users"
                    | "allowedhosts"
                    | "hostsproxyheaders"
                    | "accesscontrolallowheaders"
                    | "accesscontrolallowmethods"
                    | "accesscontrolalloworiginlist"
                    | "accesscontrolalloworiginlistregex"
                    | "accesscontrolexposeheaders"
                    | "authrequestheaders"
                    | "authresponseheaders"
                    | "excludedcontenttypes"
                    | "includedcontenttypes"
            )
    )
}

/// 미들웨어 라벨 하나를 JSON 트리에 넣습니다.
///
/// `middlewares.<name>.stripprefix.prefixes=/a,/b` 는 `{"stripprefix": {"prefixes": ["/a", "/b"]}}` 가 됩니다.
pub(super) fn insert(root: &mut Value, entry: &Entry) -> Result<()> {
    let Some((last, parents)) = entry.raw_fields.split_last() else {
        return Err(entry.malformed("필드가 없습니다"));
    };

    let mut node = root;
    for segment in parents {
        node = child(node, entry, segment)?;
    }

    let parent = match parents.last() {
        Some(segment) => split_index(entry, segment)?.0,
        None => entry.name,
    };
    let (field, index) = split_index(entry, last)?;
    let leaf = leaf_value(parent, field, index.is_some(), entry.value);

    let Value::Object(map) = node else {
        return Err(conflict(entry));
    };
    match index {
        None => {
            if map.get(field).is_some_and(|existing| existing.is_object() || existing.is_array()) {
                return Err(conflict(entry));
            }
            map.insert(field.to_string(), leaf);
        }
        Some(index) => {
            let items = map.entry(field.to_string()).or_insert_with(|| Value::Array(Vec::new()));
            let Value::Array(items) = items else {
                return Err(conflict(entry));
            };
            if items.len() <= index {
                items.resize(index + 1, Value::Null);
            }
            items[index] = leaf;
        }
    }

    Ok(())
}

fn child<'v>(node: &'v mut Value, entry: &Entry, segment: &str) -> Result<&'v mut Value> {
    let (name, index) = split_index(entry, segment)?;
    let Value::Object(map) = node else {
        return Err(conflict(entry));
    };

    let slot = map.entry(name.to_string()).or_insert_with(|| match index {
        Some(_) => Value::Array(Vec::new()),
        None => Value::Object(Map::new()),
    });

    let slot = match index {
        None => slot,
        Some(index) => {
            let Value::Array(items) = slot else {
                return Err(conflict(entry));
            };
            if items.len() <= index {
                items.resize(index + 1, Value::Null);
            }
            &mut items[index]
        }
    };

    if slot.is_null() {
        *slot = Value::Object(Map::new());
    }
    if !slot.is_object() {
        return Err(conflict(entry));
    }
    Ok(slot)
}

fn conflict(entry: &Entry) -> super::LabelError {
    entry.malformed("같은 경로에 값과 하위 필드가 함께 정의되어 있습니다")
}

fn leaf_value(parent: &str, field: &str, indexed: bool, value: &str) -> Value {
    let parent = parent.to_ascii_lowercase();
    let field = field.to_ascii_lowercase();

    if MAP_FIELDS.contains(&parent.as_str()) {
        return Value::String(value.to_string());
    }
    if !indexed && is_list_field(&parent, &field) {
        return Value::Array(parse_list(value).into_iter().map(Value::String).collect());
    }
    if STRING_FIELDS.contains(&field.as_str()) {
        return Value::String(value.to_string());
    }
    if value.eq_ignore_ascii_case("true") {
        return Value::Bool(true);
    }
    if value.eq_ignore_ascii_case("false") {
        return Value::Bool(false);
    }
    if let Ok(number) = value.parse::<i64>() {
        return Value::Number(Number::from(number));
    }
    Value::String(value.to_string())
}

#[cfg(test)]
mod tests {
    use crate::labels::decode_configuration;
    use serde_json::json;
    use std::collections::HashMap;

    fn decode(pairs: &[(&str, &str)]) -> crate::labels::Result<crate::dynamic::Configuration> {
        let labels: HashMap<String, String> = pairs.iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        decode_configuration(&labels, "traefik.")
    }

    #[test]
    fn test_middleware_tree_types() {
        let config = decode(&[
            ("traefik.http.middlewares.strip.stripprefix.prefixes", "/api,/v1"),
            ("traefik.http.middlewares.limit.ratelimit.average", "100"),
            ("traefik.http.middlewares.limit.ratelimit.period", "1s"),
            ("traefik.http.middlewares.secure.headers.framedeny", "true"),
            ("traefik.http.middlewares.secure.headers.customresponseheaders.X-Version", "42"),
            ("traefik.http.middlewares.https.redirectscheme.port", "443"),
        ]).unwrap();

        let middlewares = &config.http.middlewares;
        assert_eq!(middlewares["strip"], json!({"stripprefix": {"prefixes": ["/api", "/v1"]}}));
        assert_eq!(middlewares["limit"], json!({"ratelimit": {"average": 100, "period": "1s"}}));
        assert_eq!(
            middlewares["secure"],
            json!({"headers": {"framedeny": true, "customresponseheaders": {"X-Version": "42"}}})
        );
        assert_eq!(middlewares["https"], json!({"redirectscheme": {"port": "443"}}));
    }

    #[test]
    fn test_middleware_indexed_lists() {
        let config = decode(&[
            ("traefik.http.middlewares.chain.chain.middlewares[0]", "a"),
            ("traefik.http.middlewares.chain.chain.middlewares[1]", "b"),
        ]).unwrap();
        assert_eq!(config.http.middlewares["chain"], json!({"chain": {"middlewares": ["a", "b"]}}));
    }

    #[test]
    fn test_middleware_conflicting_paths_fail() {
        let result = decode(&[
            ("traefik.http.middlewares.x.headers", "1"),
            ("traefik.http.middlewares.x.headers.framedeny", "true"),
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_tcp_middleware() {
        let config = decode(&[("traefik.tcp.middlewares.allow.ipallowlist.sourcerange", "10.0.0.0/8, 192.168.0.0/16")]).unwrap();
        assert_eq!(
            config.tcp.middlewares["allow"],
            json!({"ipallowlist": {"sourcerange": ["10.0.0.0/8", "192.168.0.0/16"]}})
        );
    }
}
