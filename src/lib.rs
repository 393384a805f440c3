//! Podman 컨테이너 라벨을 읽어 Traefik HTTP provider 용 동적 설정을 제공하는 서버입니다.
//!
//! # 주요 기능
//!
//! - `traefik.enabled=true` 라벨이 붙은 실행 중 컨테이너 조회
//! - Traefik 라벨 디코딩 및 컨테이너별 설정 병합
//! - 공개 포트의 호스트 IP 를 반영한 백엔드 URL 생성
//! - `GET /traefik/config`, `GET /healthcheck` 엔드포인트
//!
//! # 예제
//!
//! ```
//! use std::collections::HashMap;
//! use podman_traefik_config::labels::decode_configuration;
//!
//! let labels = HashMap::from([
//!     ("traefik.http.routers.web.rule".to_string(), "Host(`example.com`)".to_string()),
//!     ("traefik.http.services.web.loadbalancer.server.port".to_string(), "8080".to_string()),
//! ]);
//!
//! let config = decode_configuration(&labels, "traefik.").unwrap();
//! assert_eq!(config.http.routers["web"].rule, "Host(`example.com`)");
//! assert!(config.http.services.contains_key("web"));
//! ```

pub mod logging;
pub mod settings;
pub mod docker;
pub mod dynamic;
pub mod labels;
pub mod translator;
pub mod server;
