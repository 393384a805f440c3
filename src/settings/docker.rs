use serde::Deserialize;
use std::net::IpAddr;
use std::path::PathBuf;
use super::{SettingsError, parse_env_var};
pub type Result<T> = std::result::Result<T, SettingsError>;

#[derive(Debug, Clone, Deserialize)]
pub struct DockerSettings {
    /// Podman(Docker 호환) API 소켓 경로
    #[serde(default = "default_socket_path")]
    pub socket_path: PathBuf,

    /// 백엔드 URL 에 사용할 기본 IP
    #[serde(default = "default_bind_ip")]
    pub bind_ip: String,

    /// 라벨 접두사
    #[serde(default = "default_label_prefix")]
    pub label_prefix: String,
}

impl DockerSettings {
    pub fn from_env() -> Result<Self> {
        let settings = Self {
            socket_path: parse_env_var("PTOC_SOCKET", default_socket_path)?,
            bind_ip: parse_env_var("PTOC_IP", default_bind_ip)?,
            label_prefix: parse_env_var("PTOC_LABEL_PREFIX", default_label_prefix)?,
        };
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        if self.bind_ip.parse::<IpAddr>().is_err() {
            return Err(SettingsError::invalid("PTOC_IP", self.bind_ip.as_str(), "유효한 IP 주소가 아닙니다"));
        }

        if self.socket_path.as_os_str().is_empty() {
            return Err(SettingsError::invalid("PTOC_SOCKET", "", "소켓 경로는 비어있을 수 없습니다"));
        }

        // 라벨 접두사 길이 제한
        if self.label_prefix.len() > 100 {
            return Err(SettingsError::invalid("PTOC_LABEL_PREFIX", self.label_prefix.as_str(), "라벨 접두사가 너무 깁니다 (최대 100자)"));
        }

        if self.label_prefix.len() < 2 || !self.label_prefix.ends_with('.') {
            return Err(SettingsError::invalid("PTOC_LABEL_PREFIX", self.label_prefix.as_str(), "라벨 접두사는 '.'으로 끝나야 합니다"));
        }

        Ok(())
    }

    /// 라우팅 대상 컨테이너를 고르는 라벨 필터 (`traefik.enabled=true`)
    pub fn enabled_label_filter(&self) -> String {
        format!("{}enabled=true", self.label_prefix)
    }
}

impl Default for DockerSettings {
    fn default() -> Self {
        Self {
            socket_path: default_socket_path(),
            bind_ip: default_bind_ip(),
            label_prefix: default_label_prefix(),
        }
    }
}

fn default_socket_path() -> PathBuf {
    PathBuf::from(format!("/run/user/{}/podman/podman.sock", current_uid()))
}

#[cfg(unix)]
fn current_uid() -> u32 {
    // SAFETY: getuid 는 항상 성공하며 부수 효과가 없습니다.
    unsafe { libc::getuid() }
}

#[cfg(not(unix))]
fn current_uid() -> u32 {
    1000
}

fn default_bind_ip() -> String {
    "127.0.0.1".to_string()
}

fn default_label_prefix() -> String {
    "traefik.".to_string()
}
