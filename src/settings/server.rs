use serde::Deserialize;
use std::env;
use super::SettingsError;

#[derive(Clone, Debug, Deserialize)]
pub struct ServerSettings {
    /// 리스닝 주소 (기본값: 0.0.0.0)
    #[serde(default = "default_host")]
    pub host: String,

    /// 리스닝 포트 (기본값: 5000)
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String { "0.0.0.0".to_string() }
fn default_port() -> u16 { 5000 }

/// 환경 변수를 읽어 파싱합니다. 없거나 빈 문자열이면 기본값을 사용합니다.
pub fn parse_env_var<T, F>(name: &'static str, default: F) -> Result<T, SettingsError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
    F: FnOnce() -> T,
{
    match env::var(name) {
        Ok(val) if val.is_empty() => Ok(default()),
        Ok(val) => val.parse().map_err(|e: T::Err| SettingsError::invalid(name, val.as_str(), e.to_string())),
        Err(env::VarError::NotPresent) => Ok(default()),
        Err(env::VarError::NotUnicode(raw)) => {
            Err(SettingsError::invalid(name, raw.to_string_lossy(), "UTF-8 이 아닙니다"))
        }
    }
}

impl ServerSettings {
    const MIN_PORT: u16 = 1;
    const MAX_PORT: u16 = 65535;

    fn parse_port(name: &'static str, value: &str) -> Result<u16, SettingsError> {
        value.parse::<u16>().map_err(|_| {
            SettingsError::invalid(name, value, format!("포트는 {}-{} 범위여야 합니다", Self::MIN_PORT, Self::MAX_PORT))
        })
    }

    pub fn from_env() -> Result<Self, SettingsError> {
        let port: String = parse_env_var("PTOC_PORT", || default_port().to_string())?;

        let settings = Self {
            host: parse_env_var("PTOC_HOST", default_host)?,
            port: Self::parse_port("PTOC_PORT", &port)?,
        };

        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.port < Self::MIN_PORT {
            return Err(SettingsError::invalid("PTOC_PORT", self.port.to_string(), "포트는 0이 될 수 없습니다"));
        }

        if self.host.trim().is_empty() {
            return Err(SettingsError::invalid("PTOC_HOST", self.host.as_str(), "리스닝 주소는 비어있을 수 없습니다"));
        }

        Ok(())
    }
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}
