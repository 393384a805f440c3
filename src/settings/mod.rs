use std::{env, path::Path};
use serde::Deserialize;
use tracing::debug;

mod server;
pub mod logging;
mod error;
pub mod docker;

pub use server::ServerSettings;
pub use logging::{LogFormat, LogLevel, LogOutput, LogSettings};
pub use docker::DockerSettings;
pub use error::SettingsError;

pub type Result<T> = std::result::Result<T, SettingsError>;
pub use server::parse_env_var;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    // 서버 설정
    #[serde(default)]
    pub server: ServerSettings,

    // 로깅 설정
    #[serde(default)]
    pub logging: LogSettings,

    // 컨테이너 런타임 설정
    #[serde(default)]
    pub docker: DockerSettings,
}

impl Settings {
    /// `PTOC_CONFIG_FILE` 이 지정되어 있으면 TOML 파일을, 아니면 환경 변수를 읽습니다.
    pub async fn load() -> Result<Self> {
        match env::var("PTOC_CONFIG_FILE") {
            Ok(config_path) if !config_path.is_empty() => Self::from_toml_file(&config_path).await,
            _ => Self::from_env(),
        }
    }

    pub async fn from_toml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        debug!(path = %path.as_ref().display(), "TOML 설정 파일 로드");
        let content = tokio::fs::read_to_string(&path).await.map_err(|e| SettingsError::Read {
            path: path.as_ref().to_path_buf(),
            source: e,
        })?;

        let settings = Self::from_toml_str(&content)?;
        Ok(settings)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let settings: Self = toml::from_str(content)?;

        settings.validate()?;
        Ok(settings)
    }

    pub fn from_env() -> Result<Self> {
        let settings = Self {
            server: ServerSettings::from_env()?,
            logging: LogSettings::from_env()?,
            docker: DockerSettings::from_env()?,
        };

        settings.validate()?;
        Ok(settings)
    }

    /// 설정 유효성 검증
    pub fn validate(&self) -> Result<()> {
        self.server.validate()?;
        self.docker.validate()?;
        Ok(())
    }
}
