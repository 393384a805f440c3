use std::fmt;
use std::path::PathBuf;

/// 설정 로드/검증 오류. `setting` 은 환경 변수 이름입니다 (TOML 에서도 같은 이름으로 보고).
#[derive(Debug)]
pub enum SettingsError {
    Invalid {
        setting: &'static str,
        value: String,
        reason: String,
    },
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    Toml(toml::de::Error),
}

impl SettingsError {
    pub(crate) fn invalid(setting: &'static str, value: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Invalid {
            setting,
            value: value.into(),
            reason: reason.into(),
        }
    }
}

impl From<toml::de::Error> for SettingsError {
    fn from(err: toml::de::Error) -> Self {
        Self::Toml(err)
    }
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Invalid { setting, value, reason } =>
                write!(f, "{}='{}' 사용 불가: {}", setting, value, reason),
            Self::Read { path, source } =>
                write!(f, "설정 파일 {} 을 읽을 수 없습니다: {}", path.display(), source),
            Self::Toml(e) => write!(f, "TOML 형식 오류: {}", e),
        }
    }
}

impl std::error::Error for SettingsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Invalid { .. } => None,
            Self::Read { source, .. } => Some(source),
            Self::Toml(e) => Some(e),
        }
    }
}
