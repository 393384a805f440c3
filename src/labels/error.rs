use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum LabelError {
    /// 라벨 키 형식 오류
    MalformedKey {
        key: String,
        reason: String,
    },
    /// 알 수 없는 필드
    UnknownField {
        key: String,
    },
    /// 값 변환 실패
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },
}

impl fmt::Display for LabelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LabelError::MalformedKey { key, reason } =>
                write!(f, "라벨 키 {} 형식 오류: {}", key, reason),
            LabelError::UnknownField { key } =>
                write!(f, "라벨 {}: 알 수 없는 필드", key),
            LabelError::InvalidValue { key, value, reason } =>
                write!(f, "라벨 {} 값 '{}' 오류: {}", key, value, reason),
        }
    }
}

impl std::error::Error for LabelError {}
