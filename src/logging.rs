use std::path::Path;
use std::time::Instant;
use time::format_description::well_known::Rfc3339;
use tracing::{debug, error, info, info_span, warn, Dispatch};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{InitError, RollingFileAppender, Rotation};
use tracing_subscriber::fmt::{time::UtcTime, writer::BoxMakeWriter};
use tracing_subscriber::EnvFilter;

use crate::settings::{LogFormat, LogOutput, LogSettings};

/// 명시적으로 생성해 HTTP 서버에 넘겨주는 로거.
/// 파일 출력일 때는 `_guard` 가 살아있는 동안만 로그가 기록됩니다.
pub struct Logger {
    pub dispatch: Dispatch,
    _guard: Option<WorkerGuard>,
}

impl Logger {
    /// 설정을 읽기 전이나 실패했을 때 쓰는 기본 로거 (stdout, text, info)
    pub fn fallback() -> Self {
        Self {
            dispatch: build_dispatch(&LogSettings::default(), BoxMakeWriter::new(std::io::stdout), true),
            _guard: None,
        }
    }
}

pub fn init_logging(settings: &LogSettings) -> Result<Logger, InitError> {
    match &settings.output {
        LogOutput::Stdout => Ok(Logger {
            dispatch: build_dispatch(settings, BoxMakeWriter::new(std::io::stdout), true),
            _guard: None,
        }),
        LogOutput::File(path) => {
            let path = Path::new(path);
            let directory = path.parent()
                .filter(|dir| !dir.as_os_str().is_empty())
                .unwrap_or_else(|| Path::new("."));
            let file_name = path.file_name()
                .map(|name| name.to_string_lossy().to_string())
                .unwrap_or_else(|| "ptoc.log".to_string());

            let appender = RollingFileAppender::builder()
                .rotation(Rotation::NEVER)
                .filename_prefix(file_name)
                .build(directory)?;
            let (writer, guard) = tracing_appender::non_blocking(appender);

            Ok(Logger {
                dispatch: build_dispatch(settings, BoxMakeWriter::new(writer), false),
                _guard: Some(guard),
            })
        }
    }
}

fn build_dispatch(settings: &LogSettings, writer: BoxMakeWriter, ansi: bool) -> Dispatch {
    // 레벨은 설정에서만 정합니다. RUST_LOG 는 읽지 않습니다.
    let filter = EnvFilter::builder()
        .with_default_directive(settings.level.as_level_filter().into())
        .parse_lossy("");

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_timer(UtcTime::new(Rfc3339))
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .with_ansi(ansi)
        .with_writer(writer);

    match settings.format {
        LogFormat::Text => Dispatch::new(builder.finish()),
        LogFormat::Json => Dispatch::new(builder.json().finish()),
    }
}

/// 요청 하나의 처리 기록. 응답을 만든 뒤 `log_request` 로 한 번만 남깁니다.
#[derive(Debug)]
pub struct RequestLog {
    pub request_id: String,
    pub method: String,
    pub path: String,
    pub status_code: u16,
    pub duration_ms: u64,
    pub error: Option<String>,
    started: Instant,
}

impl RequestLog {
    pub fn new(request_id: String) -> Self {
        Self {
            request_id,
            method: String::new(),
            path: String::new(),
            status_code: 0,
            duration_ms: 0,
            error: None,
            started: Instant::now(),
        }
    }

    pub fn with_request<B>(&mut self, req: &hyper::Request<B>) {
        self.method = req.method().to_string();
        self.path = req.uri().path().to_string();
        debug!(request_id = %self.request_id, method = %self.method, path = %self.path, "요청 수신");
    }

    pub fn with_response(&mut self, status: hyper::StatusCode) {
        self.status_code = status.as_u16();
        self.duration_ms = self.started.elapsed().as_millis() as u64;
    }

    pub fn with_error(&mut self, error: impl std::fmt::Display) {
        self.error = Some(error.to_string());
    }
}

/// 오류가 있으면 ERROR, 4xx 는 WARN, 나머지는 INFO
pub fn log_request(log: &RequestLog) {
    let span = info_span!(
        "request",
        request_id = %log.request_id,
        method = %log.method,
        path = %log.path
    );
    let _enter = span.enter();

    match &log.error {
        Some(err) => error!(status = log.status_code, duration_ms = log.duration_ms, error = %err, "요청 실패"),
        None if log.status_code >= 400 => {
            warn!(status = log.status_code, duration_ms = log.duration_ms, "요청 거부")
        }
        None => info!(status = log.status_code, duration_ms = log.duration_ms, "요청 완료"),
    }
}
