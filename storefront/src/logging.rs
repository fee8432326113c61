//! Tracing bootstrap for the storefront binary
//!
//! 控制台输出 + 可选的按天滚动文件 (text 或 JSON)。库代码只使用 `tracing`
//! 宏，从不安装 subscriber；只有 `main` 调用 [`init_logging`]。

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::{EnvFilter, Layer, Registry, fmt, prelude::*};

use crate::error::StorefrontError;

const DEBUG_DIRECTIVE: &str = "info,storefront=debug,foodie_client=debug,shared=debug";
const RELEASE_DIRECTIVE: &str = "warn,storefront=info";
const LOG_FILE_PREFIX: &str = "storefront.log";

/// 日志文件格式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    #[default]
    Text,
    /// One JSON object per line, for log shippers
    Json,
}

/// 日志设置, the `logging` section of the storefront config
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogSettings {
    /// `EnvFilter` directive. `RUST_LOG` overrides it when set.
    pub level: Option<String>,
    /// Daily file under `<data_dir>/logs`
    pub to_file: bool,
    pub file_format: LogFormat,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: None,
            to_file: true,
            file_format: LogFormat::Text,
        }
    }
}

impl LogSettings {
    /// Pick the filter directive: environment, then config, then build profile.
    pub fn directive(&self, from_env: Option<&str>) -> String {
        let pick = |d: Option<&str>| d.map(str::trim).filter(|d| !d.is_empty()).map(String::from);

        pick(from_env)
            .or_else(|| pick(self.level.as_deref()))
            .unwrap_or_else(|| {
                if cfg!(debug_assertions) {
                    DEBUG_DIRECTIVE.to_string()
                } else {
                    RELEASE_DIRECTIVE.to_string()
                }
            })
    }

    fn filter(&self) -> Result<EnvFilter, StorefrontError> {
        let env = std::env::var(EnvFilter::DEFAULT_ENV).ok();
        let directive = self.directive(env.as_deref());
        EnvFilter::try_new(&directive)
            .map_err(|e| StorefrontError::Config(format!("invalid log filter {directive:?}: {e}")))
    }
}

struct LocalTimer;

impl FormatTime for LocalTimer {
    fn format_time(&self, w: &mut fmt::format::Writer<'_>) -> std::fmt::Result {
        write!(w, "{}", chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f"))
    }
}

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

fn console_layer() -> BoxedLayer {
    fmt::layer()
        .with_timer(LocalTimer)
        .with_target(true)
        .with_writer(std::io::stdout)
        .boxed()
}

fn file_layer(settings: &LogSettings, log_dir: &Path) -> std::io::Result<(BoxedLayer, WorkerGuard)> {
    std::fs::create_dir_all(log_dir)?;
    let (writer, guard) =
        tracing_appender::non_blocking(tracing_appender::rolling::daily(log_dir, LOG_FILE_PREFIX));

    let layer = match settings.file_format {
        LogFormat::Text => fmt::layer()
            .with_timer(LocalTimer)
            .with_ansi(false)
            .with_file(true)
            .with_line_number(true)
            .with_thread_ids(true)
            .with_writer(writer)
            .boxed(),
        LogFormat::Json => fmt::layer()
            .json()
            .with_timer(LocalTimer)
            .with_current_span(false)
            .with_file(true)
            .with_line_number(true)
            .with_writer(writer)
            .boxed(),
    };
    Ok((layer, guard))
}

/// Install the global subscriber.
///
/// With file output on, the returned guard flushes the writer on drop and
/// must live as long as the process.
pub fn init_logging(
    settings: &LogSettings,
    log_dir: &Path,
) -> Result<Option<WorkerGuard>, StorefrontError> {
    let filter = settings.filter()?;

    let mut layers = vec![console_layer()];
    let guard = if settings.to_file {
        let (layer, guard) = file_layer(settings, log_dir)?;
        layers.push(layer);
        Some(guard)
    } else {
        None
    };

    tracing_subscriber::registry().with(layers).with(filter).init();

    tracing::info!(
        path = %log_dir.display(),
        to_file = settings.to_file,
        format = ?settings.file_format,
        "Tracing initialized"
    );
    Ok(guard)
}
