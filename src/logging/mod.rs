//! Logging infrastructure - structured tracing for the interop layer
//!
//! Design: Uses `tracing` for structured, contextual logging with:
//! - Configurable log levels from the environment or a config file
//! - Zero-cost when disabled (per-call events are `trace`)
//! - Optional JSON output and file sink

use once_cell::sync::OnceCell;
use std::io;
use std::path::Path;
// Re-export tracing macros for use throughout the crate
pub use tracing::{debug, error, info, trace, warn, Level};

use tracing_subscriber::{
    fmt::{self, format::FmtSpan, MakeWriter},
    layer::SubscriberExt,
    registry::LookupSpan,
    util::SubscriberInitExt,
    EnvFilter, Layer, Registry,
};

/// Global logging state
static LOGGER_INITIALIZED: OnceCell<()> = OnceCell::new();

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    /// Default log level
    pub level: Level,
    /// Enable file logging
    pub file_output: bool,
    /// Log file path (if file_output enabled)
    pub log_path: Option<String>,
    /// Enable JSON format (vs human-readable)
    pub json_format: bool,
    /// Show span events (enter/exit)
    pub show_spans: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: Level::INFO,
            file_output: false,
            log_path: None,
            json_format: false,
            show_spans: false,
        }
    }
}

impl LogConfig {
    /// Create config from environment variables
    pub fn from_env() -> Self {
        let mut config = Self::default();

        // UNREAL_INTEROP_LOG_LEVEL: trace, debug, info, warn, error
        if let Ok(level_str) = std::env::var("UNREAL_INTEROP_LOG_LEVEL") {
            config.level = parse_level(&level_str);
        }

        // UNREAL_INTEROP_LOG_FILE: path to log file
        if let Ok(path) = std::env::var("UNREAL_INTEROP_LOG_FILE") {
            config.file_output = true;
            config.log_path = Some(path);
        }

        config.json_format = std::env::var("UNREAL_INTEROP_LOG_JSON").is_ok();
        config.show_spans = std::env::var("UNREAL_INTEROP_LOG_SPANS").is_ok();

        config
    }

    /// Errors only
    pub fn performance() -> Self {
        Self {
            level: Level::ERROR,
            ..Self::default()
        }
    }

    /// Verbose logging, including every native call
    pub fn debug() -> Self {
        Self {
            level: Level::TRACE,
            file_output: true,
            log_path: Some("unreal_interop.log".to_string()),
            json_format: false,
            show_spans: true,
        }
    }
}

/// Parse a level name, falling back to INFO
pub fn parse_level(name: &str) -> Level {
    match name.trim().to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" | "warning" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}

/// Initialize logging with configuration from the environment
pub fn init() {
    init_with_config(&LogConfig::from_env());
}

/// Initialize logging with custom configuration. Only the first call has an
/// effect.
pub fn init_with_config(config: &LogConfig) {
    LOGGER_INITIALIZED.get_or_init(|| {
        let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "unreal_interop={level},interop={level}",
                level = config.level.as_str().to_lowercase()
            ))
        });

        let mut layers: Vec<Box<dyn Layer<Registry> + Send + Sync>> =
            vec![format_layer(io::stdout, config, true)];

        if let Some(path) = config.log_path.as_deref().filter(|_| config.file_output) {
            let path = Path::new(path);
            let dir = path.parent().unwrap_or_else(|| Path::new("."));
            let file = path
                .file_name()
                .map(|name| name.to_os_string())
                .unwrap_or_else(|| "unreal_interop.log".into());
            layers.push(format_layer(
                tracing_appender::rolling::never(dir, file),
                config,
                false,
            ));
        }

        // Another subscriber may already be installed by the host
        tracing_subscriber::registry()
            .with(layers)
            .with(env_filter)
            .try_init()
            .ok();
    });
}

fn format_layer<S, W>(writer: W, config: &LogConfig, ansi: bool) -> Box<dyn Layer<S> + Send + Sync>
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let span_events = if config.show_spans {
        FmtSpan::ENTER | FmtSpan::CLOSE
    } else {
        FmtSpan::NONE
    };

    let layer = fmt::layer()
        .with_writer(writer)
        .with_ansi(ansi)
        .with_span_events(span_events)
        .with_target(true)
        .with_thread_ids(cfg!(debug_assertions));

    if config.json_format {
        layer.json().boxed()
    } else {
        layer.compact().boxed()
    }
}

/// Check if logging is initialized
pub fn is_initialized() -> bool {
    LOGGER_INITIALIZED.get().is_some()
}

// ============================================================================
// Interop-specific logging functions
// ============================================================================

/// Log the start of a binding table resolution
pub fn log_table_resolving(table: &str, slots: usize) {
    tracing::debug!(
        target: "interop",
        event = "table_resolving",
        table,
        slots,
        "Resolving native binding table"
    );
}

/// Log a successfully resolved table
pub fn log_table_resolved(table: &str, slots: usize) {
    tracing::info!(
        target: "interop",
        event = "table_resolved",
        table,
        slots,
        "Native binding table resolved"
    );
}

/// Log a slot the resolver could not supply
pub fn log_slot_missing(table: &str, slot: &str) {
    tracing::error!(
        target: "interop",
        event = "slot_missing",
        table,
        slot,
        "Missing native symbol"
    );
}

/// Log a table left in the failed state
pub fn log_table_failed(table: &str, error: &str) {
    tracing::error!(
        target: "interop",
        event = "table_failed",
        table,
        error,
        "Native binding table unavailable"
    );
}

/// Log a single native call (trace level, hot path)
#[inline]
pub fn log_native_call(table: &str, slot: &str) {
    tracing::trace!(
        target: "interop",
        event = "native_call",
        table,
        slot,
        "Native call"
    );
}

/// Mirror a message forwarded to the host log
pub fn log_host_message(level: Level, message: &str) {
    if level == Level::ERROR {
        tracing::error!(target: "interop::host", "{}", message);
    } else if level == Level::WARN {
        tracing::warn!(target: "interop::host", "{}", message);
    } else if level == Level::TRACE {
        tracing::trace!(target: "interop::host", "{}", message);
    } else if level == Level::DEBUG {
        tracing::debug!(target: "interop::host", "{}", message);
    } else {
        tracing::info!(target: "interop::host", "{}", message);
    }
}
