//! Native log output for hosts that run the wallet outside a browser
//! (tests, CLI tools). The browser build logs through the console instead.

use tracing_subscriber::{fmt, EnvFilter};

/// Directive used when `RUST_LOG` is unset or unparsable.
pub const DEFAULT_DIRECTIVE: &str = "cactus_standard=info";

/// Line format of the stderr subscriber.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl LogFormat {
    pub const ENV: &'static str = "CACTUS_LOG_JSON";

    /// `1` or `true` (any case) selects JSON lines.
    pub fn from_env_value(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some(v) if v == "1" || v.eq_ignore_ascii_case("true") => LogFormat::Json,
            _ => LogFormat::Pretty,
        }
    }

    pub fn from_env() -> Self {
        Self::from_env_value(std::env::var(Self::ENV).ok().as_deref())
    }
}

fn filter_from(rust_log: Option<&str>) -> EnvFilter {
    rust_log
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_DIRECTIVE))
}

/// Install the stderr subscriber from `RUST_LOG` and `CACTUS_LOG_JSON`.
/// Returns false when a global subscriber was already set.
pub fn init_logging() -> bool {
    init_logging_with(LogFormat::from_env(), std::env::var("RUST_LOG").ok().as_deref())
}

pub fn init_logging_with(format: LogFormat, rust_log: Option<&str>) -> bool {
    let env_filter = filter_from(rust_log);
    let builder = fmt::Subscriber::builder().with_env_filter(env_filter).with_writer(std::io::stderr);
    let installed = match format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
    };
    installed.is_ok()
}
