/// Logger configuration.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Filter in `env_logger` syntax (e.g. "quill_engine=debug,wgpu_core=warn").
    /// Takes precedence over `RUST_LOG`.
    pub filter: Option<String>,
    pub write_style: env_logger::WriteStyle,
    /// Prefix each record with a millisecond timestamp.
    pub timestamps: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: None,
            write_style: env_logger::WriteStyle::Auto,
            timestamps: true,
        }
    }
}

/// wgpu internals are chatty at info.
pub const DEFAULT_FILTER: &str = "info,wgpu_core=warn,wgpu_hal=warn,naga=warn";

/// Chooses the filter string: `explicit`, else `env`, else [`DEFAULT_FILTER`].
/// Blank values count as unset.
pub fn resolve_filter(explicit: Option<&str>, env: Option<&str>) -> String {
    [explicit, env]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|f| !f.is_empty())
        .unwrap_or(DEFAULT_FILTER)
        .to_string()
}

/// Installs `env_logger` as the global logger.
///
/// Returns `false` when a logger is already installed; the existing one is
/// left alone, so calling this more than once is harmless.
pub fn init_logging(config: LoggingConfig) -> bool {
    let env = std::env::var(env_logger::DEFAULT_FILTER_ENV).ok();
    let filter = resolve_filter(config.filter.as_deref(), env.as_deref());

    let mut builder = env_logger::Builder::new();
    builder.parse_filters(&filter).write_style(config.write_style);
    if config.timestamps {
        builder.format_timestamp_millis();
    } else {
        builder.format_timestamp(None);
    }

    match builder.try_init() {
        Ok(()) => {
            log::debug!("logging initialized ({filter})");
            true
        }
        Err(_) => false,
    }
}
