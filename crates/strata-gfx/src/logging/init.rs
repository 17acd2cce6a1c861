use std::sync::Once;

/// Logger configuration.
///
/// `env_filter` uses `env_logger` filter syntax, e.g.
/// `"strata_gfx=debug,wgpu_core=warn"`. When unset, `RUST_LOG` is read, and
/// without either `default_level` applies.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub env_filter: Option<String>,
    pub default_level: log::LevelFilter,
    pub write_style: env_logger::WriteStyle,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            env_filter: None,
            default_level: log::LevelFilter::Info,
            write_style: env_logger::WriteStyle::Auto,
        }
    }
}

/// Filter actually applied for `config` given the `RUST_LOG` value.
fn resolve_filter(config: &LoggingConfig, rust_log: Option<String>) -> String {
    config
        .env_filter
        .clone()
        .or(rust_log)
        .filter(|f| !f.trim().is_empty())
        .unwrap_or_else(|| config.default_level.to_string().to_lowercase())
}

static INIT: Once = Once::new();

/// Installs the global logger. Later calls are ignored.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let filter = resolve_filter(&config, std::env::var("RUST_LOG").ok());

        let mut builder = env_logger::Builder::new();
        builder.parse_filters(&filter);
        builder.write_style(config.write_style);

        // Another logger may already be installed (test harnesses do this).
        if builder.try_init().is_err() {
            return;
        }

        log::debug!("logging initialized with filter `{filter}`");
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_filter_wins_over_environment() {
        let config = LoggingConfig {
            env_filter: Some("strata_gfx=trace".into()),
            ..Default::default()
        };
        assert_eq!(resolve_filter(&config, Some("warn".into())), "strata_gfx=trace");
    }

    #[test]
    fn environment_is_used_when_no_filter_is_set() {
        let config = LoggingConfig::default();
        assert_eq!(resolve_filter(&config, Some("debug".into())), "debug");
    }

    #[test]
    fn default_level_is_the_fallback() {
        let config = LoggingConfig {
            default_level: log::LevelFilter::Warn,
            ..Default::default()
        };
        assert_eq!(resolve_filter(&config, None), "warn");
        assert_eq!(resolve_filter(&config, Some("  ".into())), "warn");
    }
}
