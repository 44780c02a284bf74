// Thu Oct 15 2026 - Alex

use log::LevelFilter;

pub struct LoggingUtils;

impl LoggingUtils {
    pub fn level_from_str(s: &str) -> LevelFilter {
        match s.to_lowercase().as_str() {
            "error" => LevelFilter::Error,
            "warn" | "warning" => LevelFilter::Warn,
            "info" => LevelFilter::Info,
            "debug" => LevelFilter::Debug,
            "trace" => LevelFilter::Trace,
            "off" => LevelFilter::Off,
            _ => LevelFilter::Warn,
        }
    }

    /// Logs to stderr; `RUST_LOG` still overrides per module.
    pub fn init(level: LevelFilter, color: bool) {
        let style = if color { env_logger::WriteStyle::Auto } else { env_logger::WriteStyle::Never };
        env_logger::Builder::new()
            .filter_level(level)
            .parse_default_env()
            .write_style(style)
            .format_timestamp(None)
            .try_init()
            .ok();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_from_str() {
        assert_eq!(LoggingUtils::level_from_str("DEBUG"), LevelFilter::Debug);
        assert_eq!(LoggingUtils::level_from_str("warning"), LevelFilter::Warn);
        assert_eq!(LoggingUtils::level_from_str("nonsense"), LevelFilter::Warn);
    }
}
