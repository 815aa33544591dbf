use crate::config::Config;
use log::LevelFilter;
use simplelog::{ColorChoice, ConfigBuilder, TermLogger, TerminalMode};

/// Dependency modules whose log output is suppressed below Trace level.
const NOISY_MODULES: &[&str] = &["sqlx", "sea_orm", "tower", "tracing", "hyper", "axum"];

pub struct Logger {}

impl Logger {
    /// Initializes the global terminal logger from the runtime config.
    ///
    /// At Trace level everything is shown, dependencies included; at every
    /// other level the modules in [`NOISY_MODULES`] are filtered out so
    /// normal output stays readable.
    pub fn init_logger(config: &Config) {
        let mut builder = ConfigBuilder::new();
        builder.set_time_format_rfc3339();

        if config.log_level_filter != LevelFilter::Trace {
            for module in NOISY_MODULES {
                builder.add_filter_ignore_str(module);
            }
        }

        TermLogger::init(
            Self::to_simplelog_level(config.log_level_filter),
            builder.build(),
            TerminalMode::Mixed,
            ColorChoice::Auto,
        )
        .expect("Failed to start simplelog");
    }

    fn to_simplelog_level(level: LevelFilter) -> simplelog::LevelFilter {
        match level {
            LevelFilter::Off => simplelog::LevelFilter::Off,
            LevelFilter::Error => simplelog::LevelFilter::Error,
            LevelFilter::Warn => simplelog::LevelFilter::Warn,
            LevelFilter::Info => simplelog::LevelFilter::Info,
            LevelFilter::Debug => simplelog::LevelFilter::Debug,
            LevelFilter::Trace => simplelog::LevelFilter::Trace,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_conversion_covers_every_variant() {
        let levels = [
            LevelFilter::Off,
            LevelFilter::Error,
            LevelFilter::Warn,
            LevelFilter::Info,
            LevelFilter::Debug,
            LevelFilter::Trace,
        ];

        for level in levels {
            assert_eq!(
                Logger::to_simplelog_level(level) as u8,
                level as u8,
                "mismatch for {level:?}"
            );
        }
    }

    #[test]
    fn noisy_module_list_covers_the_orm_and_http_stack() {
        for module in ["sqlx", "sea_orm", "axum"] {
            assert!(NOISY_MODULES.contains(&module));
        }
    }
}
