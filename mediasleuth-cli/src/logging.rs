// ============================================================================
// mediasleuth-cli/src/logging.rs
// ============================================================================
//
// LOGGING: env_logger Setup for the CLI
//
// The core library logs through the `log` facade only; the binary installs
// `env_logger` here. RUST_LOG wins when set, otherwise `--verbose` selects
// debug and the default is info. Every line carries a local timestamp.
//
// AI-ASSISTANT-INFO: Logger installation

// ---- External crate imports ----
use env_logger::{Builder, Env};

// ---- Standard library imports ----
use std::io::Write;

/// Default filter when RUST_LOG is unset.
pub fn default_filter(verbose: bool) -> &'static str {
    if verbose { "debug" } else { "info" }
}

/// Installs the global logger. Safe to call more than once.
pub fn init_logging(verbose: bool) {
    let result = Builder::from_env(Env::default().default_filter_or(default_filter(verbose)))
        .format(|buf, record| {
            writeln!(
                buf,
                "{} {:<5} [{}] {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f"),
                record.level(),
                record.target(),
                record.args()
            )
        })
        .try_init();

    if let Err(e) = result {
        log::debug!("Logger already installed: {}", e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter() {
        assert_eq!(default_filter(true), "debug");
        assert_eq!(default_filter(false), "info");
    }
}
