//! Tracing subscriber setup

use rucfg_config::Config;
use rucfg_types::OutputFormat;
use tracing_subscriber::EnvFilter;

/// Install the global subscriber
///
/// `RUST_LOG` wins over the configured level; `--debug` raises the rucfg
/// crates to debug. In JSON output mode logs are JSON as well so stdout
/// stays machine-readable (logs always go to stderr).
pub fn init_tracing(config: &Config, json_mode: bool, debug_enabled: bool) {
    let default_directives = if debug_enabled {
        format!("{},rucfg=debug,rucfg_unit=debug,rucfg_limits=debug", config.logging.level)
    } else {
        config.logging.level.clone()
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(debug_enabled);

    if json_mode || config.logging.format == OutputFormat::Json {
        builder.json().init();
    } else {
        builder.init();
    }
}
