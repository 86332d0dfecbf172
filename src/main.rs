/// Main TVAT entry point: native editor window over the annotation backend.
fn main() {
    use std::path::PathBuf;
    use tvat::AppConfig;

    // An explicit config path must load; the default path falls back to defaults
    let explicit = std::env::args_os().nth(1).map(PathBuf::from);
    let (config, write_defaults) = match &explicit {
        Some(path) => match AppConfig::load_from_path(path) {
            Ok(config) => (config, false),
            Err(e) => {
                eprintln!("Failed to load configuration {:?}: {}", path, e);
                std::process::exit(2);
            }
        },
        None => match AppConfig::load_from_default_path() {
            Some(config) => (config, false),
            None => {
                let missing = AppConfig::default_path().is_some_and(|p| !p.exists());
                (AppConfig::default(), missing)
            }
        },
    };

    // RUST_LOG overrides the configured level
    env_logger::Builder::new()
        .filter_level(config.preferences.log_level.to_level_filter())
        .parse_default_env()
        .init();

    // First run: leave an editable config behind
    if write_defaults {
        if let Err(e) = config.save_to_default_path() {
            log::warn!("Failed to write default configuration: {}", e);
        }
    }

    if let Err(e) = tvat::gui::run(config) {
        log::error!("Application error: {}", e);
        eprintln!("Application error: {}", e);
        std::process::exit(1);
    }
}
