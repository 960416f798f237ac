use env_logger::Env;
use log::debug;

/// `RUST_LOG` wins over `level`; `info` when neither is set.
pub fn init(level: Option<&str>) {
    let filter = level.unwrap_or("info");
    let installed = env_logger::Builder::from_env(Env::default().default_filter_or(filter))
        .format_target(false)
        .try_init()
        .is_ok();
    if installed {
        debug!("logging: default filter {}", filter);
    }
}
