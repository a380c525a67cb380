/// Logger setup
///
/// Storage failures are never shown to the user, so the log is the only
/// place they surface. Defaults to `info`; `RUST_LOG` overrides.

use env_logger::Env;

pub fn init() {
    let result = env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .try_init();

    if result.is_err() {
        log::debug!("logger already initialised");
    }
}
