use env_logger::Env;
use log::LevelFilter;

/// Sets up `env_logger` for the command-line tools.
///
/// `-v` raises the level to debug, `-vv` to trace; `-q` lowers it to warn, `-qq`
/// to error. `RUST_LOG` is honoured when neither flag is given.
pub fn init_logging(verbose: u8, quiet: u8) {
    let mut builder = env_logger::Builder::from_env(Env::default().default_filter_or("info"));
    builder.format_timestamp_millis();

    let level = match (verbose, quiet) {
        (0, 0) => None,
        (_, 1) => Some(LevelFilter::Warn),
        (_, q) if q > 1 => Some(LevelFilter::Error),
        (1, _) => Some(LevelFilter::Debug),
        _ => Some(LevelFilter::Trace),
    };
    if let Some(level) = level {
        builder.filter_level(level);
    }
    // A second initialisation (e.g. from tests) is harmless.
    let _ = builder.try_init();
}
