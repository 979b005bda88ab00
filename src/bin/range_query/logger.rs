use log::LevelFilter;

/// Installs the global logger. Output goes to stderr so query results on stdout stay clean.
///
/// `RUST_LOG` overrides the level chosen by `--verbose`.
pub fn init(verbosity: u8) {
    env_logger::Builder::new()
        .filter_level(verbosity_level(verbosity))
        .parse_default_env()
        .format_timestamp(None)
        .format_target(false)
        .init();
}

/// Each `-v` lowers the threshold by one level, starting from info.
fn verbosity_level(num: u8) -> LevelFilter {
    match num {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        2.. => LevelFilter::Trace,
    }
}
