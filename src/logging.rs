//! log4rs setup for the binaries.
//!
//! Stdout carries program output (addresses, progress), so the built-in
//! configuration only ever writes to stderr.

use log::LevelFilter;
use log4rs::append::console::{ConsoleAppender, Target};
use log4rs::config::{Appender, Config, Root};
use log4rs::encode::pattern::PatternEncoder;
use std::error::Error;
use std::path::Path;

/// Optional log4rs configuration file looked up in the working directory.
pub const LOG_CONFIG_FILE: &str = "log4rs.yml";

/// Map the number of `-v` flags to a level.
pub fn level_from_verbosity(verbose: u8) -> LevelFilter {
    match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

/// Whether [`LOG_CONFIG_FILE`] wins over the built-in stderr setup.
///
/// An explicit `-v` always gets the built-in setup at the requested level.
pub fn use_config_file(level: LevelFilter, file_present: bool) -> bool {
    file_present && level <= LevelFilter::Warn
}

/// Initialise logging from [`LOG_CONFIG_FILE`] if present and no `-v` was
/// given, otherwise to stderr at `level`.
pub fn init_logging(level: LevelFilter) -> Result<(), Box<dyn Error>> {
    if use_config_file(level, Path::new(LOG_CONFIG_FILE).exists()) {
        log4rs::init_file(LOG_CONFIG_FILE, Default::default())?;
        log::debug!("logging configured from {LOG_CONFIG_FILE}");
        return Ok(());
    }

    log4rs::init_config(stderr_config(level)?)?;
    Ok(())
}

fn stderr_config(level: LevelFilter) -> Result<Config, Box<dyn Error>> {
    let stderr = ConsoleAppender::builder()
        .target(Target::Stderr)
        .encoder(Box::new(PatternEncoder::new(
            "{d(%H:%M:%S)} {h({l:5})} {t} - {m}{n}",
        )))
        .build();

    let config = Config::builder()
        .appender(Appender::builder().build("stderr", Box::new(stderr)))
        .build(Root::builder().appender("stderr").build(level))?;
    Ok(config)
}
