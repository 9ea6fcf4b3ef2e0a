use log::LevelFilter;
use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::error::Result;

pub fn init_logger(level: LevelFilter, target: env_logger::Target) {
    let mut builder = env_logger::Builder::new();
    builder
        .format(move |buf, record| {
            writeln!(
                buf,
                "{}: {} - {}",
                record.level(),
                record.target(),
                record.args()
            )
        })
        .target(target)
        .filter_level(level);

    let _ = builder.try_init();

    log::set_max_level(level);
}

pub fn parse_level(level: &str) -> Option<LevelFilter> {
    let lvl = match level.trim().to_lowercase().as_str() {
        "off" => LevelFilter::Off,
        "error" => LevelFilter::Error,
        "warn" | "warning" => LevelFilter::Warn,
        "info" => LevelFilter::Info,
        "debug" => LevelFilter::Debug,
        "trace" => LevelFilter::Trace,
        _ => return None,
    };
    Some(lvl)
}

pub fn set_debug_log_level() {
    init_logger(LevelFilter::Trace, env_logger::Target::Stdout);
}

/// Logs to stdout at the named level. Returns `false` for an unknown level.
pub fn set_log_level(level: &str) -> bool {
    match parse_level(level) {
        Some(lvl) => {
            init_logger(lvl, env_logger::Target::Stdout);
            true
        }
        None => false,
    }
}

/// Sends log output to a file, for when the terminal is taken by the UI.
pub fn log_to_file(level: LevelFilter, path: impl AsRef<Path>) -> Result<()> {
    let file = File::create(path)?;
    init_logger(level, env_logger::Target::Pipe(Box::new(file)));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_names() {
        assert_eq!(parse_level("Warning"), Some(LevelFilter::Warn));
        assert_eq!(parse_level(" trace "), Some(LevelFilter::Trace));
        assert_eq!(parse_level("off"), Some(LevelFilter::Off));
        assert_eq!(parse_level("verbose"), None);
    }
}
