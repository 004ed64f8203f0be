use colored::{ColoredString, Colorize};
use log::{Level, LevelFilter, Log, Metadata, Record};

/// Writes log records to stderr with a colored level tag.
struct ConsoleLogger;

static LOGGER: ConsoleLogger = ConsoleLogger;

impl Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        eprintln!(
            "{} {} {}",
            level_tag(record.level()),
            record.target().dimmed(),
            record.args()
        );
    }

    fn flush(&self) {}
}

fn level_tag(level: Level) -> ColoredString {
    let tag = format!("{level:5}");
    match level {
        Level::Error => tag.bright_red(),
        Level::Warn => tag.bright_yellow(),
        Level::Info => tag.bright_blue(),
        Level::Debug => tag.bright_cyan(),
        Level::Trace => tag.bright_magenta(),
    }
}

/// Only errors by default; `verbose` shows the per-slot scan trace.
pub fn level_filter(verbose: bool) -> LevelFilter {
    if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Error
    }
}

pub fn init(verbose: bool) -> Result<(), log::SetLoggerError> {
    log::set_logger(&LOGGER)?;
    log::set_max_level(level_filter(verbose));
    Ok(())
}
