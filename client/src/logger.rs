//! Pluggable log sink for the client.
//!
//! The client never calls the `log` macros directly; it goes through a
//! [`Logger`] so callers (and tests) can capture diagnostics. [`LogFacade`]
//! is the default and forwards to the `log` crate with the fields attached as
//! structured key-values.

use std::fmt;
use std::sync::Arc;

use log::kv::{self, Key, Source, Value, VisitSource};
pub use log::Level;
use log::Record;

pub const LOG_TARGET: &str = "trendlab_client";

/// Key/value pairs attached to a log line.
pub type Fields<'a> = &'a [(&'a str, String)];

pub trait Logger: Send + Sync {
    fn log(&self, level: Level, message: &str, fields: Fields<'_>);
}

/// Forwards to whatever `log` implementation the application installed.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogFacade;

struct FieldSource<'a>(Fields<'a>);

impl Source for FieldSource<'_> {
    fn visit<'kvs>(&'kvs self, visitor: &mut dyn VisitSource<'kvs>) -> Result<(), kv::Error> {
        for (key, value) in self.0 {
            visitor.visit_pair(Key::from_str(key), Value::from(value.as_str()))?;
        }
        Ok(())
    }
}

impl Logger for LogFacade {
    fn log(&self, level: Level, message: &str, fields: Fields<'_>) {
        if level > log::max_level() {
            return;
        }
        let source = FieldSource(fields);
        log::logger().log(
            &Record::builder()
                .args(format_args!("{}", message))
                .level(level)
                .target(LOG_TARGET)
                .module_path_static(Some(module_path!()))
                .key_values(&source)
                .build(),
        );
    }
}

/// A [`Logger`] plus the verbose switch; debug lines are dropped unless
/// verbose is on.
#[derive(Clone)]
pub(crate) struct Diagnostics {
    logger: Arc<dyn Logger>,
    verbose: bool,
}

impl fmt::Debug for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Diagnostics")
            .field("verbose", &self.verbose)
            .finish_non_exhaustive()
    }
}

impl Diagnostics {
    pub(crate) fn new(logger: Arc<dyn Logger>, verbose: bool) -> Self {
        Self { logger, verbose }
    }

    pub(crate) fn debug(&self, message: &str, fields: Fields<'_>) {
        if self.verbose {
            self.logger.log(Level::Debug, message, fields);
        }
    }

    pub(crate) fn warn(&self, message: &str, fields: Fields<'_>) {
        self.logger.log(Level::Warn, message, fields);
    }

    pub(crate) fn error(&self, message: &str, fields: Fields<'_>) {
        self.logger.log(Level::Error, message, fields);
    }
}
