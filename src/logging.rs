//! Nested logging context for build steps.
//!
//! A [`Log`] wraps a sink and an indentation depth. Each step logs its own
//! `[Name]` header at [`LogLevel::Normal`] and its parameters at
//! [`LogLevel::Verbose`], then hands `log.indented()` to the steps it triggers so
//! their output nests visually under it:
//!
//! ```text
//! [MakeXcframework]
//! - ios: build/ios/Sdk.framework
//!   [GetArchs]
//!   - framework: build/ios/Sdk.framework
//! ```
//!
//! Contexts are plain values. Deriving a child never mutates the parent.

use std::fmt;
use std::io::Write;
use std::sync::Arc;
use termcolor::{BufferWriter, Color, ColorChoice, ColorSpec, WriteColor};

/// Verbosity tier of a log message.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum LogLevel {
    /// Step headers
    Normal,
    /// Step parameters and tool output
    Verbose,
}

type Sink = dyn Fn(LogLevel, &str) + Send + Sync;

/// Logging context carrying a sink and the current indentation depth.
#[derive(Clone)]
pub struct Log {
    sink: Arc<Sink>,
    depth: usize,
}

impl fmt::Debug for Log {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Log")
            .field("sink", &"<sink>")
            .field("depth", &self.depth)
            .finish()
    }
}

impl Log {
    /// Creates a root context writing to `sink`.
    pub fn new<F>(sink: F) -> Self
    where
        F: Fn(LogLevel, &str) + Send + Sync + 'static,
    {
        Self {
            sink: Arc::new(sink),
            depth: 0,
        }
    }

    /// Colored terminal output.
    ///
    /// Verbose messages are printed only when `verbose` is set.
    pub fn terminal(verbose: bool) -> Self {
        let bufwtr = BufferWriter::stdout(ColorChoice::Auto);
        Self::new(move |level, message| {
            if level == LogLevel::Verbose && !verbose {
                return;
            }

            let mut buffer = bufwtr.buffer();
            let _ = match level {
                LogLevel::Normal => {
                    buffer.set_color(ColorSpec::new().set_fg(Some(Color::Cyan)).set_bold(true))
                }
                LogLevel::Verbose => buffer.set_color(ColorSpec::new().set_fg(Some(Color::White))),
            };
            let _ = writeln!(&mut buffer, "{}", message);
            let _ = buffer.reset();
            let _ = bufwtr.print(&buffer);
        })
    }

    /// Forwards messages to the `log` facade.
    ///
    /// Normal messages become `info`, verbose ones `debug`.
    pub fn facade() -> Self {
        Self::new(|level, message| match level {
            LogLevel::Normal => log::info!("{}", message),
            LogLevel::Verbose => log::debug!("{}", message),
        })
    }

    /// Child context, one level deeper.
    pub fn indented(&self) -> Self {
        Self {
            sink: Arc::clone(&self.sink),
            depth: self.depth + 1,
        }
    }

    /// Current indentation depth (0 for a root context).
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Emits a message at the given level.
    pub fn log(&self, level: LogLevel, message: &str) {
        if self.depth == 0 {
            (self.sink)(level, message);
        } else {
            let indented = format!("{}{}", "  ".repeat(self.depth), message);
            (self.sink)(level, &indented);
        }
    }

    /// Emits a [`LogLevel::Normal`] message.
    pub fn normal(&self, message: &str) {
        self.log(LogLevel::Normal, message);
    }

    /// Emits a [`LogLevel::Verbose`] message.
    pub fn verbose(&self, message: &str) {
        self.log(LogLevel::Verbose, message);
    }
}

/// Logging helpers for optional contexts.
///
/// Every pipeline step takes `Option<&Log>`; `None` disables output.
pub trait OptionalLog {
    /// Emits a normal message if a context is present.
    fn normal(self, message: &str);
    /// Emits a verbose message if a context is present.
    fn verbose(self, message: &str);
    /// Child context for nested steps.
    fn indented(self) -> Option<Log>;
}

impl OptionalLog for Option<&Log> {
    fn normal(self, message: &str) {
        if let Some(log) = self {
            log.normal(message);
        }
    }

    fn verbose(self, message: &str) {
        if let Some(log) = self {
            log.verbose(message);
        }
    }

    fn indented(self) -> Option<Log> {
        self.map(Log::indented)
    }
}
