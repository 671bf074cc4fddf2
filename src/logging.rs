//! Logging configuration using tracing with a browser-console writer.
//!
//! On `wasm32` each formatted event goes to the `console` method matching
//! its level; native builds write to stderr.

use serde::Deserialize;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;

/// Verbosity accepted in the JSON config.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    #[default]
    Warn,
    Error,
    Off,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => LevelFilter::TRACE,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Error => LevelFilter::ERROR,
            LogLevel::Off => LevelFilter::OFF,
        }
    }
}

/// Install the global subscriber. Returns `false` if one was already set.
pub fn init_logging(level: LogLevel) -> bool {
    // No clock on wasm32-unknown-unknown; the console timestamps lines itself.
    let layer = fmt::layer()
        .without_time()
        .with_ansi(false)
        .with_target(false)
        .with_level(true);

    #[cfg(target_arch = "wasm32")]
    let layer = layer.with_writer(console::ConsoleMakeWriter);
    #[cfg(not(target_arch = "wasm32"))]
    let layer = layer.with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(LevelFilter::from(level))
        .with(layer)
        .try_init()
        .is_ok()
}

#[cfg(target_arch = "wasm32")]
mod console {
    use std::io;

    use tracing::{Level, Metadata};
    use tracing_subscriber::fmt::MakeWriter;
    use wasm_bindgen::JsValue;

    pub struct ConsoleMakeWriter;

    impl<'a> MakeWriter<'a> for ConsoleMakeWriter {
        type Writer = ConsoleWriter;

        fn make_writer(&'a self) -> ConsoleWriter {
            ConsoleWriter::new(Level::INFO)
        }

        fn make_writer_for(&'a self, meta: &Metadata<'_>) -> ConsoleWriter {
            ConsoleWriter::new(*meta.level())
        }
    }

    /// Buffers one formatted event and hands it to the console on drop.
    pub struct ConsoleWriter {
        level: Level,
        buf: Vec<u8>,
    }

    impl ConsoleWriter {
        fn new(level: Level) -> Self {
            Self {
                level,
                buf: Vec::new(),
            }
        }
    }

    impl io::Write for ConsoleWriter {
        fn write(&mut self, bytes: &[u8]) -> io::Result<usize> {
            self.buf.extend_from_slice(bytes);
            Ok(bytes.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl Drop for ConsoleWriter {
        fn drop(&mut self) {
            let line = String::from_utf8_lossy(&self.buf);
            let line = line.trim_end();
            if line.is_empty() {
                return;
            }
            let value = JsValue::from_str(&format!("[color-studio] {line}"));
            match self.level {
                Level::ERROR => web_sys::console::error_1(&value),
                Level::WARN => web_sys::console::warn_1(&value),
                Level::INFO => web_sys::console::info_1(&value),
                _ => web_sys::console::debug_1(&value),
            }
        }
    }
}
