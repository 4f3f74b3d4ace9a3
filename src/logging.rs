//! Pretty diagnostic logging for the CLI
//!
//! Diagnostics go to stderr so that stdout stays clean for the rendered
//! matrix lines. The logger is constructed once in `main` and passed into the
//! functions that emit diagnostics; there is no process-wide logger.
//!
//! Record format: `HH:MM LVL message key=value ...`, with ANSI color on the
//! level token when stderr is a terminal.

use std::io::Write;

use is_terminal::IsTerminal;

const ANSI_RESET: &str = "\x1b[0m";
const ANSI_BLUE: &str = "\x1b[34m";
const ANSI_YELLOW: &str = "\x1b[33m";
const ANSI_RED: &str = "\x1b[31m";
const ANSI_GRAY: &str = "\x1b[90m";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
    Debug,
    Info,
    Warn,
    Error,
}

impl Level {
    fn token(self) -> &'static str {
        match self {
            Level::Debug => "DBG",
            Level::Info => "INF",
            Level::Warn => "WRN",
            Level::Error => "ERR",
        }
    }

    fn color(self) -> &'static str {
        match self {
            Level::Debug => ANSI_GRAY,
            Level::Info => ANSI_BLUE,
            Level::Warn => ANSI_YELLOW,
            Level::Error => ANSI_RED,
        }
    }
}

/// Stderr diagnostic logger.
#[derive(Debug, Clone)]
pub struct Logger {
    color: bool,
    min_level: Level,
}

impl Logger {
    /// Logger for stderr, colorized when stderr is a terminal.
    pub fn stderr() -> Self {
        Logger {
            color: std::io::stderr().is_terminal(),
            min_level: Level::Info,
        }
    }

    #[cfg(test)]
    fn plain() -> Self {
        Logger {
            color: false,
            min_level: Level::Debug,
        }
    }

    pub fn info(&self, message: &str, attrs: &[(&str, &str)]) {
        self.log(Level::Info, message, attrs);
    }

    pub fn warn(&self, message: &str, attrs: &[(&str, &str)]) {
        self.log(Level::Warn, message, attrs);
    }

    fn log(&self, level: Level, message: &str, attrs: &[(&str, &str)]) {
        if level < self.min_level {
            return;
        }
        let time = chrono::Local::now().format("%H:%M").to_string();
        let line = format_record(self.color, &time, level, message, attrs);
        let mut stderr = std::io::stderr().lock();
        let _ = stderr.write_all(line.as_bytes());
    }
}

fn format_record(
    color: bool,
    time: &str,
    level: Level,
    message: &str,
    attrs: &[(&str, &str)],
) -> String {
    let mut line = String::new();
    if color {
        line.push_str(ANSI_GRAY);
        line.push_str(time);
        line.push_str(ANSI_RESET);
        line.push(' ');
        line.push_str(level.color());
        line.push_str(level.token());
        line.push_str(ANSI_RESET);
    } else {
        line.push_str(time);
        line.push(' ');
        line.push_str(level.token());
    }
    if !message.is_empty() {
        line.push(' ');
        line.push_str(message);
    }
    for (key, value) in attrs {
        line.push(' ');
        line.push_str(key);
        line.push('=');
        line.push_str(&format_attr_value(value));
    }
    line.push('\n');
    line
}

fn format_attr_value(value: &str) -> String {
    if value.contains([' ', '\t', '\n', '\r', '"']) {
        format!("{value:?}")
    } else {
        value.to_string()
    }
}
