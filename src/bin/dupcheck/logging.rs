use std::{
    ffi::OsString,
    sync::{
        Mutex,
        atomic::{AtomicUsize, Ordering},
    },
};

use clap::ValueEnum;

const CARGO_BIN_NAME: &str = env!("CARGO_BIN_NAME");

/// Log level message strings.
///
/// The log crate names levels in all uppercase which reads poorly next to
/// compiler style diagnostics.
const LEVEL_NAMES: [&str; 6] = ["", "error:", "warning:", "info:", "debug:", "trace:"];

const LEVEL_COLORS: [&str; 6] = [
    "",
    "\x1b[0;1;31m",
    "\x1b[0;1;33m",
    "\x1b[0;1;32m",
    "\x1b[0;1;37m",
    "\x1b[0;1;34m",
];

const ANSI_RESET: &str = "\x1b[0m";

/// Separator to use for multiline log messages
const NEWLINE_SEPARATOR: &str = "\n>>> ";

/// The cli logger
#[derive(Debug)]
pub struct Logger {
    /// If ANSI colors should be emitted
    use_colors: bool,

    /// Maximum log level
    max_level: log::Level,

    /// Number of errors that have been emitted by the logger
    error_count: AtomicUsize,

    /// Maximum number of errors to emit before exiting
    max_errors: usize,

    /// String to prepend to the log message
    ///
    /// Set to a newline after a multiline message so that the next message
    /// is visually separated from it.
    prepend: Mutex<&'static str>,
}

impl Logger {
    /// Creates a new logger with the specified options
    pub fn new(max_level: log::Level, colors: ColorOption, max_errors: usize) -> Self {
        Self {
            use_colors: should_use_colors(colors),
            max_level,
            error_count: AtomicUsize::new(0),
            max_errors: if max_errors == 0 {
                usize::MAX
            } else {
                max_errors
            },
            prepend: Mutex::new(""),
        }
    }
}

impl log::Log for Logger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.level() <= self.max_level
    }

    fn log(&self, record: &log::Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let level_name = LEVEL_NAMES[record.level() as usize];

        let tag = if self.use_colors {
            format!(
                "{}{level_name}{ANSI_RESET}",
                LEVEL_COLORS[record.level() as usize]
            )
        } else {
            level_name.to_owned()
        };

        let msg = record.args().to_string();
        let msg_len = msg.len();
        let msg = msg.replace('\n', NEWLINE_SEPARATOR);
        let is_multiline = msg.len() != msg_len;

        {
            let mut prepend = self
                .prepend
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            eprintln!("{prepend}{CARGO_BIN_NAME}: {tag} {msg}");
            if is_multiline {
                *prepend = "\n";
            }
        }

        if record.metadata().level() == log::Level::Error
            && self.error_count.fetch_add(1, Ordering::Relaxed) + 1 >= self.max_errors
        {
            eprintln!("{CARGO_BIN_NAME}: {tag} too many errors emitted, exiting");
            std::process::exit(1);
        }
    }

    fn flush(&self) {}
}

/// Color options for the logger
#[derive(ValueEnum, Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorOption {
    /// Automatically use colors depending on the environment
    #[value(name = "auto")]
    #[default]
    Auto,

    /// Always use colors
    #[value(name = "always")]
    Always,

    /// Never use colors
    #[value(name = "never")]
    Never,
}

impl std::fmt::Display for ColorOption {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(v) = self.to_possible_value() {
            write!(f, "{}", v.get_name())?;
        }

        Ok(())
    }
}

pub fn init(
    max_level: log::Level,
    colors: ColorOption,
    max_errors: usize,
) -> Result<(), log::SetLoggerError> {
    log::set_boxed_logger(Box::new(Logger::new(max_level, colors, max_errors)))
        .map(|()| log::set_max_level(max_level.to_level_filter()))
}

/// Returns `true` if colors should be used in log messages given the specified
/// color option and environment variable values.
fn should_use_colors(color: ColorOption) -> bool {
    use std::io::IsTerminal;
    colors_enabled(
        color,
        |name| std::env::var_os(name),
        || std::io::stderr().is_terminal(),
    )
}

/// Picks colors for `color` with environment lookups going through `var`.
///
/// Follows https://no-color.org/ and https://bixense.com/clicolors/.
fn colors_enabled(
    color: ColorOption,
    var: impl Fn(&str) -> Option<OsString>,
    is_terminal: impl FnOnce() -> bool,
) -> bool {
    match color {
        ColorOption::Always => true,
        ColorOption::Never => false,
        ColorOption::Auto => {
            if is_flag_set(var("NO_COLOR")) {
                false
            } else if is_flag_set(var("CLICOLOR_FORCE")) {
                true
            } else if var("CLICOLOR").is_none_or(|v| is_flag_set(Some(v))) {
                is_terminal()
            } else {
                false
            }
        }
    }
}

/// Returns `true` if an environment variable value is non-empty and not 0.
fn is_flag_set(value: Option<OsString>) -> bool {
    value.is_some_and(|v| !v.is_empty() && v != "0")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env<'a>(vars: &'a [(&str, &str)]) -> impl Fn(&str) -> Option<OsString> + 'a {
        move |name: &str| {
            vars.iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| OsString::from(*value))
        }
    }

    #[test]
    fn explicit_option_ignores_environment() {
        let vars = [("NO_COLOR", "1")];
        assert!(colors_enabled(ColorOption::Always, env(&vars), || false));

        let vars = [("CLICOLOR_FORCE", "1")];
        assert!(!colors_enabled(ColorOption::Never, env(&vars), || true));
    }

    #[test]
    fn auto_colors() {
        let cases: &[(&[(&str, &str)], bool, bool)] = &[
            (&[], true, true),
            (&[], false, false),
            (&[("NO_COLOR", "1")], true, false),
            (&[("NO_COLOR", "1"), ("CLICOLOR_FORCE", "1")], true, false),
            (&[("NO_COLOR", "0"), ("CLICOLOR_FORCE", "1")], false, true),
            (&[("NO_COLOR", ""), ("CLICOLOR_FORCE", "yes")], false, true),
            (&[("CLICOLOR_FORCE", "0")], false, false),
            (&[("CLICOLOR", "0")], true, false),
            (&[("CLICOLOR", "")], true, false),
            (&[("CLICOLOR", "1")], true, true),
        ];

        for (vars, terminal, expected) in cases {
            assert_eq!(
                colors_enabled(ColorOption::Auto, env(vars), || *terminal),
                *expected,
                "environment {vars:?} on terminal {terminal}"
            );
        }
    }

    #[test]
    fn color_option_display() {
        assert_eq!(ColorOption::Auto.to_string(), "auto");
        assert_eq!(ColorOption::Always.to_string(), "always");
        assert_eq!(ColorOption::Never.to_string(), "never");
    }
}
