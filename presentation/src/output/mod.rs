//! Output formatting

pub mod console;
pub mod formatter;
pub mod json;

pub use console::ConsoleFormatter;
pub use formatter::OutputFormatter;
pub use json::JsonFormatter;

/// Pick the formatter for the requested output style
pub fn formatter(json: bool) -> Box<dyn OutputFormatter> {
    if json {
        Box::new(JsonFormatter)
    } else {
        Box::new(ConsoleFormatter)
    }
}

/// Turn terminal colors off for the rest of the process
pub fn disable_color() {
    colored::control::set_override(false);
}
