mod content_formatter;

pub use content_formatter::*;
