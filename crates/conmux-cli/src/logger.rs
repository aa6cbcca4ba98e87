use colored::{Color, Colorize};
use std::hash::{DefaultHasher, Hash, Hasher};
use std::io::{self, Stdout, Write};

pub struct Logger<W: Write = Stdout> {
    output: W,
}

impl<W: Write> Logger<W> {
    pub fn new(output: W) -> Self {
        Self { output }
    }

    fn string_to_color(s: &str) -> Color {
        let colors = [
            Color::Green,
            Color::Blue,
            Color::Magenta,
            Color::Cyan,
            Color::BrightGreen,
            Color::BrightBlue,
            Color::BrightMagenta,
            Color::BrightCyan,
        ];

        let mut hasher = DefaultHasher::new();
        s.hash(&mut hasher);
        let hash = hasher.finish();

        let idx = usize::try_from(hash % colors.len() as u64).unwrap_or_default();
        colors[idx]
    }

    pub fn log(&mut self, service_name: &str, message: &str) {
        let prefix = format!("[{service_name}]").color(Self::string_to_color(service_name));
        for line in message.lines() {
            let _ = writeln!(self.output, "{prefix} {line}");
        }
    }

    pub fn error(&mut self, message: &str) {
        let prefix = "[error]".color(Color::Red);
        for line in message.lines() {
            let _ = writeln!(self.output, "{prefix} {line}");
        }
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.output
    }

    /// `<base-name> <status-line>`, uncolored so it stays parseable.
    pub fn status(&mut self, base: &str, line: &str) {
        let _ = writeln!(self.output, "{base} {line}");
    }
}

impl Logger {
    pub fn default() -> Self {
        Self::new(io::stdout())
    }
}
