//! Mock console implementation for testing
//!
//! Records written lines for assertion. Bounded; once full, further lines
//! are dropped (tests that overflow it are asserting the wrong thing).

use heapless::{String, Vec};

use crate::platform::traits::ConsoleInterface;

/// Maximum recorded line length
const LINE_LEN: usize = 96;

/// Maximum number of recorded lines
const MAX_LINES: usize = 32;

/// Mock diagnostic console
#[derive(Debug, Default)]
pub struct MockConsole {
    lines: Vec<String<LINE_LEN>, MAX_LINES>,
}

impl MockConsole {
    /// Create an empty mock console
    pub fn new() -> Self {
        Self::default()
    }

    /// All recorded lines, oldest first
    pub fn lines(&self) -> &[String<LINE_LEN>] {
        &self.lines
    }

    /// Most recently written line, if any
    pub fn last_line(&self) -> Option<&str> {
        self.lines.last().map(|l| l.as_str())
    }
}

impl ConsoleInterface for MockConsole {
    fn write_line(&mut self, line: &str) {
        let mut recorded: String<LINE_LEN> = String::new();
        let _ = recorded.push_str(line);
        let _ = self.lines.push(recorded);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_lines() {
        let mut console = MockConsole::new();
        assert_eq!(console.last_line(), None);

        console.write_line("hello");
        console.write_line("world");
        assert_eq!(console.lines().len(), 2);
        assert_eq!(console.last_line(), Some("world"));
    }

    #[test]
    fn test_write_numbers_formats_line() {
        let mut console = MockConsole::new();
        console.write_numbers(&[120, 850, 40, 255]);
        assert_eq!(console.last_line(), Some("120 850 40 255"));
    }

    #[test]
    fn test_write_numbers_negative() {
        let mut console = MockConsole::new();
        console.write_numbers(&[-1]);
        assert_eq!(console.last_line(), Some("-1"));
    }
}
