//! Diagnostic console trait
//!
//! Free-form telemetry sink consumed by the control loop's telemetry mode.
//! The line format is not load-bearing for correctness; boards typically wire
//! this to a serial port.

use core::fmt::Write;
use heapless::String;

/// Diagnostic output sink
pub trait ConsoleInterface {
    /// Write one line of text
    fn write_line(&mut self, line: &str);

    /// Write a list of numbers as one space-separated line
    ///
    /// Values that overflow the line buffer are dropped from the end of the
    /// line rather than wrapped.
    fn write_numbers(&mut self, values: &[i32]) {
        let mut line: String<96> = String::new();
        for (i, value) in values.iter().enumerate() {
            if i > 0 {
                let _ = line.push(' ');
            }
            let _ = write!(line, "{}", value);
        }
        self.write_line(&line);
    }
}
