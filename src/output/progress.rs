//! Console progress markers.
//!
//! A step label is printed without a newline, then closed with one of the
//! `[OK]`, `[SKIP]`, `[FAILED]` markers. Write errors are logged and ignored
//! so a closed stdout never aborts a registration run.

use colored::Colorize;
use std::fmt::Display;
use std::io::Write;

/// Writes step labels and result markers to `out`.
pub struct Progress<W: Write> {
    out: W,
}

impl<W: Write> Progress<W> {
    pub fn new(out: W) -> Progress<W> {
        Progress { out }
    }

    /// Start a step, e.g. `SIM registration (ICCID: ...)`.
    pub fn step(&mut self, label: impl Display) {
        self.write(format_args!("{label}"));
    }

    /// Print a full line.
    pub fn line(&mut self, text: impl Display) {
        self.write(format_args!("{text}\n"));
    }

    pub fn ok(&mut self) {
        self.write(format_args!("{}", "[OK]".green()));
    }

    /// Close the line after the last successful step.
    pub fn ok_line(&mut self) {
        self.write(format_args!("{}\n", "[OK]".green()));
    }

    pub fn skip(&mut self) {
        self.write(format_args!("{}\n", "[SKIP]".yellow()));
    }

    pub fn failed(&mut self) {
        self.write(format_args!("{}\n", "[FAILED]".red()));
    }

    /// Close the current step with `[OK]` or `[FAILED]` and pass `result` through.
    pub fn close_line<T, E>(&mut self, result: Result<T, E>) -> Result<T, E> {
        match &result {
            Ok(_) => self.ok_line(),
            Err(_) => self.failed(),
        }
        result
    }

    /// Give back the writer, used by tests to inspect the output.
    pub fn into_inner(self) -> W {
        self.out
    }

    fn write(&mut self, args: std::fmt::Arguments<'_>) {
        if let Err(e) = self.out.write_fmt(args).and_then(|()| self.out.flush()) {
            log::debug!("progress output failed: {e}");
        }
    }
}
