//! Session: drives a machine over a stream of settings and message lines.
//!
//! Input is line oriented. A line starting with `*` is a settings line that
//! reconfigures the machine; every other line is a message. Messages are
//! converted with whitespace removed and emitted in groups of five. An empty
//! message line is emitted as an empty line. The input must begin with a
//! settings line.

use std::io::{BufRead, Write};

use tracing::debug;

use crate::error::{EnigmaError, Result};
use crate::machine::Machine;
use crate::settings::Settings;
use crate::utils::text::{group_in_fives, strip_whitespace};

/// A machine plus the line-processing state around it.
#[derive(Debug, Clone)]
pub struct Session {
    machine: Machine,
    configured: bool,
    lines: usize,
}

impl Session {
    /// Wraps `machine`. No settings are applied yet.
    pub fn new(machine: Machine) -> Self {
        Session {
            machine,
            configured: false,
            lines: 0,
        }
    }

    /// Returns the machine.
    pub fn machine(&self) -> &Machine {
        &self.machine
    }

    /// Returns the number of lines processed so far.
    pub fn lines_processed(&self) -> usize {
        self.lines
    }

    /// Processes one input line.
    ///
    /// # Returns
    /// `None` for a settings line, otherwise the converted message grouped
    /// in fives.
    ///
    /// # Errors
    /// Returns [`EnigmaError::InvalidConfiguration`] if a message arrives
    /// before any settings line, or any error raised while applying settings
    /// or converting the message.
    ///
    /// # Examples
    ///
    /// ```
    /// use enigma::{MachineConfig, Session};
    ///
    /// let config: MachineConfig = "ABCD\n 2 1\n R R (AB) (CD)\n F MA (ABC)\n"
    ///     .parse()
    ///     .unwrap();
    /// let mut session = Session::new(config.build().unwrap());
    ///
    /// assert_eq!(session.process_line("* R F A").unwrap(), None);
    /// assert!(session.process_line("ABCDABCD").unwrap().is_some());
    /// ```
    pub fn process_line(&mut self, line: &str) -> Result<Option<String>> {
        self.lines += 1;
        if Settings::is_settings_line(line) {
            let settings = Settings::parse(line, self.machine.num_rotors())?;
            settings.apply(&mut self.machine)?;
            self.configured = true;
            debug!(line = self.lines, "machine reconfigured");
            return Ok(None);
        }
        if !self.configured {
            return Err(EnigmaError::config("input must begin with a settings line"));
        }

        let msg = strip_whitespace(line);
        let converted = self.machine.convert(&msg)?;
        Ok(Some(group_in_fives(&converted)))
    }

    /// Processes a whole input text and returns the output, one line per
    /// message line, each terminated by a newline.
    ///
    /// # Errors
    /// Returns [`EnigmaError::InvalidConfiguration`] if `input` is empty,
    /// plus every error of [`process_line`](Self::process_line).
    pub fn process(&mut self, input: &str) -> Result<String> {
        if input.is_empty() {
            return Err(EnigmaError::config("input must contain settings"));
        }
        let mut output = String::with_capacity(input.len() + input.len() / 5);
        for line in input.lines() {
            if let Some(out) = self.process_line(line)? {
                output.push_str(&out);
                output.push('\n');
            }
        }
        Ok(output)
    }

    /// Streams lines from `input` to `output` until end of input.
    ///
    /// On error, [`lines_processed`](Self::lines_processed) identifies the
    /// offending line.
    ///
    /// # Errors
    /// Returns [`EnigmaError::Io`] if reading or writing fails,
    /// [`EnigmaError::InvalidConfiguration`] if `input` has no lines, plus
    /// every error of [`process_line`](Self::process_line).
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, mut output: W) -> Result<()> {
        let start = self.lines;
        for line in input.lines() {
            if let Some(out) = self.process_line(&line?)? {
                writeln!(output, "{}", out)?;
            }
        }
        if self.lines == start {
            return Err(EnigmaError::config("input must contain settings"));
        }
        output.flush()?;
        Ok(())
    }
}
