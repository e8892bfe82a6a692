//! Settings line parser.
//!
//! A settings line configures a machine for the messages that follow it:
//!
//! ```text
//! * B Beta III IV I AXLE [RING] (HQ) (EX) (IP) (TR) (BY)
//! ```
//!
//! After the leading `*` come one rotor name per slot (reflector first), the
//! initial rotor setting, an optional ring setting and the plugboard swaps.

use tracing::debug;

use crate::error::{EnigmaError, Result};
use crate::machine::Machine;
use crate::permutation::Permutation;

/// Marker that starts every settings line.
pub const SETTINGS_MARKER: char = '*';

/// A parsed settings line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    rotors: Vec<String>,
    positions: String,
    rings: Option<String>,
    plugboard: String,
}

impl Settings {
    /// Parses `line` for a machine with `num_rotors` slots.
    ///
    /// Only the shape of the line is checked here; symbols, lengths and
    /// rotor names are validated against the machine by
    /// [`apply`](Self::apply).
    ///
    /// # Errors
    /// Returns [`EnigmaError::InvalidConfiguration`] if the line does not
    /// start with a lone `*` or names fewer than `num_rotors` rotors.
    ///
    /// # Examples
    ///
    /// ```
    /// use enigma::Settings;
    ///
    /// let s = Settings::parse("* B Beta III IV I AXLE (HQ) (EX)", 5).unwrap();
    /// assert_eq!(s.rotors(), &["B", "Beta", "III", "IV", "I"]);
    /// assert_eq!(s.positions(), "AXLE");
    /// assert_eq!(s.rings(), None);
    /// assert_eq!(s.plugboard(), "(HQ) (EX)");
    /// ```
    pub fn parse(line: &str, num_rotors: usize) -> Result<Self> {
        let mut tokens = line.split_whitespace().peekable();
        match tokens.next() {
            Some(marker) if marker.len() == 1 && marker.starts_with(SETTINGS_MARKER) => {}
            _ => {
                return Err(EnigmaError::config(format!(
                    "settings line must start with '{}'",
                    SETTINGS_MARKER
                )))
            }
        }

        let mut rotors = Vec::with_capacity(num_rotors);
        while rotors.len() < num_rotors {
            match tokens.next_if(|tok| !tok.starts_with('(')) {
                Some(name) => rotors.push(name.to_string()),
                None => {
                    return Err(EnigmaError::config(format!(
                        "settings line names {} rotors, the machine has {} slots",
                        rotors.len(),
                        num_rotors
                    )))
                }
            }
        }

        let positions = tokens
            .next_if(|tok| !tok.starts_with('('))
            .unwrap_or_default()
            .to_string();
        let rings = tokens
            .next_if(|tok| !tok.starts_with('('))
            .map(str::to_string);
        let plugboard = tokens.collect::<Vec<_>>().join(" ");

        Ok(Settings {
            rotors,
            positions,
            rings,
            plugboard,
        })
    }

    /// Returns true if `line` is a settings line rather than a message.
    pub fn is_settings_line(line: &str) -> bool {
        line.starts_with(SETTINGS_MARKER)
    }

    /// Returns the rotor names, reflector first.
    pub fn rotors(&self) -> &[String] {
        &self.rotors
    }

    /// Returns the initial rotor setting.
    pub fn positions(&self) -> &str {
        &self.positions
    }

    /// Returns the ring setting, if one was given.
    pub fn rings(&self) -> Option<&str> {
        self.rings.as_deref()
    }

    /// Returns the plugboard in cycle notation.
    pub fn plugboard(&self) -> &str {
        &self.plugboard
    }

    /// Configures `machine`: inserts the rotors, sets them, sets the rings
    /// when given and installs the plugboard.
    ///
    /// # Errors
    /// - [`EnigmaError::InvalidCycle`] for a malformed plugboard, and
    ///   [`EnigmaError::InvalidConfiguration`] if a plugboard cycle is not a
    ///   swap of two symbols. Both are detected before the machine changes.
    /// - Any error of [`Machine::insert_rotors`], [`Machine::set_rotors`]
    ///   or [`Machine::set_rings`].
    ///
    /// On error `machine` is left exactly as it was.
    pub fn apply(&self, machine: &mut Machine) -> Result<()> {
        let plugboard = Permutation::new(&self.plugboard, machine.alphabet().clone())?;
        if let Some(cycle) = plugboard.cycles().iter().find(|c| c.chars().count() != 2) {
            return Err(EnigmaError::config(format!(
                "plugboard cycle ({}) must swap exactly two symbols",
                cycle
            )));
        }

        let mut staged = machine.clone();
        staged.insert_rotors(self.rotors.as_slice())?;
        staged.set_rotors(&self.positions)?;
        if let Some(rings) = &self.rings {
            staged.set_rings(rings)?;
        }
        staged.set_plugboard(plugboard)?;
        *machine = staged;
        debug!(positions = %machine.positions(), "settings applied");
        Ok(())
    }
}
