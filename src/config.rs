//! Machine description parser.
//!
//! A machine description is plain text:
//!
//! ```text
//! ABCDEFGHIJKLMNOPQRSTUVWXYZ
//!  5 3
//!  I MQ      (AELTPHQXRU) (BKNW) (CMOY) (DFG) (IV) (JZ) (S)
//!  Beta N    (ALBEVFCYODJWUGNMQTZSKPR) (HIX)
//!  B R       (AE) (BN) (CK) (DQ) (FU) (GY) (HW) (IJ) (LO) (MP)
//!            (RX) (SZ) (TV)
//! ```
//!
//! The first line is the alphabet. Then come the number of rotor slots and
//! the number of pawls, followed by rotor descriptions: a name, a type token
//! (`M` plus notch symbols for a moving rotor, `N` for a fixed rotor, `R` for
//! a reflector) and the rotor's cycles, which may continue over several
//! lines.

use std::str::FromStr;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::alphabet::Alphabet;
use crate::error::{EnigmaError, Result};
use crate::machine::Machine;
use crate::permutation::Permutation;
use crate::rotor::Rotor;

/// Characters reserved by the description and settings syntax.
const RESERVED: [char; 3] = ['*', '(', ')'];

/// A parsed machine description: alphabet, slot counts and rotor pool.
#[derive(Debug, Clone)]
pub struct MachineConfig {
    alphabet: Arc<Alphabet>,
    num_rotors: usize,
    pawls: usize,
    rotors: Vec<Rotor>,
}

impl MachineConfig {
    /// Parses a machine description.
    ///
    /// # Errors
    /// Returns [`EnigmaError::InvalidConfiguration`] for a truncated or
    /// malformed description, [`EnigmaError::InvalidCycle`] for bad rotor
    /// wiring and the alphabet construction errors for a bad first line.
    ///
    /// # Examples
    ///
    /// ```
    /// use enigma::MachineConfig;
    ///
    /// let config: MachineConfig = "ABCD\n 2 1\n R R (AB) (CD)\n F MA (ABC)\n"
    ///     .parse()
    ///     .unwrap();
    /// assert_eq!(config.num_rotors(), 2);
    /// assert_eq!(config.rotors().len(), 2);
    /// ```
    pub fn parse(text: &str) -> Result<Self> {
        let mut lines = text.lines();
        let alpha_line = lines
            .next()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .ok_or_else(|| EnigmaError::config("configuration is missing its alphabet"))?;
        if alpha_line
            .chars()
            .any(|ch| RESERVED.contains(&ch) || ch.is_whitespace())
        {
            return Err(EnigmaError::config(
                "alphabet may not contain '*', '(', ')' or whitespace",
            ));
        }
        let alphabet = Arc::new(Alphabet::new(alpha_line)?);

        let mut tokens = lines.flat_map(str::split_whitespace).peekable();
        let num_rotors = parse_count(tokens.next(), "number of rotor slots")?;
        let pawls = parse_count(tokens.next(), "number of pawls")?;

        let mut rotors = Vec::new();
        while let Some(name) = tokens.next() {
            let kind = tokens
                .next()
                .ok_or_else(|| EnigmaError::config(format!("rotor {} is missing its type", name)))?;
            let mut cycles = Vec::new();
            while let Some(cycle) = tokens.next_if(|tok| tok.starts_with('(')) {
                cycles.push(cycle);
            }
            rotors.push(parse_rotor(name, kind, &cycles.join(" "), &alphabet)?);
        }
        if rotors.is_empty() {
            return Err(EnigmaError::config("configuration describes no rotors"));
        }

        debug!(
            alphabet = %alphabet,
            num_rotors,
            pawls,
            rotors = rotors.len(),
            "machine description parsed"
        );
        Ok(MachineConfig {
            alphabet,
            num_rotors,
            pawls,
            rotors,
        })
    }

    /// Builds a fresh machine over this description's rotor pool.
    ///
    /// Each call clones the pool, so machines built from the same
    /// description step independently.
    ///
    /// # Errors
    /// See [`Machine::new`].
    pub fn build(&self) -> Result<Machine> {
        Machine::new(
            self.alphabet.clone(),
            self.num_rotors,
            self.pawls,
            self.rotors.clone(),
        )
    }

    /// Returns the alphabet.
    pub fn alphabet(&self) -> &Arc<Alphabet> {
        &self.alphabet
    }

    /// Returns the number of rotor slots.
    pub fn num_rotors(&self) -> usize {
        self.num_rotors
    }

    /// Returns the number of pawls.
    pub fn pawls(&self) -> usize {
        self.pawls
    }

    /// Returns the rotor pool in description order.
    pub fn rotors(&self) -> &[Rotor] {
        &self.rotors
    }
}

impl FromStr for MachineConfig {
    type Err = EnigmaError;

    fn from_str(s: &str) -> Result<Self> {
        MachineConfig::parse(s)
    }
}

fn parse_count(token: Option<&str>, what: &str) -> Result<usize> {
    let token = token.ok_or_else(|| EnigmaError::config(format!("configuration truncated before {}", what)))?;
    token.parse().map_err(|_| {
        EnigmaError::config(format!(
            "bad machine description: expected {}, found '{}'",
            what, token
        ))
    })
}

/// Builds one rotor from its name, type token and joined cycle tokens.
fn parse_rotor(name: &str, kind: &str, cycles: &str, alphabet: &Arc<Alphabet>) -> Result<Rotor> {
    if name.contains(RESERVED) {
        return Err(EnigmaError::config(format!("bad rotor name '{}'", name)));
    }
    let perm = Permutation::new(cycles, alphabet.clone()).map_err(|err| match err {
        EnigmaError::InvalidCycle(reason) => {
            EnigmaError::cycle(format!("rotor {}: {}", name, reason))
        }
        other => other,
    })?;
    let perm = Arc::new(perm);

    let mut type_chars = kind.chars();
    match (type_chars.next(), type_chars.as_str()) {
        (Some('M'), notches) => Rotor::moving(name, perm, notches).map_err(|_| {
            EnigmaError::config(format!(
                "rotor {}: notches '{}' are not all in the alphabet",
                name, notches
            ))
        }),
        (Some('N'), "") => Ok(Rotor::fixed(name, perm)),
        (Some('R'), "") => {
            if !perm.derangement() || !perm.is_involution() {
                warn!(rotor = name, "reflector wiring is not a fixed-point-free set of swaps");
            }
            Ok(Rotor::reflector(name, perm))
        }
        _ => Err(EnigmaError::config(format!(
            "rotor {}: unknown rotor type '{}'",
            name, kind
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rotor::RotorKind;

    const SMALL: &str = "ABCDEF\n 3 1\n R R (AB) (CD) (EF)\n F N (ABC)\n\
                         Fast MAD (AFBE)\n   (CD)\n";

    #[test]
    fn test_parse_small() {
        let config = MachineConfig::parse(SMALL).unwrap();
        assert_eq!(config.alphabet().to_string(), "ABCDEF");
        assert_eq!(config.num_rotors(), 3);
        assert_eq!(config.pawls(), 1);

        let names: Vec<&str> = config.rotors().iter().map(Rotor::name).collect();
        assert_eq!(names, ["R", "F", "Fast"]);
        assert_eq!(config.rotors()[0].kind(), &RotorKind::Reflector);
        assert_eq!(config.rotors()[1].kind(), &RotorKind::Fixed);
        assert_eq!(
            config.rotors()[2].kind(),
            &RotorKind::Moving {
                notches: vec!['A', 'D']
            }
        );
    }

    #[test]
    fn test_cycles_span_lines() {
        let config = MachineConfig::parse(SMALL).unwrap();
        let fast = &config.rotors()[2];
        assert_eq!(fast.permutation().cycles(), &["AFBE", "CD"]);
    }

    #[test]
    fn test_build_machine() {
        let config = MachineConfig::parse(SMALL).unwrap();
        let mut machine = config.build().unwrap();
        machine.insert_rotors(&["R", "F", "Fast"]).unwrap();
        machine.set_rotors("AA").unwrap();
        let cipher = machine.convert("FACADE").unwrap();

        let mut other = config.build().unwrap();
        other.insert_rotors(&["R", "F", "Fast"]).unwrap();
        other.set_rotors("AA").unwrap();
        assert_eq!(other.convert(&cipher).unwrap(), "FACADE");
    }

    #[test]
    fn test_missing_alphabet() {
        assert!(matches!(
            MachineConfig::parse(""),
            Err(EnigmaError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_reserved_alphabet_chars() {
        for bad in ["AB*C\n2 1\n", "A(BC\n2 1\n", "AB C\n2 1\n"] {
            assert!(
                matches!(
                    MachineConfig::parse(bad),
                    Err(EnigmaError::InvalidConfiguration(_))
                ),
                "{:?} should be rejected",
                bad
            );
        }
    }

    #[test]
    fn test_duplicate_alphabet_char() {
        assert_eq!(
            MachineConfig::parse("ABCA\n2 1\n R R (AB)\n").err(),
            Some(EnigmaError::DuplicateSymbol('A'))
        );
    }

    #[test]
    fn test_bad_counts() {
        assert!(matches!(
            MachineConfig::parse("ABCD\n five 3\n"),
            Err(EnigmaError::InvalidConfiguration(_))
        ));
        assert!(matches!(
            MachineConfig::parse("ABCD\n 5\n"),
            Err(EnigmaError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_no_rotors() {
        assert_eq!(
            MachineConfig::parse("ABCD\n 2 1\n").err(),
            Some(EnigmaError::config("configuration describes no rotors"))
        );
    }

    #[test]
    fn test_truncated_rotor() {
        assert_eq!(
            MachineConfig::parse("ABCD\n 2 1\n R R (AB)\n Lonely").err(),
            Some(EnigmaError::config("rotor Lonely is missing its type"))
        );
    }

    #[test]
    fn test_unknown_type() {
        assert!(matches!(
            MachineConfig::parse("ABCD\n 2 1\n X Q (AB)\n"),
            Err(EnigmaError::InvalidConfiguration(_))
        ));
        assert!(matches!(
            MachineConfig::parse("ABCD\n 2 1\n X NA (AB)\n"),
            Err(EnigmaError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_bad_notch() {
        assert!(matches!(
            MachineConfig::parse("ABCD\n 2 1\n X MZ (AB)\n"),
            Err(EnigmaError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_bad_cycle_names_rotor() {
        assert_eq!(
            MachineConfig::parse("ABCD\n 2 1\n X N (AZ)\n").err(),
            Some(EnigmaError::InvalidCycle(
                "rotor X: 'Z' is not in the alphabet".into()
            ))
        );
    }

    #[test]
    fn test_bad_rotor_name() {
        assert!(matches!(
            MachineConfig::parse("ABCD\n 2 1\n X) N (AB)\n"),
            Err(EnigmaError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_build_rejects_bad_counts() {
        let config = MachineConfig::parse("ABCD\n 2 2\n R R (AB) (CD)\n").unwrap();
        assert!(matches!(
            config.build(),
            Err(EnigmaError::InvalidConfiguration(_))
        ));
    }
}
