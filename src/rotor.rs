//! Rotor: a positioned, ring-offset wrapper around a [`Permutation`].
//!
//! Three kinds of rotor share one representation and differ only in their
//! [`RotorKind`]:
//!
//! - [`RotorKind::Reflector`]: the leftmost, non-rotating rotor that sends the
//!   signal back through the stack. It cannot be ring-set.
//! - [`RotorKind::Fixed`]: a rotor that never advances.
//! - [`RotorKind::Moving`]: a rotor driven by a pawl. It advances one
//!   position at a time and carries one or more notches.
//!
//! The wiring is applied relative to the rotor's rotation (`setting`) and
//! its alphabet ring (`ring`): an input contact `p` enters the wiring at
//! `p + setting - ring` and leaves shifted back by the same amount.

use std::fmt;
use std::sync::Arc;

use crate::alphabet::Alphabet;
use crate::error::{EnigmaError, Result};
use crate::permutation::Permutation;

/// Stepping and reflection behaviour of a rotor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RotorKind {
    /// Leftmost reflecting rotor.
    Reflector,
    /// Non-rotating rotor.
    Fixed,
    /// Pawl-driven rotor with the given notch symbols.
    Moving { notches: Vec<char> },
}

/// A single rotor: name, wiring, current rotation and ring offset.
#[derive(Debug, Clone)]
pub struct Rotor {
    name: String,
    kind: RotorKind,
    permutation: Arc<Permutation>,
    setting: usize,
    ring: usize,
}

impl Rotor {
    /// Creates a reflector named `name` with wiring `perm`.
    pub fn reflector(name: impl Into<String>, perm: Arc<Permutation>) -> Self {
        Self::build(name.into(), RotorKind::Reflector, perm)
    }

    /// Creates a non-moving rotor named `name` with wiring `perm`.
    pub fn fixed(name: impl Into<String>, perm: Arc<Permutation>) -> Self {
        Self::build(name.into(), RotorKind::Fixed, perm)
    }

    /// Creates a moving rotor named `name` with wiring `perm` and a notch at
    /// every symbol of `notches`.
    ///
    /// # Errors
    /// Returns [`EnigmaError::NotInAlphabet`] if a notch symbol is not in the
    /// permutation's alphabet.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::sync::Arc;
    /// use enigma::{Alphabet, Permutation, Rotor};
    ///
    /// let alpha = Arc::new(Alphabet::upper());
    /// let perm = Arc::new(Permutation::new("(AELTPHQXRU) (BKNW)", alpha).unwrap());
    /// let mut rotor = Rotor::moving("I", perm, "Q").unwrap();
    ///
    /// rotor.set_char('Q').unwrap();
    /// assert!(rotor.at_notch());
    /// rotor.advance();
    /// assert_eq!(rotor.setting(), 17);
    /// ```
    pub fn moving(
        name: impl Into<String>,
        perm: Arc<Permutation>,
        notches: &str,
    ) -> Result<Self> {
        let alphabet = perm.alphabet();
        let notches = notches
            .chars()
            .map(|ch| alphabet.to_int(ch).map(|_| ch))
            .collect::<Result<Vec<char>>>()?;
        Ok(Self::build(name.into(), RotorKind::Moving { notches }, perm))
    }

    /// Internal constructor shared by the three kinds.
    fn build(name: String, kind: RotorKind, permutation: Arc<Permutation>) -> Self {
        Rotor {
            name,
            kind,
            permutation,
            setting: 0,
            ring: 0,
        }
    }

    /// Returns the rotor's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the rotor's kind.
    pub fn kind(&self) -> &RotorKind {
        &self.kind
    }

    /// Returns the alphabet of the rotor's wiring.
    pub fn alphabet(&self) -> &Arc<Alphabet> {
        self.permutation.alphabet()
    }

    /// Returns the wiring in its 0 position.
    pub fn permutation(&self) -> &Arc<Permutation> {
        &self.permutation
    }

    /// Returns the size of the rotor's alphabet.
    pub fn size(&self) -> usize {
        self.permutation.size()
    }

    /// Returns true iff the rotor has a ratchet and can move.
    pub fn rotates(&self) -> bool {
        matches!(self.kind, RotorKind::Moving { .. })
    }

    /// Returns true iff the rotor is a reflector.
    pub fn reflecting(&self) -> bool {
        matches!(self.kind, RotorKind::Reflector)
    }

    /// Returns the current rotation.
    pub fn setting(&self) -> usize {
        self.setting
    }

    /// Returns the ring offset.
    pub fn ring(&self) -> usize {
        self.ring
    }

    /// Sets the rotation to `posn`.
    ///
    /// # Errors
    /// Returns [`EnigmaError::OutOfRange`] unless `posn < size()`.
    pub fn set(&mut self, posn: usize) -> Result<()> {
        self.setting = self.check_range(posn)?;
        Ok(())
    }

    /// Sets the rotation to the index of `cposn`.
    ///
    /// # Errors
    /// Returns [`EnigmaError::NotInAlphabet`] if `cposn` is not in the rotor's alphabet.
    pub fn set_char(&mut self, cposn: char) -> Result<()> {
        let posn = self.alphabet().to_int(cposn)?;
        self.set(posn)
    }

    /// Sets the ring offset to `posn`.
    ///
    /// # Errors
    /// Returns [`EnigmaError::OutOfRange`] unless `posn < size()`, and
    /// [`EnigmaError::InvalidConfiguration`] for a reflector.
    pub fn set_ring(&mut self, posn: usize) -> Result<()> {
        if self.reflecting() {
            return Err(EnigmaError::config(format!(
                "reflector {} cannot be ring-set",
                self.name
            )));
        }
        self.ring = self.check_range(posn)?;
        Ok(())
    }

    /// Sets the ring offset to the index of `cposn`.
    ///
    /// # Errors
    /// See [`set_ring`](Self::set_ring); also
    /// [`EnigmaError::NotInAlphabet`] for a foreign symbol.
    pub fn set_ring_char(&mut self, cposn: char) -> Result<()> {
        let posn = self.alphabet().to_int(cposn)?;
        self.set_ring(posn)
    }

    /// Returns the rotation and ring to 0.
    pub(crate) fn reset(&mut self) {
        self.setting = 0;
        self.ring = 0;
    }

    /// Returns the conversion of contact `p` (in `0..size()`) through the
    /// wiring, entering from the right.
    pub fn convert_forward(&self, p: usize) -> usize {
        let input = self.offset(p);
        let out = self.permutation.permute(input);
        self.unoffset(out)
    }

    /// Returns the conversion of contact `e` (in `0..size()`) through the
    /// inverse of the wiring, entering from the left.
    pub fn convert_backward(&self, e: usize) -> usize {
        let input = self.offset(e);
        let out = self.permutation.invert(input);
        self.unoffset(out)
    }

    /// Returns true iff the rotor sits at a notch, letting its left neighbour advance.
    pub fn at_notch(&self) -> bool {
        match &self.kind {
            RotorKind::Moving { notches } => {
                let current = self.alphabet().chars()[self.setting];
                notches.contains(&current)
            }
            RotorKind::Reflector | RotorKind::Fixed => false,
        }
    }

    /// Advances a moving rotor one position. No-op for other kinds.
    pub fn advance(&mut self) {
        if let RotorKind::Moving { .. } = self.kind {
            self.setting = self.permutation.wrap(self.setting as isize + 1);
        }
    }

    /// Returns the symbol visible in the rotor's window.
    pub fn window(&self) -> char {
        self.alphabet().chars()[self.setting]
    }

    // ──────── Offset arithmetic ────────

    /// Shifts an outside contact into wiring coordinates (unreduced).
    fn offset(&self, p: usize) -> isize {
        p as isize + self.setting as isize - self.ring as isize
    }

    /// Shifts a wiring contact back into outside coordinates.
    fn unoffset(&self, q: usize) -> usize {
        self.permutation
            .wrap(q as isize - self.setting as isize + self.ring as isize)
    }

    fn check_range(&self, posn: usize) -> Result<usize> {
        if posn < self.size() {
            Ok(posn)
        } else {
            Err(EnigmaError::OutOfRange {
                index: posn,
                size: self.size(),
            })
        }
    }
}

impl fmt::Display for Rotor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Rotor {}", self.name)
    }
}
