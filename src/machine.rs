//! Machine: rotor stack, plugboard and the notch/pawl stepping mechanism.
//!
//! A machine owns a pool of available rotors and an ordered array of
//! `num_rotors` slots referring into that pool. Slot 0 holds the reflector;
//! the rightmost `pawls` slots may hold moving rotors; the band in between
//! holds fixed rotors.
//!
//! Converting a symbol first advances the rotors, then passes the signal
//! through the plugboard, right to left through every slot (the reflector
//! included), back left to right through slots `1..`, and through the
//! plugboard again.

use std::sync::Arc;

use tracing::{debug, trace, warn};

use crate::alphabet::Alphabet;
use crate::error::{EnigmaError, Result};
use crate::permutation::Permutation;
use crate::rotor::{Rotor, RotorKind};

/// Index of a rotor within the machine's pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct RotorId(usize);

/// A complete rotor cipher machine.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use enigma::{Alphabet, Machine, Permutation, Rotor};
///
/// let alpha = Arc::new(Alphabet::upper());
/// let wiring = |cycles: &str| Arc::new(Permutation::new(cycles, alpha.clone()).unwrap());
///
/// let pool = vec![
///     Rotor::reflector("B", wiring("(AE) (BN) (CK) (DQ) (FU) (GY) (HW) (IJ) (LO) (MP) (RX) (SZ) (TV)")),
///     Rotor::fixed("Beta", wiring("(ALBEVFCYODJWUGNMQTZSKPR) (HIX)")),
///     Rotor::moving("III", wiring("(ABDHPEJT) (CFLVMZOYQIRWUKXSG) (N)"), "V").unwrap(),
///     Rotor::moving("II", wiring("(FIXVYOMW) (CDKLHUP) (ESZ) (BJ) (GR) (NT) (A) (Q)"), "E").unwrap(),
///     Rotor::moving("I", wiring("(AELTPHQXRU) (BKNW) (CMOY) (DFG) (IV) (JZ) (S)"), "Q").unwrap(),
/// ];
///
/// let mut machine = Machine::new(alpha.clone(), 5, 3, pool).unwrap();
/// machine.insert_rotors(&["B", "Beta", "III", "II", "I"]).unwrap();
/// machine.set_rotors("BCDZ").unwrap();
/// assert_eq!(machine.convert("AAAAA").unwrap(), "CXQWK");
/// ```
#[derive(Debug, Clone)]
pub struct Machine {
    alphabet: Arc<Alphabet>,
    num_rotors: usize,
    pawls: usize,
    pool: Vec<Rotor>,
    slots: Vec<RotorId>,
    plugboard: Permutation,
}

impl Machine {
    /// Creates a machine with `num_rotors` slots and `pawls` pawls drawing
    /// from `all_rotors`. The plugboard starts as the identity and no rotors
    /// are inserted.
    ///
    /// # Parameters
    /// - `alphabet`: The alphabet shared by every rotor.
    /// - `num_rotors`: Number of rotor slots, reflector included (at least 2).
    /// - `pawls`: Number of pawls, in `0..num_rotors`.
    /// - `all_rotors`: The available rotors, uniquely named.
    ///
    /// # Errors
    /// Returns [`EnigmaError::InvalidConfiguration`] for a bad slot or pawl
    /// count or a rotor over a different alphabet, and
    /// [`EnigmaError::DuplicateRotor`] if two pool rotors share a name.
    pub fn new(
        alphabet: Arc<Alphabet>,
        num_rotors: usize,
        pawls: usize,
        all_rotors: Vec<Rotor>,
    ) -> Result<Self> {
        if num_rotors <= 1 {
            return Err(EnigmaError::config(format!(
                "a machine needs at least 2 rotor slots, got {}",
                num_rotors
            )));
        }
        if pawls >= num_rotors {
            return Err(EnigmaError::config(format!(
                "pawl count {} must be less than the {} rotor slots",
                pawls, num_rotors
            )));
        }
        for (i, rotor) in all_rotors.iter().enumerate() {
            if **rotor.alphabet() != *alphabet {
                return Err(EnigmaError::config(format!(
                    "rotor {} uses a different alphabet",
                    rotor.name()
                )));
            }
            if all_rotors[..i].iter().any(|r| r.name() == rotor.name()) {
                return Err(EnigmaError::DuplicateRotor(rotor.name().to_string()));
            }
        }

        let plugboard = Permutation::identity(alphabet.clone());
        Ok(Machine {
            alphabet,
            num_rotors,
            pawls,
            pool: all_rotors,
            slots: Vec::with_capacity(num_rotors),
            plugboard,
        })
    }

    /// Returns the alphabet shared by every rotor.
    pub fn alphabet(&self) -> &Arc<Alphabet> {
        &self.alphabet
    }

    /// Returns the number of rotor slots.
    pub fn num_rotors(&self) -> usize {
        self.num_rotors
    }

    /// Returns the number of pawls, which bounds the number of rotating rotors.
    pub fn num_pawls(&self) -> usize {
        self.pawls
    }

    /// Returns every rotor in the pool.
    pub fn all_rotors(&self) -> &[Rotor] {
        &self.pool
    }

    /// Returns the inserted rotors, slot 0 (the reflector) first.
    ///
    /// Empty until [`insert_rotors`](Self::insert_rotors) succeeds.
    pub fn rotors(&self) -> impl ExactSizeIterator<Item = &Rotor> + '_ {
        self.slots.iter().map(move |id| &self.pool[id.0])
    }

    /// Returns the rotor in `slot`, if rotors are inserted.
    pub fn rotor(&self, slot: usize) -> Option<&Rotor> {
        self.slots.get(slot).map(|id| &self.pool[id.0])
    }

    /// Returns the plugboard.
    pub fn plugboard(&self) -> &Permutation {
        &self.plugboard
    }

    /// Returns the window letters of slots `1..`, left to right.
    pub fn positions(&self) -> String {
        self.rotors().skip(1).map(Rotor::window).collect()
    }

    /// Fills the slots with the rotors named by `names` (`names[0]` names the
    /// reflector). Every inserted rotor is returned to setting 0 and ring 0.
    ///
    /// # Errors
    /// - [`EnigmaError::InvalidConfiguration`] if `names` does not have one
    ///   entry per slot or a rotor is placed in a slot its kind may not occupy.
    /// - [`EnigmaError::DuplicateRotor`] if a name is requested twice.
    /// - [`EnigmaError::UnknownRotor`] if a name is not in the pool.
    ///
    /// On error the slots are left unchanged.
    pub fn insert_rotors<S: AsRef<str>>(&mut self, names: &[S]) -> Result<()> {
        if names.len() != self.num_rotors {
            return Err(EnigmaError::config(format!(
                "expected {} rotor names, got {}",
                self.num_rotors,
                names.len()
            )));
        }
        for (i, name) in names.iter().enumerate() {
            let name = name.as_ref();
            if names[..i].iter().any(|n| n.as_ref() == name) {
                return Err(EnigmaError::DuplicateRotor(name.to_string()));
            }
        }

        let ids = names
            .iter()
            .map(|name| self.find_rotor(name.as_ref()))
            .collect::<Result<Vec<RotorId>>>()?;
        self.check_placement(&ids)?;

        for id in &ids {
            self.pool[id.0].reset();
        }
        self.slots = ids;
        debug!(
            rotors = ?self.rotors().map(Rotor::name).collect::<Vec<_>>(),
            "rotors inserted"
        );
        Ok(())
    }

    /// Sets the inserted rotors according to `setting`: one symbol per non-reflector
    /// slot, leftmost first.
    ///
    /// # Errors
    /// - [`EnigmaError::InvalidConfiguration`] if no rotors are inserted.
    /// - [`EnigmaError::BadLength`] unless `setting` has `num_rotors() - 1`
    ///   symbols.
    /// - [`EnigmaError::NotInAlphabet`] for a foreign symbol.
    pub fn set_rotors(&mut self, setting: &str) -> Result<()> {
        let positions = self.parse_slot_string(setting)?;
        for (slot, posn) in positions.into_iter().enumerate() {
            self.slot_mut(slot + 1).set(posn)?;
        }
        debug!(setting, "rotor settings applied");
        Ok(())
    }

    /// Sets the alphabet rings of the non-reflector rotors from `rings`, one
    /// symbol per slot, leftmost first.
    ///
    /// # Errors
    /// Same as [`set_rotors`](Self::set_rotors).
    pub fn set_rings(&mut self, rings: &str) -> Result<()> {
        let positions = self.parse_slot_string(rings)?;
        for (slot, posn) in positions.into_iter().enumerate() {
            self.slot_mut(slot + 1).set_ring(posn)?;
        }
        debug!(rings, "ring settings applied");
        Ok(())
    }

    /// Replaces the plugboard.
    ///
    /// A plugboard is expected to be a set of swaps; other permutations are
    /// accepted but logged.
    ///
    /// # Errors
    /// Returns [`EnigmaError::InvalidConfiguration`] if `plugboard` is over
    /// a different alphabet.
    pub fn set_plugboard(&mut self, plugboard: Permutation) -> Result<()> {
        if **plugboard.alphabet() != *self.alphabet {
            return Err(EnigmaError::config("plugboard uses a different alphabet"));
        }
        if !plugboard.is_involution() {
            warn!(plugboard = %plugboard, "plugboard is not self-inverse");
        }
        debug!(plugboard = %plugboard, "plugboard set");
        self.plugboard = plugboard;
        Ok(())
    }

    /// Converts the symbol index `c` after first advancing the machine.
    ///
    /// # Errors
    /// - [`EnigmaError::InvalidConfiguration`] if no rotors are inserted.
    /// - [`EnigmaError::OutOfRange`] unless `c < alphabet().size()`.
    pub fn convert_index(&mut self, c: usize) -> Result<usize> {
        self.check_ready()?;
        if c >= self.alphabet.size() {
            return Err(EnigmaError::OutOfRange {
                index: c,
                size: self.alphabet.size(),
            });
        }
        Ok(self.encipher(c))
    }

    /// Converts every symbol of `msg` in turn, advancing the machine once
    /// per symbol. State carries over between calls.
    ///
    /// Every symbol is checked before any rotor moves, so a rejected message
    /// leaves the machine untouched.
    ///
    /// # Errors
    /// - [`EnigmaError::InvalidConfiguration`] if no rotors are inserted.
    /// - [`EnigmaError::NotInAlphabet`] for a foreign symbol.
    pub fn convert(&mut self, msg: &str) -> Result<String> {
        self.check_ready()?;
        let input = self.alphabet.to_indices(msg)?;
        let alphabet = self.alphabet.clone();
        Ok(input
            .into_iter()
            .map(|c| alphabet.chars()[self.encipher(c)])
            .collect())
    }

    // ──────── Stepping and signal path ────────

    /// Advances the rotors for one keypress, then runs `c` through the
    /// plugboard and rotor stack.
    fn encipher(&mut self, c: usize) -> usize {
        self.advance_rotors();

        let mut signal = self.plugboard.permute(c as isize);
        for id in self.slots.iter().rev() {
            signal = self.pool[id.0].convert_forward(signal);
        }
        for id in self.slots.iter().skip(1) {
            signal = self.pool[id.0].convert_backward(signal);
        }
        self.plugboard.permute(signal as isize)
    }

    /// Applies the pawl ratchet for one keypress.
    ///
    /// Scanning slots `1..last`, a rotating rotor advances when its right
    /// neighbour sits at a notch. Unless that neighbour is the rightmost
    /// rotor, the pawl also pushes the neighbour itself (double stepping) and
    /// the scan skips past it. The rightmost rotor then always advances.
    fn advance_rotors(&mut self) {
        let last = self.num_rotors - 1;
        let mut i = 1;
        while i < last {
            if self.slot(i + 1).at_notch() && self.slot(i).rotates() {
                self.slot_mut(i).advance();
                if i != last - 1 {
                    self.slot_mut(i + 1).advance();
                    i += 1;
                }
            }
            i += 1;
        }
        self.slot_mut(last).advance();
        trace!(positions = %self.positions(), "rotors advanced");
    }

    // ──────── Helpers ────────

    fn slot(&self, slot: usize) -> &Rotor {
        &self.pool[self.slots[slot].0]
    }

    fn slot_mut(&mut self, slot: usize) -> &mut Rotor {
        &mut self.pool[self.slots[slot].0]
    }

    fn find_rotor(&self, name: &str) -> Result<RotorId> {
        self.pool
            .iter()
            .position(|r| r.name() == name)
            .map(RotorId)
            .ok_or_else(|| EnigmaError::UnknownRotor(name.to_string()))
    }

    /// Checks that each rotor kind sits in a slot it may occupy.
    fn check_placement(&self, ids: &[RotorId]) -> Result<()> {
        let first_moving = self.num_rotors - self.pawls;
        for (slot, id) in ids.iter().enumerate() {
            let rotor = &self.pool[id.0];
            let misplaced = match rotor.kind() {
                RotorKind::Reflector => slot != 0,
                RotorKind::Fixed => slot == 0 || slot >= first_moving,
                RotorKind::Moving { .. } => slot < first_moving,
            };
            if slot == 0 && !rotor.reflecting() {
                return Err(EnigmaError::config(format!(
                    "slot 0 must hold a reflector, found {}",
                    rotor.name()
                )));
            }
            if misplaced {
                return Err(EnigmaError::config(format!(
                    "rotor {} cannot be placed in slot {}",
                    rotor.name(),
                    slot
                )));
            }
        }
        Ok(())
    }

    fn check_ready(&self) -> Result<()> {
        if self.slots.len() != self.num_rotors {
            return Err(EnigmaError::config("no rotors inserted"));
        }
        Ok(())
    }

    /// Validates a per-slot setting string and returns its indices.
    fn parse_slot_string(&self, setting: &str) -> Result<Vec<usize>> {
        self.check_ready()?;
        let expected = self.num_rotors - 1;
        let actual = setting.chars().count();
        if actual != expected {
            return Err(EnigmaError::BadLength { expected, actual });
        }
        self.alphabet.to_indices(setting)
    }
}
