//! Permutation: a bijection on alphabet indices written in cycle notation.
//!
//! A permutation is given as a string such as `"(AELTPHQXRU) (BKNW) (S)"`.
//! Each parenthesised group `c0c1...cm` is the cycle
//! `c0 -> c1 -> ... -> cm -> c0`; symbols that appear in no cycle map to
//! themselves. Whitespace is ignored.
//!
//! The cycles are kept for inspection, and the forward and inverse mappings
//! are expanded once into index tables at construction time so that
//! [`permute`](Permutation::permute) and [`invert`](Permutation::invert) are
//! table lookups on the per-symbol hot path.

use std::fmt;
use std::sync::Arc;

use crate::alphabet::Alphabet;
use crate::error::{EnigmaError, Result};

/// A permutation of the indices of an [`Alphabet`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Permutation {
    alphabet: Arc<Alphabet>,
    cycles: Vec<String>,
    forward: Vec<usize>,
    inverse: Vec<usize>,
}

impl Permutation {
    /// Parses `cycles` as cycle notation over `alphabet`.
    ///
    /// # Parameters
    /// - `cycles`: A string of the form `"(cccc) (cc) ..."`. May be empty.
    /// - `alphabet`: The shared alphabet every named symbol must belong to.
    ///
    /// # Errors
    /// Returns [`EnigmaError::InvalidCycle`] if a symbol is outside the
    /// alphabet, a symbol appears twice (within or across cycles), a symbol
    /// appears outside parentheses, or the parentheses are unbalanced, nested
    /// or empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::sync::Arc;
    /// use enigma::{Alphabet, Permutation};
    ///
    /// let alpha = Arc::new(Alphabet::new("ABCDE").unwrap());
    /// let p = Permutation::new("(EDA) (CB)", alpha).unwrap();
    /// assert_eq!(p.permute_char('E').unwrap(), 'D');
    /// assert_eq!(p.invert_char('E').unwrap(), 'A');
    /// ```
    pub fn new(cycles: &str, alphabet: Arc<Alphabet>) -> Result<Self> {
        let parsed = parse_cycles(cycles, &alphabet)?;
        let size = alphabet.size();
        let mut forward: Vec<usize> = (0..size).collect();
        let mut inverse: Vec<usize> = (0..size).collect();

        for cycle in &parsed {
            let len = cycle.len();
            for j in 0..len {
                let from = cycle[j];
                let to = cycle[(j + 1) % len];
                forward[from] = to;
                inverse[to] = from;
            }
        }

        let cycles = parsed
            .iter()
            .map(|cycle| {
                cycle
                    .iter()
                    .map(|&i| alphabet.chars()[i])
                    .collect::<String>()
            })
            .collect();

        Ok(Permutation {
            alphabet,
            cycles,
            forward,
            inverse,
        })
    }

    /// The identity permutation over `alphabet`.
    pub fn identity(alphabet: Arc<Alphabet>) -> Self {
        let size = alphabet.size();
        Permutation {
            alphabet,
            cycles: Vec::new(),
            forward: (0..size).collect(),
            inverse: (0..size).collect(),
        }
    }

    /// Returns the explicitly written cycles, in input order.
    pub fn cycles(&self) -> &[String] {
        &self.cycles
    }

    /// Returns the alphabet this permutation was built over.
    pub fn alphabet(&self) -> &Arc<Alphabet> {
        &self.alphabet
    }

    /// Returns the size of the alphabet being permuted.
    pub fn size(&self) -> usize {
        self.forward.len()
    }

    /// Returns `p` modulo [`size`](Self::size), always in `[0, size)`.
    ///
    /// Negative inputs wrap from the top, so `wrap(-1) == size - 1`.
    pub fn wrap(&self, p: isize) -> usize {
        p.rem_euclid(self.size() as isize) as usize
    }

    /// Applies the permutation to `p`, after wrapping it into range.
    ///
    /// Wrapping first lets rotor offset arithmetic pass unreduced sums.
    pub fn permute(&self, p: isize) -> usize {
        self.forward[self.wrap(p)]
    }

    /// Applies the inverse permutation to `c`, after wrapping it into range.
    pub fn invert(&self, c: isize) -> usize {
        self.inverse[self.wrap(c)]
    }

    /// Applies the permutation to the symbol `p`.
    ///
    /// # Errors
    /// Returns [`EnigmaError::NotInAlphabet`] if `p` is not a symbol of the
    /// alphabet.
    pub fn permute_char(&self, p: char) -> Result<char> {
        let index = self.alphabet.to_int(p)?;
        self.alphabet.to_char(self.forward[index])
    }

    /// Applies the inverse permutation to the symbol `c`.
    ///
    /// # Errors
    /// Returns [`EnigmaError::NotInAlphabet`] if `c` is not a symbol of the
    /// alphabet.
    pub fn invert_char(&self, c: char) -> Result<char> {
        let index = self.alphabet.to_int(c)?;
        self.alphabet.to_char(self.inverse[index])
    }

    /// Returns true iff no index maps to itself.
    pub fn derangement(&self) -> bool {
        self.forward.iter().enumerate().all(|(i, &to)| to != i)
    }

    /// Returns true iff applying the permutation twice is the identity,
    /// i.e. every cycle has length one or two.
    pub fn is_involution(&self) -> bool {
        self.forward == self.inverse
    }
}

impl fmt::Display for Permutation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, cycle) in self.cycles.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "({})", cycle)?;
        }
        Ok(())
    }
}

/// Splits cycle notation into cycles of alphabet indices.
fn parse_cycles(cycles: &str, alphabet: &Alphabet) -> Result<Vec<Vec<usize>>> {
    let mut parsed: Vec<Vec<usize>> = Vec::new();
    let mut seen = vec![false; alphabet.size()];
    let mut current: Option<Vec<usize>> = None;

    for ch in cycles.chars() {
        match ch {
            '(' => {
                if current.is_some() {
                    return Err(EnigmaError::cycle("nested '('"));
                }
                current = Some(Vec::new());
            }
            ')' => match current.take() {
                Some(cycle) if cycle.is_empty() => {
                    return Err(EnigmaError::cycle("empty cycle '()'"));
                }
                Some(cycle) => parsed.push(cycle),
                None => return Err(EnigmaError::cycle("unmatched ')'")),
            },
            c if c.is_whitespace() => {}
            c => {
                let cycle = current
                    .as_mut()
                    .ok_or_else(|| EnigmaError::cycle(format!("'{}' is outside a cycle", c)))?;
                let index = alphabet
                    .to_int(c)
                    .map_err(|_| EnigmaError::cycle(format!("'{}' is not in the alphabet", c)))?;
                if seen[index] {
                    return Err(EnigmaError::cycle(format!("'{}' appears more than once", c)));
                }
                seen[index] = true;
                cycle.push(index);
            }
        }
    }

    if current.is_some() {
        return Err(EnigmaError::cycle("unterminated '('"));
    }
    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alphabet::UPPER;

    fn alpha(chars: &str) -> Arc<Alphabet> {
        Arc::new(Alphabet::new(chars).unwrap())
    }

    /// Checks that `perm` maps each character of `from` to the matching
    /// character of `to` in both the symbol and index forms.
    fn check_perm(test_id: &str, from: &str, to: &str, perm: &Permutation) {
        let alphabet = perm.alphabet().clone();
        assert_eq!(perm.size(), from.chars().count(), "{} (wrong length)", test_id);
        for (c, e) in from.chars().zip(to.chars()) {
            assert_eq!(perm.permute_char(c).unwrap(), e, "{}: translation of '{}'", test_id, c);
            assert_eq!(perm.invert_char(e).unwrap(), c, "{}: inverse of '{}'", test_id, e);
            let ci = alphabet.to_int(c).unwrap();
            let ei = alphabet.to_int(e).unwrap();
            assert_eq!(perm.permute(ci as isize), ei, "{}: translation of {}", test_id, ci);
            assert_eq!(perm.invert(ei as isize), ci, "{}: inverse of {}", test_id, ei);
        }
    }

    #[test]
    fn test_identity_transform() {
        let perm = Permutation::new("", alpha(UPPER)).unwrap();
        check_perm("identity", UPPER, UPPER, &perm);
        assert_eq!(perm, Permutation::identity(alpha(UPPER)));
    }

    #[test]
    fn test_rotor_i_transform() {
        let perm = Permutation::new(
            "(AELTPHQXRU) (BKNW) (CMOY) (DFG) (IV) (JZ) (S)",
            alpha(UPPER),
        )
        .unwrap();
        check_perm("rotor I", UPPER, "EKMFLGDQVZNTOWYHXUSPAIBRCJ", &perm);
    }

    #[test]
    fn test_cycles_recorded() {
        let p = Permutation::new("(EDA) (CB)", alpha("ABCDE")).unwrap();
        assert_eq!(p.cycles()[0], "EDA");
        assert_eq!(p.cycles()[1], "CB");
        assert_eq!(p.to_string(), "(EDA) (CB)");
    }

    #[test]
    fn test_whitespace_and_adjacent_cycles() {
        let p = Permutation::new("  (AB)(C D)\n(E) ", alpha("ABCDE")).unwrap();
        assert_eq!(p.cycles(), &["AB", "CD", "E"]);
        assert_eq!(p.permute_char('C').unwrap(), 'D');
    }

    #[test]
    fn test_permute_char_identity_on_missing() {
        let p = Permutation::new("", alpha("ATC")).unwrap();
        assert_eq!(p.permute_char('A').unwrap(), 'A');
        assert_eq!(p.permute_char('T').unwrap(), 'T');
        assert_eq!(p.permute_char('C').unwrap(), 'C');
    }

    #[test]
    fn test_invert_char() {
        let p = Permutation::new("(EDA) (CB)", alpha("ABCDE")).unwrap();
        assert_eq!(p.invert_char('D').unwrap(), 'E');
        assert_eq!(p.invert_char('A').unwrap(), 'D');
        assert_eq!(p.invert_char('E').unwrap(), 'A');
        assert_eq!(p.invert_char('B').unwrap(), 'C');
        assert_eq!(p.invert_char('C').unwrap(), 'B');
    }

    #[test]
    fn test_wrap_negative_and_large() {
        let p = Permutation::identity(alpha("ABCDE"));
        assert_eq!(p.wrap(-1), 4);
        assert_eq!(p.wrap(-5), 0);
        assert_eq!(p.wrap(-11), 4);
        assert_eq!(p.wrap(7), 2);
        assert_eq!(p.wrap(0), 0);
    }

    #[test]
    fn test_permute_wraps_input() {
        let p = Permutation::new("(EDA) (CB)", alpha("ABCDE")).unwrap();
        // -1 wraps to 4 ('E'), which maps to 'D'.
        assert_eq!(p.permute(-1), 3);
        // 5 wraps to 0 ('A'), whose inverse is 'D'.
        assert_eq!(p.invert(5), 3);
    }

    #[test]
    fn test_derangement() {
        let p1 = Permutation::new("(EDA) (CB)", alpha("ABCDE")).unwrap();
        let p2 = Permutation::new("(EDA) (CB) (F)", alpha("ABCDEF")).unwrap();
        let p3 = Permutation::new("(EDA) (CB)", alpha("ABCDEF")).unwrap();

        assert!(p1.derangement());
        assert!(!p2.derangement());
        assert!(!p3.derangement());
    }

    #[test]
    fn test_is_involution() {
        let swaps = Permutation::new("(AB) (CD)", alpha("ABCDE")).unwrap();
        let three = Permutation::new("(ABC)", alpha("ABCDE")).unwrap();
        assert!(swaps.is_involution());
        assert!(!three.is_involution());
        assert!(Permutation::identity(alpha("ABC")).is_involution());
    }

    #[test]
    fn test_cycle_not_in_alphabet() {
        let result = Permutation::new("(BACD) (FE)", alpha("ABCD"));
        assert!(matches!(result, Err(EnigmaError::InvalidCycle(_))));
    }

    #[test]
    fn test_char_not_in_alphabet() {
        let p = Permutation::new("(BACD)", alpha("ABCD")).unwrap();
        assert_eq!(p.invert_char('F'), Err(EnigmaError::NotInAlphabet('F')));
        assert_eq!(p.permute_char('F'), Err(EnigmaError::NotInAlphabet('F')));
    }

    #[test]
    fn test_overlapping_cycles_rejected() {
        let result = Permutation::new("(AB) (BC)", alpha("ABCD"));
        assert_eq!(
            result,
            Err(EnigmaError::InvalidCycle("'B' appears more than once".into()))
        );
        assert!(Permutation::new("(ABA)", alpha("ABCD")).is_err());
    }

    #[test]
    fn test_malformed_parentheses_rejected() {
        let a = alpha("ABCD");
        for bad in ["(AB", "AB)", "((AB))", "(AB) C", "()"] {
            assert!(
                matches!(Permutation::new(bad, a.clone()), Err(EnigmaError::InvalidCycle(_))),
                "{:?} should be rejected",
                bad
            );
        }
    }
}
