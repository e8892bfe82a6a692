//! Alphabet: bidirectional mapping between symbols and dense indices.
//!
//! Symbol number `k` has index `k`, numbering from 0. Construction rejects
//! duplicate symbols so the mapping is total and injective over `[0, size)`.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::error::{EnigmaError, Result};

/// Characters of the conventional machine alphabet.
pub const UPPER: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// An ordered set of unique encodable characters.
///
/// Alphabets are immutable after construction and are shared between
/// permutations, rotors and machines behind an `Arc`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alphabet {
    chars: Vec<char>,
    index: HashMap<char, usize>,
}

impl Default for Alphabet {
    fn default() -> Self {
        Self::upper()
    }
}

impl Alphabet {
    /// Creates an alphabet from the characters of `chars`, in order.
    ///
    /// # Parameters
    /// - `chars`: The symbols, each one character.
    ///
    /// # Errors
    /// Returns [`EnigmaError::EmptyAlphabet`] if `chars` is empty and
    /// [`EnigmaError::DuplicateSymbol`] if any character repeats.
    ///
    /// # Examples
    ///
    /// ```
    /// use enigma::Alphabet;
    ///
    /// let alpha = Alphabet::new("ABCDE").unwrap();
    /// assert_eq!(alpha.size(), 5);
    /// assert!(Alphabet::new("ABCA").is_err());
    /// ```
    pub fn new(chars: &str) -> Result<Self> {
        let chars: Vec<char> = chars.chars().collect();
        if chars.is_empty() {
            return Err(EnigmaError::EmptyAlphabet);
        }
        let mut index = HashMap::with_capacity(chars.len());
        for (i, &ch) in chars.iter().enumerate() {
            if index.insert(ch, i).is_some() {
                return Err(EnigmaError::DuplicateSymbol(ch));
            }
        }
        Ok(Alphabet { chars, index })
    }

    /// The 26 upper-case Latin letters.
    pub fn upper() -> Self {
        let chars: Vec<char> = UPPER.chars().collect();
        let index = chars.iter().enumerate().map(|(i, &ch)| (ch, i)).collect();
        Alphabet { chars, index }
    }

    /// Returns the number of symbols.
    pub fn size(&self) -> usize {
        self.chars.len()
    }

    /// Returns the symbols in index order.
    pub fn chars(&self) -> &[char] {
        &self.chars
    }

    /// Returns true if `ch` is in this alphabet.
    pub fn contains(&self, ch: char) -> bool {
        self.index.contains_key(&ch)
    }

    /// Returns character number `index`.
    ///
    /// # Errors
    /// Returns [`EnigmaError::OutOfRange`] unless `index < size()`.
    pub fn to_char(&self, index: usize) -> Result<char> {
        self.chars
            .get(index)
            .copied()
            .ok_or(EnigmaError::OutOfRange {
                index,
                size: self.size(),
            })
    }

    /// Returns the index of `ch`. Inverse of [`to_char`](Self::to_char).
    ///
    /// # Errors
    /// Returns [`EnigmaError::NotInAlphabet`] if `ch` is absent.
    pub fn to_int(&self, ch: char) -> Result<usize> {
        self.index
            .get(&ch)
            .copied()
            .ok_or(EnigmaError::NotInAlphabet(ch))
    }

    /// Maps every character of `text` to its index, failing on the first
    /// character not in the alphabet.
    pub fn to_indices(&self, text: &str) -> Result<Vec<usize>> {
        text.chars().map(|ch| self.to_int(ch)).collect()
    }
}

impl FromStr for Alphabet {
    type Err = EnigmaError;

    fn from_str(s: &str) -> Result<Self> {
        Alphabet::new(s)
    }
}

impl fmt::Display for Alphabet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for ch in &self.chars {
            write!(f, "{}", ch)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chars_in_order() {
        let chars = "ABCDEFG";
        let a = Alphabet::new(chars).unwrap();
        for (i, ch) in chars.chars().enumerate() {
            assert_eq!(a.chars()[i], ch);
            assert_eq!(a.to_char(i).unwrap(), ch);
            assert_eq!(a.to_int(ch).unwrap(), i);
        }
    }

    #[test]
    fn test_contains() {
        let a = Alphabet::new("ABCDEFG").unwrap();
        assert!(a.contains('E'));
        assert!(!a.contains('Z'));
    }

    #[test]
    fn test_default_is_upper() {
        let a = Alphabet::default();
        assert_eq!(a.size(), 26);
        assert_eq!(a.to_string(), UPPER);
        assert_eq!(a, Alphabet::new(UPPER).unwrap());
    }

    #[test]
    fn test_to_char_out_of_range() {
        let a = Alphabet::new("ATC").unwrap();
        assert_eq!(
            a.to_char(3),
            Err(EnigmaError::OutOfRange { index: 3, size: 3 })
        );
    }

    #[test]
    fn test_to_int_not_in_alphabet() {
        let a = Alphabet::new("ATC").unwrap();
        assert_eq!(a.to_int('G'), Err(EnigmaError::NotInAlphabet('G')));
    }

    #[test]
    fn test_duplicate_symbol_rejected() {
        assert_eq!(
            Alphabet::new("ABCB"),
            Err(EnigmaError::DuplicateSymbol('B'))
        );
    }

    #[test]
    fn test_empty_rejected() {
        assert_eq!(Alphabet::new(""), Err(EnigmaError::EmptyAlphabet));
    }

    #[test]
    fn test_non_letter_symbols() {
        let a: Alphabet = "01234.-".parse().unwrap();
        assert_eq!(a.size(), 7);
        assert_eq!(a.to_int('.').unwrap(), 5);
    }

    #[test]
    fn test_to_indices() {
        let a = Alphabet::upper();
        assert_eq!(a.to_indices("CAB").unwrap(), vec![2, 0, 1]);
        assert_eq!(a.to_indices("Ab"), Err(EnigmaError::NotInAlphabet('b')));
    }
}
