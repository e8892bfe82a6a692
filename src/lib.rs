//! Enigma rotor cipher machine simulator.
//!
//! A machine transforms one input symbol into one output symbol through a
//! plugboard, a stack of rotors and a reflector, while the rotor stack
//! advances according to a notch/pawl ratchet. Because the reflector is a
//! fixed-point-free involution, feeding ciphertext back through a machine
//! reset to the same settings reproduces the plaintext.
//!
//! # Architecture
//!
//! ```text
//! Alphabet     (symbol <-> index)
//!     ↓ shared via Arc
//! Permutation  (cycle notation, forward and inverse tables)
//!     ↓ shared via Arc
//! Rotor        (Reflector | Fixed | Moving{notches}, setting + ring offset)
//!     ↓ pool arena, indexed by slot
//! Machine      (stepping, plugboard -> rotors -> reflector -> rotors -> plugboard)
//!     ↑
//! MachineConfig / Settings / Session   (description text, settings lines, messages)
//! ```
//!
//! # Examples
//!
//! Configure a machine from a description and a settings line, then
//! encrypt and decrypt:
//!
//! ```
//! use enigma::{MachineConfig, Settings};
//!
//! let config: MachineConfig = "\
//! ABCDEFGHIJKLMNOPQRSTUVWXYZ
//!  5 3
//!  I MQ      (AELTPHQXRU) (BKNW) (CMOY) (DFG) (IV) (JZ) (S)
//!  III MV    (ABDHPEJT) (CFLVMZOYQIRWUKXSG) (N)
//!  IV MJ     (AEPLIYWCOXMRFZBSTGJQNH) (DV) (KU)
//!  Beta N    (ALBEVFCYODJWUGNMQTZSKPR) (HIX)
//!  B R       (AE) (BN) (CK) (DQ) (FU) (GY) (HW) (IJ) (LO) (MP)
//!            (RX) (SZ) (TV)
//! "
//! .parse()
//! .unwrap();
//!
//! let settings = Settings::parse("* B Beta III IV I AXLE (HQ) (EX) (IP) (TR) (BY)", 5).unwrap();
//!
//! let mut encoder = config.build().unwrap();
//! settings.apply(&mut encoder).unwrap();
//! let cipher = encoder.convert("FROMHISSHOULDERHIAWATHA").unwrap();
//! assert_eq!(cipher, "QVPQSOKOILPUBKJZPISFXDW");
//!
//! let mut decoder = config.build().unwrap();
//! settings.apply(&mut decoder).unwrap();
//! assert_eq!(decoder.convert(&cipher).unwrap(), "FROMHISSHOULDERHIAWATHA");
//! ```

#![deny(clippy::all)]

pub mod error;

pub mod alphabet;
pub mod config;
pub mod machine;
pub mod permutation;
pub mod rotor;
pub mod session;
pub mod settings;
pub mod utils;

pub use alphabet::Alphabet;
pub use config::MachineConfig;
pub use error::{EnigmaError, Result};
pub use machine::Machine;
pub use permutation::Permutation;
pub use rotor::{Rotor, RotorKind};
pub use session::Session;
pub use settings::Settings;
