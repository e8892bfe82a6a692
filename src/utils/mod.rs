//! Text helpers shared by the session layer.

pub mod text;
