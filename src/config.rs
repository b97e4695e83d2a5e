//! Engine and session configuration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Set of symbols the engine accepts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Alphabet {
    /// `a` through `z`.
    #[default]
    Lowercase,
    /// Printable ASCII without space (`!` through `~`).
    AsciiGraphic,
    /// Any Unicode scalar value.
    Unicode,
}

impl Alphabet {
    pub fn contains(self, symbol: char) -> bool {
        match self {
            Alphabet::Lowercase => symbol.is_ascii_lowercase(),
            Alphabet::AsciiGraphic => symbol.is_ascii_graphic(),
            Alphabet::Unicode => true,
        }
    }
}

impl fmt::Display for Alphabet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Alphabet::Lowercase => "lowercase",
            Alphabet::AsciiGraphic => "ascii",
            Alphabet::Unicode => "unicode",
        };
        f.write_str(name)
    }
}

impl FromStr for Alphabet {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "lowercase" => Ok(Alphabet::Lowercase),
            "ascii" => Ok(Alphabet::AsciiGraphic),
            "unicode" => Ok(Alphabet::Unicode),
            other => Err(format!("unknown alphabet: {}", other)),
        }
    }
}

/// Automaton configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Symbols accepted by `append`.
    pub alphabet: Alphabet,

    /// Expected number of appends; pre-sizes the arena and logs.
    pub capacity_hint: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            alphabet: Alphabet::Lowercase,
            capacity_hint: 0,
        }
    }
}

/// Driver configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionConfig {
    /// Configuration for the engine reset at the start of every case.
    pub engine: EngineConfig,

    /// Command symbol that undoes the last append.
    pub undo_symbol: char,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            engine: EngineConfig::default(),
            undo_symbol: '-',
        }
    }
}
