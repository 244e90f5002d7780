use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{QueryError, QueryResult};

/// Engine configuration shared by grouped frames and the plan executor.
///
/// - `case_insensitive_functions` folds aggregate names to lowercase before lookup.
/// - `literal_quotes` lists the characters that may quote a comparison literal;
///   one matching pair around the literal is stripped before comparing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub case_insensitive_functions: bool,
    pub literal_quotes: Vec<char>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            case_insensitive_functions: true,
            literal_quotes: vec!['\'', '"'],
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Function names must match the registry exactly.
    pub fn case_sensitive() -> Self {
        Self { case_insensitive_functions: false, ..Self::default() }
    }

    pub fn with_literal_quotes(mut self, quotes: &[char]) -> Self {
        self.literal_quotes = quotes.to_vec();
        self
    }

    /// Read a JSON config file. Missing keys fall back to the defaults.
    pub fn load_from_file(path: impl AsRef<Path>) -> QueryResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| QueryError::Config(format!("{}: {}", path.display(), e)))?;
        serde_json::from_str(&text)
            .map_err(|e| QueryError::Config(format!("{}: {}", path.display(), e)))
    }
}
