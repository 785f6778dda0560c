//! Symbol universe parsing.
//!
//! The universe is loaded once per run, either from a comma list in the
//! config or from a file with one symbol per line.

use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq)]
pub struct Universe {
    pub symbols: Vec<String>,
}

impl Universe {
    pub fn count(&self) -> usize {
        self.symbols.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.symbols.iter().map(String::as_str)
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum UniverseError {
    #[error("empty token in symbol list")]
    EmptyToken,

    #[error("duplicate symbol: {0}")]
    DuplicateSymbol(String),

    #[error("symbol list is empty")]
    Empty,
}

/// Parse `"TCS, infy,HDFCBANK"` into upper-cased, de-duplicated symbols.
pub fn parse_symbols(input: &str) -> Result<Universe, UniverseError> {
    collect_unique(input.split(',').map(str::trim), true)
}

/// Parse a symbols file: one symbol per line, blank lines and `#` comments ignored.
pub fn parse_symbol_lines(content: &str) -> Result<Universe, UniverseError> {
    let tokens = content
        .lines()
        .map(|line| line.split('#').next().unwrap_or("").trim())
        .filter(|line| !line.is_empty());
    collect_unique(tokens, false)
}

fn collect_unique<'a>(
    tokens: impl Iterator<Item = &'a str>,
    reject_empty: bool,
) -> Result<Universe, UniverseError> {
    let mut symbols = Vec::new();
    let mut seen = HashSet::new();

    for token in tokens {
        if token.is_empty() {
            if reject_empty {
                return Err(UniverseError::EmptyToken);
            }
            continue;
        }
        let symbol = token.to_uppercase();
        if !seen.insert(symbol.clone()) {
            return Err(UniverseError::DuplicateSymbol(symbol));
        }
        symbols.push(symbol);
    }

    if symbols.is_empty() {
        return Err(UniverseError::Empty);
    }
    Ok(Universe { symbols })
}
