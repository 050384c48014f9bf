use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::ValidationError;

/// What a resolved TSETMC instrument code refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InstrumentKind {
    Stock,
    Index,
    Industry,
}

impl InstrumentKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Stock => "stock",
            Self::Index => "index",
            Self::Industry => "industry",
        }
    }
}

impl Display for InstrumentKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A symbol resolved to its TSETMC instrument code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instrument {
    pub code: String,
    pub kind: InstrumentKind,
    /// Label used in the `Ticker` column.
    pub label: String,
}

impl Instrument {
    pub fn new(code: impl Into<String>, kind: InstrumentKind, label: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            kind,
            label: label.into(),
        }
    }
}

/// Normalizes a user-typed Persian symbol: Arabic yeh/kaf become their Persian forms,
/// zero-width non-joiners and repeated spaces are removed.
pub fn normalize_symbol(raw: &str) -> Result<String, ValidationError> {
    let mut normalized = String::with_capacity(raw.len());
    let mut last_space = false;
    for ch in raw.trim().chars() {
        let mapped = match ch {
            'ي' | 'ى' => 'ی',
            'ك' => 'ک',
            '\u{200c}' | '\u{200f}' => continue,
            other => other,
        };
        if mapped.is_whitespace() {
            if !last_space {
                normalized.push(' ');
            }
            last_space = true;
        } else {
            normalized.push(mapped);
            last_space = false;
        }
    }

    if normalized.is_empty() {
        return Err(ValidationError::EmptySymbol);
    }
    Ok(normalized)
}
