//! Lookup-term dispatch for `find_one`.

use crate::record::{normalize_name, RecordId};
use crate::store::FieldValue;

/// The single lookup strategy selected for a caller-supplied term.
#[derive(Debug, Clone, PartialEq)]
pub enum LookupTerm {
    /// Term parsed as a number; matched against `no`.
    Number(f64),
    /// Term is a syntactically valid store id.
    Id(RecordId),
    /// Anything else; matched against the normalized name.
    Name(String),
}

impl LookupTerm {
    /// Pick the strategy: number first, then id, then name.
    pub fn parse(term: &str) -> Self {
        let trimmed = term.trim();
        if !trimmed.is_empty() {
            if let Ok(number) = trimmed.parse::<f64>() {
                if number.is_finite() {
                    return LookupTerm::Number(number);
                }
            }
        }

        if let Ok(id) = term.parse::<RecordId>() {
            return LookupTerm::Id(id);
        }

        LookupTerm::Name(normalize_name(term))
    }

    /// Field match for the number and name strategies.
    ///
    /// `None` for ids, and for numbers that no `no` can equal (negative,
    /// fractional, or beyond `u32`).
    pub fn field(&self) -> Option<FieldValue> {
        match self {
            LookupTerm::Number(n) => {
                let integral = n.fract() == 0.0 && *n >= 0.0 && *n <= f64::from(u32::MAX);
                integral.then(|| FieldValue::No(*n as u32))
            }
            LookupTerm::Name(name) => Some(FieldValue::Name(name.clone())),
            LookupTerm::Id(_) => None,
        }
    }
}
