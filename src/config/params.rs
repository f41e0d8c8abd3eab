//! Worker counts and file limit derived from a numeric identifier

use serde::Serialize;

use crate::error::DerivationError;

/// Parameters derived from an identifier such as a student number
///
/// - `io_workers = last two digits mod 4 + 2`
/// - `cpu_workers = middle two digits mod 3 + 2`, the middle pair being the
///   two digits straddling index `len / 2`
/// - `file_limit = last three digits * 10`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DerivedParams {
    pub identifier: String,
    pub io_workers: usize,
    pub cpu_workers: usize,
    pub file_limit: usize,
}

impl DerivedParams {
    pub fn from_identifier(identifier: &str) -> Result<Self, DerivationError> {
        let digits = identifier.trim();
        if !digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(DerivationError::NonDigit {
                identifier: identifier.to_string(),
            });
        }
        if digits.len() < 3 {
            return Err(DerivationError::TooShort {
                identifier: identifier.to_string(),
            });
        }

        let len = digits.len();
        let mid = len / 2;
        let last_two = number(&digits[len - 2..]);
        let middle_two = number(&digits[mid - 1..mid + 1]);
        let last_three = number(&digits[len - 3..]);

        Ok(Self {
            identifier: digits.to_string(),
            io_workers: last_two % 4 + 2,
            cpu_workers: middle_two % 3 + 2,
            file_limit: last_three * 10,
        })
    }
}

/// Value of at most three ASCII digits
fn number(digits: &str) -> usize {
    digits
        .bytes()
        .fold(0, |acc, b| acc * 10 + usize::from(b - b'0'))
}
