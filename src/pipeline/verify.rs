// src/pipeline/verify.rs

//! Accumulator verification.

use std::str::FromStr;

use serde::Deserialize;

/// Absolute tolerance when comparing a slot with the expected value.
pub const EPSILON: f64 = 1.0e-8;

/// How many mismatches verification reports.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerifyMode {
    /// Stop at the first mismatching slot.
    #[default]
    First,
    /// Report every mismatching slot.
    All,
}

impl FromStr for VerifyMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "first" => Ok(VerifyMode::First),
            "all" => Ok(VerifyMode::All),
            other => Err(format!(
                "invalid verify mode: {other} (expected \"first\" or \"all\")"
            )),
        }
    }
}

/// One slot that differs from the expected value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mismatch {
    pub index: usize,
    pub value: f64,
}

/// Result of comparing the accumulator with `N * (N + 1)`.
///
/// Mismatches are an outcome, not an error: the run completes either way.
#[derive(Debug, Clone, PartialEq)]
pub struct VerificationReport {
    pub expected: f64,
    pub mode: VerifyMode,
    /// Slots compared before stopping.
    pub checked: usize,
    pub mismatches: Vec<Mismatch>,
}

impl VerificationReport {
    pub fn is_valid(&self) -> bool {
        self.mismatches.is_empty()
    }

    /// Lines the binary prints for this report.
    pub fn lines(&self) -> Vec<String> {
        if self.is_valid() {
            let mut lines = vec!["Solution validates".to_string()];
            if self.mode == VerifyMode::All {
                lines.push(format!(
                    "Element verification value: {:.6}",
                    self.expected
                ));
            }
            return lines;
        }

        let prefix = match self.mode {
            VerifyMode::First => "First error",
            VerifyMode::All => "ERROR",
        };
        self.mismatches
            .iter()
            .map(|m| {
                format!(
                    "{prefix} at i={}; value: {:.6}; reference value: {:.6}",
                    m.index, m.value, self.expected
                )
            })
            .collect()
    }
}

/// Compare `values` against `expected` within [`EPSILON`].
pub fn verify_slots(values: &[f64], expected: f64, mode: VerifyMode) -> VerificationReport {
    let mut mismatches = Vec::new();
    let mut checked = 0;

    for (index, &value) in values.iter().enumerate() {
        checked += 1;
        // NaN never compares below the tolerance, so it counts as a mismatch.
        if !((value - expected).abs() < EPSILON) {
            mismatches.push(Mismatch { index, value });
            if mode == VerifyMode::First {
                break;
            }
        }
    }

    VerificationReport {
        expected,
        mode,
        checked,
        mismatches,
    }
}
