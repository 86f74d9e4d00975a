use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Person record as it appears on disk, dates still in MM/DD/YYYY string form.
#[derive(Debug, Clone, Deserialize)]
pub struct RawPerson {
    pub name: String,
    pub completions: Vec<RawCompletion>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawCompletion {
    pub name: String,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub expires: Option<String>,
}

/// Person record after the one-time date-parsing pass. Immutable for the
/// rest of the run.
#[derive(Debug, Clone)]
pub struct Person {
    pub name: String,
    pub completions: Vec<Completion>,
}

#[derive(Debug, Clone)]
pub struct Completion {
    pub name: String,
    pub timestamp: Option<NaiveDate>,
    pub expires: Option<NaiveDate>,
}

/// The winning completion event for one (person, training) pair. `expires`
/// is carried from the same event as the winning timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LatestCompletion {
    pub timestamp: Option<NaiveDate>,
    pub expires: Option<NaiveDate>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ExpiryStatus {
    #[serde(rename = "Expired")]
    Expired,
    #[serde(rename = "Expires soon")]
    ExpiresSoon,
}

impl fmt::Display for ExpiryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExpiryStatus::Expired => f.write_str("Expired"),
            ExpiryStatus::ExpiresSoon => f.write_str("Expires soon"),
        }
    }
}

/// One row of the expiry report, dates formatted back to MM/DD/YYYY.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExpiringTraining {
    pub training: String,
    pub expires: Option<String>,
    pub status: ExpiryStatus,
}
