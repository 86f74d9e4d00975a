use std::path::Path;

use chrono::NaiveDate;
use thiserror::Error;

use crate::models::{Completion, Person, RawPerson};

const DATE_FORMAT: &str = "%m/%d/%Y";

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("input file {path} does not exist")]
    InputNotFound { path: String },
    #[error("failed to read {path}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("input is not a valid collection of training records")]
    Malformed(#[from] serde_json::Error),
    #[error("invalid {field} date {value:?} for {person} / {training}: expected MM/DD/YYYY")]
    DateFormat {
        person: String,
        training: String,
        field: &'static str,
        value: String,
    },
}

/// Parses an MM/DD/YYYY date string. An empty string is an absent date, not
/// an error.
pub fn parse_date(value: &str) -> Result<Option<NaiveDate>, chrono::ParseError> {
    if value.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(value, DATE_FORMAT).map(Some)
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Reads the input file and runs the one-time date-parsing pass. Everything
/// downstream works on the returned snapshot.
pub fn load_people(path: &Path) -> Result<Vec<Person>, ParseError> {
    if !path.exists() {
        return Err(ParseError::InputNotFound {
            path: path.display().to_string(),
        });
    }
    let contents = std::fs::read_to_string(path).map_err(|source| ParseError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let raw: Vec<RawPerson> = serde_json::from_str(&contents)?;
    parse_people(raw)
}

pub fn parse_people(raw: Vec<RawPerson>) -> Result<Vec<Person>, ParseError> {
    raw.into_iter().map(parse_person).collect()
}

fn parse_person(raw: RawPerson) -> Result<Person, ParseError> {
    let mut completions = Vec::with_capacity(raw.completions.len());
    for completion in raw.completions {
        let timestamp = parse_field(
            &raw.name,
            &completion.name,
            "timestamp",
            completion.timestamp.as_deref(),
        )?;
        let expires = parse_field(
            &raw.name,
            &completion.name,
            "expires",
            completion.expires.as_deref(),
        )?;
        completions.push(Completion {
            name: completion.name,
            timestamp,
            expires,
        });
    }
    Ok(Person {
        name: raw.name,
        completions,
    })
}

fn parse_field(
    person: &str,
    training: &str,
    field: &'static str,
    value: Option<&str>,
) -> Result<Option<NaiveDate>, ParseError> {
    let Some(value) = value else {
        return Ok(None);
    };
    parse_date(value).map_err(|_| ParseError::DateFormat {
        person: person.to_string(),
        training: training.to_string(),
        field,
        value: value.to_string(),
    })
}
