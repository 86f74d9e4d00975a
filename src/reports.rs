use std::collections::{BTreeMap, BTreeSet};

use anyhow::Context;
use chrono::{Duration, NaiveDate};

use crate::input;
use crate::models::{ExpiringTraining, ExpiryStatus, Person};
use crate::normalize;

/// Knobs for one reporting run. Replaces the hard-coded reference values;
/// the CLI defaults reproduce them.
#[derive(Debug, Clone)]
pub struct ReportConfig {
    pub trainings_of_interest: BTreeSet<String>,
    pub fiscal_year: i32,
    pub reference_date: NaiveDate,
}

/// All three reports, computed in memory before anything is written so a
/// failure never leaves partial artifacts behind.
#[derive(Debug, Clone)]
pub struct ReportBundle {
    pub counts: BTreeMap<String, u64>,
    pub fiscal_year: BTreeMap<String, Vec<String>>,
    pub expiring: BTreeMap<String, Vec<ExpiringTraining>>,
}

pub fn run_reports(people: &[Person], config: &ReportConfig) -> anyhow::Result<ReportBundle> {
    Ok(ReportBundle {
        counts: training_counts(people),
        fiscal_year: fiscal_year_completions(
            people,
            &config.trainings_of_interest,
            config.fiscal_year,
        )?,
        expiring: expiring_trainings(people, config.reference_date),
    })
}

/// How many distinct people most recently completed each training. Retakes
/// collapse through normalization, so each person counts at most once per
/// training.
pub fn training_counts(people: &[Person]) -> BTreeMap<String, u64> {
    let mut counts: BTreeMap<String, u64> = BTreeMap::new();

    for person in people {
        for training in normalize::latest_completions(person).keys() {
            *counts.entry(training.clone()).or_insert(0) += 1;
        }
    }

    counts
}

/// Who completed each training of interest within the fiscal year window:
/// July 1 of the prior year through June 30 of the named year, inclusive.
/// Trainings nobody completed in the window are left out entirely.
pub fn fiscal_year_completions(
    people: &[Person],
    trainings_of_interest: &BTreeSet<String>,
    fiscal_year: i32,
) -> anyhow::Result<BTreeMap<String, Vec<String>>> {
    let start = NaiveDate::from_ymd_opt(fiscal_year - 1, 7, 1)
        .with_context(|| format!("fiscal year {fiscal_year} is out of range"))?;
    let end = NaiveDate::from_ymd_opt(fiscal_year, 6, 30)
        .with_context(|| format!("fiscal year {fiscal_year} is out of range"))?;

    let mut completions: BTreeMap<String, Vec<String>> = BTreeMap::new();

    for person in people {
        for (training, latest) in normalize::latest_completions(person) {
            if !trainings_of_interest.contains(&training) {
                continue;
            }
            let Some(completed) = latest.timestamp else {
                continue;
            };
            if completed >= start && completed <= end {
                completions.entry(training).or_default().push(person.name.clone());
            }
        }
    }

    Ok(completions)
}

/// Trainings already expired at the reference date, or expiring within the
/// next 30 days, grouped by person. The `Expired` check runs first: an
/// expiry falling exactly on the reference date reads as "Expires soon".
pub fn expiring_trainings(
    people: &[Person],
    reference_date: NaiveDate,
) -> BTreeMap<String, Vec<ExpiringTraining>> {
    let will_expire = reference_date + Duration::days(30);

    let mut expiring: BTreeMap<String, Vec<ExpiringTraining>> = BTreeMap::new();

    for person in people {
        for (training, latest) in normalize::latest_completions(person) {
            let Some(expires) = latest.expires else {
                continue;
            };
            let status = if expires < reference_date {
                ExpiryStatus::Expired
            } else if expires <= will_expire {
                ExpiryStatus::ExpiresSoon
            } else {
                continue;
            };
            expiring
                .entry(person.name.clone())
                .or_default()
                .push(ExpiringTraining {
                    training,
                    expires: Some(input::format_date(expires)),
                    status,
                });
        }
    }

    expiring
}
