use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::models::{LatestCompletion, Person};

/// Collapses a person's completion history to one entry per training name.
/// Every reporter goes through this, so they can never disagree about which
/// retake counts as the latest.
pub fn latest_completions(person: &Person) -> BTreeMap<String, LatestCompletion> {
    let mut latest: BTreeMap<String, LatestCompletion> = BTreeMap::new();

    for completion in &person.completions {
        let candidate = LatestCompletion {
            timestamp: completion.timestamp,
            expires: completion.expires,
        };
        match latest.get_mut(&completion.name) {
            None => {
                latest.insert(completion.name.clone(), candidate);
            }
            Some(entry) if is_later(candidate.timestamp, entry.timestamp) => {
                *entry = candidate;
            }
            Some(_) => {}
        }
    }

    latest
}

/// Strict "later than". A real date beats an absent one, an absent date
/// never wins, and equal timestamps keep the entry seen first.
fn is_later(candidate: Option<NaiveDate>, current: Option<NaiveDate>) -> bool {
    match (candidate, current) {
        (Some(candidate), Some(current)) => candidate > current,
        (Some(_), None) => true,
        (None, _) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Completion;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    fn completion(
        name: &str,
        timestamp: Option<NaiveDate>,
        expires: Option<NaiveDate>,
    ) -> Completion {
        Completion {
            name: name.to_string(),
            timestamp,
            expires,
        }
    }

    fn person(completions: Vec<Completion>) -> Person {
        Person {
            name: "Alice Smith".to_string(),
            completions,
        }
    }

    #[test]
    fn keeps_event_with_latest_timestamp() {
        let person = person(vec![
            completion("Laboratory Safety Training", Some(date(2023, 1, 5)), None),
            completion("Laboratory Safety Training", Some(date(2024, 1, 5)), None),
        ]);

        let latest = latest_completions(&person);
        assert_eq!(latest.len(), 1);
        assert_eq!(
            latest["Laboratory Safety Training"].timestamp,
            Some(date(2024, 1, 5))
        );
    }

    #[test]
    fn latest_wins_regardless_of_input_order() {
        let person = person(vec![
            completion("X-Ray Safety", Some(date(2024, 6, 1)), None),
            completion("X-Ray Safety", Some(date(2023, 6, 1)), None),
        ]);

        let latest = latest_completions(&person);
        assert_eq!(latest["X-Ray Safety"].timestamp, Some(date(2024, 6, 1)));
    }

    #[test]
    fn tie_keeps_first_seen_event() {
        let person = person(vec![
            completion("X-Ray Safety", Some(date(2024, 1, 5)), Some(date(2025, 1, 5))),
            completion("X-Ray Safety", Some(date(2024, 1, 5)), Some(date(2026, 1, 5))),
        ]);

        let latest = latest_completions(&person);
        assert_eq!(latest["X-Ray Safety"].expires, Some(date(2025, 1, 5)));
    }

    #[test]
    fn expires_travels_with_the_winning_event() {
        let person = person(vec![
            completion("X-Ray Safety", Some(date(2023, 8, 1)), Some(date(2023, 10, 15))),
            completion("X-Ray Safety", Some(date(2024, 8, 1)), Some(date(2024, 10, 15))),
        ]);

        let latest = latest_completions(&person);
        let entry = latest["X-Ray Safety"];
        assert_eq!(entry.timestamp, Some(date(2024, 8, 1)));
        assert_eq!(entry.expires, Some(date(2024, 10, 15)));
    }

    #[test]
    fn absent_timestamp_never_beats_a_real_date() {
        let person = person(vec![
            completion("X-Ray Safety", Some(date(2023, 8, 1)), None),
            completion("X-Ray Safety", None, Some(date(2099, 1, 1))),
        ]);

        let latest = latest_completions(&person);
        assert_eq!(latest["X-Ray Safety"].timestamp, Some(date(2023, 8, 1)));
        assert_eq!(latest["X-Ray Safety"].expires, None);
    }

    #[test]
    fn real_date_beats_an_absent_timestamp() {
        let person = person(vec![
            completion("X-Ray Safety", None, None),
            completion("X-Ray Safety", Some(date(2023, 8, 1)), None),
        ]);

        let latest = latest_completions(&person);
        assert_eq!(latest["X-Ray Safety"].timestamp, Some(date(2023, 8, 1)));
    }

    #[test]
    fn absent_only_entry_is_retained() {
        let person = person(vec![
            completion("X-Ray Safety", None, Some(date(2023, 10, 15))),
            completion("X-Ray Safety", None, Some(date(2024, 10, 15))),
        ]);

        let latest = latest_completions(&person);
        assert_eq!(latest.len(), 1);
        assert_eq!(latest["X-Ray Safety"].timestamp, None);
        assert_eq!(latest["X-Ray Safety"].expires, Some(date(2023, 10, 15)));
    }

    #[test]
    fn distinct_trainings_stay_separate() {
        let person = person(vec![
            completion("X-Ray Safety", Some(date(2023, 8, 1)), None),
            completion("Laboratory Safety Training", Some(date(2023, 9, 1)), None),
        ]);

        let latest = latest_completions(&person);
        assert_eq!(latest.len(), 2);
    }
}
