//! Answers and the known-answer store

use crate::descriptor;
use crate::error::ConfigurationError;
use crate::id::{Day, PuzzlePartId, Year};
use serde::Deserialize;
use std::collections::HashMap;
use std::fmt;
use std::path::Path;

/// A puzzle answer, either numeric or textual
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(untagged)]
pub enum Answer {
    Int(i64),
    Str(String),
}

impl Answer {
    /// Interpret a solver output token
    ///
    /// Base-10 integers with an optional sign become [`Answer::Int`],
    /// anything else is kept verbatim as [`Answer::Str`]. Integers outside
    /// the `i64` range are kept as strings too; TOML integers share that
    /// range, so such an answer can only be recorded as a string.
    pub fn parse(token: &str) -> Self {
        token
            .parse()
            .map(Answer::Int)
            .unwrap_or_else(|_| Answer::Str(token.to_string()))
    }
}

impl fmt::Display for Answer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Answer::Int(value) => write!(f, "{value}"),
            Answer::Str(value) => f.write_str(value),
        }
    }
}

/// Known-correct answers, keyed by puzzle part
///
/// Loaded once per process and only read afterwards. A missing entry means
/// the answer is not known yet, which is never an error.
#[derive(Debug, Default)]
pub struct AnswerStore {
    answers: HashMap<PuzzlePartId, Answer>,
}

impl AnswerStore {
    /// Load the store from an `answers.toml` descriptor
    pub fn load(path: &Path) -> Result<Self, ConfigurationError> {
        Ok(descriptor::read(path)?.into_iter().collect())
    }

    /// Parse the store from descriptor content
    pub fn from_toml(content: &str, path: &Path) -> Result<Self, ConfigurationError> {
        Ok(descriptor::parse(content, path)?.into_iter().collect())
    }

    /// Known answer for a puzzle part, if any
    pub fn get(&self, id: &PuzzlePartId) -> Option<&Answer> {
        self.answers.get(id)
    }

    /// All puzzle parts with a known answer, in ascending order
    pub fn part_ids(&self) -> impl Iterator<Item = PuzzlePartId> + '_ {
        let mut ids: Vec<_> = self.answers.keys().copied().collect();
        ids.sort();
        ids.into_iter()
    }

    /// Puzzle parts of one day with a known answer, in ascending order
    pub fn part_ids_for_day(
        &self,
        year: Year,
        day: Day,
    ) -> impl Iterator<Item = PuzzlePartId> + '_ {
        self.part_ids()
            .filter(move |id| id.year == year && id.day == day)
    }

    pub fn len(&self) -> usize {
        self.answers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.answers.is_empty()
    }
}

impl FromIterator<(PuzzlePartId, Answer)> for AnswerStore {
    fn from_iter<T: IntoIterator<Item = (PuzzlePartId, Answer)>>(iter: T) -> Self {
        Self {
            answers: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id::Part;
    use proptest::prelude::*;

    #[test]
    fn test_parse_answer_tokens() {
        assert_eq!(Answer::parse("42"), Answer::Int(42));
        assert_eq!(Answer::parse("-7"), Answer::Int(-7));
        assert_eq!(Answer::parse("+7"), Answer::Int(7));
        assert_eq!(Answer::parse("ABCDEFGH"), Answer::Str("ABCDEFGH".into()));
        assert_eq!(Answer::parse("12ab"), Answer::Str("12ab".into()));
        assert_eq!(Answer::parse("1,2,3"), Answer::Str("1,2,3".into()));
    }

    #[test]
    fn test_parse_integer_range() {
        assert_eq!(Answer::parse("9223372036854775807"), Answer::Int(i64::MAX));
        assert_eq!(Answer::parse("-9223372036854775808"), Answer::Int(i64::MIN));
        assert_eq!(
            Answer::parse("12345678901234567890"),
            Answer::Str("12345678901234567890".into())
        );
    }

    #[test]
    fn test_int_and_str_answers_differ() {
        assert_ne!(Answer::Int(12), Answer::Str("12".into()));
    }

    #[test]
    fn test_store_from_toml() {
        let content = r#"
            [2022.5]
            1 = "CMZ"
            2 = 12

            [2022.1]
            1 = 24000
        "#;
        let store = AnswerStore::from_toml(content, Path::new("answers.toml")).unwrap();
        assert_eq!(store.len(), 3);
        assert_eq!(
            store.get(&PuzzlePartId::new(2022, 5, Part::One)),
            Some(&Answer::Str("CMZ".into()))
        );
        assert_eq!(
            store.get(&PuzzlePartId::new(2022, 1, Part::One)),
            Some(&Answer::Int(24000))
        );
        assert_eq!(store.get(&PuzzlePartId::new(2022, 1, Part::Two)), None);

        let ids: Vec<_> = store.part_ids().collect();
        assert_eq!(ids[0], PuzzlePartId::new(2022, 1, Part::One));

        let day_five: Vec<_> = store.part_ids_for_day(2022, 5).collect();
        assert_eq!(
            day_five,
            vec![
                PuzzlePartId::new(2022, 5, Part::One),
                PuzzlePartId::new(2022, 5, Part::Two)
            ]
        );
    }

    #[test]
    fn test_store_rejects_non_scalar_answers() {
        let err = AnswerStore::from_toml("[2022.1]\n1 = 1.5\n", Path::new("answers.toml"))
            .unwrap_err();
        assert!(matches!(err, ConfigurationError::Descriptor { .. }));
    }

    proptest! {
        #[test]
        fn prop_integers_parse_as_int(value in any::<i64>()) {
            prop_assert_eq!(Answer::parse(&value.to_string()), Answer::Int(value));
        }

        #[test]
        fn prop_alphabetic_tokens_stay_strings(token in "[A-Za-z][A-Za-z0-9]{0,12}") {
            prop_assert_eq!(Answer::parse(&token), Answer::Str(token.clone()));
        }
    }
}
