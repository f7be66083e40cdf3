//! Loading of the per-(year, day, part) TOML descriptor files
//!
//! Both descriptors share one layout: a table per `year.day` holding one
//! value per part.
//!
//! ```toml
//! [2022.1]
//! 1 = 69912
//! 2 = 208180
//! ```

use crate::error::ConfigurationError;
use crate::id::{Part, PuzzlePartId};
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;
use std::path::Path;
use std::str::FromStr;

type Nested<V> = BTreeMap<String, BTreeMap<String, BTreeMap<String, V>>>;

/// Read a descriptor file from disk
pub(crate) fn read<V: DeserializeOwned>(
    path: &Path,
) -> Result<Vec<(PuzzlePartId, V)>, ConfigurationError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigurationError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse(&content, path)
}

/// Parse descriptor content; `path` is only used in error messages
pub(crate) fn parse<V: DeserializeOwned>(
    content: &str,
    path: &Path,
) -> Result<Vec<(PuzzlePartId, V)>, ConfigurationError> {
    let nested: Nested<V> =
        toml::from_str(content).map_err(|source| ConfigurationError::Descriptor {
            path: path.to_path_buf(),
            source,
        })?;

    let mut entries = Vec::new();
    for (year, days) in nested {
        let year = parse_key(&year, "year", path)?;
        for (day, parts) in days {
            let day = parse_key(&day, "day", path)?;
            for (part, value) in parts {
                let part = parse_key::<u8>(&part, "part", path)
                    .and_then(|p| Part::try_from(p))?;
                entries.push((PuzzlePartId::new(year, day, part), value));
            }
        }
    }
    Ok(entries)
}

fn parse_key<T: FromStr>(
    key: &str,
    what: &'static str,
    path: &Path,
) -> Result<T, ConfigurationError> {
    key.parse().map_err(|_| ConfigurationError::InvalidKey {
        path: path.to_path_buf(),
        what,
        key: key.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_nested_tables() {
        let content = r#"
            [2022.1]
            1 = 10
            2 = 20

            [2023.25]
            1 = 30
        "#;
        let mut entries: Vec<(PuzzlePartId, i64)> =
            parse(content, Path::new("answers.toml")).unwrap();
        entries.sort();
        assert_eq!(
            entries,
            vec![
                (PuzzlePartId::new(2022, 1, Part::One), 10),
                (PuzzlePartId::new(2022, 1, Part::Two), 20),
                (PuzzlePartId::new(2023, 25, Part::One), 30),
            ]
        );
    }

    #[test]
    fn test_parse_rejects_bad_keys() {
        let err = parse::<i64>("[2022.x]\n1 = 1\n", Path::new("a.toml")).unwrap_err();
        assert!(matches!(err, ConfigurationError::InvalidKey { what: "day", .. }));

        let err = parse::<i64>("[2022.1]\n3 = 1\n", Path::new("a.toml")).unwrap_err();
        assert!(matches!(err, ConfigurationError::InvalidPart(3)));
    }

    #[test]
    fn test_read_missing_file() {
        let err = read::<i64>(Path::new("/nonexistent/answers.toml")).unwrap_err();
        assert!(matches!(err, ConfigurationError::Read { .. }));
    }
}
