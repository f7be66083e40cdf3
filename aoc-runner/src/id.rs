//! Puzzle part and solver identifiers

use crate::error::ConfigurationError;
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

/// Advent of Code event year
pub type Year = u16;

/// Puzzle day (1-25)
pub type Day = u8;

/// One of the two parts of a daily puzzle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Part {
    One,
    Two,
}

impl Part {
    /// The part number as passed to solver executables
    pub fn number(self) -> u8 {
        match self {
            Part::One => 1,
            Part::Two => 2,
        }
    }
}

impl TryFrom<u8> for Part {
    type Error = ConfigurationError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Part::One),
            2 => Ok(Part::Two),
            other => Err(ConfigurationError::InvalidPart(other)),
        }
    }
}

impl fmt::Display for Part {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.number())
    }
}

/// Toolchain able to build and run solvers
///
/// The set is closed: adding a toolchain means adding a variant here and a
/// [`BackendAdapter`](crate::BackendAdapter) in [`create_adapter`](crate::create_adapter).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    Cpp,
    Python,
    Rust,
}

impl Backend {
    /// Every backend, in the order adapters are created
    pub const ALL: [Backend; 3] = [Backend::Cpp, Backend::Python, Backend::Rust];

    /// Lowercase name used in descriptors, solver ids and directory names
    pub fn name(self) -> &'static str {
        match self {
            Backend::Cpp => "cpp",
            Backend::Python => "python",
            Backend::Rust => "rust",
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Backend {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Backend::ALL
            .into_iter()
            .find(|backend| backend.name() == s)
            .ok_or_else(|| ConfigurationError::UnknownBackend(s.to_string()))
    }
}

/// A puzzle part, independent of any implementation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PuzzlePartId {
    pub year: Year,
    pub day: Day,
    pub part: Part,
}

impl PuzzlePartId {
    pub fn new(year: Year, day: Day, part: Part) -> Self {
        Self { year, day, part }
    }

    /// Attach a backend to this part
    pub fn with_backend(self, backend: Backend) -> SolverId {
        SolverId {
            year: self.year,
            day: self.day,
            part: self.part,
            backend,
        }
    }
}

impl fmt::Display for PuzzlePartId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}-{}", self.year, self.day, self.part)
    }
}

/// One concrete runnable solution: a puzzle part solved by a specific backend
///
/// Renders as `{year}-{day}-{part}-{backend}`, e.g. `2022-1-1-python`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SolverId {
    pub year: Year,
    pub day: Day,
    pub part: Part,
    pub backend: Backend,
}

impl SolverId {
    pub fn new(year: Year, day: Day, part: Part, backend: Backend) -> Self {
        Self {
            year,
            day,
            part,
            backend,
        }
    }

    /// The puzzle part this solver answers
    pub fn part_id(&self) -> PuzzlePartId {
        PuzzlePartId::new(self.year, self.day, self.part)
    }
}

impl fmt::Display for SolverId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-{}-{}-{}",
            self.year, self.day, self.part, self.backend
        )
    }
}

impl FromStr for SolverId {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ConfigurationError::InvalidSolverId(s.to_string());
        let mut fields = s.split('-');
        let (Some(year), Some(day), Some(part), Some(backend), None) = (
            fields.next(),
            fields.next(),
            fields.next(),
            fields.next(),
            fields.next(),
        ) else {
            return Err(invalid());
        };

        let year = year.parse().map_err(|_| invalid())?;
        let day = day.parse().map_err(|_| invalid())?;
        let part = part
            .parse::<u8>()
            .map_err(|_| invalid())
            .and_then(|p| Part::try_from(p).map_err(|_| invalid()))?;
        let backend = backend.parse()?;

        Ok(SolverId::new(year, day, part, backend))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_solver_id_display() {
        let id = SolverId::new(2022, 1, Part::One, Backend::Python);
        assert_eq!(id.to_string(), "2022-1-1-python");

        let id = SolverId::new(2024, 25, Part::Two, Backend::Cpp);
        assert_eq!(id.to_string(), "2024-25-2-cpp");
    }

    #[test]
    fn test_solver_id_parse_rejects_garbage() {
        for bad in ["", "2022-1-1", "2022-1-3-rust", "2022-1-1-java", "2022-1-1-rust-x"] {
            assert!(bad.parse::<SolverId>().is_err(), "accepted {bad:?}");
        }
    }

    #[test]
    fn test_part_try_from() {
        assert_eq!(Part::try_from(1).unwrap(), Part::One);
        assert_eq!(Part::try_from(2).unwrap(), Part::Two);
        assert!(matches!(
            Part::try_from(0),
            Err(ConfigurationError::InvalidPart(0))
        ));
    }

    #[test]
    fn test_backend_names() {
        for backend in Backend::ALL {
            assert_eq!(backend.name().parse::<Backend>().unwrap(), backend);
        }
        assert!(matches!(
            "Python".parse::<Backend>(),
            Err(ConfigurationError::UnknownBackend(_))
        ));
    }

    fn any_solver_id() -> impl Strategy<Value = SolverId> {
        (
            2015u16..=2034,
            1u8..=25,
            prop_oneof![Just(Part::One), Just(Part::Two)],
            prop_oneof![
                Just(Backend::Cpp),
                Just(Backend::Python),
                Just(Backend::Rust)
            ],
        )
            .prop_map(|(year, day, part, backend)| SolverId::new(year, day, part, backend))
    }

    proptest! {
        #[test]
        fn prop_solver_id_string_round_trip(id in any_solver_id()) {
            let rendered = id.to_string();
            prop_assert_eq!(
                &rendered,
                &format!("{}-{}-{}-{}", id.year, id.day, id.part.number(), id.backend.name())
            );
            prop_assert_eq!(rendered.parse::<SolverId>().unwrap(), id);
        }

        #[test]
        fn prop_part_id_strips_backend(id in any_solver_id()) {
            prop_assert_eq!(id.part_id().with_backend(id.backend), id);
        }
    }
}
