//! Solver catalog: which backends solve which puzzle parts

use crate::descriptor;
use crate::error::ConfigurationError;
use crate::id::{Backend, PuzzlePartId, SolverId};
use itertools::Itertools;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

/// A catalog entry: one backend name or a list of them
#[derive(Deserialize)]
#[serde(untagged)]
enum Backends {
    One(Backend),
    Many(Vec<Backend>),
}

impl From<Backends> for Vec<Backend> {
    fn from(backends: Backends) -> Self {
        match backends {
            Backends::One(backend) => vec![backend],
            Backends::Many(backends) => backends,
        }
    }
}

/// Backend assignments per puzzle part, loaded once and read-only afterwards
#[derive(Debug, Default)]
pub struct SolverCatalog {
    backends: HashMap<PuzzlePartId, Vec<Backend>>,
}

impl SolverCatalog {
    /// Load the catalog from a `solvers.toml` descriptor
    pub fn load(path: &Path) -> Result<Self, ConfigurationError> {
        Self::from_entries(descriptor::read(path)?)
    }

    /// Parse the catalog from descriptor content
    pub fn from_toml(content: &str, path: &Path) -> Result<Self, ConfigurationError> {
        Self::from_entries(descriptor::parse(content, path)?)
    }

    fn from_entries(entries: Vec<(PuzzlePartId, Backends)>) -> Result<Self, ConfigurationError> {
        let mut backends = HashMap::with_capacity(entries.len());
        for (id, entry) in entries {
            let list: Vec<Backend> = Vec::from(entry).into_iter().unique().collect();
            if list.is_empty() {
                return Err(ConfigurationError::EmptyBackendList(id));
            }
            backends.insert(id, list);
        }
        Ok(Self { backends })
    }

    /// Backends configured for a puzzle part
    pub fn backends(&self, id: &PuzzlePartId) -> Option<&[Backend]> {
        self.backends.get(id).map(Vec::as_slice)
    }

    pub fn contains(&self, id: &PuzzlePartId) -> bool {
        self.backends.contains_key(id)
    }

    /// Expand puzzle parts into concrete solver ids
    ///
    /// Keeps only `backend_filter` when given. Every part must have a catalog
    /// entry; a missing one is a descriptor bug and fails the whole lookup.
    pub fn resolve_solver_ids(
        &self,
        part_ids: impl IntoIterator<Item = PuzzlePartId>,
        backend_filter: Option<Backend>,
    ) -> Result<Vec<SolverId>, ConfigurationError> {
        let mut ids = Vec::new();
        for part_id in part_ids {
            let backends = self
                .backends(&part_id)
                .ok_or(ConfigurationError::CatalogLookup(part_id))?;
            ids.extend(
                backends
                    .iter()
                    .filter(|&&backend| backend_filter.is_none_or(|b| b == backend))
                    .map(|&backend| part_id.with_backend(backend)),
            );
        }
        Ok(ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id::Part;

    const SOLVERS: &str = r#"
        [2022.1]
        1 = "cpp"
        2 = ["cpp", "python"]

        [2024.6]
        1 = ["rust"]
    "#;

    fn catalog() -> SolverCatalog {
        SolverCatalog::from_toml(SOLVERS, Path::new("solvers.toml")).unwrap()
    }

    #[test]
    fn test_single_and_list_entries() {
        let catalog = catalog();
        assert_eq!(
            catalog.backends(&PuzzlePartId::new(2022, 1, Part::One)),
            Some(&[Backend::Cpp][..])
        );
        assert_eq!(
            catalog.backends(&PuzzlePartId::new(2022, 1, Part::Two)),
            Some(&[Backend::Cpp, Backend::Python][..])
        );
    }

    #[test]
    fn test_resolve_with_and_without_filter() {
        let catalog = catalog();
        let parts = [
            PuzzlePartId::new(2022, 1, Part::Two),
            PuzzlePartId::new(2024, 6, Part::One),
        ];

        let all = catalog.resolve_solver_ids(parts, None).unwrap();
        let names: Vec<_> = all.iter().map(ToString::to_string).collect();
        assert_eq!(names, ["2022-1-2-cpp", "2022-1-2-python", "2024-6-1-rust"]);

        let python = catalog
            .resolve_solver_ids(parts, Some(Backend::Python))
            .unwrap();
        assert_eq!(python, vec![SolverId::new(2022, 1, Part::Two, Backend::Python)]);
    }

    #[test]
    fn test_resolve_unknown_part_fails() {
        let missing = PuzzlePartId::new(2015, 3, Part::One);
        let err = catalog().resolve_solver_ids([missing], None).unwrap_err();
        assert!(matches!(err, ConfigurationError::CatalogLookup(id) if id == missing));
    }

    #[test]
    fn test_rejects_unknown_backend_and_empty_list() {
        let err = SolverCatalog::from_toml("[2022.1]\n1 = \"java\"\n", Path::new("s.toml"))
            .unwrap_err();
        assert!(matches!(err, ConfigurationError::Descriptor { .. }));

        let err =
            SolverCatalog::from_toml("[2022.1]\n1 = []\n", Path::new("s.toml")).unwrap_err();
        assert!(matches!(err, ConfigurationError::EmptyBackendList(_)));
    }
}
