//! Derived fields: the deputy ministry follows from the selected directorate

use crate::state::Directorate;
use std::collections::BTreeMap;

/// Read-only `deputy ministry id → name` table.
///
/// Loaded from configuration and handed to the wizard; never mutated at runtime.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeputyMinistryTable {
    names: BTreeMap<u32, String>,
}

impl DeputyMinistryTable {
    pub fn new(names: BTreeMap<u32, String>) -> Self {
        Self { names }
    }

    pub fn name(&self, id: u32) -> Option<&str> {
        self.names.get(&id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl FromIterator<(u32, String)> for DeputyMinistryTable {
    fn from_iter<I: IntoIterator<Item = (u32, String)>>(iter: I) -> Self {
        Self {
            names: iter.into_iter().collect(),
        }
    }
}

/// Resolve the deputy ministry name for the selected directorate.
///
/// Every miss (unparseable id, directorate not loaded, no parent, parent not in
/// the table) resolves to an empty string.
pub fn resolve_deputy_ministry(
    selected_directorate: &str,
    directorates: &[Directorate],
    table: &DeputyMinistryTable,
) -> String {
    let Ok(id) = selected_directorate.trim().parse::<u32>() else {
        return String::new();
    };

    directorates
        .iter()
        .find(|d| d.id == id)
        .and_then(|d| d.deputy_ministry_id)
        .and_then(|parent| table.name(parent))
        .map(str::to_string)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> DeputyMinistryTable {
        [
            (1, "Technical and Sectoral Affairs".to_string()),
            (2, "Administration and Finance".to_string()),
        ]
        .into_iter()
        .collect()
    }

    fn directorates() -> Vec<Directorate> {
        vec![
            Directorate {
                id: 10,
                name: "Information Technology".to_string(),
                deputy_ministry_id: Some(1),
            },
            Directorate {
                id: 11,
                name: "Human Resources".to_string(),
                deputy_ministry_id: Some(2),
            },
            Directorate {
                id: 12,
                name: "Cabinet Office".to_string(),
                deputy_ministry_id: None,
            },
            Directorate {
                id: 13,
                name: "Procurement".to_string(),
                deputy_ministry_id: Some(99),
            },
        ]
    }

    #[test]
    fn test_resolves_parent_name() {
        assert_eq!(
            resolve_deputy_ministry("10", &directorates(), &table()),
            "Technical and Sectoral Affairs"
        );
        assert_eq!(
            resolve_deputy_ministry(" 11 ", &directorates(), &table()),
            "Administration and Finance"
        );
    }

    #[test]
    fn test_is_idempotent() {
        let first = resolve_deputy_ministry("10", &directorates(), &table());
        let second = resolve_deputy_ministry("10", &directorates(), &table());
        assert_eq!(first, second);
    }

    #[test]
    fn test_unknown_directorate_is_empty() {
        assert_eq!(resolve_deputy_ministry("404", &directorates(), &table()), "");
    }

    #[test]
    fn test_no_parent_is_empty() {
        assert_eq!(resolve_deputy_ministry("12", &directorates(), &table()), "");
    }

    #[test]
    fn test_parent_missing_from_table_is_empty() {
        assert_eq!(resolve_deputy_ministry("13", &directorates(), &table()), "");
    }

    #[test]
    fn test_empty_or_garbage_selection_is_empty() {
        assert_eq!(resolve_deputy_ministry("", &directorates(), &table()), "");
        assert_eq!(resolve_deputy_ministry("ten", &directorates(), &table()), "");
    }

    #[test]
    fn test_no_options_loaded_is_empty() {
        assert_eq!(resolve_deputy_ministry("10", &[], &table()), "");
    }
}
