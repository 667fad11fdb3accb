//! Focusable inputs of a wizard step

use super::field::FieldName;
use super::steps::STEPS;

/// One focusable input on screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepInput {
    /// Free text, edited character by character
    Text(FieldName),
    /// Value picked from a list with left/right
    Select(FieldName),
    /// Device type of the n-th device row
    DeviceType(usize),
    /// Group of the n-th device row
    DeviceGroup(usize),
}

impl StepInput {
    pub fn field(&self) -> FieldName {
        match self {
            Self::Text(field) | Self::Select(field) => *field,
            Self::DeviceType(_) | Self::DeviceGroup(_) => FieldName::Devices,
        }
    }

    /// Device row this input belongs to, if any
    pub fn device_row(&self) -> Option<usize> {
        match self {
            Self::DeviceType(row) | Self::DeviceGroup(row) => Some(*row),
            _ => None,
        }
    }

    /// Only digits are accepted
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            Self::Text(FieldName::DeviceLimit | FieldName::ViolationCount)
        )
    }
}

/// Focus order for `step`. Derived fields are shown but never focused; the
/// device list expands into a type and group input per row.
pub fn step_inputs(step: usize, device_rows: usize) -> Vec<StepInput> {
    let Some(def) = STEPS.get(step) else {
        return Vec::new();
    };

    let mut inputs = Vec::new();
    for &field in def.fields {
        match field {
            f if f.is_derived() => {}
            FieldName::Devices => {
                for row in 0..device_rows {
                    inputs.push(StepInput::DeviceType(row));
                    inputs.push(StepInput::DeviceGroup(row));
                }
            }
            FieldName::EmploymentType | FieldName::Directorate | FieldName::Status => {
                inputs.push(StepInput::Select(field))
            }
            _ => inputs.push(StepInput::Text(field)),
        }
    }
    inputs
}

/// Next id in `ids` after `current`, wrapping. An unknown or unset current
/// value starts from the first (or last, going backwards) entry.
pub fn cycle_id(ids: &[u32], current: u32, forward: bool) -> Option<u32> {
    if ids.is_empty() {
        return None;
    }
    let len = ids.len();
    let next = match ids.iter().position(|&id| id == current) {
        Some(idx) if forward => (idx + 1) % len,
        Some(idx) => (idx + len - 1) % len,
        None if forward => 0,
        None => len - 1,
    };
    Some(ids[next])
}

#[cfg(test)]
mod tests {
    use super::*;

    mod step_inputs {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_personal_step_is_all_text() {
            assert_eq!(
                step_inputs(0, 0),
                vec![
                    StepInput::Text(FieldName::Name),
                    StepInput::Text(FieldName::LastName),
                    StepInput::Text(FieldName::Username),
                    StepInput::Text(FieldName::Email),
                    StepInput::Text(FieldName::Phone),
                ]
            );
        }

        #[test]
        fn test_organization_step_skips_derived_field() {
            let inputs = step_inputs(1, 0);
            assert!(inputs.contains(&StepInput::Select(FieldName::Directorate)));
            assert!(!inputs.iter().any(|i| i.field() == FieldName::DeputyMinistry));
        }

        #[test]
        fn test_device_rows_expand() {
            assert_eq!(
                step_inputs(2, 2),
                vec![
                    StepInput::Text(FieldName::DeviceLimit),
                    StepInput::DeviceType(0),
                    StepInput::DeviceGroup(0),
                    StepInput::DeviceType(1),
                    StepInput::DeviceGroup(1),
                    StepInput::Text(FieldName::MacAddress),
                ]
            );
        }

        #[test]
        fn test_past_last_step_is_empty() {
            assert!(step_inputs(9, 3).is_empty());
        }

        #[test]
        fn test_numeric_inputs() {
            assert!(StepInput::Text(FieldName::DeviceLimit).is_numeric());
            assert!(StepInput::Text(FieldName::ViolationCount).is_numeric());
            assert!(!StepInput::Text(FieldName::Phone).is_numeric());
            assert_eq!(StepInput::DeviceGroup(3).device_row(), Some(3));
        }
    }

    mod cycle_id {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_wraps_both_ways() {
            let ids = [4, 7, 9];
            assert_eq!(cycle_id(&ids, 9, true), Some(4));
            assert_eq!(cycle_id(&ids, 4, false), Some(9));
            assert_eq!(cycle_id(&ids, 7, true), Some(9));
        }

        #[test]
        fn test_unset_starts_at_an_end() {
            let ids = [4, 7, 9];
            assert_eq!(cycle_id(&ids, 0, true), Some(4));
            assert_eq!(cycle_id(&ids, 0, false), Some(9));
        }

        #[test]
        fn test_empty_list() {
            assert_eq!(cycle_id(&[], 0, true), None);
        }
    }
}
