//! Application state definitions

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Current view in the application
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum View {
    /// The registration wizard
    #[default]
    Wizard,
    /// Confirmation shown after a user has been registered
    Registered,
}

/// A directorate as listed by the API, with the id of its deputy ministry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Directorate {
    pub id: u32,
    pub name: String,
    #[serde(default, alias = "deputy_ministry")]
    pub deputy_ministry_id: Option<u32>,
}

/// Generic `{id, name}` option: employment types, device types, groups
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionItem {
    pub id: u32,
    pub name: String,
}

/// Option lists that populate the organization and device selectors
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadedOptions {
    pub directorates: Vec<Directorate>,
    pub employment_types: Vec<OptionItem>,
    pub device_types: Vec<OptionItem>,
    pub groups: Vec<OptionItem>,
}

/// The record returned by the API after a successful registration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedUser {
    pub id: u64,
    pub username: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Shell state that is not part of the wizard itself
#[derive(Debug, Default)]
pub struct AppState {
    pub current_view: View,

    /// Blocking error messages, oldest first
    pub errors: VecDeque<String>,

    /// The last registered user, shown on the confirmation view
    pub registered: Option<CreatedUser>,

    // Focus within the current step
    pub active_input: usize,
}

impl AppState {
    pub fn push_error(&mut self, message: String) {
        self.errors.push_back(message);
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn current_error(&self) -> Option<&str> {
        self.errors.front().map(String::as_str)
    }

    pub fn dismiss_error(&mut self) {
        self.errors.pop_front();
    }

    /// Move focus to the next input, wrapping around
    pub fn next_input(&mut self, input_count: usize) {
        if input_count == 0 {
            self.active_input = 0;
            return;
        }
        self.active_input = (self.active_input + 1) % input_count;
    }

    /// Move focus to the previous input, wrapping around
    pub fn prev_input(&mut self, input_count: usize) {
        if input_count == 0 {
            self.active_input = 0;
            return;
        }
        self.active_input = if self.active_input == 0 {
            input_count - 1
        } else {
            (self.active_input - 1).min(input_count - 1)
        };
    }

    /// Keep focus inside the current input list after it shrinks
    pub fn clamp_input(&mut self, input_count: usize) {
        self.active_input = self.active_input.min(input_count.saturating_sub(1));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod errors {
        use super::*;

        #[test]
        fn test_errors_are_fifo() {
            let mut state = AppState::default();
            assert!(!state.has_errors());

            state.push_error("first".into());
            state.push_error("second".into());
            assert_eq!(state.current_error(), Some("first"));

            state.dismiss_error();
            assert_eq!(state.current_error(), Some("second"));

            state.dismiss_error();
            assert!(!state.has_errors());
            state.dismiss_error();
        }
    }

    mod focus {
        use super::*;

        #[test]
        fn test_next_wraps() {
            let mut state = AppState::default();
            for expected in [1, 2, 0] {
                state.next_input(3);
                assert_eq!(state.active_input, expected);
            }
        }

        #[test]
        fn test_prev_wraps() {
            let mut state = AppState::default();
            state.prev_input(3);
            assert_eq!(state.active_input, 2);
            state.prev_input(3);
            assert_eq!(state.active_input, 1);
        }

        #[test]
        fn test_zero_inputs_resets() {
            let mut state = AppState {
                active_input: 4,
                ..Default::default()
            };
            state.next_input(0);
            assert_eq!(state.active_input, 0);
        }

        #[test]
        fn test_clamp_after_shrink() {
            let mut state = AppState {
                active_input: 6,
                ..Default::default()
            };
            state.clamp_input(4);
            assert_eq!(state.active_input, 3);
        }
    }

    mod records {
        use super::*;

        #[test]
        fn test_directorate_accepts_either_parent_key() {
            let a: Directorate =
                serde_json::from_str(r#"{"id": 1, "name": "IT", "deputy_ministry": 3}"#).unwrap();
            let b: Directorate =
                serde_json::from_str(r#"{"id": 1, "name": "IT", "deputy_ministry_id": 3}"#)
                    .unwrap();
            assert_eq!(a, b);
            assert_eq!(a.deputy_ministry_id, Some(3));
        }

        #[test]
        fn test_directorate_without_parent() {
            let d: Directorate = serde_json::from_str(r#"{"id": 2, "name": "HR"}"#).unwrap();
            assert_eq!(d.deputy_ministry_id, None);
        }

        #[test]
        fn test_created_user_ignores_extra_fields() {
            let user: CreatedUser = serde_json::from_str(
                r#"{"id": 77, "username": "ahmadi", "status": "active", "created_at": "2026-10-19T08:00:00Z"}"#,
            )
            .unwrap();
            assert_eq!(user.id, 77);
            assert_eq!(user.name, "");
            assert!(user.created_at.is_some());
        }
    }
}
