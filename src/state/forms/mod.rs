//! Form domain layer
//!
//! Typed registration form state, field normalization, the derived deputy
//! ministry and the wizard step table.

mod derived;
mod field;
mod form_state;
mod inputs;
mod normalize;
mod payload;
mod steps;

pub use derived::{resolve_deputy_ministry, DeputyMinistryTable};
pub use field::{AccountStatus, FieldInput, FieldName, SelectedDevice};
pub use form_state::{FormError, FormState, ValidationErrorMap};
pub use inputs::{cycle_id, step_inputs, StepInput};
pub use normalize::{normalize_mac, normalize_phone};
pub use payload::{build_payload, PayloadError};
pub use steps::{can_advance, step_title, LAST_STEP, STEPS, STEP_COUNT};
