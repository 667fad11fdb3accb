//! Wizard step definitions

use super::field::FieldName;
use super::form_state::FormState;

/// A single wizard step: what it shows and what it requires before moving on
#[derive(Debug, Clone, Copy)]
pub struct StepDefinition {
    pub title: &'static str,
    pub fields: &'static [FieldName],
    pub is_complete: fn(&FormState) -> bool,
}

/// The registration steps, in order. Fixed at compile time.
pub const STEPS: [StepDefinition; 4] = [
    StepDefinition {
        title: "Personal Information",
        fields: &[
            FieldName::Name,
            FieldName::LastName,
            FieldName::Username,
            FieldName::Email,
            FieldName::Phone,
        ],
        is_complete: personal_complete,
    },
    StepDefinition {
        title: "Organization",
        fields: &[
            FieldName::EmploymentType,
            FieldName::Directorate,
            FieldName::DeputyMinistry,
            FieldName::Position,
        ],
        is_complete: organization_complete,
    },
    StepDefinition {
        title: "Devices",
        fields: &[
            FieldName::DeviceLimit,
            FieldName::Devices,
            FieldName::MacAddress,
        ],
        is_complete: devices_complete,
    },
    StepDefinition {
        title: "Status & Review",
        fields: &[
            FieldName::Status,
            FieldName::ViolationCount,
            FieldName::Comment,
        ],
        is_complete: no_requirement,
    },
];

pub const STEP_COUNT: usize = STEPS.len();

pub const LAST_STEP: usize = STEP_COUNT - 1;

/// Whether the wizard may move past `step`. Steps past the end have no requirement.
pub fn can_advance(step: usize, form: &FormState) -> bool {
    STEPS
        .get(step)
        .map_or(true, |def| (def.is_complete)(form))
}

/// Title of a step, or an empty string past the end
pub fn step_title(step: usize) -> &'static str {
    STEPS.get(step).map(|def| def.title).unwrap_or_default()
}

fn no_requirement(_: &FormState) -> bool {
    true
}

fn filled(value: &str) -> bool {
    !value.trim().is_empty()
}

fn personal_complete(form: &FormState) -> bool {
    filled(&form.name) && filled(&form.username)
}

fn organization_complete(form: &FormState) -> bool {
    filled(&form.employment_type)
        && filled(&form.directorate)
        && filled(&form.position)
        && filled(&form.deputy_ministry)
}

fn devices_complete(form: &FormState) -> bool {
    let limit_ok = form
        .device_limit
        .trim()
        .parse::<u32>()
        .is_ok_and(|limit| limit > 0);

    limit_ok && !form.devices.is_empty() && form.devices.iter().all(|d| d.is_complete())
}
