//! Conversion of the collected form into the create-user request body

use super::field::FieldName;
use super::form_state::FormState;
use crate::api::CreateUserPayload;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PayloadError {
    #[error("{} must be a whole number, got '{value}'", .field.label())]
    InvalidNumber { field: FieldName, value: String },
}

/// Build the API payload: strings trimmed, ids and counts parsed, device
/// type and group ids pulled out of the device rows.
///
/// `phone_prefix` marks a phone field that was touched but never filled in;
/// such a phone is sent as absent.
pub fn build_payload(form: &FormState, phone_prefix: &str) -> Result<CreateUserPayload, PayloadError> {
    let phone = form.phone.trim();
    let phone = if phone == phone_prefix { "" } else { phone };

    Ok(CreateUserPayload {
        name: form.name.trim().to_string(),
        last_name: form.last_name.trim().to_string(),
        username: form.username.trim().to_string(),
        email: non_empty(&form.email),
        phone: non_empty(phone),
        employment_type: parse_id(FieldName::EmploymentType, &form.employment_type)?,
        directorate: parse_id(FieldName::Directorate, &form.directorate)?,
        position: form.position.trim().to_string(),
        deputy_ministry: form.deputy_ministry.trim().to_string(),
        device_limit: parse_id(FieldName::DeviceLimit, &form.device_limit)?,
        device_types: form.devices.iter().map(|d| d.device_type_id).collect(),
        groups: form.devices.iter().map(|d| d.group_id).collect(),
        mac_address: non_empty(&form.mac_address),
        status: form.status,
        violation_count: if form.violation_count.trim().is_empty() {
            0
        } else {
            parse_id(FieldName::ViolationCount, &form.violation_count)?
        },
        comment: non_empty(&form.comment),
    })
}

fn non_empty(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

fn parse_id(field: FieldName, value: &str) -> Result<u32, PayloadError> {
    value
        .trim()
        .parse()
        .map_err(|_| PayloadError::InvalidNumber {
            field,
            value: value.to_string(),
        })
}
