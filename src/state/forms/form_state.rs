//! Registration form state and the validation error map

use super::field::{AccountStatus, FieldInput, FieldName, SelectedDevice};
use std::collections::BTreeMap;
use thiserror::Error;

/// Errors raised when a field change cannot be stored
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("{} is computed and cannot be edited", .0.label())]
    ReadOnly(FieldName),
    #[error("{} does not accept this kind of value", .0.label())]
    InputMismatch(FieldName),
    #[error("'{value}' is not a valid {}", .field.label())]
    InvalidValue { field: FieldName, value: String },
}

/// Everything the wizard collects, one member per field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormState {
    // Identity
    pub name: String,
    pub last_name: String,
    pub username: String,
    pub email: String,
    pub phone: String,
    // Organization
    pub employment_type: String,
    pub directorate: String,
    pub position: String,
    pub deputy_ministry: String,
    // Devices
    pub device_limit: String,
    pub devices: Vec<SelectedDevice>,
    pub mac_address: String,
    // Status and violations
    pub status: AccountStatus,
    pub violation_count: String,
    pub comment: String,
}

impl FormState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Text value of a field. The device list has no text form.
    pub fn text(&self, field: FieldName) -> Option<&str> {
        let value = match field {
            FieldName::Name => &self.name,
            FieldName::LastName => &self.last_name,
            FieldName::Username => &self.username,
            FieldName::Email => &self.email,
            FieldName::Phone => &self.phone,
            FieldName::EmploymentType => &self.employment_type,
            FieldName::Directorate => &self.directorate,
            FieldName::Position => &self.position,
            FieldName::DeputyMinistry => &self.deputy_ministry,
            FieldName::DeviceLimit => &self.device_limit,
            FieldName::MacAddress => &self.mac_address,
            FieldName::ViolationCount => &self.violation_count,
            FieldName::Comment => &self.comment,
            FieldName::Status => return Some(self.status.as_str()),
            FieldName::Devices => return None,
        };
        Some(value)
    }

    /// Store an already-normalized value.
    ///
    /// The derived deputy ministry is refused here; the controller writes it
    /// through [`FormState::set_derived`].
    pub fn set(&mut self, field: FieldName, input: FieldInput) -> Result<(), FormError> {
        if field.is_derived() {
            return Err(FormError::ReadOnly(field));
        }

        match (field, input) {
            (FieldName::Devices, FieldInput::Devices(devices)) => {
                self.devices = devices;
                Ok(())
            }
            (FieldName::Devices, FieldInput::Text(_)) | (_, FieldInput::Devices(_)) => {
                Err(FormError::InputMismatch(field))
            }
            (FieldName::Status, FieldInput::Text(value)) => {
                self.status = AccountStatus::parse(&value)
                    .ok_or(FormError::InvalidValue { field, value })?;
                Ok(())
            }
            (_, FieldInput::Text(value)) => {
                if let Some(slot) = self.text_slot(field) {
                    *slot = value;
                }
                Ok(())
            }
        }
    }

    /// Overwrite the computed deputy ministry
    pub(crate) fn set_derived(&mut self, deputy_ministry: String) {
        self.deputy_ministry = deputy_ministry;
    }

    fn text_slot(&mut self, field: FieldName) -> Option<&mut String> {
        match field {
            FieldName::Name => Some(&mut self.name),
            FieldName::LastName => Some(&mut self.last_name),
            FieldName::Username => Some(&mut self.username),
            FieldName::Email => Some(&mut self.email),
            FieldName::Phone => Some(&mut self.phone),
            FieldName::EmploymentType => Some(&mut self.employment_type),
            FieldName::Directorate => Some(&mut self.directorate),
            FieldName::Position => Some(&mut self.position),
            FieldName::DeviceLimit => Some(&mut self.device_limit),
            FieldName::MacAddress => Some(&mut self.mac_address),
            FieldName::ViolationCount => Some(&mut self.violation_count),
            FieldName::Comment => Some(&mut self.comment),
            FieldName::DeputyMinistry | FieldName::Status | FieldName::Devices => None,
        }
    }
}

/// Active validation errors keyed by field. An entry exists only while its
/// error is current.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrorMap {
    errors: BTreeMap<FieldName, String>,
}

impl ValidationErrorMap {
    pub fn set(&mut self, field: FieldName, message: impl Into<String>) {
        self.errors.insert(field, message.into());
    }

    pub fn clear(&mut self, field: FieldName) -> Option<String> {
        self.errors.remove(&field)
    }

    pub fn clear_all(&mut self) {
        self.errors.clear();
    }

    pub fn get(&self, field: FieldName) -> Option<&str> {
        self.errors.get(&field).map(String::as_str)
    }

    #[cfg(test)]
    pub fn contains(&self, field: FieldName) -> bool {
        self.errors.contains_key(&field)
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (FieldName, &str)> {
        self.errors.iter().map(|(f, m)| (*f, m.as_str()))
    }
}
