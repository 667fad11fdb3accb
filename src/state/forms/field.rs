//! Form field value objects

use serde::{Deserialize, Serialize};

/// Every field the registration wizard collects.
///
/// The set is fixed; there is no way to address a field that is not listed here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FieldName {
    Name,
    LastName,
    Username,
    Email,
    Phone,
    EmploymentType,
    Directorate,
    Position,
    DeputyMinistry,
    DeviceLimit,
    Devices,
    MacAddress,
    Status,
    ViolationCount,
    Comment,
}

impl FieldName {
    pub const ALL: [FieldName; 15] = [
        FieldName::Name,
        FieldName::LastName,
        FieldName::Username,
        FieldName::Email,
        FieldName::Phone,
        FieldName::EmploymentType,
        FieldName::Directorate,
        FieldName::Position,
        FieldName::DeputyMinistry,
        FieldName::DeviceLimit,
        FieldName::Devices,
        FieldName::MacAddress,
        FieldName::Status,
        FieldName::ViolationCount,
        FieldName::Comment,
    ];

    /// Wire key used by the IUMS API for this field
    pub fn key(&self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::LastName => "last_name",
            Self::Username => "username",
            Self::Email => "email",
            Self::Phone => "phone",
            Self::EmploymentType => "employment_type",
            Self::Directorate => "directorate",
            Self::Position => "position",
            Self::DeputyMinistry => "deputy_ministry",
            Self::DeviceLimit => "device_limit",
            Self::Devices => "device_types",
            Self::MacAddress => "mac_address",
            Self::Status => "status",
            Self::ViolationCount => "violation_count",
            Self::Comment => "comment",
        }
    }

    /// Map an API key back to a field, if it names one
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.key() == key)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Name => "Name",
            Self::LastName => "Last Name",
            Self::Username => "Username",
            Self::Email => "Email",
            Self::Phone => "Phone",
            Self::EmploymentType => "Employment Type",
            Self::Directorate => "Directorate",
            Self::Position => "Position",
            Self::DeputyMinistry => "Deputy Ministry",
            Self::DeviceLimit => "Device Limit",
            Self::Devices => "Devices",
            Self::MacAddress => "MAC Address",
            Self::Status => "Status",
            Self::ViolationCount => "Violations",
            Self::Comment => "Comment",
        }
    }

    /// Whether the field is checked for uniqueness against the API
    pub fn is_watched(&self) -> bool {
        matches!(self, Self::Username | Self::Email | Self::Phone)
    }

    /// Derived fields are computed, never typed in
    pub fn is_derived(&self) -> bool {
        matches!(self, Self::DeputyMinistry)
    }
}

/// Raw value handed to the controller for a field change
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldInput {
    Text(String),
    Devices(Vec<SelectedDevice>),
}

impl From<&str> for FieldInput {
    fn from(value: &str) -> Self {
        FieldInput::Text(value.to_string())
    }
}

impl From<String> for FieldInput {
    fn from(value: String) -> Self {
        FieldInput::Text(value)
    }
}

impl From<Vec<SelectedDevice>> for FieldInput {
    fn from(value: Vec<SelectedDevice>) -> Self {
        FieldInput::Devices(value)
    }
}

/// One device row on the devices step. Zero means "not selected yet".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedDevice {
    pub device_type_id: u32,
    pub group_id: u32,
}

impl SelectedDevice {
    pub fn is_complete(&self) -> bool {
        self.device_type_id > 0 && self.group_id > 0
    }
}

/// Account status offered on the last step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountStatus {
    #[default]
    Active,
    Deactive,
}

impl AccountStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Deactive => "deactive",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "active" => Some(Self::Active),
            "deactive" => Some(Self::Deactive),
            _ => None,
        }
    }

    pub fn toggle(&self) -> Self {
        match self {
            Self::Active => Self::Deactive,
            Self::Deactive => Self::Active,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_round_trip_through_from_key() {
        for field in FieldName::ALL {
            assert_eq!(FieldName::from_key(field.key()), Some(field));
        }
    }

    #[test]
    fn test_unknown_key_is_none() {
        assert!(FieldName::from_key("favourite_colour").is_none());
    }

    #[test]
    fn test_only_identity_contacts_are_watched() {
        let watched: Vec<_> = FieldName::ALL.into_iter().filter(|f| f.is_watched()).collect();
        assert_eq!(
            watched,
            vec![FieldName::Username, FieldName::Email, FieldName::Phone]
        );
    }

    #[test]
    fn test_selected_device_completeness() {
        assert!(!SelectedDevice::default().is_complete());
        assert!(!SelectedDevice {
            device_type_id: 2,
            group_id: 0
        }
        .is_complete());
        assert!(SelectedDevice {
            device_type_id: 2,
            group_id: 5
        }
        .is_complete());
    }

    #[test]
    fn test_status_parse_and_toggle() {
        assert_eq!(AccountStatus::parse("active"), Some(AccountStatus::Active));
        assert_eq!(AccountStatus::parse(" deactive "), Some(AccountStatus::Deactive));
        assert_eq!(AccountStatus::parse("banned"), None);
        assert_eq!(AccountStatus::Active.toggle(), AccountStatus::Deactive);
    }
}
