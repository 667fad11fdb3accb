//! The registration wizard: owns the form, the step index and the validator

use super::validator::{FieldValidator, ValidationOutcome};
use crate::api::{ApiError, IumsApi, UniqueField};
use crate::config::{IumsConfig, ValidationFailureMode};
use crate::state::forms::{
    build_payload, can_advance, normalize_mac, normalize_phone, resolve_deputy_ministry,
    step_title, DeputyMinistryTable, FieldInput, FieldName, FormError, FormState, PayloadError,
    ValidationErrorMap, LAST_STEP, STEP_COUNT,
};
use crate::state::{CreatedUser, LoadedOptions};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Shown when a create request fails without a server message
pub const GENERIC_SUBMIT_FAILURE: &str = "Failed to register user. Please try again.";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WizardError {
    #[error("Please fill in all required fields in \"{title}\" before continuing")]
    StepIncomplete { step: usize, title: &'static str },
    #[error(transparent)]
    Form(#[from] FormError),
    #[error(transparent)]
    Payload(#[from] PayloadError),
    #[error("{0}")]
    SubmitFailed(String),
}

/// Tunables the wizard takes from configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WizardSettings {
    pub phone_prefix: String,
    pub phone_max_length: usize,
    pub debounce: Duration,
    pub failure_mode: ValidationFailureMode,
}

impl From<&IumsConfig> for WizardSettings {
    fn from(config: &IumsConfig) -> Self {
        Self {
            phone_prefix: config.phone_prefix(),
            phone_max_length: config.phone_max_length(),
            debounce: config.debounce(),
            failure_mode: config.validation_failure_mode(),
        }
    }
}

pub struct WizardController {
    api: Arc<dyn IumsApi>,
    settings: WizardSettings,
    deputy_ministries: DeputyMinistryTable,
    form: FormState,
    errors: ValidationErrorMap,
    /// Watched fields whose current value the server confirmed is free
    verified: HashSet<FieldName>,
    step: usize,
    options: LoadedOptions,
    validator: FieldValidator,
}

impl WizardController {
    pub fn new(
        api: Arc<dyn IumsApi>,
        settings: WizardSettings,
        deputy_ministries: DeputyMinistryTable,
    ) -> Self {
        let validator =
            FieldValidator::new(Arc::clone(&api), settings.debounce, settings.failure_mode);
        Self {
            api,
            settings,
            deputy_ministries,
            form: FormState::new(),
            errors: ValidationErrorMap::default(),
            verified: HashSet::new(),
            step: 0,
            options: LoadedOptions::default(),
            validator,
        }
    }

    pub fn form(&self) -> &FormState {
        &self.form
    }

    pub fn errors(&self) -> &ValidationErrorMap {
        &self.errors
    }

    pub fn step(&self) -> usize {
        self.step
    }

    pub fn step_title(&self) -> &'static str {
        step_title(self.step)
    }

    pub fn is_last_step(&self) -> bool {
        self.step == LAST_STEP
    }

    pub fn options(&self) -> &LoadedOptions {
        &self.options
    }

    pub fn settings(&self) -> &WizardSettings {
        &self.settings
    }

    /// Whether the server confirmed the field's current value is free
    pub fn is_verified(&self, field: FieldName) -> bool {
        field.is_watched() && self.verified.contains(&field)
    }

    /// Uniqueness checks scheduled or in flight
    pub fn pending_checks(&self) -> usize {
        self.validator.pending_count()
    }

    /// Replace the option lists and re-derive fields that depend on them
    pub fn set_options(&mut self, options: LoadedOptions) {
        self.options = options;
        self.refresh_derived();
    }

    /// Fetch every option list. Lists that fail stay empty; the returned
    /// messages name them.
    pub async fn load_options(&mut self) -> Vec<String> {
        let (directorates, employment_types, device_types, groups) = tokio::join!(
            self.api.list_directorates(),
            self.api.list_employment_types(),
            self.api.list_device_types(),
            self.api.list_groups(),
        );

        let mut failures = Vec::new();
        let mut options = LoadedOptions::default();
        match directorates {
            Ok(list) => options.directorates = list,
            Err(e) => failures.push(load_failure("directorates", &e)),
        }
        match employment_types {
            Ok(list) => options.employment_types = list,
            Err(e) => failures.push(load_failure("employment types", &e)),
        }
        match device_types {
            Ok(list) => options.device_types = list,
            Err(e) => failures.push(load_failure("device types", &e)),
        }
        match groups {
            Ok(list) => options.groups = list,
            Err(e) => failures.push(load_failure("groups", &e)),
        }

        tracing::info!(
            directorates = options.directorates.len(),
            employment_types = options.employment_types.len(),
            device_types = options.device_types.len(),
            groups = options.groups.len(),
            "loaded wizard options"
        );
        self.set_options(options);
        failures
    }

    /// Apply a field change.
    ///
    /// Phone and MAC values are normalized before they are stored. The field's
    /// error is cleared straight away; a uniqueness check is scheduled for
    /// watched fields and will set it again if the value is taken.
    pub fn update_field(&mut self, field: FieldName, input: FieldInput) -> Result<(), WizardError> {
        let input = match (field, input) {
            (FieldName::Phone, FieldInput::Text(raw)) => FieldInput::Text(normalize_phone(
                &raw,
                &self.settings.phone_prefix,
                self.settings.phone_max_length,
            )),
            (FieldName::MacAddress, FieldInput::Text(raw)) => FieldInput::Text(normalize_mac(&raw)),
            (_, input) => input,
        };

        self.form.set(field, input)?;
        self.errors.clear(field);
        self.verified.remove(&field);

        if field == FieldName::Directorate {
            self.refresh_derived();
        }

        if let Ok(unique) = UniqueField::try_from(field) {
            let value = self.form.text(field).unwrap_or_default().trim().to_string();
            let value = if self.is_blank(field, &value) { "" } else { value.as_str() };
            self.validator.watch(unique, value);
        }

        Ok(())
    }

    /// Whether the wizard may move past `step`
    pub fn can_advance(&self, step: usize) -> bool {
        can_advance(step, &self.form)
    }

    /// Move to the next step if the current one is complete
    pub fn advance(&mut self) -> Result<usize, WizardError> {
        if !self.can_advance(self.step) {
            return Err(self.incomplete(self.step));
        }
        let previous = self.step;
        self.step = (self.step + 1).min(LAST_STEP);
        if self.step != previous {
            tracing::info!(step = self.step, title = self.step_title(), "advanced wizard");
        }
        Ok(self.step)
    }

    /// Move to the previous step; never fails
    pub fn retreat(&mut self) -> usize {
        self.step = self.step.saturating_sub(1);
        self.step
    }

    /// Apply every validation result that is ready. Returns how many were applied.
    pub fn poll_validations(&mut self) -> usize {
        let mut applied = 0;
        while let Some(outcome) = self.validator.try_next() {
            self.apply_outcome(outcome);
            applied += 1;
        }
        applied
    }

    /// Wait for the next validation result and apply it
    #[cfg(test)]
    pub async fn next_validation(&mut self) -> Option<FieldName> {
        let outcome = self.validator.next().await?;
        let field = outcome.field;
        self.apply_outcome(outcome);
        Some(field)
    }

    /// Validate every step, then send the create request.
    ///
    /// On success the form is reset and the created record returned. On failure
    /// the form is left as it was.
    pub async fn submit(&mut self) -> Result<CreatedUser, WizardError> {
        if let Some(step) = (0..STEP_COUNT).find(|&step| !self.can_advance(step)) {
            self.step = step;
            return Err(self.incomplete(step));
        }

        let payload = build_payload(&self.form, &self.settings.phone_prefix)?;
        let username = payload.username.clone();

        match self.api.create_user(payload).await {
            Ok(user) => {
                tracing::info!(id = user.id, username = %user.username, "registered internet user");
                self.reset();
                Ok(user)
            }
            Err(err) => {
                tracing::warn!(username = %username, error = %err, "registration failed");
                self.apply_server_field_errors(&err);
                let message = err
                    .server_message()
                    .map(str::to_string)
                    .unwrap_or_else(|| GENERIC_SUBMIT_FAILURE.to_string());
                Err(WizardError::SubmitFailed(message))
            }
        }
    }

    /// Back to an empty form on the first step. Loaded options are kept.
    pub fn reset(&mut self) {
        self.validator.cancel_all();
        self.form = FormState::new();
        self.errors.clear_all();
        self.verified.clear();
        self.step = 0;
        self.refresh_derived();
    }

    fn apply_outcome(&mut self, outcome: ValidationOutcome) {
        tracing::debug!(
            field = outcome.field.key(),
            taken = outcome.error.is_some(),
            verified = outcome.verified,
            "uniqueness check settled"
        );
        if outcome.verified {
            self.verified.insert(outcome.field);
        } else {
            self.verified.remove(&outcome.field);
        }
        match outcome.error {
            Some(message) => self.errors.set(outcome.field, message),
            None => {
                self.errors.clear(outcome.field);
            }
        }
    }

    fn apply_server_field_errors(&mut self, err: &ApiError) {
        let Some(field_errors) = err.field_errors() else {
            return;
        };
        for (key, messages) in field_errors {
            if let (Some(field), Some(message)) = (FieldName::from_key(key), messages.first()) {
                self.verified.remove(&field);
                self.errors.set(field, message.clone());
            }
        }
    }

    fn refresh_derived(&mut self) {
        let deputy = resolve_deputy_ministry(
            &self.form.directorate,
            &self.options.directorates,
            &self.deputy_ministries,
        );
        self.form.set_derived(deputy);
    }

    /// A phone holding only the country prefix counts as empty
    fn is_blank(&self, field: FieldName, value: &str) -> bool {
        value.is_empty() || (field == FieldName::Phone && value == self.settings.phone_prefix)
    }

    fn incomplete(&self, step: usize) -> WizardError {
        WizardError::StepIncomplete {
            step,
            title: step_title(step),
        }
    }
}

fn load_failure(list: &str, err: &ApiError) -> String {
    tracing::warn!(list, error = %err, "failed to load options");
    format!("Failed to load {list}: {err}")
}
