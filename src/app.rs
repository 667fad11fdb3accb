//! Application state and core logic

use crate::api::{ApiClient, IumsApi};
use crate::config::IumsConfig;
use crate::session::Session;
use crate::state::forms::{
    cycle_id, step_inputs, DeputyMinistryTable, FieldInput, FieldName, SelectedDevice, StepInput,
};
use crate::state::{AppState, View};
use crate::wizard::{WizardController, WizardError, WizardSettings};
use anyhow::Result;
use chrono::Utc;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::sync::Arc;

/// Main application struct
pub struct App {
    /// Shell state: current view, error queue, focus
    pub state: AppState,
    /// The registration wizard
    pub wizard: WizardController,
    /// Signed-in administrator
    pub session: Session,
    /// Whether the app should quit
    quit: bool,
}

impl App {
    /// Load configuration and session, connect to the API and fetch the
    /// option lists
    pub async fn new() -> Result<Self> {
        let config = IumsConfig::load()?;
        let session = Session::load()?;
        session.authorize_registration(Utc::now())?;

        let client = ApiClient::new(&config, &session)?;
        let deputy_ministries = config.deputy_ministry_table();
        tracing::info!(
            api = client.base_url(),
            user = %session.username,
            role = session.role.label(),
            deputy_ministries = deputy_ministries.len(),
            "starting registration wizard"
        );
        if deputy_ministries.is_empty() {
            tracing::warn!("no deputy ministries configured, the derived field will stay blank");
        }

        let mut app = Self::with_api(
            Arc::new(client),
            session,
            WizardSettings::from(&config),
            deputy_ministries,
        );
        for failure in app.wizard.load_options().await {
            app.push_error(failure);
        }
        Ok(app)
    }

    pub fn with_api(
        api: Arc<dyn IumsApi>,
        session: Session,
        settings: WizardSettings,
        deputy_ministries: DeputyMinistryTable,
    ) -> Self {
        Self {
            state: AppState::default(),
            wizard: WizardController::new(api, settings, deputy_ministries),
            session,
            quit: false,
        }
    }

    /// Check if app should quit
    pub fn should_quit(&self) -> bool {
        self.quit
    }

    /// Push an error message to the error queue for display
    pub fn push_error(&mut self, message: impl Into<String>) {
        self.state.push_error(message.into());
    }

    /// Inputs of the current step, in focus order
    pub fn inputs(&self) -> Vec<StepInput> {
        step_inputs(self.wizard.step(), self.wizard.form().devices.len())
    }

    /// The focused input, if the step has any
    pub fn active_input(&self) -> Option<StepInput> {
        self.inputs().get(self.state.active_input).copied()
    }

    /// Apply validation results that arrived since the last frame
    pub fn tick(&mut self) {
        self.wizard.poll_validations();
    }

    /// Handle a key event
    pub async fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        // Handle error dialog dismissal first (modal)
        if self.state.has_errors() {
            if matches!(key.code, KeyCode::Enter | KeyCode::Esc) {
                self.state.dismiss_error();
            }
            return Ok(());
        }

        match self.state.current_view {
            View::Wizard => self.handle_wizard_key(key).await?,
            View::Registered => self.handle_registered_key(key),
        }

        Ok(())
    }

    async fn handle_wizard_key(&mut self, key: KeyEvent) -> Result<()> {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let count = self.inputs().len();

        match key.code {
            KeyCode::Tab => self.state.next_input(count),
            KeyCode::BackTab => self.state.prev_input(count),
            KeyCode::Char('n') if ctrl => self.advance(),
            KeyCode::PageDown => self.advance(),
            KeyCode::Char('p') if ctrl => self.retreat(),
            KeyCode::PageUp => self.retreat(),
            KeyCode::Char('s') if ctrl => self.submit().await,
            KeyCode::Char('a') if ctrl => self.add_device_row(),
            KeyCode::Char('x') if ctrl => self.remove_device_row(),
            KeyCode::Left => self.cycle_active(false),
            KeyCode::Right => self.cycle_active(true),
            KeyCode::Backspace => self.backspace(),
            KeyCode::Char(c) if !ctrl => self.type_char(c),
            _ => {}
        }
        Ok(())
    }

    fn handle_registered_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter => {
                self.state.registered = None;
                self.state.current_view = View::Wizard;
                self.state.active_input = 0;
            }
            KeyCode::Char('q') => self.quit = true,
            _ => {}
        }
    }

    fn advance(&mut self) {
        match self.wizard.advance() {
            Ok(_) => self.state.active_input = 0,
            Err(err) => self.push_error(err.to_string()),
        }
    }

    fn retreat(&mut self) {
        let before = self.wizard.step();
        if self.wizard.retreat() != before {
            self.state.active_input = 0;
        }
    }

    async fn submit(&mut self) {
        match self.wizard.submit().await {
            Ok(user) => {
                self.state.registered = Some(user);
                self.state.current_view = View::Registered;
                self.state.active_input = 0;
            }
            Err(err) => {
                if matches!(err, WizardError::StepIncomplete { .. }) {
                    self.state.active_input = 0;
                }
                self.push_error(err.to_string());
            }
        }
    }

    fn update(&mut self, field: FieldName, input: FieldInput) {
        if let Err(err) = self.wizard.update_field(field, input) {
            self.push_error(err.to_string());
        }
    }

    fn type_char(&mut self, c: char) {
        let Some(StepInput::Text(field)) = self.active_input() else {
            return;
        };
        if StepInput::Text(field).is_numeric() && !c.is_ascii_digit() {
            return;
        }
        let mut value = self.text_of(field);
        value.push(c);
        self.update(field, value.into());
    }

    fn backspace(&mut self) {
        let Some(StepInput::Text(field)) = self.active_input() else {
            return;
        };
        let mut value = self.text_of(field);
        // The country prefix cannot be deleted
        if field == FieldName::Phone && value.len() <= self.wizard.settings().phone_prefix.len() {
            return;
        }
        if value.pop().is_none() {
            return;
        }
        // Also drop the separator left dangling by a MAC edit
        if field == FieldName::MacAddress && value.ends_with(':') {
            value.pop();
        }
        self.update(field, value.into());
    }

    fn text_of(&self, field: FieldName) -> String {
        self.wizard
            .form()
            .text(field)
            .unwrap_or_default()
            .to_string()
    }

    fn cycle_active(&mut self, forward: bool) {
        let Some(input) = self.active_input() else {
            return;
        };
        let options = self.wizard.options();
        let form = self.wizard.form();

        match input {
            StepInput::Select(FieldName::Status) => {
                let status = form.status.toggle();
                self.update(FieldName::Status, status.as_str().into());
            }
            StepInput::Select(field @ FieldName::EmploymentType) => {
                let ids: Vec<u32> = options.employment_types.iter().map(|o| o.id).collect();
                let current = form.employment_type.parse().unwrap_or(0);
                if let Some(id) = cycle_id(&ids, current, forward) {
                    self.update(field, id.to_string().into());
                }
            }
            StepInput::Select(field @ FieldName::Directorate) => {
                let ids: Vec<u32> = options.directorates.iter().map(|d| d.id).collect();
                let current = form.directorate.parse().unwrap_or(0);
                if let Some(id) = cycle_id(&ids, current, forward) {
                    self.update(field, id.to_string().into());
                }
            }
            StepInput::DeviceType(row) => {
                let ids: Vec<u32> = options.device_types.iter().map(|o| o.id).collect();
                let mut devices = form.devices.clone();
                if let Some(device) = devices.get_mut(row) {
                    if let Some(id) = cycle_id(&ids, device.device_type_id, forward) {
                        device.device_type_id = id;
                        self.update(FieldName::Devices, devices.into());
                    }
                }
            }
            StepInput::DeviceGroup(row) => {
                let ids: Vec<u32> = options.groups.iter().map(|o| o.id).collect();
                let mut devices = form.devices.clone();
                if let Some(device) = devices.get_mut(row) {
                    if let Some(id) = cycle_id(&ids, device.group_id, forward) {
                        device.group_id = id;
                        self.update(FieldName::Devices, devices.into());
                    }
                }
            }
            StepInput::Select(_) | StepInput::Text(_) => {}
        }
    }

    fn on_devices_step(&self) -> bool {
        step_inputs(self.wizard.step(), 1)
            .iter()
            .any(|input| input.device_row().is_some())
    }

    fn add_device_row(&mut self) {
        if !self.on_devices_step() {
            return;
        }
        let mut devices = self.wizard.form().devices.clone();
        devices.push(SelectedDevice::default());
        let row = devices.len() - 1;
        self.update(FieldName::Devices, devices.into());

        // Focus the new row's type selector
        if let Some(idx) = self
            .inputs()
            .iter()
            .position(|input| *input == StepInput::DeviceType(row))
        {
            self.state.active_input = idx;
        }
    }

    fn remove_device_row(&mut self) {
        if !self.on_devices_step() {
            return;
        }
        let mut devices = self.wizard.form().devices.clone();
        if devices.is_empty() {
            return;
        }
        let row = self
            .active_input()
            .and_then(|input| input.device_row())
            .unwrap_or(devices.len() - 1);
        devices.remove(row);
        self.update(FieldName::Devices, devices.into());
        self.state.clamp_input(self.inputs().len());
    }
}
