//! UI module for rendering the TUI

mod components;
mod forms;
mod layout;
mod registered;

use crate::app::App;
use crate::state::View;
use components::render_error_dialog;
use ratatui::Frame;

/// Main draw function
pub fn draw(frame: &mut Frame, app: &App) {
    let (header_area, main_area, status_area) = layout::create_layout(frame.area());

    layout::draw_step_header(frame, header_area, app);

    match &app.state.current_view {
        View::Wizard => forms::draw_wizard(frame, main_area, app),
        View::Registered => registered::draw(frame, main_area, app),
    }

    layout::draw_status_bar(frame, status_area, app);

    // Error dialog goes on top of everything
    if let Some(error) = app.state.current_error() {
        render_error_dialog(frame, error, app.state.errors.len().saturating_sub(1));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{ApiError, CheckResponse, MockIumsApi};
    use crate::config::ValidationFailureMode;
    use crate::session::{Role, Session};
    use crate::state::forms::{DeputyMinistryTable, FieldName};
    use crate::wizard::WizardSettings;
    use ratatui::{backend::TestBackend, Terminal};
    use std::sync::Arc;
    use std::time::Duration;

    fn test_app() -> App {
        let mut api = MockIumsApi::new();
        api.expect_check_unique()
            .returning(|_, _| Ok(CheckResponse::default()));
        app_with(api)
    }

    fn app_with(api: MockIumsApi) -> App {
        App::with_api(
            Arc::new(api),
            Session {
                token: "t0ken".into(),
                username: "karimi".into(),
                role: Role::Admin,
                expires_at: None,
            },
            WizardSettings {
                phone_prefix: "+93".into(),
                phone_max_length: 12,
                debounce: Duration::from_millis(500),
                failure_mode: ValidationFailureMode::Open,
            },
            DeputyMinistryTable::default(),
        )
    }

    fn render(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal.draw(|frame| draw(frame, app)).unwrap();
        let buffer = terminal.backend().buffer().clone();
        buffer
            .content()
            .chunks(buffer.area.width as usize)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[tokio::test]
    async fn test_first_step_renders() {
        let app = test_app();
        let screen = render(&app);
        assert!(screen.contains("Step 1 of 4: Personal Information"));
        assert!(screen.contains("Username"));
        assert!(screen.contains("karimi (admin)"));
    }

    #[tokio::test]
    async fn test_error_dialog_overlays_step() {
        let mut app = test_app();
        app.wizard
            .update_field(FieldName::Username, "ahmadi".into())
            .unwrap();
        app.push_error("Username taken");
        let screen = render(&app);
        assert!(screen.contains("Registration error"));
        assert!(screen.contains("Username taken"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_free_value_is_marked_verified() {
        let mut app = test_app();
        app.wizard
            .update_field(FieldName::Email, "ahmad@example.gov.af".into())
            .unwrap();
        assert!(!render(&app).contains("Email ✓"));

        app.wizard.next_validation().await;
        assert!(render(&app).contains("Email ✓"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_unverifiable_value_has_no_mark() {
        let mut api = MockIumsApi::new();
        api.expect_check_unique()
            .returning(|_, _| Err(ApiError::Network("connection refused".into())));
        let mut app = app_with(api);
        app.wizard
            .update_field(FieldName::Email, "ahmad@example.gov.af".into())
            .unwrap();
        app.wizard.next_validation().await;

        let screen = render(&app);
        assert!(app.wizard.errors().get(FieldName::Email).is_none());
        assert!(screen.contains("Email"));
        assert!(!screen.contains("Email ✓"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_status_bar_names_fields_in_error() {
        let mut api = MockIumsApi::new();
        api.expect_check_unique().returning(|_, _| {
            Ok(CheckResponse {
                exists: true,
                message: None,
            })
        });
        let mut app = app_with(api);
        app.wizard
            .update_field(FieldName::Username, "ahmadi".into())
            .unwrap();
        app.wizard.next_validation().await;

        let screen = render(&app);
        assert!(screen.contains("1 field error(s)"));
        assert!(screen.contains("Username is already taken"));
    }

    #[tokio::test]
    async fn test_registered_view_renders() {
        let mut app = test_app();
        app.state.current_view = View::Registered;
        app.state.registered = Some(crate::state::CreatedUser {
            id: 42,
            username: "ahmadi".into(),
            name: "Ahmad".into(),
            created_at: None,
        });
        let screen = render(&app);
        assert!(screen.contains("Internet user registered"));
        assert!(screen.contains("ahmadi"));
    }
}
