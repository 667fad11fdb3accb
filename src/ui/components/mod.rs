//! Reusable UI components

mod button;
mod dialog;

pub use button::{render_step_button, BUTTON_HEIGHT};
pub use dialog::render_error_dialog;
