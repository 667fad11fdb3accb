//! Registration wizard logic, independent of the terminal

mod controller;
mod validator;

pub use controller::{WizardController, WizardError, WizardSettings};
