//! Form rendering module
//!
//! - `field_renderer`: bordered fields with inline errors
//! - `wizard`: the current wizard step

mod field_renderer;
mod wizard;

pub use wizard::draw_wizard;
