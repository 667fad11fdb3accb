//! Wizard step rendering

use super::field_renderer::{draw_field, draw_help_text, FieldKind, FIELD_HEIGHT};
use crate::app::App;
use crate::state::forms::{FieldName, StepInput, STEPS, STEP_COUNT};
use crate::state::OptionItem;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    widgets::{Block, Borders},
    Frame,
};

/// One row of the step's layout
enum Row {
    Field(FieldName),
    Device(usize),
    NoDevices,
}

/// Draw the current step with its fields and inline errors
pub fn draw_wizard(frame: &mut Frame, area: Rect, app: &App) {
    let step = app.wizard.step();
    let Some(def) = STEPS.get(step) else {
        return;
    };

    let block = Block::default()
        .title(format!(" Step {} of {}: {} ", step + 1, STEP_COUNT, def.title))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let device_count = app.wizard.form().devices.len();
    let mut rows = Vec::new();
    for &field in def.fields {
        if field == FieldName::Devices {
            if device_count == 0 {
                rows.push(Row::NoDevices);
            }
            rows.extend((0..device_count).map(Row::Device));
        } else {
            rows.push(Row::Field(field));
        }
    }

    let mut constraints: Vec<Constraint> = rows
        .iter()
        .map(|_| Constraint::Length(FIELD_HEIGHT))
        .collect();
    constraints.push(Constraint::Min(0));
    constraints.push(Constraint::Length(1));

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .margin(1)
        .split(inner);

    let active = app.active_input();
    for (row, chunk) in rows.iter().zip(chunks.iter()) {
        match row {
            Row::Field(field) => draw_form_field(frame, *chunk, app, *field, active),
            Row::Device(idx) => draw_device_row(frame, *chunk, app, *idx, active),
            Row::NoDevices => draw_field(
                frame,
                *chunk,
                FieldName::Devices.label(),
                "No devices yet, press Ctrl+A to add one",
                FieldKind::ReadOnly,
                false,
                app.wizard.errors().get(FieldName::Devices),
            ),
        }
    }

    if let Some(help_area) = chunks.last() {
        draw_help_text(frame, *help_area, &step_hint(app));
    }
}

fn draw_form_field(
    frame: &mut Frame,
    area: Rect,
    app: &App,
    field: FieldName,
    active: Option<StepInput>,
) {
    let form = app.wizard.form();
    let options = app.wizard.options();

    let (kind, value) = match field {
        FieldName::DeputyMinistry => (FieldKind::ReadOnly, form.deputy_ministry.clone()),
        FieldName::EmploymentType => (
            FieldKind::Select,
            option_name(&options.employment_types, &form.employment_type),
        ),
        FieldName::Directorate => {
            let name = options
                .directorates
                .iter()
                .find(|d| d.id.to_string() == form.directorate)
                .map(|d| d.name.clone())
                .unwrap_or_default();
            (FieldKind::Select, name)
        }
        FieldName::Status => (FieldKind::Select, form.status.as_str().to_string()),
        _ => (
            FieldKind::Text,
            form.text(field).unwrap_or_default().to_string(),
        ),
    };

    let is_active =
        active.is_some_and(|input| input.device_row().is_none() && input.field() == field);

    let error = app.wizard.errors().get(field);

    let label = if app.wizard.is_verified(field) {
        format!("{} ✓", field.label())
    } else {
        field.label().to_string()
    };

    draw_field(
        frame,
        area,
        &label,
        &value,
        kind,
        is_active,
        error,
    );
}

fn draw_device_row(
    frame: &mut Frame,
    area: Rect,
    app: &App,
    row: usize,
    active: Option<StepInput>,
) {
    let Some(device) = app.wizard.form().devices.get(row) else {
        return;
    };
    let options = app.wizard.options();

    let halves = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    // The list-level error is shown once, on the first row
    let error = if row == 0 {
        app.wizard.errors().get(FieldName::Devices)
    } else {
        None
    };

    draw_field(
        frame,
        halves[0],
        &format!("Device {} type", row + 1),
        &option_name(&options.device_types, &device.device_type_id.to_string()),
        FieldKind::Select,
        active == Some(StepInput::DeviceType(row)),
        error,
    );
    draw_field(
        frame,
        halves[1],
        &format!("Device {} group", row + 1),
        &option_name(&options.groups, &device.group_id.to_string()),
        FieldKind::Select,
        active == Some(StepInput::DeviceGroup(row)),
        None,
    );
}

/// Name of the option whose id matches `selected`, empty if none does
fn option_name(items: &[OptionItem], selected: &str) -> String {
    items
        .iter()
        .find(|item| item.id.to_string() == selected)
        .map(|item| item.name.clone())
        .unwrap_or_default()
}

fn step_hint(app: &App) -> String {
    let mut hint = String::from("Tab:next field  ←/→:choose");
    let has_devices = STEPS
        .get(app.wizard.step())
        .is_some_and(|def| def.fields.contains(&FieldName::Devices));
    if has_devices {
        hint.push_str("  ^A:add device  ^X:remove device");
    }
    if app.wizard.is_last_step() {
        hint.push_str("  ^S:register");
    } else if app.wizard.can_advance(app.wizard.step()) {
        hint.push_str("  ^N:next step");
    }
    if app.wizard.step() > 0 {
        hint.push_str("  ^P:back");
    }
    hint
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_option_name_matches_id() {
        let items = vec![
            OptionItem {
                id: 3,
                name: "Laptop".into(),
            },
            OptionItem {
                id: 4,
                name: "Mobile".into(),
            },
        ];
        assert_eq!(option_name(&items, "4"), "Mobile");
        assert_eq!(option_name(&items, "0"), "");
        assert_eq!(option_name(&items, ""), "");
    }
}
