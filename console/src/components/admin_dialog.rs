use crossterm::event::{KeyCode, KeyModifiers};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use schoolcast_api::resources::{admins, School};
use schoolcast_components::{
    centered_rect, render_modal, ModalStyle, SelectList, SelectListProps, TextInput,
    TextInputProps,
};
use schoolcast_dispatch::EventKind;

use super::Component;
use crate::action::Action;
use crate::forms::{AdminField, AdminForm};

const TEXT_FIELDS: [AdminField; 3] = [AdminField::Name, AdminField::Email, AdminField::Password];

/// Create/edit dialog for an administrator.
#[derive(Default)]
pub struct AdminDialog {
    inputs: [TextInput; 3],
    picker: SelectList,
    was_open: bool,
}

pub struct AdminDialogProps<'a> {
    pub form: &'a AdminForm,
    /// Choices for the school picker
    pub schools: &'a [School],
    pub schools_loading: bool,
}

impl AdminDialog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset cursors when the dialog opens so edits start at the end of
    /// the prefilled values.
    pub fn set_open(&mut self, form: Option<&AdminForm>) {
        if let (Some(form), false) = (form, self.was_open) {
            *self = Self::default();
            for (input, field) in self.inputs.iter_mut().zip(TEXT_FIELDS) {
                input.move_to_end(text_value(form, field));
            }
        }
        self.was_open = form.is_some();
    }

    fn input_props<'a>(form: &'a AdminForm, field: AdminField) -> TextInputProps<'a, Action> {
        let (label, key, placeholder) = match field {
            AdminField::Name => ("Name", "name", "Full name"),
            AdminField::Email => ("Email", "email", "admin@school.org"),
            _ if form.is_creating() => ("Password", "password", "At least 6 characters"),
            _ => ("Password", "password", "Leave empty to keep the current one"),
        };
        TextInputProps {
            value: text_value(form, field),
            label,
            placeholder,
            is_focused: form.focus == field,
            masked: field == AdminField::Password,
            error: form.errors.get(key),
            on_change: Action::FormInput,
            on_submit: |_| Action::FormSubmit,
        }
    }

    fn picker_props<'a>(
        form: &AdminForm,
        names: &'a [&'a str],
        schools: &[School],
    ) -> SelectListProps<'a, Action> {
        SelectListProps {
            items: names,
            highlighted: form.school_cursor.min(names.len().saturating_sub(1)),
            active: form
                .school_id
                .as_ref()
                .and_then(|id| schools.iter().position(|s| &s.id == id)),
            title: "School (Enter to pick)",
            is_focused: form.focus == AdminField::School,
            on_highlight: Action::FormSchoolHighlight,
            on_select: Action::FormSchoolPick,
        }
    }

    fn render_role(frame: &mut Frame, area: Rect, form: &AdminForm) {
        let focused = form.focus == AdminField::Role;
        let mut spans = vec![Span::styled(
            "Role  ",
            if focused {
                Style::default().fg(Color::Cyan)
            } else {
                Style::default().fg(Color::DarkGray)
            },
        )];
        for &role in admins::roles() {
            let mark = if role == form.role { "(•)" } else { "( )" };
            let style = if role == form.role {
                Style::default().add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            spans.push(Span::styled(format!("{} {}   ", mark, role), style));
        }
        if focused {
            spans.push(Span::styled("←/→ change", Style::default().fg(Color::DarkGray)));
        }
        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }
}

fn text_value(form: &AdminForm, field: AdminField) -> &str {
    match field {
        AdminField::Name => &form.name,
        AdminField::Email => &form.email,
        _ => &form.password,
    }
}

fn input_index(field: AdminField) -> Option<usize> {
    TEXT_FIELDS.iter().position(|f| *f == field)
}

impl Component<Action> for AdminDialog {
    type Props<'a> = AdminDialogProps<'a>;

    fn handle_event(
        &mut self,
        event: &EventKind,
        props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = Action> {
        let EventKind::Key(key) = event else {
            return Vec::new();
        };
        let form = props.form;

        match key.code {
            KeyCode::Esc => return vec![Action::FormClose],
            KeyCode::Tab => return vec![Action::FormFocusNext],
            KeyCode::BackTab => return vec![Action::FormFocusPrev],
            _ => {}
        }
        if form.pending.is_some() {
            return Vec::new();
        }
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('s') {
            return vec![Action::FormSubmit];
        }

        match form.focus {
            field if field.is_text() => match key.code {
                KeyCode::Down => vec![Action::FormFocusNext],
                KeyCode::Up => vec![Action::FormFocusPrev],
                _ => match input_index(field) {
                    Some(i) => self.inputs[i]
                        .handle_event(event, Self::input_props(form, field))
                        .into_iter()
                        .collect(),
                    None => Vec::new(),
                },
            },
            AdminField::Role => match key.code {
                KeyCode::Left
                | KeyCode::Right
                | KeyCode::Char(' ')
                | KeyCode::Char('h')
                | KeyCode::Char('l') => vec![Action::FormToggleRole],
                KeyCode::Enter => vec![Action::FormSubmit],
                KeyCode::Down => vec![Action::FormFocusNext],
                KeyCode::Up => vec![Action::FormFocusPrev],
                _ => Vec::new(),
            },
            _ => {
                let names: Vec<&str> = props.schools.iter().map(|s| s.name.as_str()).collect();
                self.picker
                    .handle_event(event, Self::picker_props(form, &names, props.schools))
                    .into_iter()
                    .collect()
            }
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let form = props.form;
        let with_school = form.role.requires_school();
        let height = if with_school { 24 } else { 16 };
        let dialog = centered_rect(64, height, area);
        let inner = render_modal(frame, dialog, form.title(), &ModalStyle::default());

        let [name, email, password, role, role_error, school, footer] = Layout::vertical([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(if with_school { 3 } else { 0 }),
            Constraint::Length(1),
        ])
        .areas(inner);

        for (i, (field, area)) in TEXT_FIELDS.into_iter().zip([name, email, password]).enumerate() {
            self.inputs[i].render(frame, area, Self::input_props(form, field));
        }
        Self::render_role(frame, role, form);
        if let Some(error) = form.errors.get("schoolId") {
            frame.render_widget(
                Paragraph::new(Line::styled(error, Style::default().fg(Color::Red))),
                role_error,
            );
        }

        if with_school {
            if props.schools.is_empty() {
                let text = if props.schools_loading {
                    "Loading schools…"
                } else {
                    "No schools available"
                };
                frame.render_widget(
                    Paragraph::new(text).style(Style::default().fg(Color::DarkGray)),
                    school,
                );
            } else {
                let names: Vec<&str> = props.schools.iter().map(|s| s.name.as_str()).collect();
                self.picker
                    .render(frame, school, Self::picker_props(form, &names, props.schools));
            }
        }

        let hint = if form.pending.is_some() {
            Line::styled("Saving…", Style::default().fg(Color::Yellow))
        } else {
            Line::styled(
                "[Tab] next  [Enter/Ctrl+S] save  [Esc] cancel",
                Style::default().fg(Color::DarkGray),
            )
        };
        frame.render_widget(Paragraph::new(hint), footer);
    }
}
