use crossterm::event::{KeyCode, KeyModifiers};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Style},
    text::Line,
    widgets::Paragraph,
    Frame,
};
use schoolcast_components::{centered_rect, render_modal, ModalStyle, TextInput, TextInputProps};
use schoolcast_dispatch::EventKind;

use super::Component;
use crate::action::Action;
use crate::forms::{SchoolField, SchoolForm};

#[derive(Default)]
pub struct SchoolDialog {
    inputs: [TextInput; 4],
    was_open: bool,
}

pub struct SchoolDialogProps<'a> {
    pub form: &'a SchoolForm,
}

impl SchoolDialog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_open(&mut self, form: Option<&SchoolForm>) {
        if let (Some(form), false) = (form, self.was_open) {
            for (input, field) in self.inputs.iter_mut().zip(SchoolField::ALL) {
                input.move_to_end(form.value_of(field));
            }
        }
        self.was_open = form.is_some();
    }

    fn input_props(form: &SchoolForm, field: SchoolField) -> TextInputProps<'_, Action> {
        let (label, key, placeholder) = match field {
            SchoolField::Name => ("Name", "name", "School name"),
            SchoolField::Address => ("Address", "address", "Optional"),
            SchoolField::Phone => ("Phone", "phone", "Optional"),
            SchoolField::Email => ("Email", "email", "Optional"),
        };
        TextInputProps {
            value: form.value_of(field),
            label,
            placeholder,
            is_focused: form.focus == field,
            masked: false,
            error: form.errors.get(key),
            on_change: Action::FormInput,
            on_submit: |_| Action::FormSubmit,
        }
    }
}

fn input_index(field: SchoolField) -> usize {
    SchoolField::ALL.iter().position(|f| *f == field).unwrap_or(0)
}

impl Component<Action> for SchoolDialog {
    type Props<'a> = SchoolDialogProps<'a>;

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
            KeyCode::Tab | KeyCode::Down => return vec![Action::FormFocusNext],
            KeyCode::BackTab | KeyCode::Up => return vec![Action::FormFocusPrev],
            _ => {}
        }
        if form.pending.is_some() {
            return Vec::new();
        }
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('s') {
            return vec![Action::FormSubmit];
        }

        self.inputs[input_index(form.focus)]
            .handle_event(event, Self::input_props(form, form.focus))
            .into_iter()
            .collect()
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let form = props.form;
        let dialog = centered_rect(64, 17, area);
        let inner = render_modal(frame, dialog, form.title(), &ModalStyle::default());

        let [fields, footer] =
            Layout::vertical([Constraint::Length(12), Constraint::Length(1)]).areas(inner);
        let rows: [Rect; 4] = Layout::vertical([Constraint::Length(3); 4]).areas(fields);
        for (i, (field, area)) in SchoolField::ALL.into_iter().zip(rows).enumerate() {
            self.inputs[i].render(frame, area, Self::input_props(form, field));
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
