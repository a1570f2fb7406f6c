use crossterm::event::KeyCode;
use ratatui::{
    layout::{Constraint, Layout, Margin, Rect},
    style::{Color, Style, Stylize},
    text::Line,
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};
use schoolcast_components::{centered_rect, TextInput, TextInputProps};
use schoolcast_dispatch::EventKind;

use super::Component;
use crate::action::Action;
use crate::forms::{LoginField, LoginForm};

/// Full-screen sign-in form shown while there is no session.
#[derive(Default)]
pub struct LoginScreen {
    email: TextInput,
    password: TextInput,
}

pub struct LoginScreenProps<'a> {
    pub form: &'a LoginForm,
}

impl LoginScreen {
    pub fn new() -> Self {
        Self::default()
    }

    fn email_props<'a>(form: &'a LoginForm) -> TextInputProps<'a, Action> {
        TextInputProps {
            value: &form.email,
            label: "Email",
            placeholder: "admin@school.org",
            is_focused: form.focus == LoginField::Email,
            masked: false,
            error: form.errors.get("email"),
            on_change: Action::LoginEmailChange,
            on_submit: |_| Action::LoginFocusNext,
        }
    }

    fn password_props<'a>(form: &'a LoginForm) -> TextInputProps<'a, Action> {
        TextInputProps {
            value: &form.password,
            label: "Password",
            placeholder: "",
            is_focused: form.focus == LoginField::Password,
            masked: true,
            error: form.errors.get("password"),
            on_change: Action::LoginPasswordChange,
            on_submit: |_| Action::LoginSubmit,
        }
    }
}

impl Component<Action> for LoginScreen {
    type Props<'a> = LoginScreenProps<'a>;

    fn handle_event(
        &mut self,
        event: &EventKind,
        props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = Action> {
        let EventKind::Key(key) = event else {
            return Vec::new();
        };
        if props.form.submitting {
            return Vec::new();
        }
        if matches!(key.code, KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down) {
            return vec![Action::LoginFocusNext];
        }

        let form = props.form;
        let actions: Vec<Action> = match form.focus {
            LoginField::Email => self
                .email
                .handle_event(event, Self::email_props(form))
                .into_iter()
                .collect(),
            LoginField::Password => self
                .password
                .handle_event(event, Self::password_props(form))
                .into_iter()
                .collect(),
        };
        actions
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let form = props.form;
        let dialog = centered_rect(52, 16, area);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::Cyan))
            .title(" SchoolCast ");
        let inner = block.inner(dialog);
        frame.render_widget(block, dialog);

        let [heading, _, email, password, _, status, hint] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Length(2),
            Constraint::Length(1),
        ])
        .areas(inner.inner(Margin::new(2, 0)));

        frame.render_widget(
            Paragraph::new(Line::from("Sign in to the admin console").bold()).centered(),
            heading,
        );
        self.email.render(frame, email, Self::email_props(form));
        self.password.render(frame, password, Self::password_props(form));

        let status_line = if form.submitting {
            Line::styled("Signing in…", Style::default().fg(Color::Yellow))
        } else if let Some(failure) = &form.failure {
            Line::styled(failure.as_str(), Style::default().fg(Color::Red))
        } else {
            Line::raw("")
        };
        frame.render_widget(Paragraph::new(status_line).centered(), status);
        frame.render_widget(
            Paragraph::new(Line::styled(
                "[Tab] next  [Enter] sign in  [Ctrl+Q] quit",
                Style::default().fg(Color::DarkGray),
            ))
            .centered(),
            hint,
        );
    }
}
