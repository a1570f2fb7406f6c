//! Top-level view: routes events to the view that owns them and draws the
//! current page, dialog and toast.
//!
//! Event routing, first match wins:
//! 1. Ctrl+C / Ctrl+Q quit from anywhere
//! 2. without a session only the login screen is live
//! 3. an open dialog takes every key
//! 4. Tab / Shift+Tab move focus between sidebar, search and content
//! 5. the focused view handles the rest; `q` quits unless typing

use crossterm::event::KeyCode;
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Style, Stylize},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use schoolcast_components::{render_confirm, Toast, ToastProps};
use schoolcast_dispatch::{EventKind, EventOutcome};

use crate::action::Action;
use crate::components::{
    AdminDialog, AdminDialogProps, Component, DashboardView, DashboardViewProps, HelpBar,
    HelpBarProps, ListingView, LoginScreen, LoginScreenProps, ResourcePage, ResourcePageProps,
    SchoolDialog, SchoolDialogProps, Sidebar, SidebarProps,
};
use crate::dashboard::DashboardAction;
use crate::state::{AppState, Focus, Modal, Page};

const SIDEBAR_WIDTH: u16 = 24;

#[derive(Default)]
pub struct Ui {
    sidebar: Sidebar,
    login: LoginScreen,
    dashboard: DashboardView,
    page: ResourcePage,
    admin_dialog: AdminDialog,
    school_dialog: SchoolDialog,
    help: HelpBar,
    toast: Toast,
}

/// Table snapshot of the current page; `None` on the dashboard.
pub fn listing_view(state: &AppState) -> Option<ListingView> {
    let title = state.page.title();
    crate::with_slice!(state, state.page, |s| ListingView::of(title, s))
}

impl Ui {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect, state: &AppState) {
        if state.is_signed_in() {
            self.render_console(frame, area, state);
        } else {
            self.login
                .render(frame, area, LoginScreenProps { form: &state.login });
        }

        if let Some(toast) = &state.toast {
            let props = ToastProps {
                message: &toast.message,
                kind: toast.kind,
            };
            <Toast as Component<Action>>::render(&mut self.toast, frame, area, props);
        }
    }

    fn render_console(&mut self, frame: &mut Frame, area: Rect, state: &AppState) {
        let [sidebar, main] =
            Layout::horizontal([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(20)])
                .areas(area);
        self.sidebar.render(
            frame,
            sidebar,
            SidebarProps {
                cursor: state.sidebar_cursor,
                page: state.page,
                user: state.user.as_ref(),
                is_focused: state.focus == Focus::Sidebar && state.modal.is_none(),
            },
        );

        let [header, content, help] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Min(5),
            Constraint::Length(1),
        ])
        .areas(main);

        let mut title = vec![Span::raw(format!(" {}", state.page.title())).bold()];
        if let Some(user) = &state.user {
            title.push(Span::styled(
                format!("  ·  {}", user.email),
                Style::default().fg(Color::DarkGray),
            ));
        }
        frame.render_widget(Paragraph::new(Line::from(title)), header);

        match listing_view(state) {
            Some(view) => self.page.render(
                frame,
                content,
                ResourcePageProps {
                    view: &view,
                    selected: state.selected_row,
                    focus: state.focus,
                    has_form: state.page.has_form(),
                },
            ),
            None => self.dashboard.render(
                frame,
                content,
                DashboardViewProps {
                    state: &state.dashboard,
                },
            ),
        }

        self.help.render(
            frame,
            help,
            HelpBarProps {
                page: state.page,
                focus: state.focus,
            },
        );

        self.render_modal(frame, area, state);
    }

    fn render_modal(&mut self, frame: &mut Frame, area: Rect, state: &AppState) {
        let admin = match &state.modal {
            Some(Modal::Admin(form)) => Some(form),
            _ => None,
        };
        let school = match &state.modal {
            Some(Modal::School(form)) => Some(form),
            _ => None,
        };
        self.admin_dialog.set_open(admin);
        self.school_dialog.set_open(school);

        match &state.modal {
            Some(Modal::Admin(form)) => self.admin_dialog.render(
                frame,
                area,
                AdminDialogProps {
                    form,
                    schools: &state.schools.items,
                    schools_loading: state.schools.is_loading(),
                },
            ),
            Some(Modal::School(form)) => {
                self.school_dialog
                    .render(frame, area, SchoolDialogProps { form })
            }
            Some(Modal::ConfirmDelete { page, name, .. }) => {
                let title = format!("Delete {}", page.record_name());
                let message = format!("Delete {}? This cannot be undone.", name);
                render_confirm(frame, area, &title, &message);
            }
            None => {}
        }
    }

    pub fn map_event(&mut self, event: &EventKind, state: &AppState) -> EventOutcome<Action> {
        if event.is_quit() {
            return Action::Quit.into();
        }

        if !state.is_signed_in() {
            let props = LoginScreenProps { form: &state.login };
            return EventOutcome::from_actions(self.login.handle_event(event, props));
        }

        if let Some(modal) = &state.modal {
            return self.map_modal_event(event, modal, state);
        }

        let EventKind::Key(key) = event else {
            return EventOutcome::ignored();
        };

        match key.code {
            KeyCode::Tab => return Self::cycle_focus(state, true).into(),
            KeyCode::BackTab => return Self::cycle_focus(state, false).into(),
            KeyCode::Char('q') if state.focus != Focus::Search => return Action::Quit.into(),
            _ => {}
        }

        if state.focus == Focus::Sidebar {
            if matches!(key.code, KeyCode::Right | KeyCode::Char('l')) {
                return Action::FocusContent.into();
            }
            let props = SidebarProps {
                cursor: state.sidebar_cursor,
                page: state.page,
                user: state.user.as_ref(),
                is_focused: true,
            };
            return EventOutcome::from_actions(self.sidebar.handle_event(event, props));
        }

        match listing_view(state) {
            Some(view) => {
                let props = ResourcePageProps {
                    view: &view,
                    selected: state.selected_row,
                    focus: state.focus,
                    has_form: state.page.has_form(),
                };
                EventOutcome::from_actions(self.page.handle_event(event, props))
            }
            None => match key.code {
                KeyCode::Char('r') => Action::ListRefresh.into(),
                KeyCode::Char('c') => Action::Dashboard(DashboardAction::CyclePeriod).into(),
                KeyCode::Esc | KeyCode::Left => Action::FocusSidebar.into(),
                _ => EventOutcome::ignored(),
            },
        }
    }

    fn map_modal_event(
        &mut self,
        event: &EventKind,
        modal: &Modal,
        state: &AppState,
    ) -> EventOutcome<Action> {
        match modal {
            Modal::Admin(form) => {
                let props = AdminDialogProps {
                    form,
                    schools: &state.schools.items,
                    schools_loading: state.schools.is_loading(),
                };
                EventOutcome::from_actions(self.admin_dialog.handle_event(event, props))
            }
            Modal::School(form) => EventOutcome::from_actions(
                self.school_dialog
                    .handle_event(event, SchoolDialogProps { form }),
            ),
            Modal::ConfirmDelete { .. } => {
                let EventKind::Key(key) = event else {
                    return EventOutcome::ignored();
                };
                match key.code {
                    KeyCode::Char('y') | KeyCode::Enter => Action::DeleteConfirm.into(),
                    KeyCode::Char('n') | KeyCode::Esc => Action::DeleteCancel.into(),
                    _ => EventOutcome::ignored(),
                }
            }
        }
    }

    /// Sidebar → search → content, skipping search on the dashboard.
    fn cycle_focus(state: &AppState, forward: bool) -> Action {
        let order: &[Focus] = if state.page == Page::Dashboard {
            &[Focus::Sidebar, Focus::Content]
        } else {
            &[Focus::Sidebar, Focus::Search, Focus::Content]
        };
        let at = order.iter().position(|f| *f == state.focus).unwrap_or(0);
        let next = if forward {
            order[(at + 1) % order.len()]
        } else {
            order[(at + order.len() - 1) % order.len()]
        };
        match next {
            Focus::Sidebar => Action::FocusSidebar,
            Focus::Search => Action::FocusSearch,
            Focus::Content => Action::FocusContent,
        }
    }
}
