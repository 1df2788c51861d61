//! The update function: the only place UI state transitions happen
//!
//! `update` is pure apart from reading the clock for notification
//! expiry; every side effect it wants is returned as a [`Cmd`] for the
//! runtime to execute.

use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::error::Error;
use crate::ui::msg::{Cmd, Msg, SyncKind};
use crate::ui::state::{
    AppState, DashboardFocus, ItemForm, LoginField, Modal, Notification, NotificationKind, Screen,
};

pub fn update(state: &mut AppState, msg: Msg) -> Vec<Cmd> {
    match msg {
        Msg::Tick => {
            if let Some(notification) = &state.notification {
                if notification.is_expired(Instant::now()) {
                    state.notification = None;
                }
            }
            Vec::new()
        }
        Msg::Key(key) => handle_key(state, key),
        Msg::LoginDone { generation, result } => {
            if generation != state.generation {
                return Vec::new();
            }
            state.in_flight = false;
            match result {
                Ok(session) => {
                    state.enter_dashboard(session.identity);
                    state.in_flight = true;
                    vec![Cmd::Load {
                        generation: state.generation,
                    }]
                }
                Err(e) => {
                    if let Screen::Login(form) = &mut state.screen {
                        form.error = Some(e.to_string());
                    }
                    Vec::new()
                }
            }
        }
        Msg::SyncDone {
            generation,
            kind,
            result,
        } => {
            if generation != state.generation {
                return Vec::new();
            }
            state.in_flight = false;
            handle_sync_result(state, kind, result);
            Vec::new()
        }
    }
}

fn handle_sync_result(
    state: &mut AppState,
    kind: SyncKind,
    result: crate::error::Result<crate::inventory::InventoryCollection>,
) {
    match result {
        // 401 anywhere forces the logout transition; the session layer
        // has already purged the persisted token.
        Err(Error::SessionExpired) => {
            state.enter_login(Some("Session expired, please sign in again".to_string()));
        }
        Err(e) => {
            let text = e.to_string();
            let mut shown_inline = false;
            if let Screen::Dashboard(dash) = &mut state.screen {
                dash.loading = false;
                if matches!(kind, SyncKind::Create | SyncKind::Update) {
                    if let Some(Modal::ItemForm(form)) = &mut dash.modal {
                        form.error = Some(text.clone());
                        shown_inline = true;
                    }
                }
            }
            if !shown_inline {
                state.notification = Some(Notification::new(text, NotificationKind::Error));
            }
        }
        Ok(collection) => {
            if let Screen::Dashboard(dash) = &mut state.screen {
                dash.collection = collection;
                dash.loading = false;
                dash.clamp_selection();
                if matches!(kind, SyncKind::Create | SyncKind::Update)
                    && matches!(dash.modal, Some(Modal::ItemForm(_)))
                {
                    dash.modal = None;
                }
            }
            let note = match kind {
                SyncKind::Create => Some("Item created"),
                SyncKind::Update => Some("Item updated"),
                SyncKind::Delete => Some("Item deleted"),
                SyncKind::Load => None,
            };
            if let Some(text) = note {
                state.notification = Some(Notification::new(text, NotificationKind::Success));
            }
        }
    }
}

fn handle_key(state: &mut AppState, key: KeyEvent) -> Vec<Cmd> {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        state.should_quit = true;
        return Vec::new();
    }

    match &state.screen {
        Screen::Login(_) => handle_login_key(state, key),
        Screen::Dashboard(_) => handle_dashboard_key(state, key),
    }
}

fn handle_login_key(state: &mut AppState, key: KeyEvent) -> Vec<Cmd> {
    let generation = state.generation;
    let in_flight = state.in_flight;
    let Screen::Login(form) = &mut state.screen else {
        return Vec::new();
    };

    match key.code {
        KeyCode::Esc => {
            state.should_quit = true;
            Vec::new()
        }
        KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => {
            form.focus = form.focus.toggled();
            Vec::new()
        }
        KeyCode::Enter => {
            if in_flight {
                return Vec::new();
            }
            // Same local check the server would make anyway; saves a
            // round trip for the obvious case.
            if form.username.trim().is_empty() || form.password.is_empty() {
                form.error = Some("Please enter a username and password".to_string());
                return Vec::new();
            }
            form.error = None;
            let username = form.username.clone();
            let password = form.password.clone();
            state.in_flight = true;
            vec![Cmd::Login {
                generation,
                username,
                password,
            }]
        }
        KeyCode::Char(c) => {
            if in_flight {
                return Vec::new();
            }
            match form.focus {
                LoginField::Username => form.username.push(c),
                LoginField::Password => form.password.push(c),
            }
            Vec::new()
        }
        KeyCode::Backspace => {
            match form.focus {
                LoginField::Username => form.username.pop(),
                LoginField::Password => form.password.pop(),
            };
            Vec::new()
        }
        _ => Vec::new(),
    }
}

fn handle_dashboard_key(state: &mut AppState, key: KeyEvent) -> Vec<Cmd> {
    // Logout leaves the screen, so it is handled before the dashboard
    // is mutably borrowed.
    let at_table = matches!(
        &state.screen,
        Screen::Dashboard(d) if d.modal.is_none() && d.focus == DashboardFocus::Table
    );
    if at_table && key.code == KeyCode::Char('l') {
        state.enter_login(None);
        return vec![Cmd::Logout];
    }

    let generation = state.generation;
    let in_flight = state.in_flight;
    let Screen::Dashboard(dash) = &mut state.screen else {
        return Vec::new();
    };

    if dash.modal.is_some() {
        return handle_modal_key(state, key);
    }

    match dash.focus {
        DashboardFocus::Search => {
            match key.code {
                KeyCode::Esc | KeyCode::Enter => dash.focus = DashboardFocus::Table,
                KeyCode::Char(c) => {
                    dash.search.push(c);
                    dash.selected = 0;
                }
                KeyCode::Backspace => {
                    dash.search.pop();
                    dash.selected = 0;
                }
                _ => {}
            }
            Vec::new()
        }
        DashboardFocus::Table => match key.code {
            KeyCode::Char('q') => {
                state.should_quit = true;
                Vec::new()
            }
            KeyCode::Up | KeyCode::Char('k') => {
                dash.selected = dash.selected.saturating_sub(1);
                Vec::new()
            }
            KeyCode::Down | KeyCode::Char('j') => {
                let len = dash.filtered().len();
                if dash.selected + 1 < len {
                    dash.selected += 1;
                }
                Vec::new()
            }
            KeyCode::Char('/') | KeyCode::Char('s') => {
                dash.focus = DashboardFocus::Search;
                Vec::new()
            }
            KeyCode::Char('n') | KeyCode::Char('a') => {
                dash.modal = Some(Modal::ItemForm(ItemForm::blank()));
                Vec::new()
            }
            KeyCode::Char('e') | KeyCode::Enter => {
                if let Some(item) = dash.selected_item() {
                    dash.modal = Some(Modal::ItemForm(ItemForm::for_item(&item)));
                }
                Vec::new()
            }
            KeyCode::Char('d') | KeyCode::Delete => {
                if let Some(item) = dash.selected_item() {
                    dash.modal = Some(Modal::ConfirmDelete {
                        id: item.id,
                        name: item.name,
                    });
                }
                Vec::new()
            }
            KeyCode::Char('r') => {
                if in_flight {
                    return Vec::new();
                }
                dash.loading = true;
                state.in_flight = true;
                vec![Cmd::Load { generation }]
            }
            KeyCode::Esc => {
                if !dash.search.is_empty() {
                    dash.search.clear();
                    dash.selected = 0;
                }
                Vec::new()
            }
            _ => Vec::new(),
        },
    }
}

fn handle_modal_key(state: &mut AppState, key: KeyEvent) -> Vec<Cmd> {
    let generation = state.generation;
    let in_flight = state.in_flight;
    let Screen::Dashboard(dash) = &mut state.screen else {
        return Vec::new();
    };

    match &mut dash.modal {
        Some(Modal::ItemForm(form)) => match key.code {
            // Dismissing mid-flight is allowed; the late completion is
            // dropped or applied as a plain data refresh.
            KeyCode::Esc => {
                dash.modal = None;
                Vec::new()
            }
            KeyCode::Tab | KeyCode::Down => {
                form.focus = form.focus.next();
                Vec::new()
            }
            KeyCode::BackTab | KeyCode::Up => {
                form.focus = form.focus.prev();
                Vec::new()
            }
            KeyCode::Enter => {
                if in_flight {
                    return Vec::new();
                }
                match form.to_draft() {
                    Err(e) => {
                        form.error = Some(e.to_string());
                        Vec::new()
                    }
                    Ok(draft) => {
                        form.error = None;
                        let editing = form.editing;
                        state.in_flight = true;
                        match editing {
                            Some(id) => vec![Cmd::Update {
                                generation,
                                id,
                                draft,
                            }],
                            None => vec![Cmd::Create { generation, draft }],
                        }
                    }
                }
            }
            KeyCode::Char(c) => {
                if !in_flight {
                    form.focused_text().push(c);
                }
                Vec::new()
            }
            KeyCode::Backspace => {
                if !in_flight {
                    form.focused_text().pop();
                }
                Vec::new()
            }
            _ => Vec::new(),
        },
        Some(Modal::ConfirmDelete { id, .. }) => match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                if in_flight {
                    return Vec::new();
                }
                let id = *id;
                dash.modal = None;
                dash.loading = true;
                state.in_flight = true;
                vec![Cmd::Delete { generation, id }]
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                dash.modal = None;
                Vec::new()
            }
            _ => Vec::new(),
        },
        None => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inventory::{InventoryCollection, InventoryItem};
    use crate::session::Session;

    fn key(code: KeyCode) -> Msg {
        Msg::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn type_text(state: &mut AppState, text: &str) {
        for c in text.chars() {
            update(state, key(KeyCode::Char(c)));
        }
    }

    fn item(id: i64, name: &str) -> InventoryItem {
        InventoryItem {
            id,
            name: name.to_string(),
            quantity: 1,
            price: 2.0,
            description: None,
        }
    }

    fn dashboard_state(items: Vec<InventoryItem>) -> AppState {
        let mut state = AppState::authenticated(None);
        if let Screen::Dashboard(dash) = &mut state.screen {
            dash.collection = InventoryCollection::from_items(items);
            dash.loading = false;
        }
        state
    }

    #[test]
    fn empty_login_form_fails_locally() {
        let mut state = AppState::new();
        let cmds = update(&mut state, key(KeyCode::Enter));
        assert!(cmds.is_empty());
        let Screen::Login(form) = &state.screen else {
            panic!("expected login screen")
        };
        assert!(form.error.is_some());
    }

    #[test]
    fn filled_login_form_issues_a_login_command() {
        let mut state = AppState::new();
        type_text(&mut state, "admin");
        update(&mut state, key(KeyCode::Tab));
        type_text(&mut state, "admin123");

        let cmds = update(&mut state, key(KeyCode::Enter));
        assert_eq!(
            cmds,
            vec![Cmd::Login {
                generation: 0,
                username: "admin".to_string(),
                password: "admin123".to_string(),
            }]
        );
        assert!(state.in_flight);
    }

    #[test]
    fn login_success_enters_dashboard_and_loads() {
        let mut state = AppState::new();
        state.in_flight = true;

        let cmds = update(
            &mut state,
            Msg::LoginDone {
                generation: 0,
                result: Ok(Session {
                    access_token: "a.b.c".to_string(),
                    identity: None,
                }),
            },
        );

        assert!(state.is_dashboard());
        assert_eq!(cmds, vec![Cmd::Load { generation: 1 }]);
        assert!(state.in_flight);
    }

    #[test]
    fn login_failure_shows_an_inline_error() {
        let mut state = AppState::new();
        state.in_flight = true;

        update(
            &mut state,
            Msg::LoginDone {
                generation: 0,
                result: Err(Error::InvalidCredentials),
            },
        );

        let Screen::Login(form) = &state.screen else {
            panic!("expected login screen")
        };
        assert_eq!(form.error.as_deref(), Some("invalid username or password"));
        assert!(!state.in_flight);
    }

    #[test]
    fn stale_completions_are_dropped() {
        let mut state = dashboard_state(vec![item(1, "Widget")]);
        let stale_generation = state.generation;
        // A logout bumps the generation before the old load completes.
        state.enter_login(None);

        update(
            &mut state,
            Msg::SyncDone {
                generation: stale_generation,
                kind: SyncKind::Load,
                result: Ok(InventoryCollection::from_items(vec![item(2, "Gadget")])),
            },
        );

        // The late response must not pull the UI back onto the dashboard.
        assert!(!state.is_dashboard());
    }

    #[test]
    fn session_expiry_forces_the_login_screen() {
        let mut state = dashboard_state(vec![item(1, "Widget")]);
        state.in_flight = true;

        let generation = state.generation;
        update(
            &mut state,
            Msg::SyncDone {
                generation,
                kind: SyncKind::Load,
                result: Err(Error::SessionExpired),
            },
        );

        let Screen::Login(form) = &state.screen else {
            panic!("expected login screen")
        };
        assert!(form.error.as_deref().unwrap().contains("expired"));
    }

    #[test]
    fn delete_requires_confirmation() {
        let mut state = dashboard_state(vec![item(1, "Widget")]);

        let cmds = update(&mut state, key(KeyCode::Char('d')));
        assert!(cmds.is_empty());
        {
            let Screen::Dashboard(dash) = &state.screen else {
                panic!("expected dashboard")
            };
            assert!(matches!(
                dash.modal,
                Some(Modal::ConfirmDelete { id: 1, .. })
            ));
        }

        // 'n' cancels without issuing anything.
        let cmds = update(&mut state, key(KeyCode::Char('n')));
        assert!(cmds.is_empty());
        {
            let Screen::Dashboard(dash) = &state.screen else {
                panic!("expected dashboard")
            };
            assert!(dash.modal.is_none());
        }

        // Re-open and confirm.
        update(&mut state, key(KeyCode::Char('d')));
        let cmds = update(&mut state, key(KeyCode::Char('y')));
        assert_eq!(
            cmds,
            vec![Cmd::Delete {
                generation: state.generation,
                id: 1,
            }]
        );
        assert!(state.in_flight);
    }

    #[test]
    fn invalid_form_submission_stays_local() {
        let mut state = dashboard_state(vec![]);
        update(&mut state, key(KeyCode::Char('n')));
        // Name left empty.
        let cmds = update(&mut state, key(KeyCode::Enter));
        assert!(cmds.is_empty());

        let Screen::Dashboard(dash) = &state.screen else {
            panic!("expected dashboard")
        };
        let Some(Modal::ItemForm(form)) = &dash.modal else {
            panic!("expected item form")
        };
        assert!(form.error.as_deref().unwrap().contains("name"));
    }

    #[test]
    fn create_success_closes_the_form_and_notifies() {
        let mut state = dashboard_state(vec![]);
        update(&mut state, key(KeyCode::Char('n')));
        type_text(&mut state, "Widget");
        let cmds = update(&mut state, key(KeyCode::Enter));
        assert!(matches!(cmds[..], [Cmd::Create { .. }]));

        let generation = state.generation;
        update(
            &mut state,
            Msg::SyncDone {
                generation,
                kind: SyncKind::Create,
                result: Ok(InventoryCollection::from_items(vec![item(1, "Widget")])),
            },
        );

        let Screen::Dashboard(dash) = &state.screen else {
            panic!("expected dashboard")
        };
        assert!(dash.modal.is_none());
        assert_eq!(dash.collection.len(), 1);
        assert!(matches!(
            state.notification,
            Some(Notification {
                kind: NotificationKind::Success,
                ..
            })
        ));
    }

    #[test]
    fn server_rejection_keeps_the_form_open() {
        let mut state = dashboard_state(vec![]);
        update(&mut state, key(KeyCode::Char('n')));
        type_text(&mut state, "Widget");
        update(&mut state, key(KeyCode::Enter));

        let generation = state.generation;
        update(
            &mut state,
            Msg::SyncDone {
                generation,
                kind: SyncKind::Create,
                result: Err(Error::ServerRejected {
                    status: 422,
                    message: "duplicate name".to_string(),
                }),
            },
        );

        let Screen::Dashboard(dash) = &state.screen else {
            panic!("expected dashboard")
        };
        let Some(Modal::ItemForm(form)) = &dash.modal else {
            panic!("expected the form to stay open")
        };
        assert!(form.error.as_deref().unwrap().contains("duplicate name"));
    }

    #[test]
    fn search_keystrokes_narrow_the_view() {
        let mut state = dashboard_state(vec![item(1, "Widget"), item(2, "Gadget")]);
        update(&mut state, key(KeyCode::Char('/')));
        type_text(&mut state, "gad");

        let Screen::Dashboard(dash) = &state.screen else {
            panic!("expected dashboard")
        };
        assert_eq!(dash.filtered().len(), 1);
        assert_eq!(dash.filtered().items()[0].id, 2);
    }

    #[test]
    fn logout_returns_to_login_and_issues_the_command() {
        let mut state = dashboard_state(vec![item(1, "Widget")]);
        let cmds = update(&mut state, key(KeyCode::Char('l')));
        assert_eq!(cmds, vec![Cmd::Logout]);
        assert!(!state.is_dashboard());
    }

    #[test]
    fn tick_expires_notifications() {
        let mut state = dashboard_state(vec![]);
        state.notify_success("done");
        state.notification.as_mut().unwrap().expires_at = Instant::now();

        update(&mut state, Msg::Tick);
        assert!(state.notification.is_none());
    }
}
