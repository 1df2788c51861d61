//! UI state: everything the renderer needs, and nothing it can
//! derive. Filtered views and aggregates are recomputed from the
//! collection on every frame, never stored.

use std::time::{Duration, Instant};

use crate::error::{Error, Result};
use crate::inventory::{InventoryCollection, InventoryItem, ItemDraft};
use crate::session::Identity;

/// How long a notification stays on screen
pub const NOTIFICATION_TTL: Duration = Duration::from_secs(3);

/// Top-level application state
pub struct AppState {
    pub screen: Screen,

    /// Bumped on every screen transition; completions tagged with an
    /// older generation are dropped
    pub generation: u64,

    /// One network operation per user action
    pub in_flight: bool,

    pub notification: Option<Notification>,
    pub should_quit: bool,
}

impl AppState {
    /// Fresh state on the login screen
    pub fn new() -> Self {
        Self {
            screen: Screen::Login(LoginForm::default()),
            generation: 0,
            in_flight: false,
            notification: None,
            should_quit: false,
        }
    }

    /// State for a restored session, dashboard pending its first load
    pub fn authenticated(identity: Option<Identity>) -> Self {
        Self {
            screen: Screen::Dashboard(Dashboard::new(identity)),
            ..Self::new()
        }
    }

    pub fn is_dashboard(&self) -> bool {
        matches!(self.screen, Screen::Dashboard(_))
    }

    /// Transition to the dashboard, invalidating in-flight work
    pub fn enter_dashboard(&mut self, identity: Option<Identity>) {
        self.generation += 1;
        self.in_flight = false;
        self.screen = Screen::Dashboard(Dashboard::new(identity));
    }

    /// Transition to the login screen, invalidating in-flight work
    pub fn enter_login(&mut self, error: Option<String>) {
        self.generation += 1;
        self.in_flight = false;
        self.screen = Screen::Login(LoginForm {
            error,
            ..LoginForm::default()
        });
    }

    pub fn notify_success(&mut self, text: impl Into<String>) {
        self.notification = Some(Notification::new(text, NotificationKind::Success));
    }

    pub fn notify_error(&mut self, text: impl Into<String>) {
        self.notification = Some(Notification::new(text, NotificationKind::Error));
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

pub enum Screen {
    Login(LoginForm),
    Dashboard(Dashboard),
}

/// Transient state of the login form
#[derive(Default)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
    pub focus: LoginField,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoginField {
    #[default]
    Username,
    Password,
}

impl LoginField {
    pub fn toggled(self) -> Self {
        match self {
            LoginField::Username => LoginField::Password,
            LoginField::Password => LoginField::Username,
        }
    }
}

/// Transient state of the dashboard
pub struct Dashboard {
    pub identity: Option<Identity>,
    pub collection: InventoryCollection,
    pub search: String,
    pub focus: DashboardFocus,

    /// Selection index into the filtered view
    pub selected: usize,

    pub modal: Option<Modal>,
    pub loading: bool,
}

impl Dashboard {
    pub fn new(identity: Option<Identity>) -> Self {
        Self {
            identity,
            collection: InventoryCollection::default(),
            search: String::new(),
            focus: DashboardFocus::Table,
            selected: 0,
            modal: None,
            loading: true,
        }
    }

    /// The filtered view, recomputed from the search text on demand
    pub fn filtered(&self) -> InventoryCollection {
        self.collection.search(&self.search)
    }

    /// Item currently under the selection cursor, if any
    pub fn selected_item(&self) -> Option<InventoryItem> {
        self.filtered().items().get(self.selected).cloned()
    }

    /// Keep the selection inside the filtered view
    pub fn clamp_selection(&mut self) {
        let len = self.filtered().len();
        if len == 0 {
            self.selected = 0;
        } else if self.selected >= len {
            self.selected = len - 1;
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DashboardFocus {
    Table,
    Search,
}

pub enum Modal {
    ItemForm(ItemForm),
    ConfirmDelete { id: i64, name: String },
}

/// Field drafts for the create/edit dialog. Numeric fields are kept
/// as raw text and parsed on submit.
#[derive(Default)]
pub struct ItemForm {
    /// `Some(id)` when editing an existing item
    pub editing: Option<i64>,

    pub name: String,
    pub quantity: String,
    pub price: String,
    pub description: String,
    pub focus: FormField,
    pub error: Option<String>,
}

impl ItemForm {
    /// Blank form for creating a new item
    pub fn blank() -> Self {
        Self::default()
    }

    /// Form pre-filled from an existing item
    pub fn for_item(item: &InventoryItem) -> Self {
        Self {
            editing: Some(item.id),
            name: item.name.clone(),
            quantity: item.quantity.to_string(),
            price: item.price.to_string(),
            description: item.description.clone().unwrap_or_default(),
            focus: FormField::Name,
            error: None,
        }
    }

    /// Mutable reference to the focused field's text
    pub fn focused_text(&mut self) -> &mut String {
        match self.focus {
            FormField::Name => &mut self.name,
            FormField::Quantity => &mut self.quantity,
            FormField::Price => &mut self.price,
            FormField::Description => &mut self.description,
        }
    }

    /// Parse the form into a draft, validating locally
    pub fn to_draft(&self) -> Result<ItemDraft> {
        let quantity = match self.quantity.trim() {
            "" => 0,
            text => text
                .parse::<i64>()
                .map_err(|_| Error::validation("quantity", "must be a whole number"))?,
        };
        let price = match self.price.trim() {
            "" => 0.0,
            text => text
                .parse::<f64>()
                .map_err(|_| Error::validation("price", "must be a number"))?,
        };

        let description = self.description.trim();
        let draft = ItemDraft {
            name: self.name.trim().to_string(),
            quantity,
            price,
            description: if description.is_empty() {
                None
            } else {
                Some(description.to_string())
            },
        };
        draft.validate()?;
        Ok(draft)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormField {
    #[default]
    Name,
    Quantity,
    Price,
    Description,
}

impl FormField {
    pub fn next(self) -> Self {
        match self {
            FormField::Name => FormField::Quantity,
            FormField::Quantity => FormField::Price,
            FormField::Price => FormField::Description,
            FormField::Description => FormField::Name,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            FormField::Name => FormField::Description,
            FormField::Quantity => FormField::Name,
            FormField::Price => FormField::Quantity,
            FormField::Description => FormField::Price,
        }
    }
}

/// A dismissible, auto-expiring toast
pub struct Notification {
    pub text: String,
    pub kind: NotificationKind,
    pub expires_at: Instant,
}

impl Notification {
    pub fn new(text: impl Into<String>, kind: NotificationKind) -> Self {
        Self {
            text: text.into(),
            kind,
            expires_at: Instant::now() + NOTIFICATION_TTL,
        }
    }

    pub fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Error,
}
