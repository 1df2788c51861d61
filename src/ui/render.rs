//! Rendering: the whole screen is re-derived from state every frame

use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState, Wrap};
use ratatui::Frame;

use crate::inventory::InventoryItem;
use crate::ui::state::{
    AppState, Dashboard, DashboardFocus, FormField, ItemForm, LoginField, LoginForm, Modal,
    Notification, NotificationKind, Screen,
};

/// Render money with exactly two decimal digits
pub fn money(value: f64) -> String {
    format!("${:.2}", value)
}

pub fn draw(f: &mut Frame, state: &AppState) {
    match &state.screen {
        Screen::Login(form) => draw_login(f, form, state.in_flight),
        Screen::Dashboard(dash) => draw_dashboard(f, dash, state.in_flight),
    }

    if let Some(notification) = &state.notification {
        draw_notification(f, notification);
    }
}

fn draw_login(f: &mut Frame, form: &LoginForm, in_flight: bool) {
    let area = centered_rect(f.size(), 44, 14);
    let block = Block::default()
        .title(" Stockroom — sign in ")
        .borders(Borders::ALL);
    f.render_widget(Clear, area);
    f.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(2),
            Constraint::Min(1),
        ])
        .split(area);

    draw_input(
        f,
        rows[0],
        "Username",
        &form.username,
        form.focus == LoginField::Username,
    );
    let masked = "•".repeat(form.password.chars().count());
    draw_input(
        f,
        rows[1],
        "Password",
        &masked,
        form.focus == LoginField::Password,
    );

    let status = if in_flight {
        Line::styled("Signing in…", Style::default().fg(Color::Yellow))
    } else if let Some(error) = &form.error {
        Line::styled(error.clone(), Style::default().fg(Color::Red))
    } else {
        Line::raw("")
    };
    f.render_widget(Paragraph::new(status).wrap(Wrap { trim: true }), rows[2]);

    f.render_widget(
        Paragraph::new(Line::styled(
            "tab switch · enter sign in · esc quit",
            Style::default().fg(Color::DarkGray),
        )),
        rows[3],
    );
}

fn draw_dashboard(f: &mut Frame, dash: &Dashboard, in_flight: bool) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .split(f.size());

    draw_header(f, rows[0], dash, in_flight);
    draw_stats(f, rows[1], dash);
    draw_search(f, rows[2], dash);
    draw_table(f, rows[3], dash);
    draw_footer(f, rows[4], dash);

    match &dash.modal {
        Some(Modal::ItemForm(form)) => draw_item_form(f, form),
        Some(Modal::ConfirmDelete { name, .. }) => draw_confirm(f, name),
        None => {}
    }
}

fn draw_header(f: &mut Frame, area: Rect, dash: &Dashboard, in_flight: bool) {
    let user = match &dash.identity {
        Some(identity) => match &identity.role {
            Some(role) => format!("{} ({})", identity.username, role),
            None => identity.username.clone(),
        },
        None => "signed in".to_string(),
    };
    let status = if dash.loading || in_flight { " · syncing…" } else { "" };

    let line = Line::from(vec![
        Span::styled(" Stockroom ", Style::default().add_modifier(Modifier::BOLD)),
        Span::styled(format!("· {}{}", user, status), Style::default().fg(Color::DarkGray)),
    ]);
    f.render_widget(Paragraph::new(line), area);
}

fn draw_stats(f: &mut Frame, area: Rect, dash: &Dashboard) {
    let stats = dash.collection.stats();
    let cells = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
        ])
        .split(area);

    let boxes = [
        ("Items", stats.count.to_string()),
        ("Total units", stats.total_quantity.to_string()),
        ("Total value", money(stats.total_value)),
    ];
    for ((title, value), cell) in boxes.into_iter().zip(cells.iter()) {
        let paragraph = Paragraph::new(Line::styled(
            value,
            Style::default().add_modifier(Modifier::BOLD),
        ))
        .alignment(Alignment::Center)
        .block(Block::default().title(title).borders(Borders::ALL));
        f.render_widget(paragraph, *cell);
    }
}

fn draw_search(f: &mut Frame, area: Rect, dash: &Dashboard) {
    let focused = dash.focus == DashboardFocus::Search;
    draw_input(f, area, "Search", &dash.search, focused);
}

fn draw_table(f: &mut Frame, area: Rect, dash: &Dashboard) {
    let filtered = dash.filtered();
    let block = Block::default().title("Inventory").borders(Borders::ALL);

    if filtered.is_empty() {
        let hint = if dash.collection.is_empty() {
            "No items yet — press n to add the first one"
        } else {
            "Nothing matches the current search"
        };
        let paragraph = Paragraph::new(Line::styled(hint, Style::default().fg(Color::DarkGray)))
            .alignment(Alignment::Center)
            .block(block);
        f.render_widget(paragraph, area);
        return;
    }

    let rows: Vec<Row> = filtered.items().iter().map(item_row).collect();
    let table = Table::new(
        rows,
        [
            Constraint::Min(20),
            Constraint::Length(8),
            Constraint::Length(12),
            Constraint::Length(12),
        ],
    )
    .header(
        Row::new(["Name", "Qty", "Price", "Value"])
            .style(Style::default().add_modifier(Modifier::BOLD)),
    )
    .block(block)
    .highlight_style(
        Style::default()
            .bg(Color::DarkGray)
            .add_modifier(Modifier::BOLD),
    )
    .highlight_symbol("» ");

    let mut table_state = TableState::default().with_selected(Some(dash.selected));
    f.render_stateful_widget(table, area, &mut table_state);
}

fn item_row(item: &InventoryItem) -> Row<'static> {
    let name = match &item.description {
        Some(description) => Line::from(vec![
            Span::raw(item.name.clone()),
            Span::styled(
                format!("  {}", description),
                Style::default().fg(Color::DarkGray),
            ),
        ]),
        None => Line::raw(item.name.clone()),
    };
    Row::new(vec![
        Cell::from(name),
        Cell::from(item.quantity.to_string()),
        Cell::from(money(item.price)),
        Cell::from(money(item.line_value())),
    ])
}

fn draw_footer(f: &mut Frame, area: Rect, dash: &Dashboard) {
    let hint = match (&dash.modal, dash.focus) {
        (Some(Modal::ItemForm(_)), _) => "tab next field · enter save · esc cancel",
        (Some(Modal::ConfirmDelete { .. }), _) => "y confirm · n cancel",
        (None, DashboardFocus::Search) => "type to filter · enter done · esc done",
        (None, DashboardFocus::Table) => {
            "n new · e edit · d delete · / search · r reload · l logout · q quit"
        }
    };
    f.render_widget(
        Paragraph::new(Line::styled(hint, Style::default().fg(Color::DarkGray))),
        area,
    );
}

fn draw_item_form(f: &mut Frame, form: &ItemForm) {
    let area = centered_rect(f.size(), 52, 18);
    let title = if form.editing.is_some() {
        " Edit item "
    } else {
        " New item "
    };
    f.render_widget(Clear, area);
    f.render_widget(Block::default().title(title).borders(Borders::ALL), area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(1),
        ])
        .split(area);

    draw_input(f, rows[0], "Name", &form.name, form.focus == FormField::Name);
    draw_input(
        f,
        rows[1],
        "Quantity",
        &form.quantity,
        form.focus == FormField::Quantity,
    );
    draw_input(
        f,
        rows[2],
        "Price",
        &form.price,
        form.focus == FormField::Price,
    );
    draw_input(
        f,
        rows[3],
        "Description",
        &form.description,
        form.focus == FormField::Description,
    );

    if let Some(error) = &form.error {
        f.render_widget(
            Paragraph::new(Line::styled(error.clone(), Style::default().fg(Color::Red)))
                .wrap(Wrap { trim: true }),
            rows[4],
        );
    }
}

fn draw_confirm(f: &mut Frame, name: &str) {
    let area = centered_rect(f.size(), 50, 7);
    f.render_widget(Clear, area);

    let text = vec![
        Line::raw(format!("Delete \"{}\"?", name)),
        Line::styled(
            "This cannot be undone.",
            Style::default().fg(Color::DarkGray),
        ),
        Line::raw(""),
        Line::raw("y confirm · n cancel"),
    ];
    let paragraph = Paragraph::new(text)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .title(" Confirm delete ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red)),
        );
    f.render_widget(paragraph, area);
}

fn draw_notification(f: &mut Frame, notification: &Notification) {
    let color = match notification.kind {
        NotificationKind::Success => Color::Green,
        NotificationKind::Error => Color::Red,
    };

    let full = f.size();
    let width = (notification.text.chars().count() as u16 + 4).min(full.width);
    let area = Rect {
        x: full.width.saturating_sub(width + 1),
        y: full.height.saturating_sub(4),
        width,
        height: 3,
    };

    f.render_widget(Clear, area);
    f.render_widget(
        Paragraph::new(notification.text.clone())
            .alignment(Alignment::Center)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(color)),
            ),
        area,
    );
}

fn draw_input(f: &mut Frame, area: Rect, label: &str, value: &str, focused: bool) {
    let style = if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };
    let paragraph = Paragraph::new(value.to_string()).block(
        Block::default()
            .title(label)
            .borders(Borders::ALL)
            .border_style(style),
    );
    f.render_widget(paragraph, area);

    if focused && area.width > 2 {
        let x = area.x + 1 + (value.chars().count() as u16).min(area.width - 2);
        f.set_cursor(x, area.y + 1);
    }
}

/// A centered rect of at most `width` × `height` inside `area`
fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inventory::InventoryCollection;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
        terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn money_renders_two_decimals() {
        assert_eq!(money(49.95), "$49.95");
        assert_eq!(money(0.0), "$0.00");
        assert_eq!(money(120.5), "$120.50");
    }

    #[test]
    fn login_screen_renders() {
        let backend = TestBackend::new(80, 24);
        let mut terminal = Terminal::new(backend).unwrap();
        let state = AppState::new();

        terminal.draw(|f| draw(f, &state)).unwrap();
        let text = buffer_text(&terminal);
        assert!(text.contains("sign in"));
        assert!(text.contains("Username"));
    }

    #[test]
    fn dashboard_renders_items_and_totals() {
        let backend = TestBackend::new(100, 30);
        let mut terminal = Terminal::new(backend).unwrap();

        let mut state = AppState::authenticated(None);
        if let Screen::Dashboard(dash) = &mut state.screen {
            dash.loading = false;
            dash.collection = InventoryCollection::from_items(vec![InventoryItem {
                id: 1,
                name: "Widget".to_string(),
                quantity: 5,
                price: 9.99,
                description: None,
            }]);
        }

        terminal.draw(|f| draw(f, &state)).unwrap();
        let text = buffer_text(&terminal);
        assert!(text.contains("Widget"));
        assert!(text.contains("$49.95"));
        assert!(text.contains("Total value"));
    }

    #[test]
    fn empty_dashboard_shows_the_hint() {
        let backend = TestBackend::new(100, 30);
        let mut terminal = Terminal::new(backend).unwrap();

        let mut state = AppState::authenticated(None);
        if let Screen::Dashboard(dash) = &mut state.screen {
            dash.loading = false;
        }

        terminal.draw(|f| draw(f, &state)).unwrap();
        assert!(buffer_text(&terminal).contains("No items yet"));
    }
}
