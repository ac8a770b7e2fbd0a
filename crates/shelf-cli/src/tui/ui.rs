//! UI rendering

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

use shelf_core::{Card, KeyValueStore};

use super::app::{ActivePane, App, FormField, InputMode};
use crate::output::truncate;

/// Main UI rendering function
pub fn draw<K: KeyValueStore>(frame: &mut Frame, app: &App<K>) {
    // Create vertical layout for status bar at the bottom
    let outer_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(1)])
        .split(frame.area());

    // Split the main area into three panes
    let pane_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(20),
            Constraint::Percentage(40),
            Constraint::Percentage(40),
        ])
        .split(outer_chunks[0]);

    draw_filters_pane(frame, app, pane_chunks[0]);
    draw_items_pane(frame, app, pane_chunks[1]);
    draw_detail_pane(frame, app, pane_chunks[2]);
    draw_status_bar(frame, app, outer_chunks[1]);

    match app.input_mode {
        InputMode::Normal => {}
        InputMode::AddForm => draw_add_form(frame, app),
        InputMode::ConfirmClear => draw_confirm_clear(frame, app),
    }

    if app.show_help {
        draw_help_overlay(frame);
    }

    // Errors block everything else, so they go on top
    if let Some(message) = &app.error_message {
        draw_error_modal(frame, message);
    }
}

fn pane_block(title: String, is_active: bool) -> Block<'static> {
    let border_style = if is_active {
        Style::default().add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    };

    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(border_style)
}

fn highlight_style(is_active: bool) -> Style {
    if is_active {
        Style::default()
            .add_modifier(Modifier::BOLD)
            .add_modifier(Modifier::REVERSED)
    } else {
        Style::default().add_modifier(Modifier::REVERSED)
    }
}

/// Draw the filters pane (left)
fn draw_filters_pane<K: KeyValueStore>(frame: &mut Frame, app: &App<K>, area: Rect) {
    let is_active = app.active_pane == ActivePane::Filters;
    let applied = app.session.filter();

    let items: Vec<ListItem> = app
        .filters
        .iter()
        .map(|filter| {
            let marker = if filter == applied { "● " } else { "  " };
            ListItem::new(format!(
                "{}{} ({})",
                marker,
                filter.label(),
                app.count_for(filter)
            ))
        })
        .collect();

    let list = List::new(items)
        .block(pane_block(" Filters ".to_string(), is_active))
        .highlight_style(highlight_style(is_active));

    let mut state = ListState::default();
    state.select(Some(app.filter_index));

    frame.render_stateful_widget(list, area, &mut state);
}

/// Draw the book cards pane (middle)
fn draw_items_pane<K: KeyValueStore>(frame: &mut Frame, app: &App<K>, area: Rect) {
    let is_active = app.active_pane == ActivePane::Items;
    let container = app.session.container();
    let block = pane_block(
        format!(" Books: {} ({}) ", app.session.filter(), container.len()),
        is_active,
    );

    let empty_state = app.session.empty_state();
    if empty_state.is_visible() {
        let message = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(
                empty_state.message(),
                Style::default().add_modifier(Modifier::DIM),
            )),
        ])
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(block);
        frame.render_widget(message, area);
        return;
    }

    let max_len = area.width.saturating_sub(4) as usize;
    let items: Vec<ListItem> = container
        .cards()
        .iter()
        .map(|card| {
            let title = Line::from(Span::styled(
                truncate(&card.title, max_len),
                title_style(card),
            ));
            let byline = Line::from(Span::styled(
                truncate(&format!("{} · {}", card.author, card.category), max_len),
                Style::default().add_modifier(Modifier::DIM),
            ));
            ListItem::new(vec![title, byline])
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(highlight_style(is_active));

    let mut state = ListState::default();
    state.select(Some(app.card_index));

    frame.render_stateful_widget(list, area, &mut state);
}

/// Draw the detail pane (right)
fn draw_detail_pane<K: KeyValueStore>(frame: &mut Frame, app: &App<K>, area: Rect) {
    let is_active = app.active_pane == ActivePane::Detail;
    let bold = Style::default().add_modifier(Modifier::BOLD);

    let content = if let Some(card) = app.current_card() {
        vec![
            Line::from(vec![
                Span::styled("Title: ", bold),
                Span::styled(card.title.as_str(), title_style(card)),
            ]),
            Line::from(""),
            Line::from(vec![
                Span::styled("Author: ", bold),
                Span::raw(card.author.as_str()),
            ]),
            Line::from(""),
            Line::from(vec![
                Span::styled("Category: ", bold),
                Span::raw(card.category.as_str()),
            ]),
            Line::from(""),
            Line::from(vec![
                Span::styled("Status: ", bold),
                Span::raw(if card.completed {
                    "Completed"
                } else {
                    "Not completed"
                }),
            ]),
            Line::from(""),
            Line::from(vec![
                Span::styled("ID: ", bold),
                Span::raw(card.id.to_string()),
            ]),
            Line::from(vec![
                Span::styled("Cover: ", bold),
                Span::styled(
                    card.image_url.as_str(),
                    Style::default().add_modifier(Modifier::DIM),
                ),
            ]),
        ]
    } else {
        vec![
            Line::from(""),
            Line::from(vec![Span::styled(
                "Select a book to view details",
                Style::default().add_modifier(Modifier::DIM),
            )]),
        ]
    };

    let paragraph = Paragraph::new(content)
        .block(pane_block(" Detail ".to_string(), is_active))
        .wrap(Wrap { trim: true });

    frame.render_widget(paragraph, area);
}

/// Draw the status bar at the bottom
fn draw_status_bar<K: KeyValueStore>(frame: &mut Frame, app: &App<K>, area: Rect) {
    let content = if let Some(msg) = &app.status_message {
        msg.clone()
    } else {
        let sort = app
            .last_sort
            .map(|d| format!("[{}]  ", d.label()))
            .unwrap_or_default();
        format!(
            "{}a:add  s/S:sort  c:complete  d:del  X:clear  ?:help  q:quit",
            sort
        )
    };

    let paragraph = Paragraph::new(content).style(Style::default().add_modifier(Modifier::DIM));
    frame.render_widget(paragraph, area);
}

/// Draw the add-book form
fn draw_add_form<K: KeyValueStore>(frame: &mut Frame, app: &App<K>) {
    let popup_area = centered(frame.area(), 56, 11);
    frame.render_widget(Clear, popup_area);

    let field_line = |label: &str, value: String, field: FormField| {
        let focused = app.form.field == field;
        let value_style = if focused {
            Style::default().add_modifier(Modifier::REVERSED)
        } else {
            Style::default()
        };
        Line::from(vec![
            Span::styled(
                format!("{:<10}", label),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::styled(value, value_style),
        ])
    };

    let cursor = |text: &str, field: FormField| {
        if app.form.field == field {
            format!("{}▏", text)
        } else {
            text.to_string()
        }
    };

    let lines = vec![
        Line::from(""),
        field_line(
            "Title",
            cursor(&app.form.title, FormField::Title),
            FormField::Title,
        ),
        Line::from(""),
        field_line(
            "Author",
            cursor(&app.form.author, FormField::Author),
            FormField::Author,
        ),
        Line::from(""),
        field_line(
            "Category",
            format!("◀ {} ▶", app.form_category()),
            FormField::Category,
        ),
        Line::from(""),
        Line::from(Span::styled(
            "Tab: next field  ←/→: category  Enter: add  Esc: cancel",
            Style::default().add_modifier(Modifier::DIM),
        )),
    ];

    let block = Block::default()
        .title(" Add Book ")
        .borders(Borders::ALL)
        .border_style(Style::default().add_modifier(Modifier::BOLD));

    frame.render_widget(Paragraph::new(lines).block(block), popup_area);
}

/// Draw the clear-all confirmation
fn draw_confirm_clear<K: KeyValueStore>(frame: &mut Frame, app: &App<K>) {
    let popup_area = centered(frame.area(), 48, 7);
    frame.render_widget(Clear, popup_area);

    let lines = vec![
        Line::from(""),
        Line::from(format!(
            "Remove all {} book(s)?",
            app.session.store().len()
        )),
        Line::from("This cannot be undone."),
        Line::from(""),
        Line::from(Span::styled(
            "y: remove all  any other key: cancel",
            Style::default().add_modifier(Modifier::DIM),
        )),
    ];

    let block = Block::default()
        .title(" Clear All ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));

    let paragraph = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(block);
    frame.render_widget(paragraph, popup_area);
}

/// Draw a blocking error message
fn draw_error_modal(frame: &mut Frame, message: &str) {
    let popup_area = centered(frame.area(), 56, 9);
    frame.render_widget(Clear, popup_area);

    let mut lines = vec![Line::from("")];
    lines.extend(message.lines().map(|l| Line::from(l.to_string())));
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "Press any key to continue",
        Style::default().add_modifier(Modifier::DIM),
    )));

    let block = Block::default()
        .title(" Error ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Red));

    let paragraph = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(block);
    frame.render_widget(paragraph, popup_area);
}

/// Draw help overlay
fn draw_help_overlay(frame: &mut Frame) {
    let popup_area = centered(frame.area(), 50, 22);
    frame.render_widget(Clear, popup_area);

    let help_text = vec![
        Line::from(vec![Span::styled(
            "Keyboard Shortcuts",
            Style::default().add_modifier(Modifier::BOLD),
        )]),
        Line::from(""),
        Line::from("Navigation:"),
        Line::from("  j/k, ↑/↓    Move up/down"),
        Line::from("  gg          Jump to first book"),
        Line::from("  G           Jump to last book"),
        Line::from("  h/l, ←/→    Switch panes"),
        Line::from("  Tab         Cycle panes"),
        Line::from("  Enter       Apply filter / Toggle completed"),
        Line::from(""),
        Line::from("Commands:"),
        Line::from("  a           Add book"),
        Line::from("  s / S       Sort by title A→Z / Z→A"),
        Line::from("  c, Space    Toggle completed"),
        Line::from("  d           Delete book"),
        Line::from("  X           Clear all books"),
        Line::from("  q           Quit"),
        Line::from(""),
        Line::from(vec![Span::styled(
            "Press any key to close",
            Style::default().add_modifier(Modifier::DIM),
        )]),
    ];

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_style(Style::default().add_modifier(Modifier::BOLD));

    frame.render_widget(Paragraph::new(help_text).block(block), popup_area);
}

/// Terminal style for a card title
fn title_style(card: &Card) -> Style {
    let look = card.title_style();
    let mut style = Style::default();
    if look.strikethrough {
        style = style.add_modifier(Modifier::CROSSED_OUT);
    }
    if let Some(color) = look.color.and_then(|c| c.parse::<Color>().ok()) {
        style = style.fg(color);
    }
    style
}

/// Rectangle of at most `width` x `height`, centered in `area`
fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width.saturating_sub(4));
    let height = height.min(area.height.saturating_sub(2));
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect::new(x, y, width, height)
}
