use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use housebook_core::utils::truncate;

use crate::app::{App, AppState, Tab};

use super::styles;
use super::tabs::{grades, members};

const LOGO: [&str; 3] = [
    "   ╦ ╦╔═╗╦ ╦╔═╗╔═╗  ╔╗ ╔═╗╔═╗╦╔═",
    "   ╠═╣║ ║║ ║╚═╗║╣   ╠╩╗║ ║║ ║╠╩╗",
    "   ╩ ╩╚═╝╚═╝╚═╝╚═╝  ╚═╝╚═╝╚═╝╩ ╩",
];

pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title bar
            Constraint::Length(3), // Tabs
            Constraint::Min(10),   // Main content
            Constraint::Length(2), // Status bar
        ])
        .split(frame.area());

    render_title_bar(frame, chunks[0]);
    render_tabs(frame, app, chunks[1]);
    render_main_content(frame, app, chunks[2]);
    render_status_bar(frame, app, chunks[3]);

    // Render overlays
    match app.state {
        AppState::ShowingHelp => render_help_overlay(frame),
        AppState::ConfirmingQuit => render_quit_overlay(frame),
        AppState::ConfirmingDelete => render_delete_overlay(frame, app),
        AppState::EditingMember => members::render_member_form(frame, app),
        _ => {}
    }
}

fn render_title_bar(frame: &mut Frame, area: Rect) {
    let title = "  House Book";
    let help_hint = "[?] Help";
    let title_len = title.len();

    let title_line = Line::from(vec![
        Span::styled(title, styles::title_style()),
        Span::raw(" ".repeat(
            area.width
                .saturating_sub(title_len as u16 + help_hint.len() as u16 + 4)
                as usize,
        )),
        Span::styled(help_hint, styles::muted_style()),
    ]);

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(styles::muted_style());

    let paragraph = Paragraph::new(title_line).block(block);
    frame.render_widget(paragraph, area);
}

fn render_tabs(frame: &mut Frame, app: &App, area: Rect) {
    let tabs = [
        (format!("[1] {}", Tab::Grades.title()), app.current_tab == Tab::Grades),
        (format!("[2] {}", Tab::Members.title()), app.current_tab == Tab::Members),
    ];

    let mut spans = vec![Span::raw(" ")];
    for (i, (label, selected)) in tabs.into_iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(" | ", styles::muted_style()));
        }
        let style = if selected {
            styles::tab_style(true)
        } else {
            styles::muted_style()
        };
        spans.push(Span::styled(label, style));
    }

    // Show the active search on the right of the Members tab
    if app.current_tab == Tab::Members
        && (!app.search_query.is_empty() || app.state == AppState::Searching)
    {
        let cursor = if app.state == AppState::Searching { "▌" } else { "" };
        let search = format!("Search: {}{}", truncate(&app.search_query, 30), cursor);
        let used: usize = spans.iter().map(|s| s.width()).sum();
        let padding = (area.width as usize).saturating_sub(used + search.chars().count() + 2);
        spans.push(Span::raw(" ".repeat(padding)));
        spans.push(Span::styled(search, styles::search_style()));
    }

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(styles::muted_style());

    let paragraph = Paragraph::new(Line::from(spans)).block(block);
    frame.render_widget(paragraph, area);
}

fn render_main_content(frame: &mut Frame, app: &App, area: Rect) {
    match app.current_tab {
        Tab::Grades => grades::render(frame, app, area),
        Tab::Members => members::render(frame, app, area),
    }
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let shortcuts = match app.current_tab {
        Tab::Grades => "[a]dd [d]elete [c]alculate | [q]uit",
        Tab::Members => "[a]dd [e]dit [d]elete [/]search | [q]uit",
    };

    // Save state always shows, after the last status message if there is one
    let save_style = if app.roster.last_save_error().is_some() {
        styles::error_style()
    } else {
        styles::muted_style()
    };
    let mut spans = Vec::new();
    if let Some(msg) = &app.status_message {
        spans.push(Span::styled(format!(" {} |", msg), styles::success_style()));
    }
    spans.push(Span::styled(format!(" {} ", app.save_status()), save_style));

    let left_len = app.status_line().chars().count() + 2;
    let right_text = format!(" {} ", shortcuts);
    let width = area.width as usize;
    let padding_len = width
        .saturating_sub(left_len)
        .saturating_sub(right_text.len());

    spans.push(Span::raw(" ".repeat(padding_len)));
    spans.push(Span::styled(right_text, styles::muted_style()));
    let status_line = Line::from(spans);
    let paragraph = Paragraph::new(status_line).style(styles::status_bar_style());
    frame.render_widget(paragraph, area);
}

fn logo_lines() -> Vec<Line<'static>> {
    LOGO.iter()
        .map(|l| Line::from(Span::styled(*l, styles::title_style())))
        .collect()
}

fn help_line(key: &'static str, desc: &'static str) -> Line<'static> {
    Line::from(vec![
        Span::styled(key, styles::help_key_style()),
        Span::styled(desc, styles::help_desc_style()),
    ])
}

fn render_help_overlay(frame: &mut Frame) {
    let area = centered_rect_fixed(52, 30, frame.area());
    frame.render_widget(Clear, area);

    let version = env!("CARGO_PKG_VERSION");

    let mut help_text = logo_lines();
    help_text.extend([
        Line::from(Span::styled(
            format!("              version {}", version),
            styles::muted_style(),
        )),
        Line::from(""),
        Line::from(Span::styled(" Navigation", styles::highlight_style())),
        help_line("  1-2       ", "Switch tabs"),
        help_line("  ←/→       ", "Prev/next tab"),
        help_line("  ↑/↓       ", "Navigate list"),
        help_line("  Esc       ", "Go back / cancel"),
        Line::from(""),
        Line::from(Span::styled(" Grades Tab", styles::highlight_style())),
        help_line("  a         ", "Type a subject (Tab: grade)"),
        help_line("  Enter     ", "Add the subject"),
        help_line("  d         ", "Delete selected subject"),
        help_line("  c         ", "Calculate GPA"),
        Line::from(""),
        Line::from(Span::styled(" Members Tab", styles::highlight_style())),
        help_line("  a         ", "Add member"),
        help_line("  e / Enter ", "Edit selected member"),
        help_line("  d         ", "Delete selected member"),
        help_line("  /         ", "Search"),
        Line::from(""),
        Line::from(Span::styled(" Member Form", styles::highlight_style())),
        help_line("  Tab/↓     ", "Next field"),
        help_line("  ←/→       ", "Change title"),
        help_line("  Enter     ", "Save (on the Save button)"),
        Line::from(""),
        Line::from(vec![
            Span::styled("       Press ", styles::muted_style()),
            Span::styled("?", styles::help_key_style()),
            Span::styled(" or ", styles::muted_style()),
            Span::styled("Esc", styles::help_key_style()),
            Span::styled(" to close", styles::muted_style()),
        ]),
    ]);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());

    frame.render_widget(Paragraph::new(help_text).block(block), area);
}

/// Create a centered rectangle with fixed dimensions
pub fn centered_rect_fixed(width: u16, height: u16, r: Rect) -> Rect {
    let x = r.x + (r.width.saturating_sub(width)) / 2;
    let y = r.y + (r.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(r.width), height.min(r.height))
}

fn render_quit_overlay(frame: &mut Frame) {
    let area = centered_rect_fixed(46, 10, frame.area());
    frame.render_widget(Clear, area);

    let mut lines = logo_lines();
    lines.extend([
        Line::from(""),
        Line::from(Span::styled(
            "   Are you sure you want to quit?",
            styles::highlight_style(),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("   Press ", styles::muted_style()),
            Span::styled("[Y]", styles::help_key_style()),
            Span::styled(" to quit, ", styles::muted_style()),
            Span::styled("[N]", styles::help_key_style()),
            Span::styled(" to cancel", styles::muted_style()),
        ]),
    ]);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_delete_overlay(frame: &mut Frame, app: &App) {
    let area = centered_rect_fixed(46, 8, frame.area());
    frame.render_widget(Clear, area);

    let name = app
        .selected_member()
        .map(|m| truncate(&m.display_name(), 36))
        .unwrap_or_default();

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled("   Delete this member?", styles::highlight_style())),
        Line::from(Span::styled(format!("   {}", name), styles::list_item_style())),
        Line::from(""),
        Line::from(vec![
            Span::styled("   Press ", styles::muted_style()),
            Span::styled("[Y]", styles::help_key_style()),
            Span::styled(" to delete, ", styles::muted_style()),
            Span::styled("[N]", styles::help_key_style()),
            Span::styled(" to cancel", styles::muted_style()),
        ]),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::error_style())
        .style(Style::default());

    frame.render_widget(Paragraph::new(lines).block(block), area);
}
