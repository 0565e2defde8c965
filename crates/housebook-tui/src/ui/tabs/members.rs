use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState, Wrap},
    Frame,
};

use housebook_core::photo::describe_data_url;
use housebook_core::utils::format_size;
use housebook_core::Member;

use crate::app::{App, AppState, FormField, MemberForm};
use crate::ui::render::centered_rect_fixed;
use crate::ui::styles;

/// Width of the member form overlay
const FORM_WIDTH: u16 = 64;

/// Width of the text shown inside a form field's brackets
const FORM_VALUE_WIDTH: usize = 40;

/// Render the Members tab - roster table on the left, details on the right
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(area);

    render_member_table(frame, app, chunks[0]);
    render_member_detail(frame, app, chunks[1]);
}

fn render_member_table(frame: &mut Frame, app: &App, area: Rect) {
    let members = app.visible_members();
    let focused = matches!(app.state, AppState::Normal | AppState::Searching);

    let header = Row::new([Cell::from("Name"), Cell::from("Party"), Cell::from("Position")])
        .style(styles::title_style())
        .height(1);

    let rows: Vec<Row> = members
        .iter()
        .enumerate()
        .map(|(i, member)| {
            let style = if i == app.member_selection {
                styles::selected_style()
            } else {
                styles::list_item_style()
            };
            Row::new(vec![
                Cell::from(member.display_name()),
                Cell::from(member.party.clone()),
                Cell::from(member.position_display().unwrap_or_else(|| "-".to_string())),
            ])
            .style(style)
        })
        .collect();

    let widths = [
        Constraint::Percentage(45), // Name
        Constraint::Fill(1),        // Party
        Constraint::Fill(2),        // Position
    ];

    let title = if app.search_query.is_empty() {
        format!(" Members ({}) ", app.roster.len())
    } else {
        format!(" Members ({} of {}) ", members.len(), app.roster.len())
    };

    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .title(title)
                .title_style(styles::muted_style())
                .borders(Borders::ALL)
                .border_style(styles::border_style(focused)),
        )
        .row_highlight_style(styles::selected_style());

    let mut state = TableState::default();
    if !members.is_empty() {
        state.select(Some(app.member_selection));
    }

    frame.render_stateful_widget(table, area, &mut state);
}

fn detail_line(label: &'static str, value: String) -> Line<'static> {
    Line::from(vec![
        Span::styled(label, styles::muted_style()),
        Span::raw(value),
    ])
}

fn photo_summary(url: &str) -> String {
    describe_data_url(url)
        .map(|info| format!("{}, {}", info.mime_type, format_size(info.size)))
        .unwrap_or_else(|| "-".to_string())
}

fn render_member_detail(frame: &mut Frame, app: &App, area: Rect) {
    let placeholder = "-";

    let content = match app.selected_member() {
        Some(member) => member_detail_lines(member, placeholder),
        None if app.roster.is_empty() => vec![
            Line::from(Span::styled("No members yet", styles::muted_style())),
            Line::from(""),
            Line::from(vec![
                Span::styled("Press ", styles::muted_style()),
                Span::styled("[a]", styles::help_key_style()),
                Span::styled(" to add one", styles::muted_style()),
            ]),
        ],
        None => vec![Line::from(Span::styled("No matches", styles::muted_style()))],
    };

    let block = Block::default()
        .title(" Details ")
        .title_style(styles::muted_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(false));

    let paragraph = Paragraph::new(content)
        .block(block)
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}

fn member_detail_lines(member: &Member, placeholder: &str) -> Vec<Line<'static>> {
    vec![
        Line::from(Span::styled(member.display_name(), styles::title_style())),
        Line::from(""),
        Line::from(Span::styled("Member", styles::highlight_style())),
        detail_line("Party:     ", member.party.clone()),
        detail_line(
            "Position:  ",
            member.position.clone().unwrap_or_else(|| placeholder.to_string()),
        ),
        detail_line(
            "Ministry:  ",
            member.ministry.clone().unwrap_or_else(|| placeholder.to_string()),
        ),
        detail_line("Photo:     ", photo_summary(&member.photo_url)),
        Line::from(""),
        Line::from(Span::styled("Work History", styles::highlight_style())),
        Line::from(member.work_history.clone()),
        Line::from(""),
        Line::from(Span::styled(format!("id {}", member.id), styles::muted_style())),
    ]
}

/// Render the add/edit member overlay
pub fn render_member_form(frame: &mut Frame, app: &App) {
    let Some(form) = app.member_form.as_ref() else {
        return;
    };

    let mut lines = vec![Line::from("")];
    for field in FormField::ALL {
        if field == FormField::Save {
            continue;
        }
        lines.push(form_field_line(form, field));
        if let Some(err) = form.error_for(field) {
            lines.push(Line::from(Span::styled(
                format!("                 {}", err.message),
                styles::error_style(),
            )));
        }
    }

    if let Some(existing) = form.existing_photo.as_deref() {
        lines.push(Line::from(Span::styled(
            format!(
                "                 blank keeps current ({})",
                photo_summary(existing)
            ),
            styles::muted_style(),
        )));
    }

    lines.push(Line::from(""));
    let save_style = if form.focus == FormField::Save {
        styles::selected_style()
    } else {
        styles::list_item_style()
    };
    let save_label = if form.focus == FormField::Save {
        " ▶ Save ◀ "
    } else {
        "   Save   "
    };
    lines.push(Line::from(vec![
        Span::raw("                        ["),
        Span::styled(save_label, save_style),
        Span::raw("]"),
    ]));

    let height = (lines.len() as u16 + 2).max(14);
    let area = centered_rect_fixed(FORM_WIDTH, height, frame.area());
    frame.render_widget(Clear, area);

    let title = if form.is_editing() {
        " Edit member - [Esc] cancel "
    } else {
        " Add member - [Esc] cancel "
    };

    let block = Block::default()
        .title(title)
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn form_field_line(form: &MemberForm, field: FormField) -> Line<'static> {
    let focused = form.focus == field;
    let style = if focused {
        styles::selected_style()
    } else {
        styles::list_item_style()
    };
    let label_style = if form.error_for(field).is_some() {
        styles::error_style()
    } else {
        styles::muted_style()
    };
    let label = format!("  {:<13}", field.label());

    if field == FormField::Title {
        return Line::from(vec![
            Span::styled(label, label_style),
            Span::styled(format!(" ◀ {:<6} ▶ ", form.fields.title), style),
        ]);
    }

    // Show the tail of long values so the cursor end stays visible
    let value = form.value(field);
    let count = value.chars().count();
    let visible: String = if count > FORM_VALUE_WIDTH - 1 {
        value.chars().skip(count - (FORM_VALUE_WIDTH - 1)).collect()
    } else {
        value.to_string()
    };
    let cursor = if focused { "▌" } else { "" };
    let display = format!(
        "{:<width$}",
        format!("{}{}", visible, cursor),
        width = FORM_VALUE_WIDTH
    );

    Line::from(vec![
        Span::styled(label, label_style),
        Span::styled("[", styles::muted_style()),
        Span::styled(display, style),
        Span::styled("]", styles::muted_style()),
    ])
}
