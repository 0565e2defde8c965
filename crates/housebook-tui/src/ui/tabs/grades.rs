use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

use housebook_core::utils::truncate;

use crate::app::{App, AppState, SubjectField};
use crate::ui::styles;

/// Render the Grades tab - subject input and list on the left, GPA on the right
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(area);

    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(4), Constraint::Min(3)])
        .split(chunks[0]);

    render_subject_input(frame, app, left[0]);
    render_subject_list(frame, app, left[1]);
    render_gpa_card(frame, app, chunks[1]);
}

fn render_subject_input(frame: &mut Frame, app: &App, area: Rect) {
    let editing = app.state == AppState::EditingSubject;
    let name_focused = editing && app.subject_field == SubjectField::Name;
    let grade_focused = editing && app.subject_field == SubjectField::Grade;

    let name_style = if name_focused {
        styles::selected_style()
    } else {
        styles::list_item_style()
    };
    let grade_style = if grade_focused {
        styles::selected_style()
    } else {
        styles::list_item_style()
    };

    let name_cursor = if name_focused { "▌" } else { "" };
    let name_width = area.width.saturating_sub(16) as usize;
    let name_display = format!(
        "{:<width$}",
        format!("{}{}", truncate(&app.subject_draft.name, name_width), name_cursor),
        width = name_width
    );

    let lines = vec![
        Line::from(vec![
            Span::styled(" Subject: [", styles::muted_style()),
            Span::styled(name_display, name_style),
            Span::styled("]", styles::muted_style()),
        ]),
        Line::from(vec![
            Span::styled(" Grade:   ", styles::muted_style()),
            Span::styled(format!(" ◀ {:<2} ▶ ", app.subject_draft.grade), grade_style),
        ]),
    ];

    let title = if editing {
        " New subject - [Enter] add [Tab] grade [Esc] done "
    } else {
        " New subject - [a] to type "
    };

    let block = Block::default()
        .title(title)
        .title_style(styles::muted_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(editing));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_subject_list(frame: &mut Frame, app: &App, area: Rect) {
    let focused = app.state == AppState::Normal;
    let subjects = app.grades.subjects();
    let title = format!(" Subjects ({}) ", subjects.len());

    let block = Block::default()
        .title(title)
        .title_style(styles::muted_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(focused));

    if subjects.is_empty() {
        let empty = Paragraph::new(Line::from(Span::styled(
            " No subjects yet",
            styles::muted_style(),
        )))
        .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let name_width = area.width.saturating_sub(10) as usize;
    let items: Vec<ListItem> = subjects
        .iter()
        .map(|subject| {
            // Failing grades stand out
            let style = if subject.grade.is_failing() {
                styles::error_style()
            } else {
                styles::list_item_style()
            };
            let line = Line::from(vec![
                Span::styled(
                    format!(" {:<width$}", truncate(&subject.name, name_width), width = name_width),
                    style,
                ),
                Span::styled(format!(" {:>2}", subject.grade), style),
            ]);
            ListItem::new(line)
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(styles::selected_style());

    let mut state = ListState::default();
    state.select(Some(app.subject_selection));
    frame.render_stateful_widget(list, area, &mut state);
}

fn render_gpa_card(frame: &mut Frame, app: &App, area: Rect) {
    let placeholder = "-".to_string();
    let result = app.grades.result();

    let counted = result
        .map(|r| r.counted_subjects.to_string())
        .unwrap_or_else(|| placeholder.clone());
    let total = result
        .map(|r| r.total_points_display())
        .unwrap_or_else(|| placeholder.clone());
    let gpa = result.map(|r| r.gpa_display()).unwrap_or(placeholder);
    let gpa_style = result
        .map(|r| styles::gpa_style(r.standing()))
        .unwrap_or_else(styles::muted_style);

    let mut lines = vec![
        Line::from(Span::styled("Grade Point Average", styles::title_style())),
        Line::from(Span::styled(
            "Counts A-F only (W is excluded)",
            styles::muted_style(),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("Counted subjects: ", styles::muted_style()),
            Span::raw(counted),
        ]),
        Line::from(vec![
            Span::styled("Total points:     ", styles::muted_style()),
            Span::raw(total),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled("GPA:              ", styles::muted_style()),
            Span::styled(gpa, gpa_style),
        ]),
    ];

    if result.is_none() {
        lines.push(Line::from(""));
        lines.push(Line::from(vec![
            Span::styled("Press ", styles::muted_style()),
            Span::styled("[c]", styles::help_key_style()),
            Span::styled(" to calculate", styles::muted_style()),
        ]));
    }

    let block = Block::default()
        .title(" GPA ")
        .title_style(styles::muted_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(false));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}
