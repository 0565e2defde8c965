//! Keyboard input handling for the TUI.
//!
//! This module handles all keyboard events and translates them into
//! application state changes.

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};

use crate::app::{can_add_subject_char, App, AppState, FormField, SubjectField, Tab, PAGE_SCROLL_SIZE};

/// Handle keyboard input. Returns true if the app should quit.
pub async fn handle_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    match app.state {
        AppState::EditingMember => return handle_member_form_input(app, key).await,
        AppState::EditingSubject => return handle_subject_input(app, key),
        AppState::Searching => return handle_search_input(app, key),
        AppState::ShowingHelp => {
            if matches!(key.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')) {
                app.state = AppState::Normal;
            }
            return Ok(false);
        }
        AppState::ConfirmingQuit => {
            match key.code {
                KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                    app.state = AppState::Quitting;
                    return Ok(true);
                }
                KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                    app.state = AppState::Normal;
                }
                _ => {}
            }
            return Ok(false);
        }
        AppState::ConfirmingDelete => {
            match key.code {
                KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => app.confirm_delete(),
                KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                    app.state = AppState::Normal;
                }
                _ => {}
            }
            return Ok(false);
        }
        AppState::Normal | AppState::Quitting => {}
    }

    // Global keys
    match key.code {
        KeyCode::Char('q') => {
            app.state = AppState::ConfirmingQuit;
        }
        KeyCode::Char('?') => {
            app.state = AppState::ShowingHelp;
        }
        KeyCode::Char('1') => {
            app.current_tab = Tab::Grades;
        }
        KeyCode::Char('2') => {
            app.current_tab = Tab::Members;
        }
        KeyCode::Left => {
            app.current_tab = app.current_tab.prev();
        }
        KeyCode::Right => {
            app.current_tab = app.current_tab.next();
        }
        KeyCode::Esc => {
            app.search_query.clear();
            app.status_message = None;
        }
        _ => {
            // Tab-specific input
            match app.current_tab {
                Tab::Grades => handle_grades_input(app, key),
                Tab::Members => handle_members_input(app, key),
            }
        }
    }

    Ok(false)
}

fn handle_grades_input(app: &mut App, key: KeyEvent) {
    let max_index = app.grades.len().saturating_sub(1);

    match key.code {
        KeyCode::Char('a') | KeyCode::Char('i') | KeyCode::Enter => {
            app.state = AppState::EditingSubject;
            app.subject_field = SubjectField::Name;
        }
        KeyCode::Char('d') | KeyCode::Delete => {
            app.delete_selected_subject();
        }
        KeyCode::Char('c') => {
            app.calculate_gpa();
        }
        KeyCode::Char('j') | KeyCode::Down => {
            app.subject_selection = (app.subject_selection + 1).min(max_index);
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.subject_selection = app.subject_selection.saturating_sub(1);
        }
        KeyCode::Home => {
            app.subject_selection = 0;
        }
        KeyCode::End => {
            app.subject_selection = max_index;
        }
        _ => {}
    }
}

fn handle_subject_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Esc => {
            app.state = AppState::Normal;
        }
        KeyCode::Tab | KeyCode::BackTab => {
            app.subject_field = app.subject_field.toggle();
        }
        KeyCode::Enter => {
            app.add_subject();
        }
        KeyCode::Left | KeyCode::Up if app.subject_field == SubjectField::Grade => {
            app.subject_draft.grade = app.subject_draft.grade.prev();
        }
        KeyCode::Right | KeyCode::Down if app.subject_field == SubjectField::Grade => {
            app.subject_draft.grade = app.subject_draft.grade.next();
        }
        KeyCode::Backspace if app.subject_field == SubjectField::Name => {
            app.subject_draft.name.pop();
        }
        KeyCode::Char(c) if app.subject_field == SubjectField::Name => {
            if can_add_subject_char(app.subject_draft.name.chars().count(), c) {
                app.subject_draft.name.push(c);
            }
        }
        _ => {}
    }
    Ok(false)
}

fn handle_members_input(app: &mut App, key: KeyEvent) {
    let max_index = app.visible_members().len().saturating_sub(1);

    match key.code {
        KeyCode::Char('a') => {
            app.open_add_form();
        }
        KeyCode::Char('e') | KeyCode::Enter => {
            app.open_edit_form();
        }
        KeyCode::Char('d') | KeyCode::Delete => {
            app.request_delete();
        }
        KeyCode::Char('/') => {
            app.state = AppState::Searching;
            app.search_query.clear();
            app.member_selection = 0;
        }
        KeyCode::Char('j') | KeyCode::Down => {
            app.member_selection = (app.member_selection + 1).min(max_index);
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.member_selection = app.member_selection.saturating_sub(1);
        }
        KeyCode::Home => {
            app.member_selection = 0;
        }
        KeyCode::End => {
            app.member_selection = max_index;
        }
        KeyCode::PageDown => {
            app.member_selection = (app.member_selection + PAGE_SCROLL_SIZE).min(max_index);
        }
        KeyCode::PageUp => {
            app.member_selection = app.member_selection.saturating_sub(PAGE_SCROLL_SIZE);
        }
        _ => {}
    }
}

fn handle_search_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Esc => {
            app.state = AppState::Normal;
            app.search_query.clear();
        }
        KeyCode::Enter => {
            app.state = AppState::Normal;
            // Keep search query active
        }
        KeyCode::Backspace => {
            app.search_query.pop();
            app.member_selection = 0;
        }
        KeyCode::Char(c) => {
            app.search_query.push(c);
            // Reset selection when search changes
            app.member_selection = 0;
        }
        _ => {}
    }
    Ok(false)
}

async fn handle_member_form_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    let Some(form) = app.member_form.as_mut() else {
        app.state = AppState::Normal;
        return Ok(false);
    };

    match key.code {
        KeyCode::Esc => {
            app.cancel_member_form();
        }
        KeyCode::Down | KeyCode::Tab => {
            form.focus = form.focus.next();
        }
        KeyCode::Up | KeyCode::BackTab => {
            form.focus = form.focus.prev();
        }
        KeyCode::Left if form.focus == FormField::Title => {
            form.cycle_title(false);
        }
        KeyCode::Right if form.focus == FormField::Title => {
            form.cycle_title(true);
        }
        KeyCode::Enter => {
            if form.focus == FormField::Save {
                app.submit_member_form().await;
            } else {
                form.focus = form.focus.next();
            }
        }
        KeyCode::Backspace => {
            form.pop_char();
        }
        KeyCode::Char(c) => {
            form.push_char(c);
        }
        _ => {}
    }
    Ok(false)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;
    use housebook_core::{Config, Grade, KeyValueRepository, MemoryStore};

    fn test_app() -> App {
        App::with_repository(
            Config::default(),
            Box::new(KeyValueRepository::new(MemoryStore::new())),
        )
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    async fn type_str(app: &mut App, text: &str) {
        for c in text.chars() {
            handle_input(app, key(KeyCode::Char(c))).await.unwrap();
        }
    }

    #[tokio::test]
    async fn test_type_and_add_subject() {
        let mut app = test_app();
        handle_input(&mut app, key(KeyCode::Char('a'))).await.unwrap();
        assert_eq!(app.state, AppState::EditingSubject);

        type_str(&mut app, "Math").await;
        handle_input(&mut app, key(KeyCode::Tab)).await.unwrap();
        handle_input(&mut app, key(KeyCode::Right)).await.unwrap();
        assert_eq!(app.subject_draft.grade, Grade::BPlus);
        handle_input(&mut app, key(KeyCode::Enter)).await.unwrap();

        assert_eq!(app.grades.subjects()[0].name, "Math");
        assert_eq!(app.grades.subjects()[0].grade, Grade::BPlus);
        // Still typing, ready for the next subject
        assert_eq!(app.state, AppState::EditingSubject);
        assert_eq!(app.subject_field, SubjectField::Name);

        handle_input(&mut app, key(KeyCode::Esc)).await.unwrap();
        handle_input(&mut app, key(KeyCode::Char('c'))).await.unwrap();
        assert_eq!(app.grades.result().map(|r| r.gpa), Some(3.5));
    }

    #[tokio::test]
    async fn test_letters_while_typing_do_not_trigger_commands() {
        let mut app = test_app();
        handle_input(&mut app, key(KeyCode::Enter)).await.unwrap();
        type_str(&mut app, "qcd2").await;
        assert_eq!(app.subject_draft.name, "qcd2");
        assert_eq!(app.state, AppState::EditingSubject);
        assert_eq!(app.current_tab, Tab::Grades);
    }

    #[tokio::test]
    async fn test_tab_switching_and_quit_confirmation() {
        let mut app = test_app();
        handle_input(&mut app, key(KeyCode::Char('2'))).await.unwrap();
        assert_eq!(app.current_tab, Tab::Members);
        handle_input(&mut app, key(KeyCode::Right)).await.unwrap();
        assert_eq!(app.current_tab, Tab::Grades);

        assert!(!handle_input(&mut app, key(KeyCode::Char('q'))).await.unwrap());
        assert_eq!(app.state, AppState::ConfirmingQuit);
        handle_input(&mut app, key(KeyCode::Char('n'))).await.unwrap();
        assert_eq!(app.state, AppState::Normal);
        handle_input(&mut app, key(KeyCode::Char('q'))).await.unwrap();
        assert!(handle_input(&mut app, key(KeyCode::Char('y'))).await.unwrap());
    }

    #[tokio::test]
    async fn test_member_form_navigation() {
        let mut app = test_app();
        app.current_tab = Tab::Members;
        handle_input(&mut app, key(KeyCode::Char('a'))).await.unwrap();
        assert_eq!(app.state, AppState::EditingMember);

        type_str(&mut app, "Somsak").await;
        handle_input(&mut app, key(KeyCode::BackTab)).await.unwrap();
        handle_input(&mut app, key(KeyCode::Right)).await.unwrap();

        let form = app.member_form.as_ref().unwrap();
        assert_eq!(form.fields.first_name, "Somsak");
        assert_eq!(form.fields.title, "Mrs.");
        assert_eq!(form.focus, FormField::Title);

        // Enter on a field moves on, it does not submit
        handle_input(&mut app, key(KeyCode::Enter)).await.unwrap();
        assert_eq!(app.member_form.as_ref().unwrap().focus, FormField::FirstName);
        assert!(app.roster.is_empty());

        handle_input(&mut app, key(KeyCode::Esc)).await.unwrap();
        assert!(app.member_form.is_none());
        assert_eq!(app.state, AppState::Normal);
    }

    #[tokio::test]
    async fn test_submitting_empty_form_keeps_it_open() {
        let mut app = test_app();
        app.current_tab = Tab::Members;
        handle_input(&mut app, key(KeyCode::Char('a'))).await.unwrap();
        app.member_form.as_mut().unwrap().focus = FormField::Save;
        handle_input(&mut app, key(KeyCode::Enter)).await.unwrap();

        assert_eq!(app.state, AppState::EditingMember);
        assert!(!app.member_form.as_ref().unwrap().errors.is_empty());
        assert!(app.roster.is_empty());
    }

    #[tokio::test]
    async fn test_search_mode() {
        let mut app = test_app();
        app.current_tab = Tab::Members;
        handle_input(&mut app, key(KeyCode::Char('/'))).await.unwrap();
        assert_eq!(app.state, AppState::Searching);
        type_str(&mut app, "green").await;
        handle_input(&mut app, key(KeyCode::Enter)).await.unwrap();
        assert_eq!(app.search_query, "green");
        assert_eq!(app.state, AppState::Normal);

        handle_input(&mut app, key(KeyCode::Esc)).await.unwrap();
        assert!(app.search_query.is_empty());
    }
}
