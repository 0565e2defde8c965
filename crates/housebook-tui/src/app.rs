//! Application state management for housebook.
//!
//! This module contains the core `App` struct that holds all UI state along
//! with the `GradeTracker` and `MemberRoster` it drives.

use anyhow::Result;
use tracing::{debug, info, warn};

use housebook_core::{
    Config, Field, FieldError, FileStore, GradeTracker, KeyValueRepository, Member, MemberFields,
    MemberRoster, PhotoUpload, RosterError, RosterRepository, SubjectDraft, TITLES,
};

// ============================================================================
// Constants
// ============================================================================

/// Number of items to scroll on page up/down.
pub const PAGE_SCROLL_SIZE: usize = 10;

/// Maximum length for names, party, position and ministry.
const MAX_SHORT_TEXT_LENGTH: usize = 100;

/// Maximum length for work history.
const MAX_LONG_TEXT_LENGTH: usize = 500;

/// Maximum length for a photo path.
const MAX_PATH_LENGTH: usize = 1024;

// ============================================================================
// UI State Types
// ============================================================================

/// Main navigation tabs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Grades,
    Members,
}

impl Tab {
    /// Get the display title for this tab.
    pub fn title(&self) -> &'static str {
        match self {
            Tab::Grades => "Grades",
            Tab::Members => "Members",
        }
    }

    /// Get the next tab (wrapping around)
    pub fn next(&self) -> Self {
        match self {
            Tab::Grades => Tab::Members,
            Tab::Members => Tab::Grades,
        }
    }

    /// Get the previous tab (wrapping around)
    pub fn prev(&self) -> Self {
        // Only two tabs, so previous and next coincide
        self.next()
    }
}

/// Overall application state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Normal,
    EditingSubject,
    EditingMember,
    Searching,
    ShowingHelp,
    ConfirmingDelete,
    ConfirmingQuit,
    Quitting,
}

/// Which part of the subject input has focus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubjectField {
    Name,
    Grade,
}

impl SubjectField {
    pub fn toggle(&self) -> Self {
        match self {
            SubjectField::Name => SubjectField::Grade,
            SubjectField::Grade => SubjectField::Name,
        }
    }
}

/// Member form focus state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Title,
    FirstName,
    LastName,
    Party,
    WorkHistory,
    Position,
    Ministry,
    Photo,
    Save,
}

impl FormField {
    pub const ALL: [FormField; 9] = [
        FormField::Title,
        FormField::FirstName,
        FormField::LastName,
        FormField::Party,
        FormField::WorkHistory,
        FormField::Position,
        FormField::Ministry,
        FormField::Photo,
        FormField::Save,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            FormField::Title => "Title",
            FormField::FirstName => "First name",
            FormField::LastName => "Last name",
            FormField::Party => "Party",
            FormField::WorkHistory => "Work history",
            FormField::Position => "Position",
            FormField::Ministry => "Ministry",
            FormField::Photo => "Photo file",
            FormField::Save => "Save",
        }
    }

    /// Get the next field (wrapping around)
    pub fn next(&self) -> Self {
        let idx = self.index();
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    /// Get the previous field (wrapping around)
    pub fn prev(&self) -> Self {
        let idx = self.index();
        Self::ALL[(idx + Self::ALL.len() - 1) % Self::ALL.len()]
    }

    fn index(&self) -> usize {
        Self::ALL.iter().position(|f| f == self).unwrap_or(0)
    }

    /// Validation field reported against this form field
    pub fn validation_field(&self) -> Option<Field> {
        match self {
            FormField::Title => Some(Field::Title),
            FormField::FirstName => Some(Field::FirstName),
            FormField::LastName => Some(Field::LastName),
            FormField::Party => Some(Field::Party),
            FormField::WorkHistory => Some(Field::WorkHistory),
            FormField::Photo => Some(Field::Photo),
            FormField::Position | FormField::Ministry | FormField::Save => None,
        }
    }

    fn max_len(&self) -> usize {
        match self {
            FormField::WorkHistory => MAX_LONG_TEXT_LENGTH,
            FormField::Photo => MAX_PATH_LENGTH,
            _ => MAX_SHORT_TEXT_LENGTH,
        }
    }
}

/// State of the add/edit member overlay
#[derive(Debug, Clone)]
pub struct MemberForm {
    pub fields: MemberFields,
    pub photo_path: String,
    pub focus: FormField,
    pub errors: Vec<FieldError>,
    /// Stored photo of the member being edited, `None` when adding
    pub existing_photo: Option<String>,
}

impl MemberForm {
    pub fn new_member(title: &str) -> Self {
        Self {
            fields: MemberFields::with_title(title),
            photo_path: String::new(),
            focus: FormField::FirstName,
            errors: Vec::new(),
            existing_photo: None,
        }
    }

    pub fn edit_member(fields: MemberFields, existing_photo: String) -> Self {
        Self {
            fields,
            photo_path: String::new(),
            focus: FormField::FirstName,
            errors: Vec::new(),
            existing_photo: Some(existing_photo),
        }
    }

    pub fn is_editing(&self) -> bool {
        self.existing_photo.is_some()
    }

    /// Current text of a form field ("" for the Save button)
    pub fn value(&self, field: FormField) -> &str {
        match field {
            FormField::Title => &self.fields.title,
            FormField::FirstName => &self.fields.first_name,
            FormField::LastName => &self.fields.last_name,
            FormField::Party => &self.fields.party,
            FormField::WorkHistory => &self.fields.work_history,
            FormField::Position => &self.fields.position,
            FormField::Ministry => &self.fields.ministry,
            FormField::Photo => &self.photo_path,
            FormField::Save => "",
        }
    }

    /// Free-text value under focus; the title is picked, not typed
    fn focused_text_mut(&mut self) -> Option<&mut String> {
        match self.focus {
            FormField::FirstName => Some(&mut self.fields.first_name),
            FormField::LastName => Some(&mut self.fields.last_name),
            FormField::Party => Some(&mut self.fields.party),
            FormField::WorkHistory => Some(&mut self.fields.work_history),
            FormField::Position => Some(&mut self.fields.position),
            FormField::Ministry => Some(&mut self.fields.ministry),
            FormField::Photo => Some(&mut self.photo_path),
            FormField::Title | FormField::Save => None,
        }
    }

    pub fn push_char(&mut self, c: char) {
        let max_len = self.focus.max_len();
        if let Some(text) = self.focused_text_mut() {
            if can_add_char(text.chars().count(), max_len, c) {
                text.push(c);
            }
        }
    }

    pub fn pop_char(&mut self) {
        if let Some(text) = self.focused_text_mut() {
            text.pop();
        }
    }

    /// Step the title through `TITLES`. A custom stored title restarts the cycle.
    pub fn cycle_title(&mut self, forward: bool) {
        let current = TITLES.iter().position(|t| *t == self.fields.title);
        let next = match (current, forward) {
            (Some(i), true) => (i + 1) % TITLES.len(),
            (Some(i), false) => (i + TITLES.len() - 1) % TITLES.len(),
            (None, _) => 0,
        };
        self.fields.title = TITLES[next].to_string();
    }

    /// Error reported for a form field, if any
    pub fn error_for(&self, field: FormField) -> Option<&FieldError> {
        let wanted = field.validation_field()?;
        self.errors.iter().find(|e| e.field == wanted)
    }
}

// ============================================================================
// Main Application Struct
// ============================================================================

/// Main application state container
pub struct App {
    pub config: Config,

    // UI State
    pub state: AppState,
    pub current_tab: Tab,
    pub search_query: String,
    pub status_message: Option<String>,

    // Grades tab
    pub grades: GradeTracker,
    pub subject_draft: SubjectDraft,
    pub subject_field: SubjectField,
    pub subject_selection: usize,

    // Members tab
    pub roster: MemberRoster<Box<dyn RosterRepository>>,
    pub member_form: Option<MemberForm>,
    pub member_selection: usize,
}

impl App {
    /// Create a new application instance backed by the configured data directory
    pub fn new(config: Config) -> Result<Self> {
        let data_dir = config.data_dir();
        debug!(?data_dir, "Data directory configured");
        let store = FileStore::new(data_dir)?;
        Ok(Self::with_repository(config, Box::new(KeyValueRepository::new(store))))
    }

    pub fn with_repository(config: Config, repository: Box<dyn RosterRepository>) -> Self {
        Self {
            config,

            state: AppState::Normal,
            current_tab: Tab::Grades,
            search_query: String::new(),
            status_message: None,

            grades: GradeTracker::new(),
            subject_draft: SubjectDraft::default(),
            subject_field: SubjectField::Name,
            subject_selection: 0,

            roster: MemberRoster::new(repository),
            member_form: None,
            member_selection: 0,
        }
    }

    // =========================================================================
    // Grades
    // =========================================================================

    /// Add the drafted subject to the list
    pub fn add_subject(&mut self) {
        let name = self.subject_draft.name.trim().to_string();
        if self.subject_draft.submit(&mut self.grades) {
            self.subject_field = SubjectField::Name;
            self.subject_selection = self.grades.len().saturating_sub(1);
            self.status_message = Some(format!("Added {}", name));
        } else {
            self.status_message = Some("Enter a subject name first".to_string());
        }
    }

    pub fn delete_selected_subject(&mut self) {
        if let Some(removed) = self.grades.delete_subject(self.subject_selection) {
            self.status_message = Some(format!("Removed {}", removed.name));
            let max_index = self.grades.len().saturating_sub(1);
            self.subject_selection = self.subject_selection.min(max_index);
        }
    }

    pub fn calculate_gpa(&mut self) {
        let result = self.grades.calculate();
        self.status_message = Some(format!("GPA: {}", result.gpa_display()));
    }

    // =========================================================================
    // Members
    // =========================================================================

    /// Members matching the current search, newest first
    pub fn visible_members(&self) -> Vec<&Member> {
        self.roster.search(&self.search_query)
    }

    pub fn selected_member(&self) -> Option<&Member> {
        self.visible_members().get(self.member_selection).copied()
    }

    pub fn clamp_member_selection(&mut self) {
        let max_index = self.visible_members().len().saturating_sub(1);
        self.member_selection = self.member_selection.min(max_index);
    }

    pub fn open_add_form(&mut self) {
        self.roster.cancel_edit();
        self.member_form = Some(MemberForm::new_member(self.config.default_title()));
        self.state = AppState::EditingMember;
    }

    pub fn open_edit_form(&mut self) {
        let Some(id) = self.selected_member().map(|m| m.id.clone()) else {
            return;
        };
        let Some(fields) = self.roster.start_edit(&id) else {
            return;
        };
        let photo = self
            .roster
            .get(&id)
            .map(|m| m.photo_url.clone())
            .unwrap_or_default();
        self.member_form = Some(MemberForm::edit_member(fields, photo));
        self.state = AppState::EditingMember;
    }

    pub fn cancel_member_form(&mut self) {
        self.roster.cancel_edit();
        self.member_form = None;
        self.state = AppState::Normal;
    }

    /// Read the chosen photo (if any) and hand the form to the roster.
    ///
    /// On validation failure the form stays open with its field errors.
    pub async fn submit_member_form(&mut self) {
        let Some(form) = self.member_form.as_ref() else {
            return;
        };
        let fields = form.fields.clone();
        let photo_path = form.photo_path.trim().to_string();

        let photo = if photo_path.is_empty() {
            None
        } else {
            match PhotoUpload::from_path(&photo_path).await {
                Ok(photo) => Some(photo),
                Err(e) => {
                    warn!(error = %e, "Failed to read photo");
                    self.set_form_errors(vec![FieldError::new(Field::Photo, "Could not read that file")]);
                    return;
                }
            }
        };

        match self.roster.submit(&fields, photo.as_ref()) {
            Ok(member) => {
                let id = member.id.clone();
                let name = member.display_name();
                info!(%id, "Member form saved");
                self.member_form = None;
                self.state = AppState::Normal;
                self.status_message = Some(format!("Saved {}", name));
                self.select_member(&id);
            }
            Err(RosterError::Validation(errors)) => {
                debug!(count = errors.len(), "Member form has errors");
                self.set_form_errors(errors.0);
            }
            Err(e @ RosterError::NotFound(_)) => {
                warn!(error = %e, "Edited member disappeared");
                self.cancel_member_form();
                self.status_message = Some(e.to_string());
            }
        }
    }

    fn set_form_errors(&mut self, errors: Vec<FieldError>) {
        if let Some(form) = self.member_form.as_mut() {
            // Jump to the first field with a problem
            if let Some(first) = FormField::ALL
                .iter()
                .find(|f| f.validation_field().is_some_and(|v| errors.iter().any(|e| e.field == v)))
            {
                form.focus = *first;
            }
            form.errors = errors;
        }
    }

    fn select_member(&mut self, id: &str) {
        if let Some(pos) = self.visible_members().iter().position(|m| m.id == id) {
            self.member_selection = pos;
        } else {
            self.clamp_member_selection();
        }
    }

    pub fn request_delete(&mut self) {
        if self.selected_member().is_some() {
            self.state = AppState::ConfirmingDelete;
        }
    }

    pub fn confirm_delete(&mut self) {
        self.state = AppState::Normal;
        let Some(id) = self.selected_member().map(|m| m.id.clone()) else {
            return;
        };
        if let Some(removed) = self.roster.delete_member(&id) {
            self.status_message = Some(format!("Deleted {}", removed.display_name()));
        }
        self.clamp_member_selection();
    }

    /// Status bar text describing the last save
    pub fn save_status(&self) -> String {
        match self.roster.last_save_error() {
            Some(err) => format!("Save failed: {}", err),
            None => format!("Saved {}", self.roster.saved_age_display()),
        }
    }

    /// Full status bar text: the last status message, then the save state
    pub fn status_line(&self) -> String {
        match &self.status_message {
            Some(msg) => format!("{} | {}", msg, self.save_status()),
            None => self.save_status(),
        }
    }
}

// ============================================================================
// Input validation helpers (exported for use in input.rs)
// ============================================================================

/// Check if a character is valid for input (no control characters)
fn is_valid_input_char(c: char) -> bool {
    !c.is_control()
}

/// Check if a character should be accepted into a field of `max_len` chars
pub fn can_add_char(current_len: usize, max_len: usize, c: char) -> bool {
    current_len < max_len && is_valid_input_char(c)
}

/// Check if a subject name character should be accepted
pub fn can_add_subject_char(current_len: usize, c: char) -> bool {
    can_add_char(current_len, MAX_SHORT_TEXT_LENGTH, c)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use housebook_core::{Grade, MemoryStore, StoreError};

    fn test_app() -> App {
        App::with_repository(
            Config::default(),
            Box::new(KeyValueRepository::new(MemoryStore::new())),
        )
    }

    fn fill_form(app: &mut App, first: &str, photo: &str) {
        let form = app.member_form.as_mut().unwrap();
        form.fields.first_name = first.to_string();
        form.fields.last_name = "Rakthai".to_string();
        form.fields.party = "Green".to_string();
        form.fields.work_history = "Nurse".to_string();
        form.photo_path = photo.to_string();
    }

    fn write_photo(dir: &tempfile::TempDir, name: &str) -> String {
        let path = dir.path().join(name);
        std::fs::write(&path, [0xffu8, 0xd8, 0xff]).unwrap();
        path.display().to_string()
    }

    // -------------------------------------------------------------------------
    // Tab / Field Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_tab_next_prev() {
        assert_eq!(Tab::Grades.next(), Tab::Members);
        assert_eq!(Tab::Members.next(), Tab::Grades); // Wraps around
        assert_eq!(Tab::Grades.prev(), Tab::Members);
    }

    #[test]
    fn test_form_field_cycle() {
        assert_eq!(FormField::Title.next(), FormField::FirstName);
        assert_eq!(FormField::Save.next(), FormField::Title); // Wraps around
        assert_eq!(FormField::Title.prev(), FormField::Save);
        assert_eq!(FormField::Photo.validation_field(), Some(Field::Photo));
        assert_eq!(FormField::Ministry.validation_field(), None);
    }

    #[test]
    fn test_cycle_title() {
        let mut form = MemberForm::new_member("Mr.");
        form.cycle_title(true);
        assert_eq!(form.fields.title, "Mrs.");
        form.cycle_title(false);
        form.cycle_title(false);
        assert_eq!(form.fields.title, "Dr.");

        form.fields.title = "Khun".to_string();
        form.cycle_title(true);
        assert_eq!(form.fields.title, TITLES[0]);
    }

    #[test]
    fn test_form_typing_ignores_title_and_control_chars() {
        let mut form = MemberForm::new_member("Mr.");
        form.focus = FormField::Title;
        form.push_char('x');
        assert_eq!(form.fields.title, "Mr.");

        form.focus = FormField::Party;
        form.push_char('P');
        form.push_char('\n');
        form.push_char('ก');
        assert_eq!(form.fields.party, "Pก");
        form.pop_char();
        assert_eq!(form.fields.party, "P");
    }

    #[test]
    fn test_can_add_char() {
        assert!(can_add_char(0, 5, 'a'));
        assert!(!can_add_char(5, 5, 'a'));
        assert!(!can_add_char(0, 5, '\t'));
        assert!(can_add_subject_char(99, 'z'));
        assert!(!can_add_subject_char(100, 'z'));
    }

    // -------------------------------------------------------------------------
    // Grades
    // -------------------------------------------------------------------------

    #[test]
    fn test_add_and_delete_subject() {
        let mut app = test_app();
        app.subject_draft.name = "Biology".to_string();
        app.subject_draft.grade = Grade::BPlus;
        app.add_subject();
        assert_eq!(app.grades.len(), 1);
        assert_eq!(app.subject_draft, SubjectDraft::default());

        // Blank draft is rejected with a hint
        app.add_subject();
        assert_eq!(app.grades.len(), 1);
        assert_eq!(app.status_message.as_deref(), Some("Enter a subject name first"));

        app.calculate_gpa();
        assert_eq!(app.status_message.as_deref(), Some("GPA: 3.50"));

        app.delete_selected_subject();
        assert!(app.grades.is_empty());
        assert_eq!(app.subject_selection, 0);
    }

    // -------------------------------------------------------------------------
    // Members
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_submit_new_member() {
        let dir = tempfile::tempdir().unwrap();
        let photo = write_photo(&dir, "face.jpg");

        let mut app = test_app();
        app.open_add_form();
        assert_eq!(app.state, AppState::EditingMember);
        fill_form(&mut app, "Suda", &photo);
        app.submit_member_form().await;

        assert_eq!(app.state, AppState::Normal);
        assert!(app.member_form.is_none());
        assert_eq!(app.roster.len(), 1);
        assert!(app.roster.members()[0].photo_url.starts_with("data:image/jpeg;base64,"));
        assert_eq!(app.selected_member().unwrap().first_name, "Suda");
    }

    #[tokio::test]
    async fn test_submit_reports_field_errors() {
        let mut app = test_app();
        app.open_add_form();
        app.submit_member_form().await;

        let form = app.member_form.as_ref().unwrap();
        assert_eq!(app.state, AppState::EditingMember);
        assert!(form.error_for(FormField::FirstName).is_some());
        assert!(form.error_for(FormField::Photo).is_some());
        assert!(form.error_for(FormField::Title).is_none());
        assert_eq!(form.focus, FormField::FirstName);
        assert!(app.roster.is_empty());
    }

    #[tokio::test]
    async fn test_unreadable_photo_is_a_photo_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = test_app();
        app.open_add_form();
        fill_form(&mut app, "Suda", &dir.path().join("missing.png").display().to_string());
        app.submit_member_form().await;

        let form = app.member_form.as_ref().unwrap();
        assert_eq!(form.errors.len(), 1);
        assert_eq!(form.focus, FormField::Photo);
    }

    #[tokio::test]
    async fn test_edit_keeps_photo_and_delete_flow() {
        let dir = tempfile::tempdir().unwrap();
        let photo = write_photo(&dir, "face.png");

        let mut app = test_app();
        app.open_add_form();
        fill_form(&mut app, "Suda", &photo);
        app.submit_member_form().await;
        let original_photo = app.roster.members()[0].photo_url.clone();

        app.open_edit_form();
        assert!(app.member_form.as_ref().unwrap().is_editing());
        assert!(app.roster.is_editing());
        app.member_form.as_mut().unwrap().fields.party = "Yellow".to_string();
        app.submit_member_form().await;

        assert_eq!(app.roster.len(), 1);
        assert_eq!(app.roster.members()[0].party, "Yellow");
        assert_eq!(app.roster.members()[0].photo_url, original_photo);
        assert!(!app.roster.is_editing());

        app.request_delete();
        assert_eq!(app.state, AppState::ConfirmingDelete);
        app.confirm_delete();
        assert!(app.roster.is_empty());
        assert_eq!(app.state, AppState::Normal);

        // Nothing left to delete
        app.request_delete();
        assert_eq!(app.state, AppState::Normal);
    }

    #[tokio::test]
    async fn test_search_filters_visible_members() {
        let dir = tempfile::tempdir().unwrap();
        let photo = write_photo(&dir, "face.webp");

        let mut app = test_app();
        for name in ["Suda", "Niran"] {
            app.open_add_form();
            fill_form(&mut app, name, &photo);
            app.submit_member_form().await;
        }
        assert_eq!(app.visible_members().len(), 2);

        app.search_query = "niran".to_string();
        assert_eq!(app.visible_members().len(), 1);
        assert_eq!(app.selected_member().unwrap().first_name, "Niran");
    }

    #[test]
    fn test_cancel_form_clears_edit_state() {
        let mut app = test_app();
        app.open_add_form();
        app.cancel_member_form();
        assert!(app.member_form.is_none());
        assert_eq!(app.state, AppState::Normal);
        assert!(!app.roster.is_editing());
    }

    #[test]
    fn test_save_status_before_any_save() {
        let app = test_app();
        assert_eq!(app.save_status(), "Saved never");
    }

    fn member_fields(first: &str) -> MemberFields {
        MemberFields {
            first_name: first.to_string(),
            last_name: "Rakthai".to_string(),
            party: "Green".to_string(),
            work_history: "Nurse".to_string(),
            ..MemberFields::default()
        }
    }

    #[test]
    fn test_status_line_keeps_save_age_beside_message() {
        let mut app = test_app();
        app.subject_draft.name = "Math".to_string();
        app.add_subject();
        assert_eq!(app.status_line(), "Added Math | Saved never");

        let photo = PhotoUpload::new("p.jpg", "image/jpeg", vec![1]);
        app.roster.add_member(&member_fields("Nok"), Some(&photo)).unwrap();
        assert_eq!(app.status_line(), "Added Math | Saved just now");

        app.status_message = None;
        assert_eq!(app.status_line(), "Saved just now");
    }

    /// Repository whose writes always fail
    struct ReadOnlyRepository;

    impl RosterRepository for ReadOnlyRepository {
        fn load_all(&self) -> Vec<Member> {
            Vec::new()
        }

        fn save_all(&mut self, _members: &[Member]) -> Result<(), StoreError> {
            Err(StoreError::Io(std::io::Error::other("read-only")))
        }
    }

    #[test]
    fn test_status_line_shows_save_error_with_message() {
        let mut app = App::with_repository(Config::default(), Box::new(ReadOnlyRepository));
        let photo = PhotoUpload::new("p.jpg", "image/jpeg", vec![1]);
        app.roster.add_member(&member_fields("Nok"), Some(&photo)).unwrap();
        app.status_message = Some("Saved Mr. Nok Rakthai".to_string());

        let line = app.status_line();
        assert!(line.starts_with("Saved Mr. Nok Rakthai | Save failed:"));
        assert!(line.contains("read-only"));
    }
}
