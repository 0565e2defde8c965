use chrono::{DateTime, Utc};
use tracing::{error, info};
use uuid::Uuid;

use crate::error::RosterError;
use crate::models::{Member, MemberFields};
use crate::photo::PhotoUpload;
use crate::roster::validation::validate_member;
use crate::store::RosterRepository;
use crate::utils::{age_display, contains_ignore_case};

/// The member list, its edit state, and the repository it is saved through.
///
/// New members are prepended, so the list is newest first.
pub struct MemberRoster<R> {
    repository: R,
    members: Vec<Member>,
    /// Id of the member being edited, if any
    editing: Option<String>,
    last_saved_at: Option<DateTime<Utc>>,
    last_save_error: Option<String>,
}

impl<R: RosterRepository> MemberRoster<R> {
    /// Create a roster, loading whatever the repository currently holds.
    pub fn new(repository: R) -> Self {
        let members = repository.load_all();
        info!(count = members.len(), "Roster loaded");
        Self {
            repository,
            members,
            editing: None,
            last_saved_at: None,
            last_save_error: None,
        }
    }

    pub fn members(&self) -> &[Member] {
        &self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Member> {
        self.members.iter().find(|m| m.id == id)
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    // ===== Mutations =====

    /// Validate and prepend a new member. A photo is required.
    pub fn add_member(
        &mut self,
        fields: &MemberFields,
        photo: Option<&PhotoUpload>,
    ) -> Result<&Member, RosterError> {
        validate_member(fields, photo, true)?;
        let photo_url = photo.map(PhotoUpload::to_data_url).unwrap_or_default();

        let member = Member::from_fields(Uuid::new_v4().to_string(), fields, photo_url);
        info!(id = %member.id, name = %member.display_name(), "Member added");
        self.members.insert(0, member);
        self.persist();
        Ok(&self.members[0])
    }

    /// Validate and overwrite the fields of member `id`.
    ///
    /// The stored photo is replaced only when a new one is given.
    pub fn update_member(
        &mut self,
        id: &str,
        fields: &MemberFields,
        photo: Option<&PhotoUpload>,
    ) -> Result<&Member, RosterError> {
        let index = self
            .members
            .iter()
            .position(|m| m.id == id)
            .ok_or_else(|| RosterError::NotFound(id.to_string()))?;
        validate_member(fields, photo, false)?;

        let member = &mut self.members[index];
        member.apply_fields(fields);
        if let Some(photo) = photo {
            member.photo_url = photo.to_data_url();
        }
        info!(id, name = %member.display_name(), "Member updated");
        self.persist();
        Ok(&self.members[index])
    }

    /// Remove member `id`. Removing an unknown id does nothing.
    pub fn delete_member(&mut self, id: &str) -> Option<Member> {
        let index = self.members.iter().position(|m| m.id == id)?;
        let removed = self.members.remove(index);
        if self.editing.as_deref() == Some(id) {
            self.editing = None;
        }
        info!(id, name = %removed.display_name(), "Member deleted");
        self.persist();
        Some(removed)
    }

    // ===== Edit state =====

    /// Begin editing member `id`, returning its fields for the form.
    pub fn start_edit(&mut self, id: &str) -> Option<MemberFields> {
        let fields = self.get(id).map(MemberFields::from_member)?;
        self.editing = Some(id.to_string());
        Some(fields)
    }

    pub fn cancel_edit(&mut self) {
        self.editing = None;
    }

    pub fn editing_id(&self) -> Option<&str> {
        self.editing.as_deref()
    }

    pub fn is_editing(&self) -> bool {
        self.editing.is_some()
    }

    /// Submit the member form: update while editing, add otherwise.
    pub fn submit(
        &mut self,
        fields: &MemberFields,
        photo: Option<&PhotoUpload>,
    ) -> Result<&Member, RosterError> {
        match self.editing.clone() {
            Some(id) => {
                self.update_member(&id, fields, photo)?;
                self.editing = None;
                self.get(&id).ok_or(RosterError::NotFound(id))
            }
            None => self.add_member(fields, photo),
        }
    }

    // ===== Queries =====

    /// Members whose name, party, position or ministry contain `query`.
    pub fn search(&self, query: &str) -> Vec<&Member> {
        let query = query.trim();
        if query.is_empty() {
            return self.members.iter().collect();
        }
        self.members
            .iter()
            .filter(|m| Self::member_matches(m, query))
            .collect()
    }

    fn member_matches(member: &Member, query: &str) -> bool {
        contains_ignore_case(&member.display_name(), query)
            || contains_ignore_case(&member.party, query)
            || member.position.as_deref().is_some_and(|p| contains_ignore_case(p, query))
            || member.ministry.as_deref().is_some_and(|m| contains_ignore_case(m, query))
    }

    // ===== Persistence =====

    fn persist(&mut self) {
        match self.repository.save_all(&self.members) {
            Ok(()) => {
                self.last_saved_at = Some(Utc::now());
                self.last_save_error = None;
            }
            Err(e) => {
                error!(error = %e, "Failed to save roster");
                self.last_save_error = Some(e.to_string());
            }
        }
    }

    pub fn last_saved_at(&self) -> Option<DateTime<Utc>> {
        self.last_saved_at
    }

    /// "just now", "5m ago", ... or "never" when nothing was saved this session
    pub fn saved_age_display(&self) -> String {
        self.last_saved_at
            .map(age_display)
            .unwrap_or_else(|| "never".to_string())
    }

    pub fn last_save_error(&self) -> Option<&str> {
        self.last_save_error.as_deref()
    }
}

// ============================================================================
// Tests
// ============================================================================
