use serde::{Deserialize, Serialize};

/// Titles offered by the member form, in cycling order.
pub const TITLES: [&str; 4] = ["Mr.", "Mrs.", "Ms.", "Dr."];

/// Title pre-selected on an empty form
pub const DEFAULT_TITLE: &str = "Mr.";

/// A House member as stored in the roster.
///
/// Field names follow the persisted layout (`firstName`, `photoUrl`, ...).
/// Optional fields that are unset are left out of the JSON entirely.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct Member {
    pub id: String,
    pub title: String,
    pub first_name: String,
    pub last_name: String,
    pub party: String,
    pub work_history: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ministry: Option<String>,
    /// Photo as a `data:` URL
    pub photo_url: String,
}

impl Member {
    /// Build a record from validated form input.
    pub(crate) fn from_fields(id: String, fields: &MemberFields, photo_url: String) -> Self {
        let mut member = Self {
            id,
            title: String::new(),
            first_name: String::new(),
            last_name: String::new(),
            party: String::new(),
            work_history: String::new(),
            position: None,
            ministry: None,
            photo_url,
        };
        member.apply_fields(fields);
        member
    }

    /// Overwrite every form-editable field, leaving `id` and `photo_url` alone.
    pub(crate) fn apply_fields(&mut self, fields: &MemberFields) {
        self.title = fields.title.trim().to_string();
        self.first_name = fields.first_name.trim().to_string();
        self.last_name = fields.last_name.trim().to_string();
        self.party = fields.party.trim().to_string();
        self.work_history = fields.work_history.trim().to_string();
        self.position = non_empty(&fields.position);
        self.ministry = non_empty(&fields.ministry);
    }

    /// Title, first and last name, e.g. "Dr. Somchai Jaidee"
    pub fn display_name(&self) -> String {
        format!("{} {} {}", self.title, self.first_name, self.last_name)
            .trim()
            .to_string()
    }

    /// Position and ministry combined for list display
    pub fn position_display(&self) -> Option<String> {
        match (&self.position, &self.ministry) {
            (Some(pos), Some(min)) => Some(format!("{} ({})", pos, min)),
            (Some(pos), None) => Some(pos.clone()),
            (None, Some(min)) => Some(min.clone()),
            (None, None) => None,
        }
    }
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Raw member form input, before validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberFields {
    pub title: String,
    pub first_name: String,
    pub last_name: String,
    pub party: String,
    pub work_history: String,
    pub position: String,
    pub ministry: String,
}

impl Default for MemberFields {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            first_name: String::new(),
            last_name: String::new(),
            party: String::new(),
            work_history: String::new(),
            position: String::new(),
            ministry: String::new(),
        }
    }
}

impl MemberFields {
    /// Pre-fill a form from an existing record
    pub fn from_member(member: &Member) -> Self {
        Self {
            title: member.title.clone(),
            first_name: member.first_name.clone(),
            last_name: member.last_name.clone(),
            party: member.party.clone(),
            work_history: member.work_history.clone(),
            position: member.position.clone().unwrap_or_default(),
            ministry: member.ministry.clone().unwrap_or_default(),
        }
    }

    /// Empty form with a specific title pre-selected
    pub fn with_title(title: &str) -> Self {
        Self {
            title: title.to_string(),
            ..Self::default()
        }
    }
}
