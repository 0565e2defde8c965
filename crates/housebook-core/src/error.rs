use std::fmt;

use thiserror::Error;

/// Member form field that can fail validation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Title,
    FirstName,
    LastName,
    Party,
    WorkHistory,
    Photo,
}

impl Field {
    pub fn label(&self) -> &'static str {
        match self {
            Field::Title => "Title",
            Field::FirstName => "First name",
            Field::LastName => "Last name",
            Field::Party => "Party",
            Field::WorkHistory => "Work history",
            Field::Photo => "Photo",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct FieldError {
    pub field: Field,
    pub message: String,
}

impl FieldError {
    pub fn new(field: Field, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// All field errors from one submit. Never empty when returned as an error.
#[derive(Debug, Clone, PartialEq, Eq, Default, Error)]
#[error("{} invalid field(s)", .0.len())]
pub struct ValidationErrors(pub Vec<FieldError>);

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn push(&mut self, field: Field, message: impl Into<String>) {
        self.0.push(FieldError::new(field, message));
    }

    /// The error reported for `field`, if any
    pub fn get(&self, field: Field) -> Option<&FieldError> {
        self.0.iter().find(|e| e.field == field)
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.0.iter()
    }
}

#[derive(Error, Debug)]
pub enum RosterError {
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("Member not found: {0}")]
    NotFound(String),
}

impl RosterError {
    /// Field errors carried by this error, empty for non-validation errors
    pub fn field_errors(&self) -> &[FieldError] {
        match self {
            RosterError::Validation(errors) => &errors.0,
            RosterError::NotFound(_) => &[],
        }
    }
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

#[derive(Error, Debug)]
pub enum PhotoError {
    #[error("Could not read photo {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
