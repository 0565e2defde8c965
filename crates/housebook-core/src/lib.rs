//! Core library for housebook.
//!
//! Everything here is independent of the terminal front end:
//!
//! - `models`: `Grade`, `Subject`, `Member` and the form input types
//! - `grades`: the `GradeTracker` and GPA computation
//! - `roster`: the `MemberRoster`, field validation and edit state
//! - `photo`: photo uploads and data URL conversion
//! - `store`: key-value stores and the roster repository
//! - `config`: application configuration and directory resolution

pub mod config;
pub mod error;
pub mod grades;
pub mod models;
pub mod photo;
pub mod roster;
pub mod store;
pub mod utils;

pub use config::Config;
pub use error::{Field, FieldError, PhotoError, RosterError, StoreError, ValidationErrors};
pub use grades::{compute_gpa, GpaResult, GpaStanding, GradeTracker, SubjectDraft};
pub use models::{Grade, Member, MemberFields, Subject, TITLES};
pub use photo::PhotoUpload;
pub use roster::MemberRoster;
pub use store::{FileStore, KeyValueRepository, KeyValueStore, MemoryStore, RosterRepository};
