//! Data models for housebook entities.
//!
//! - `Grade`, `Subject`: letter grades and the subjects they are recorded for
//! - `Member`, `MemberFields`: House member records and the form input used
//!   to create or edit them

pub mod grade;
pub mod member;

pub use grade::{Grade, ParseGradeError, Subject};
pub use member::{Member, MemberFields, DEFAULT_TITLE, TITLES};
