//! House member roster.
//!
//! `MemberRoster` owns the in-memory list and the edit state, and writes the
//! whole list through its `RosterRepository` after every change. Form input
//! is checked by the `validation` module before anything is mutated.

pub mod manager;
pub mod validation;

pub use manager::MemberRoster;
pub use validation::validate_member;
