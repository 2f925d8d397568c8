//! Domain model for notes and accounts.
//!
//! # Invariants
//! - Every note is identified by a stable `NoteId` and owned by one account.
//! - Deletion is a hard delete; there are no tombstones.

pub mod account;
pub mod note;
