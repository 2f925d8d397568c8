//! Use-case services.
//!
//! # Responsibility
//! - Orchestrate validation and repository calls for one signed-in user.
//! - Keep the CLI decoupled from storage details.

pub mod note_service;
