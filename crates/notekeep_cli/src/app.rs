//! Wiring from configuration to storage, auth provider and note service.

use crate::render::{note_detail, note_summary};
use crate::Command;
use anyhow::{anyhow, bail, Context, Result};
use chrono::Utc;
use log::info;
use notekeep_core::db::open_db;
use notekeep_core::{
    AppConfig, AuthBackendKind, AuthProvider, Credentials, HostedAuthProvider, KeyValueStore,
    LocalAuthProvider, NoteService, RestIdentityBackend, Session, SqliteKeyValueStore,
    StorageAccountRepository, StorageNoteRepository,
};
use std::io::Write;
use std::path::Path;

/// Reads the config at `path`, or at the platform default location.
pub fn load_config(path: Option<&Path>) -> Result<AppConfig> {
    let path = match path {
        Some(path) => path.to_path_buf(),
        None => match AppConfig::default_path() {
            Some(path) => path,
            None => return Ok(AppConfig::default()),
        },
    };
    AppConfig::load(&path).with_context(|| format!("loading config {}", path.display()))
}

/// Builds the configured auth provider over `store`.
pub fn auth_provider<'a, S>(config: &AppConfig, store: S) -> Result<Box<dyn AuthProvider + 'a>>
where
    S: KeyValueStore + 'a,
{
    match config.auth.backend {
        AuthBackendKind::Local => Ok(Box::new(LocalAuthProvider::new(
            StorageAccountRepository::new(store),
        ))),
        AuthBackendKind::Hosted => {
            let hosted = config
                .auth
                .hosted
                .as_ref()
                .ok_or_else(|| anyhow!("auth.backend is hosted but [auth.hosted] is missing"))?;
            let backend = RestIdentityBackend::new(
                hosted.base_url.as_str(),
                hosted.api_key.as_str(),
                hosted.users_table.as_str(),
            )?;
            Ok(Box::new(HostedAuthProvider::new(backend, store)))
        }
    }
}

/// Executes one command against the configured storage area, writing
/// user-facing output to `out`.
///
/// Register, login and logout never consult the backend for the stored
/// session, so logging out works while a hosted backend is unreachable.
pub fn run(config: &AppConfig, command: Command, out: &mut impl Write) -> Result<()> {
    let db_path = config.db_path()?;
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating {}", parent.display()))?;
    }
    let conn = open_db(&db_path).with_context(|| format!("opening {}", db_path.display()))?;
    let store = SqliteKeyValueStore::try_new(&conn)?;
    let mut auth = auth_provider(config, &store)?;

    match command {
        Command::Register {
            username,
            password,
            confirm,
        } => {
            let credentials = Credentials::for_registration(&username, &password, &confirm)?;
            let session = auth.register(&credentials)?;
            writeln!(out, "Account created. Logged in as {}.", session.username)?;
        }
        Command::Login { username, password } => {
            let credentials = Credentials::for_login(&username, &password)?;
            let session = auth.login(&credentials)?;
            writeln!(out, "Logged in as {}.", session.username)?;
        }
        Command::Logout => {
            auth.logout()?;
            writeln!(out, "Logged out.")?;
        }
        Command::Whoami => match auth.restore_session()? {
            Some(session) => writeln!(out, "{}", session.username)?,
            None => writeln!(out, "Not logged in.")?,
        },
        notes_command => {
            let session = auth
                .restore_session()?
                .ok_or_else(|| anyhow!("not logged in; run `notekeep login`"))?;
            run_notes(&store, &session, notes_command, out)?;
        }
    }
    Ok(())
}

fn run_notes<S: KeyValueStore>(
    store: S,
    session: &Session,
    command: Command,
    out: &mut impl Write,
) -> Result<()> {
    let service = NoteService::new(StorageNoteRepository::new(store), session);
    let now = Utc::now();

    match command {
        Command::List => {
            let notes = service.list_notes()?;
            if notes.is_empty() {
                writeln!(out, "No notes yet. Create one with `notekeep add --content ...`.")?;
            }
            for note in &notes {
                writeln!(out, "{}", note_summary(note, now))?;
            }
        }
        Command::Show { id } => {
            let note = service
                .get_note(id)?
                .ok_or_else(|| anyhow!("note not found: {id}"))?;
            writeln!(out, "{}", note_detail(&note, now))?;
        }
        Command::Add { title, content } => {
            let note = service.create_note(&title, &content)?;
            writeln!(out, "Note created: {}", note.id)?;
        }
        Command::Edit { id, title, content } => {
            let existing = service
                .get_note(id)?
                .ok_or_else(|| anyhow!("note not found: {id}"))?;
            let title = title.unwrap_or(existing.title);
            let content = content.unwrap_or(existing.content);
            service.update_note(id, &title, &content)?;
            writeln!(out, "Note updated: {id}")?;
        }
        Command::Delete { id } => {
            service.delete_note(id)?;
            writeln!(out, "Note deleted: {id}")?;
        }
        other => bail!("not a notes command: {other:?}"),
    }

    info!("event=cli_command module=cli status=ok");
    Ok(())
}
