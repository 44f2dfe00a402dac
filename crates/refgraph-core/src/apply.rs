//! Functional-boundary apply function
//!
//! `apply` takes ownership of the committed `Content`, runs one command in a
//! transaction and validates the result.
//!
//! ## Atomicity Contract
//!
//! - **All-or-nothing**: either the command and its whole cascade succeed and
//!   a validated new state is returned, or an error is returned and nothing
//!   of the cascade survives
//! - **No panics**: invalid input returns typed errors
//!
//! The caller keeps a clone of the previous state if it needs to continue
//! after an error; the engine itself never retries.
//!
//! ## Example
//!
//! ```
//! use refgraph_core::catalog::NullCatalog;
//! use refgraph_core::events::NullSink;
//! use refgraph_core::{apply, Appstructs, Command, Content, EngineConfig, Environment, ResourceType};
//!
//! let config = EngineConfig::default();
//! let (mut sink, mut catalog) = (NullSink, NullCatalog);
//! let state = Content::new();
//! let cmd = Command::CreateItem {
//!     parent: state.root(),
//!     name: Some("doc".to_string()),
//!     item_type: ResourceType::Document,
//!     appstructs: Appstructs::new(),
//!     version_appstructs: Appstructs::new(),
//! };
//!
//! let applied = apply(state, cmd, Environment::new(&config, &mut sink, &mut catalog)).unwrap();
//! assert!(applied.outcome.created().is_some());
//! ```

use std::time::Instant;

use crate::changelog::Changelog;
use crate::commands::{Command, Outcome};
use crate::errors::Result;
use crate::resources::create_resource;
use crate::rules::validation::validate_content;
use crate::sheets::{check_reference_write, ensure_unmanaged, set_sheet_data};
use crate::transaction::{Content, Environment, Transaction};
use crate::versions::{create_item, create_version};
use crate::{log_op_end, log_op_error, log_op_start};

/// New state after a successful command
#[derive(Debug, Clone)]
pub struct Applied {
    pub content: Content,
    pub changelog: Changelog,
    pub outcome: Outcome,
}

/// Apply a command to `state`, returning the new state
///
/// # Errors
///
/// Returns the typed error of the failing operation, or an invariant error
/// if the resulting content fails validation. No part of the cascade is
/// visible in that case.
pub fn apply(state: Content, cmd: Command, env: Environment<'_>) -> Result<Applied> {
    let op = cmd.op_name();
    let transaction_id = env.context.transaction_id.clone();
    let started = Instant::now();
    log_op_start!(op, transaction_id = %transaction_id);

    let mut tx = Transaction::begin(state, env);
    let result = execute(&mut tx, cmd).and_then(|outcome| {
        validate_content(tx.content(), tx.config())?;
        Ok(outcome)
    });
    let duration_ms = started.elapsed().as_millis() as u64;

    match result {
        Ok(outcome) => {
            let (content, changelog) = tx.commit();
            log_op_end!(op, duration_ms = duration_ms, transaction_id = %transaction_id);
            Ok(Applied {
                content,
                changelog,
                outcome,
            })
        }
        Err(err) => {
            log_op_error!(op, err.clone(), duration_ms = duration_ms, transaction_id = %transaction_id);
            Err(err)
        }
    }
}

fn execute(tx: &mut Transaction<'_>, cmd: Command) -> Result<Outcome> {
    match cmd {
        Command::CreateResource {
            parent,
            name,
            resource_type,
            appstructs,
        } => {
            let oid = create_resource(tx, parent, name.as_deref(), resource_type, &appstructs)?;
            Ok(Outcome::Created(oid))
        }

        Command::CreateItem {
            parent,
            name,
            item_type,
            appstructs,
            version_appstructs,
        } => {
            let handle = create_item(
                tx,
                parent,
                name.as_deref(),
                item_type,
                &appstructs,
                &version_appstructs,
            )?;
            Ok(Outcome::ItemCreated(handle))
        }

        Command::CreateVersion {
            item,
            follows,
            appstructs,
            root_versions,
        } => {
            let version = create_version(tx, item, &follows, &appstructs, &root_versions)?;
            Ok(Outcome::VersionCreated(version))
        }

        Command::SetSheet {
            resource,
            sheet,
            data,
        } => {
            ensure_unmanaged(sheet, &data)?;
            set_sheet_data(tx, resource, sheet, &data)?;
            Ok(Outcome::Updated)
        }

        Command::SetReferences {
            source,
            targets,
            reftype,
            send_event,
        } => {
            check_reference_write(tx, source, reftype, &targets)?;
            let change = tx.set_references(source, &targets, reftype, send_event)?;
            if !change.is_empty() {
                tx.mark_modified(source);
            }
            Ok(Outcome::ReferencesSet(change))
        }

        Command::NotifyRemoval { resource } => {
            let sent = tx.notify_removal(resource)?;
            Ok(Outcome::RemovalNotified(sent))
        }
    }
}
