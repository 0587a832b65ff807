//! Subcommand handlers.

use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use tokensmith::store::CollectionId;
use tokensmith::{
    apply_collections, apply_flat, list_collections, FlatRequest, MemoryStore, Report,
    TokenDocument, VariableIndex, VariableStore,
};

use crate::cli::{Cli, Command, OutputMode};
use crate::{files, render};

/// How a command finished, mapped onto the process exit status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Done,
    Aborted,
}

impl Outcome {
    pub fn exit_code(self) -> ExitCode {
        match self {
            Outcome::Done => ExitCode::SUCCESS,
            Outcome::Aborted => ExitCode::from(2),
        }
    }
}

pub fn run(cli: &Cli) -> Result<Outcome> {
    match &cli.command {
        Command::Apply { document } => {
            let doc: TokenDocument = files::load_document(document)?;
            let Some(collections) = doc.into_collections() else {
                bail!(
                    "{} is a flat map; use `add-mode` to apply it to a collection",
                    document.display()
                );
            };

            let mut store = files::load_store(&cli.store)?;
            let mut index = VariableIndex::default();
            let report =
                apply_collections(&mut store, &mut index, &collections, &cli.batch_options());
            finish(cli, &store, &report)
        }
        Command::AddMode {
            document,
            collection,
            mode,
        } => {
            let doc: TokenDocument = files::load_document(document)?;
            let Some(values) = doc.into_flat() else {
                bail!(
                    "{} is a collections document; use `apply` instead",
                    document.display()
                );
            };

            let mut store = files::load_store(&cli.store)?;
            let request = FlatRequest {
                collection_id: target_collection(&store, collection),
                mode_name: mode.clone(),
                values,
            };
            let index = VariableIndex::build(&store);
            let report = apply_flat(&mut store, &index, &request, &cli.batch_options());
            finish(cli, &store, &report)
        }
        Command::Collections => {
            let store = files::load_store(&cli.store)?;
            let summaries = list_collections(&store);
            match cli.output {
                OutputMode::Json => println!(
                    "{}",
                    serde_json::to_string_pretty(&summaries)
                        .context("failed to serialize collections")?
                ),
                OutputMode::Text => print!("{}", render::collections(&summaries)),
            }
            Ok(Outcome::Done)
        }
    }
}

/// Accepts either a collection id or a collection name.
fn target_collection(store: &MemoryStore, selector: &str) -> CollectionId {
    let id = CollectionId::from(selector);
    if store.collection_by_id(&id).is_some() {
        return id;
    }
    store
        .collection_by_name(selector)
        .map(|c| c.id)
        .unwrap_or(id)
}

fn finish(cli: &Cli, store: &MemoryStore, report: &Report) -> Result<Outcome> {
    if cli.dry_run {
        tracing::info!("dry run, snapshot not written");
    } else {
        files::save_store(&cli.store, store)?;
    }

    match cli.output {
        OutputMode::Json => println!(
            "{}",
            serde_json::to_string_pretty(report).context("failed to serialize report")?
        ),
        OutputMode::Text => println!("{}", render::report(report)),
    }

    Ok(if report.is_aborted() {
        Outcome::Aborted
    } else {
        Outcome::Done
    })
}
