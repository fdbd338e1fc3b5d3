//! Builds a connectivity node with three terminals, prints its document and
//! reads it back.
//!
//! Run with: `RUST_LOG=debug cargo run --example terminal_document -p cimrdf-runtime [schema.rdf]`
//!
//! Without an argument the bundled CIM16 equipment excerpt is used.

use std::sync::Arc;

use anyhow::Context;
use cimrdf_runtime::{codec, Document, Session, ValidationReport};
use cimrdf_schema::{CompilerOptions, Schema};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let schema = match std::env::args().nth(1) {
        Some(path) => {
            let bytes = std::fs::read(&path).with_context(|| format!("reading {path}"))?;
            Arc::new(
                Schema::compile_bytes(&bytes, &CompilerOptions::default())
                    .with_context(|| format!("compiling {path}"))?,
            )
        }
        None => cimrdf_test_helpers::cim16_schema(),
    };
    println!(
        "Schema {}: {} classes, {} enumerations",
        schema.namespace(),
        schema.classes().count(),
        schema.enumerations().count()
    );

    let mut session = Session::new(schema);
    let breaker = session.create("Breaker")?;
    session.set(breaker, "normalOpen", false)?;
    let node = session.create("ConnectivityNode")?;
    for sequence in 1..=3 {
        let terminal = session.create("Terminal")?;
        session.set(terminal, "sequenceNumber", sequence)?;
        session.set(terminal, "ConductingEquipment", breaker)?;
        session.set(terminal, "ConnectivityNode", node)?;
    }

    let mut document = Document::new();
    document.add(node);
    let report = ValidationReport::check(&session, &document);
    println!(
        "Node alone: {} failures, {} warnings",
        report.failure_count(),
        report.warning_count()
    );

    document.add_recursively(&session, [node]);
    let text = codec::to_string(&session, &document)?;
    println!("{text}");

    let mut copy = Session::new(Arc::clone(session.schema()));
    let read = codec::from_str(&mut copy, &text)?;
    let restored = copy
        .find(session.instance(node).context("node")?.uri())
        .context("node was not read back")?;
    println!(
        "Read back {} instances; the node lists {} terminals",
        read.len(),
        copy.values(restored, "Terminals")?.len()
    );
    Ok(())
}
