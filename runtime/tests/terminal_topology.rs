//! Builds a small switching topology, writes it, and reads it back.

use bigdecimal::BigDecimal;
use cimrdf_runtime::{
    codec, CodecError, Document, InstanceId, RuntimeConfig, Session, Severity, ValidationError,
    ValidationReport, Value,
};
use cimrdf_test_helpers::cim16_schema;

struct Bay {
    session: Session,
    breaker: InstanceId,
    node: InstanceId,
    terminals: Vec<InstanceId>,
}

/// A breaker with three terminals, all on one connectivity node.
fn bay() -> Bay {
    let mut session = Session::new(cim16_schema());
    let breaker = session.create("Breaker").expect("breaker");
    session.set(breaker, "normalOpen", "false").expect("normalOpen");
    session.set(breaker, "ratedCurrent", "1250.5").expect("ratedCurrent");
    session.set(breaker, "name", "Q1").expect("name");
    let node = session.create("ConnectivityNode").expect("node");
    let mut terminals = Vec::new();
    for (sequence, phases) in [(1, "ABC"), (2, "PhaseCode.ABCN"), (3, "N")] {
        let terminal = session.create("Terminal").expect("terminal");
        session.set(terminal, "ConductingEquipment", breaker).expect("equipment");
        session.set(terminal, "ConnectivityNode", node).expect("node");
        session.set(terminal, "sequenceNumber", sequence).expect("sequence");
        session.set(terminal, "phases", phases).expect("phases");
        terminals.push(terminal);
    }
    Bay {
        session,
        breaker,
        node,
        terminals,
    }
}

fn references(ids: &[InstanceId]) -> Vec<Value> {
    ids.iter().copied().map(Value::Reference).collect()
}

#[test]
fn forward_writes_fill_both_partner_lists() {
    let bay = bay();
    assert_eq!(
        bay.session.values(bay.node, "Terminals").expect("terminals"),
        references(&bay.terminals)
    );
    assert_eq!(
        bay.session
            .values(bay.breaker, "ConductingEquipment.Terminals")
            .expect("terminals"),
        references(&bay.terminals)
    );
    for terminal in &bay.terminals {
        assert_eq!(bay.session.validate(*terminal), Ok(()));
    }
}

#[test]
fn repeating_a_write_changes_nothing() {
    let mut bay = bay();
    let before = bay.session.clone();
    for terminal in bay.terminals.clone() {
        bay.session.set(terminal, "ConnectivityNode", bay.node).expect("relink");
        bay.session.add(bay.node, "Terminals", terminal).expect("readd");
    }
    for (id, instance) in before.instances() {
        let after = bay.session.instance(id).expect("instance");
        for ((_, old), (_, new)) in instance.slots().zip(after.slots()) {
            assert_eq!(old, new);
        }
    }
}

#[test]
fn reassigning_a_terminal_keeps_the_old_node_link() {
    let mut bay = bay();
    let other = bay.session.create("ConnectivityNode").expect("node");
    bay.session
        .set(bay.terminals[0], "ConnectivityNode", other)
        .expect("reassign");
    assert_eq!(
        bay.session.values(other, "Terminals").expect("terminals"),
        references(&bay.terminals[..1])
    );
    assert_eq!(
        bay.session.values(bay.node, "Terminals").expect("terminals").len(),
        3
    );
}

#[test]
fn node_document_lists_every_terminal() {
    let bay = bay();
    let mut document = Document::new();
    document.add(bay.node);
    let text = codec::to_string(&bay.session, &document).expect("serialize");
    assert_eq!(text.matches("<cim:ConnectivityNode.Terminals rdf:resource=").count(), 3);
    for terminal in &bay.terminals {
        let uri = bay.session.instance(*terminal).expect("terminal").uri();
        assert!(text.contains(&format!("rdf:resource=\"{uri}\"")));
    }

    let report = ValidationReport::check(&bay.session, &document);
    assert!(report.all_passed());
    assert_eq!(report.warning_count(), 3);
    assert!(report.findings.iter().all(|f| f.severity == Severity::Warning));
}

#[test]
fn closure_document_round_trips() {
    let bay = bay();
    let mut document = Document::with_base("http://example.com/bay");
    assert_eq!(document.add_recursively(&bay.session, [bay.node]), 5);
    let mut written = Vec::new();
    codec::write_document(&bay.session, &document, &mut written).expect("write");

    let mut copy = Session::new(cim16_schema());
    let read = codec::read_document(&mut copy, written.as_slice()).expect("read");
    assert_eq!(read.len(), document.len());
    assert_eq!(read.base(), Some("http://example.com/bay"));

    for (original, restored) in document.iter().zip(read.iter()) {
        let original = bay.session.instance(*original).expect("original");
        let restored = copy.instance(*restored).expect("restored");
        assert_eq!(original.uri(), restored.uri());
        assert_eq!(original.class_name(), restored.class_name());
        for ((property, old), (_, new)) in original.slots().zip(restored.slots()) {
            let uris = |session: &Session, values: &[Value]| -> Vec<String> {
                values
                    .iter()
                    .map(|value| match value {
                        Value::Reference(id) => session.instance(*id).expect("target").uri().to_owned(),
                        literal => literal.to_string(),
                    })
                    .collect()
            };
            assert_eq!(
                uris(&bay.session, old.values()),
                uris(&copy, new.values()),
                "{} differs",
                property.id
            );
        }
    }

    let breaker = copy
        .find(bay.session.instance(bay.breaker).expect("breaker").uri())
        .expect("breaker read back");
    assert_eq!(
        copy.value(breaker, "ratedCurrent").expect("rated"),
        Some(&Value::Float("1250.5".parse::<BigDecimal>().expect("decimal")))
    );
    assert_eq!(copy.value(breaker, "normalOpen").expect("open"), Some(&Value::Boolean(false)));
}

#[test]
fn invalid_members_block_the_write() {
    let mut bay = bay();
    bay.session.clear(bay.terminals[1], "ConductingEquipment").expect("clear");
    let document: Document = bay.session.closure([bay.node]).into_iter().collect();
    match codec::to_string(&bay.session, &document) {
        Err(CodecError::Validation(ValidationError::MissingRequiredProperty { property, .. })) => {
            assert_eq!(property, "Terminal.ConductingEquipment");
        }
        other => panic!("expected a missing property, got {other:?}"),
    }
}

#[test]
fn transformer_ends_respect_their_bounds() {
    let mut session = Session::new(cim16_schema());
    let transformer = session.create("PowerTransformer").expect("transformer");
    let ends: Vec<_> = (0..4)
        .map(|_| session.create("PowerTransformerEnd").expect("end"))
        .collect();
    session
        .replace_all(transformer, "PowerTransformerEnd", ends.clone())
        .expect("ends");
    assert!(matches!(
        session.validate(transformer),
        Err(ValidationError::Multiplicity { count: 4, .. })
    ));
    session
        .replace_all(transformer, "PowerTransformerEnd", ends[..3].to_vec())
        .expect("ends");
    assert_eq!(session.validate(transformer), Ok(()));
    // every end was mirrored, including the one dropped by the second call
    for end in &ends {
        assert_eq!(
            session.value(*end, "PowerTransformer").expect("transformer"),
            Some(&Value::Reference(transformer))
        );
    }
}

#[test]
fn configured_sessions_write_with_their_settings() {
    let config = RuntimeConfig::from_toml_str(
        r#"
        namespace_prefix = "cim16"
        document_base = "http://example.com/grid"
        id_prefix = "grid-"
        "#,
    )
    .expect("config");
    let mut session = Session::with_config(cim16_schema(), config);
    let node = session.create("ConnectivityNode").expect("node");
    let document: Document = [node].into_iter().collect();
    let text = codec::to_string(&session, &document).expect("serialize");
    assert!(text.contains("<cim16:ConnectivityNode rdf:about=\"#grid-"));
    assert!(text.contains("xml:base=\"http://example.com/grid\""));

    let mut copy = Session::new(cim16_schema());
    let read = codec::from_str(&mut copy, &text).expect("read");
    let uri = session.instance(node).expect("node").uri();
    assert_eq!(read.iter().next().copied(), copy.find(uri));
}
