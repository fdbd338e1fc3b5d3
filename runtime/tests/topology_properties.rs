//! Property-based tests for inverse-role consistency and document reading.

use cimrdf_runtime::{codec, Document, InstanceId, Session, Value};
use cimrdf_test_helpers::cim16_schema;
use proptest::prelude::*;

/// Creates `nodes` connectivity nodes and one terminal per entry of
/// `placement`, connected to the node it names. Every terminal sits on the
/// same breaker so the graph validates.
fn wire(nodes: usize, placement: &[usize]) -> (Session, Vec<InstanceId>, Vec<InstanceId>) {
    let mut session = Session::new(cim16_schema());
    let breaker = session.create("Breaker").expect("breaker");
    session.set(breaker, "normalOpen", true).expect("normalOpen");
    let nodes: Vec<_> = (0..nodes)
        .map(|_| session.create("ConnectivityNode").expect("node"))
        .collect();
    let mut terminals = Vec::new();
    for &at in placement {
        let terminal = session.create("Terminal").expect("terminal");
        session.set(terminal, "ConductingEquipment", breaker).expect("equipment");
        session.set(terminal, "ConnectivityNode", nodes[at]).expect("node");
        terminals.push(terminal);
    }
    (session, nodes, terminals)
}

fn placement() -> impl Strategy<Value = (usize, Vec<usize>)> {
    (1usize..5).prop_flat_map(|nodes| (Just(nodes), prop::collection::vec(0..nodes, 0..12)))
}

// =============================================================================
// Inverse roles
// =============================================================================

proptest! {
    /// Each node lists exactly the terminals placed on it, in placement order.
    #[test]
    fn prop_partner_lists_mirror_forward_writes((count, placed) in placement()) {
        let (session, nodes, terminals) = wire(count, &placed);
        for (index, node) in nodes.iter().enumerate() {
            let expected: Vec<Value> = placed
                .iter()
                .zip(&terminals)
                .filter(|(at, _)| **at == index)
                .map(|(_, terminal)| Value::Reference(*terminal))
                .collect();
            prop_assert_eq!(session.values(*node, "Terminals").expect("terminals"), expected.as_slice());
        }
    }

    /// The closure of all nodes covers every terminal and the breaker.
    #[test]
    fn prop_closure_reaches_every_terminal((count, placed) in placement()) {
        let (session, nodes, terminals) = wire(count, &placed);
        let reached = session.closure(nodes.iter().copied());
        let expected = count + terminals.len() + usize::from(!terminals.is_empty());
        prop_assert_eq!(reached.len(), expected);
    }
}

// =============================================================================
// Documents
// =============================================================================

proptest! {
    /// Reading a written topology rebuilds the same node populations.
    #[test]
    fn prop_written_topology_reads_back((count, placed) in placement()) {
        let (session, nodes, terminals) = wire(count, &placed);
        let mut document = Document::new();
        document.add_recursively(&session, nodes.iter().chain(&terminals).copied());
        let text = codec::to_string(&session, &document).expect("serialize");

        let mut copy = Session::new(cim16_schema());
        let read = codec::from_str(&mut copy, &text).expect("read");
        prop_assert_eq!(read.len(), document.len());
        for node in &nodes {
            let uri = session.instance(*node).expect("node").uri();
            let restored = copy.find(uri).expect("restored node");
            prop_assert_eq!(
                copy.values(restored, "Terminals").expect("terminals").len(),
                session.values(*node, "Terminals").expect("terminals").len()
            );
        }
    }

    /// Names survive escaping, including markup characters and whitespace.
    #[test]
    fn prop_names_survive_the_codec(name in "\\PC{0,40}") {
        let mut session = Session::new(cim16_schema());
        let node = session.create("ConnectivityNode").expect("node");
        session.set(node, "name", name.as_str()).expect("name");
        let text = codec::to_string(&session, &[node].into_iter().collect()).expect("serialize");

        let mut copy = Session::new(cim16_schema());
        let read = codec::from_str(&mut copy, &text).expect("read");
        let restored = read.iter().next().copied().expect("member");
        prop_assert_eq!(copy.value(restored, "name").expect("name"), Some(&Value::String(name)));
    }
}
