use super::*;
use crate::op::cast_space::{CastSpaceOp, CastSpaceParams};
use crate::op::linear_sinusoid::LinearSinusoidOp;
use crate::op::shift::ShiftOp;

fn space_of(graph: &Graph, id: NodeId, pad: &str) -> Option<String> {
    graph
        .node(id)
        .unwrap()
        .pad(pad)
        .and_then(|p| p.format())
        .and_then(|f| f.space.as_ref())
        .map(|s| s.name().to_string())
}

fn encoding_of(graph: &Graph, id: NodeId, pad: &str) -> Option<SampleEncoding> {
    graph
        .node(id)
        .unwrap()
        .pad(pad)
        .and_then(|p| p.format())
        .map(|f| f.encoding)
}

fn pipeline(space: &str) -> (Graph, [NodeId; 3]) {
    let mut g = Graph::new();
    let a = g.add_node(LinearSinusoidOp::default());
    let b = g.add_node(ShiftOp::default());
    let c = g.add_node(
        CastSpaceOp::new(CastSpaceParams {
            space: space.to_string(),
            icc_profile: None,
        })
        .unwrap(),
    );
    g.connect(a, b, INPUT_PAD).unwrap();
    g.connect(b, c, INPUT_PAD).unwrap();
    (g, [a, b, c])
}

#[test]
fn formats_flow_downstream() {
    let engine = Engine::default();
    let (mut g, [a, b, c]) = pipeline("Rec2020");
    let report = engine.prepare(&mut g).unwrap();
    assert_eq!(report.order, vec![a, b, c]);
    assert!(report.warnings.is_empty());

    assert_eq!(encoding_of(&g, a, OUTPUT_PAD), Some(SampleEncoding::YFloat));
    assert_eq!(space_of(&g, a, OUTPUT_PAD).as_deref(), Some(DEFAULT_SPACE));
    assert_eq!(encoding_of(&g, b, INPUT_PAD), Some(SampleEncoding::YFloat));
    assert_eq!(encoding_of(&g, b, OUTPUT_PAD), Some(SampleEncoding::YFloat));
    assert_eq!(encoding_of(&g, c, INPUT_PAD), Some(SampleEncoding::RgbaFloat));
    assert_eq!(space_of(&g, c, INPUT_PAD).as_deref(), Some(DEFAULT_SPACE));
    assert_eq!(encoding_of(&g, c, OUTPUT_PAD), Some(SampleEncoding::RgbaFloat));
    assert_eq!(space_of(&g, c, OUTPUT_PAD).as_deref(), Some("Rec2020"));
}

#[test]
fn bounding_boxes_are_cached_on_nodes() {
    let engine = Engine::default();
    let (mut g, [a, b, c]) = pipeline("sRGB");
    engine.prepare(&mut g).unwrap();
    for id in [a, b, c] {
        assert!(g.node(id).unwrap().bounding_box().is_infinite());
    }
}

#[test]
fn unresolved_space_is_a_warning() {
    let engine = Engine::default();
    let (mut g, [_, _, c]) = pipeline("Nonexistent");
    let report = engine.prepare(&mut g).unwrap();
    assert_eq!(report.warnings.len(), 1);
    assert_eq!(report.warnings[0].node, c);
    assert!(matches!(
        report.warnings[0].error,
        PixgraphError::UnresolvedFormat(_)
    ));
    assert_eq!(space_of(&g, c, OUTPUT_PAD), None);
    assert_eq!(encoding_of(&g, c, OUTPUT_PAD), Some(SampleEncoding::RgbaFloat));
}

#[test]
fn prepare_is_idempotent() {
    let engine = Engine::default();
    let (mut g, _) = pipeline("ACEScg");
    engine.prepare(&mut g).unwrap();
    let once = g.clone();
    let report = engine.prepare(&mut g).unwrap();
    assert!(report.invalidated.is_empty());
    for id in g.node_ids() {
        assert_eq!(g.node(id).unwrap(), once.node(id).unwrap());
    }
}

#[test]
fn cycles_fail_and_keep_the_graph_dirty() {
    let engine = Engine::default();
    let mut g = Graph::new();
    let a = g.add_node(ShiftOp::default());
    let b = g.add_node(ShiftOp::default());
    g.connect(a, b, INPUT_PAD).unwrap();
    g.connect(b, a, INPUT_PAD).unwrap();
    assert!(matches!(engine.prepare(&mut g), Err(PixgraphError::Graph(_))));
    assert!(g.needs_prepare());
}

#[test]
fn edits_invalidate_downstream_nodes() {
    let engine = Engine::default();
    let (mut g, [a, b, c]) = pipeline("sRGB");
    let first = engine.prepare(&mut g).unwrap();
    assert_eq!(first.invalidated, vec![a, b, c]);

    g.set_property(b, "seed", serde_json::json!(8)).unwrap();
    let second = engine.prepare(&mut g).unwrap();
    assert_eq!(second.invalidated, vec![b, c]);
}

#[test]
fn aux_space_reaches_cast_output() {
    let engine = Engine::default();
    let (mut g, [_, _, c]) = pipeline("ProPhoto");
    let tagged = g.add_node(LinearSinusoidOp::default());
    let aux_cast = g.add_node(
        CastSpaceOp::new(CastSpaceParams {
            space: "Adobish".to_string(),
            icc_profile: None,
        })
        .unwrap(),
    );
    g.connect(tagged, aux_cast, INPUT_PAD).unwrap();
    g.connect(aux_cast, c, AUX_PAD).unwrap();
    engine.prepare(&mut g).unwrap();
    assert_eq!(space_of(&g, c, OUTPUT_PAD).as_deref(), Some("Adobish"));
}
