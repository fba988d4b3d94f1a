use super::*;
use crate::color::format::SampleEncoding;
use crate::op::cast_space::CastSpaceOp;
use crate::op::linear_sinusoid::LinearSinusoidOp;
use crate::op::{AUX_PAD, INPUT_PAD};

#[test]
fn pads_are_inputs_then_output() {
    let node = Node::new(NodeId(4), CastSpaceOp::default().into());
    let pads: Vec<_> = node.pads().iter().map(|p| (p.name(), p.direction())).collect();
    assert_eq!(
        pads,
        vec![
            (INPUT_PAD, PadDirection::Input),
            (AUX_PAD, PadDirection::Input),
            (OUTPUT_PAD, PadDirection::Output),
        ]
    );
    assert_eq!(node.input_pads().count(), 2);
    assert_eq!(node.id(), NodeId(4));
}

#[test]
fn generator_only_has_output() {
    let node = Node::new(NodeId(0), LinearSinusoidOp::default().into());
    assert_eq!(node.pads().len(), 1);
    assert!(node.pad(OUTPUT_PAD).is_some());
    assert!(node.pad(INPUT_PAD).is_none());
}

#[test]
fn producers_and_formats_are_per_pad() {
    let mut node = Node::new(NodeId(1), CastSpaceOp::default().into());
    assert_eq!(node.set_producer(AUX_PAD, Some(NodeId(7))), None);
    assert_eq!(node.producer(AUX_PAD), Some(NodeId(7)));
    assert_eq!(node.producer(INPUT_PAD), None);
    assert_eq!(node.set_producer(AUX_PAD, None), Some(NodeId(7)));

    assert!(node.output_format().is_none());
    node.bind_format(OUTPUT_PAD, Format::new(SampleEncoding::RgbaFloat, None));
    assert_eq!(
        node.output_format().map(|f| f.encoding),
        Some(SampleEncoding::RgbaFloat)
    );
    node.set_bounding_box(Rect::new(1, 2, 3, 4));
    assert_eq!(node.bounding_box(), Rect::new(1, 2, 3, 4));
}
