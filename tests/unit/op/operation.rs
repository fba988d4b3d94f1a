use super::*;
use crate::buffer::pixel::PixelBuffer;
use crate::color::format::{Format, SampleEncoding};
use crate::foundation::core::Rect;

fn all_ops() -> Vec<Operation> {
    let buffer = PixelBuffer::new(
        Rect::new(0, 0, 1, 1),
        Format::new(SampleEncoding::RgbaFloat, None),
    )
    .unwrap();
    vec![
        ShiftOp::default().into(),
        CastSpaceOp::default().into(),
        LinearSinusoidOp::default().into(),
        BufferSourceOp::new(buffer).into(),
    ]
}

#[test]
fn names_and_classes() {
    let got: Vec<_> = all_ops().iter().map(|op| (op.name(), op.class())).collect();
    assert_eq!(
        got,
        vec![
            ("shift", OpClass::AreaFilter),
            ("cast-space", OpClass::Composer),
            ("linear-sinusoid", OpClass::PositionRenderer),
            ("buffer-source", OpClass::Source),
        ]
    );
}

#[test]
fn pads_follow_class() {
    let names = |op: &Operation| op.input_pads().iter().map(|p| p.name).collect::<Vec<_>>();
    let ops = all_ops();
    assert_eq!(names(&ops[0]), vec![INPUT_PAD]);
    assert_eq!(names(&ops[1]), vec![INPUT_PAD, AUX_PAD]);
    assert!(names(&ops[2]).is_empty());
    assert!(names(&ops[3]).is_empty());
    assert!(ops[0].input_pads()[0].required);
    assert!(ops[1].input_pads().iter().all(|p| !p.required));
    assert!(ops[1].has_input_pad(AUX_PAD));
    assert!(!ops[0].has_input_pad(AUX_PAD));
}

#[test]
fn only_filters_and_composers_mandate_input() {
    assert!(OpClass::AreaFilter.mandates_input());
    assert!(OpClass::Composer.mandates_input());
    assert!(!OpClass::PositionRenderer.mandates_input());
    assert!(!OpClass::Source.mandates_input());
}

#[test]
fn only_cast_space_runs_in_place() {
    let in_place: Vec<_> = all_ops().iter().map(Operation::permits_in_place).collect();
    assert_eq!(in_place, vec![false, true, false, false]);
}

#[test]
fn buffer_source_has_no_properties() {
    let mut ops = all_ops();
    let src = &mut ops[3];
    assert_eq!(src.properties().unwrap(), serde_json::json!({}));
    assert!(src.property("anything").is_err());
    assert!(src.set_property("anything", serde_json::json!(1)).is_err());
}

#[test]
fn property_calls_reach_the_operation() {
    let mut op: Operation = ShiftOp::default().into();
    op.set_property("seed", serde_json::json!(99)).unwrap();
    assert_eq!(op.property("seed").unwrap(), serde_json::json!(99));
}
