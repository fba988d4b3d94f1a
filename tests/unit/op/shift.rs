use super::*;
use crate::color::format::{Format, SampleEncoding};

fn gray() -> Format {
    Format::new(SampleEncoding::YFloat, None)
}

/// Luma buffer where pixel `(x, y)` holds `y * 1000 + x`.
fn ramp(extent: Rect) -> PixelBuffer {
    let mut data = Vec::new();
    for y in extent.y..extent.y + extent.height {
        for x in extent.x..extent.x + extent.width {
            data.push((y * 1000 + x) as f32);
        }
    }
    PixelBuffer::from_samples(extent, gray(), data).unwrap()
}

fn run(op: &ShiftOp, input: &PixelBuffer, region: Rect) -> PixelBuffer {
    let mut out = PixelBuffer::new(region, gray()).unwrap();
    op.process(input, &mut out, region).unwrap();
    out
}

fn op(shift: i32, direction: ShiftDirection, seed: u32) -> ShiftOp {
    ShiftOp::new(ShiftParams {
        shift,
        direction,
        seed,
    })
    .unwrap()
}

#[test]
fn defaults_match_documented_values() {
    let p = ShiftParams::default();
    assert_eq!(p.shift, 5);
    assert_eq!(p.direction, ShiftDirection::Horizontal);
    assert_eq!(p.seed, 0);
}

#[test]
fn shift_range_is_validated() {
    assert!(ShiftOp::new(ShiftParams {
        shift: MAX_SHIFT + 1,
        ..ShiftParams::default()
    })
    .is_err());
    assert!(ShiftOp::new(ShiftParams {
        shift: -1,
        ..ShiftParams::default()
    })
    .is_err());
    assert!(ShiftOp::new(ShiftParams {
        shift: MAX_SHIFT,
        ..ShiftParams::default()
    })
    .is_ok());
}

#[test]
fn margins_follow_direction() {
    assert_eq!(
        op(7, ShiftDirection::Horizontal, 0).margins(),
        AreaMargins {
            left: 7,
            right: 7,
            top: 0,
            bottom: 0
        }
    );
    assert_eq!(
        op(7, ShiftDirection::Vertical, 0).margins(),
        AreaMargins {
            left: 0,
            right: 0,
            top: 7,
            bottom: 7
        }
    );
}

#[test]
fn displacement_is_bounded_and_pure() {
    let a = op(5, ShiftDirection::Horizontal, 42);
    let b = op(5, ShiftDirection::Horizontal, 42);
    let mut seen_nonzero = false;
    for p in -200..200 {
        let d = a.displacement(p);
        assert!((-5..=5).contains(&d), "displacement {d} at {p}");
        assert_eq!(d, b.displacement(p));
        seen_nonzero |= d != 0;
    }
    assert!(seen_nonzero);
}

#[test]
fn seed_changes_the_pattern() {
    let a = op(50, ShiftDirection::Horizontal, 1);
    let b = op(50, ShiftDirection::Horizontal, 2);
    assert!((0..64).any(|p| a.displacement(p) != b.displacement(p)));
}

#[test]
fn overlapping_regions_agree() {
    let s = op(5, ShiftDirection::Horizontal, 9);
    let input = ramp(Rect::new(-10, 0, 110, 40));
    let left = run(&s, &input, Rect::new(0, 30, 50, 1));
    let right = run(&s, &input, Rect::new(20, 30, 60, 1));
    for x in 20..50 {
        assert_eq!(left.pixel(x, 30), right.pixel(x, 30), "x = {x}");
    }
}

#[test]
fn rows_copy_from_displaced_offset() {
    let s = op(3, ShiftDirection::Horizontal, 5);
    let input = ramp(Rect::new(-5, 0, 30, 10));
    let out = run(&s, &input, Rect::new(0, 0, 20, 10));
    for y in 0..10 {
        let d = s.displacement(y);
        for x in 0..20 {
            let want = (y * 1000 + x + d) as f32;
            assert_eq!(out.pixel(x, y).unwrap()[0], want, "({x}, {y})");
        }
    }
}

#[test]
fn columns_copy_from_displaced_offset() {
    let s = op(3, ShiftDirection::Vertical, 5);
    let input = ramp(Rect::new(0, -5, 10, 30));
    let out = run(&s, &input, Rect::new(0, 0, 10, 20));
    for x in 0..10 {
        let d = s.displacement(x);
        for y in 0..20 {
            let want = ((y + d) * 1000 + x) as f32;
            assert_eq!(out.pixel(x, y).unwrap()[0], want, "({x}, {y})");
        }
    }
}

#[test]
fn reads_past_the_edge_repeat_edge_pixels() {
    let s = op(200, ShiftDirection::Horizontal, 3);
    let input = ramp(Rect::new(0, 0, 4, 8));
    let out = run(&s, &input, Rect::new(0, 0, 4, 8));
    for y in 0..8 {
        let d = s.displacement(y);
        for x in 0..4 {
            let sx = (x + d).clamp(0, 3);
            assert_eq!(out.pixel(x, y).unwrap()[0], (y * 1000 + sx) as f32);
        }
    }
}

#[test]
fn zero_shift_is_identity() {
    let s = op(0, ShiftDirection::Vertical, 77);
    let input = ramp(Rect::new(0, 0, 6, 6));
    assert_eq!(run(&s, &input, Rect::new(0, 0, 6, 6)).samples(), input.samples());
}

#[test]
fn properties_roundtrip_through_json() {
    let mut s = ShiftOp::default();
    assert_eq!(s.property("shift").unwrap(), serde_json::json!(5));
    assert_eq!(s.property("direction").unwrap(), serde_json::json!("horizontal"));

    s.set_property("direction", serde_json::json!("vertical")).unwrap();
    s.set_property("shift", serde_json::json!(12)).unwrap();
    assert_eq!(s.params().direction, ShiftDirection::Vertical);
    assert_eq!(s.params().shift, 12);
    assert_eq!(
        s.properties().unwrap(),
        serde_json::json!({"shift": 12, "direction": "vertical", "seed": 0})
    );
}

#[test]
fn rejected_property_leaves_params_untouched() {
    let mut s = ShiftOp::default();
    assert!(s.set_property("shift", serde_json::json!(500)).is_err());
    assert!(s.set_property("shift", serde_json::json!("wide")).is_err());
    assert!(s.set_property("radius", serde_json::json!(1)).is_err());
    assert!(s.property("radius").is_err());
    assert_eq!(s.params(), &ShiftParams::default());
}
