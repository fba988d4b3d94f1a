use super::*;
use crate::color::library::BuiltinColors;

/// Builtin spaces plus a fake profile loader: `b"P:<name>"` loads as space `<name>`, anything
/// else fails to parse.
struct ProfileColors;

impl ColorLibrary for ProfileColors {
    fn resolve(&self, name: &str) -> Option<Format> {
        BuiltinColors.resolve(name)
    }

    fn space(&self, name: &str) -> Option<Space> {
        BuiltinColors.space(name)
    }

    fn load_space_from_profile_bytes(&self, bytes: &[u8]) -> PixgraphResult<Space> {
        match bytes.strip_prefix(b"P:") {
            Some(name) => Ok(Space::new(String::from_utf8_lossy(name))),
            None => Err(PixgraphError::unresolved("not a profile")),
        }
    }
}

fn rgba(space: Option<&str>) -> Format {
    Format::new(SampleEncoding::RgbaFloat, space.map(Space::new))
}

fn cast(space: &str, icc_profile: Option<&[u8]>) -> CastSpaceOp {
    CastSpaceOp::new(CastSpaceParams {
        space: space.to_string(),
        icc_profile: icc_profile.map(<[u8]>::to_vec),
    })
    .unwrap()
}

fn space_name(f: &Format) -> Option<&str> {
    f.space.as_ref().map(Space::name)
}

#[test]
fn named_space_tags_output() {
    let f = cast("Rec2020", None).negotiate(&ProfileColors, Some(&rgba(Some("sRGB"))), None);
    assert_eq!(space_name(&f.output), Some("Rec2020"));
    assert_eq!(f.output.encoding, SampleEncoding::RgbaFloat);
    assert!(f.warnings.is_empty());
}

#[test]
fn input_keeps_its_upstream_space() {
    let f = cast("sRGB", None).negotiate(&ProfileColors, Some(&rgba(Some("ACEScg"))), None);
    assert_eq!(space_name(&f.input), Some("ACEScg"));
    assert_eq!(f.input.encoding, SampleEncoding::RgbaFloat);
}

#[test]
fn aux_space_beats_named_space() {
    let f = cast("ProPhoto", None).negotiate(
        &ProfileColors,
        Some(&rgba(Some("sRGB"))),
        Some(&rgba(Some("ACEScg"))),
    );
    assert_eq!(space_name(&f.output), Some("ACEScg"));
}

#[test]
fn untagged_aux_falls_back_to_named_space() {
    let f = cast("ProPhoto", None).negotiate(&ProfileColors, None, Some(&rgba(None)));
    assert_eq!(space_name(&f.output), Some("ProPhoto"));
}

#[test]
fn profile_beats_aux_and_name() {
    let f = cast("ProPhoto", Some(b"P:Wide")).negotiate(
        &ProfileColors,
        None,
        Some(&rgba(Some("ACEScg"))),
    );
    assert_eq!(space_name(&f.output), Some("Wide"));
    assert!(f.warnings.is_empty());
}

#[test]
fn bad_profile_warns_and_falls_back() {
    let f = cast("Rec2020", Some(b"garbage")).negotiate(&ProfileColors, None, None);
    assert_eq!(space_name(&f.output), Some("Rec2020"));
    assert_eq!(f.warnings.len(), 1);
    assert!(matches!(f.warnings[0], PixgraphError::UnresolvedFormat(_)));
}

#[test]
fn unknown_space_leaves_output_untagged() {
    let f = cast("NotASpace", None).negotiate(&ProfileColors, Some(&rgba(Some("sRGB"))), None);
    assert_eq!(f.output.space, None);
    assert_eq!(f.output.encoding, SampleEncoding::RgbaFloat);
    assert_eq!(f.warnings.len(), 1);
    assert!(matches!(f.warnings[0], PixgraphError::UnresolvedFormat(_)));
}

#[test]
fn process_copies_samples_verbatim() {
    let region = Rect::new(2, 3, 2, 2);
    let samples: Vec<f32> = (0..16).map(|i| i as f32 * 0.1 - 0.3).collect();
    let input = PixelBuffer::from_samples(region, rgba(Some("sRGB")), samples.clone()).unwrap();
    let mut out = PixelBuffer::new(region, rgba(Some("Rec2020"))).unwrap();
    CastSpaceOp::default()
        .process(&input, &mut out, region)
        .unwrap();
    let bits = |s: &[f32]| s.iter().map(|v| v.to_bits()).collect::<Vec<_>>();
    assert_eq!(bits(out.samples()), bits(&samples));
    assert_eq!(space_name(out.format()), Some("Rec2020"));
}

#[test]
fn params_validate() {
    assert!(CastSpaceOp::new(CastSpaceParams {
        space: " ".to_string(),
        icc_profile: None,
    })
    .is_err());
    assert!(CastSpaceOp::new(CastSpaceParams {
        space: "sRGB".to_string(),
        icc_profile: Some(Vec::new()),
    })
    .is_err());
}

#[test]
fn space_property_is_editable() {
    let mut c = CastSpaceOp::default();
    assert_eq!(c.property("space").unwrap(), serde_json::json!("sRGB"));
    assert_eq!(c.property("icc_profile").unwrap(), serde_json::Value::Null);
    c.set_property("space", serde_json::json!("ACEScg")).unwrap();
    assert_eq!(c.params().space, "ACEScg");
    assert!(c.set_property("space", serde_json::json!(3)).is_err());
    assert_eq!(c.params().space, "ACEScg");
}
