use super::*;
use crate::color::format::Format;
use crate::foundation::core::Rect;

#[test]
fn luma_exports_as_opaque_gray() {
    let b = PixelBuffer::from_samples(
        Rect::new(5, 5, 3, 1),
        Format::new(SampleEncoding::YFloat, None),
        vec![0.0, 0.5, 2.0],
    )
    .unwrap();
    let img = to_rgba8(&b).unwrap();
    assert_eq!(img.dimensions(), (3, 1));
    assert_eq!(img.get_pixel(0, 0).0, [0, 0, 0, 255]);
    assert_eq!(img.get_pixel(1, 0).0, [128, 128, 128, 255]);
    assert_eq!(img.get_pixel(2, 0).0, [255, 255, 255, 255]);
}

#[test]
fn rgba_exports_channelwise() {
    let b = PixelBuffer::from_samples(
        Rect::new(0, 0, 1, 1),
        Format::new(SampleEncoding::RgbaFloat, None),
        vec![1.0, 0.0, f32::NAN, 0.2],
    )
    .unwrap();
    assert_eq!(to_rgba8(&b).unwrap().get_pixel(0, 0).0, [255, 0, 0, 51]);
}
