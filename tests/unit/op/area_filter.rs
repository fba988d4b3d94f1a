use super::*;

#[test]
fn expand_grows_each_side_independently() {
    let m = AreaMargins {
        left: 1,
        right: 2,
        top: 3,
        bottom: 4,
    };
    assert_eq!(m.expand(Rect::new(10, 10, 5, 5)), Rect::new(9, 7, 8, 12));
    assert_eq!(
        AreaMargins::uniform(2).expand(Rect::new(0, 0, 1, 1)),
        Rect::new(-2, -2, 5, 5)
    );
}

#[test]
fn infinite_region_stays_infinite() {
    assert!(AreaMargins::uniform(7).expand(Rect::INFINITE).is_infinite());
}

#[test]
fn bounding_box_follows_input() {
    assert_eq!(
        bounding_box(Some(Rect::new(3, 4, 5, 6))),
        Rect::new(3, 4, 5, 6)
    );
    assert!(bounding_box(None).is_empty());
}
