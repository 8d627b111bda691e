use super::*;

#[test]
fn dimensions_reject_zero() {
    assert!(Dimensions::new(0, 4).is_err());
    assert!(Dimensions::new(4, 0).is_err());
    let d = Dimensions::new(3, 2).unwrap();
    assert_eq!(d.pixel_count(), 6);
    assert_eq!(d.byte_len().unwrap(), 24);
}

#[test]
fn dimensions_center_is_pixel_grid_center() {
    let d = Dimensions::new(5, 4).unwrap();
    assert_eq!(d.center(), Point::new(2.0, 1.5));
}

#[test]
fn roi_from_corners_normalizes_drag_direction() {
    let r = Roi::from_corners(Point::new(10.7, 8.2), Point::new(2.1, 3.9));
    assert_eq!(
        r,
        Roi {
            x: 2,
            y: 3,
            width: 8,
            height: 5
        }
    );
}

#[test]
fn roi_clip_drops_outside_and_trims_overhang() {
    let dims = Dimensions::new(10, 10).unwrap();
    let outside = Roi {
        x: 12,
        y: 0,
        width: 3,
        height: 3,
    };
    assert_eq!(outside.clip_to(dims), None);

    let overhang = Roi {
        x: 8,
        y: 7,
        width: 5,
        height: 5,
    };
    assert_eq!(
        overhang.clip_to(dims),
        Some(Roi {
            x: 8,
            y: 7,
            width: 2,
            height: 3
        })
    );
}

#[test]
fn zero_sized_roi_falls_back_to_full_frame() {
    let dims = Dimensions::new(6, 4).unwrap();
    let degenerate = Roi {
        x: 1,
        y: 1,
        width: 0,
        height: 3,
    };
    assert_eq!(resolve_roi(Some(degenerate), dims), dims.full_roi());
    assert_eq!(resolve_roi(None, dims), dims.full_roi());
}

#[test]
fn roi_contains_boundaries() {
    let r = Roi {
        x: 2,
        y: 2,
        width: 2,
        height: 1,
    };
    assert!(r.contains(2, 2));
    assert!(r.contains(3, 2));
    assert!(!r.contains(4, 2));
    assert!(!r.contains(2, 3));
    assert!(!r.contains(1, 2));
}
