use circle_regions::{
    check_circles, Circle, CircleId, NodeId, RegionEngine, RegionError, RegionErrorKind,
};

#[test]
fn misuse_is_not_an_error() {
    let mut e = RegionEngine::new();
    let a = e.add_circle(Circle::new(0.0, 0.0, 1.0)).unwrap();
    assert!(e.add_circle(Circle::new(0.0, 0.0, 1.0)).is_none());
    assert!(e.add_circle(Circle::new(0.0, 0.0, f64::INFINITY)).is_none());
    assert!(!e.remove_circle(CircleId(42)));
    assert!(!e.move_circle(CircleId(42), 0.0, 0.0));
    assert!(!e.move_circle(a, f64::NAN, 0.0));
    assert!(!e.resize_circle(a, -2.0));
    assert_eq!(e.compute_regions().unwrap().len(), 2);
}

#[test]
fn moving_onto_another_circle_is_refused() {
    let mut e = RegionEngine::new();
    e.add_circle(Circle::new(0.0, 0.0, 1.0)).unwrap();
    let b = e.add_circle(Circle::new(5.0, 0.0, 1.0)).unwrap();
    e.compute_regions().unwrap();
    assert!(!e.move_circle(b, 0.0, 0.0));
    assert!(!e.is_stale());
    assert_eq!(e.circle(b).unwrap().center.x, 5.0);
}

#[test]
fn sanity_check_counts_regions() {
    let h = 3f64.sqrt();
    let circles = vec![
        Circle::new(0.0, 0.0, 1.1).with_label("a"),
        Circle::new(2.0, 0.0, 1.1).with_label("b"),
        Circle::new(1.0, h, 1.1).with_label("c"),
    ];
    assert_eq!(check_circles(&circles).unwrap(), 8);
    assert_eq!(check_circles(&circles[..1]).unwrap(), 2);
}

#[test]
fn error_messages_name_the_failure() {
    let err = RegionError::new(RegionErrorKind::UnsupportedTraversal { node: NodeId(2) })
        .implicating([CircleId(0), CircleId(5)]);
    assert_eq!(err.to_string(), "unsupported traversal at NodeId(2)");
    assert_eq!(err.implicated, vec![CircleId(0), CircleId(5)]);
    assert!(err.circle_set().is_empty());

    let json = err.to_json().unwrap();
    let v: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(v["error"], "unsupported traversal at NodeId(2)");
    assert_eq!(v["implicated"], serde_json::json!([0, 5]));

    let missing: RegionError = RegionErrorKind::MissingOuterContour.into();
    assert_eq!(missing.to_string(), "no outer contour found");
}
