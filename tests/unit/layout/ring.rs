use super::*;

fn close(a: Point, b: Point) -> bool {
    (a.x - b.x).abs() < 1e-9 && (a.y - b.y).abs() < 1e-9
}

#[test]
fn node_zero_is_at_the_top_and_order_is_clockwise() {
    let ring = NodeRing::new(4, Point::new(100.0, 100.0), 50.0);
    assert_eq!(ring.len(), 4);
    assert!(close(ring.nodes()[0].center, Point::new(100.0, 50.0)));
    assert!(close(ring.nodes()[1].center, Point::new(150.0, 100.0)));
    assert!(close(ring.nodes()[2].center, Point::new(100.0, 150.0)));
    assert!(close(ring.nodes()[3].center, Point::new(50.0, 100.0)));
    let ids: Vec<_> = ring.nodes().iter().map(|n| n.id).collect();
    assert_eq!(ids, vec![1, 2, 3, 4]);
}

#[test]
fn all_nodes_lie_on_the_circle() {
    let ring = NodeRing::new(17, Point::new(10.0, -4.0), 33.0);
    for node in ring.nodes() {
        let d = node.center.distance(ring.center());
        assert!((d - 33.0).abs() < 1e-9);
    }
}

#[test]
fn fit_reserves_the_panel_band() {
    let ring = NodeRing::fit(20, Canvas::default());
    assert_eq!(ring.center(), Point::new(310.0 + 970.0 / 2.0, 360.0));
    assert_eq!(ring.radius(), 360.0 - RING_MARGIN_PX);
    for node in ring.nodes() {
        assert!(node.center.x - 15.0 > 300.0);
    }
}

#[test]
fn fit_on_narrow_or_tiny_canvas() {
    let narrow = NodeRing::fit(3, Canvas::new(400, 400).unwrap());
    assert_eq!(narrow.center(), Point::new(200.0, 200.0));

    let tiny = NodeRing::fit(3, Canvas::new(20, 20).unwrap());
    assert_eq!(tiny.radius(), 0.0);
    assert!(tiny.nodes().iter().all(|n| close(n.center, tiny.center())));
}

#[test]
fn tour_points_rejects_one_past_the_end() {
    let ring = NodeRing::new(3, Point::ZERO, 10.0);
    assert_eq!(ring.tour_points(&[2, 0, 1]).unwrap().len(), 3);
    let err = ring.tour_points(&[0, 3, 1]).unwrap_err();
    assert!(matches!(
        err,
        TourscopeError::InvalidTourIndex {
            index: 3,
            num_nodes: 3
        }
    ));
    assert!(ring.tour_points(&[]).unwrap().is_empty());
}

#[test]
fn empty_ring() {
    let ring = NodeRing::new(0, Point::ZERO, 10.0);
    assert!(ring.is_empty());
    assert!(ring.get(0).is_none());
}
