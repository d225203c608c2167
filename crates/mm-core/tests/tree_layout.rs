//! Integration tests: tree editing and subtree layout on a larger map.

use mm_core::NodeIndex;
use mm_core::layout::{LayoutConfig, organize_subtree, required_subtree_height};
use mm_core::model::{CanvasItem, Point};
use mm_core::scene::Scene;

// ─── Helpers ────────────────────────────────────────────────────────────

fn text_at(scene: &mut Scene, x: f32, y: f32, content: &str) -> NodeIndex {
    scene.insert(CanvasItem::text(Point::new(x, y), content))
}

/// Tree edges counted from the structure itself.
fn edge_count(scene: &Scene) -> usize {
    scene
        .items()
        .map(|(idx, _)| scene.children(idx).len())
        .sum()
}

// ─── Layout over three levels ───────────────────────────────────────────

#[test]
fn organize_lays_out_three_levels_left_to_right() {
    let mut scene = Scene::new();
    let cfg = LayoutConfig::default();

    let root = text_at(&mut scene, 0.0, 200.0, "Quarter goals");
    let ship = text_at(&mut scene, 0.0, 0.0, "Ship importer");
    let hire = text_at(&mut scene, 0.0, 0.0, "Hire reviewer");
    let parser = text_at(&mut scene, 0.0, 0.0, "New parser");
    let tests = text_at(&mut scene, 0.0, 0.0, "Migration tests");
    scene.add_child(root, ship);
    scene.add_child(root, hire);
    scene.add_child(ship, parser);
    scene.add_child(ship, tests);

    organize_subtree(&mut scene, root, &cfg);

    let x_of = |idx: NodeIndex| scene.get(idx).unwrap().pos.x;
    assert!(x_of(ship) > x_of(root), "children sit right of the root");
    assert!(x_of(parser) > x_of(ship), "grandchildren sit further right");
    assert!(
        (x_of(ship) - x_of(hire)).abs() < 0.001,
        "siblings share a column"
    );
    assert!((x_of(parser) - x_of(tests)).abs() < 0.001);

    // Every connector ends exactly on its endpoints' current bounds.
    for conn in scene.connectors() {
        let source = scene.get(conn.source).unwrap().bounds();
        let target = scene.get(conn.target).unwrap().bounds();
        assert_eq!(conn.path.start, source.right_center());
        assert_eq!(conn.path.end, target.left_center());
    }
}

#[test]
fn height_requirement_covers_the_fan_out() {
    let mut scene = Scene::new();
    let cfg = LayoutConfig::default();

    let root = text_at(&mut scene, 0.0, 0.0, "root");
    let wide = text_at(&mut scene, 0.0, 0.0, "a\nb\nc\nd");
    let small = text_at(&mut scene, 0.0, 0.0, "leaf");
    scene.add_child(root, wide);
    scene.add_child(root, small);

    let whole = required_subtree_height(&scene, root, &cfg);
    let wide_part = required_subtree_height(&scene, wide, &cfg);
    let small_part = required_subtree_height(&scene, small, &cfg);
    assert!(
        (whole - (wide_part + small_part)).abs() < 0.001,
        "fan-out sums child requirements: {whole} vs {} + {}",
        wide_part,
        small_part
    );
}

// ─── Connector bookkeeping across an editing session ────────────────────

#[test]
fn connector_count_tracks_tree_edits() {
    let mut scene = Scene::new();
    let root = text_at(&mut scene, 0.0, 0.0, "root");
    let a = text_at(&mut scene, 200.0, -80.0, "a");
    let b = text_at(&mut scene, 200.0, 0.0, "b");
    let c = text_at(&mut scene, 200.0, 80.0, "c");
    let d = text_at(&mut scene, 400.0, 0.0, "d");

    let assert_synced = |scene: &Scene, step: &str| {
        assert_eq!(
            scene.connectors().len(),
            edge_count(scene),
            "connector/edge mismatch after {step}"
        );
    };

    scene.add_child(root, a);
    scene.add_child(root, b);
    scene.add_child(root, c);
    scene.add_child(b, d);
    assert_synced(&scene, "building the tree");

    // Rejected links must not leave stray connectors behind.
    scene.add_child(d, root);
    assert_synced(&scene, "a refused cycle link");

    // Reparent d from b to a.
    scene.add_child(a, d);
    assert_synced(&scene, "reparenting");
    assert_eq!(scene.parent_of(d), Some(a));
    assert!(scene.children(b).is_empty());

    scene.remove_child(root, c);
    assert_synced(&scene, "unlinking a child");
    assert!(scene.get(c).is_some(), "unlinked node stays on the canvas");

    scene.remove(a);
    assert_synced(&scene, "removing a mid-tree node");
    assert_eq!(scene.parent_of(d), None, "orphaned child becomes a root");
    assert_eq!(scene.len(), 4);

    scene.clear();
    assert_synced(&scene, "clearing the scene");
    assert!(scene.is_empty());
}
