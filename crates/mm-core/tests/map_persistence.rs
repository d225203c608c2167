//! Integration tests: scene → save to disk → load → verify, plus decoding
//! of checked-in map fixtures.

use mm_core::NodeIndex;
use mm_core::codec::CodecError;
use mm_core::model::{CanvasItem, ItemKind, Point, ViewState};
use mm_core::scene::Scene;
use mm_core::{decode_scene, load_scene, save_scene};

// ─── Helpers ────────────────────────────────────────────────────────────

fn find_text(scene: &Scene, content: &str) -> NodeIndex {
    scene
        .items()
        .find(|(_, item)| item.text_content() == Some(content))
        .map(|(idx, _)| idx)
        .unwrap_or_else(|| panic!("no text node with content {content:?}"))
}

fn child_contents(scene: &Scene, idx: NodeIndex) -> Vec<String> {
    scene
        .children(idx)
        .iter()
        .filter_map(|&c| scene.get(c).and_then(|i| i.text_content()))
        .map(str::to_string)
        .collect()
}

// ─── Fixture decoding ───────────────────────────────────────────────────

#[test]
fn product_map_fixture_decodes_fully() {
    let json = include_str!("fixtures/product_map.json");
    let mut scene = Scene::new();
    let view = decode_scene(&mut scene, json).expect("fixture should parse");

    assert_eq!(
        view,
        Some(ViewState {
            scale_factor: 1.25,
            center_x: 310.0,
            center_y: 180.0,
        })
    );
    assert_eq!(scene.len(), 7);
    assert_eq!(scene.connectors().len(), 3);

    let root = find_text(&scene, "Release plan");
    assert_eq!(
        child_contents(&scene, root),
        vec!["Cut the branch", "Write the notes"]
    );
    assert_eq!(scene.depth(find_text(&scene, "Tag v2.4")), 2);

    // The legacy `text` tag decodes like `text_node`.
    let legacy = find_text(&scene, "Write the notes");
    assert_eq!(scene.parent_of(legacy), Some(root));

    let tile_tags: Vec<&str> = scene
        .items()
        .filter(|(_, i)| !i.is_text())
        .map(|(_, i)| i.kind.tag())
        .collect();
    assert_eq!(tile_tags, vec!["directory", "url", "media"]);
}

#[test]
fn dangling_links_in_fixtures_are_tolerated() {
    let json = include_str!("fixtures/dangling_edge.json");
    let mut scene = Scene::new();
    decode_scene(&mut scene, json).expect("fixture should parse");

    assert_eq!(scene.len(), 2, "both present nodes land on the canvas");
    let root = find_text(&scene, "lonely root");
    assert_eq!(child_contents(&scene, root), vec!["present child"]);
    assert_eq!(scene.connectors().len(), 1);
}

// ─── File round-trip ────────────────────────────────────────────────────

fn build_sample() -> Scene {
    let mut scene = Scene::new();
    let root = scene.insert(CanvasItem::text(Point::new(50.0, 100.0), "Trip ideas"));
    let coast = scene.insert(CanvasItem::text(Point::new(300.0, 40.0), "Coast road"));
    let hills = scene.insert(CanvasItem::text(Point::new(300.0, 160.0), "Hill villages"));
    scene.add_child(root, coast);
    scene.add_child(root, hills);
    scene.insert(CanvasItem::url(
        Point::new(40.0, 300.0),
        "https://maps.example.com/route/17",
    ));
    scene.insert(CanvasItem::directory(
        Point::new(40.0, 400.0),
        "/home/mara/photos".into(),
    ));
    scene
}

#[test]
fn save_then_load_restores_the_map() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("trip.json");

    let scene = build_sample();
    let view = ViewState {
        scale_factor: 0.8,
        center_x: 150.0,
        center_y: 220.0,
    };
    save_scene(&path, &scene, view).expect("save should succeed");

    let mut restored = Scene::new();
    let loaded_view = load_scene(&path, &mut restored).expect("load should succeed");

    assert_eq!(loaded_view, Some(view));
    assert_eq!(restored.len(), scene.len());
    assert_eq!(restored.connectors().len(), 2);

    let root = find_text(&restored, "Trip ideas");
    assert_eq!(
        child_contents(&restored, root),
        vec!["Coast road", "Hill villages"]
    );
    assert_eq!(restored.get(root).unwrap().pos, Point::new(50.0, 100.0));

    let url = restored
        .items()
        .find_map(|(_, i)| match &i.kind {
            ItemKind::Url { url, .. } => Some(url.clone()),
            _ => None,
        })
        .expect("url tile survives");
    assert_eq!(url, "https://maps.example.com/route/17");

    let (dir_pos, dir_path) = restored
        .items()
        .find_map(|(_, i)| match &i.kind {
            ItemKind::Directory { dir_path, .. } => Some((i.pos, dir_path.clone())),
            _ => None,
        })
        .expect("directory tile survives");
    assert_eq!(dir_pos, Point::new(40.0, 400.0));
    assert_eq!(dir_path, std::path::PathBuf::from("/home/mara/photos"));
}

#[test]
fn saving_over_an_existing_file_replaces_it() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("map.json");

    let first = build_sample();
    save_scene(&path, &first, ViewState::default()).unwrap();

    let mut second = Scene::new();
    second.insert(CanvasItem::text(Point::new(0.0, 0.0), "only node"));
    save_scene(&path, &second, ViewState::default()).unwrap();

    let mut restored = Scene::new();
    load_scene(&path, &mut restored).unwrap();
    assert_eq!(restored.len(), 1);
    assert_eq!(
        restored.items().next().unwrap().1.text_content(),
        Some("only node")
    );
}

#[test]
fn loading_a_missing_file_reports_io() {
    let dir = tempfile::tempdir().unwrap();
    let mut scene = build_sample();
    let before = scene.len();

    let err = load_scene(&dir.path().join("absent.json"), &mut scene);
    assert!(matches!(err, Err(CodecError::Io(_))));
    assert_eq!(scene.len(), before, "a failed load leaves the scene alone");
}
