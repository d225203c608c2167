//! The interactive canvas session.
//!
//! Owns the scene, the view transform, and the layout config, and turns
//! host intents (drop, paste, link, zoom, save) into core operations. The
//! heavy semantics all live in `mm-core`; this layer stays thin the way a
//! window shell would drive it.

use crate::classify::{Payload, classify};
use crate::platform::ShortcutResolver;
use mm_core::NodeIndex;
use mm_core::codec::{self, CodecError};
use mm_core::layout::{LayoutConfig, organize_subtree};
use mm_core::model::{CanvasItem, Point, ViewState};
use mm_core::scene::Scene;
use std::path::Path;

/// Zoom step per wheel notch.
const ZOOM_STEP: f32 = 1.03;
/// Zoom clamp range.
const MIN_SCALE: f32 = 0.1;
const MAX_SCALE: f32 = 4.0;

/// Content of text nodes created without any.
const NEW_NODE_TEXT: &str = "New Node";

/// One open mind map: scene, view, layout config, and the host's shortcut
/// resolver.
pub struct Canvas<R> {
    pub scene: Scene,
    pub view: ViewState,
    pub layout: LayoutConfig,
    resolver: R,
}

impl<R: ShortcutResolver> Canvas<R> {
    #[must_use]
    pub fn new(resolver: R) -> Self {
        Canvas {
            scene: Scene::new(),
            view: ViewState::default(),
            layout: LayoutConfig::default(),
            resolver,
        }
    }

    // ─── Content intents ────────────────────────────────────────────────

    /// Classify a drop at `pos` and insert whatever it produces.
    pub fn drop_payload(&mut self, payload: &Payload, pos: Point) -> Option<NodeIndex> {
        let item = classify(payload, pos, &self.resolver)?;
        log::trace!("drop produced a {} item", item.kind.tag());
        Some(self.scene.insert(item))
    }

    /// Paste runs through the same classifier, placed at the view center.
    pub fn paste_payload(&mut self, payload: &Payload) -> Option<NodeIndex> {
        let pos = self.view.to_canvas(0.0, 0.0);
        self.drop_payload(payload, pos)
    }

    /// Create a text node, with placeholder content when none is given.
    pub fn create_text_node(&mut self, pos: Point, content: Option<&str>) -> NodeIndex {
        self.scene
            .insert(CanvasItem::text(pos, content.unwrap_or(NEW_NODE_TEXT)))
    }

    /// Link `child` under `parent`. False when the scene refuses the link.
    pub fn link(&mut self, parent: NodeIndex, child: NodeIndex) -> bool {
        self.scene.add_child(parent, child)
    }

    pub fn unlink(&mut self, parent: NodeIndex, child: NodeIndex) {
        self.scene.remove_child(parent, child);
    }

    pub fn move_item(&mut self, idx: NodeIndex, pos: Point) {
        self.scene.move_item(idx, pos);
    }

    pub fn remove_item(&mut self, idx: NodeIndex) -> Option<CanvasItem> {
        self.scene.remove(idx)
    }

    /// Tidy the subtree hanging off `node`.
    pub fn organize_from(&mut self, node: NodeIndex) {
        organize_subtree(&mut self.scene, node, &self.layout);
    }

    // ─── View intents ───────────────────────────────────────────────────

    /// One wheel notch in. Steps that would leave the clamp range are
    /// ignored rather than saturated.
    pub fn zoom_in(&mut self) {
        let next = self.view.scale_factor * ZOOM_STEP;
        if next <= MAX_SCALE {
            self.view.scale_factor = next;
        }
    }

    /// One wheel notch out.
    pub fn zoom_out(&mut self) {
        let next = self.view.scale_factor / ZOOM_STEP;
        if next >= MIN_SCALE {
            self.view.scale_factor = next;
        }
    }

    pub fn reset_zoom(&mut self) {
        self.view.scale_factor = 1.0;
    }

    pub fn pan_to(&mut self, center: Point) {
        self.view.center_x = center.x;
        self.view.center_y = center.y;
    }

    // ─── Files ──────────────────────────────────────────────────────────

    pub fn save(&self, path: &Path) -> Result<(), CodecError> {
        codec::save_scene(path, &self.scene, self.view)
    }

    /// Load a map, replacing the current content. The view transform is
    /// restored when the file carries one, otherwise kept as is.
    pub fn load(&mut self, path: &Path) -> Result<(), CodecError> {
        if let Some(view) = codec::load_scene(path, &mut self.scene)? {
            self.view = view;
        }
        Ok(())
    }
}
