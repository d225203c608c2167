//! Mind-map subtree layout.
//!
//! `organize_subtree` fans a node's children out to its right and recurses.
//! The pass is deterministic and idempotent: each node's result depends only
//! on its own position, its children's derived sizes, and the config. The
//! starting node and its ancestors are never moved.

use crate::model::Point;
use crate::scene::Scene;
use petgraph::graph::NodeIndex;

/// Spacing for subtree layout.
#[derive(Debug, Clone, Copy)]
pub struct LayoutConfig {
    /// Horizontal gap between a node's right edge and its children's column.
    pub h_gap: f32,
    /// Vertical gap appended to each child's span when stacking.
    pub v_gap: f32,
    /// Minimum vertical room a node reserves in subtree-height sums.
    pub height_margin: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        LayoutConfig {
            h_gap: 60.0,
            v_gap: 12.0,
            height_margin: 16.0,
        }
    }
}

/// Arrange `node`'s descendants relative to its current position.
///
/// All children share one x-column at `node.right + h_gap`. An only child
/// keeps the node's own y. Two or more children stack top to bottom in
/// child order, the stacked block centered on the node's vertical center.
/// Connectors on every repositioned level are refreshed along the way.
pub fn organize_subtree(scene: &mut Scene, node: NodeIndex, cfg: &LayoutConfig) {
    let children = scene.children(node);
    if children.is_empty() {
        return;
    }
    let Some(item) = scene.get(node) else { return };
    let origin = item.pos;
    let node_size = item.size();
    let child_x = origin.x + node_size.width + cfg.h_gap;

    if let [only] = children[..] {
        if let Some(child) = scene.get_mut(only) {
            child.pos = Point::new(child_x, origin.y);
        }
    } else {
        let heights: Vec<f32> = children
            .iter()
            .map(|&c| scene.get(c).map_or(0.0, |i| i.size().height))
            .collect();
        // Each span carries one trailing gap; drop the last so the visual
        // block's midpoint lands on the node's center.
        let block: f32 = heights.iter().map(|h| h + cfg.v_gap).sum::<f32>() - cfg.v_gap;
        let mut y = origin.y + node_size.height / 2.0 - block / 2.0;
        for (&child, &h) in children.iter().zip(&heights) {
            if let Some(item) = scene.get_mut(child) {
                item.pos = Point::new(child_x, y);
            }
            y += h + cfg.v_gap;
        }
    }

    scene.refresh_connectors(node);

    for &child in &children {
        organize_subtree(scene, child, cfg);
    }
}

/// Vertical room a subtree wants: the node's own height plus the margin,
/// widened to the sum of its children's requirements. A sizing hint for
/// hosts; the stacking rule above intentionally consults only immediate
/// child heights.
#[must_use]
pub fn required_subtree_height(scene: &Scene, node: NodeIndex, cfg: &LayoutConfig) -> f32 {
    let own = scene.get(node).map_or(0.0, |i| i.size().height) + cfg.height_margin;
    let children = scene.children(node);
    if children.is_empty() {
        return own;
    }
    let from_children: f32 = children
        .iter()
        .map(|&c| required_subtree_height(scene, c, cfg))
        .sum();
    own.max(from_children)
}
