//! The canvas scene: an arena of items plus the mind-map tree and its
//! derived connectors.
//!
//! Items live in a `StableDiGraph`; a directed edge is a parent→child link
//! between two text nodes. Edge weights carry an insertion sequence number
//! so child order is append order, independent of adjacency-list iteration
//! order. Connectors are derived data: exactly one per tree edge, refreshed
//! whenever an endpoint moves, never persisted.

use crate::id::ItemId;
use crate::model::{Bounds, CanvasItem, Color, Point};
use petgraph::Direction;
use petgraph::graph::NodeIndex;
use petgraph::stable_graph::StableDiGraph;
use petgraph::visit::EdgeRef;
use std::collections::HashMap;

// ─── Connectors ─────────────────────────────────────────────────────────

/// Stroke palette for connectors, cycled by the source node's depth.
const DEPTH_PALETTE: [Color; 6] = [
    Color::rgb(0x6C, 0x5C, 0xE7),
    Color::rgb(0x00, 0xB8, 0x94),
    Color::rgb(0x09, 0x84, 0xE3),
    Color::rgb(0xE1, 0x70, 0x55),
    Color::rgb(0xD6, 0x30, 0x31),
    Color::rgb(0xFD, 0xCB, 0x6E),
];

/// Stroke color for a connector whose source node sits at `depth`.
pub fn depth_color(depth: usize) -> Color {
    DEPTH_PALETTE[depth % DEPTH_PALETTE.len()]
}

/// Horizontal pull of a connector's control points, as a fraction of the
/// x-span between its endpoints.
const CURVE_FACTOR: f32 = 0.5;

/// Control points of a cubic Bézier curve.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CubicPath {
    pub start: Point,
    pub ctrl1: Point,
    pub ctrl2: Point,
    pub end: Point,
}

/// A visual edge between a parent text node and one of its children.
/// Geometry and color are derived; `refresh` recomputes both.
#[derive(Debug, Clone)]
pub struct Connector {
    pub source: NodeIndex,
    pub target: NodeIndex,
    pub color: Color,
    pub path: CubicPath,
}

/// Curve between whichever horizontal edges of `a` and `b` face each other.
fn cubic_between(a: Bounds, b: Bounds) -> CubicPath {
    let (start, end) = if b.center().x >= a.center().x {
        (a.right_center(), b.left_center())
    } else {
        (a.left_center(), b.right_center())
    };
    let pull = (end.x - start.x) * CURVE_FACTOR;
    CubicPath {
        start,
        ctrl1: Point::new(start.x + pull, start.y),
        ctrl2: Point::new(end.x - pull, end.y),
        end,
    }
}

// ─── Scene ──────────────────────────────────────────────────────────────

/// Complete canvas content: items, tree edges, connectors.
#[derive(Debug, Clone)]
pub struct Scene {
    /// Item arena. Directed edges are parent→child tree links; the weight
    /// is the edge's insertion sequence number.
    graph: StableDiGraph<CanvasItem, u64>,
    /// Fast ItemId → arena index lookup.
    id_index: HashMap<ItemId, NodeIndex>,
    /// One derived visual edge per tree edge.
    connectors: Vec<Connector>,
    /// Next tree-edge sequence number.
    edge_seq: u64,
}

impl Scene {
    #[must_use]
    pub fn new() -> Self {
        Scene {
            graph: StableDiGraph::new(),
            id_index: HashMap::new(),
            connectors: Vec::new(),
            edge_seq: 0,
        }
    }

    /// Add an item to the scene. Items start parentless.
    pub fn insert(&mut self, item: CanvasItem) -> NodeIndex {
        let id = item.id;
        let idx = self.graph.add_node(item);
        self.id_index.insert(id, idx);
        idx
    }

    /// Remove one item. Its connectors disappear with it; linked children
    /// stay on the canvas as parentless roots. Removal never cascades.
    pub fn remove(&mut self, idx: NodeIndex) -> Option<CanvasItem> {
        if let Some(parent) = self.parent_of(idx) {
            self.remove_child(parent, idx);
        }
        for child in self.children(idx) {
            self.remove_child(idx, child);
        }
        let removed = self.graph.remove_node(idx);
        if let Some(item) = &removed {
            self.id_index.remove(&item.id);
        }
        removed
    }

    /// Drop all items, edges, and connectors.
    pub fn clear(&mut self) {
        self.graph.clear();
        self.id_index.clear();
        self.connectors.clear();
    }

    pub fn len(&self) -> usize {
        self.graph.node_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    pub fn get(&self, idx: NodeIndex) -> Option<&CanvasItem> {
        self.graph.node_weight(idx)
    }

    pub fn get_mut(&mut self, idx: NodeIndex) -> Option<&mut CanvasItem> {
        self.graph.node_weight_mut(idx)
    }

    pub fn index_of(&self, id: ItemId) -> Option<NodeIndex> {
        self.id_index.get(&id).copied()
    }

    /// All items with their arena indices, in arbitrary order.
    pub fn items(&self) -> impl Iterator<Item = (NodeIndex, &CanvasItem)> + '_ {
        self.graph.node_indices().map(|idx| (idx, &self.graph[idx]))
    }

    /// Indices of every text node.
    pub fn text_nodes(&self) -> impl Iterator<Item = NodeIndex> + '_ {
        self.graph
            .node_indices()
            .filter(|&idx| self.graph[idx].is_text())
    }

    // ─── Tree structure ─────────────────────────────────────────────────

    pub fn parent_of(&self, idx: NodeIndex) -> Option<NodeIndex> {
        self.graph
            .neighbors_directed(idx, Direction::Incoming)
            .next()
    }

    /// Children of `idx` in the order they were linked.
    pub fn children(&self, idx: NodeIndex) -> Vec<NodeIndex> {
        let mut out: Vec<(u64, NodeIndex)> = self
            .graph
            .edges_directed(idx, Direction::Outgoing)
            .map(|e| (*e.weight(), e.target()))
            .collect();
        out.sort_by_key(|(seq, _)| *seq);
        out.into_iter().map(|(_, target)| target).collect()
    }

    /// Hops from `idx` up to its root. Roots are at depth 0.
    pub fn depth(&self, idx: NodeIndex) -> usize {
        let mut depth = 0;
        let mut current = idx;
        while let Some(parent) = self.parent_of(current) {
            depth += 1;
            current = parent;
        }
        depth
    }

    /// Whether `ancestor` appears anywhere on `descendant`'s path to its
    /// root. A node is not its own ancestor.
    pub fn is_ancestor_of(&self, ancestor: NodeIndex, descendant: NodeIndex) -> bool {
        let mut current = descendant;
        while let Some(parent) = self.parent_of(current) {
            if parent == ancestor {
                return true;
            }
            current = parent;
        }
        false
    }

    /// Link `child` under `parent`, appending to the child list and creating
    /// the connector. Returns false without changing anything when the link
    /// is refused: either endpoint missing or not a text node, a self-link,
    /// an existing link, or a link that would close a cycle anywhere up the
    /// ancestor chain. A child has one parent, so an accepted link detaches
    /// the child from its previous parent first. An accepted link changes
    /// the depth of the child's whole subtree, so its connector colors are
    /// re-derived.
    pub fn add_child(&mut self, parent: NodeIndex, child: NodeIndex) -> bool {
        if parent == child {
            return false;
        }
        let both_text = self.get(parent).is_some_and(CanvasItem::is_text)
            && self.get(child).is_some_and(CanvasItem::is_text);
        if !both_text {
            return false;
        }
        if self.graph.find_edge(parent, child).is_some() {
            return false;
        }
        if self.is_ancestor_of(child, parent) {
            log::debug!("refusing link {parent:?} → {child:?}: would close a cycle");
            return false;
        }
        if let Some(old_parent) = self.parent_of(child) {
            self.remove_child(old_parent, child);
        }
        let seq = self.edge_seq;
        self.edge_seq += 1;
        self.graph.add_edge(parent, child, seq);
        let path = cubic_between(self.bounds_of(parent), self.bounds_of(child));
        self.connectors.push(Connector {
            source: parent,
            target: child,
            color: depth_color(self.depth(parent)),
            path,
        });
        self.refresh_subtree(child);
        true
    }

    /// Unlink `child` from `parent`, deleting the matching connector. The
    /// child stays on the canvas as a root, its subtree's connector colors
    /// re-derived for the shallower depths. No-op when no such link exists.
    pub fn remove_child(&mut self, parent: NodeIndex, child: NodeIndex) {
        let Some(edge) = self.graph.find_edge(parent, child) else {
            return;
        };
        self.graph.remove_edge(edge);
        if let Some(i) = self
            .connectors
            .iter()
            .position(|c| c.source == parent && c.target == child)
        {
            self.connectors.remove(i);
        }
        self.refresh_subtree(child);
    }

    // ─── Connector maintenance ──────────────────────────────────────────

    pub fn connectors(&self) -> &[Connector] {
        &self.connectors
    }

    /// Connectors whose source is `idx` (one per child).
    pub fn connectors_of(&self, idx: NodeIndex) -> impl Iterator<Item = &Connector> + '_ {
        self.connectors.iter().filter(move |c| c.source == idx)
    }

    fn bounds_of(&self, idx: NodeIndex) -> Bounds {
        self.get(idx).map(CanvasItem::bounds).unwrap_or_default()
    }

    /// Refresh every connector inside the subtree rooted at `root`. Link
    /// changes shift the depth of the whole subtree, so its colors must be
    /// re-derived.
    fn refresh_subtree(&mut self, root: NodeIndex) {
        let mut stack = vec![root];
        while let Some(node) = stack.pop() {
            self.refresh_connectors(node);
            stack.extend(self.children(node));
        }
    }

    /// Recompute geometry and depth color for every connector with an
    /// endpoint at `idx`.
    pub fn refresh_connectors(&mut self, idx: NodeIndex) {
        for i in 0..self.connectors.len() {
            let (source, target) = (self.connectors[i].source, self.connectors[i].target);
            if source != idx && target != idx {
                continue;
            }
            self.connectors[i].path = cubic_between(self.bounds_of(source), self.bounds_of(target));
            self.connectors[i].color = depth_color(self.depth(source));
        }
    }

    /// Refresh connectors at `idx` and at each of its ancestors in turn, so
    /// a move anywhere in a subtree leaves every curve on the path to the
    /// root attached. Cost is proportional to the node's depth.
    pub fn propagate_connector_update(&mut self, idx: NodeIndex) {
        let mut current = Some(idx);
        while let Some(node) = current {
            self.refresh_connectors(node);
            current = self.parent_of(node);
        }
    }

    /// Move an item and keep its connectors attached. Ignored for items
    /// whose `movable` capability is off.
    pub fn move_item(&mut self, idx: NodeIndex, pos: Point) {
        match self.get_mut(idx) {
            Some(item) if item.movable => item.pos = pos,
            _ => return,
        }
        self.propagate_connector_update(idx);
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}
