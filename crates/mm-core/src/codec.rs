//! Persistence: scene ⇄ JSON map document, plus file save/load.
//!
//! The persisted form is a flat record list; tree structure rides on
//! per-node ids derived from item identity at encode time, meaningless
//! outside one save/load round-trip. Decode is two-phase: replay every
//! record, then resolve child ids through a lookup built over the replayed
//! text nodes, so a child link may name a node that appears later in the
//! file. Skippable problems (pathless images, empty payload strings,
//! records that fail to decode, dangling ids) are logged and dropped,
//! never surfaced as errors; only document-level breakage aborts.

use crate::model::{CanvasItem, Color, FontDesc, ItemKind, Point, ViewState};
use crate::scene::Scene;
use petgraph::graph::NodeIndex;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::Path;
use thiserror::Error;

// ─── Errors ─────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed map document: {0}")]
    Parse(#[from] serde_json::Error),
}

// ─── Document form ──────────────────────────────────────────────────────

/// Top-level persisted document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub view_state: Option<ViewState>,
    #[serde(default)]
    pub items: Vec<ItemRecord>,
}

/// One persisted item: shared position plus the kind-tagged payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemRecord {
    pub x: f32,
    pub y: f32,
    #[serde(flatten)]
    pub payload: RecordPayload,
}

/// Kind-specific record fields, tagged by `type`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RecordPayload {
    /// `text` is the tag older map files used for text nodes.
    #[serde(alias = "text")]
    TextNode {
        content: String,
        font_family: String,
        font_size: f32,
        color: Color,
        id: String,
        #[serde(default, skip_serializing_if = "SmallVec::is_empty")]
        child_nodes: SmallVec<[String; 4]>,
    },
    Shortcut {
        target_path: String,
    },
    Directory {
        dir_path: String,
    },
    Media {
        media_path: String,
    },
    Url {
        url: String,
    },
    Image {
        file_path: String,
    },
}

impl RecordPayload {
    /// The record's `type` tag.
    pub fn tag(&self) -> &'static str {
        match self {
            RecordPayload::TextNode { .. } => "text_node",
            RecordPayload::Shortcut { .. } => "shortcut",
            RecordPayload::Directory { .. } => "directory",
            RecordPayload::Media { .. } => "media",
            RecordPayload::Url { .. } => "url",
            RecordPayload::Image { .. } => "image",
        }
    }

    /// The single payload string of non-text records.
    fn payload_str(&self) -> Option<&str> {
        match self {
            RecordPayload::TextNode { .. } => None,
            RecordPayload::Shortcut { target_path } => Some(target_path),
            RecordPayload::Directory { dir_path } => Some(dir_path),
            RecordPayload::Media { media_path } => Some(media_path),
            RecordPayload::Url { url } => Some(url),
            RecordPayload::Image { file_path } => Some(file_path),
        }
    }
}

// ─── Encode ─────────────────────────────────────────────────────────────

/// Snapshot the scene and view transform into a persistable document.
///
/// Not everything can be persisted: images that never came from disk have
/// no path to record, and a record whose payload string is empty would be
/// unreadable on load. Both are skipped with a log message.
#[must_use]
pub fn encode_scene(scene: &Scene, view: ViewState) -> MapDocument {
    let mut items = Vec::with_capacity(scene.len());

    for (idx, item) in scene.items() {
        let payload = match &item.kind {
            ItemKind::Text {
                content,
                font,
                color,
                ..
            } => {
                let child_nodes = scene
                    .children(idx)
                    .iter()
                    .filter_map(|&c| scene.get(c).map(|i| i.id.to_string()))
                    .collect();
                RecordPayload::TextNode {
                    content: content.clone(),
                    font_family: font.family.clone(),
                    font_size: font.size,
                    color: *color,
                    id: item.id.to_string(),
                    child_nodes,
                }
            }
            ItemKind::Shortcut { target_path, .. } => RecordPayload::Shortcut {
                target_path: target_path.display().to_string(),
            },
            ItemKind::Directory { dir_path, .. } => RecordPayload::Directory {
                dir_path: dir_path.display().to_string(),
            },
            ItemKind::Media { media_path, .. } => RecordPayload::Media {
                media_path: media_path.display().to_string(),
            },
            ItemKind::Url { url, .. } => RecordPayload::Url { url: url.clone() },
            ItemKind::Image {
                file_path: Some(path),
                ..
            } => RecordPayload::Image {
                file_path: path.display().to_string(),
            },
            ItemKind::Image {
                file_path: None, ..
            } => {
                log::warn!("skipping image item {}: no source path to persist", item.id);
                continue;
            }
        };
        if payload.payload_str().is_some_and(str::is_empty) {
            log::warn!("skipping {} item {}: empty payload", payload.tag(), item.id);
            continue;
        }
        items.push(ItemRecord {
            x: item.pos.x,
            y: item.pos.y,
            payload,
        });
    }

    MapDocument {
        view_state: Some(view),
        items,
    }
}

// ─── Decode ─────────────────────────────────────────────────────────────

/// Replace the scene's contents with the document in `json`.
///
/// The document must be a JSON object; anything else, a bare array
/// included, aborts with `CodecError::Parse` before the scene is touched.
/// Item records are decoded one at a time: a record that does not decode
/// (unknown `type` tag, missing fields) loses that record with a warning,
/// not the whole load. Returns the persisted view state, when the document
/// carries one.
pub fn decode_scene(scene: &mut Scene, json: &str) -> Result<Option<ViewState>, CodecError> {
    let document: serde_json::Value = serde_json::from_str(json)?;
    let serde_json::Value::Object(mut fields) = document else {
        return Err(CodecError::Parse(serde::de::Error::custom(
            "the top level must be an object",
        )));
    };
    let view_state = match fields.remove("view_state") {
        Some(value) => Some(serde_json::from_value(value)?),
        None => None,
    };
    let entries = match fields.remove("items") {
        Some(serde_json::Value::Array(entries)) => entries,
        Some(_) => {
            return Err(CodecError::Parse(serde::de::Error::custom(
                "items must be an array",
            )));
        }
        None => Vec::new(),
    };
    let mut items = Vec::with_capacity(entries.len());
    for entry in entries {
        match serde_json::from_value(entry) {
            Ok(record) => items.push(record),
            Err(err) => log::warn!("skipping unreadable item record: {err}"),
        }
    }
    Ok(apply_document(scene, MapDocument { view_state, items }))
}

/// Replay a parsed document into `scene`, clearing it first.
pub fn apply_document(scene: &mut Scene, doc: MapDocument) -> Option<ViewState> {
    scene.clear();

    // Phase 1: recreate items in file order. Each text node remembers the
    // id it carried in the file; child lists wait until every node exists.
    let mut pending: Vec<(NodeIndex, SmallVec<[String; 4]>)> = Vec::new();
    for record in doc.items {
        if record.payload.payload_str().is_some_and(str::is_empty) {
            log::warn!("skipping {} record: empty payload", record.payload.tag());
            continue;
        }
        let pos = Point::new(record.x, record.y);
        match record.payload {
            RecordPayload::TextNode {
                content,
                font_family,
                font_size,
                color,
                id,
                child_nodes,
            } => {
                let mut item = CanvasItem::text(pos, content);
                if let ItemKind::Text {
                    font,
                    color: item_color,
                    restored_id,
                    ..
                } = &mut item.kind
                {
                    *font = FontDesc {
                        family: font_family,
                        size: font_size,
                    };
                    *item_color = color;
                    *restored_id = Some(id);
                }
                let idx = scene.insert(item);
                if !child_nodes.is_empty() {
                    pending.push((idx, child_nodes));
                }
            }
            RecordPayload::Shortcut { target_path } => {
                scene.insert(CanvasItem::shortcut(pos, target_path.into()));
            }
            RecordPayload::Directory { dir_path } => {
                scene.insert(CanvasItem::directory(pos, dir_path.into()));
            }
            RecordPayload::Media { media_path } => {
                scene.insert(CanvasItem::media(pos, media_path.into()));
            }
            RecordPayload::Url { url } => {
                scene.insert(CanvasItem::url(pos, url));
            }
            RecordPayload::Image { file_path } => match image::open(&file_path) {
                Ok(img) => {
                    scene.insert(CanvasItem::image(
                        pos,
                        Some(file_path.into()),
                        img.to_rgba8(),
                    ));
                }
                Err(err) => log::warn!("skipping image record {file_path}: {err}"),
            },
        }
    }

    // Phase 2: resolve child ids through a lookup over every text node
    // present. An unknown or refused id loses that link, nothing else.
    let lookup: HashMap<String, NodeIndex> = scene
        .text_nodes()
        .filter_map(|idx| match scene.get(idx).map(|item| &item.kind) {
            Some(ItemKind::Text {
                restored_id: Some(rid),
                ..
            }) => Some((rid.clone(), idx)),
            _ => None,
        })
        .collect();

    for (parent, child_ids) in pending {
        for child_id in child_ids {
            match lookup.get(&child_id) {
                Some(&child) => {
                    if !scene.add_child(parent, child) {
                        log::warn!("dropping child link to {child_id}: refused");
                    }
                }
                None => log::warn!("dropping child link to {child_id}: no such node"),
            }
        }
    }

    doc.view_state
}

// ─── Files ──────────────────────────────────────────────────────────────

/// Serialize the scene and atomically replace `path`.
///
/// The document is written to a temp file in the destination directory
/// first and then renamed over the target, so a failed write never
/// truncates an existing map.
pub fn save_scene(path: &Path, scene: &Scene, view: ViewState) -> Result<(), CodecError> {
    let doc = encode_scene(scene, view);
    let json = serde_json::to_string_pretty(&doc)?;
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(json.as_bytes())?;
    tmp.persist(path).map_err(|e| CodecError::Io(e.error))?;
    log::trace!("saved {} items to {}", scene.len(), path.display());
    Ok(())
}

/// Read and decode `path` into `scene`. The scene is untouched on error.
pub fn load_scene(path: &Path, scene: &mut Scene) -> Result<Option<ViewState>, CodecError> {
    let json = fs::read_to_string(path)?;
    decode_scene(scene, &json)
}
