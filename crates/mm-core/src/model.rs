//! Core data types for the mind-map canvas.
//!
//! A canvas holds heterogeneous items: editable text nodes (the only kind
//! that participates in the mind-map tree) and leaf tiles created from
//! dropped directories, shortcuts, media files, URLs, and images. Positions
//! are canvas coordinates. Sizes are derived, never stored; text measurement
//! here is an estimate, real metrics belong to the host.

use crate::id::ItemId;
use image::RgbaImage;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

// ─── Colors ─────────────────────────────────────────────────────────────

/// Solid RGB color with 8-bit channels. Persisted as a hex string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);

    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Color { r, g, b }
    }

    /// Parse `#RGB` or `#RRGGBB` (leading `#` optional, case-insensitive).
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        let digit = |c: u8| -> Option<u8> {
            match c {
                b'0'..=b'9' => Some(c - b'0'),
                b'a'..=b'f' => Some(c - b'a' + 10),
                b'A'..=b'F' => Some(c - b'A' + 10),
                _ => None,
            }
        };
        let bytes = hex.as_bytes();
        match bytes.len() {
            3 => {
                let r = digit(bytes[0])?;
                let g = digit(bytes[1])?;
                let b = digit(bytes[2])?;
                Some(Color::rgb(r << 4 | r, g << 4 | g, b << 4 | b))
            }
            6 => {
                let r = digit(bytes[0])? << 4 | digit(bytes[1])?;
                let g = digit(bytes[2])? << 4 | digit(bytes[3])?;
                let b = digit(bytes[4])? << 4 | digit(bytes[5])?;
                Some(Color::rgb(r, g, b))
            }
            _ => None,
        }
    }

    /// Canonical form: `#RRGGBB`, uppercase.
    pub fn to_hex(&self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::BLACK
    }
}

impl Serialize for Color {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Color::from_hex(&s)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid hex color {s:?}")))
    }
}

// ─── Fonts ──────────────────────────────────────────────────────────────

/// Font request carried by a text node. The host resolves the family name;
/// an unknown family falls back to whatever the platform substitutes.
#[derive(Debug, Clone, PartialEq)]
pub struct FontDesc {
    pub family: String,
    pub size: f32,
}

impl Default for FontDesc {
    fn default() -> Self {
        FontDesc {
            family: "Sans Serif".to_string(),
            size: 12.0,
        }
    }
}

// ─── Geometry ───────────────────────────────────────────────────────────

/// A point in canvas coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Point { x, y }
    }
}

/// Width/height pair.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

/// Axis-aligned bounding box in canvas coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Bounds {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Bounds {
    pub fn new(pos: Point, size: Size) -> Self {
        Bounds {
            x: pos.x,
            y: pos.y,
            width: size.width,
            height: size.height,
        }
    }

    pub fn contains(&self, px: f32, py: f32) -> bool {
        px >= self.x && px <= self.x + self.width && py >= self.y && py <= self.y + self.height
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Midpoint of the left edge.
    pub fn left_center(&self) -> Point {
        Point::new(self.x, self.y + self.height / 2.0)
    }

    /// Midpoint of the right edge.
    pub fn right_center(&self) -> Point {
        Point::new(self.x + self.width, self.y + self.height / 2.0)
    }
}

// ─── View state ─────────────────────────────────────────────────────────

/// Pan/zoom of the viewport, persisted alongside the items.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewState {
    pub scale_factor: f32,
    pub center_x: f32,
    pub center_y: f32,
}

impl ViewState {
    /// Map a viewport-relative offset (pixels from the viewport center) to
    /// canvas coordinates under this transform.
    pub fn to_canvas(&self, dx: f32, dy: f32) -> Point {
        Point::new(
            self.center_x + dx / self.scale_factor,
            self.center_y + dy / self.scale_factor,
        )
    }
}

impl Default for ViewState {
    fn default() -> Self {
        ViewState {
            scale_factor: 1.0,
            center_x: 0.0,
            center_y: 0.0,
        }
    }
}

// ─── Display labels ─────────────────────────────────────────────────────

/// Character cap for tile labels before eliding.
const MAX_LABEL_CHARS: usize = 20;

/// Truncate `s` to the label cap, appending an ellipsis when cut.
pub fn display_label(s: &str) -> String {
    let mut chars = s.chars();
    let head: String = chars.by_ref().take(MAX_LABEL_CHARS).collect();
    if chars.next().is_some() {
        format!("{head}…")
    } else {
        head
    }
}

/// Last path component, or the whole path when there is none (e.g. `/`).
pub fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Host part of a URL (`https://docs.rs/winnow` → `docs.rs`). Falls back to
/// the full string when no host can be split off.
pub fn url_host(url: &str) -> String {
    let rest = url.split_once("://").map_or(url, |(_, r)| r);
    let host = rest
        .split(['/', '?', '#'])
        .next()
        .filter(|h| !h.is_empty())
        .unwrap_or(rest);
    host.to_string()
}

// ─── Canvas items ───────────────────────────────────────────────────────

/// Per-kind payload of a canvas item. Only `Text` has tree semantics.
#[derive(Debug, Clone)]
pub enum ItemKind {
    /// Editable text node, optionally linked into the mind-map tree.
    Text {
        content: String,
        font: FontDesc,
        color: Color,
        /// Identifier this node carried in the file it was loaded from.
        /// Consumed once while resolving child links on load; never written
        /// back (save files re-derive ids from item identity).
        restored_id: Option<String>,
    },
    /// A resolved shortcut, displayed as a tile pointing at its target.
    Shortcut { target_path: PathBuf, label: String },
    /// A file-system directory tile.
    Directory { dir_path: PathBuf, label: String },
    /// An audio or video file tile.
    Media { media_path: PathBuf, label: String },
    /// A web link tile, labeled by host.
    Url { url: String, label: String },
    /// A raster image. Pixels are always present; the source path only when
    /// the image came from disk, and only then can the item be persisted.
    Image {
        file_path: Option<PathBuf>,
        pixels: RgbaImage,
    },
}

impl ItemKind {
    /// Serialization tag for this kind.
    pub fn tag(&self) -> &'static str {
        match self {
            ItemKind::Text { .. } => "text_node",
            ItemKind::Shortcut { .. } => "shortcut",
            ItemKind::Directory { .. } => "directory",
            ItemKind::Media { .. } => "media",
            ItemKind::Url { .. } => "url",
            ItemKind::Image { .. } => "image",
        }
    }
}

/// Fixed footprint of icon tiles (shortcut, directory, media, URL).
const TILE_SIZE: Size = Size {
    width: 72.0,
    height: 72.0,
};

/// Padding between a text node's content and its border.
const TEXT_PADDING: f32 = 6.0;

/// Estimated footprint of text content: ~0.6em per character on the longest
/// line, 1.4em per line. Rough estimate, the host owns real text metrics.
fn text_size(content: &str, font: &FontDesc) -> Size {
    let longest = content
        .lines()
        .map(|line| line.chars().count())
        .max()
        .unwrap_or(0)
        .max(1);
    let lines = content.lines().count().max(1);
    Size {
        width: longest as f32 * font.size * 0.6 + 2.0 * TEXT_PADDING,
        height: lines as f32 * font.size * 1.4 + 2.0 * TEXT_PADDING,
    }
}

/// A placed object on the canvas.
#[derive(Debug, Clone)]
pub struct CanvasItem {
    pub id: ItemId,
    /// Top-left corner, canvas coordinates.
    pub pos: Point,
    pub selectable: bool,
    pub movable: bool,
    /// Hover text; tiles carry their full path or URL here since the label
    /// is elided.
    pub tooltip: Option<String>,
    pub kind: ItemKind,
}

impl CanvasItem {
    fn with_kind(pos: Point, kind: ItemKind, tooltip: Option<String>) -> Self {
        CanvasItem {
            id: ItemId::fresh(),
            pos,
            selectable: true,
            movable: true,
            tooltip,
            kind,
        }
    }

    pub fn text(pos: Point, content: impl Into<String>) -> Self {
        Self::with_kind(
            pos,
            ItemKind::Text {
                content: content.into(),
                font: FontDesc::default(),
                color: Color::BLACK,
                restored_id: None,
            },
            None,
        )
    }

    pub fn shortcut(pos: Point, target_path: PathBuf) -> Self {
        let label = display_label(&file_name_of(&target_path));
        let tooltip = Some(target_path.display().to_string());
        Self::with_kind(pos, ItemKind::Shortcut { target_path, label }, tooltip)
    }

    pub fn directory(pos: Point, dir_path: PathBuf) -> Self {
        let label = display_label(&file_name_of(&dir_path));
        let tooltip = Some(dir_path.display().to_string());
        Self::with_kind(pos, ItemKind::Directory { dir_path, label }, tooltip)
    }

    pub fn media(pos: Point, media_path: PathBuf) -> Self {
        let label = display_label(&file_name_of(&media_path));
        let tooltip = Some(media_path.display().to_string());
        Self::with_kind(pos, ItemKind::Media { media_path, label }, tooltip)
    }

    pub fn url(pos: Point, url: impl Into<String>) -> Self {
        let url = url.into();
        let label = display_label(&url_host(&url));
        let tooltip = Some(url.clone());
        Self::with_kind(pos, ItemKind::Url { url, label }, tooltip)
    }

    pub fn image(pos: Point, file_path: Option<PathBuf>, pixels: RgbaImage) -> Self {
        let tooltip = file_path.as_ref().map(|p| p.display().to_string());
        Self::with_kind(pos, ItemKind::Image { file_path, pixels }, tooltip)
    }

    pub fn is_text(&self) -> bool {
        matches!(self.kind, ItemKind::Text { .. })
    }

    /// Text content, when this is a text node.
    pub fn text_content(&self) -> Option<&str> {
        match &self.kind {
            ItemKind::Text { content, .. } => Some(content),
            _ => None,
        }
    }

    /// Derived footprint of this item.
    pub fn size(&self) -> Size {
        match &self.kind {
            ItemKind::Text { content, font, .. } => text_size(content, font),
            ItemKind::Image { pixels, .. } => Size {
                width: pixels.width() as f32,
                height: pixels.height() as f32,
            },
            _ => TILE_SIZE,
        }
    }

    pub fn bounds(&self) -> Bounds {
        Bounds::new(self.pos, self.size())
    }
}
