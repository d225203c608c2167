//! Host platform adapters.
//!
//! The canvas never talks to the OS shell directly. Shortcut targets and
//! tile icons come in through these traits, which keeps classification pure
//! and testable.

use image::RgbaImage;
use mm_core::model::{CanvasItem, ItemKind, url_host};
use std::path::{Path, PathBuf};

/// Resolves a shortcut/link file to the path it points at.
///
/// Implemented differently by each host environment:
/// - Windows shells read `.lnk` targets
/// - Linux shells read `.desktop` entries
/// - tests use a fixed table or `NoShortcuts`
pub trait ShortcutResolver {
    /// `None` when the link cannot be resolved; the drop then produces no
    /// item for that path.
    fn resolve(&self, shortcut: &Path) -> Option<PathBuf>;
}

/// Resolver that knows no shortcuts at all.
pub struct NoShortcuts;

impl ShortcutResolver for NoShortcuts {
    fn resolve(&self, _shortcut: &Path) -> Option<PathBuf> {
        None
    }
}

/// Produces representative icons for items that render as tiles.
pub trait IconProvider {
    fn file_icon(&self, path: &Path) -> Option<RgbaImage>;
    fn directory_icon(&self, path: &Path) -> Option<RgbaImage>;
    fn url_icon(&self, host: &str) -> Option<RgbaImage>;
}

/// Pick the provider call that fits `item`. Text nodes and pixel-bearing
/// images render from their own data, so they yield `None`.
pub fn icon_for(item: &CanvasItem, provider: &dyn IconProvider) -> Option<RgbaImage> {
    match &item.kind {
        ItemKind::Directory { dir_path, .. } => provider.directory_icon(dir_path),
        ItemKind::Shortcut { target_path, .. } => provider.file_icon(target_path),
        ItemKind::Media { media_path, .. } => provider.file_icon(media_path),
        ItemKind::Url { url, .. } => provider.url_icon(&url_host(url)),
        ItemKind::Text { .. } | ItemKind::Image { .. } => None,
    }
}
