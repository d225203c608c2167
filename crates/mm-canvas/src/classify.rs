//! Drop/paste content classification.
//!
//! One classifier serves both entry points: inspect the payload, produce at
//! most one canvas item. Precedence is rule-major: every path is tried
//! against a rule before any path is tried against the next rule. A
//! directory anywhere in the payload therefore beats a media file, and any
//! path beats loose text.

use crate::platform::ShortcutResolver;
use crate::url::normalize_url;
use mm_core::model::{CanvasItem, Point};
use std::path::{Path, PathBuf};

/// Extensions treated as resolvable shortcut/link files.
const SHORTCUT_EXTENSIONS: &[&str] = &["lnk", "desktop"];

/// Audio extensions classified as media tiles.
const AUDIO_EXTENSIONS: &[&str] = &["mp3", "wav", "ogg", "flac", "aac", "m4a", "wma"];

/// Video extensions classified as media tiles.
const VIDEO_EXTENSIONS: &[&str] = &[
    "mp4", "avi", "mov", "mkv", "webm", "wmv", "flv", "m4v", "mpg", "mpeg",
];

/// What one drop or paste delivers: local paths, embedded raster bytes,
/// and/or free text. Any combination may be present.
#[derive(Debug, Clone, Default)]
pub struct Payload {
    pub paths: Vec<PathBuf>,
    pub image_bytes: Option<Vec<u8>>,
    pub text: Option<String>,
}

impl Payload {
    pub fn text(text: impl Into<String>) -> Self {
        Payload {
            text: Some(text.into()),
            ..Payload::default()
        }
    }

    pub fn paths(paths: Vec<PathBuf>) -> Self {
        Payload {
            paths,
            ..Payload::default()
        }
    }

    pub fn image(bytes: Vec<u8>) -> Self {
        Payload {
            image_bytes: Some(bytes),
            ..Payload::default()
        }
    }
}

fn extension_of(path: &Path) -> Option<String> {
    path.extension().map(|e| e.to_string_lossy().to_lowercase())
}

fn is_shortcut(path: &Path) -> bool {
    extension_of(path).is_some_and(|e| SHORTCUT_EXTENSIONS.contains(&e.as_str()))
}

fn is_media(path: &Path) -> bool {
    extension_of(path).is_some_and(|e| {
        AUDIO_EXTENSIONS.contains(&e.as_str()) || VIDEO_EXTENSIONS.contains(&e.as_str())
    })
}

/// Classify `payload` into at most one canvas item placed at `pos`.
///
/// Rules, in order: directory, shortcut, media file, decodable image
/// (paths first, then embedded bytes), URL-shaped text, plain text.
/// Whatever matches first wins; a payload matching nothing (empty text,
/// unresolvable link, unreadable file) produces `None`.
pub fn classify(
    payload: &Payload,
    pos: Point,
    resolver: &dyn ShortcutResolver,
) -> Option<CanvasItem> {
    if let Some(dir) = payload.paths.iter().find(|p| p.is_dir()) {
        return Some(CanvasItem::directory(pos, dir.clone()));
    }

    for path in payload.paths.iter().filter(|p| is_shortcut(p)) {
        match resolver.resolve(path) {
            Some(target) => return Some(CanvasItem::shortcut(pos, target)),
            None => log::warn!("unresolvable shortcut {}", path.display()),
        }
    }

    if let Some(media) = payload.paths.iter().find(|p| is_media(p)) {
        return Some(CanvasItem::media(pos, media.clone()));
    }

    for path in &payload.paths {
        if path.is_dir() || is_shortcut(path) || is_media(path) {
            continue;
        }
        match image::open(path) {
            Ok(img) => return Some(CanvasItem::image(pos, Some(path.clone()), img.to_rgba8())),
            Err(err) => log::debug!("{} is not a usable image: {err}", path.display()),
        }
    }
    if let Some(bytes) = &payload.image_bytes {
        match image::load_from_memory(bytes) {
            Ok(img) => return Some(CanvasItem::image(pos, None, img.to_rgba8())),
            Err(err) => log::debug!("embedded raster payload did not decode: {err}"),
        }
    }

    let text = payload.text.as_deref().map(str::trim).filter(|t| !t.is_empty())?;
    if let Some(url) = normalize_url(text) {
        return Some(CanvasItem::url(pos, url));
    }
    Some(CanvasItem::text(pos, text))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::NoShortcuts;
    use mm_core::model::ItemKind;

    fn at_origin(payload: &Payload) -> Option<CanvasItem> {
        classify(payload, Point::default(), &NoShortcuts)
    }

    #[test]
    fn plain_text_becomes_a_text_node() {
        let item = at_origin(&Payload::text("  remember the milk  ")).unwrap();
        assert_eq!(item.text_content(), Some("remember the milk"));
    }

    #[test]
    fn url_shaped_text_becomes_a_link_tile() {
        let item = at_origin(&Payload::text("www.example.com/page")).unwrap();
        match &item.kind {
            ItemKind::Url { url, label } => {
                assert_eq!(url, "http://www.example.com/page");
                assert_eq!(label, "www.example.com");
            }
            other => panic!("expected url tile, got {other:?}"),
        }
    }

    #[test]
    fn empty_payloads_produce_nothing() {
        assert!(at_origin(&Payload::default()).is_none());
        assert!(at_origin(&Payload::text("   ")).is_none());
        assert!(at_origin(&Payload::image(vec![0, 1, 2])).is_none());
    }

    #[test]
    fn media_extensions_are_case_insensitive() {
        let item = at_origin(&Payload::paths(vec![PathBuf::from("/music/Song.MP3")])).unwrap();
        assert!(matches!(item.kind, ItemKind::Media { .. }));
    }

    #[test]
    fn unresolvable_shortcut_alone_matches_nothing() {
        let payload = Payload::paths(vec![PathBuf::from("/missing/app.lnk")]);
        assert!(at_origin(&payload).is_none());
    }

    #[test]
    fn resolved_shortcut_points_at_its_target() {
        struct Fixed;
        impl ShortcutResolver for Fixed {
            fn resolve(&self, shortcut: &Path) -> Option<PathBuf> {
                (shortcut.extension()?.to_str()? == "desktop")
                    .then(|| PathBuf::from("/usr/bin/editor"))
            }
        }
        let payload = Payload::paths(vec![PathBuf::from("/home/mara/editor.desktop")]);
        let item = classify(&payload, Point::default(), &Fixed).unwrap();
        match &item.kind {
            ItemKind::Shortcut { target_path, .. } => {
                assert_eq!(target_path, &PathBuf::from("/usr/bin/editor"));
            }
            other => panic!("expected shortcut tile, got {other:?}"),
        }
    }

    #[test]
    fn media_beats_text_in_a_mixed_payload() {
        let payload = Payload {
            paths: vec![PathBuf::from("/clips/take-1.mp4")],
            image_bytes: None,
            text: Some("take one".to_string()),
        };
        let item = at_origin(&payload).unwrap();
        assert!(matches!(item.kind, ItemKind::Media { .. }));
    }
}
