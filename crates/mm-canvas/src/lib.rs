pub mod canvas;
pub mod classify;
pub mod platform;
pub mod url;

pub use canvas::Canvas;
pub use classify::{Payload, classify};
pub use platform::{IconProvider, NoShortcuts, ShortcutResolver, icon_for};
pub use url::normalize_url;
