pub mod codec;
pub mod id;
pub mod layout;
pub mod model;
pub mod scene;

pub use codec::{CodecError, MapDocument, decode_scene, encode_scene, load_scene, save_scene};
pub use id::ItemId;
pub use layout::{LayoutConfig, organize_subtree, required_subtree_height};
pub use model::*;
pub use scene::{Connector, CubicPath, Scene, depth_color};

// Re-export petgraph's index type so downstream crates don't need a direct dependency
pub use petgraph::graph::NodeIndex;
