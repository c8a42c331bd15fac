//! WebGPU rendering module
//!
//! The scene is built on the CPU as one coloured triangle list in logical
//! coordinates, then mapped to NDC and drawn in a single pass.

pub mod canvas;
pub mod pipeline;
pub mod scene;
pub mod shapes;
pub mod sprites;
pub mod vertex;

pub use canvas::Canvas;
pub use pipeline::RenderState;
pub use scene::build_scene;
pub use sprites::{CharacterSprite, draw_character, sprite_for};
pub use vertex::Vertex;
