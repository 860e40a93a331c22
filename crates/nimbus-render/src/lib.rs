pub mod clouds;
pub mod renderer;
pub mod shaders;
pub mod sky;
pub mod tonemap;

pub use clouds::CloudUniforms;
pub use renderer::{FrameUniforms, Renderer};
pub use sky::SkyUniforms;
pub use tonemap::ToneMapUniforms;
