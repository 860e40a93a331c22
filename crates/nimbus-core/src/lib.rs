pub mod constants;
pub mod error;
pub mod math;
pub mod params;
pub mod preset;
pub mod settings;

pub use params::SceneParams;
pub use preset::{Preset, PresetError};
pub use settings::{CloudSettings, ParamRange, SkySettings};
