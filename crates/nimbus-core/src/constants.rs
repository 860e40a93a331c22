//! Single source of truth for shared constants.
//! Values used by WGSL are injected into shader preambles by the renderer.

/// Edge length of the cloud volume box in world units. The box is centred at the origin.
pub const CLOUD_BOX_SIZE: f32 = 100.0;

/// Surface distance at which a raymarch is considered converged.
pub const RAY_EPSILON: f32 = 0.001;

/// Distance after which a ray is treated as escaping the scene.
pub const RAY_MAX_DISTANCE: f32 = 1e10;

/// Hard upper bound on raymarch iterations per ray.
pub const RAY_MAX_STEPS: u32 = 600;

/// Vertical field of view of the perspective camera, in degrees.
pub const CAMERA_FOV_Y_DEG: f32 = 30.0;

/// Near clip plane distance.
pub const CAMERA_NEAR: f32 = 1.0;

/// Far clip plane distance.
pub const CAMERA_FAR: f32 = 10_000.0;

/// Initial distance of the camera from the orbit target (camera starts on +Z).
pub const CAMERA_START_DISTANCE: f32 = 200.0;

/// Orbit distance limits.
pub const CAMERA_MIN_DISTANCE: f32 = 10.0;
pub const CAMERA_MAX_DISTANCE: f32 = 5_000.0;

/// Scene background colour (sRGB hex). Visible only where the sky pass writes nothing.
pub const BACKGROUND_RGB: u32 = 0xbfd1e5;

/// Frames separated by more than this (ms) are skipped, e.g. after a backgrounded tab.
pub const FRAME_SKIP_THRESHOLD_MS: f64 = 100.0;

/// Number of frames in the rolling frame-time window of the stats overlay.
pub const STATS_WINDOW: usize = 60;

/// Current preset file format version.
pub const PRESET_VERSION: u32 = 1;

/// Local storage key holding the last applied preset.
pub const PRESET_STORAGE_KEY: &str = "nimbus.preset";

/// Suggested file name for exported presets.
pub const PRESET_FILE_NAME: &str = "nimbus-preset.ron";
