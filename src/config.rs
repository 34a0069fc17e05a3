//! Configuration constants for the backdrop
//!
//! Every tunable the scene and the update loop use lives here. Nothing is
//! overridable at runtime; the backdrop is a fixed composition.

/// Initial width of the offscreen render target in pixels
pub const RENDER_WIDTH: u32 = 800;

/// Initial height of the offscreen render target in pixels
pub const RENDER_HEIGHT: u32 = 600;

/// Target frames per second for the Bevy render loop
pub const TARGET_FPS: f64 = 60.0;

/// Number of pre-roll frames to skip before starting output
/// This allows the scene to fully load and stabilize
pub const PRE_ROLL_FRAMES: u32 = 30;

/// Camera settings
pub mod camera {
    /// Vertical field of view (degrees)
    pub const FOV_DEGREES: f32 = 75.0;

    /// Near clip plane
    pub const NEAR: f32 = 0.1;

    /// Far clip plane
    pub const FAR: f32 = 1000.0;

    /// Camera distance from the origin along +Z
    pub const DISTANCE: f32 = 7.0;
}

/// Particle field settings
pub mod particles {
    /// Number of points in the field
    pub const COUNT: usize = 900;

    /// Edge length of the cube the points are scattered in
    pub const SPREAD: f32 = 25.0;

    /// Y-rotation increment per tick (radians)
    pub const SPIN_PER_TICK: f32 = 0.0008;

    /// Point opacity
    pub const OPACITY: f32 = 0.7;
}

/// Cube swarm settings
pub mod cubes {
    /// Number of cubes in the swarm
    pub const COUNT: usize = 45;

    /// Initial positions are uniform in ±SPREAD/2 on every axis
    pub const SPREAD: f32 = 14.0;

    /// Soft bound on |x| and |y|; crossing it flips the velocity sign
    pub const BOUND: f32 = 7.0;

    /// Velocity components are uniform in ±MAX_DRIFT/2 per tick
    pub const MAX_DRIFT: f32 = 0.01;

    /// Angular rates are uniform in [0, MAX_TUMBLE) per tick
    pub const MAX_TUMBLE: f32 = 0.02;

    /// Minimum cube edge length
    pub const EDGE_MIN: f32 = 0.2;

    /// Edge lengths are EDGE_MIN plus a uniform draw in [0, EDGE_SPAN)
    pub const EDGE_SPAN: f32 = 0.5;

    /// Pointer-to-spin gain for the swarm group rotation (per tick)
    pub const SWARM_GAIN: f32 = 0.02;

    /// Lime emissive intensity on each cube
    pub const EMISSIVE_INTENSITY: f32 = 0.25;
}

/// Robot rig settings
pub mod robot {
    /// Uniform scale applied to the whole rig
    pub const SCALE: f32 = 0.65;

    /// Rig offset from the origin (x, y, z); y doubles as the float base height
    pub const BASE_OFFSET: (f32, f32, f32) = (3.5, 0.5, 0.0);

    /// Amplitude of the vertical float sinusoid
    pub const FLOAT_AMPLITUDE: f32 = 0.2;

    /// Angular rate of the float sinusoid (radians per elapsed millisecond)
    pub const FLOAT_RATE: f64 = 0.0015;

    /// Pointer-x to yaw gain (absolute assignment)
    pub const YAW_GAIN: f32 = 0.5;

    /// Pointer-y to pitch gain (absolute assignment)
    pub const PITCH_GAIN: f32 = 0.3;

    /// Amplitude of the smile scale pulse
    pub const MOUTH_AMPLITUDE: f32 = 0.05;

    /// Angular rate of the smile pulse (radians per elapsed millisecond)
    pub const MOUTH_RATE: f64 = 0.005;
}

/// Image compression settings
pub mod compression {
    /// JPEG quality level (0-100, higher = better quality but larger size)
    pub const JPEG_QUALITY: u8 = 85;
}
