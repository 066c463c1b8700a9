//! Tuning constants for the drive loop.
//!
//! Velocities are expressed in container pixels per tick and accelerations in
//! pixels per tick squared. These are the defaults behind
//! [`DriveParams`](crate::config::DriveParams); a config file can override any
//! of them.

/// Velocity added per tick while a direction is held.
pub const ACCELERATION: f32 = 0.5;
/// Fraction of velocity removed every tick.
pub const FRICTION: f32 = 0.08;
/// Speed cap while the avatar sits on drivable surface.
pub const MAX_SPEED_ON_TRACK: f32 = 10.0;
/// Speed cap anywhere else.
pub const MAX_SPEED_OFF_TRACK: f32 = 4.0;
/// Minimum speed at which the facing angle follows the velocity.
pub const HEADING_SPEED_THRESHOLD: f32 = 0.5;
/// Added to `atan2` so that "up" reads as 0°.
pub const HEADING_OFFSET_DEGREES: f32 = 90.0;
/// Facing angle at session start.
pub const INITIAL_HEADING_DEGREES: f32 = 90.0;
/// Edge length of the square avatar.
pub const AVATAR_SIZE: f32 = 40.0;
/// Spawn point, top-left corner of the avatar in container space.
pub const START_X: f32 = 500.0;
/// See [`START_X`].
pub const START_Y: f32 = 400.0;

/// Centre-to-centre distance below which a marker counts as "in range".
pub const PROXIMITY_THRESHOLD: f32 = 40.0;
/// How long the avatar must linger before a section opens.
pub const DWELL_MILLIS: u64 = 750;

/// Channels strictly below this value classify as tarmac.
pub const TARMAC_CEILING: u8 = 40;
/// Channels in `[TARMAC_CEILING, SHOULDER_CEILING)` classify as shoulder.
pub const SHOULDER_CEILING: u8 = 120;

/// Default track container dimensions.
pub const CONTAINER_WIDTH: f32 = 1280.0;
/// See [`CONTAINER_WIDTH`].
pub const CONTAINER_HEIGHT: f32 = 800.0;
/// Height of the content panel shown beneath the track.
pub const PANEL_HEIGHT: f32 = 600.0;
