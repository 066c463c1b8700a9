//! Per-tick avatar integration.
//!
//! Everything here is a pure transition over [`AvatarState`]: the Bevy
//! systems in [`crate::plugin`] only decide *when* a tick happens. Units are
//! container pixels and ticks, matching the frame-driven loop.

use bevy::prelude::Reflect;
use glam::Vec2;

use crate::config::DriveParams;
use crate::input::InputState;

/// Position, velocity and facing of the avatar.
#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub struct AvatarState {
    /// Top-left corner of the avatar in container space (y grows downwards).
    pub position: Vec2,
    /// Displacement applied on the next integration step.
    pub velocity: Vec2,
    /// Last heading in degrees; 0° points up the screen.
    pub heading_degrees: f32,
}

impl AvatarState {
    /// Creates a stationary avatar at `position`.
    #[must_use]
    pub const fn at(position: Vec2, heading_degrees: f32) -> Self {
        Self {
            position,
            velocity: Vec2::ZERO,
            heading_degrees,
        }
    }

    /// Spawns an avatar at the configured start point.
    #[must_use]
    pub fn spawn(params: &DriveParams) -> Self {
        Self::at(params.start_position(), params.initial_heading_degrees)
    }

    /// Current speed in pixels per tick.
    #[must_use]
    pub fn speed(&self) -> f32 {
        self.velocity.length()
    }

    /// Centre of the avatar square.
    #[must_use]
    pub fn center(&self, size: f32) -> Vec2 {
        self.position + Vec2::splat(size / 2.0)
    }
}

/// Axis-aligned box the avatar's top-left corner must stay inside.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    /// Smallest allowed corner.
    pub min: Vec2,
    /// Largest allowed corner.
    pub max: Vec2,
}

impl Bounds {
    /// Derives the box from the container size.
    ///
    /// `extra_height` grows the box downwards, letting the avatar roam over a
    /// content panel laid out beneath the track.
    #[must_use]
    pub fn for_container(container: Vec2, extra_height: f32, avatar_size: f32) -> Self {
        Self {
            min: Vec2::ZERO,
            max: Vec2::new(
                container.x - avatar_size,
                container.y + extra_height - avatar_size,
            ),
        }
    }

    /// Clamps `point` into the box.
    ///
    /// A degenerate box (container smaller than the avatar) resolves to `min`
    /// rather than panicking the way `f32::clamp` would.
    #[must_use]
    pub fn clamp(&self, point: Vec2) -> Vec2 {
        Vec2::new(
            point.x.min(self.max.x).max(self.min.x),
            point.y.min(self.max.y).max(self.min.y),
        )
    }

    /// Returns whether `point` lies inside the box, edges included.
    #[must_use]
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.min.x && point.x <= self.max.x && point.y >= self.min.y && point.y <= self.max.y
    }
}

/// Unit steering vector for the held directions, or zero.
///
/// Opposing directions cancel. Diagonals are normalised so they are not
/// faster than straight lines.
///
/// # Examples
///
/// ```
/// use trackfolio::input::InputState;
/// use trackfolio::motion::acceleration_direction;
///
/// let diagonal = InputState { up: true, right: true, ..Default::default() };
/// assert!((acceleration_direction(diagonal).length() - 1.0).abs() < 1e-6);
/// assert_eq!(acceleration_direction(InputState::default()).length(), 0.0);
/// ```
#[must_use]
pub fn acceleration_direction(input: InputState) -> Vec2 {
    const fn axis(neg: bool, pos: bool) -> f32 {
        match (neg, pos) {
            (true, false) => -1.0,
            (false, true) => 1.0,
            _ => 0.0,
        }
    }

    // Container space: "up" is negative y.
    Vec2::new(axis(input.left, input.right), axis(input.up, input.down)).normalize_or_zero()
}

/// Speed cap for the current surface.
#[must_use]
pub const fn speed_cap(on_track: bool, params: &DriveParams) -> f32 {
    if on_track {
        params.max_speed_on_track
    } else {
        params.max_speed_off_track
    }
}

/// Rescales `velocity` to exactly `cap` when it is faster, keeping direction.
#[must_use]
pub fn cap_velocity(velocity: Vec2, cap: f32) -> Vec2 {
    let speed = velocity.length();
    if speed > cap {
        velocity / speed * cap
    } else {
        velocity
    }
}

/// Facing angle for `velocity`, or `previous` when moving too slowly to tell.
#[must_use]
pub fn heading_for(velocity: Vec2, previous: f32, params: &DriveParams) -> f32 {
    if velocity.length() > params.heading_speed_threshold {
        velocity.y.atan2(velocity.x).to_degrees() + params.heading_offset_degrees
    } else {
        previous
    }
}

/// Advances `avatar` by one tick.
///
/// Order matters: accelerate, cap, apply friction, integrate, clamp, then
/// update the heading from the post-friction velocity.
pub fn step(
    avatar: &mut AvatarState,
    input: InputState,
    on_track: bool,
    bounds: &Bounds,
    params: &DriveParams,
) {
    let mut velocity = avatar.velocity + acceleration_direction(input) * params.acceleration;
    velocity = cap_velocity(velocity, speed_cap(on_track, params));
    velocity *= 1.0 - params.friction;

    avatar.velocity = velocity;
    avatar.position = bounds.clamp(avatar.position + velocity);
    avatar.heading_degrees = heading_for(velocity, avatar.heading_degrees, params);
}
