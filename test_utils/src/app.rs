//! Headless Bevy app with the drive loop installed.

use std::time::Duration;

use bevy::input::ButtonInput;
use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use trackfolio::config::TrackfolioConfig;
use trackfolio::plugin::DrivePlugin;

/// Simulated frame length.
pub const FRAME: Duration = Duration::from_millis(16);

/// Builds a `MinimalPlugins` app whose clock advances by [`FRAME`] per update.
#[must_use]
pub fn drive_app(config: TrackfolioConfig) -> App {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins)
        .insert_resource(TimeUpdateStrategy::ManualDuration(FRAME))
        .add_plugins(DrivePlugin::new(config));
    app
}

/// Presses `key` as a fresh edge.
pub fn press(app: &mut App, key: KeyCode) {
    app.world_mut()
        .resource_mut::<ButtonInput<KeyCode>>()
        .press(key);
}

/// Releases `key` as a fresh edge.
pub fn release(app: &mut App, key: KeyCode) {
    app.world_mut()
        .resource_mut::<ButtonInput<KeyCode>>()
        .release(key);
}

/// Clears the per-frame edges; `MinimalPlugins` has no input plugin to do it.
pub fn clear_edges(app: &mut App) {
    app.world_mut()
        .resource_mut::<ButtonInput<KeyCode>>()
        .clear();
}

/// Runs `frames` updates, clearing key edges after each.
pub fn run_frames(app: &mut App, frames: usize) {
    for _ in 0..frames {
        app.update();
        clear_edges(app);
    }
}
