//! Bevy wiring for the drive loop.
//!
//! [`DrivePlugin`] inserts the configuration-derived resources, runs input
//! collection, navigation shortcuts and the [`DriveSession`] tick as one
//! chained system set, and turns the resulting [`PresenterEvent`]s into
//! observer triggers. The plugin has no rendering dependency; the optional
//! presentation layer reacts to the same triggers.

use bevy::prelude::*;
use log::{error, info};

use crate::config::{SurfaceStrategy, TrackfolioConfig, Viewport};
use crate::content::{ContentPresenter, SectionCatalog, SectionContent};
use crate::input::{collect_input_system, marker_ordinal_for_key, InputState, TextEntryFocus};
use crate::markers::{MarkerId, MarkerSet, SectionId};
use crate::proximity::PresenterEvent;
use crate::session::DriveSession;
use crate::surface::{RasterSurface, SurfaceQuery};
use crate::track_path::{TrackOutline, TRACK_PATH_DATA};

/// System set containing the per-frame drive chain.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DriveSystems;

/// Raised when the track image cannot be turned into a surface snapshot.
#[derive(Event, Debug, Clone, PartialEq, Eq)]
pub struct SurfaceCaptureFailed {
    /// Asset path of the track image.
    pub path: String,
    /// Human-readable cause.
    pub detail: String,
}

/// Progress of the one-off track surface capture.
#[derive(Resource, Debug, Clone, Default, PartialEq, Eq)]
pub enum CaptureStatus {
    /// Waiting for the track image.
    #[default]
    Pending,
    /// The raster is installed.
    Captured,
    /// Capture gave up; the avatar stays at the off-track speed.
    Failed(String),
}

impl CaptureStatus {
    /// Whether capture has finished, successfully or not.
    #[must_use]
    pub const fn is_settled(&self) -> bool {
        !matches!(self, Self::Pending)
    }
}

/// Section currently shown in the content panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShownSection {
    /// Marker that opened it.
    pub marker: MarkerId,
    /// Section identifier.
    pub section: SectionId,
    /// Resolved content.
    pub content: SectionContent,
}

/// Content panel state, updated from [`PresenterEvent`]s.
#[derive(Resource, Debug, Clone, Default, PartialEq, Eq)]
pub struct PanelState {
    /// `None` while the panel is hidden.
    pub shown: Option<ShownSection>,
}

/// Track image asset path, copied from configuration.
#[derive(Resource, Debug, Clone, PartialEq, Eq)]
pub struct TrackImagePath(pub String);

/// Installs the drive loop.
#[derive(Debug, Default)]
pub struct DrivePlugin {
    config: TrackfolioConfig,
}

impl DrivePlugin {
    /// Creates the plugin from loaded configuration.
    #[must_use]
    pub const fn new(config: TrackfolioConfig) -> Self {
        Self { config }
    }
}

impl Plugin for DrivePlugin {
    fn build(&self, app: &mut App) {
        let config = &self.config;
        app.register_type::<InputState>()
            .register_type::<MarkerSet>();

        app.insert_resource(config.physics.clone())
            .insert_resource(config.viewport)
            .insert_resource(config.surface)
            .insert_resource(TrackImagePath(config.track_image.clone()))
            .insert_resource(MarkerSet::from_config(&config.markers))
            .insert_resource(SectionCatalog::from_config(&config.sections))
            .insert_resource(DriveSession::new(config.physics.clone()));
        app.init_resource::<ButtonInput<KeyCode>>()
            .init_resource::<InputState>()
            .init_resource::<TextEntryFocus>()
            .init_resource::<RasterSurface>()
            .init_resource::<CaptureStatus>()
            .init_resource::<PanelState>();

        match TrackOutline::parse(TRACK_PATH_DATA) {
            Ok(outline) => {
                app.insert_resource(outline);
            }
            Err(err) => error!("track outline unavailable: {err}"),
        }

        app.add_observer(apply_presenter_event);
        app.add_observer(record_capture_failure);
        app.add_systems(
            Update,
            (
                collect_input_system,
                navigation_shortcut_system,
                drive_tick_system,
            )
                .chain()
                .in_set(DriveSystems),
        );
        info!(
            "drive loop ready: {} markers, {} surface",
            config.markers.len(),
            config.surface
        );
    }
}

/// Teleports the avatar when a digit key names a marker.
#[expect(
    clippy::needless_pass_by_value,
    reason = "Bevy system parameters use `Res<T>` by value."
)]
pub fn navigation_shortcut_system(
    keyboard: Res<ButtonInput<KeyCode>>,
    focus: Res<TextEntryFocus>,
    markers: Res<MarkerSet>,
    mut session: ResMut<DriveSession>,
) {
    if focus.0 {
        return;
    }
    let target = keyboard
        .get_just_pressed()
        .filter_map(|key| marker_ordinal_for_key(*key))
        .filter_map(|ordinal| markers.get(MarkerId(ordinal)))
        .last();
    if let Some(marker) = target {
        session.teleport_to_marker(marker);
    }
}

/// Runs one [`DriveSession`] frame and triggers its presenter events.
#[expect(
    clippy::needless_pass_by_value,
    clippy::too_many_arguments,
    reason = "Bevy systems take their resources by value, one parameter each."
)]
pub fn drive_tick_system(
    mut commands: Commands,
    time: Res<Time>,
    input: Res<InputState>,
    strategy: Res<SurfaceStrategy>,
    raster: Res<RasterSurface>,
    outline: Option<Res<TrackOutline>>,
    markers: Res<MarkerSet>,
    viewport: Res<Viewport>,
    mut session: ResMut<DriveSession>,
) {
    let surface: &dyn SurfaceQuery = match (*strategy, outline.as_deref()) {
        (SurfaceStrategy::Outline, Some(outline)) => outline,
        _ => raster.as_ref(),
    };
    for event in session.tick(*input, surface, &markers, &viewport, time.delta()) {
        commands.trigger(event);
    }
}

#[expect(
    clippy::needless_pass_by_value,
    reason = "Observer systems must accept On<T> by value."
)]
fn apply_presenter_event(
    event: On<PresenterEvent>,
    markers: Res<MarkerSet>,
    catalog: Res<SectionCatalog>,
    mut panel: ResMut<PanelState>,
) {
    match event.event() {
        PresenterEvent::Reveal { marker, section } => {
            let label = markers
                .get(*marker)
                .map_or_else(|| section.as_str(), |found| found.label.as_str());
            panel.shown = Some(ShownSection {
                marker: *marker,
                section: section.clone(),
                content: catalog.content_for(section, label),
            });
        }
        PresenterEvent::Hide => panel.shown = None,
    }
}

#[expect(
    clippy::needless_pass_by_value,
    reason = "Observer systems must accept On<T> by value."
)]
fn record_capture_failure(event: On<SurfaceCaptureFailed>, mut status: ResMut<CaptureStatus>) {
    let failure = event.event();
    error!(
        "track surface capture failed for {}: {}",
        failure.path, failure.detail
    );
    *status = CaptureStatus::Failed(failure.detail.clone());
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use bevy::time::TimeUpdateStrategy;

    use crate::surface::SurfaceBuffer;

    fn app_with(config: TrackfolioConfig) -> App {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_millis(16)))
            .add_plugins(DrivePlugin::new(config));
        app
    }

    fn solid_tarmac() -> SurfaceBuffer {
        let pixels = [10_u8, 10, 10, 255].repeat(8 * 5);
        match SurfaceBuffer::from_rgba8(8, 5, pixels) {
            Ok(buffer) => buffer,
            Err(err) => panic!("fixture raster rejected: {err}"),
        }
    }

    #[test]
    fn digit_key_teleports_to_marker() {
        let config = TrackfolioConfig::default();
        let mut app = app_with(config.clone());
        app.world_mut()
            .resource_mut::<ButtonInput<KeyCode>>()
            .press(KeyCode::Digit2);
        app.update();

        let markers = MarkerSet::from_config(&config.markers);
        let Some(about) = markers.get(MarkerId(1)) else {
            panic!("default layout lacks a second marker");
        };
        let session = app.world().resource::<DriveSession>();
        assert_eq!(session.avatar().center(40.0), about.center());
    }

    #[test]
    fn focus_blocks_shortcuts() {
        let mut app = app_with(TrackfolioConfig::default());
        app.insert_resource(TextEntryFocus(true));
        app.world_mut()
            .resource_mut::<ButtonInput<KeyCode>>()
            .press(KeyCode::Digit2);
        app.update();

        let session = app.world().resource::<DriveSession>();
        assert_eq!(session.avatar().position, Vec2::new(500.0, 400.0));
    }

    #[test]
    fn dwelling_fills_the_panel() {
        let mut app = app_with(TrackfolioConfig::default());
        app.world_mut()
            .resource_mut::<RasterSurface>()
            .install(solid_tarmac());
        app.world_mut()
            .resource_mut::<ButtonInput<KeyCode>>()
            .press(KeyCode::Digit3);
        for _ in 0..80 {
            app.update();
            app.world_mut().resource_mut::<ButtonInput<KeyCode>>().clear();
        }

        let panel = app.world().resource::<PanelState>();
        let Some(shown) = panel.shown.as_ref() else {
            panic!("panel should be visible after dwelling");
        };
        assert_eq!(shown.section, SectionId::from("skills"));
        assert_eq!(shown.content.title, "Technical Skills");
    }

    #[test]
    fn capture_failure_is_recorded() {
        let mut app = app_with(TrackfolioConfig::default());
        app.world_mut().trigger(SurfaceCaptureFailed {
            path: "track.png".to_owned(),
            detail: "decoder error".to_owned(),
        });
        assert_eq!(
            *app.world().resource::<CaptureStatus>(),
            CaptureStatus::Failed("decoder error".to_owned())
        );
        assert!(!app.world().resource::<RasterSurface>().is_ready());
    }
}
