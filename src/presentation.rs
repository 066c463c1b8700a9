//! Presentation layer: camera, sprites, the content panel and surface capture.
//!
//! `PresentationPlugin` draws what [`crate::DrivePlugin`] simulates. It only
//! reads the drive state, except for installing the captured track raster
//! into [`RasterSurface`] once the image has loaded.
//!
//! Container space has its origin at the top-left corner of the track with y
//! growing downwards; world space is centred on the track with y up.

use std::time::Duration;

use bevy::asset::LoadState;
use bevy::prelude::*;
use log::{debug, info};

use crate::config::Viewport;
use crate::markers::MarkerSet;
use crate::plugin::{
    CaptureStatus, DriveSystems, PanelState, SurfaceCaptureFailed, TrackImagePath,
};
use crate::proximity::PresenterEvent;
use crate::session::DriveSession;
use crate::surface::{RasterSurface, SurfaceBuffer};
use crate::track_path::TrackOutline;

/// Marker component for the main presentation camera.
#[derive(Component, Reflect, Default, Debug, Clone, Copy, PartialEq, Eq)]
#[reflect(Component, Default)]
pub struct CameraController;

/// Marker component for the avatar sprite.
///
/// Exactly one entity carries it, spawned at startup. Its transform mirrors
/// [`DriveSession::avatar`] every frame: the translation tracks the avatar
/// centre and the rotation its heading. Nothing writes back to the session.
///
/// # Examples
///
/// ```ignore
/// fn avatar_world_position(query: Query<&Transform, With<AvatarSprite>>) -> Option<Vec3> {
///     query.single().ok().map(|transform| transform.translation)
/// }
/// ```
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct AvatarSprite;

/// Marker component for the content panel text.
///
/// The panel sits below the track in container space. Its text and
/// visibility follow [`PanelState`], so it is hidden until a section is
/// revealed and cleared again on hide.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct PanelText;

/// Marker component for one straight piece of the outline overlay.
///
/// The overlay is respawned whenever [`TrackOutline`] changes, for example
/// when the captured image reframes it.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct OutlineSegment;

/// Handle of the track background being captured.
///
/// Inserted by the startup scene, or by tests that add an [`Image`] to
/// [`Assets<Image>`] themselves. [`capture_surface_system`] polls it until
/// the raster is captured or the load fails; once [`CaptureStatus`] settles
/// the handle is only used by the track sprite.
///
/// # Examples
///
/// ```ignore
/// let handle = app.world_mut().resource_mut::<Assets<Image>>().add(image);
/// app.insert_resource(TrackImage(handle));
/// ```
#[derive(Resource, Debug, Clone)]
pub struct TrackImage(pub Handle<Image>);

/// Tuning for the smooth scroll between the track and the panel.
#[derive(Resource, Clone, Debug, PartialEq)]
pub struct ScrollSettings {
    /// Fraction of the remaining distance covered per second.
    pub rate: f32,
    /// Clamp applied to the frame delta so hitches do not overshoot.
    pub max_delta_seconds: f32,
}

impl Default for ScrollSettings {
    fn default() -> Self {
        Self {
            rate: 6.0,
            max_delta_seconds: 0.1,
        }
    }
}

/// Where the camera is heading, in container-space y of the view centre.
#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct ScrollTarget(pub f32);

/// Maps a container-space point to world space.
///
/// ```
/// use bevy::math::Vec2;
/// use trackfolio::config::Viewport;
/// use trackfolio::presentation::container_to_world;
///
/// let viewport = Viewport::default();
/// assert_eq!(container_to_world(Vec2::ZERO, &viewport), Vec2::new(-640.0, 400.0));
/// ```
#[must_use]
pub fn container_to_world(point: Vec2, viewport: &Viewport) -> Vec2 {
    Vec2::new(point.x - viewport.width / 2.0, viewport.height / 2.0 - point.y)
}

/// Sprite rotation for a heading measured clockwise in a y-down frame.
#[must_use]
pub fn heading_rotation(heading_degrees: f32) -> Quat {
    Quat::from_rotation_z(-heading_degrees.to_radians())
}

/// Container-space y the camera centres on when the panel is shown.
#[must_use]
pub fn panel_scroll_target(viewport: &Viewport) -> f32 {
    viewport.height + viewport.panel_height / 2.0
}

/// Container-space y the camera centres on at the top of the page.
#[must_use]
pub fn top_scroll_target(viewport: &Viewport) -> f32 {
    viewport.height / 2.0
}

/// Moves `current` towards `target` by an exponential ease, snapping when close.
#[must_use]
pub fn ease_towards(current: f32, target: f32, rate: f32, delta_seconds: f32) -> f32 {
    let step = (rate * delta_seconds).clamp(0.0, 1.0);
    let next = current + (target - current) * step;
    if (target - next).abs() < 0.5 {
        target
    } else {
        next
    }
}

/// One outline segment placed in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlaySegment {
    /// Midpoint of the segment.
    pub centre: Vec2,
    /// Segment length.
    pub length: f32,
    /// Counter-clockwise angle from the world x axis, in radians.
    pub angle: f32,
}

/// Splits every closed ring of `outline` into world-space segments.
///
/// Each ring contributes one segment per vertex, including the closing edge
/// back to its first vertex. Zero-length edges are skipped.
#[must_use]
pub fn outline_overlay(outline: &TrackOutline, viewport: &Viewport) -> Vec<OverlaySegment> {
    outline
        .container_rings(viewport.container())
        .iter()
        .flat_map(|ring| {
            ring.iter()
                .zip(ring.iter().cycle().skip(1))
                .map(|(&from, &to)| {
                    let start = container_to_world(from, viewport);
                    let end = container_to_world(to, viewport);
                    let span = end - start;
                    OverlaySegment {
                        centre: (start + end) / 2.0,
                        length: span.length(),
                        angle: span.y.atan2(span.x),
                    }
                })
                .collect::<Vec<_>>()
        })
        .filter(|segment| segment.length > f32::EPSILON)
        .collect()
}

/// Plugin owning camera, sprites, panel text and the one-off surface capture.
#[derive(Debug)]
pub struct PresentationPlugin;

impl Plugin for PresentationPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<CameraController>();
        app.init_resource::<ScrollSettings>();
        app.add_observer(scroll_on_presenter_event);
        app.add_systems(Startup, (camera_setup, spawn_scene));
        app.add_systems(
            Update,
            (
                (capture_surface_system, sync_outline_overlay).chain(),
                sync_avatar_system,
                sync_panel_system,
                camera_scroll_system,
            )
                .after(DriveSystems),
        );
    }
}

/// Spawns the presentation camera at startup if no camera exists.
fn camera_setup(mut commands: Commands, cameras: Query<&Camera2d>) {
    if cameras.is_empty() {
        commands.spawn((Camera2d, CameraController, Name::new("PresentationCamera")));
    }
}

#[expect(
    clippy::needless_pass_by_value,
    reason = "Bevy system parameters use `Res<T>` by value."
)]
fn spawn_scene(
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    path: Res<TrackImagePath>,
    viewport: Res<Viewport>,
    markers: Res<MarkerSet>,
    session: Res<DriveSession>,
) {
    let container = viewport.container();
    let handle: Handle<Image> = asset_server.load(path.0.clone());
    commands.insert_resource(TrackImage(handle.clone()));
    commands.insert_resource(ScrollTarget(top_scroll_target(&viewport)));

    commands.spawn((
        Sprite {
            custom_size: Some(container),
            ..Sprite::from_image(handle)
        },
        Transform::from_translation(container_to_world(container / 2.0, &viewport).extend(0.0)),
        Name::new("Track"),
    ));

    for marker in markers.iter() {
        let centre = container_to_world(marker.center(), &viewport);
        commands
            .spawn((
                Sprite::from_color(Color::srgb(1.0, 0.6, 0.0), marker.rect.size()),
                Transform::from_translation(centre.extend(1.0)),
                Name::new(format!("Marker {}", marker.section)),
            ))
            .with_child((
                Text2d::new(marker.label.clone()),
                TextFont {
                    font_size: 12.0,
                    ..default()
                },
                TextColor(Color::WHITE),
                Transform::from_xyz(0.0, -marker.rect.height(), 1.0),
            ));
    }

    let size = session.params().avatar_size;
    commands.spawn((
        Sprite::from_color(Color::srgb(0.85, 0.1, 0.1), Vec2::new(size * 0.6, size)),
        Transform::from_translation(
            container_to_world(session.avatar().center(size), &viewport).extend(2.0),
        ),
        AvatarSprite,
        Name::new("Avatar"),
    ));

    let panel_centre = Vec2::new(container.x / 2.0, panel_scroll_target(&viewport));
    commands.spawn((
        Text2d::new(String::new()),
        TextFont {
            font_size: 24.0,
            ..default()
        },
        TextColor(Color::WHITE),
        Transform::from_translation(container_to_world(panel_centre, &viewport).extend(1.0)),
        Visibility::Hidden,
        PanelText,
        Name::new("Panel"),
    ));
    info!("scene spawned with {} markers", markers.len());
}

#[expect(
    clippy::needless_pass_by_value,
    reason = "Bevy system parameters use `Res<T>` by value."
)]
fn sync_avatar_system(
    session: Res<DriveSession>,
    viewport: Res<Viewport>,
    mut avatars: Query<&mut Transform, With<AvatarSprite>>,
) {
    let Ok(mut transform) = avatars.single_mut() else {
        return;
    };
    let avatar = session.avatar();
    let world = container_to_world(avatar.center(session.params().avatar_size), &viewport);
    transform.translation.x = world.x;
    transform.translation.y = world.y;
    transform.rotation = heading_rotation(avatar.heading_degrees);
}

#[expect(
    clippy::needless_pass_by_value,
    reason = "Bevy system parameters use `Res<T>` by value."
)]
fn sync_panel_system(
    panel: Res<PanelState>,
    mut texts: Query<(&mut Text2d, &mut Visibility), With<PanelText>>,
) {
    if !panel.is_changed() {
        return;
    }
    let Ok((mut text, mut visibility)) = texts.single_mut() else {
        return;
    };
    if let Some(shown) = panel.shown.as_ref() {
        text.0 = format!("{}\n\n{}", shown.content.title, shown.content.body);
        *visibility = Visibility::Visible;
    } else {
        text.0.clear();
        *visibility = Visibility::Hidden;
    }
}

#[expect(
    clippy::needless_pass_by_value,
    reason = "Observer systems must accept On<T> by value."
)]
fn scroll_on_presenter_event(
    event: On<PresenterEvent>,
    viewport: Res<Viewport>,
    mut target: ResMut<ScrollTarget>,
) {
    target.0 = match event.event() {
        PresenterEvent::Reveal { .. } => panel_scroll_target(&viewport),
        PresenterEvent::Hide => top_scroll_target(&viewport),
    };
    debug!("scrolling to y={}", target.0);
}

#[expect(
    clippy::needless_pass_by_value,
    reason = "Bevy system parameters use `Res<T>` by value."
)]
fn camera_scroll_system(
    time: Res<Time>,
    settings: Res<ScrollSettings>,
    viewport: Res<Viewport>,
    target: Option<Res<ScrollTarget>>,
    mut cameras: Query<&mut Transform, With<CameraController>>,
) {
    let (Some(target), Ok(mut transform)) = (target, cameras.single_mut()) else {
        return;
    };
    let delta = time
        .delta()
        .min(Duration::from_secs_f32(settings.max_delta_seconds.max(f32::EPSILON)));
    let goal = container_to_world(Vec2::new(0.0, target.0), &viewport).y;
    transform.translation.y = ease_towards(
        transform.translation.y,
        goal,
        settings.rate,
        delta.as_secs_f32(),
    );
}

#[expect(
    clippy::needless_pass_by_value,
    reason = "Bevy system parameters use `Res<T>` by value."
)]
fn sync_outline_overlay(
    mut commands: Commands,
    outline: Option<Res<TrackOutline>>,
    viewport: Res<Viewport>,
    existing: Query<Entity, With<OutlineSegment>>,
) {
    let Some(outline) = outline else {
        return;
    };
    if !outline.is_changed() {
        return;
    }
    for entity in &existing {
        commands.entity(entity).despawn();
    }
    let segments = outline_overlay(&outline, &viewport);
    for segment in &segments {
        commands.spawn((
            Sprite::from_color(
                Color::srgba(1.0, 1.0, 1.0, 0.35),
                Vec2::new(segment.length, 2.0),
            ),
            Transform {
                translation: segment.centre.extend(0.5),
                rotation: Quat::from_rotation_z(segment.angle),
                ..default()
            },
            OutlineSegment,
        ));
    }
    debug!("outline overlay drawn with {} segments", segments.len());
}

/// Captures the track raster from [`TrackImage`] once it is available.
///
/// Polls every frame until [`CaptureStatus`] settles, which covers an image
/// that was already loaded when the handle was registered as well as one
/// that arrives later. On success the raster is installed into
/// [`RasterSurface`] at the image's native size and [`TrackOutline`] is
/// reframed to the same pixel space. A failed load, or an image whose texels
/// cannot be read, triggers [`SurfaceCaptureFailed`] instead.
#[expect(
    clippy::needless_pass_by_value,
    clippy::too_many_arguments,
    reason = "Bevy systems take their resources by value, one parameter each."
)]
pub fn capture_surface_system(
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    images: Res<Assets<Image>>,
    track: Option<Res<TrackImage>>,
    path: Res<TrackImagePath>,
    mut status: ResMut<CaptureStatus>,
    mut raster: ResMut<RasterSurface>,
    outline: Option<ResMut<TrackOutline>>,
) {
    if status.is_settled() {
        return;
    }
    let Some(track) = track else {
        return;
    };
    if let LoadState::Failed(err) = asset_server.load_state(track.0.id()) {
        commands.trigger(SurfaceCaptureFailed {
            path: path.0.clone(),
            detail: err.to_string(),
        });
        return;
    }
    let Some(image) = images.get(&track.0) else {
        return;
    };
    match SurfaceBuffer::from_image(image) {
        Ok(buffer) => {
            let frame = Rect::new(
                0.0,
                0.0,
                crate::numeric::dimension_to_f32(buffer.width()),
                crate::numeric::dimension_to_f32(buffer.height()),
            );
            if let Some(mut outline) = outline {
                let reframed = outline.clone().with_frame(frame);
                *outline = reframed;
            }
            raster.install(buffer);
            *status = CaptureStatus::Captured;
        }
        Err(err) => commands.trigger(SurfaceCaptureFailed {
            path: path.0.clone(),
            detail: err.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::rstest;

    #[rstest]
    #[case(Vec2::ZERO, Vec2::new(-640.0, 400.0))]
    #[case(Vec2::new(640.0, 400.0), Vec2::ZERO)]
    #[case(Vec2::new(1280.0, 800.0), Vec2::new(640.0, -400.0))]
    fn container_maps_to_centred_world(#[case] point: Vec2, #[case] expected: Vec2) {
        assert_eq!(container_to_world(point, &Viewport::default()), expected);
    }

    #[test]
    fn heading_ninety_faces_screen_right() {
        let nose = heading_rotation(90.0) * Vec3::Y;
        assert_relative_eq!(nose.x, 1.0, epsilon = 1e-6);
        assert_relative_eq!(nose.y, 0.0, epsilon = 1e-6);
    }

    #[test]
    fn panel_target_sits_below_the_track() {
        let viewport = Viewport::default();
        assert!(panel_scroll_target(&viewport) > viewport.height);
        assert_relative_eq!(top_scroll_target(&viewport), 400.0);
    }

    #[test]
    fn overlay_traces_each_ring_edge_including_the_closing_one() {
        let outline = TrackOutline::parse("M 0,0 L 10,0 10,10 0,10 Z").unwrap_or_else(|e| panic!("{e}"));
        let viewport = Viewport::default();
        let segments = outline_overlay(&outline, &viewport);

        assert_eq!(segments.len(), 4);
        let top = segments.first().copied().unwrap_or_else(|| panic!("no segments"));
        assert_relative_eq!(top.centre.x, 0.0, epsilon = 1e-3);
        assert_relative_eq!(top.centre.y, 400.0, epsilon = 1e-3);
        assert_relative_eq!(top.length, 1280.0, epsilon = 1e-3);
        assert_relative_eq!(top.angle, 0.0, epsilon = 1e-6);

        let perimeter: f32 = segments.iter().map(|segment| segment.length).sum();
        assert_relative_eq!(perimeter, 2.0 * (1280.0 + 800.0), epsilon = 1e-2);
    }

    #[rstest]
    #[case(0.0, 100.0, 0.05, 30.0)]
    #[case(99.8, 100.0, 0.016, 100.0)]
    #[case(0.0, 100.0, 10.0, 100.0)]
    fn easing_approaches_and_snaps(
        #[case] current: f32,
        #[case] target: f32,
        #[case] delta: f32,
        #[case] expected: f32,
    ) {
        assert_relative_eq!(ease_towards(current, target, 6.0, delta), expected, epsilon = 1e-4);
    }
}
