//! The per-frame drive loop as one explicit state object.

use std::time::Duration;

use bevy::prelude::Resource;
use glam::Vec2;

use crate::config::{DriveParams, Viewport};
use crate::input::InputState;
use crate::markers::{Marker, MarkerSet};
use crate::motion::{self, AvatarState, Bounds};
use crate::proximity::{HoverSession, PresenterEvent};
use crate::surface::SurfaceQuery;

/// Avatar plus hover state, advanced once per frame by [`DriveSession::tick`].
#[derive(Resource, Debug, Clone)]
pub struct DriveSession {
    avatar: AvatarState,
    hover: HoverSession,
    params: DriveParams,
}

impl Default for DriveSession {
    fn default() -> Self {
        Self::new(DriveParams::default())
    }
}

impl DriveSession {
    /// Spawns the avatar at the configured start.
    #[must_use]
    pub fn new(params: DriveParams) -> Self {
        Self {
            avatar: AvatarState::spawn(&params),
            hover: HoverSession::from_params(&params),
            params,
        }
    }

    /// Current avatar state.
    #[must_use]
    pub const fn avatar(&self) -> &AvatarState {
        &self.avatar
    }

    /// Current hover state.
    #[must_use]
    pub const fn hover(&self) -> &HoverSession {
        &self.hover
    }

    /// Tuning in effect.
    #[must_use]
    pub const fn params(&self) -> &DriveParams {
        &self.params
    }

    /// Runs one frame.
    ///
    /// The dwell timer advances first, then the surface is sampled at the
    /// position from the previous frame, the avatar moves and finally the
    /// markers are checked against its new centre.
    pub fn tick(
        &mut self,
        input: InputState,
        surface: &dyn SurfaceQuery,
        markers: &MarkerSet,
        viewport: &Viewport,
        delta: Duration,
    ) -> Vec<PresenterEvent> {
        let mut events = Vec::new();
        events.extend(self.hover.advance(delta));

        let size = self.params.avatar_size;
        let container = viewport.container();
        let on_track = surface.is_drivable(self.avatar.position, size, container);
        let extra_height = if self.hover.panel_visible() {
            viewport.panel_height
        } else {
            0.0
        };
        let bounds = Bounds::for_container(container, extra_height, size);
        motion::step(&mut self.avatar, input, on_track, &bounds, &self.params);

        events.extend(self.hover.evaluate(self.avatar.center(size), markers));
        events
    }

    /// Parks the avatar on `marker` and stops it.
    pub fn teleport_to_marker(&mut self, marker: &Marker) {
        let half = self.params.avatar_size / 2.0;
        self.avatar.position = marker.center() - half;
        self.avatar.velocity = Vec2::ZERO;
        log::debug!("teleported to marker {} ({})", marker.id.0, marker.section);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::Direction;
    use crate::markers::{MarkerId, SectionId};
    use crate::surface::MockSurfaceQuery;
    use approx::assert_relative_eq;
    use bevy::math::Rect;
    use mockall::predicate::{always, eq};
    use rstest::{fixture, rstest};

    const FRAME: Duration = Duration::from_millis(16);

    fn surface(drivable: bool) -> MockSurfaceQuery {
        let mut surface = MockSurfaceQuery::new();
        surface.expect_is_drivable().return_const(drivable);
        surface
    }

    #[fixture]
    fn markers() -> MarkerSet {
        MarkerSet::from_parts([(
            "contact",
            "Contact",
            Rect::from_center_size(Vec2::new(900.0, 200.0), Vec2::splat(40.0)),
        )])
    }

    fn held(direction: Direction) -> InputState {
        let mut input = InputState::default();
        input.press(direction);
        input
    }

    #[rstest]
    fn samples_the_pre_step_position(markers: MarkerSet) {
        let mut session = DriveSession::default();
        let start = session.avatar().position;
        let mut surface = MockSurfaceQuery::new();
        surface
            .expect_is_drivable()
            .with(eq(start), eq(40.0), always())
            .times(1)
            .return_const(true);

        session.tick(
            held(Direction::Right),
            &surface,
            &markers,
            &Viewport::default(),
            FRAME,
        );
        assert!(session.avatar().position.x > start.x);
    }

    #[rstest]
    #[case(true, 10.0, 5.75)]
    #[case(false, 4.0, 3.68)]
    fn sustained_input_settles_under_the_active_cap(
        markers: MarkerSet,
        #[case] drivable: bool,
        #[case] cap: f32,
        #[case] settled: f32,
    ) {
        let mut session = DriveSession::default();
        let surface = surface(drivable);
        for _ in 0..200 {
            session.tick(
                held(Direction::Down),
                &surface,
                &markers,
                &Viewport::default(),
                FRAME,
            );
            assert!(session.avatar().speed() <= cap);
        }
        assert_relative_eq!(session.avatar().speed(), settled, epsilon = 1e-3);
    }

    #[rstest]
    fn teleport_then_dwell_reveals(markers: MarkerSet) {
        let mut session = DriveSession::default();
        let surface = surface(true);
        let Some(contact) = markers.get(MarkerId(0)) else {
            panic!("fixture marker missing");
        };
        session.teleport_to_marker(contact);
        assert_eq!(session.avatar().velocity, Vec2::ZERO);
        assert_eq!(session.avatar().center(40.0), contact.center());

        let mut events = Vec::new();
        for _ in 0..60 {
            events.extend(session.tick(
                InputState::default(),
                &surface,
                &markers,
                &Viewport::default(),
                FRAME,
            ));
        }
        assert_eq!(
            events,
            vec![PresenterEvent::Reveal {
                marker: MarkerId(0),
                section: SectionId::from("contact"),
            }]
        );
        assert!(session.hover().panel_visible());
    }

    #[test]
    fn visible_panel_extends_the_bounds() {
        let viewport = Viewport::default();
        let surface = surface(true);
        let markers = MarkerSet::from_parts([(
            "projects",
            "Projects",
            Rect::from_center_size(Vec2::new(600.0, 780.0), Vec2::splat(40.0)),
        )]);
        let mut session = DriveSession::default();
        let Some(projects) = markers.get(MarkerId(0)) else {
            panic!("fixture marker missing");
        };
        session.teleport_to_marker(projects);
        for _ in 0..60 {
            session.tick(InputState::default(), &surface, &markers, &viewport, FRAME);
        }
        assert!(session.hover().panel_visible());

        for _ in 0..5 {
            session.tick(held(Direction::Down), &surface, &markers, &viewport, FRAME);
        }
        assert!(session.hover().panel_visible());
        assert!(session.avatar().position.y > viewport.height - 40.0);
    }
}
