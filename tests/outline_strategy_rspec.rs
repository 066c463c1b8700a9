//! Behavioural test: the outline strategy drives the speed cap without a raster.

#[path = "support/drive_fixture.rs"]
mod drive_fixture;

#[path = "support/rspec_runner.rs"]
mod rspec_runner;

use bevy::prelude::*;
use drive_fixture::DriveFixture;
use glam::Vec2;
use rspec::block::Context as Scenario;
use rspec_runner::run_serial;
use test_utils::track::marker_config_at;
use trackfolio::config::{SurfaceStrategy, TrackfolioConfig, Viewport};
use trackfolio::surface::SurfaceQuery;
use trackfolio::track_path::{TrackOutline, TRACK_PATH_DATA};
use trackfolio::{AVATAR_SIZE, MAX_SPEED_OFF_TRACK};

/// Finds an avatar position from which a short run to the right stays inside
/// the outline.
fn inside_run_start(outline: &TrackOutline, container: Vec2) -> Vec2 {
    (0..30_u8)
        .flat_map(|row| (0..50_u8).map(move |col| (row, col)))
        .map(|(row, col)| Vec2::new(100.0 + 20.0 * f32::from(col), 100.0 + 20.0 * f32::from(row)))
        .find(|start| {
            (0..=20_u8).all(|step| {
                let probe = *start + Vec2::new(4.0 * f32::from(step), 0.0);
                outline.is_drivable(probe, AVATAR_SIZE, container)
            })
        })
        .unwrap_or_else(|| panic!("no interior run found in the authored outline"))
}

fn bootstrap() -> DriveFixture {
    let outline = TrackOutline::parse(TRACK_PATH_DATA).unwrap_or_else(|e| panic!("{e}"));
    let start = inside_run_start(&outline, Viewport::default().container());
    let config = TrackfolioConfig {
        surface: SurfaceStrategy::Outline,
        markers: vec![marker_config_at("home", start + Vec2::splat(AVATAR_SIZE / 2.0))],
        ..TrackfolioConfig::default()
    };
    DriveFixture::bootstrap(config, None)
}

#[test]
fn outline_strategy_allows_full_speed_inside_the_circuit() {
    run_serial(&rspec::given(
        "the outline strategy and no captured raster",
        bootstrap(),
        |scenario: &mut Scenario<DriveFixture>| {
            scenario.when("the avatar starts inside the circuit and accelerates", |ctx| {
                ctx.before_all(|state| {
                    state.press(KeyCode::Digit1);
                    state.run_frames(1);
                    state.press(KeyCode::KeyD);
                    state.run_frames(16);
                });

                ctx.then("it exceeds the off-track cap", |state| {
                    assert!(state.session().avatar().speed() > MAX_SPEED_OFF_TRACK);
                });
            });
        },
    ));
}
