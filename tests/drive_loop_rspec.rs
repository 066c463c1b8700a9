//! Behavioural tests for steering and speed caps through `DrivePlugin`.

#[path = "support/drive_fixture.rs"]
mod drive_fixture;

#[path = "support/rspec_runner.rs"]
mod rspec_runner;

use approx::assert_relative_eq;
use bevy::prelude::*;
use drive_fixture::DriveFixture;
use rspec::block::Context as Scenario;
use rspec_runner::run_serial;
use test_utils::raster::{solid_raster, split_raster, GRASS, SHOULDER, TARMAC};
use trackfolio::config::{DriveParams, TrackfolioConfig};
use trackfolio::{MAX_SPEED_OFF_TRACK, MAX_SPEED_ON_TRACK, START_X, START_Y};

fn on_tarmac() -> DriveFixture {
    DriveFixture::bootstrap(TrackfolioConfig::default(), Some(solid_raster(64, 40, TARMAC)))
}

#[test]
fn holding_forward_moves_up_the_screen() {
    run_serial(&rspec::given(
        "an avatar at rest on tarmac",
        on_tarmac(),
        |scenario: &mut Scenario<DriveFixture>| {
            scenario.when("W is held for a second", |ctx| {
                ctx.before_all(|state| {
                    state.press(KeyCode::KeyW);
                    state.run_frames(60);
                });

                ctx.then("the avatar climbs without drifting sideways", |state| {
                    let avatar = *state.session().avatar();
                    assert!(avatar.position.y < START_Y);
                    assert_relative_eq!(avatar.position.x, START_X);
                });

                ctx.then("the speed stays under the on-track cap", |state| {
                    assert!(state.session().avatar().speed() <= MAX_SPEED_ON_TRACK);
                });

                ctx.then("the nose points up the screen", |state| {
                    assert_relative_eq!(state.session().avatar().heading_degrees, 0.0, epsilon = 1e-3);
                });
            });

            scenario.when("W is released", |ctx| {
                ctx.before_all(|state| {
                    state.release(KeyCode::KeyW);
                    state.run_frames(30);
                });

                ctx.then("friction slows the avatar without stopping it", |state| {
                    let speed = state.session().avatar().speed();
                    assert!(speed > 0.0);
                    assert!(speed < 0.5);
                });

                ctx.then("the heading is kept once below the threshold", |state| {
                    assert_relative_eq!(state.session().avatar().heading_degrees, 0.0, epsilon = 1e-3);
                });
            });
        },
    ));
}

#[test]
fn grass_caps_speed_lower() {
    let fixture =
        DriveFixture::bootstrap(TrackfolioConfig::default(), Some(solid_raster(64, 40, GRASS)));

    run_serial(&rspec::given(
        "an avatar on grass",
        fixture,
        |scenario: &mut Scenario<DriveFixture>| {
            scenario.when("D is held for two seconds", |ctx| {
                ctx.before_all(|state| {
                    state.press(KeyCode::KeyD);
                    state.run_frames(120);
                });

                ctx.then("the off-track cap applies", |state| {
                    let speed = state.session().avatar().speed();
                    assert!(speed <= MAX_SPEED_OFF_TRACK);
                    assert_relative_eq!(speed, MAX_SPEED_OFF_TRACK * 0.92, epsilon = 1e-3);
                });
            });
        },
    ));
}

#[test]
fn shoulder_keeps_the_track_cap_until_the_grass() {
    let config = TrackfolioConfig {
        physics: DriveParams {
            start_x: 200.0,
            ..DriveParams::default()
        },
        markers: Vec::new(),
        ..TrackfolioConfig::default()
    };
    let fixture = DriveFixture::bootstrap(config, Some(split_raster(64, 40, SHOULDER, GRASS)));

    run_serial(&rspec::given(
        "a raster with shoulder on the left and grass on the right",
        fixture,
        |scenario: &mut Scenario<DriveFixture>| {
            scenario.when("D is held across the shoulder", |ctx| {
                ctx.before_all(|state| {
                    state.press(KeyCode::KeyD);
                    state.run_frames(30);
                });

                ctx.then("the avatar is still on the shoulder", |state| {
                    assert!(state.session().avatar().position.x + 20.0 < 640.0);
                });

                ctx.then("it runs faster than the off-track cap", |state| {
                    assert!(state.session().avatar().speed() > MAX_SPEED_OFF_TRACK);
                });
            });

            scenario.when("it keeps going onto the grass", |ctx| {
                ctx.before_all(|state| state.run_frames(120));

                ctx.then("the avatar has crossed the boundary", |state| {
                    assert!(state.session().avatar().position.x + 20.0 > 640.0);
                });

                ctx.then("the off-track cap applies", |state| {
                    let speed = state.session().avatar().speed();
                    assert_relative_eq!(speed, MAX_SPEED_OFF_TRACK * 0.92, epsilon = 1e-3);
                });
            });
        },
    ));
}

#[test]
fn uncaptured_surface_is_never_drivable() {
    let fixture = DriveFixture::bootstrap(TrackfolioConfig::default(), None);

    run_serial(&rspec::given(
        "a track image that has not loaded",
        fixture,
        |scenario: &mut Scenario<DriveFixture>| {
            scenario.when("the arrow keys steer right for two seconds", |ctx| {
                ctx.before_all(|state| {
                    state.press(KeyCode::ArrowRight);
                    state.run_frames(120);
                });

                ctx.then("the avatar crawls at the off-track cap", |state| {
                    assert!(state.session().avatar().speed() <= MAX_SPEED_OFF_TRACK);
                });
            });
        },
    ));
}
