//! Shared fixture for behavioural tests that tick a headless drive app.
//!
//! rspec hands the fixture to every example by clone, so the `App` sits
//! behind an `Arc<Mutex<_>>`. Ticks go through [`DriveFixture::run_frames`]
//! so key edges are cleared the way the input plugin would.

use std::ops::{Deref, DerefMut};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use bevy::prelude::*;
use test_utils::app::{drive_app, press, release, run_frames};
use trackfolio::config::TrackfolioConfig;
use trackfolio::plugin::PanelState;
use trackfolio::session::DriveSession;
use trackfolio::surface::{RasterSurface, SurfaceBuffer};

/// `App` wrapper that may cross the rspec fixture boundary.
#[derive(Debug)]
pub struct ThreadSafeApp(pub App);

impl Deref for ThreadSafeApp {
    type Target = App;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for ThreadSafeApp {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

// SAFETY: suites run with `parallel(false)` and every access goes through the
// mutex, so the app is never touched from two threads at once.
unsafe impl Send for ThreadSafeApp {}
unsafe impl Sync for ThreadSafeApp {}

/// Cloneable handle on a drive app.
#[derive(Debug, Clone)]
pub struct DriveFixture {
    app: Arc<Mutex<ThreadSafeApp>>,
}

impl DriveFixture {
    /// Builds the app from `config` and installs `raster` as the captured track.
    pub fn bootstrap(config: TrackfolioConfig, raster: Option<SurfaceBuffer>) -> Self {
        let mut app = drive_app(config);
        if let Some(buffer) = raster {
            app.world_mut().resource_mut::<RasterSurface>().install(buffer);
        }
        Self {
            app: Arc::new(Mutex::new(ThreadSafeApp(app))),
        }
    }

    /// Locks the app, recovering from a poisoned mutex.
    pub fn app_guard(&self) -> MutexGuard<'_, ThreadSafeApp> {
        self.app.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Presses `key` on the next frame.
    pub fn press(&self, key: KeyCode) {
        press(&mut self.app_guard(), key);
    }

    /// Releases `key` on the next frame.
    pub fn release(&self, key: KeyCode) {
        release(&mut self.app_guard(), key);
    }

    /// Advances `frames` frames.
    pub fn run_frames(&self, frames: usize) {
        run_frames(&mut self.app_guard(), frames);
    }

    /// Copy of the drive session.
    pub fn session(&self) -> DriveSession {
        self.app_guard().world().resource::<DriveSession>().clone()
    }

    /// Copy of the panel state.
    pub fn panel(&self) -> PanelState {
        self.app_guard().world().resource::<PanelState>().clone()
    }
}
