//! Marker proximity detection with a dwell delay.

use std::time::Duration;

use bevy::prelude::Event;
use glam::Vec2;

use crate::config::DriveParams;
use crate::dwell::DwellTimer;
use crate::markers::{MarkerId, MarkerSet, SectionId};

/// Notification sent to whatever renders section content.
#[derive(Event, Debug, Clone, PartialEq, Eq)]
pub enum PresenterEvent {
    /// The avatar dwelt on `marker` long enough; show `section` and scroll to
    /// the panel.
    Reveal {
        /// Marker that fired.
        marker: MarkerId,
        /// Section it opens.
        section: SectionId,
    },
    /// The avatar left every marker; hide the panel and scroll to the top.
    Hide,
}

/// Tracks which marker the avatar hovers and when its section opens.
#[derive(Debug, Clone)]
pub struct HoverSession {
    current: Option<MarkerId>,
    timer: DwellTimer<(MarkerId, SectionId)>,
    panel_visible: bool,
    threshold: f32,
    dwell: Duration,
}

impl Default for HoverSession {
    fn default() -> Self {
        Self::from_params(&DriveParams::default())
    }
}

impl HoverSession {
    /// Creates a session with the given detection radius and dwell delay.
    #[must_use]
    pub fn new(threshold: f32, dwell: Duration) -> Self {
        Self {
            current: None,
            timer: DwellTimer::new(),
            panel_visible: false,
            threshold,
            dwell,
        }
    }

    /// Creates a session tuned by `params`.
    #[must_use]
    pub fn from_params(params: &DriveParams) -> Self {
        Self::new(params.proximity_threshold, params.dwell())
    }

    /// Marker the avatar is currently associated with.
    #[must_use]
    pub const fn current(&self) -> Option<MarkerId> {
        self.current
    }

    /// Whether the content panel is shown.
    #[must_use]
    pub const fn panel_visible(&self) -> bool {
        self.panel_visible
    }

    /// Marker whose dwell timer is still running.
    #[must_use]
    pub fn armed(&self) -> Option<MarkerId> {
        self.timer.pending().map(|(marker, _)| *marker)
    }

    /// Checks every marker against the avatar centre.
    ///
    /// Every marker in range is visited; a marker different from the current
    /// one re-arms the timer and becomes current, so with several markers in
    /// range the last one scanned wins. With none in range the timer is
    /// cancelled and [`PresenterEvent::Hide`] is returned if anything was
    /// armed or shown.
    pub fn evaluate(&mut self, avatar_center: Vec2, markers: &MarkerSet) -> Option<PresenterEvent> {
        let mut near_any = false;
        for marker in markers {
            let in_range = avatar_center.distance(marker.center()) < self.threshold;
            if !in_range {
                continue;
            }
            near_any = true;
            if self.current != Some(marker.id) {
                if let Some((previous, _)) = self.timer.cancel() {
                    log::debug!("cancelled dwell on marker {}", previous.0);
                }
                self.timer
                    .schedule((marker.id, marker.section.clone()), self.dwell);
                self.current = Some(marker.id);
                log::debug!("armed dwell on marker {} ({})", marker.id.0, marker.section);
            }
        }
        if near_any {
            return None;
        }
        self.leave()
    }

    /// Advances the dwell timer; yields [`PresenterEvent::Reveal`] when it
    /// expires.
    pub fn advance(&mut self, delta: Duration) -> Option<PresenterEvent> {
        let (marker, section) = self.timer.advance(delta)?;
        self.panel_visible = true;
        log::info!("revealing section {section}");
        Some(PresenterEvent::Reveal { marker, section })
    }

    fn leave(&mut self) -> Option<PresenterEvent> {
        let was_armed = self.timer.cancel().is_some();
        let was_active = was_armed || self.current.is_some() || self.panel_visible;
        self.current = None;
        self.panel_visible = false;
        if !was_active {
            return None;
        }
        log::info!("hiding section panel");
        Some(PresenterEvent::Hide)
    }
}
