#![cfg_attr(docsrs, feature(doc_cfg))]
//! Library crate for the trackfolio racetrack portfolio.
//!
//! The drive loop (surface sampling, motion, marker proximity and the dwell
//! timer) is pure and lives in its own modules; [`DrivePlugin`] wires it into
//! Bevy and the `render` feature adds the presentation layer.
pub mod config;
pub mod constants;
pub mod content;
pub mod dwell;
pub mod input;
pub mod logging;
pub mod markers;
pub mod motion;
pub mod numeric;
pub mod plugin;
#[cfg(feature = "render")]
#[cfg_attr(docsrs, doc(cfg(feature = "render")))]
pub mod presentation;
pub mod proximity;
pub mod session;
pub mod surface;
pub mod track_path;
pub use constants::*;

// Re-export commonly used items
pub use config::{ConfigError, DriveParams, SurfaceStrategy, TrackfolioConfig, Viewport};
pub use content::{ContentPresenter, SectionCatalog, SectionContent};
pub use dwell::{DwellTimer, TaskHandle};
pub use input::{Direction, InputState, TextEntryFocus};
pub use logging::init as init_logging;
pub use markers::{Marker, MarkerId, MarkerSet, SectionId};
pub use motion::{AvatarState, Bounds};
pub use plugin::{CaptureStatus, DrivePlugin, DriveSystems, PanelState, SurfaceCaptureFailed};
#[cfg(feature = "render")]
#[cfg_attr(docsrs, doc(cfg(feature = "render")))]
pub use presentation::PresentationPlugin;
pub use proximity::{HoverSession, PresenterEvent};
pub use session::DriveSession;
pub use surface::{RasterSurface, SurfaceBuffer, SurfaceError, SurfaceKind, SurfaceQuery};
pub use track_path::{PathParseError, TrackOutline};

pub mod prelude {
    //! Prelude exports used in documentation examples.
    //!
    //! ```rust,no_run
    //! use trackfolio::prelude::*;
    //! ```

    pub use crate::DrivePlugin;
    pub use crate::DriveSession;
    pub use crate::InputState;
    pub use crate::MarkerSet;
    pub use crate::PresenterEvent;
    pub use crate::SurfaceQuery;
    pub use crate::TrackfolioConfig;
}
