//! Runtime configuration loaded from TOML.
//!
//! Every key is optional; missing keys fall back to the defaults in
//! [`crate::constants`] and the built-in marker layout and section catalogue.
//!
//! ```toml
//! track_image = "track.png"
//! surface = "raster"
//!
//! [physics]
//! max_speed_on_track = 12.0
//!
//! [[markers]]
//! section = "about"
//! label = "About"
//! x = 310.0
//! y = 520.0
//! ```

use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use bevy::math::Rect;
use bevy::prelude::Resource;
use glam::Vec2;
use hashbrown::HashSet;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{
    ACCELERATION, AVATAR_SIZE, CONTAINER_HEIGHT, CONTAINER_WIDTH, DWELL_MILLIS, FRICTION,
    HEADING_OFFSET_DEGREES, HEADING_SPEED_THRESHOLD, INITIAL_HEADING_DEGREES, MAX_SPEED_OFF_TRACK,
    MAX_SPEED_ON_TRACK, PANEL_HEIGHT, PROXIMITY_THRESHOLD, START_X, START_Y,
};

/// Errors raised while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read {path}: {source}")]
    Read {
        /// Path that was requested.
        path: String,
        /// Underlying I/O failure.
        source: std::io::Error,
    },
    /// The file is not valid TOML for this schema.
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),
    /// A value is outside its allowed range.
    #[error("invalid value for `{key}`: {reason}")]
    Invalid {
        /// Dotted key of the offending value.
        key: &'static str,
        /// What is wrong with it.
        reason: String,
    },
    /// Two markers or two sections share an identifier.
    #[error("duplicate {kind} `{id}`")]
    Duplicate {
        /// `"marker"` or `"section"`.
        kind: &'static str,
        /// The repeated identifier.
        id: String,
    },
}

/// Physics and detection tuning.
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DriveParams {
    /// Velocity gained per tick while steering.
    pub acceleration: f32,
    /// Fraction of velocity lost each tick.
    pub friction: f32,
    /// Speed cap on drivable surface.
    pub max_speed_on_track: f32,
    /// Speed cap elsewhere.
    pub max_speed_off_track: f32,
    /// Speed above which the heading tracks the velocity.
    pub heading_speed_threshold: f32,
    /// Offset added to `atan2`, in degrees.
    pub heading_offset_degrees: f32,
    /// Heading at spawn, in degrees.
    pub initial_heading_degrees: f32,
    /// Edge length of the avatar square.
    pub avatar_size: f32,
    /// Spawn x (top-left corner).
    pub start_x: f32,
    /// Spawn y (top-left corner).
    pub start_y: f32,
    /// Marker detection radius.
    pub proximity_threshold: f32,
    /// Dwell delay before a section opens, in milliseconds.
    pub dwell_millis: u64,
}

impl Default for DriveParams {
    fn default() -> Self {
        Self {
            acceleration: ACCELERATION,
            friction: FRICTION,
            max_speed_on_track: MAX_SPEED_ON_TRACK,
            max_speed_off_track: MAX_SPEED_OFF_TRACK,
            heading_speed_threshold: HEADING_SPEED_THRESHOLD,
            heading_offset_degrees: HEADING_OFFSET_DEGREES,
            initial_heading_degrees: INITIAL_HEADING_DEGREES,
            avatar_size: AVATAR_SIZE,
            start_x: START_X,
            start_y: START_Y,
            proximity_threshold: PROXIMITY_THRESHOLD,
            dwell_millis: DWELL_MILLIS,
        }
    }
}

impl DriveParams {
    /// Spawn point as a vector.
    #[must_use]
    pub const fn start_position(&self) -> Vec2 {
        Vec2::new(self.start_x, self.start_y)
    }

    /// Dwell delay as a [`Duration`].
    #[must_use]
    pub const fn dwell(&self) -> Duration {
        Duration::from_millis(self.dwell_millis)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        positive("physics.acceleration", self.acceleration)?;
        positive("physics.max_speed_on_track", self.max_speed_on_track)?;
        positive("physics.max_speed_off_track", self.max_speed_off_track)?;
        positive("physics.avatar_size", self.avatar_size)?;
        positive("physics.proximity_threshold", self.proximity_threshold)?;
        finite("physics.start_x", self.start_x)?;
        finite("physics.start_y", self.start_y)?;
        finite("physics.heading_speed_threshold", self.heading_speed_threshold)?;
        finite("physics.heading_offset_degrees", self.heading_offset_degrees)?;
        finite("physics.initial_heading_degrees", self.initial_heading_degrees)?;
        if !(0.0..1.0).contains(&self.friction) {
            return Err(ConfigError::Invalid {
                key: "physics.friction",
                reason: format!("{} is outside [0, 1)", self.friction),
            });
        }
        Ok(())
    }
}

/// Size of the track container and the panel beneath it.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Viewport {
    /// Container width in display pixels.
    pub width: f32,
    /// Container height in display pixels.
    pub height: f32,
    /// Height of the content panel when shown.
    pub panel_height: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: CONTAINER_WIDTH,
            height: CONTAINER_HEIGHT,
            panel_height: PANEL_HEIGHT,
        }
    }
}

impl Viewport {
    /// Container size as a vector.
    #[must_use]
    pub const fn container(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        positive("viewport.width", self.width)?;
        positive("viewport.height", self.height)?;
        if self.panel_height < 0.0 || !self.panel_height.is_finite() {
            return Err(ConfigError::Invalid {
                key: "viewport.panel_height",
                reason: format!("{} must be a non-negative number", self.panel_height),
            });
        }
        Ok(())
    }
}

/// Which drivability strategy backs the speed cap.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SurfaceStrategy {
    /// Colour-threshold the track image.
    #[default]
    Raster,
    /// Point-in-polygon against the authored track outline.
    Outline,
}

impl fmt::Display for SurfaceStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Raster => f.write_str("raster"),
            Self::Outline => f.write_str("outline"),
        }
    }
}

impl FromStr for SurfaceStrategy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "raster" => Ok(Self::Raster),
            "outline" => Ok(Self::Outline),
            other => Err(ConfigError::Invalid {
                key: "surface",
                reason: format!("unknown strategy `{other}`"),
            }),
        }
    }
}

/// One navigation marker as authored in configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkerConfig {
    /// Section opened by this marker.
    pub section: String,
    /// Text shown on the marker and used as the fallback title.
    pub label: String,
    /// Left edge in container space.
    pub x: f32,
    /// Top edge in container space.
    pub y: f32,
    /// Marker width.
    #[serde(default = "default_marker_extent")]
    pub width: f32,
    /// Marker height.
    #[serde(default = "default_marker_extent")]
    pub height: f32,
}

const fn default_marker_extent() -> f32 {
    AVATAR_SIZE
}

impl MarkerConfig {
    fn new(section: &str, label: &str, x: f32, y: f32) -> Self {
        Self {
            section: section.to_owned(),
            label: label.to_owned(),
            x,
            y,
            width: default_marker_extent(),
            height: default_marker_extent(),
        }
    }

    /// Marker rectangle in container space.
    #[must_use]
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.x + self.width, self.y + self.height)
    }
}

/// Content for one section as authored in configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionConfig {
    /// Section identifier referenced by markers.
    pub id: String,
    /// Panel heading.
    pub title: String,
    /// Panel body text.
    pub body: String,
}

/// Top-level configuration document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackfolioConfig {
    /// Track background, relative to the asset root.
    pub track_image: String,
    /// Drivability strategy.
    pub surface: SurfaceStrategy,
    /// Physics tuning.
    pub physics: DriveParams,
    /// Container geometry.
    pub viewport: Viewport,
    /// Navigation markers in scan order.
    pub markers: Vec<MarkerConfig>,
    /// Section content; sections without an entry get placeholder text.
    pub sections: Vec<SectionConfig>,
}

impl Default for TrackfolioConfig {
    fn default() -> Self {
        Self {
            track_image: "track.png".to_owned(),
            surface: SurfaceStrategy::default(),
            physics: DriveParams::default(),
            viewport: Viewport::default(),
            markers: default_markers(),
            sections: Vec::new(),
        }
    }
}

impl TrackfolioConfig {
    /// Parses and validates a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed TOML and the validation
    /// errors documented on [`TrackfolioConfig::validate`].
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates the file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Read`] when the file cannot be read, otherwise
    /// the errors of [`TrackfolioConfig::from_toml`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let config = Self::from_toml(&text)?;
        log::info!(
            "loaded {} markers and {} sections from {}",
            config.markers.len(),
            config.sections.len(),
            path.display()
        );
        Ok(config)
    }

    /// Checks ranges and identifier uniqueness.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] for out-of-range values and
    /// [`ConfigError::Duplicate`] for repeated marker sections or section ids.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.physics.validate()?;
        self.viewport.validate()?;

        let mut seen = HashSet::new();
        for marker in &self.markers {
            if !seen.insert(marker.section.as_str()) {
                return Err(ConfigError::Duplicate {
                    kind: "marker",
                    id: marker.section.clone(),
                });
            }
            finite("markers.x", marker.x)?;
            finite("markers.y", marker.y)?;
            positive("markers.width", marker.width)?;
            positive("markers.height", marker.height)?;
        }

        let mut seen = HashSet::new();
        for section in &self.sections {
            if !seen.insert(section.id.as_str()) {
                return Err(ConfigError::Duplicate {
                    kind: "section",
                    id: section.id.clone(),
                });
            }
        }
        Ok(())
    }
}

fn positive(key: &'static str, value: f32) -> Result<(), ConfigError> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            key,
            reason: format!("{value} must be a positive number"),
        })
    }
}

fn finite(key: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            key,
            reason: format!("{value} is not a finite number"),
        })
    }
}

/// Built-in marker layout, spread around the default track.
#[must_use]
pub fn default_markers() -> Vec<MarkerConfig> {
    vec![
        MarkerConfig::new("home", "Home", 560.0, 420.0),
        MarkerConfig::new("about", "About", 160.0, 520.0),
        MarkerConfig::new("skills", "Skills", 330.0, 300.0),
        MarkerConfig::new("aspirations", "Aspirations", 700.0, 160.0),
        MarkerConfig::new("projects", "Projects", 1040.0, 90.0),
        MarkerConfig::new("special", "Special Topics", 1120.0, 420.0),
        MarkerConfig::new("contact", "Contact", 820.0, 600.0),
    ]
}
