//! Navigation markers placed on the track.

use std::fmt;

use bevy::math::Rect;
use bevy::prelude::{Reflect, ReflectDefault, ReflectResource, Resource};
use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::config::MarkerConfig;

/// Identifier of a portfolio section (`"about"`, `"contact"`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Reflect)]
pub struct SectionId(pub String);

impl SectionId {
    /// Creates an identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrows the identifier text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for SectionId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl fmt::Display for SectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Position of a marker within its [`MarkerSet`].
///
/// Identity is positional: two markers are "the same" when they are the same
/// slot, even if they point at the same section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Reflect)]
pub struct MarkerId(pub usize);

/// A rectangle on the track that opens a section.
#[derive(Debug, Clone, PartialEq, Reflect)]
pub struct Marker {
    /// Slot in the owning set.
    pub id: MarkerId,
    /// Section opened by this marker.
    pub section: SectionId,
    /// Caption, also the fallback panel title.
    pub label: String,
    /// Bounds in container space.
    pub rect: Rect,
}

impl Marker {
    /// Centre of the marker rectangle.
    #[must_use]
    pub fn center(&self) -> Vec2 {
        self.rect.center()
    }
}

/// Ordered markers; scan order is insertion order.
#[derive(Resource, Debug, Clone, Default, PartialEq, Reflect)]
#[reflect(Resource, Default)]
pub struct MarkerSet {
    markers: Vec<Marker>,
}

impl MarkerSet {
    /// Builds a set from `(section, label, rect)` triples.
    #[must_use]
    pub fn from_parts<I, S, L>(parts: I) -> Self
    where
        I: IntoIterator<Item = (S, L, Rect)>,
        S: Into<SectionId>,
        L: Into<String>,
    {
        let markers = parts
            .into_iter()
            .enumerate()
            .map(|(index, (section, label, rect))| Marker {
                id: MarkerId(index),
                section: section.into(),
                label: label.into(),
                rect,
            })
            .collect();
        Self { markers }
    }

    /// Builds a set from configuration entries.
    #[must_use]
    pub fn from_config(entries: &[MarkerConfig]) -> Self {
        Self::from_parts(
            entries
                .iter()
                .map(|m| (SectionId::new(m.section.as_str()), m.label.as_str(), m.rect())),
        )
    }

    /// Looks a marker up by slot.
    #[must_use]
    pub fn get(&self, id: MarkerId) -> Option<&Marker> {
        self.markers.get(id.0)
    }

    /// Markers in scan order.
    pub fn iter(&self) -> impl Iterator<Item = &Marker> {
        self.markers.iter()
    }

    /// Number of markers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.markers.len()
    }

    /// Whether the set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }
}

impl<'a> IntoIterator for &'a MarkerSet {
    type Item = &'a Marker;
    type IntoIter = std::slice::Iter<'a, Marker>;

    fn into_iter(self) -> Self::IntoIter {
        self.markers.iter()
    }
}
