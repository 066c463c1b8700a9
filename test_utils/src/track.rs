//! Marker layouts for tests.

use glam::Vec2;
use trackfolio::config::MarkerConfig;

/// Edge length of markers built by these helpers.
pub const MARKER_SIZE: f32 = 40.0;

/// A marker configuration centred on `centre`.
///
/// # Examples
/// ```
/// use glam::Vec2;
/// use test_utils::track::marker_config_at;
/// let marker = marker_config_at("about", Vec2::new(100.0, 100.0));
/// assert_eq!(marker.x, 80.0);
/// ```
#[must_use]
pub fn marker_config_at(section: &str, centre: Vec2) -> MarkerConfig {
    MarkerConfig {
        section: section.to_owned(),
        label: capitalised(section),
        x: centre.x - MARKER_SIZE / 2.0,
        y: centre.y - MARKER_SIZE / 2.0,
        width: MARKER_SIZE,
        height: MARKER_SIZE,
    }
}

fn capitalised(section: &str) -> String {
    let mut chars = section.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}
