//! Authored vector outline of the circuit.
//!
//! The outline is kept as SVG path data and flattened into polygon rings on
//! load. It backs the decorative overlay and the [`SurfaceStrategy::Outline`]
//! drivability strategy; the default raster strategy never consults it.
//!
//! Supported commands are `M`/`m`, `L`/`l`, `C`/`c` and `Z`/`z`, with the
//! usual implicit repetition (extra pairs after a move-to are line-tos).
//!
//! [`SurfaceStrategy::Outline`]: crate::config::SurfaceStrategy::Outline

use bevy::math::Rect;
use bevy::prelude::Resource;
use glam::Vec2;
use thiserror::Error;

use crate::surface::SurfaceQuery;

/// Outline of the default circuit, in the track image's native pixels.
pub const TRACK_PATH_DATA: &str = "
  m 279.77841,825.6875
c 0,0 -205.262634,-113.09942 -143.30114,-154.21932 150.125,-99.62841 233.37614,-182.87954 294.79091,-167.86704 61.41477,15.0125 348.01705,-165.1375 348.01705,-165.1375 0,0 30.025,-85.98069 73.69772,-84.61591 43.67273,1.36477 383.50115,-185.609091 383.50115,-185.609091
l 230.6466,77.792041 236.1057,107.81704 -117.3705,126.92387 -148.7602,88.71023 -171.9614,65.50909 -9.5534,150.125
c 0,0 167.8671,120.1 215.6341,131.01818 47.767,10.91818 94.1693,87.34546 94.1693,87.34546
l -94.1693,73.69772 -100.9932,60.05003 -262.0363,-106.4523 73.6977,-79.15682 -257.94206,-156.94886 -84.61591,-62.77955
c 0,0 -27.29546,-27.29545 -121.46478,1.36478 -94.16931,28.66022 -330.275,176.05568 -330.275,176.05568
l -103.72272,57.32045
z
";

/// Line segments used to approximate each cubic Bézier.
pub const CURVE_SEGMENTS: usize = 16;

/// Failures while parsing path data.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathParseError {
    /// A character that is neither a command, a number nor a separator.
    #[error("unexpected character `{ch}` at byte {offset}")]
    UnexpectedCharacter {
        /// Offending character.
        ch: char,
        /// Byte offset into the path data.
        offset: usize,
    },
    /// A command ran out of coordinates.
    #[error("command `{command}` at byte {offset} is missing coordinates")]
    MissingNumber {
        /// Command being parsed.
        command: char,
        /// Byte offset of the command letter.
        offset: usize,
    },
    /// Drawing started before any move-to.
    #[error("command `{command}` at byte {offset} has no current point")]
    NoCurrentPoint {
        /// Command being parsed.
        command: char,
        /// Byte offset of the command letter.
        offset: usize,
    },
    /// Coordinates follow a command that takes none.
    #[error("stray coordinates after command `{command}` at byte {offset}")]
    StrayNumber {
        /// Command the coordinates trail.
        command: char,
        /// Byte offset of that command letter.
        offset: usize,
    },
    /// The data contained no drawable ring.
    #[error("path data contains no closed ring")]
    Empty,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Token {
    Command(char, usize),
    Number(f32),
}

fn tokenize(data: &str) -> Result<Vec<Token>, PathParseError> {
    let mut tokens = Vec::new();
    let mut chars = data.char_indices().peekable();
    while let Some(&(offset, ch)) = chars.peek() {
        if ch.is_whitespace() || ch == ',' {
            chars.next();
        } else if matches!(ch, 'M' | 'm' | 'L' | 'l' | 'C' | 'c' | 'Z' | 'z') {
            tokens.push(Token::Command(ch, offset));
            chars.next();
        } else if ch.is_ascii_digit() || matches!(ch, '-' | '+' | '.') {
            let mut end = offset;
            let mut seen_dot = false;
            let mut seen_exp = false;
            let mut first = true;
            while let Some(&(at, c)) = chars.peek() {
                let sign_ok = first
                    || data
                        .get(..at)
                        .is_some_and(|head| head.ends_with(['e', 'E']));
                let accept = c.is_ascii_digit()
                    || (matches!(c, '-' | '+') && sign_ok)
                    || (c == '.' && !seen_dot && !seen_exp)
                    || (matches!(c, 'e' | 'E') && !seen_exp && !first);
                if !accept {
                    break;
                }
                seen_dot |= c == '.';
                seen_exp |= matches!(c, 'e' | 'E');
                first = false;
                end = at + c.len_utf8();
                chars.next();
            }
            let value = data
                .get(offset..end)
                .and_then(|text| text.parse::<f32>().ok())
                .ok_or(PathParseError::UnexpectedCharacter { ch, offset })?;
            tokens.push(Token::Number(value));
        } else {
            return Err(PathParseError::UnexpectedCharacter { ch, offset });
        }
    }
    Ok(tokens)
}

struct Cursor<'a> {
    tokens: &'a [Token],
    index: usize,
}

impl Cursor<'_> {
    fn next_command(&mut self) -> Option<(char, usize)> {
        match self.tokens.get(self.index) {
            Some(Token::Command(command, offset)) => {
                self.index += 1;
                Some((*command, *offset))
            }
            _ => None,
        }
    }

    fn has_number(&self) -> bool {
        matches!(self.tokens.get(self.index), Some(Token::Number(_)))
    }

    fn point(&mut self, command: char, offset: usize) -> Result<Vec2, PathParseError> {
        let x = self.number(command, offset)?;
        let y = self.number(command, offset)?;
        Ok(Vec2::new(x, y))
    }

    fn number(&mut self, command: char, offset: usize) -> Result<f32, PathParseError> {
        match self.tokens.get(self.index) {
            Some(Token::Number(value)) => {
                self.index += 1;
                Ok(*value)
            }
            _ => Err(PathParseError::MissingNumber { command, offset }),
        }
    }
}

fn cubic(p0: Vec2, p1: Vec2, p2: Vec2, p3: Vec2, t: f32) -> Vec2 {
    let u = 1.0 - t;
    p0 * (u * u * u) + p1 * (3.0 * u * u * t) + p2 * (3.0 * u * t * t) + p3 * (t * t * t)
}

#[expect(
    clippy::cast_precision_loss,
    reason = "Segment counts are tiny."
)]
fn flatten_cubic(ring: &mut Vec<Vec2>, from: Vec2, c1: Vec2, c2: Vec2, to: Vec2) {
    for i in 1..=CURVE_SEGMENTS {
        ring.push(cubic(from, c1, c2, to, i as f32 / CURVE_SEGMENTS as f32));
    }
}

/// Parses path data into closed polygon rings.
///
/// Open subpaths are closed implicitly; rings with fewer than three vertices
/// are dropped.
///
/// # Errors
///
/// Returns a [`PathParseError`] for malformed data or when no ring survives.
pub fn parse_rings(data: &str) -> Result<Vec<Vec<Vec2>>, PathParseError> {
    let tokens = tokenize(data)?;
    let mut cursor = Cursor {
        tokens: &tokens,
        index: 0,
    };
    let mut rings = Vec::new();
    let mut ring: Vec<Vec2> = Vec::new();
    let mut current: Option<Vec2> = None;
    let mut start = Vec2::ZERO;

    if matches!(tokens.first(), Some(Token::Number(_))) {
        return Err(PathParseError::NoCurrentPoint {
            command: 'm',
            offset: 0,
        });
    }

    let mut last_command = None;
    while let Some((command, offset)) = cursor.next_command() {
        last_command = Some((command, offset));
        let relative = command.is_ascii_lowercase();
        let origin = |at: Option<Vec2>| match at {
            Some(point) if relative => point,
            _ => Vec2::ZERO,
        };
        match command.to_ascii_lowercase() {
            'm' => {
                if ring.len() >= 3 {
                    rings.push(std::mem::take(&mut ring));
                }
                ring.clear();
                let point = origin(current) + cursor.point(command, offset)?;
                start = point;
                current = Some(point);
                ring.push(point);
                while cursor.has_number() {
                    let base = origin(current);
                    let point = base + cursor.point(command, offset)?;
                    ring.push(point);
                    current = Some(point);
                }
            }
            'l' => loop {
                let from = current.ok_or(PathParseError::NoCurrentPoint { command, offset })?;
                let base = if relative { from } else { Vec2::ZERO };
                let point = base + cursor.point(command, offset)?;
                ring.push(point);
                current = Some(point);
                if !cursor.has_number() {
                    break;
                }
            },
            'c' => loop {
                let from = current.ok_or(PathParseError::NoCurrentPoint { command, offset })?;
                let base = if relative { from } else { Vec2::ZERO };
                let c1 = base + cursor.point(command, offset)?;
                let c2 = base + cursor.point(command, offset)?;
                let to = base + cursor.point(command, offset)?;
                flatten_cubic(&mut ring, from, c1, c2, to);
                current = Some(to);
                if !cursor.has_number() {
                    break;
                }
            },
            _ => {
                // Close: the ring is implicitly closed, drawing resumes at the start.
                if ring.len() >= 3 {
                    rings.push(std::mem::take(&mut ring));
                }
                ring.clear();
                current = Some(start);
            }
        }
    }
    if let Some((command, offset)) = last_command.filter(|_| cursor.has_number()) {
        return Err(PathParseError::StrayNumber { command, offset });
    }
    if ring.len() >= 3 {
        rings.push(ring);
    }

    if rings.is_empty() {
        Err(PathParseError::Empty)
    } else {
        Ok(rings)
    }
}

/// Even-odd point-in-polygon test across all rings.
#[must_use]
pub fn contains_point(rings: &[Vec<Vec2>], point: Vec2) -> bool {
    let mut inside = false;
    for ring in rings {
        let mut previous = match ring.last() {
            Some(last) => *last,
            None => continue,
        };
        for &vertex in ring {
            let crosses = (vertex.y > point.y) != (previous.y > point.y);
            if crosses {
                let x_at = vertex.x + (point.y - vertex.y) * (previous.x - vertex.x) / (previous.y - vertex.y);
                if point.x < x_at {
                    inside = !inside;
                }
            }
            previous = vertex;
        }
    }
    inside
}

/// Flattened circuit outline mapped onto the track container.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct TrackOutline {
    rings: Vec<Vec<Vec2>>,
    frame: Rect,
}

impl TrackOutline {
    /// Parses `data`, framing the outline by its own bounding box.
    ///
    /// # Errors
    ///
    /// Propagates [`PathParseError`].
    pub fn parse(data: &str) -> Result<Self, PathParseError> {
        let rings = parse_rings(data)?;
        let frame = rings
            .iter()
            .flatten()
            .fold(None, |acc: Option<Rect>, &p| {
                Some(acc.map_or_else(|| Rect::from_corners(p, p), |r| r.union_point(p)))
            })
            .ok_or(PathParseError::Empty)?;
        Ok(Self { rings, frame })
    }

    /// Replaces the frame, i.e. the region of path space shown in the container.
    #[must_use]
    pub fn with_frame(mut self, frame: Rect) -> Self {
        self.frame = frame;
        self
    }

    /// Region of path space mapped onto the container.
    #[must_use]
    pub const fn frame(&self) -> Rect {
        self.frame
    }

    /// Rings in path space.
    #[must_use]
    pub fn rings(&self) -> &[Vec<Vec2>] {
        &self.rings
    }

    /// Converts a container point into path space.
    #[must_use]
    pub fn to_path_space(&self, point: Vec2, container: Vec2) -> Vec2 {
        self.frame.min + point / container * self.frame.size()
    }

    /// Converts a path-space point into container space.
    #[must_use]
    pub fn to_container(&self, point: Vec2, container: Vec2) -> Vec2 {
        (point - self.frame.min) / self.frame.size() * container
    }

    /// Rings projected into container space, for drawing.
    #[must_use]
    pub fn container_rings(&self, container: Vec2) -> Vec<Vec<Vec2>> {
        self.rings
            .iter()
            .map(|ring| ring.iter().map(|&p| self.to_container(p, container)).collect())
            .collect()
    }
}

impl SurfaceQuery for TrackOutline {
    fn is_drivable(&self, position: Vec2, size: f32, container: Vec2) -> bool {
        if container.x <= 0.0 || container.y <= 0.0 {
            return false;
        }
        let centre = position + Vec2::splat(size / 2.0);
        contains_point(&self.rings, self.to_path_space(centre, container))
    }
}
