//! Keyboard collection for the drive loop.
//!
//! Physical keys are folded into four logical directions. Letter keys and
//! arrow keys alias the same direction, so releasing either alias clears it.

use bevy::input::ButtonInput;
use bevy::prelude::*;

/// One of the four steering directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect)]
pub enum Direction {
    /// Towards the top of the container.
    Up,
    /// Towards the bottom of the container.
    Down,
    /// Towards the left edge.
    Left,
    /// Towards the right edge.
    Right,
}

/// Directions currently held down.
///
/// Written only by [`collect_input_system`]; the motion integrator reads it.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq, Eq, Reflect)]
#[reflect(Resource, Default)]
#[expect(
    clippy::struct_excessive_bools,
    reason = "One flag per steering direction."
)]
pub struct InputState {
    /// Up is held.
    pub up: bool,
    /// Down is held.
    pub down: bool,
    /// Left is held.
    pub left: bool,
    /// Right is held.
    pub right: bool,
}

impl InputState {
    /// Marks `direction` as held.
    pub const fn press(&mut self, direction: Direction) {
        self.set(direction, true);
    }

    /// Marks `direction` as released.
    pub const fn release(&mut self, direction: Direction) {
        self.set(direction, false);
    }

    /// Returns whether `direction` is held.
    #[must_use]
    pub const fn is_held(&self, direction: Direction) -> bool {
        match direction {
            Direction::Up => self.up,
            Direction::Down => self.down,
            Direction::Left => self.left,
            Direction::Right => self.right,
        }
    }

    /// Returns `true` when no direction is held.
    #[must_use]
    pub const fn is_idle(&self) -> bool {
        !(self.up || self.down || self.left || self.right)
    }

    const fn set(&mut self, direction: Direction, held: bool) {
        match direction {
            Direction::Up => self.up = held,
            Direction::Down => self.down = held,
            Direction::Left => self.left = held,
            Direction::Right => self.right = held,
        }
    }
}

/// Set while a text-entry widget owns the keyboard.
///
/// Both presses and releases are dropped in that state, so a key released
/// while typing stays held until it is pressed and released again.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TextEntryFocus(pub bool);

/// Maps a physical key to its steering direction.
///
/// # Examples
///
/// ```
/// use bevy::prelude::KeyCode;
/// use trackfolio::input::{direction_for_key, Direction};
///
/// assert_eq!(direction_for_key(KeyCode::KeyW), Some(Direction::Up));
/// assert_eq!(direction_for_key(KeyCode::ArrowUp), Some(Direction::Up));
/// assert_eq!(direction_for_key(KeyCode::Space), None);
/// ```
#[must_use]
pub const fn direction_for_key(key: KeyCode) -> Option<Direction> {
    match key {
        KeyCode::KeyW | KeyCode::ArrowUp => Some(Direction::Up),
        KeyCode::KeyS | KeyCode::ArrowDown => Some(Direction::Down),
        KeyCode::KeyA | KeyCode::ArrowLeft => Some(Direction::Left),
        KeyCode::KeyD | KeyCode::ArrowRight => Some(Direction::Right),
        _ => None,
    }
}

/// Maps digit keys `1..=9` to a zero-based marker ordinal.
#[must_use]
pub const fn marker_ordinal_for_key(key: KeyCode) -> Option<usize> {
    match key {
        KeyCode::Digit1 => Some(0),
        KeyCode::Digit2 => Some(1),
        KeyCode::Digit3 => Some(2),
        KeyCode::Digit4 => Some(3),
        KeyCode::Digit5 => Some(4),
        KeyCode::Digit6 => Some(5),
        KeyCode::Digit7 => Some(6),
        KeyCode::Digit8 => Some(7),
        KeyCode::Digit9 => Some(8),
        _ => None,
    }
}

/// Folds this frame's key edges into [`InputState`].
#[expect(
    clippy::needless_pass_by_value,
    reason = "Bevy systems require parameters by value, not by reference."
)]
pub fn collect_input_system(
    keyboard: Res<ButtonInput<KeyCode>>,
    focus: Res<TextEntryFocus>,
    mut input: ResMut<InputState>,
) {
    if focus.0 {
        return;
    }

    for direction in keyboard.get_just_pressed().copied().filter_map(direction_for_key) {
        input.press(direction);
    }
    for direction in keyboard.get_just_released().copied().filter_map(direction_for_key) {
        input.release(direction);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::w(KeyCode::KeyW, Direction::Up)]
    #[case::arrow_up(KeyCode::ArrowUp, Direction::Up)]
    #[case::s(KeyCode::KeyS, Direction::Down)]
    #[case::arrow_down(KeyCode::ArrowDown, Direction::Down)]
    #[case::a(KeyCode::KeyA, Direction::Left)]
    #[case::arrow_left(KeyCode::ArrowLeft, Direction::Left)]
    #[case::d(KeyCode::KeyD, Direction::Right)]
    #[case::arrow_right(KeyCode::ArrowRight, Direction::Right)]
    fn keys_alias_logical_directions(#[case] key: KeyCode, #[case] expected: Direction) {
        assert_eq!(direction_for_key(key), Some(expected));
    }

    #[test]
    fn unrelated_keys_are_ignored() {
        assert_eq!(direction_for_key(KeyCode::KeyQ), None);
        assert_eq!(direction_for_key(KeyCode::Enter), None);
    }

    #[test]
    fn digits_map_to_ordinals() {
        assert_eq!(marker_ordinal_for_key(KeyCode::Digit1), Some(0));
        assert_eq!(marker_ordinal_for_key(KeyCode::Digit9), Some(8));
        assert_eq!(marker_ordinal_for_key(KeyCode::Digit0), None);
    }

    #[test]
    fn press_and_release_toggle_flags() {
        let mut input = InputState::default();
        assert!(input.is_idle());
        input.press(Direction::Left);
        assert!(input.is_held(Direction::Left));
        assert!(!input.is_idle());
        input.release(Direction::Left);
        assert!(input.is_idle());
    }

    fn input_app(focused: bool) -> App {
        let mut app = App::new();
        app.init_resource::<ButtonInput<KeyCode>>();
        app.init_resource::<InputState>();
        app.insert_resource(TextEntryFocus(focused));
        app.add_systems(Update, collect_input_system);
        app
    }

    fn press(app: &mut App, key: KeyCode) {
        let mut keyboard = app.world_mut().resource_mut::<ButtonInput<KeyCode>>();
        keyboard.clear();
        keyboard.press(key);
    }

    fn release(app: &mut App, key: KeyCode) {
        let mut keyboard = app.world_mut().resource_mut::<ButtonInput<KeyCode>>();
        keyboard.clear();
        keyboard.release(key);
    }

    #[test]
    fn releasing_an_alias_clears_the_direction() {
        let mut app = input_app(false);
        press(&mut app, KeyCode::KeyW);
        app.update();
        press(&mut app, KeyCode::ArrowUp);
        app.update();
        assert!(app.world().resource::<InputState>().up);

        release(&mut app, KeyCode::ArrowUp);
        app.update();
        assert!(!app.world().resource::<InputState>().up);
    }

    #[test]
    fn text_entry_focus_swallows_presses_and_releases() {
        let mut app = input_app(false);
        press(&mut app, KeyCode::KeyD);
        app.update();
        assert!(app.world().resource::<InputState>().right);

        app.insert_resource(TextEntryFocus(true));
        release(&mut app, KeyCode::KeyD);
        app.update();
        assert!(
            app.world().resource::<InputState>().right,
            "release while typing must not clear the flag"
        );

        press(&mut app, KeyCode::KeyA);
        app.update();
        assert!(!app.world().resource::<InputState>().left);
    }
}
