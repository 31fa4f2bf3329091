//! Keyboard to action mapping.
//!
//! ## Pipeline (runs in order every `Update` frame)
//!
//! 1. [`keyboard_to_actions_system`]: refreshes held actions from
//!    `ButtonInput<KeyCode>` and queues newly pressed ones.
//! 2. [`text_entry_system`]: queues typed characters for name entry.
//! 3. The game tick reads [`ActionState`] through [`InputSource`].
//! 4. [`end_input_frame_system`]: drops edges nobody consumed.
//!
//! The game never sees a `KeyCode`: tests drive it by filling an
//! [`ActionState`] directly.

use bevy::input::keyboard::{Key, KeyboardInput};
use bevy::input::ButtonState;
use bevy::prelude::*;
use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Thrust,
    RotateLeft,
    RotateRight,
    Fire,
    Hyperspace,
    Pause,
    Escape,
    ToggleMute,
    MenuUp,
    MenuDown,
    MenuSelect,
}

/// A key event relevant to typing a name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextInput {
    Char(char),
    Backspace,
    Submit,
}

/// What the game needs from an input device.
pub trait InputSource {
    /// Level-triggered: is the action held right now.
    fn is_held(&self, action: Action) -> bool;

    /// Edge-triggered: was the action newly pressed since it was last
    /// consumed.  Clears the edge.
    fn consume(&mut self, action: Action) -> bool;

    /// Typed characters since the last call.
    fn drain_text(&mut self) -> Vec<TextInput> {
        Vec::new()
    }
}

/// Action state for the current frame.
#[derive(Resource, Debug, Default, Clone)]
pub struct ActionState {
    held: HashSet<Action>,
    pressed: HashSet<Action>,
    text: Vec<TextInput>,
}

impl ActionState {
    /// Mark an action as newly pressed and held.
    pub fn press(&mut self, action: Action) {
        self.held.insert(action);
        self.pressed.insert(action);
    }

    pub fn hold(&mut self, action: Action) {
        self.held.insert(action);
    }

    pub fn release(&mut self, action: Action) {
        self.held.remove(&action);
    }

    pub fn release_all(&mut self) {
        self.held.clear();
    }

    pub fn push_text(&mut self, input: TextInput) {
        self.text.push(input);
    }

    /// Forget edges and text that were not consumed this frame.
    pub fn end_frame(&mut self) {
        self.pressed.clear();
        self.text.clear();
    }
}

impl InputSource for ActionState {
    fn is_held(&self, action: Action) -> bool {
        self.held.contains(&action)
    }

    fn consume(&mut self, action: Action) -> bool {
        self.pressed.remove(&action)
    }

    fn drain_text(&mut self) -> Vec<TextInput> {
        std::mem::take(&mut self.text)
    }
}

/// Default bindings.  One key may drive several actions (the arrow keys both
/// fly the ship and move the menu cursor).  Space only fires, never selects.
pub const KEY_BINDINGS: &[(KeyCode, Action)] = &[
    (KeyCode::ArrowUp, Action::Thrust),
    (KeyCode::KeyW, Action::Thrust),
    (KeyCode::ArrowLeft, Action::RotateLeft),
    (KeyCode::KeyA, Action::RotateLeft),
    (KeyCode::ArrowRight, Action::RotateRight),
    (KeyCode::KeyD, Action::RotateRight),
    (KeyCode::Space, Action::Fire),
    (KeyCode::KeyH, Action::Hyperspace),
    (KeyCode::KeyP, Action::Pause),
    (KeyCode::Escape, Action::Escape),
    (KeyCode::KeyM, Action::ToggleMute),
    (KeyCode::ArrowUp, Action::MenuUp),
    (KeyCode::KeyW, Action::MenuUp),
    (KeyCode::ArrowDown, Action::MenuDown),
    (KeyCode::KeyS, Action::MenuDown),
    (KeyCode::Enter, Action::MenuSelect),
];

pub fn keyboard_to_actions_system(keys: Res<ButtonInput<KeyCode>>, mut actions: ResMut<ActionState>) {
    actions.release_all();
    for &(key, action) in KEY_BINDINGS {
        if keys.just_pressed(key) {
            actions.press(action);
        } else if keys.pressed(key) {
            actions.hold(action);
        }
    }
}

pub fn text_entry_system(mut events: MessageReader<KeyboardInput>, mut actions: ResMut<ActionState>) {
    for event in events.read() {
        if event.state != ButtonState::Pressed {
            continue;
        }
        match &event.logical_key {
            Key::Backspace => actions.push_text(TextInput::Backspace),
            Key::Enter => actions.push_text(TextInput::Submit),
            Key::Space => actions.push_text(TextInput::Char(' ')),
            Key::Character(s) => {
                for c in s.chars() {
                    actions.push_text(TextInput::Char(c));
                }
            }
            _ => {}
        }
    }
}

pub fn end_input_frame_system(mut actions: ResMut<ActionState>) {
    actions.end_frame();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn consume_clears_the_edge_but_not_the_hold() {
        let mut s = ActionState::default();
        s.press(Action::Fire);
        assert!(s.consume(Action::Fire));
        assert!(!s.consume(Action::Fire));
        assert!(s.is_held(Action::Fire));
    }

    #[test]
    fn end_frame_drops_unconsumed_edges_and_text() {
        let mut s = ActionState::default();
        s.press(Action::Pause);
        s.push_text(TextInput::Char('a'));
        s.end_frame();
        assert!(!s.consume(Action::Pause));
        assert!(s.drain_text().is_empty());
    }

    #[test]
    fn keyboard_system_maps_shared_keys_to_both_actions() {
        let mut app = App::new();
        app.init_resource::<ButtonInput<KeyCode>>()
            .init_resource::<ActionState>()
            .add_systems(Update, keyboard_to_actions_system);
        app.world_mut()
            .resource_mut::<ButtonInput<KeyCode>>()
            .press(KeyCode::ArrowUp);
        app.update();

        let mut actions = app.world_mut().resource_mut::<ActionState>();
        assert!(actions.is_held(Action::Thrust));
        assert!(actions.consume(Action::MenuUp));
        assert!(!actions.is_held(Action::Fire));
    }

    #[test]
    fn space_fires_without_selecting() {
        let mut app = App::new();
        app.init_resource::<ButtonInput<KeyCode>>()
            .init_resource::<ActionState>()
            .add_systems(Update, keyboard_to_actions_system);
        app.world_mut()
            .resource_mut::<ButtonInput<KeyCode>>()
            .press(KeyCode::Space);
        app.update();

        let mut actions = app.world_mut().resource_mut::<ActionState>();
        assert!(actions.consume(Action::Fire));
        assert!(!actions.consume(Action::MenuSelect));
        assert!(!KEY_BINDINGS
            .iter()
            .any(|&(key, action)| key == KeyCode::Space && action == Action::MenuSelect));
    }
}
