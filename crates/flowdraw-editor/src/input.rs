use flowdraw_layout::ZoomDirection;
use flowdraw_model::{EdgeId, NodeId, Point};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::state::EditorState;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "kind", content = "id")]
pub enum HitTarget {
    Node(NodeId),
    Edge(EdgeId),
    Canvas,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Key {
    Delete,
    Backspace,
    Escape,
    Char(char),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Modifiers {
    pub ctrl: bool,
    pub meta: bool,
    pub shift: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        ctrl: false,
        meta: false,
        shift: false,
    };

    pub const CTRL: Modifiers = Modifiers {
        ctrl: true,
        meta: false,
        shift: false,
    };

    pub fn command(self) -> bool {
        self.ctrl || self.meta
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "type")]
pub enum InputEvent {
    PointerDown { position: Point, target: HitTarget },
    PointerMove { position: Point },
    PointerUp,
    PointerCancel,
    Wheel {
        position: Point,
        #[serde(rename = "deltaY")]
        delta_y: f64,
    },
    Key {
        key: Key,
        #[serde(default)]
        modifiers: Modifiers,
        #[serde(default)]
        typing: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShortcutAction {
    DeleteSelection,
    Cancel,
    SelectAll,
    Duplicate,
    ToggleMultiSelect,
    Undo,
    Redo,
}

pub fn resolve_shortcut(key: Key, modifiers: Modifiers, typing: bool) -> Option<ShortcutAction> {
    let action = match key {
        Key::Escape => return Some(ShortcutAction::Cancel),
        Key::Delete | Key::Backspace => ShortcutAction::DeleteSelection,
        Key::Char(c) if modifiers.command() => match c.to_ascii_lowercase() {
            'z' if modifiers.shift => return Some(ShortcutAction::Redo),
            'z' => return Some(ShortcutAction::Undo),
            'y' => return Some(ShortcutAction::Redo),
            'a' => ShortcutAction::SelectAll,
            'd' => ShortcutAction::Duplicate,
            _ => return None,
        },
        Key::Char('s') => ShortcutAction::ToggleMultiSelect,
        Key::Char(_) => return None,
    };
    (!typing).then_some(action)
}

impl EditorState {
    pub fn handle_event(&mut self, event: InputEvent) -> bool {
        match event {
            InputEvent::PointerDown { position, target } => self.pointer_down(position, target),
            InputEvent::PointerMove { position } => self.continue_gesture(position),
            InputEvent::PointerUp => self.finish_gesture(),
            InputEvent::PointerCancel => self.cancel_gesture(),
            InputEvent::Wheel { position, delta_y } => {
                let direction = if delta_y > 0.0 {
                    ZoomDirection::Out
                } else {
                    ZoomDirection::In
                };
                self.zoom_at(position, direction);
                true
            }
            InputEvent::Key {
                key,
                modifiers,
                typing,
            } => match resolve_shortcut(key, modifiers, typing) {
                Some(action) => self.dispatch_action(action),
                None => false,
            },
        }
    }

    fn pointer_down(&mut self, position: Point, target: HitTarget) -> bool {
        // A press without a matching release still settles the earlier gesture.
        self.finish_gesture();
        match target {
            HitTarget::Node(node) => {
                if self.connection().is_some() {
                    self.connect_through(&node)
                } else if self.is_multi_select() {
                    self.toggle_membership(&node)
                } else {
                    self.begin_drag(&node)
                }
            }
            HitTarget::Edge(edge) => self.select_edge(&edge),
            HitTarget::Canvas => {
                self.clear_single_selection();
                self.cancel_connection();
                self.begin_pan(position);
                true
            }
        }
    }

    pub fn dispatch_action(&mut self, action: ShortcutAction) -> bool {
        debug!(?action, "shortcut");
        match action {
            ShortcutAction::DeleteSelection => self.delete_selected() > 0,
            ShortcutAction::Cancel => {
                self.cancel_modes();
                true
            }
            ShortcutAction::SelectAll => {
                self.select_all();
                true
            }
            ShortcutAction::Duplicate => !self.duplicate_selected().is_empty(),
            ShortcutAction::ToggleMultiSelect => {
                self.toggle_multi_select_mode();
                true
            }
            ShortcutAction::Undo => self.undo(),
            ShortcutAction::Redo => self.redo(),
        }
    }
}
