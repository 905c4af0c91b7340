//! Keyboard shortcut registry.

use crate::input::Modifiers;

/// Whiteboard action bound to a keyboard shortcut.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShortcutAction {
    Undo,
    Redo,
    Clear,
}

/// A keyboard shortcut definition.
#[derive(Debug, Clone)]
pub struct Shortcut {
    pub key: &'static str,
    pub ctrl: bool,
    pub shift: bool,
    pub action: ShortcutAction,
    pub description: &'static str,
}

impl Shortcut {
    pub const fn new(
        key: &'static str,
        ctrl: bool,
        shift: bool,
        action: ShortcutAction,
        description: &'static str,
    ) -> Self {
        Self {
            key,
            ctrl,
            shift,
            action,
            description,
        }
    }

    /// Format the shortcut for display (e.g., "Ctrl+Shift+Z").
    pub fn format(&self) -> String {
        let mut parts = Vec::new();
        if self.ctrl {
            parts.push("Ctrl");
        }
        if self.shift {
            parts.push("Shift");
        }
        parts.push(self.key);
        parts.join("+")
    }

    /// Check if a pressed key with the given modifiers triggers this shortcut.
    pub fn matches(&self, key: &str, modifiers: Modifiers) -> bool {
        key.eq_ignore_ascii_case(self.key)
            && modifiers.primary() == self.ctrl
            && modifiers.shift == self.shift
            && !modifiers.alt
    }
}

static SHORTCUTS: [Shortcut; 4] = [
    Shortcut::new("Z", true, false, ShortcutAction::Undo, "Undo"),
    Shortcut::new("Z", true, true, ShortcutAction::Redo, "Redo"),
    Shortcut::new("Y", true, false, ShortcutAction::Redo, "Redo"),
    Shortcut::new("K", true, false, ShortcutAction::Clear, "Clear the board"),
];

/// Registry of all keyboard shortcuts.
pub struct ShortcutRegistry;

impl ShortcutRegistry {
    /// Get all registered shortcuts.
    pub fn all() -> &'static [Shortcut] {
        &SHORTCUTS
    }

    /// Find the action bound to a pressed key, if any.
    pub fn resolve(key: &str, modifiers: Modifiers) -> Option<ShortcutAction> {
        Self::all()
            .iter()
            .find(|shortcut| shortcut.matches(key, modifiers))
            .map(|shortcut| shortcut.action)
    }

    /// Log all shortcuts at info level.
    pub fn log_all() {
        log::info!("Keyboard shortcuts:");
        for shortcut in Self::all() {
            log::info!("  {:16} {}", shortcut.format(), shortcut.description);
        }
    }
}
