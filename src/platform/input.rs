//! Input mapping
//!
//! Translates raw key codes into discrete game actions. Actions carry no
//! payload; the session decides what each one means in the current phase.

use crate::sim::GamePhase;

/// A discrete player action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputAction {
    /// Primary action: flap, or start a run from the title screen
    Flap,
    Pause,
    Resume,
    /// Pause when running, resume when paused
    TogglePause,
    Restart,
}

/// Map a `KeyboardEvent.code` to an action for the current phase
pub fn action_for_key(code: &str, phase: GamePhase) -> Option<InputAction> {
    match code {
        "Space" | "ArrowUp" | "Enter" if phase == GamePhase::GameOver => {
            Some(InputAction::Restart)
        }
        "Space" | "ArrowUp" => Some(InputAction::Flap),
        "KeyP" | "Escape" => match phase {
            GamePhase::Running | GamePhase::Paused => Some(InputAction::TogglePause),
            _ => None,
        },
        _ => None,
    }
}

/// Whether the browser default for this key should be suppressed
///
/// Space and ArrowUp scroll the page otherwise.
pub fn suppress_default(code: &str) -> bool {
    matches!(code, "Space" | "ArrowUp")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flap_keys() {
        for phase in [GamePhase::Idle, GamePhase::Running, GamePhase::Paused] {
            assert_eq!(action_for_key("Space", phase), Some(InputAction::Flap));
            assert_eq!(action_for_key("ArrowUp", phase), Some(InputAction::Flap));
        }
    }

    #[test]
    fn test_flap_keys_restart_after_game_over() {
        assert_eq!(
            action_for_key("Space", GamePhase::GameOver),
            Some(InputAction::Restart)
        );
        assert_eq!(
            action_for_key("ArrowUp", GamePhase::GameOver),
            Some(InputAction::Restart)
        );
    }

    #[test]
    fn test_enter_only_restarts_after_game_over() {
        assert_eq!(
            action_for_key("Enter", GamePhase::GameOver),
            Some(InputAction::Restart)
        );
        assert_eq!(action_for_key("Enter", GamePhase::Running), None);
        assert_eq!(action_for_key("Enter", GamePhase::Idle), None);
    }

    #[test]
    fn test_pause_toggle_only_mid_run() {
        assert_eq!(
            action_for_key("KeyP", GamePhase::Running),
            Some(InputAction::TogglePause)
        );
        assert_eq!(
            action_for_key("Escape", GamePhase::Paused),
            Some(InputAction::TogglePause)
        );
        assert_eq!(action_for_key("KeyP", GamePhase::GameOver), None);
    }

    #[test]
    fn test_suppress_default() {
        assert!(suppress_default("Space"));
        assert!(!suppress_default("KeyP"));
    }
}
