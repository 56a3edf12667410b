//! Main menu layout and click hit testing.

use crate::collision::Rect;
use crate::config::SCREEN_WIDTH;

pub const BUTTON_W: f32 = 220.0;
pub const BUTTON_H: f32 = 55.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    Start,
    ToggleSound,
    Exit,
}

pub const MENU_BUTTONS: [(MenuAction, f32); 3] = [
    (MenuAction::Start, 170.0),
    (MenuAction::ToggleSound, 240.0),
    (MenuAction::Exit, 310.0),
];

pub fn button_rect(top: f32) -> Rect {
    Rect::new((SCREEN_WIDTH - BUTTON_W) / 2.0, top, BUTTON_W, BUTTON_H)
}

pub fn button_label(action: MenuAction, sound_on: bool) -> String {
    match action {
        MenuAction::Start => "START".to_string(),
        MenuAction::ToggleSound => format!("SOUND: {}", if sound_on { "ON" } else { "OFF" }),
        MenuAction::Exit => "EXIT".to_string(),
    }
}

/// First button containing `(x, y)`, checked top to bottom.
pub fn hit_test(x: f32, y: f32) -> Option<MenuAction> {
    MENU_BUTTONS
        .iter()
        .find(|(_, top)| button_rect(*top).contains_point(x, y))
        .map(|(action, _)| *action)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buttons_are_centered() {
        let rect = button_rect(170.0);
        assert_eq!(rect, Rect::new(290.0, 170.0, 220.0, 55.0));
    }

    #[test]
    fn hit_test_maps_each_button() {
        assert_eq!(hit_test(400.0, 190.0), Some(MenuAction::Start));
        assert_eq!(hit_test(300.0, 240.0), Some(MenuAction::ToggleSound));
        assert_eq!(hit_test(509.0, 364.0), Some(MenuAction::Exit));
    }

    #[test]
    fn gaps_and_outside_miss() {
        // Between START (ends at 225) and SOUND (starts at 240).
        assert_eq!(hit_test(400.0, 230.0), None);
        assert_eq!(hit_test(400.0, 225.0), None);
        assert_eq!(hit_test(510.0, 190.0), None);
        assert_eq!(hit_test(100.0, 100.0), None);
    }

    #[test]
    fn sound_label_follows_toggle() {
        assert_eq!(button_label(MenuAction::ToggleSound, true), "SOUND: ON");
        assert_eq!(button_label(MenuAction::ToggleSound, false), "SOUND: OFF");
        assert_eq!(button_label(MenuAction::Exit, true), "EXIT");
    }
}
