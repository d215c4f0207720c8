use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ecopoints_core::CollectionType;

use crate::app::App;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Action {
    None,
    Quit,
    /// Show or hide one category
    Toggle(CollectionType),
    /// Make every category visible
    ShowAll,
    /// Center the map on the highlighted point
    CenterOnSelection,
    /// Run `service.refresh`(...) again
    Reload,
}

pub(crate) fn handle_key_event(key: KeyEvent, app: &mut App) -> Action {
    use KeyCode::{Char, Down, Enter, Up};

    // Global quit shortcuts
    if key.code == Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return Action::Quit;
    }
    if !key.modifiers.is_empty() && key.modifiers != KeyModifiers::SHIFT {
        return Action::None;
    }

    match key.code {
        Char('q') => Action::Quit,
        Up | Char('k') => {
            app.move_up();
            Action::None
        }
        Down | Char('j') => {
            app.move_down();
            Action::None
        }
        Char('a') => Action::ShowAll,
        Char('r') => Action::Reload,
        Enter | Char('c') => Action::CenterOnSelection,
        Char(digit @ '1'..='9') => category_for_digit(digit).map_or(Action::None, Action::Toggle),
        _ => Action::None,
    }
}

/// `1` maps to the first category, `2` to the second and so on.
pub(crate) fn category_for_digit(digit: char) -> Option<CollectionType> {
    let position = digit.to_digit(10)?.checked_sub(1)?;
    CollectionType::ALL
        .get(usize::try_from(position).ok()?)
        .copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digits_follow_category_order() {
        assert_eq!(category_for_digit('1'), Some(CollectionType::Recyclable));
        assert_eq!(category_for_digit('5'), Some(CollectionType::DropOff));
        assert_eq!(category_for_digit('6'), None);
        assert_eq!(category_for_digit('0'), None);
    }
}
