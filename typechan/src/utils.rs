use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use keystone::Key;
use ratatui::{
    layout::{Constraint, Flex, Layout, Rect},
    style::Color,
    widgets::{Block, BorderType},
};

/// A block with a rounded border
pub const ROUNDED_BLOCK: Block = Block::bordered().border_type(BorderType::Rounded);

pub const RED: Color = Color::Rgb(0xcc, 0x00, 0x1b);
pub const GREEN: Color = Color::Rgb(0x5a, 0xc7, 0x00);
pub const GREY: Color = Color::Rgb(0x59, 0x59, 0x59);

/// Narrower windows are laid out as if they were this wide
pub const MIN_WINDOW_WIDTH: u16 = 50;
/// Horizontal padding on each side of the app
pub const PADDING_X: u16 = 10;
/// Width of the sidebar next to the text area
pub const SIDEBAR_WIDTH: u16 = 12;
/// Borders and inner padding of the text area
const TEXT_AREA_CHROME: u16 = 4;

/// Width available to the whole app in a window of `columns`.
pub fn app_width(columns: u16) -> u16 {
    columns.max(MIN_WINDOW_WIDTH) - 2 * PADDING_X
}

/// Width the session text is wrapped at in a window of `columns`.
pub fn text_width(columns: u16) -> usize {
    usize::from(app_width(columns) - SIDEBAR_WIDTH - TEXT_AREA_CHROME)
}

pub fn center(area: Rect, horizontal: Constraint, vertical: Constraint) -> Rect {
    let [area_horizontal] = Layout::horizontal([horizontal])
        .flex(Flex::Center)
        .areas(area);
    let [area] = Layout::vertical([vertical])
        .flex(Flex::Center)
        .areas(area_horizontal);
    area
}

/// A trait defining helper methods for keyevents
pub trait KeyEventHelper {
    /// Returns true if the keyevent contains a pressed key
    fn is_press(&self) -> bool;

    /// Returns true if the keyevent contains the given modifiers
    fn has_mods(&self, mods: KeyModifiers) -> bool;

    /// Returns true if the keyevent matches the given character, and is being pressed with CTRL as
    /// a modifier.
    fn is_ctrl_press_char(&self, character: char) -> bool;

    /// Translates the keyevent into a session key
    fn to_session_key(&self) -> Option<Key>;
}

impl KeyEventHelper for KeyEvent {
    fn is_press(&self) -> bool {
        self.kind == KeyEventKind::Press
    }

    fn has_mods(&self, mods: KeyModifiers) -> bool {
        self.modifiers.contains(mods)
    }

    fn is_ctrl_press_char(&self, character: char) -> bool {
        self.is_press()
            && self.has_mods(KeyModifiers::CONTROL)
            && self.code == KeyCode::Char(character)
    }

    fn to_session_key(&self) -> Option<Key> {
        if !self.is_press() {
            return None;
        }
        if self.is_ctrl_press_char('c') {
            return Some(Key::Interrupt);
        }

        match self.code {
            KeyCode::Esc => Some(Key::Interrupt),
            KeyCode::Tab
            | KeyCode::BackTab
            | KeyCode::Up
            | KeyCode::Down
            | KeyCode::Left
            | KeyCode::Right => Some(Key::Movement),
            KeyCode::Backspace => Some(Key::Backspace),
            KeyCode::Enter => Some(Key::Enter),
            KeyCode::Char(_) if self.has_mods(KeyModifiers::CONTROL) => None,
            KeyCode::Char(' ') => Some(Key::Space),
            KeyCode::Char(character) => Some(Key::Letter(character)),
            _ => None,
        }
    }
}
