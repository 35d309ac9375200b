// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: (C) 2025 Cranky Kernel <crankykernel@proton.me>

use crossterm::event::{self, Event as CrosstermEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::warn;

use crate::dispatch::Intent;
use crate::engine::InputSource;

/// Polls without an entered digit before a single digit is tuned.
const DIGIT_TIMEOUT_POLLS: u32 = 8;
const MAX_DIGITS: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Intent(Intent),
    Digit(u32),
    Commit,
    Quit,
    Ignore,
}

pub fn map_key(key: KeyEvent) -> KeyAction {
    if key.kind == KeyEventKind::Release {
        return KeyAction::Ignore;
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return KeyAction::Quit;
    }

    match key.code {
        KeyCode::Char('p') | KeyCode::Char(' ') => KeyAction::Intent(Intent::PowerToggle),
        KeyCode::Up | KeyCode::Char('k') | KeyCode::Char('+') | KeyCode::PageUp => {
            KeyAction::Intent(Intent::ChannelUp)
        }
        KeyCode::Down | KeyCode::Char('j') | KeyCode::Char('-') | KeyCode::PageDown => {
            KeyAction::Intent(Intent::ChannelDown)
        }
        KeyCode::Char('m') => KeyAction::Intent(Intent::ToggleMute),
        KeyCode::Char(c) if c.is_ascii_digit() => {
            KeyAction::Digit(c.to_digit(10).unwrap_or_default())
        }
        KeyCode::Enter => KeyAction::Commit,
        KeyCode::Char('q') | KeyCode::Esc => KeyAction::Quit,
        _ => KeyAction::Ignore,
    }
}

/// Number being typed on the keypad, like the two-digit entry on a remote.
#[derive(Debug, Default)]
pub struct DigitEntry {
    digits: Vec<u32>,
    idle_polls: u32,
}

impl DigitEntry {
    /// Add a digit, returning the channel once the entry is full.
    pub fn push(&mut self, digit: u32) -> Option<u32> {
        self.digits.push(digit);
        self.idle_polls = 0;
        if self.digits.len() >= MAX_DIGITS {
            self.commit()
        } else {
            None
        }
    }

    pub fn commit(&mut self) -> Option<u32> {
        if self.digits.is_empty() {
            return None;
        }
        let number = self.digits.iter().fold(0, |acc, d| acc * 10 + d);
        self.digits.clear();
        self.idle_polls = 0;
        Some(number)
    }

    /// Called once per poll; commits a pending entry that has gone idle.
    pub fn idle(&mut self) -> Option<u32> {
        if self.digits.is_empty() {
            return None;
        }
        self.idle_polls += 1;
        if self.idle_polls >= DIGIT_TIMEOUT_POLLS {
            self.commit()
        } else {
            None
        }
    }

    pub fn pending(&self) -> Option<String> {
        if self.digits.is_empty() {
            None
        } else {
            Some(self.digits.iter().map(|d| d.to_string()).collect())
        }
    }
}

/// Keyboard remote. Quit keys cancel the engine's token instead of
/// producing an intent.
pub struct KeyboardInput {
    entry: DigitEntry,
    quit: CancellationToken,
}

impl KeyboardInput {
    pub fn new(quit: CancellationToken) -> Self {
        Self {
            entry: DigitEntry::default(),
            quit,
        }
    }

    pub fn pending_digits(&self) -> Option<String> {
        self.entry.pending()
    }

    fn handle(&mut self, action: KeyAction, intents: &mut Vec<Intent>) {
        match action {
            KeyAction::Intent(intent) => {
                self.entry.commit();
                intents.push(intent);
            }
            KeyAction::Digit(d) => {
                if let Some(channel) = self.entry.push(d) {
                    intents.push(Intent::ChannelSelect(channel));
                }
            }
            KeyAction::Commit => {
                if let Some(channel) = self.entry.commit() {
                    intents.push(Intent::ChannelSelect(channel));
                }
            }
            KeyAction::Quit => self.quit.cancel(),
            KeyAction::Ignore => {}
        }
    }
}

impl InputSource for KeyboardInput {
    fn poll(&mut self, intents: &mut Vec<Intent>) {
        let mut pressed = false;
        loop {
            match event::poll(Duration::ZERO) {
                Ok(true) => {}
                Ok(false) => break,
                Err(e) => {
                    warn!("Keyboard poll failed: {}", e);
                    break;
                }
            }
            match event::read() {
                Ok(CrosstermEvent::Key(key)) => {
                    let action = map_key(key);
                    pressed |= matches!(action, KeyAction::Digit(_));
                    self.handle(action, intents);
                }
                Ok(_) => {}
                Err(e) => {
                    warn!("Keyboard read failed: {}", e);
                    break;
                }
            }
        }
        if !pressed && let Some(channel) = self.entry.idle() {
            intents.push(Intent::ChannelSelect(channel));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn maps_remote_buttons() {
        assert_eq!(map_key(key(KeyCode::Char('p'))), KeyAction::Intent(Intent::PowerToggle));
        assert_eq!(map_key(key(KeyCode::Up)), KeyAction::Intent(Intent::ChannelUp));
        assert_eq!(map_key(key(KeyCode::Char('-'))), KeyAction::Intent(Intent::ChannelDown));
        assert_eq!(map_key(key(KeyCode::Char('m'))), KeyAction::Intent(Intent::ToggleMute));
        assert_eq!(map_key(key(KeyCode::Char('7'))), KeyAction::Digit(7));
        assert_eq!(map_key(key(KeyCode::Esc)), KeyAction::Quit);
        assert_eq!(
            map_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            KeyAction::Quit
        );
    }

    #[test]
    fn unmapped_keys_are_ignored() {
        for code in [KeyCode::Char('z'), KeyCode::Tab, KeyCode::F(5), KeyCode::Left] {
            assert_eq!(map_key(key(code)), KeyAction::Ignore);
        }
    }

    #[test]
    fn two_digits_select_immediately() {
        let mut entry = DigitEntry::default();
        assert_eq!(entry.push(1), None);
        assert_eq!(entry.pending().as_deref(), Some("1"));
        assert_eq!(entry.push(3), Some(13));
        assert_eq!(entry.pending(), None);
    }

    #[test]
    fn single_digit_commits_after_idle_polls() {
        let mut entry = DigitEntry::default();
        entry.push(5);
        for _ in 1..DIGIT_TIMEOUT_POLLS {
            assert_eq!(entry.idle(), None);
        }
        assert_eq!(entry.idle(), Some(5));
        assert_eq!(entry.idle(), None);
    }

    #[test]
    fn enter_commits_early() {
        let mut entry = DigitEntry::default();
        entry.push(0);
        entry.push(9);
        entry.push(4);
        assert_eq!(entry.commit(), Some(4));
        assert_eq!(entry.commit(), None);
    }

    #[test]
    fn quit_key_cancels_token() {
        let token = CancellationToken::new();
        let mut input = KeyboardInput::new(token.clone());
        let mut intents = Vec::new();
        input.handle(KeyAction::Quit, &mut intents);
        assert!(token.is_cancelled());
        assert!(intents.is_empty());
    }

    #[test]
    fn button_press_abandons_half_typed_number() {
        let mut input = KeyboardInput::new(CancellationToken::new());
        let mut intents = Vec::new();
        input.handle(KeyAction::Digit(4), &mut intents);
        input.handle(KeyAction::Intent(Intent::ChannelUp), &mut intents);
        assert_eq!(intents, vec![Intent::ChannelUp]);
        assert_eq!(input.pending_digits(), None);
    }
}
