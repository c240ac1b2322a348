use bevy::prelude::*;
use constants::hud::{HUD_SCRAMBLE_INTERVAL, SCRAMBLE_DIGITS, SCRAMBLE_LETTERS};
use rand::Rng;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HudCounterState {
    Idle,
    Revealing { started_at: f64 },
    Settled,
}

/// One-shot reveal of a HUD value. Once settled it stays settled for the
/// rest of the session.
#[derive(Component, Debug, Clone)]
pub struct HudCounter {
    state: HudCounterState,
    final_text: String,
    displayed: String,
    reveal_seconds: f32,
    last_scramble: f64,
}

impl HudCounter {
    pub fn new(final_text: impl Into<String>, reveal_seconds: f32) -> Self {
        let final_text = final_text.into();
        Self {
            state: HudCounterState::Idle,
            displayed: placeholder(&final_text),
            final_text,
            reveal_seconds,
            last_scramble: f64::NEG_INFINITY,
        }
    }

    pub fn state(&self) -> HudCounterState {
        self.state
    }

    pub fn displayed(&self) -> &str {
        &self.displayed
    }

    pub fn final_text(&self) -> &str {
        &self.final_text
    }

    pub fn is_settled(&self) -> bool {
        self.state == HudCounterState::Settled
    }

    /// Visibility report from layout. Starts the reveal the first time the
    /// visible fraction reaches `threshold`; ignored in any other state.
    pub fn observe(&mut self, visible_ratio: f32, threshold: f32, now: f64) -> bool {
        if self.state != HudCounterState::Idle || !(visible_ratio >= threshold) {
            return false;
        }
        if self.reveal_seconds <= 0.0 {
            self.settle();
        } else {
            self.state = HudCounterState::Revealing { started_at: now };
        }
        true
    }

    /// Jump straight to the final text.
    pub fn settle(&mut self) {
        self.state = HudCounterState::Settled;
        self.displayed.clone_from(&self.final_text);
    }

    /// Advance the scramble. Returns true when the displayed text changed.
    pub fn tick(&mut self, now: f64, rng: &mut impl Rng) -> bool {
        let HudCounterState::Revealing { started_at } = self.state else {
            return false;
        };

        let elapsed = (now - started_at).max(0.0) as f32;
        if elapsed >= self.reveal_seconds {
            self.settle();
            return true;
        }
        if now - self.last_scramble < HUD_SCRAMBLE_INTERVAL as f64 {
            return false;
        }
        self.last_scramble = now;

        let length = self.final_text.chars().count();
        let locked = ((elapsed / self.reveal_seconds) * length as f32).floor() as usize;
        self.displayed = scramble(&self.final_text, locked, rng);
        true
    }
}

/// Idle text: same shape as the final value with every alphanumeric masked.
fn placeholder(final_text: &str) -> String {
    final_text
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { '-' } else { c })
        .collect()
}

/// First `locked` characters as final, the rest replaced by random
/// characters of the same class. Punctuation and spaces are kept.
pub fn scramble(final_text: &str, locked: usize, rng: &mut impl Rng) -> String {
    final_text
        .chars()
        .enumerate()
        .map(|(i, c)| {
            if i < locked {
                c
            } else if c.is_ascii_digit() {
                SCRAMBLE_DIGITS[rng.gen_range(0..SCRAMBLE_DIGITS.len())] as char
            } else if c.is_ascii_alphabetic() {
                let letter = SCRAMBLE_LETTERS[rng.gen_range(0..SCRAMBLE_LETTERS.len())] as char;
                if c.is_ascii_lowercase() {
                    letter.to_ascii_lowercase()
                } else {
                    letter
                }
            } else {
                c
            }
        })
        .collect()
}
