// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: (C) 2025 Cranky Kernel <crankykernel@proton.me>

use std::fmt;
use std::str::FromStr;
use tracing::debug;

use crate::catalog::Direction;
use crate::tv::StateMachine;

/// A remote-control button press, normalised.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Intent {
    PowerToggle,
    /// Discrete power codes, as sent by `Engine::power_on`/`power_off`.
    PowerOn,
    PowerOff,
    ChannelUp,
    ChannelDown,
    ChannelSelect(u32),
    ToggleMute,
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Intent::PowerToggle => write!(f, "power"),
            Intent::PowerOn => write!(f, "power on"),
            Intent::PowerOff => write!(f, "power off"),
            Intent::ChannelUp => write!(f, "up"),
            Intent::ChannelDown => write!(f, "down"),
            Intent::ChannelSelect(id) => write!(f, "select {}", id),
            Intent::ToggleMute => write!(f, "mute"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognised remote input: '{0}'")]
pub struct ParseIntentError(String);

impl FromStr for Intent {
    type Err = ParseIntentError;

    /// Accepts `power`, `power on`, `power off`, `up`/`ch+`, `down`/`ch-`,
    /// `mute`, `select N` or a bare channel number.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalised = s.trim().to_lowercase();
        let words: Vec<&str> = normalised.split_whitespace().collect();
        let intent = match words.as_slice() {
            ["power"] => Intent::PowerToggle,
            ["power", "on"] => Intent::PowerOn,
            ["power", "off"] => Intent::PowerOff,
            ["up"] | ["ch+"] => Intent::ChannelUp,
            ["down"] | ["ch-"] => Intent::ChannelDown,
            ["mute"] => Intent::ToggleMute,
            ["select", n] | [n] => n
                .parse()
                .map(Intent::ChannelSelect)
                .map_err(|_| ParseIntentError(s.to_string()))?,
            _ => return Err(ParseIntentError(s.to_string())),
        };
        Ok(intent)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The intent changed the set's state.
    Applied,
    /// Recognised, but meaningless in the current state.
    Ignored,
    /// Not a recognised intent at all.
    Dropped,
}

impl From<bool> for Outcome {
    fn from(changed: bool) -> Self {
        if changed {
            Outcome::Applied
        } else {
            Outcome::Ignored
        }
    }
}

/// Routes intents onto the state machine. Never fails: input the set cannot
/// act on is ignored, like pressing buttons on a remote aimed at a dead TV.
pub struct Dispatcher;

impl Dispatcher {
    pub fn dispatch(tv: &mut StateMachine, intent: Intent) -> Outcome {
        let outcome = Outcome::from(match intent {
            Intent::PowerToggle => tv.toggle_power(),
            Intent::PowerOn => tv.power_on(),
            Intent::PowerOff => tv.power_off(),
            Intent::ChannelUp => tv.step_channel(Direction::Up),
            Intent::ChannelDown => tv.step_channel(Direction::Down),
            Intent::ChannelSelect(id) => tv.select_channel(id),
            Intent::ToggleMute => tv.toggle_mute(),
        });
        debug!("Intent '{}': {:?}", intent, outcome);
        outcome
    }

    pub fn dispatch_raw(tv: &mut StateMachine, raw: &str) -> Outcome {
        match raw.parse::<Intent>() {
            Ok(intent) => Self::dispatch(tv, intent),
            Err(e) => {
                debug!("Dropping input: {}", e);
                Outcome::Dropped
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::lineup;
    use crate::tv::{Power, TvSettings};
    use std::sync::Arc;

    fn tv() -> StateMachine {
        let settings = TvSettings {
            warmup_ticks: 0,
            ..TvSettings::default()
        };
        StateMachine::new(Arc::new(lineup(&[1, 2, 3])), settings)
    }

    #[test]
    fn parses_remote_words() {
        assert_eq!("power".parse(), Ok(Intent::PowerToggle));
        assert_eq!(" Power  Off ".parse(), Ok(Intent::PowerOff));
        assert_eq!("ch+".parse(), Ok(Intent::ChannelUp));
        assert_eq!("down".parse(), Ok(Intent::ChannelDown));
        assert_eq!("select 12".parse(), Ok(Intent::ChannelSelect(12)));
        assert_eq!("7".parse(), Ok(Intent::ChannelSelect(7)));
        assert_eq!("MUTE".parse(), Ok(Intent::ToggleMute));
    }

    #[test]
    fn rejects_malformed_input() {
        for raw in ["", "select", "select -1", "select two", "volume up", "power maybe"] {
            assert!(raw.parse::<Intent>().is_err(), "{raw:?} should not parse");
        }
    }

    #[test]
    fn display_parses_back() {
        let intents = [
            Intent::PowerToggle,
            Intent::PowerOn,
            Intent::PowerOff,
            Intent::ChannelUp,
            Intent::ChannelDown,
            Intent::ChannelSelect(4),
            Intent::ToggleMute,
        ];
        for intent in intents {
            assert_eq!(intent.to_string().parse(), Ok(intent));
        }
    }

    #[test]
    fn every_intent_is_a_single_attempt() {
        let mut tv = tv();
        assert_eq!(Dispatcher::dispatch(&mut tv, Intent::PowerOn), Outcome::Applied);
        assert_eq!(Dispatcher::dispatch(&mut tv, Intent::PowerOn), Outcome::Ignored);
        assert_eq!(Dispatcher::dispatch(&mut tv, Intent::ChannelUp), Outcome::Applied);
        assert_eq!(tv.state().tuned_channel_id, Some(2));
        assert_eq!(Dispatcher::dispatch(&mut tv, Intent::ChannelSelect(3)), Outcome::Applied);
        assert_eq!(tv.state().tuned_channel_id, Some(3));
    }

    #[test]
    fn unknown_channel_select_is_ignored() {
        let mut tv = tv();
        Dispatcher::dispatch(&mut tv, Intent::PowerOn);
        let before = tv.state().clone();
        assert_eq!(
            Dispatcher::dispatch(&mut tv, Intent::ChannelSelect(404)),
            Outcome::Ignored
        );
        assert_eq!(tv.state(), &before);
    }

    #[test]
    fn channel_intents_while_off_are_ignored() {
        let mut tv = tv();
        for intent in [Intent::ChannelUp, Intent::ChannelDown, Intent::ChannelSelect(2)] {
            assert_eq!(Dispatcher::dispatch(&mut tv, intent), Outcome::Ignored);
        }
        assert_eq!(tv.state().power, Power::Off);
        assert_eq!(tv.state().tuned_channel_id, None);
    }

    #[test]
    fn malformed_raw_input_is_dropped() {
        let mut tv = tv();
        assert_eq!(Dispatcher::dispatch_raw(&mut tv, "self destruct"), Outcome::Dropped);
        assert_eq!(tv.state().power, Power::Off);
        assert_eq!(Dispatcher::dispatch_raw(&mut tv, "power"), Outcome::Applied);
        assert_eq!(tv.state().power, Power::On);
    }
}
