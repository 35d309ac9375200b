// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: (C) 2025 Cranky Kernel <crankykernel@proton.me>

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info};

use crate::catalog::{ChannelCatalog, Direction};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Power {
    Off,
    WarmingUp,
    On,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransitionKind {
    Static,
    Flicker,
}

impl fmt::Display for TransitionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransitionKind::Static => write!(f, "static"),
            TransitionKind::Flicker => write!(f, "flicker"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub kind: TransitionKind,
    pub remaining_ticks: u32,
}

/// Snapshot of the set, handed to the renderer every tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TvState {
    pub power: Power,
    pub tuned_channel_id: Option<u32>,
    pub transition: Option<Transition>,
    pub muted: bool,
    /// Ticks of warm-up left while `power == WarmingUp`.
    pub warmup_remaining_ticks: u32,
}

impl Default for TvState {
    fn default() -> Self {
        Self {
            power: Power::Off,
            tuned_channel_id: None,
            transition: None,
            muted: false,
            warmup_remaining_ticks: 0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct TvSettings {
    pub warmup_ticks: u32,
    pub transition_ticks: u32,
    /// Effect after ChannelUp/ChannelDown.
    pub step_effect: TransitionKind,
    /// Effect after a direct channel select.
    pub select_effect: TransitionKind,
    pub start_channel: Option<u32>,
    pub remember_last_channel: bool,
}

impl Default for TvSettings {
    fn default() -> Self {
        Self {
            warmup_ticks: 18,
            transition_ticks: 6,
            step_effect: TransitionKind::Static,
            select_effect: TransitionKind::Flicker,
            start_channel: None,
            remember_last_channel: true,
        }
    }
}

/// Power and tuning state machine. Input that makes no sense in the current
/// state is ignored; every operation reports whether it changed anything.
pub struct StateMachine {
    state: TvState,
    catalog: Arc<ChannelCatalog>,
    settings: TvSettings,
    last_channel: Option<u32>,
}

impl StateMachine {
    pub fn new(catalog: Arc<ChannelCatalog>, settings: TvSettings) -> Self {
        Self {
            state: TvState::default(),
            catalog,
            settings,
            last_channel: None,
        }
    }

    pub fn state(&self) -> &TvState {
        &self.state
    }

    pub fn settings(&self) -> &TvSettings {
        &self.settings
    }

    pub fn power_on(&mut self) -> bool {
        if self.state.power != Power::Off {
            return false;
        }
        if self.settings.warmup_ticks == 0 {
            self.enter_on();
        } else {
            info!("Power on, warming up for {} ticks", self.settings.warmup_ticks);
            self.state.power = Power::WarmingUp;
            self.state.warmup_remaining_ticks = self.settings.warmup_ticks;
        }
        true
    }

    pub fn power_off(&mut self) -> bool {
        if self.state.power == Power::Off {
            return false;
        }
        info!("Power off");
        if let Some(id) = self.state.tuned_channel_id {
            self.last_channel = Some(id);
        }
        self.state.power = Power::Off;
        self.state.tuned_channel_id = None;
        self.state.transition = None;
        self.state.warmup_remaining_ticks = 0;
        true
    }

    pub fn toggle_power(&mut self) -> bool {
        match self.state.power {
            Power::Off => self.power_on(),
            Power::WarmingUp | Power::On => self.power_off(),
        }
    }

    pub fn step_channel(&mut self, direction: Direction) -> bool {
        let Some(current) = self.tuned() else {
            return false;
        };
        let next = self.catalog.next_id(current, direction);
        self.tune(next, self.settings.step_effect)
    }

    pub fn select_channel(&mut self, id: u32) -> bool {
        let Some(current) = self.tuned() else {
            return false;
        };
        if let Err(e) = self.catalog.get(id) {
            debug!("Ignoring select: {}", e);
            return false;
        }
        if id == current {
            return false;
        }
        self.tune(id, self.settings.select_effect)
    }

    pub fn toggle_mute(&mut self) -> bool {
        self.state.muted = !self.state.muted;
        debug!("Mute {}", if self.state.muted { "on" } else { "off" });
        true
    }

    /// Finish warm-up once its ticks have run out. Called at the start of
    /// each tick, after input.
    pub fn settle(&mut self) {
        if self.state.power == Power::WarmingUp && self.state.warmup_remaining_ticks == 0 {
            self.enter_on();
        }
    }

    /// Count down the timed effects once the tick's frame has been emitted.
    pub fn end_tick(&mut self) {
        if self.state.power == Power::WarmingUp {
            self.state.warmup_remaining_ticks = self.state.warmup_remaining_ticks.saturating_sub(1);
        }
        if let Some(transition) = self.state.transition.as_mut() {
            transition.remaining_ticks = transition.remaining_ticks.saturating_sub(1);
            if transition.remaining_ticks == 0 {
                self.state.transition = None;
            }
        }
    }

    /// Channel tuned while on. Warm-up does not accept tuning.
    fn tuned(&self) -> Option<u32> {
        match self.state.power {
            Power::On => self.state.tuned_channel_id,
            Power::Off | Power::WarmingUp => None,
        }
    }

    fn tune(&mut self, id: u32, effect: TransitionKind) -> bool {
        debug!("Tuning channel {} with {}", id, effect);
        self.state.tuned_channel_id = Some(id);
        self.state.transition = (self.settings.transition_ticks > 0).then_some(Transition {
            kind: effect,
            remaining_ticks: self.settings.transition_ticks,
        });
        true
    }

    fn enter_on(&mut self) {
        let remembered = self
            .last_channel
            .filter(|_| self.settings.remember_last_channel);
        let channel = remembered
            .or(self.settings.start_channel)
            .filter(|id| self.catalog.contains(*id))
            .unwrap_or_else(|| self.catalog.first().id);

        info!("Picture on, tuned to channel {}", channel);
        self.state.power = Power::On;
        self.state.warmup_remaining_ticks = 0;
        self.state.tuned_channel_id = Some(channel);
        self.state.transition = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::lineup;

    fn machine(settings: TvSettings) -> StateMachine {
        StateMachine::new(Arc::new(lineup(&[1, 2, 3])), settings)
    }

    fn quick() -> TvSettings {
        TvSettings {
            warmup_ticks: 2,
            transition_ticks: 3,
            ..TvSettings::default()
        }
    }

    fn warm_up(tv: &mut StateMachine) {
        tv.power_on();
        while tv.state().power != Power::On {
            tv.settle();
            tv.end_tick();
        }
    }

    #[test]
    fn starts_off() {
        let tv = machine(quick());
        assert_eq!(tv.state(), &TvState::default());
    }

    #[test]
    fn warm_up_runs_for_configured_ticks() {
        let mut tv = machine(quick());
        assert!(tv.power_on());
        assert_eq!(tv.state().power, Power::WarmingUp);
        assert_eq!(tv.state().tuned_channel_id, None);

        let mut warming_ticks = 0;
        loop {
            tv.settle();
            if tv.state().power == Power::On {
                break;
            }
            warming_ticks += 1;
            tv.end_tick();
        }
        assert_eq!(warming_ticks, 2);
        assert_eq!(tv.state().tuned_channel_id, Some(1));
    }

    #[test]
    fn zero_warm_up_turns_on_immediately() {
        let mut tv = machine(TvSettings {
            warmup_ticks: 0,
            ..quick()
        });
        tv.power_on();
        assert_eq!(tv.state().power, Power::On);
    }

    #[test]
    fn power_on_is_idempotent() {
        let mut tv = machine(quick());
        assert!(tv.power_on());
        assert!(!tv.power_on());
        assert_eq!(tv.state().warmup_remaining_ticks, 2);
    }

    #[test]
    fn channel_input_while_off_or_warming_is_ignored() {
        let mut tv = machine(quick());
        assert!(!tv.step_channel(Direction::Up));
        assert!(!tv.select_channel(2));
        assert_eq!(tv.state(), &TvState::default());

        tv.power_on();
        let before = tv.state().clone();
        assert!(!tv.step_channel(Direction::Down));
        assert!(!tv.select_channel(3));
        assert_eq!(tv.state(), &before);
    }

    #[test]
    fn step_tunes_immediately_with_transition() {
        let mut tv = machine(quick());
        warm_up(&mut tv);
        assert!(tv.step_channel(Direction::Up));
        assert_eq!(tv.state().tuned_channel_id, Some(2));
        assert_eq!(
            tv.state().transition,
            Some(Transition {
                kind: TransitionKind::Static,
                remaining_ticks: 3
            })
        );
    }

    #[test]
    fn transition_clears_after_its_ticks() {
        let mut tv = machine(quick());
        warm_up(&mut tv);
        tv.select_channel(3);
        assert_eq!(tv.state().transition.map(|t| t.kind), Some(TransitionKind::Flicker));
        for _ in 0..3 {
            assert!(tv.state().transition.is_some());
            tv.end_tick();
        }
        assert_eq!(tv.state().transition, None);
        assert_eq!(tv.state().tuned_channel_id, Some(3));
    }

    #[test]
    fn select_unknown_or_current_channel_is_noop() {
        let mut tv = machine(quick());
        warm_up(&mut tv);
        assert!(!tv.select_channel(42));
        assert!(!tv.select_channel(1));
        assert_eq!(tv.state().transition, None);
    }

    #[test]
    fn power_off_clears_tuning_from_any_state() {
        let mut tv = machine(quick());
        tv.power_on();
        assert!(tv.power_off());
        assert_eq!(tv.state(), &TvState::default());

        warm_up(&mut tv);
        tv.step_channel(Direction::Up);
        assert!(tv.power_off());
        assert_eq!(tv.state().power, Power::Off);
        assert_eq!(tv.state().tuned_channel_id, None);
        assert_eq!(tv.state().transition, None);
        assert!(!tv.power_off());
    }

    #[test]
    fn power_on_returns_to_last_channel() {
        let mut tv = machine(quick());
        warm_up(&mut tv);
        tv.select_channel(3);
        tv.power_off();
        warm_up(&mut tv);
        assert_eq!(tv.state().tuned_channel_id, Some(3));
    }

    #[test]
    fn start_channel_used_without_memory() {
        let mut tv = machine(TvSettings {
            start_channel: Some(2),
            remember_last_channel: false,
            ..quick()
        });
        warm_up(&mut tv);
        assert_eq!(tv.state().tuned_channel_id, Some(2));
        tv.select_channel(3);
        tv.power_off();
        warm_up(&mut tv);
        assert_eq!(tv.state().tuned_channel_id, Some(2));
    }

    #[test]
    fn unknown_start_channel_falls_back_to_first() {
        let mut tv = machine(TvSettings {
            start_channel: Some(99),
            ..quick()
        });
        warm_up(&mut tv);
        assert_eq!(tv.state().tuned_channel_id, Some(1));
    }

    #[test]
    fn mute_toggles_in_any_state_without_touching_transition() {
        let mut tv = machine(quick());
        assert!(tv.toggle_mute());
        assert!(tv.state().muted);
        warm_up(&mut tv);
        tv.step_channel(Direction::Up);
        let transition = tv.state().transition;
        tv.toggle_mute();
        assert!(!tv.state().muted);
        assert_eq!(tv.state().transition, transition);
    }

    #[test]
    fn toggle_power_cycles() {
        let mut tv = machine(quick());
        tv.toggle_power();
        assert_eq!(tv.state().power, Power::WarmingUp);
        tv.toggle_power();
        assert_eq!(tv.state().power, Power::Off);
    }
}
