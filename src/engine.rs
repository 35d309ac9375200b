// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: (C) 2025 Cranky Kernel <crankykernel@proton.me>

use std::collections::{HashSet, VecDeque};
use std::io;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::catalog::{Channel, ChannelCatalog};
use crate::content::ContentSource;
use crate::dispatch::{Dispatcher, Intent, Outcome};
use crate::error::{CatalogError, NotFoundError, ScheduleError};
use crate::scheduler::{PlaybackCursor, Program, Scheduler};
use crate::tv::{Power, StateMachine, TransitionKind, TvSettings, TvState};

pub const DEFAULT_TICK_RATE: f64 = 12.0;

/// What the tube shows for one tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    Off,
    WarmingUp { elapsed: u32, total: u32 },
    Program(Program),
    /// Channel-change effect. `under` is the new channel's picture, when it
    /// could be fetched.
    Transition {
        kind: TransitionKind,
        under: Option<Program>,
    },
    NoSignal { channel_id: u32 },
}

/// Draws frames. Called exactly once per tick.
pub trait Renderer {
    fn render(&mut self, frame: &Frame, state: &TvState) -> io::Result<()>;
}

/// Source of remote-control input, polled once at the start of every tick.
pub trait InputSource {
    fn poll(&mut self, intents: &mut Vec<Intent>);
}

#[derive(Debug, Clone)]
pub struct EngineSettings {
    /// Ticks per second for [`Engine::run`].
    pub tick_rate: f64,
    pub tv: TvSettings,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            tick_rate: DEFAULT_TICK_RATE,
            tv: TvSettings::default(),
        }
    }
}

pub struct Engine {
    tv: StateMachine,
    scheduler: Scheduler,
    pending: VecDeque<Intent>,
    tick_interval: Duration,
    tick: u64,
    last_frame_tick: Option<u64>,
    last_emitted: Option<Power>,
    failing_channels: HashSet<u32>,
    render_failing: bool,
}

impl Engine {
    pub fn new<I>(
        catalog_source: I,
        content_source: Box<dyn ContentSource>,
        settings: EngineSettings,
    ) -> Result<Self, CatalogError>
    where
        I: IntoIterator<Item = Channel>,
    {
        let catalog = Arc::new(ChannelCatalog::load(catalog_source)?);
        info!("Catalog loaded with {} channels", catalog.len());

        let tick_rate = if settings.tick_rate.is_finite() && settings.tick_rate > 0.0 {
            settings.tick_rate
        } else {
            warn!(
                "Invalid tick rate {}, using {}",
                settings.tick_rate, DEFAULT_TICK_RATE
            );
            DEFAULT_TICK_RATE
        };

        Ok(Self {
            tv: StateMachine::new(catalog.clone(), settings.tv),
            scheduler: Scheduler::new(catalog, content_source),
            pending: VecDeque::new(),
            tick_interval: Duration::from_secs_f64(1.0 / tick_rate),
            tick: 0,
            last_frame_tick: None,
            last_emitted: None,
            failing_channels: HashSet::new(),
            render_failing: false,
        })
    }

    pub fn power_on(&mut self) {
        self.submit(Intent::PowerOn);
    }

    pub fn power_off(&mut self) {
        self.submit(Intent::PowerOff);
    }

    /// Queue an intent for the next tick.
    pub fn submit(&mut self, intent: Intent) {
        self.pending.push_back(intent);
    }

    /// Queue a textual remote command. Unrecognised text is dropped.
    pub fn press(&mut self, raw: &str) -> bool {
        match raw.parse::<Intent>() {
            Ok(intent) => {
                self.submit(intent);
                true
            }
            Err(e) => {
                debug!("Dropping input: {}", e);
                false
            }
        }
    }

    /// Apply an intent right away, outside the tick loop.
    pub fn dispatch(&mut self, intent: Intent) -> Outcome {
        Dispatcher::dispatch(&mut self.tv, intent)
    }

    pub fn state(&self) -> &TvState {
        self.tv.state()
    }

    pub fn catalog(&self) -> &ChannelCatalog {
        self.scheduler.catalog()
    }

    pub fn cursor(&self, channel_id: u32) -> Result<PlaybackCursor, NotFoundError> {
        self.scheduler.cursor(channel_id)
    }

    pub fn tick_interval(&self) -> Duration {
        self.tick_interval
    }

    /// Run one tick: input, then content, then rendering, then the timed
    /// effects count down.
    pub fn tick(&mut self, input: &mut dyn InputSource, renderer: &mut dyn Renderer) {
        self.tick += 1;

        let mut polled = Vec::new();
        input.poll(&mut polled);
        self.pending.extend(polled);
        while let Some(intent) = self.pending.pop_front() {
            Dispatcher::dispatch(&mut self.tv, intent);
        }
        self.tv.settle();

        let frame = self.compose();
        self.emit(renderer, &frame);

        self.tv.end_tick();
    }

    /// Tick at the configured rate until `token` is cancelled. Cancellation
    /// is only observed between ticks. The set is switched off on the way
    /// out so the renderer's last frame is a power-down.
    pub async fn run(
        &mut self,
        input: &mut dyn InputSource,
        renderer: &mut dyn Renderer,
        token: CancellationToken,
    ) {
        let mut interval = tokio::time::interval(self.tick_interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        debug!("Tick loop started at {:?} per tick", self.tick_interval);

        loop {
            tokio::select! {
                biased;
                _ = token.cancelled() => break,
                _ = interval.tick() => self.tick(input, renderer),
            }
        }

        self.shutdown(renderer);
        debug!("Tick loop stopped after {} ticks", self.tick);
    }

    /// Force the set off and emit a final power-down frame if the renderer
    /// has not already shown one. Queued input is discarded.
    pub fn shutdown(&mut self, renderer: &mut dyn Renderer) {
        self.pending.clear();
        let was_on = self.tv.power_off();
        if was_on || self.last_emitted != Some(Power::Off) {
            self.last_frame_tick = None;
            self.emit(renderer, &Frame::Off);
        }
    }

    fn compose(&mut self) -> Frame {
        let state = self.tv.state();
        let tuned = match (state.power, state.tuned_channel_id) {
            (Power::On, Some(id)) => id,
            (Power::WarmingUp, _) => {
                self.last_frame_tick = None;
                let total = self.tv.settings().warmup_ticks;
                return Frame::WarmingUp {
                    elapsed: total.saturating_sub(state.warmup_remaining_ticks),
                    total,
                };
            }
            _ => {
                self.last_frame_tick = None;
                return Frame::Off;
            }
        };
        let transition = state.transition;

        let elapsed = self.last_frame_tick.map_or(0, |t| self.tick - t);
        self.last_frame_tick = Some(self.tick);
        self.scheduler.broadcast(elapsed, Some(tuned));

        match transition {
            None => match self.scheduler.advance(tuned, elapsed) {
                Ok(program) => {
                    self.recovered(tuned);
                    Frame::Program(program)
                }
                Err(e) => {
                    self.content_failed(tuned, &e);
                    Frame::NoSignal { channel_id: tuned }
                }
            },
            Some(transition) => {
                let under = self
                    .scheduler
                    .skip(tuned, elapsed)
                    .map_err(ScheduleError::from)
                    .and_then(|_| self.scheduler.peek(tuned));
                let under = match under {
                    Ok(program) => {
                        self.recovered(tuned);
                        Some(program)
                    }
                    Err(e) => {
                        self.content_failed(tuned, &e);
                        None
                    }
                };
                Frame::Transition {
                    kind: transition.kind,
                    under,
                }
            }
        }
    }

    fn emit(&mut self, renderer: &mut dyn Renderer, frame: &Frame) {
        let state = self.tv.state();
        match renderer.render(frame, state) {
            Ok(()) => self.render_failing = false,
            Err(e) => {
                if !self.render_failing {
                    warn!("Renderer failed: {}", e);
                }
                self.render_failing = true;
            }
        }
        self.last_emitted = Some(state.power);
    }

    fn content_failed(&mut self, channel_id: u32, error: &ScheduleError) {
        if self.failing_channels.insert(channel_id) {
            warn!("No signal on channel {}: {}", channel_id, error);
        }
    }

    fn recovered(&mut self, channel_id: u32) {
        if self.failing_channels.remove(&channel_id) {
            info!("Signal restored on channel {}", channel_id);
        }
    }
}
