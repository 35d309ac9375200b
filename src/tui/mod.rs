// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: (C) 2025 Cranky Kernel <crankykernel@proton.me>

pub mod event;
pub mod ui;
pub mod widgets;

use anyhow::Result;
use crossterm::{
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use rand::SeedableRng;
use rand::rngs::SmallRng;
use ratatui::{Terminal, backend::CrosstermBackend};
use std::collections::HashMap;
use std::io;
use tokio_util::sync::CancellationToken;

use crate::catalog::ChannelCatalog;
use crate::engine::{Engine, Frame, Renderer};
use crate::tv::{Power, TvState};

pub use event::KeyboardInput;

/// Ticks the channel banner stays up after tuning.
const OSD_TICKS: u32 = 36;

pub struct Tui {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
}

impl Tui {
    pub fn new() -> Result<Self> {
        let backend = CrosstermBackend::new(io::stdout());
        let terminal = Terminal::new(backend)?;
        Ok(Self { terminal })
    }

    pub fn init(&mut self) -> Result<()> {
        enable_raw_mode()?;
        execute!(io::stdout(), EnterAlternateScreen)?;
        self.terminal.hide_cursor()?;
        self.terminal.clear()?;
        Ok(())
    }

    pub fn exit(&mut self) -> Result<()> {
        disable_raw_mode()?;
        execute!(io::stdout(), LeaveAlternateScreen)?;
        self.terminal.show_cursor()?;
        Ok(())
    }
}

/// Draws the engine's frames into the terminal as a CRT set.
pub struct TuiRenderer {
    tui: Tui,
    names: HashMap<u32, String>,
    rng: SmallRng,
    tick: u64,
    osd_channel: Option<u32>,
    osd_ticks: u32,
    off_for: u64,
}

impl TuiRenderer {
    pub fn new(tui: Tui, catalog: &ChannelCatalog) -> Self {
        Self {
            tui,
            names: catalog.iter().map(|c| (c.id, c.name.clone())).collect(),
            rng: SmallRng::from_os_rng(),
            tick: 0,
            osd_channel: None,
            osd_ticks: 0,
            off_for: u64::MAX,
        }
    }

    pub fn into_tui(self) -> Tui {
        self.tui
    }

    fn track(&mut self, state: &TvState) {
        self.tick = self.tick.wrapping_add(1);

        if state.tuned_channel_id != self.osd_channel {
            self.osd_channel = state.tuned_channel_id;
            self.osd_ticks = OSD_TICKS;
        } else {
            self.osd_ticks = self.osd_ticks.saturating_sub(1);
        }

        self.off_for = match state.power {
            Power::Off => self.off_for.saturating_add(1),
            Power::WarmingUp | Power::On => 0,
        };
    }
}

impl Renderer for TuiRenderer {
    fn render(&mut self, frame: &Frame, state: &TvState) -> io::Result<()> {
        self.track(state);

        let osd = self
            .osd_channel
            .filter(|_| self.osd_ticks > 0)
            .map(|id| (id, self.names.get(&id).map(String::as_str).unwrap_or("")));
        let mut screen = ui::Screen {
            picture: frame,
            state,
            tick: self.tick,
            osd,
            off_for: self.off_for.saturating_sub(1),
            rng: &mut self.rng,
        };
        self.tui
            .terminal
            .draw(|f| ui::draw(f, &mut screen))?;
        Ok(())
    }
}

/// Power the set on and watch until the viewer quits.
pub async fn run_tui(mut engine: Engine, presses: &[String]) -> Result<()> {
    let token = CancellationToken::new();

    let interrupt = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            interrupt.cancel();
        }
    });

    let mut tui = Tui::new()?;
    tui.init()?;

    let mut renderer = TuiRenderer::new(tui, engine.catalog());
    let mut input = KeyboardInput::new(token.clone());

    engine.power_on();
    for press in presses {
        if !engine.press(press) {
            tracing::warn!("Ignoring unrecognised press '{}'", press);
        }
    }

    engine.run(&mut input, &mut renderer, token).await;

    let mut tui = renderer.into_tui();
    tui.exit()?;

    Ok(())
}
