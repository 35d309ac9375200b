// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: (C) 2025 Cranky Kernel <crankykernel@proton.me>

//! Stand-ins for the engine's collaborators, for tests and headless hosts.

use std::collections::{HashMap, HashSet, VecDeque};
use std::io;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use crate::catalog::Channel;
use crate::content::ContentSource;
use crate::dispatch::Intent;
use crate::engine::{Frame, InputSource, Renderer};
use crate::error::ContentSourceError;
use crate::tv::TvState;

const DEFAULT_LENGTH: u64 = 1000;

/// Content whose frame text is `ch<id>:<index>`.
#[derive(Debug, Default)]
pub struct FixedContent {
    lengths: HashMap<u32, u64>,
    failing: HashSet<u32>,
}

impl FixedContent {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_length(mut self, channel_id: u32, length: u64) -> Self {
        self.lengths.insert(channel_id, length);
        self
    }

    pub fn failing(mut self, channel_id: u32) -> Self {
        self.failing.insert(channel_id);
        self
    }
}

impl ContentSource for FixedContent {
    fn length(&self, channel: &Channel) -> Result<u64, ContentSourceError> {
        if self.failing.contains(&channel.id) {
            return Err(ContentSourceError::Unavailable {
                channel_id: channel.id,
                reason: "transmitter down".to_string(),
            });
        }
        Ok(self
            .lengths
            .get(&channel.id)
            .copied()
            .unwrap_or(DEFAULT_LENGTH))
    }

    fn frame(&self, channel: &Channel, index: u64) -> Result<Arc<str>, ContentSourceError> {
        self.length(channel)?;
        Ok(format!("ch{}:{}", channel.id, index).into())
    }
}

/// Feeds one batch of intents per poll, optionally cancelling a token once
/// the script has run for a number of polls.
#[derive(Debug, Default)]
pub struct ScriptedInput {
    script: VecDeque<Vec<Intent>>,
    polls: usize,
    stop: Option<(usize, CancellationToken)>,
}

impl ScriptedInput {
    pub fn new<I>(script: I) -> Self
    where
        I: IntoIterator<Item = Vec<Intent>>,
    {
        Self {
            script: script.into_iter().collect(),
            ..Self::default()
        }
    }

    pub fn stop_after(mut self, polls: usize, token: CancellationToken) -> Self {
        self.stop = Some((polls, token));
        self
    }

    pub fn polls(&self) -> usize {
        self.polls
    }
}

impl InputSource for ScriptedInput {
    fn poll(&mut self, intents: &mut Vec<Intent>) {
        self.polls += 1;
        if let Some(batch) = self.script.pop_front() {
            intents.extend(batch);
        }
        if let Some((after, token)) = &self.stop
            && self.polls >= *after
        {
            token.cancel();
        }
    }
}

/// Keeps every emitted frame together with the state it was emitted with.
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    pub frames: Vec<(Frame, TvState)>,
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last(&self) -> Option<&(Frame, TvState)> {
        self.frames.last()
    }
}

impl Renderer for RecordingRenderer {
    fn render(&mut self, frame: &Frame, state: &TvState) -> io::Result<()> {
        self.frames.push((frame.clone(), state.clone()));
        Ok(())
    }
}
