// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: (C) 2025 Cranky Kernel <crankykernel@proton.me>

use std::collections::HashMap;
use std::sync::Arc;

use crate::catalog::ChannelCatalog;
use crate::content::ContentSource;
use crate::error::{ContentSourceError, NotFoundError, ScheduleError};

/// Where a channel's broadcast currently is, in ticks since the engine was
/// built. Counts only ticks spent powered on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlaybackCursor {
    pub position: u64,
}

/// One frame of a channel's programming.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Program {
    pub channel_id: u32,
    /// Cursor position the frame was taken at.
    pub position: u64,
    /// Index into the channel's looping content, `position % length`.
    pub index: u64,
    pub text: Arc<str>,
}

pub struct Scheduler {
    catalog: Arc<ChannelCatalog>,
    source: Box<dyn ContentSource>,
    cursors: HashMap<u32, PlaybackCursor>,
}

impl Scheduler {
    pub fn new(catalog: Arc<ChannelCatalog>, source: Box<dyn ContentSource>) -> Self {
        let cursors = catalog
            .iter()
            .map(|c| (c.id, PlaybackCursor::default()))
            .collect();
        Self {
            catalog,
            source,
            cursors,
        }
    }

    /// Move the channel's cursor forward and return the frame now on air.
    /// The cursor moves even when the content source fails.
    pub fn advance(&mut self, channel_id: u32, elapsed_ticks: u64) -> Result<Program, ScheduleError> {
        self.skip(channel_id, elapsed_ticks)?;
        self.peek(channel_id)
    }

    /// Frame at the channel's cursor, without moving it.
    pub fn peek(&self, channel_id: u32) -> Result<Program, ScheduleError> {
        let position = self.cursor(channel_id)?.position;
        let channel = self.catalog.get(channel_id)?;
        let length = self.source.length(channel)?;
        if length == 0 {
            return Err(ContentSourceError::Empty { channel_id }.into());
        }
        let index = position % length;
        let text = self.source.frame(channel, index)?;
        Ok(Program {
            channel_id,
            position,
            index,
            text,
        })
    }

    /// Move the channel's cursor forward without fetching a frame.
    pub fn skip(&mut self, channel_id: u32, elapsed_ticks: u64) -> Result<(), NotFoundError> {
        let cursor = self
            .cursors
            .get_mut(&channel_id)
            .ok_or(NotFoundError { id: channel_id })?;
        cursor.position = cursor.position.wrapping_add(elapsed_ticks);
        Ok(())
    }

    /// Keep every channel except `except` on the air for `elapsed_ticks`.
    pub fn broadcast(&mut self, elapsed_ticks: u64, except: Option<u32>) {
        for (id, cursor) in self.cursors.iter_mut() {
            if Some(*id) != except {
                cursor.position = cursor.position.wrapping_add(elapsed_ticks);
            }
        }
    }

    pub fn cursor(&self, channel_id: u32) -> Result<PlaybackCursor, NotFoundError> {
        self.cursors
            .get(&channel_id)
            .copied()
            .ok_or(NotFoundError { id: channel_id })
    }

    pub fn catalog(&self) -> &ChannelCatalog {
        &self.catalog
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::lineup;
    use crate::testing::FixedContent;

    fn scheduler(ids: &[u32], content: FixedContent) -> Scheduler {
        Scheduler::new(Arc::new(lineup(ids)), Box::new(content))
    }

    #[test]
    fn advance_loops_over_content_length() {
        let mut s = scheduler(&[1, 2], FixedContent::new().with_length(1, 4));
        let frames: Vec<u64> = (0..9).map(|_| s.advance(1, 1).unwrap().index).collect();
        assert_eq!(frames, vec![1, 2, 3, 0, 1, 2, 3, 0, 1]);
        assert_eq!(s.cursor(1).unwrap().position, 9);
    }

    #[test]
    fn advance_by_many_ticks_wraps_with_modulo() {
        let mut s = scheduler(&[1], FixedContent::new().with_length(1, 5));
        let program = s.advance(1, 23).unwrap();
        assert_eq!(program.position, 23);
        assert_eq!(program.index, 3);
        assert_eq!(&*program.text, "ch1:3");
    }

    #[test]
    fn lengths_differ_per_channel() {
        let content = FixedContent::new().with_length(1, 3).with_length(2, 7);
        let mut s = scheduler(&[1, 2], content);
        assert_eq!(s.advance(1, 5).unwrap().index, 2);
        assert_eq!(s.advance(2, 5).unwrap().index, 5);
    }

    #[test]
    fn peek_does_not_move_cursor() {
        let mut s = scheduler(&[1], FixedContent::new().with_length(1, 10));
        s.advance(1, 4).unwrap();
        assert_eq!(s.peek(1).unwrap().index, 4);
        assert_eq!(s.peek(1).unwrap().index, 4);
        assert_eq!(s.cursor(1).unwrap().position, 4);
    }

    #[test]
    fn cursors_are_independent_per_channel() {
        let mut s = scheduler(&[1, 2, 3], FixedContent::new());
        s.advance(2, 6).unwrap();
        assert_eq!(s.cursor(1).unwrap().position, 0);
        assert_eq!(s.cursor(2).unwrap().position, 6);
        assert_eq!(s.cursor(3).unwrap().position, 0);
    }

    #[test]
    fn broadcast_skips_excluded_channel() {
        let mut s = scheduler(&[1, 2, 3], FixedContent::new());
        s.broadcast(3, Some(2));
        assert_eq!(s.cursor(1).unwrap().position, 3);
        assert_eq!(s.cursor(2).unwrap().position, 0);
        assert_eq!(s.cursor(3).unwrap().position, 3);
    }

    #[test]
    fn failing_source_still_moves_cursor() {
        let mut s = scheduler(&[1], FixedContent::new().failing(1));
        let err = s.advance(1, 2).unwrap_err();
        assert!(matches!(
            err,
            ScheduleError::Content(ContentSourceError::Unavailable { channel_id: 1, .. })
        ));
        assert_eq!(s.cursor(1).unwrap().position, 2);
    }

    #[test]
    fn zero_length_content_is_empty() {
        let mut s = scheduler(&[1], FixedContent::new().with_length(1, 0));
        assert_eq!(
            s.advance(1, 1).unwrap_err(),
            ScheduleError::Content(ContentSourceError::Empty { channel_id: 1 })
        );
    }

    #[test]
    fn unknown_channel_is_not_found() {
        let mut s = scheduler(&[1], FixedContent::new());
        assert_eq!(
            s.advance(9, 1).unwrap_err(),
            ScheduleError::NotFound(NotFoundError { id: 9 })
        );
        assert!(s.cursor(9).is_err());
    }
}
