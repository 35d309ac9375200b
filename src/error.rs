// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: (C) 2025 Cranky Kernel <crankykernel@proton.me>

use std::path::PathBuf;

/// Malformed channel line-up. Fatal at engine construction.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    #[error("channel catalog is empty, at least one channel must be defined")]
    Empty,

    #[error("duplicate channel id: {0}")]
    DuplicateId(u32),
}

/// Lookup of a channel id that is not in the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("channel {id} not found")]
pub struct NotFoundError {
    pub id: u32,
}

/// A content source could not produce a frame for a channel.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ContentSourceError {
    #[error("channel {channel_id} has no content")]
    Empty { channel_id: u32 },

    #[error("content for channel {channel_id} unavailable: {reason}")]
    Unavailable { channel_id: u32, reason: String },

    #[error("frame {index} out of range for channel {channel_id} ({length} frames)")]
    FrameOutOfRange {
        channel_id: u32,
        index: u64,
        length: u64,
    },

    #[error("failed to read {}: {reason}", .path.display())]
    Io { path: PathBuf, reason: String },
}

/// Failure to produce a frame from the scheduler.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScheduleError {
    #[error(transparent)]
    NotFound(#[from] NotFoundError),

    #[error(transparent)]
    Content(#[from] ContentSourceError),
}
