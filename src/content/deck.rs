// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: (C) 2025 Cranky Kernel <crankykernel@proton.me>

use std::fs;
use std::path::Path;
use std::sync::Arc;

use crate::error::ContentSourceError;

const SEPARATOR: &str = "---";

/// A show stored as plain text, one frame per block, blocks separated by a
/// line containing only `---`.
#[derive(Debug, Clone, Default)]
pub struct Deck {
    frames: Vec<Arc<str>>,
}

impl Deck {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ContentSourceError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| ContentSourceError::Io {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        Ok(Self::parse(&text))
    }

    pub fn parse(text: &str) -> Self {
        let mut frames = Vec::new();
        let mut current: Vec<&str> = Vec::new();

        for line in text.lines() {
            if line.trim_end() == SEPARATOR {
                frames.push(current.join("\n").into());
                current.clear();
            } else {
                current.push(line);
            }
        }
        if !current.is_empty() {
            frames.push(current.join("\n").into());
        }

        Self { frames }
    }

    pub fn get(&self, index: u64) -> Option<Arc<str>> {
        usize::try_from(index)
            .ok()
            .and_then(|i| self.frames.get(i))
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}
