// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: (C) 2025 Cranky Kernel <crankykernel@proton.me>

pub mod builtin;
pub mod deck;

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::catalog::{Channel, ContentRef};
use crate::error::ContentSourceError;

pub use builtin::Show;
pub use deck::Deck;

/// Supplies the programming for each channel. Frames are requested one index
/// at a time so a source never has to hold a whole show in memory.
pub trait ContentSource {
    /// Number of frames in one loop of the channel's programming.
    fn length(&self, channel: &Channel) -> Result<u64, ContentSourceError>;

    /// Frame at `index`, where `index < length(channel)`.
    fn frame(&self, channel: &Channel, index: u64) -> Result<Arc<str>, ContentSourceError>;
}

/// Parsed form of a [`ContentRef`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reference {
    Builtin(Show),
    File(PathBuf),
}

impl Reference {
    pub fn parse(content: &ContentRef) -> Option<Self> {
        let (scheme, rest) = content.as_str().split_once(':')?;
        match scheme {
            "builtin" => Show::from_name(rest).map(Reference::Builtin),
            "file" if !rest.is_empty() => Some(Reference::File(PathBuf::from(rest))),
            _ => None,
        }
    }
}

/// The host's content source: built-in shows plus text decks loaded from disk.
#[derive(Debug, Default)]
pub struct Library {
    decks: HashMap<PathBuf, Result<Deck, ContentSourceError>>,
}

impl Library {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load every `file:` deck referenced by the line-up. A deck that fails
    /// to load is remembered as failed and plays as no-signal.
    pub fn preload<'a, I>(channels: I) -> Self
    where
        I: IntoIterator<Item = &'a Channel>,
    {
        let mut library = Self::new();
        for channel in channels {
            if let Some(Reference::File(path)) = Reference::parse(&channel.content_ref) {
                if library.decks.contains_key(&path) {
                    continue;
                }
                let deck = Deck::load(&path);
                match &deck {
                    Ok(deck) => debug!(
                        "Loaded {} frames for channel {} from {}",
                        deck.len(),
                        channel.id,
                        path.display()
                    ),
                    Err(e) => warn!("Channel {} will show no signal: {}", channel.id, e),
                }
                library.decks.insert(path, deck);
            }
        }
        library
    }

    pub fn insert_deck(&mut self, path: impl Into<PathBuf>, deck: Deck) {
        self.decks.insert(path.into(), Ok(deck));
    }

    fn deck(&self, channel: &Channel, path: &PathBuf) -> Result<&Deck, ContentSourceError> {
        match self.decks.get(path) {
            Some(Ok(deck)) => Ok(deck),
            Some(Err(e)) => Err(e.clone()),
            None => Err(ContentSourceError::Unavailable {
                channel_id: channel.id,
                reason: format!("deck {} was not loaded", path.display()),
            }),
        }
    }

    fn resolve(&self, channel: &Channel) -> Result<Reference, ContentSourceError> {
        Reference::parse(&channel.content_ref).ok_or_else(|| ContentSourceError::Unavailable {
            channel_id: channel.id,
            reason: format!("unrecognised content reference '{}'", channel.content_ref),
        })
    }
}

impl ContentSource for Library {
    fn length(&self, channel: &Channel) -> Result<u64, ContentSourceError> {
        let length = match self.resolve(channel)? {
            Reference::Builtin(show) => show.length(),
            Reference::File(path) => self.deck(channel, &path)?.len() as u64,
        };
        if length == 0 {
            return Err(ContentSourceError::Empty {
                channel_id: channel.id,
            });
        }
        Ok(length)
    }

    fn frame(&self, channel: &Channel, index: u64) -> Result<Arc<str>, ContentSourceError> {
        match self.resolve(channel)? {
            Reference::Builtin(show) => Ok(show.render(index).into()),
            Reference::File(path) => {
                let deck = self.deck(channel, &path)?;
                deck.get(index)
                    .ok_or(ContentSourceError::FrameOutOfRange {
                        channel_id: channel.id,
                        index,
                        length: deck.len() as u64,
                    })
            }
        }
    }
}
