// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: (C) 2025 Cranky Kernel <crankykernel@proton.me>

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

use crate::error::{CatalogError, NotFoundError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Sitcom,
    Cartoon,
    Anime,
    Weather,
    Game,
    Other,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Category::Sitcom => "Sitcom",
            Category::Cartoon => "Cartoon",
            Category::Anime => "Anime",
            Category::Weather => "Weather",
            Category::Game => "Game",
            Category::Other => "Other",
        };
        f.pad(name)
    }
}

impl Category {
    /// Name of the programming genre, as printed on a TV guide.
    pub fn genre(self) -> &'static str {
        match self {
            Category::Sitcom => "Sitcoms",
            Category::Cartoon => "Cartoons",
            Category::Anime => "Anime",
            Category::Weather => "Weather",
            Category::Game => "Games",
            Category::Other => "Other",
        }
    }
}

/// Opaque reference handed to the content source, e.g. `builtin:sitcom`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentRef(pub String);

impl ContentRef {
    pub fn new(reference: impl Into<String>) -> Self {
        Self(reference.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContentRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Channel {
    pub id: u32,
    pub name: String,
    pub category: Category,
    #[serde(rename = "content")]
    pub content_ref: ContentRef,
}

impl Channel {
    pub fn new(id: u32, name: impl Into<String>, category: Category, content: &str) -> Self {
        Self {
            id,
            name: name.into(),
            category,
            content_ref: ContentRef::new(content),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

/// Ordered, read-only channel line-up. Position in the list is the dial order.
#[derive(Debug, Clone)]
pub struct ChannelCatalog {
    channels: Vec<Channel>,
}

impl ChannelCatalog {
    pub fn load<I>(source: I) -> Result<Self, CatalogError>
    where
        I: IntoIterator<Item = Channel>,
    {
        let channels: Vec<Channel> = source.into_iter().collect();
        if channels.is_empty() {
            return Err(CatalogError::Empty);
        }

        let mut seen = HashSet::with_capacity(channels.len());
        for channel in &channels {
            if !seen.insert(channel.id) {
                return Err(CatalogError::DuplicateId(channel.id));
            }
        }

        Ok(Self { channels })
    }

    pub fn get(&self, id: u32) -> Result<&Channel, NotFoundError> {
        self.channels
            .iter()
            .find(|c| c.id == id)
            .ok_or(NotFoundError { id })
    }

    pub fn contains(&self, id: u32) -> bool {
        self.channels.iter().any(|c| c.id == id)
    }

    /// Next channel on the dial, wrapping at both ends. An unknown `current`
    /// lands on the first (Up) or last (Down) channel.
    pub fn next_id(&self, current: u32, direction: Direction) -> u32 {
        let len = self.channels.len();
        let next = match (self.position(current), direction) {
            (Some(pos), Direction::Up) => (pos + 1) % len,
            (Some(pos), Direction::Down) => (pos + len - 1) % len,
            (None, Direction::Up) => 0,
            (None, Direction::Down) => len - 1,
        };
        self.channels[next].id
    }

    pub fn first(&self) -> &Channel {
        &self.channels[0]
    }

    pub fn last(&self) -> &Channel {
        &self.channels[self.channels.len() - 1]
    }

    pub fn iter(&self) -> impl Iterator<Item = &Channel> {
        self.channels.iter()
    }

    pub fn len(&self) -> usize {
        self.channels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    fn position(&self, id: u32) -> Option<usize> {
        self.channels.iter().position(|c| c.id == id)
    }
}

#[cfg(test)]
pub(crate) fn lineup(ids: &[u32]) -> ChannelCatalog {
    let channels = ids
        .iter()
        .map(|&id| Channel::new(id, format!("Channel {id}"), Category::Other, "test"));
    ChannelCatalog::load(channels).unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_rejects_empty_catalog() {
        let err = ChannelCatalog::load(Vec::new()).unwrap_err();
        assert_eq!(err, CatalogError::Empty);
    }

    #[test]
    fn load_rejects_duplicate_ids() {
        let channels = vec![
            Channel::new(3, "A", Category::Sitcom, "builtin:sitcom"),
            Channel::new(4, "B", Category::Cartoon, "builtin:cartoon"),
            Channel::new(3, "C", Category::Weather, "builtin:weather"),
        ];
        let err = ChannelCatalog::load(channels).unwrap_err();
        assert_eq!(err, CatalogError::DuplicateId(3));
    }

    #[test]
    fn get_unknown_id_is_not_found() {
        let catalog = lineup(&[1, 2, 3]);
        assert_eq!(catalog.get(2).unwrap().name, "Channel 2");
        assert_eq!(catalog.get(9).unwrap_err(), NotFoundError { id: 9 });
    }

    #[test]
    fn next_id_wraps_in_both_directions() {
        let catalog = lineup(&[2, 5, 9]);
        assert_eq!(catalog.next_id(9, Direction::Up), 2);
        assert_eq!(catalog.next_id(2, Direction::Down), 9);
        assert_eq!(catalog.next_id(2, Direction::Up), 5);
        assert_eq!(catalog.next_id(5, Direction::Down), 2);
    }

    #[test]
    fn channel_up_n_times_returns_to_start() {
        for n in 1..=7u32 {
            let ids: Vec<u32> = (0..n).map(|i| 10 + i * 3).collect();
            let catalog = lineup(&ids);
            for &start in &ids {
                let mut id = start;
                for _ in 0..n {
                    id = catalog.next_id(id, Direction::Up);
                }
                assert_eq!(id, start, "catalog of {n} channels starting at {start}");
            }
        }
    }

    #[test]
    fn single_channel_wraps_onto_itself() {
        let catalog = lineup(&[7]);
        assert_eq!(catalog.next_id(7, Direction::Up), 7);
        assert_eq!(catalog.next_id(7, Direction::Down), 7);
    }

    #[test]
    fn display_honours_padding() {
        assert_eq!(format!("[{:<8}]", Category::Anime), "[Anime   ]");
        assert_eq!(format!("[{:>6}]", ContentRef::new("a:b")), "[   a:b]");
    }

    #[test]
    fn insertion_order_is_dial_order() {
        let catalog = lineup(&[30, 10, 20]);
        assert_eq!(catalog.first().id, 30);
        assert_eq!(catalog.last().id, 20);
        assert_eq!(catalog.next_id(30, Direction::Up), 10);
    }
}
