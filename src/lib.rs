// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: (C) 2025 Cranky Kernel <crankykernel@proton.me>

pub mod catalog;
pub mod config;
pub mod content;
pub mod dispatch;
pub mod engine;
pub mod error;
pub mod scheduler;
pub mod testing;
pub mod tui;
pub mod tv;

pub use catalog::{Category, Channel, ChannelCatalog};
pub use config::Config;
pub use content::{ContentSource, Library};
pub use dispatch::{Dispatcher, Intent};
pub use engine::{Engine, EngineSettings, Frame, InputSource, Renderer};
pub use tui::run_tui;
pub use tv::{Power, TvState};
