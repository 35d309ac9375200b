use super::OutputFormat;
use anyhow::Result;
use serde_json::json;

use crtv::content::{ContentSource, Library};
use crtv::{ChannelCatalog, Config};

pub struct ChannelsCommand {
    pub format: OutputFormat,
}

impl ChannelsCommand {
    pub fn execute(self, config: &Config) -> Result<()> {
        let catalog = ChannelCatalog::load(config.channels.clone())?;
        let library = Library::preload(catalog.iter());

        match self.format {
            OutputFormat::Text => {
                for channel in catalog.iter() {
                    let frames = match library.length(channel) {
                        Ok(n) => format!("{} frames", n),
                        Err(e) => format!("no signal ({})", e),
                    };
                    println!(
                        "{:>3}  {:<16} {:<8} {:<20} {}",
                        channel.id,
                        channel.name,
                        channel.category,
                        channel.content_ref,
                        frames
                    );
                }
            }
            OutputFormat::Json => {
                let channels: Vec<_> = catalog
                    .iter()
                    .map(|channel| {
                        let length = library.length(channel);
                        json!({
                            "id": channel.id,
                            "name": channel.name,
                            "category": channel.category,
                            "content": channel.content_ref,
                            "frames": length.as_ref().ok(),
                            "error": length.as_ref().err().map(|e| e.to_string()),
                        })
                    })
                    .collect();
                println!("{}", serde_json::to_string_pretty(&channels)?);
            }
        }

        Ok(())
    }
}
