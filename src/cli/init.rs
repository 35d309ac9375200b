use anyhow::Result;
use inquire::Confirm;
use std::path::PathBuf;

use crtv::Config;

pub struct InitConfigCommand {
    pub path: PathBuf,
    pub force: bool,
}

impl InitConfigCommand {
    pub fn execute(self) -> Result<()> {
        if self.path.exists() && !self.force {
            let overwrite = Confirm::new(&format!(
                "{} already exists. Overwrite it with the default line-up?",
                self.path.display()
            ))
            .with_default(false)
            .prompt()?;

            if !overwrite {
                println!("Keeping existing configuration.");
                return Ok(());
            }
        }

        Config::default().save(&self.path)?;
        println!("✅ Wrote default configuration to {}", self.path.display());
        println!("Edit the [[channels]] entries to change the line-up.");
        Ok(())
    }
}
