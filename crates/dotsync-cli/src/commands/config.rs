use anyhow::Context;

use super::common::SyncOptions;

pub struct Config;

impl Config {
    pub fn execute(options: &SyncOptions<'_>) -> anyhow::Result<u8> {
        let context = options.context()?;
        let rendered = context
            .to_toml()
            .context("Failed to render configuration")?;
        print!("{rendered}");
        Ok(0)
    }
}
