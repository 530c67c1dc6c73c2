use super::Context;
use anyhow::Result;
use colored::Colorize;
use seedline_core::config::ClientConfig;

pub fn show(ctx: &Context) -> Result<()> {
    let storage = ctx.config_storage()?;
    let config = ctx.load_config()?;

    println!("{} {}", "# file:".dimmed(), storage.path().display());
    println!("{} {}", "# backend:".dimmed(), config.resolve_base_url());
    print!("{}", toml::to_string_pretty(&config)?);
    Ok(())
}

pub fn init(ctx: &Context) -> Result<()> {
    let storage = ctx.config_storage()?;
    if storage.path().exists() {
        println!("Config already exists at {}", storage.path().display());
        return Ok(());
    }
    storage.save(&ClientConfig::default())?;
    println!("Wrote default config to {}", storage.path().display());
    Ok(())
}
