use user_portal::config::{API_URL_ENV, read_config, resolve_api_url, write_config};

use anyhow::Context as _;

use super::*;

pub(super) fn handle_config_command(ctx: &Context, command: ConfigCommands) -> Result<()> {
    match command {
        ConfigCommands::Show { json } => {
            let cfg = read_config(&ctx.data_dir)?;
            let effective = resolve_api_url(ctx.api_url.as_deref(), &cfg);
            if json {
                let out = serde_json::json!({
                    "data_dir": ctx.data_dir.display().to_string(),
                    "api_url": effective,
                    "config": cfg,
                });
                println!(
                    "{}",
                    serde_json::to_string_pretty(&out).context("serialize config json")?
                );
            } else {
                println!("data dir: {}", ctx.data_dir.display());
                println!("api url: {}", effective);
                if std::env::var_os(API_URL_ENV).is_some() {
                    println!("({} is set)", API_URL_ENV);
                }
            }
        }
        ConfigCommands::Set { api_url } => {
            let mut cfg = read_config(&ctx.data_dir)?;
            cfg.api_url = Some(api_url.trim().trim_end_matches('/').to_string());
            write_config(&ctx.data_dir, &cfg)?;
            println!("Config updated");
        }
    }
    Ok(())
}
