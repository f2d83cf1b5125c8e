use redbeard_browser_core::config::{BrowserConfig, config_file_path, init_config};

use crate::{CliError, CliResult, ConfigCommand};

pub async fn handle(cmd: ConfigCommand, resolved: &BrowserConfig) -> CliResult<()> {
    match cmd {
        ConfigCommand::Init { force } => {
            let path = init_config(force)
                .await
                .map_err(|e| CliError::Config(e.to_string()))?;
            println!("Wrote default config to {:?}", path);
        }
        ConfigCommand::Show => {
            let text = toml_text(resolved)?;
            println!("# effective config (file: {:?})", config_file_path());
            print!("{text}");
        }
        ConfigCommand::Path => {
            println!("{}", config_file_path().display());
        }
    }
    Ok(())
}

fn toml_text(cfg: &BrowserConfig) -> CliResult<String> {
    toml::to_string_pretty(cfg).map_err(|e| CliError::Config(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolved_config_renders_server_section() {
        let mut cfg = BrowserConfig::default();
        cfg.server.base_url = "http://10.0.0.9:5000".to_string();
        let text = toml_text(&cfg).expect("toml");
        assert!(text.contains("[server]"));
        assert!(text.contains("base_url = \"http://10.0.0.9:5000\""));
        assert!(text.contains("timeout_ms = 5000"));
    }
}
