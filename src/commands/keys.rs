use owo_colors::OwoColorize;
use redbeard_browser_core::filter::KeyFilter;
use redbeard_browser_core::markup;
use redbeard_browser_core::{AdminClient, KeyName, Route};

use crate::{CliError, CliResult};

fn colors_enabled() -> bool {
    atty::is(atty::Stream::Stdout)
}

/// Keys that survive `filter`, in server order.
fn filtered_keys(keys: Vec<String>, filter: Option<&str>) -> Vec<String> {
    let filter = KeyFilter::new(filter.unwrap_or_default());
    keys.into_iter().filter(|k| filter.matches(k)).collect()
}

pub async fn list_keys(client: &AdminClient, filter: Option<&str>, json: bool) -> CliResult<()> {
    let keys = filtered_keys(client.keys().await?, filter);

    if json {
        let out = serde_json::json!({ "keys": keys });
        let text =
            serde_json::to_string_pretty(&out).map_err(|e| CliError::Other(e.to_string()))?;
        println!("{text}");
        return Ok(());
    }

    if keys.is_empty() {
        if colors_enabled() {
            eprintln!("{}", "No keys.".dimmed());
        } else {
            eprintln!("No keys.");
        }
        return Ok(());
    }

    let color = colors_enabled();
    for key in &keys {
        let Ok(name) = KeyName::new(key.as_str()) else {
            continue;
        };
        let href = Route::Key(name).path(client.base());
        if color {
            println!("{}  {}", key.bold(), href.dimmed());
        } else {
            println!("{key}\t{href}");
        }
    }
    Ok(())
}

pub async fn show_key(client: &AdminClient, key: &str, raw: bool) -> CliResult<()> {
    let name = KeyName::new(key)?;
    let markup = client.key_markup(&name).await?;
    if raw {
        println!("{markup}");
        return Ok(());
    }

    if colors_enabled() {
        println!("{}", Route::Key(name).url(client.base()).to_string().cyan());
    }
    for line in markup::to_lines(&markup) {
        println!("{line}");
    }
    Ok(())
}
