// makocfg: inspect and edit a directory of configuration sections
//
// Usage:
//     makocfg [--dir <path>] list
//     makocfg [--dir <path>] get <section>
//     makocfg [--dir <path>] set <section> <json>
//     makocfg [--dir <path>] clear
//     makocfg version

use anyhow::{bail, Context};
use mako_config::version::full_version_info;
use mako_config::{AppBuilder, ServiceSettings};
use std::path::PathBuf;

const USAGE: &str = "usage: makocfg [--dir <path>] <list | get <section> | set <section> <json> | clear | version>";

#[derive(Debug, PartialEq)]
enum Command {
    List,
    Get(String),
    Set(String, String),
    Clear,
    Version,
}

/// Parse command-line arguments (program name already skipped)
fn parse_args<I>(args: I) -> anyhow::Result<(Option<PathBuf>, Command)>
where
    I: IntoIterator<Item = String>,
{
    let mut args = args.into_iter();
    let mut dir = None;
    let mut positional = Vec::new();

    while let Some(arg) = args.next() {
        if arg == "--dir" {
            let value = args.next().context("--dir requires a path")?;
            dir = Some(PathBuf::from(value));
        } else {
            positional.push(arg);
        }
    }

    let mut positional = positional.into_iter();
    let command = match positional.next().as_deref() {
        Some("list") => Command::List,
        Some("get") => Command::Get(positional.next().context("get requires a section name")?),
        Some("set") => {
            let section = positional.next().context("set requires a section name")?;
            let json = positional.next().context("set requires a JSON value")?;
            Command::Set(section, json)
        }
        Some("clear") => Command::Clear,
        Some("version") => Command::Version,
        Some(other) => bail!("unknown command '{}'\n{}", other, USAGE),
        None => bail!("{}", USAGE),
    };

    if positional.next().is_some() {
        bail!("too many arguments\n{}", USAGE);
    }

    Ok((dir, command))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so `get` output stays pipeable
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let (dir, command) = parse_args(std::env::args().skip(1))?;

    if command == Command::Version {
        println!("{}", full_version_info());
        return Ok(());
    }

    let mut settings = ServiceSettings::load()?;
    if let Some(dir) = dir {
        settings.config_dir = dir;
    }
    tracing::debug!("Using config directory {}", settings.config_dir.display());

    let deps = AppBuilder::new()
        .with_settings(settings)
        .with_production_deps()
        .build()
        .await?;
    let config = deps.configuration;

    match command {
        Command::List => {
            for section in config.get_sections().await {
                println!("{}", section);
            }
        }
        Command::Get(section) => match config.load_config_section(&section).await {
            Some(text) => println!("{}", text),
            None => {
                eprintln!("section '{}' not found", section);
                std::process::exit(1);
            }
        },
        Command::Set(section, json) => {
            if !config
                .update_config_section_string_as::<serde_json::Value>(&section, &json)
                .await
            {
                bail!("section '{}' not updated", section);
            }
        }
        Command::Clear => {
            if !config.clear_all().await {
                bail!("some config files could not be deleted");
            }
        }
        Command::Version => unreachable!("handled before storage setup"),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_list_with_dir() {
        let (dir, command) = parse_args(args(&["--dir", "/flash", "list"])).unwrap();
        assert_eq!(dir, Some(PathBuf::from("/flash")));
        assert_eq!(command, Command::List);
    }

    #[test]
    fn test_parse_set() {
        let (dir, command) = parse_args(args(&["set", "Wifi", "{\"ssid\":\"x\"}"])).unwrap();
        assert_eq!(dir, None);
        assert_eq!(
            command,
            Command::Set("Wifi".to_string(), "{\"ssid\":\"x\"}".to_string())
        );
    }

    #[test]
    fn test_parse_errors() {
        assert!(parse_args(args(&[])).is_err());
        assert!(parse_args(args(&["get"])).is_err());
        assert!(parse_args(args(&["frobnicate"])).is_err());
        assert!(parse_args(args(&["clear", "extra"])).is_err());
        assert!(parse_args(args(&["list", "--dir"])).is_err());
    }
}
