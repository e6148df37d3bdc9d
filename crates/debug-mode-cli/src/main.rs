//! `debugctl`: resolve and scrub debug mode URLs from the command line

use anyhow::{Context, Result};
use clap::{Arg, ArgAction, ArgMatches, Command};
use debug_mode_activation::{init_from_url, remove_query_param, Activation, DebugModeConfig};
use debug_mode_store::{DebugModeKey, DebugModeStore};
use serde::Serialize;
use std::io::Write;
use tracing_subscriber::EnvFilter;

fn cli() -> Command {
    Command::new("debugctl")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Inspect how debug mode URLs resolve")
        .subcommand_required(true)
        .arg(
            Arg::new("config")
                .long("config")
                .global(true)
                .value_name("FILE")
                .help("TOML config file"),
        )
        .arg(
            Arg::new("param")
                .long("param")
                .global(true)
                .value_name("NAME")
                .help("Override the activation query parameter name"),
        )
        .subcommand(Command::new("keys").about("List recognized debug mode keys"))
        .subcommand(
            Command::new("resolve")
                .about("Show which keys a URL enables")
                .arg(Arg::new("url").required(true).help("URL or path with query"))
                .arg(
                    Arg::new("json")
                        .long("json")
                        .action(ArgAction::SetTrue)
                        .help("Output as JSON"),
                ),
        )
        .subcommand(
            Command::new("scrub")
                .about("Print the URL with the activation parameter removed")
                .arg(Arg::new("url").required(true).help("URL or path with query")),
        )
}

fn load_config(matches: &ArgMatches) -> Result<DebugModeConfig> {
    let mut config = match matches.get_one::<String>("config") {
        Some(path) => DebugModeConfig::load(path).with_context(|| format!("loading {path}"))?,
        None => DebugModeConfig::default(),
    };
    if let Some(param) = matches.get_one::<String>("param") {
        config = config.with_param_name(param.as_str());
        config.validate().context("invalid --param")?;
    }
    Ok(config)
}

fn init_tracing(config: &DebugModeConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[derive(Debug, Serialize)]
struct ResolveReport<'a> {
    url: &'a str,
    param: &'a str,
    activation: Activation,
    enabled: Vec<DebugModeKey>,
    debug_mode: bool,
}

fn resolve(out: &mut impl Write, url: &str, json: bool, config: &DebugModeConfig) -> Result<()> {
    let store = DebugModeStore::new();
    let activation = init_from_url(&store, url, config);
    let report = ResolveReport {
        url,
        param: &config.param_name,
        activation,
        enabled: store.enabled_keys(),
        debug_mode: store.is_enabled(),
    };

    if json {
        serde_json::to_writer_pretty(&mut *out, &report)?;
        writeln!(out)?;
        return Ok(());
    }

    let requested = match &report.activation {
        Activation::Unspecified => "unspecified".to_string(),
        Activation::OptOut => "opt-out".to_string(),
        Activation::Keys(keys) if keys.is_empty() => "no recognized keys".to_string(),
        Activation::Keys(keys) => keys
            .iter()
            .map(|key| key.as_str())
            .collect::<Vec<_>>()
            .join(", "),
    };
    writeln!(out, "Parameter:  {}", report.param)?;
    writeln!(out, "Requested:  {requested}")?;
    writeln!(out, "Debug mode: {}", if report.debug_mode { "ON" } else { "OFF" })?;
    for key in DebugModeKey::ALL {
        let mark = if report.enabled.contains(&key) { "x" } else { " " };
        writeln!(out, "  [{mark}] {key}")?;
    }
    Ok(())
}

fn keys(out: &mut impl Write) -> Result<()> {
    for key in DebugModeKey::ALL {
        writeln!(out, "{key}")?;
    }
    Ok(())
}

fn scrub(out: &mut impl Write, url: &str, config: &DebugModeConfig) -> Result<()> {
    writeln!(out, "{}", remove_query_param(url, &config.param_name))?;
    Ok(())
}

fn run(matches: &ArgMatches, config: &DebugModeConfig, out: &mut impl Write) -> Result<()> {
    match matches.subcommand() {
        Some(("keys", _)) => keys(out),
        Some(("resolve", args)) => {
            let url = args.get_one::<String>("url").context("missing url")?;
            resolve(out, url, args.get_flag("json"), config)
        }
        Some(("scrub", args)) => {
            let url = args.get_one::<String>("url").context("missing url")?;
            scrub(out, url, config)
        }
        _ => Ok(()),
    }
}

fn main() -> Result<()> {
    let matches = cli().get_matches();
    let config = load_config(&matches)?;
    init_tracing(&config);

    let stdout = std::io::stdout();
    run(&matches, &config, &mut stdout.lock())
}
