//! erb - Command line front end for the engine bridge
//!
//! Opens the native engine library described by `erbridge.toml`, runs one
//! operation, and prints the response.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use erbridge::{init_logging, Bridge, BridgeConfig, EntryShape};
use std::io::{self, Write};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "erb")]
#[command(version)]
#[command(about = "Bridge to a native entity-resolution engine library", long_about = None)]
struct Cli {
    /// Config file (default: erbridge.toml in this or a parent directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Engine library to load, overriding the configured name and path
    #[arg(long, global = true)]
    library: Option<PathBuf>,

    /// Print responses as received instead of pretty-printed JSON
    #[arg(long, global = true)]
    raw: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    // Commands sorted alphabetically for easier navigation
    /// Print the effective configuration as TOML
    Config,

    /// List the data sources of the default configuration
    DataSources,

    /// Look up an entity by entity ID or by record
    Entity {
        /// Resolved entity ID
        #[arg(long, conflicts_with_all = ["data_source", "record_id"])]
        id: Option<i64>,

        /// Data source code of the record
        #[arg(long, requires = "record_id")]
        data_source: Option<String>,

        /// Record ID within the data source
        #[arg(long, requires = "data_source")]
        record_id: Option<String>,

        /// Response flags (uses the V2 entry point)
        #[arg(long)]
        flags: Option<i64>,
    },

    /// Stream an entity export to standard output
    Export {
        /// Export CSV with these columns instead of JSON
        #[arg(long)]
        csv: Option<String>,

        /// Export flags
        #[arg(long, default_value_t = 0)]
        flags: i64,
    },

    /// Print product license information
    License,

    /// Search for entities by attributes
    Search {
        /// Attributes as a JSON document
        attributes: String,

        /// Response flags (uses the V2 entry point)
        #[arg(long)]
        flags: Option<i64>,
    },

    /// Engine workload statistics
    Stats,

    /// Check which entry points the engine library exports
    Symbols {
        /// Only list entry points of this calling shape
        #[arg(long)]
        shape: Option<String>,

        /// Only list entry points the library is missing
        #[arg(long)]
        missing: bool,
    },

    /// Print product version information
    Version,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = BridgeConfig::resolve(cli.config.as_deref()).context("Failed to load config")?;
    if let Some(library) = &cli.library {
        config.library.path = Some(library.clone());
    }
    init_logging(&config.logging).context("Failed to set up logging")?;

    let raw = cli.raw;
    match cli.command {
        Commands::Config => cmd_config(&config),
        Commands::Symbols { shape, missing } => cmd_symbols(&config, shape.as_deref(), missing),
        Commands::DataSources => with_bridge(&config, |bridge| cmd_data_sources(bridge, raw)),
        Commands::Entity {
            id,
            data_source,
            record_id,
            flags,
        } => with_bridge(&config, |bridge| {
            cmd_entity(bridge, id, data_source.as_deref(), record_id.as_deref(), flags, raw)
        }),
        Commands::Export { csv, flags } => {
            with_bridge(&config, |bridge| cmd_export(bridge, csv.as_deref(), flags))
        }
        Commands::License => with_bridge(&config, |bridge| {
            print_response(&bridge.product().license()?, raw);
            Ok(())
        }),
        Commands::Search { attributes, flags } => {
            with_bridge(&config, |bridge| cmd_search(bridge, &attributes, flags, raw))
        }
        Commands::Stats => with_bridge(&config, |bridge| {
            let engine = bridge.engine();
            let stats = engine.check("stats", engine.stats()?)?;
            print_response(&stats.to_string_lossy(), raw);
            Ok(())
        }),
        Commands::Version => with_bridge(&config, |bridge| {
            print_response(&bridge.product().version()?, raw);
            Ok(())
        }),
    }
}

/// Open and initialize the bridge, run `f`, then destroy every component
/// whether or not `f` succeeded. A failed initialization has already
/// destroyed the components it brought up.
fn with_bridge<F>(config: &BridgeConfig, f: F) -> Result<()>
where
    F: FnOnce(&Bridge) -> Result<()>,
{
    let bridge = Bridge::open(config).context("Failed to open engine library")?;
    bridge
        .initialize_all()
        .context("Failed to initialize engine components")?;

    let outcome = f(&bridge);
    let destroyed = bridge.destroy_all().context("Failed to destroy engine components");
    outcome.and(destroyed)
}

/// Pretty-print a JSON response; anything that is not JSON is printed as-is.
fn print_response(text: &str, raw: bool) {
    if raw {
        println!("{}", text);
        return;
    }
    match serde_json::from_str::<serde_json::Value>(text) {
        Ok(value) => match serde_json::to_string_pretty(&value) {
            Ok(pretty) => println!("{}", pretty),
            Err(_) => println!("{}", text),
        },
        Err(_) => println!("{}", text),
    }
}

fn cmd_config(config: &BridgeConfig) -> Result<()> {
    let text = config
        .to_toml_string()
        .context("Failed to serialize config")?;
    print!("{}", text);
    Ok(())
}

fn cmd_symbols(config: &BridgeConfig, shape: Option<&str>, missing_only: bool) -> Result<()> {
    let shape = match shape {
        Some(name) => match EntryShape::from_str(name) {
            Some(shape) => Some(shape),
            None => bail!(
                "Unknown shape '{}' (expected one of: {})",
                name,
                EntryShape::ALL
                    .iter()
                    .map(|s| s.to_string())
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
        },
        None => None,
    };

    let bridge = Bridge::open(config).context("Failed to open engine library")?;
    let report = bridge.probe();

    let wanted = |entry: &&erbridge::EntryPoint| shape.map_or(true, |s| entry.shape == s);
    if !missing_only {
        for entry in report.resolved.iter().filter(wanted) {
            println!("  ok       {:<14} {:<10} {}", entry.component, entry.shape, entry.symbol);
        }
    }
    for entry in report.missing.iter().filter(wanted) {
        println!("  missing  {:<14} {:<10} {}", entry.component, entry.shape, entry.symbol);
    }

    println!(
        "\n{} of {} entry points resolved in {}",
        report.resolved.len(),
        report.total(),
        bridge.library().label()
    );
    Ok(())
}

fn cmd_data_sources(bridge: &Bridge, raw: bool) -> Result<()> {
    let manager = bridge.config_manager();
    let config_id = manager.check("get_default_config_id", manager.get_default_config_id()?)?;
    let document = manager.check("get_config", manager.get_config(config_id)?)?;

    let configuration = bridge.configuration();
    let handle = configuration.check(
        "load",
        configuration.load(&document.to_string_lossy())?,
    )?;
    let listed = configuration
        .list_data_sources(handle)
        .and_then(|result| configuration.check("list_data_sources", result));
    let closed = configuration.close(handle)?;
    configuration.core().check_status("close", closed)?;

    print_response(&listed?.to_string_lossy(), raw);
    Ok(())
}

fn cmd_entity(
    bridge: &Bridge,
    id: Option<i64>,
    data_source: Option<&str>,
    record_id: Option<&str>,
    flags: Option<i64>,
    raw: bool,
) -> Result<()> {
    let engine = bridge.engine();
    let result = match (id, data_source, record_id, flags) {
        (Some(id), _, _, None) => engine.get_entity_by_entity_id(id)?,
        (Some(id), _, _, Some(flags)) => engine.get_entity_by_entity_id_v2(id, flags)?,
        (None, Some(ds), Some(rid), None) => engine.get_entity_by_record_id(ds, rid)?,
        (None, Some(ds), Some(rid), Some(flags)) => {
            engine.get_entity_by_record_id_v2(ds, rid, flags)?
        }
        _ => bail!("Give either --id or --data-source with --record-id"),
    };
    let entity = engine.check("get_entity", result)?;
    print_response(&entity.to_string_lossy(), raw);
    Ok(())
}

fn cmd_search(bridge: &Bridge, attributes: &str, flags: Option<i64>, raw: bool) -> Result<()> {
    serde_json::from_str::<serde_json::Value>(attributes)
        .context("Search attributes must be a JSON document")?;

    let engine = bridge.engine();
    let result = match flags {
        Some(flags) => engine.search_by_attributes_v2(attributes, flags)?,
        None => engine.search_by_attributes(attributes)?,
    };
    let found = engine.check("search_by_attributes", result)?;
    print_response(&found.to_string_lossy(), raw);
    Ok(())
}

fn cmd_export(bridge: &Bridge, csv: Option<&str>, flags: i64) -> Result<()> {
    let engine = bridge.engine();
    let report = match csv {
        Some(columns) => engine.export_csv(columns, flags)?,
        None => engine.export_json(flags)?,
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let mut pages = 0usize;
    for page in report {
        let page = page.context("Export failed")?;
        out.write_all(page.as_bytes())
            .context("Failed to write export page")?;
        pages += 1;
    }
    out.flush().context("Failed to flush output")?;
    eprintln!("Exported {} pages", pages);
    Ok(())
}
