#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that serves cached room cost matrices.

mod manifest;
mod memory_file;
mod render;

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use cost_matrix_core::{Command, Event, RoomName};
use cost_matrix_system_cache::CostMatrixCache;
use cost_matrix_world::{apply, query, restore_memory, split_room_mut, World};
use tracing_subscriber::EnvFilter;

/// Serves per-room cost matrices backed by a persistent memory file.
#[derive(Debug, Parser)]
#[command(name = "cost-matrix", version, long_about = None)]
struct Cli {
    /// Room manifest describing terrain, sources and stationary points.
    #[arg(long, default_value = "rooms.toml")]
    manifest: PathBuf,

    /// JSON file holding cached cost matrices between runs.
    #[arg(long, default_value = "cost-matrix-memory.json")]
    memory: PathBuf,

    /// Raises log verbosity; repeat for more detail.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: CliCommand,
}

#[derive(Debug, Subcommand)]
enum CliCommand {
    /// Print the cost matrix for a room and layer set
    Show(ShowArgs),

    /// List cached entries of a room
    Entries {
        /// Room whose entries are listed.
        room: String,
    },

    /// Drop every cached entry in every room
    Clear,
}

#[derive(Debug, Args)]
struct ShowArgs {
    /// Room whose matrix is printed.
    room: String,

    /// Layer to apply; repeat for several.
    #[arg(long = "layer", value_name = "NAME")]
    layers: Vec<String>,

    /// Apply every known layer.
    #[arg(long, conflicts_with = "layers")]
    full: bool,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Grid)]
    format: OutputFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Grid,
    Json,
}

/// Entry point for the cost matrix command-line interface.
fn main() -> Result<()> {
    let cli = Cli::parse();
    install_tracing(cli.verbose);

    let mut world = World::new();
    restore_memory(&mut world, memory_file::load(&cli.memory)?);
    configure_rooms(&mut world, manifest::load(&cli.manifest)?)?;

    match cli.command {
        CliCommand::Show(args) => {
            let output = show(&mut world, &args)?;
            memory_file::save(&cli.memory, &query::memory_snapshot(&world))?;
            print!("{output}");
        }
        CliCommand::Entries { room } => {
            print!("{}", entries(&world, &RoomName::new(room))?);
        }
        CliCommand::Clear => {
            let cleared = clear(&mut world);
            memory_file::save(&cli.memory, &query::memory_snapshot(&world))?;
            println!("cleared {cleared} cached cost matrices");
        }
    }

    Ok(())
}

fn install_tracing(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::INFO,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .with_writer(std::io::stderr)
        .init();
}

fn configure_rooms(world: &mut World, commands: Vec<Command>) -> Result<()> {
    let mut events = Vec::new();
    for command in commands {
        apply(world, command, &mut events);
    }

    for event in events {
        if let Event::RoomCommandRejected { room, reason } = event {
            bail!("room manifest entry for `{room}` was rejected: {reason:?}");
        }
    }
    Ok(())
}

fn show(world: &mut World, args: &ShowArgs) -> Result<String> {
    let mut events = Vec::new();
    apply(world, Command::Tick, &mut events);
    let tick = query::tick(world);

    let name = RoomName::new(args.room.as_str());
    let Some((room, memory)) = split_room_mut(world, &name) else {
        bail!("room `{name}` is not in the manifest");
    };

    let mut cache = CostMatrixCache::new(room, memory, tick);
    let grid = if args.full {
        cache.get_full_cost_matrix()
    } else {
        cache.get_cost_matrix_by_names(&args.layers)
    }
    .with_context(|| format!("failed to compute cost matrix for room `{name}`"))?;

    match args.format {
        OutputFormat::Grid => Ok(render::render_grid(&grid)),
        OutputFormat::Json => {
            let mut json = render::render_json(&grid).context("failed to encode cost matrix")?;
            json.push('\n');
            Ok(json)
        }
    }
}

fn entries(world: &World, room: &RoomName) -> Result<String> {
    if query::room(world, room).is_none() && query::cost_matrix_memory(world, room).is_none() {
        bail!("room `{room}` is not in the manifest");
    }

    let listed = query::cost_matrix_memory(world, room)
        .into_iter()
        .flat_map(|memory| memory.iter())
        .map(|(key, entry)| (key, entry.tick.get()));
    Ok(render::render_entries(listed))
}

fn clear(world: &mut World) -> usize {
    let mut events = Vec::new();
    apply(world, Command::ClearCostMatrixCaches, &mut events);
    events
        .into_iter()
        .find_map(|event| match event {
            Event::CostMatrixCachesCleared { entries } => Some(entries),
            _ => None,
        })
        .unwrap_or_default()
}
