//! halftopo CLI - inspect the half-edge topology of an index buffer.
//!
//! Usage: halftopo <COMMAND> [OPTIONS] <INPUT>
//!
//! Run `halftopo --help` for available commands.

use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::{Parser, Subcommand, ValueEnum};

use halftopo::io::{self, Format};
use halftopo::mesh::{BuildOptions, HalfEdgeBuilder, HalfEdgeCollection};

#[derive(Parser)]
#[command(name = "halftopo")]
#[command(author, version, about = "Half-edge topology inspector", long_about = None)]
struct Cli {
    /// Enable debug logging (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Display topology statistics
    Info {
        /// Input index buffer
        input: PathBuf,

        /// Input format (default: detect from extension)
        #[arg(short, long, value_enum)]
        format: Option<InputFormat>,

        /// Fail on non-manifold or degenerate input
        #[arg(long)]
        strict: bool,
    },

    /// List boundary half-edges
    Boundary {
        /// Input index buffer
        input: PathBuf,

        /// Input format (default: detect from extension)
        #[arg(short, long, value_enum)]
        format: Option<InputFormat>,

        /// Group boundary half-edges into loops
        #[arg(long)]
        loops: bool,
    },

    /// Check topology invariants
    Validate {
        /// Input index buffer
        input: PathBuf,

        /// Input format (default: detect from extension)
        #[arg(short, long, value_enum)]
        format: Option<InputFormat>,
    },
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum InputFormat {
    /// Whitespace or comma separated integers
    Text,
    /// Little-endian u16 stream
    Binary,
}

impl From<InputFormat> for Format {
    fn from(f: InputFormat) -> Self {
        match f {
            InputFormat::Text => Format::Text,
            InputFormat::Binary => Format::Binary,
        }
    }
}

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Info {
            input,
            format,
            strict,
        } => {
            cmd_info(&input, format, strict)?;
        }

        Commands::Boundary {
            input,
            format,
            loops,
        } => {
            cmd_boundary(&input, format, loops)?;
        }

        Commands::Validate { input, format } => {
            cmd_validate(&input, format)?;
        }
    }

    Ok(())
}

fn load_topology(
    input: &Path,
    format: Option<InputFormat>,
    options: BuildOptions,
) -> Result<HalfEdgeCollection, Box<dyn std::error::Error>> {
    let indices = match format {
        Some(f) => io::load_as(input, f.into())?,
        None => io::load(input)?,
    };

    let start = Instant::now();
    let topo = HalfEdgeBuilder::with_options(options).build(&indices)?;
    log::info!(
        "built topology of {} ({} indices) in {:.2?}",
        input.display(),
        indices.len(),
        start.elapsed()
    );

    Ok(topo)
}

fn cmd_info(
    input: &Path,
    format: Option<InputFormat>,
    strict: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let options = if strict {
        BuildOptions::strict()
    } else {
        BuildOptions::default()
    };
    let topo = load_topology(input, format, options)?;

    println!("File: {}", input.display());
    println!("Faces: {}", topo.num_faces());
    println!("Half-edges: {}", topo.count());
    println!("Referenced vertices: < {}", topo.vertex_count_hint());
    println!("Twin pairs: {}", topo.twin_pairs().count());

    let boundary = topo.boundary_edges().count();
    if boundary == 0 {
        println!("Topology: Closed (no boundary)");
    } else {
        println!(
            "Topology: Open ({} boundary half-edges in {} loops)",
            boundary,
            topo.boundary_loops().len()
        );
    }

    let dups = topo.non_manifold_edges();
    if !dups.is_empty() {
        println!("Non-manifold edges: {}", dups.len());
        for dup in dups {
            println!(
                "  ({}, {}) owned by {:?}, duplicated by {:?}",
                dup.key.origin(),
                dup.key.destination(),
                dup.existing,
                dup.duplicate
            );
        }
    }

    let degenerate = topo.degenerate_faces();
    if !degenerate.is_empty() {
        println!("Degenerate faces: {}", degenerate.len());
    }

    Ok(())
}

fn cmd_boundary(
    input: &Path,
    format: Option<InputFormat>,
    loops: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let topo = load_topology(input, format, BuildOptions::default())?;

    if loops {
        for (i, chain) in topo.boundary_loops().iter().enumerate() {
            let vertices: Vec<String> = chain
                .iter()
                .map(|&he| topo.origin(he).to_string())
                .collect();
            let closed = chain
                .last()
                .map_or(false, |&he| topo.destination(he) == topo.origin(chain[0]));
            println!(
                "loop {} ({}, {} edges): {}",
                i,
                if closed { "closed" } else { "open" },
                chain.len(),
                vertices.join(" ")
            );
        }
    } else {
        for he in topo.boundary_edges() {
            println!("{} {} {}", he.id, he.origin, he.destination);
        }
    }

    Ok(())
}

fn cmd_validate(
    input: &Path,
    format: Option<InputFormat>,
) -> Result<(), Box<dyn std::error::Error>> {
    let topo = load_topology(input, format, BuildOptions::default())?;
    topo.validate()?;
    println!("OK: {} half-edges, {} faces", topo.count(), topo.num_faces());
    Ok(())
}
