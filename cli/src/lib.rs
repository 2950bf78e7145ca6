use anyhow::{bail, Context, Error, Result};
use clap::{Args, Parser, Subcommand};
use log::info;
use routestore::config;
use routestore::store::{decode_scalar, inspect, read_region};
use routestore::{ArtifactPaths, DataStoreLoader, ShmStore, DEFAULT_STORE_DIR};
use std::ffi::OsString;
use std::path::{Path, PathBuf};

#[derive(Debug, Parser)]
#[command(name = "routestore")]
#[command(about = "Publishes a preprocessed routing dataset into shared memory regions")]
#[command(arg_required_else_help = true)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
    /// Verbose mode - sets the log level to info, defaults to warning level
    #[clap(long, short, action, default_value = "false", global = true)]
    verbose: bool,
    /// Debug mode - sets the log level to debug, defaults to warning level
    #[clap(long, action, default_value = "false", global = true)]
    debug: bool,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Load all artifacts and publish them as named regions
    Load {
        #[command(flatten)]
        artifacts: ArtifactArgs,
        /// Directory holding the region files, ideally on a tmpfs
        #[clap(long, default_value = DEFAULT_STORE_DIR)]
        store_dir: PathBuf,
        /// Print the load summary as JSON
        #[clap(long, action)]
        json: bool,
    },
    /// List the regions present in a store
    Regions {
        /// Directory holding the region files
        #[clap(long, default_value = DEFAULT_STORE_DIR)]
        store_dir: PathBuf,
    },
}

#[derive(Debug, Args)]
struct ArtifactArgs {
    /// JSON config naming the artifacts (hsgrData, ramIndex, nodesData, edgesData, namesData, timestamp)
    #[clap(long, short, conflicts_with_all = ["names", "graph", "edges", "nodes", "rtree", "timestamp"])]
    config: Option<PathBuf>,
    /// Street name index (.names)
    #[clap(long)]
    names: Option<PathBuf>,
    /// Contracted graph (.hsgr)
    #[clap(long)]
    graph: Option<PathBuf>,
    /// Original edge data (.edges)
    #[clap(long)]
    edges: Option<PathBuf>,
    /// Node coordinates (.nodes)
    #[clap(long)]
    nodes: Option<PathBuf>,
    /// Spatial index tree nodes (.ramIndex)
    #[clap(long)]
    rtree: Option<PathBuf>,
    /// Build timestamp; "n/a" is published when absent
    #[clap(long)]
    timestamp: Option<PathBuf>,
}

impl ArtifactArgs {
    fn resolve(self) -> Result<ArtifactPaths> {
        if let Some(file) = self.config {
            return config::load_paths(&file)
                .with_context(|| format!("reading config {}", file.display()));
        }
        let mut builder = ArtifactPaths::builder();
        if let Some(p) = self.names {
            builder.names(p);
        }
        if let Some(p) = self.graph {
            builder.graph(p);
        }
        if let Some(p) = self.edges {
            builder.original_edges(p);
        }
        if let Some(p) = self.nodes {
            builder.nodes(p);
        }
        if let Some(p) = self.rtree {
            builder.spatial_index(p);
        }
        if let Some(p) = self.timestamp {
            builder.timestamp(p);
        }
        builder
            .build()
            .map_err(routestore::DatastoreError::from)
            .context("pass --config or all of --names, --graph, --edges, --nodes and --rtree")
    }
}

pub fn run() -> Result<()> {
    let cmd = Cli::parse();
    execute(cmd)
}

pub fn run_from_args<I, T>(args: I) -> Result<()>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cmd = Cli::try_parse_from(args).map_err(Error::from)?;
    execute(cmd)
}

fn init_logging(verbose: bool, debug: bool) {
    // flags win over RUST_LOG; without either the level is warn
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if debug {
        builder.parse_filters("debug");
    } else if verbose {
        builder.parse_filters("info");
    }
    let _ = builder.try_init();
}

fn execute(cmd: Cli) -> Result<()> {
    init_logging(cmd.verbose, cmd.debug);

    match cmd.command {
        Commands::Load {
            artifacts,
            store_dir,
            json,
        } => {
            let paths = artifacts.resolve()?;
            if cmd.verbose || cmd.debug {
                print_paths(&paths);
            }
            let mut store = ShmStore::open(&store_dir)?;
            let summary = DataStoreLoader::new(&mut store).load(&paths)?;
            info!(
                "Published {} regions to {}",
                store.published().count(),
                store_dir.display()
            );
            if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                println!("{summary}");
            }
        }
        Commands::Regions { store_dir } => list_regions(&store_dir)?,
    }
    Ok(())
}

fn print_paths(paths: &ArtifactPaths) {
    println!("Artifacts:");
    for (what, path) in paths.required() {
        println!("  {:<15} {}", what, path.display());
    }
    match &paths.timestamp {
        Some(ts) => println!("  {:<15} {}", "timestamp", ts.display()),
        None => println!("  {:<15} (none)", "timestamp"),
    }
}

fn list_regions(dir: &Path) -> Result<()> {
    if !dir.is_dir() {
        bail!("no region store at {}", dir.display());
    }
    let regions = inspect(dir)?;
    if regions.is_empty() {
        println!("No regions published in {}", dir.display());
        return Ok(());
    }
    for region in regions {
        let size = pretty_bytes::converter::convert(region.size as f64);
        let value = if region.name.is_scalar() {
            read_region(dir, region.name)?
                .as_deref()
                .and_then(decode_scalar)
                .map(|v| format!("= {v}"))
                .unwrap_or_default()
        } else {
            String::new()
        };
        println!(
            "{:<28} {:>10} {:<14} {}",
            region.name, size, value, region.digest
        );
    }
    Ok(())
}
