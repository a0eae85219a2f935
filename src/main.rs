use clap::{Parser, Subcommand};
use folio::layout::{self, LayoutStrategy};
use folio::{config, manifest, output, repository::ContentRepository};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "folio")]
#[command(about = "Content indexer and gallery planner for portfolio sites")]
#[command(long_about = "\
Content indexer and gallery planner for portfolio sites

Your filesystem is the data source. Photos are grouped by subdirectory or by
file-name prefix, projects are folders with optional metadata, and every
gallery is laid out with a deterministic span plan.

Content structure:

  content/
  ├── config.toml                  # Site config (optional)
  ├── photos/
  │   ├── nature1.jpg              # Prefix category \"Nature\"
  │   ├── nature1.json             # Sidecar: title, location, date
  │   └── Travel/                  # Subdirectory category \"Travel\"
  │       └── rome-01.jpg
  └── projects/
      └── brand-film/              # Project slug
          ├── meta.json            # title, client, year, services, ...
          ├── cover.mp4            # Cover (video extensions checked first)
          └── images/              # Gallery
              └── 01.jpg

Run 'folio gen-config' to generate a documented config.toml.")]
#[command(version)]
struct Cli {
    /// Content directory
    #[arg(long, default_value = "content", global = true)]
    source: PathBuf,

    /// URL subpath prefixed onto every asset path (overrides config.toml)
    #[arg(long, env = "BASE_PATH", global = true)]
    base_path: Option<String>,

    /// Log debug events to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List photos with their planned layout
    Photos {
        /// Category slug, subdirectory name or file-name prefix
        #[arg(long)]
        category: Option<String>,
        /// Layout strategy (defaults to the configured photo layout)
        #[arg(long, value_enum)]
        layout: Option<LayoutStrategy>,
    },
    /// List photo categories with counts
    Categories,
    /// List projects, newest first
    Projects,
    /// Show one project with its gallery plan
    Project {
        /// Project folder name
        slug: String,
    },
    /// Write the full site manifest as JSON
    Manifest {
        /// Output file (stdout when omitted)
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Command::GenConfig = cli.command {
        print!("{}", config::stock_config_toml());
        return Ok(());
    }

    let mut site_config = config::load_config(&cli.source)?;
    if let Some(base_path) = cli.base_path {
        site_config.base_path = base_path;
    }
    init_thread_pool(&site_config.processing);

    let repo = ContentRepository::new(&cli.source, site_config);
    run(&repo, cli.command)?;
    tracing::debug!(cache = %repo.cache_stats(), "done");
    Ok(())
}

fn run(repo: &ContentRepository, command: Command) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Command::Photos { category, layout: strategy } => {
            let strategy = strategy.unwrap_or(repo.config().layout.photos);
            let photos = repo.list_photos(category.as_deref())?;
            let placements = layout::plan(&photos, strategy);
            output::print_photos(category.as_deref(), strategy, &placements);
        }
        Command::Categories => {
            output::print_categories(&repo.list_categories()?);
        }
        Command::Projects => {
            output::print_projects(&repo.list_projects()?);
        }
        Command::Project { slug } => match repo.get_project(&slug)? {
            Some(project) => {
                let page = manifest::project_page(repo, &project)?;
                output::print_project(&page);
            }
            None => return Err(format!("project '{}' not found", slug).into()),
        },
        Command::Manifest { output: path } => {
            let site = manifest::build_manifest(repo, None)?;
            match path {
                Some(path) => {
                    manifest::write_manifest(&site, &path)?;
                    eprintln!("Wrote {}", path.display());
                }
                None => println!("{}", manifest::to_json(&site)?),
            }
        }
        Command::GenConfig => print!("{}", config::stock_config_toml()),
    }
    Ok(())
}

/// Logs go to stderr so `folio manifest` output stays pipeable.
/// `RUST_LOG` wins over `--verbose`.
fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_writer(std::io::stderr)
        .init();
}

/// Initialize the rayon thread pool based on processing config.
///
/// Capped at the number of available cores; config can only lower it.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}
