//! Kubechart CLI - Generate Helm charts from typed Kubernetes objects

use clap::{Args, Parser, Subcommand};
use kubechart_helm::DEFAULT_HELM;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod definition;
mod error;
mod exit_codes;

use commands::{HelmSettings, ReleaseFlags};

#[derive(Parser)]
#[command(name = "kubechart")]
#[command(author = "Kubechart Contributors")]
#[command(version)]
#[command(about = "Generate Helm charts from typed Kubernetes objects and manage their releases", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Helm executable
    #[arg(long, global = true, env = "KUBECHART_HELM", default_value = DEFAULT_HELM)]
    helm: String,

    /// Release namespace (helm's current namespace if not set)
    #[arg(short, long, global = true, env = "KUBECHART_NAMESPACE")]
    namespace: Option<String>,

    /// Enable debug output
    #[arg(long, global = true)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a chart definition locally
    Template {
        /// Chart definition file
        definition: PathBuf,

        /// Write the chart under this directory instead of printing it
        #[arg(long)]
        output_dir: Option<PathBuf>,
    },

    /// Generate a chart and install it
    Install {
        /// Chart definition file
        definition: PathBuf,

        #[command(flatten)]
        release: ReleaseArgs,

        /// Create the release namespace if it doesn't exist
        #[arg(long)]
        create_namespace: bool,
    },

    /// Regenerate a chart and upgrade its release
    Upgrade {
        /// Chart definition file
        definition: PathBuf,

        #[command(flatten)]
        release: ReleaseArgs,
    },

    /// Uninstall a chart's release
    Uninstall {
        /// Chart definition file
        definition: PathBuf,
    },

    /// Show the release of a chart definition
    Status {
        /// Chart definition file
        definition: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List releases
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Args)]
struct ReleaseArgs {
    /// Directory the chart is generated under (default: system temp dir)
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Keep the generated chart after a successful run
    #[arg(long)]
    keep_chart: bool,

    /// Always pass --dependency-update to helm
    #[arg(long, conflicts_with = "skip_dependency_update")]
    dependency_update: bool,

    /// Never pass --dependency-update, even when the chart has dependencies
    #[arg(long)]
    skip_dependency_update: bool,

    /// Extra flag passed to helm verbatim (repeatable)
    #[arg(long = "helm-arg", allow_hyphen_values = true)]
    helm_args: Vec<String>,
}

impl ReleaseArgs {
    fn flags(&self, create_namespace: bool) -> ReleaseFlags {
        ReleaseFlags {
            dependency_update: self.dependency_update,
            skip_dependency_update: self.skip_dependency_update,
            create_namespace,
            helm_args: self.helm_args.clone(),
        }
    }
}

fn init_tracing(debug: bool) {
    let default_level = if debug { "info" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> error::Result<()> {
    let settings = HelmSettings {
        helm: cli.helm,
        namespace: cli.namespace,
    };

    match cli.command {
        Commands::Template {
            definition,
            output_dir,
        } => commands::template::run(&definition, output_dir.as_deref()),

        Commands::Install {
            definition,
            release,
            create_namespace,
        } => commands::install::run(
            &settings,
            &definition,
            release.output_dir.as_deref(),
            release.keep_chart,
            &release.flags(create_namespace),
        ),

        Commands::Upgrade {
            definition,
            release,
        } => commands::upgrade::run(
            &settings,
            &definition,
            release.output_dir.as_deref(),
            release.keep_chart,
            &release.flags(false),
        ),

        Commands::Uninstall { definition } => commands::uninstall::run(&settings, &definition),

        Commands::Status { definition, json } => {
            commands::status::run(&settings, &definition, json)
        }

        Commands::List { json } => commands::list::run(&settings, json),
    }
}

fn main() {
    // Setup miette for nice error display
    miette::set_panic_hook();

    let cli = Cli::parse();
    init_tracing(cli.debug);

    if let Err(err) = run(cli) {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}
