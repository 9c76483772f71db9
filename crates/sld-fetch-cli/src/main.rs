//! sld-fetch — entry point.

use std::path::PathBuf;

use clap::{Args, CommandFactory, Parser, Subcommand};
use clap_complete::Shell;

use sld_fetch::{jurisdictions, Chamber, SourceTemplate};
use sld_fetch_cli::commands::annotate_cmd::{self, AnnotateOptions};
use sld_fetch_cli::commands::fetch_cmd::{self, FetchOptions};
use sld_fetch_cli::commands::{jurisdictions_cmd, plan_cmd, selected_chambers};
use sld_fetch_cli::config::{resolve_base_url, resolve_output_dir, resolve_timeout};

#[derive(Parser)]
#[command(
    name = "sld-fetch",
    about = "Download TIGER/Line 2018 state legislative district shapefiles for every state, DC, and Puerto Rico",
    version,
    after_help = "Run 'sld-fetch <command> --help' for details on each command.\nRun 'sld-fetch' with no command to fetch everything into ./data."
)]
struct Cli {
    /// Log level (trace, debug, info, warn, error). RUST_LOG takes precedence.
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    /// Output results as JSON (machine-readable)
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Download archives (default)
    Fetch(FetchArgs),

    /// Print the URL and destination of every archive without downloading
    Plan {
        #[command(flatten)]
        target: TargetArgs,
    },

    /// List the embedded jurisdiction table
    Jurisdictions,

    /// Attach OCD-IDs to the combined SLD GeoJSON
    Annotate {
        /// Directory holding the default inputs and output
        /// [env: SLD_FETCH_DATA_DIR] [default: ./data]
        #[arg(short = 'd', long)]
        data_dir: Option<String>,

        /// Input GeoJSON [default: <data-dir>/sld.geojson]
        #[arg(long)]
        geojson: Option<PathBuf>,

        /// Upper chamber OCD-ID CSV [default: <data-dir>/sldu-ocdid.csv]
        #[arg(long)]
        sldu_csv: Option<PathBuf>,

        /// Lower chamber OCD-ID CSV [default: <data-dir>/sldl-ocdid.csv]
        #[arg(long)]
        sldl_csv: Option<PathBuf>,

        /// Output GeoJSON [default: <data-dir>/sld-with-ocdid.geojson]
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Generate shell completion scripts
    ///
    /// Examples:
    ///   sld-fetch completions bash > ~/.local/share/bash-completion/completions/sld-fetch
    ///   sld-fetch completions zsh > ~/.zfunc/_sld-fetch
    Completions {
        /// Shell type (bash, zsh, fish, powershell, elvish)
        shell: Shell,
    },
}

/// Which archives, from where, to where.
#[derive(Args, Default)]
struct TargetArgs {
    /// Output directory [env: SLD_FETCH_DATA_DIR] [default: ./data]
    #[arg(short, long)]
    output_dir: Option<String>,

    /// Archive host [env: SLD_FETCH_BASE_URL] [default: https://www2.census.gov]
    #[arg(long)]
    base_url: Option<String>,

    /// Limit to a state by name, USPS abbreviation, or FIPS code. Repeatable.
    #[arg(long = "state", value_name = "STATE")]
    states: Vec<String>,

    /// Limit to one chamber (lower, upper). Repeatable.
    #[arg(long = "chamber", value_name = "CHAMBER")]
    chambers: Vec<Chamber>,
}

#[derive(Args, Default)]
struct FetchArgs {
    #[command(flatten)]
    target: TargetArgs,

    /// Stop at the first failed archive
    #[arg(long)]
    fail_fast: bool,

    /// Do not refetch archives already on disk
    #[arg(long)]
    skip_existing: bool,

    /// Create the output directory if it is missing
    #[arg(long)]
    create_dir: bool,

    /// Per-request timeout in seconds [env: SLD_FETCH_TIMEOUT_SECS]
    #[arg(long)]
    timeout_secs: Option<u64>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let json = cli.json;
    let result = match cli.command.unwrap_or_else(|| Commands::Fetch(FetchArgs::default())) {
        Commands::Fetch(args) => match resolve_timeout(args.timeout_secs) {
            Err(e) => Err(e),
            Ok(timeout) => {
                let opts = FetchOptions {
                    output_dir: resolve_output_dir(args.target.output_dir.as_deref()),
                    base_url: resolve_base_url(args.target.base_url.as_deref()),
                    states: args.target.states,
                    chambers: args.target.chambers,
                    fail_fast: args.fail_fast,
                    skip_existing: args.skip_existing,
                    create_dir: args.create_dir,
                    timeout,
                };
                match fetch_cmd::run(&opts, json).await {
                    Ok(report) if !report.is_success() => std::process::exit(1),
                    other => other.map(|_| ()),
                }
            }
        },

        Commands::Plan { target } => {
            let output_dir = resolve_output_dir(target.output_dir.as_deref());
            let base_url = resolve_base_url(target.base_url.as_deref());
            SourceTemplate::new(&base_url, output_dir)
                .map_err(anyhow::Error::from)
                .and_then(|source| {
                    let selected = jurisdictions::select(&target.states)?;
                    plan_cmd::run(&source, &selected, &selected_chambers(&target.chambers), json)
                })
                .map(|_| ())
        }

        Commands::Jurisdictions => jurisdictions_cmd::run(json),

        Commands::Annotate {
            data_dir,
            geojson,
            sldu_csv,
            sldl_csv,
            output,
        } => {
            let data_dir = resolve_output_dir(data_dir.as_deref());
            let opts = AnnotateOptions::resolve(&data_dir, geojson, sldu_csv, sldl_csv, output);
            annotate_cmd::run(&opts, json).map(|_| ())
        }

        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "sld-fetch", &mut std::io::stdout());
            Ok(())
        }
    };

    // Consistent exit codes: 0=success, 1=error
    if let Err(e) = &result {
        if json {
            sld_fetch_cli::output::print_json(&serde_json::json!({
                "error": true,
                "message": format!("{e:#}"),
            }))?;
        } else {
            eprintln!("Error: {e:#}");
        }
        std::process::exit(1);
    }

    result
}
