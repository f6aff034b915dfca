use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use macmap::config::EXPORT_FILENAME;
use macmap::{DuplicatePolicy, Inputs, MacEncoding, MapError, ReconcileOptions};
use std::fs;
use std::io::{self, Write};
use std::process::ExitCode;
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[derive(Parser)]
#[command(name = "macmap")]
#[command(about = "Map old user ids to MAC addresses and new user ids")]
struct Cli {
    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print summary counts and the first mapping rows as JSON
    Preview(MapArgs),
    /// Write the complete mapping as CSV
    Export(ExportArgs),
}

#[derive(Args)]
struct MapArgs {
    /// Old users CSV (id, username)
    #[arg(long)]
    old_file: Option<String>,

    /// MAC addresses CSV (user_id, mac)
    #[arg(long)]
    mags_file: Option<String>,

    /// New users CSV (id, username)
    #[arg(long)]
    new_file: Option<String>,

    /// How MAC values are written in the MAC file
    #[arg(long, value_enum, default_value_t = MacEncoding::Text)]
    mac_encoding: MacEncoding,

    /// Which record wins when a user id or username repeats
    #[arg(long, value_enum, default_value_t = DuplicatePolicy::LastWins)]
    on_duplicate: DuplicatePolicy,
}

#[derive(Args)]
struct ExportArgs {
    #[command(flatten)]
    map: MapArgs,

    /// Output path, or "-" for stdout
    #[arg(short, long, default_value = EXPORT_FILENAME)]
    output: String,
}

impl MapArgs {
    fn options(&self) -> ReconcileOptions {
        ReconcileOptions {
            mac_encoding: self.mac_encoding,
            on_duplicate: self.on_duplicate,
        }
    }

    fn inputs(&self) -> Result<Inputs> {
        Ok(Inputs {
            old_file: read_input(self.old_file.as_deref())?,
            mags_file: read_input(self.mags_file.as_deref())?,
            new_file: read_input(self.new_file.as_deref())?,
        })
    }
}

fn read_input(path: Option<&str>) -> Result<Option<Vec<u8>>> {
    path.map(|p| fs::read(p).with_context(|| format!("Failed to read input file: {}", p)))
        .transpose()
}

fn run_preview(args: MapArgs) -> Result<()> {
    let json = macmap::preview_json(&args.inputs()?, &args.options())?;
    println!("{}", json);
    Ok(())
}

fn run_export(args: ExportArgs) -> Result<()> {
    let mapping = macmap::run(&args.map.inputs()?, &args.map.options())?;
    let export = mapping.export()?;

    if args.output == "-" {
        io::stdout()
            .lock()
            .write_all(export.body.as_bytes())
            .context("Failed to write mapping to stdout")?;
    } else {
        fs::write(&args.output, &export.body)
            .with_context(|| format!("Failed to write mapping: {}", args.output))?;
        let stats = mapping.stats();
        info!(path = %args.output, "Mapping written");
        eprintln!("Wrote {} ({})", args.output, export.content_type);
        eprintln!("Total mappings:     {}", stats.total_mappings);
        eprintln!("With MAC:           {}", stats.with_mac);
        eprintln!("Without MAC:        {}", stats.without_mac);
        eprintln!("With new user id:   {}", stats.with_new_id);
        eprintln!("Unique MACs:        {}", stats.unique_macs);
    }

    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");

    let result = match cli.command {
        Commands::Preview(args) => run_preview(args),
        Commands::Export(args) => run_export(args),
    };

    match result {
        Ok(()) => {
            info!("Completed successfully");
            ExitCode::SUCCESS
        }
        Err(e) => match e.downcast_ref::<MapError>() {
            Some(map_err) => {
                error!(status = map_err.status(), "{}", map_err);
                eprintln!("{}", map_err.to_detail());
                ExitCode::from(if map_err.is_client_error() { 2 } else { 1 })
            }
            None => {
                error!("Error: {:#}", e);
                eprintln!("Error: {:#}", e);
                ExitCode::FAILURE
            }
        },
    }
}
