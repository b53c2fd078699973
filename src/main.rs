//! tarbuild CLI - reproducible tar archives from a Tarfile

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use tarbuild::ops::{assemble, build, ls};
use tarbuild::{write_output, Compression, Config, Digest};

#[derive(Parser)]
#[command(name = "tarbuild")]
#[command(about = "build reproducible tar archives from a Tarfile")]
#[command(version)]
struct Cli {
    /// config file (toml)
    #[arg(short, long, global = true, env = "TARBUILD_CONFIG")]
    config: Option<PathBuf>,

    /// increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// make a new tar archive
    Build {
        /// the context directory for the build
        #[arg(default_value = ".")]
        context: PathBuf,

        /// Tarfile location (default: <context>/Tarfile)
        #[arg(short, long, value_name = "FILE")]
        tarfile: Option<PathBuf>,

        /// path to the output archive, `-` for stdout
        #[arg(short, long, value_name = "FILE", default_value = "-")]
        output: PathBuf,

        /// zstd-compress the archive
        #[arg(long)]
        zstd: bool,

        /// print the sha256 of the output to stderr
        #[arg(long)]
        digest: bool,
    },

    /// list the entries a build would produce
    Ls {
        /// the context directory for the build
        #[arg(default_value = ".")]
        context: PathBuf,

        /// Tarfile location (default: <context>/Tarfile)
        #[arg(short, long, value_name = "FILE")]
        tarfile: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("error: {}", e);
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> tarbuild::Result<()> {
    let mut config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };

    match cli.command {
        Commands::Build {
            context,
            tarfile,
            output,
            zstd,
            digest,
        } => {
            if zstd {
                config.compression = Compression::Zstd;
            }
            let tarfile = tarfile_path(&context, tarfile, &config);
            let data = build(&context, &tarfile, &config)?;
            write_output(&output, &data)?;

            if digest {
                eprintln!("{}", Digest::of(&data));
            }
        }

        Commands::Ls { context, tarfile } => {
            let tarfile = tarfile_path(&context, tarfile, &config);
            let tree = assemble(&context, &tarfile, &config)?;
            for entry in ls(&tree)? {
                println!("{}", entry);
            }
        }
    }

    Ok(())
}

fn tarfile_path(context: &Path, tarfile: Option<PathBuf>, config: &Config) -> PathBuf {
    tarfile.unwrap_or_else(|| context.join(&config.tarfile))
}
