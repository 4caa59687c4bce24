use std::fs::File;
use std::io::{self, BufWriter};
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use pcenter_model::{Assembler, Instance};
use tracing::info;

mod input;

#[derive(Parser)]
#[command(name = "pcenter")]
#[command(about = "Write capacitated p-center facility location models as LP files", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log every constraint block
    #[arg(short, long, global = true)]
    debug: bool,
}

#[derive(clap::Args)]
struct InstanceArgs {
    /// JSON instance with cost, demand, capacity and p
    #[arg(long, conflicts_with_all = ["costs", "demand", "capacity", "facilities"])]
    instance: Option<PathBuf>,
    /// Row-major cost values, one per line
    #[arg(long, required_unless_present = "instance", requires_all = ["demand", "capacity", "facilities"])]
    costs: Option<PathBuf>,
    /// Demand at each client, one per line
    #[arg(long)]
    demand: Option<PathBuf>,
    /// Capacity at each facility site, one per line
    #[arg(long)]
    capacity: Option<PathBuf>,
    /// Maximum number of facilities to site
    #[arg(short = 'p', long = "facilities")]
    facilities: Option<usize>,
}

#[derive(Subcommand)]
enum Commands {
    /// Write the LP model for an instance
    Generate {
        #[command(flatten)]
        input: InstanceArgs,
        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Omit the title comment
        #[arg(long)]
        no_title: bool,
    },
    /// Recover n and p from an LP model file
    Inspect {
        /// The LP file
        file: PathBuf,
    },
    /// Validate instance data without writing a model
    Check {
        #[command(flatten)]
        input: InstanceArgs,
    },
}

fn main() {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_max_level(if cli.debug {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .init();

    match cli.command {
        Commands::Generate {
            input,
            output,
            no_title,
        } => {
            let instance = load_or_exit(&input);
            let mut assembler = Assembler::new(&instance);
            if no_title {
                assembler = assembler.with_title(None);
            }

            let result = match &output {
                Some(path) => match File::create(path) {
                    Ok(file) => assembler.write_to(BufWriter::new(file)),
                    Err(e) => {
                        eprintln!("Error creating {}: {}", path.display(), e);
                        std::process::exit(1);
                    }
                },
                None => assembler.write_to(BufWriter::new(io::stdout().lock())),
            };

            match result {
                Ok(stats) => {
                    if let Some(path) = &output {
                        info!(
                            path = %path.display(),
                            constraints = stats.constraints,
                            "model saved"
                        );
                    }
                }
                Err(e) => {
                    eprintln!("Generate error: {}", e);
                    std::process::exit(1);
                }
            }
        }
        Commands::Inspect { file } => {
            let source = match std::fs::read_to_string(&file) {
                Ok(s) => s,
                Err(e) => {
                    eprintln!("Error reading file: {}", e);
                    std::process::exit(1);
                }
            };

            match pcenter_model::inspect_lp(&source) {
                Ok(stats) => {
                    println!("✓ {} is a p-center model", file.display());
                    println!("  n = {}", stats.n);
                    println!("  p = {}", stats.p);
                    println!("  {} constraints", stats.constraints);
                    println!(
                        "  {} bounds ({} assignment, {} facility)",
                        stats.assignment_bounds + stats.facility_bounds,
                        stats.assignment_bounds,
                        stats.facility_bounds
                    );
                    println!(
                        "  {} binaries ({} assignment, {} facility)",
                        stats.assignment_binaries + stats.facility_binaries,
                        stats.assignment_binaries,
                        stats.facility_binaries
                    );
                }
                Err(e) => {
                    eprintln!("✗ {}:", file.display());
                    eprintln!("  {}", e);
                    std::process::exit(1);
                }
            }
        }
        Commands::Check { input } => {
            let instance = load_or_exit(&input);
            let zero_capacity = instance.capacity().iter().filter(|&&c| c == 0.0).count();
            let zero_demand = instance.demand().iter().filter(|&&d| d == 0.0).count();

            println!("✓ instance is valid");
            println!("  {} nodes", instance.n());
            println!("  p = {}", instance.p());
            println!("  {} sites with zero capacity", zero_capacity);
            if zero_demand > 0 && zero_capacity > 0 {
                println!(
                    "  warning: {} clients have zero demand and may be assigned to zero-capacity sites",
                    zero_demand
                );
            }
        }
    }
}

fn load_or_exit(args: &InstanceArgs) -> Instance {
    let loaded = match (&args.instance, &args.costs, &args.demand, &args.capacity, args.facilities) {
        (Some(path), ..) => input::load_json(path),
        (None, Some(costs), Some(demand), Some(capacity), Some(p)) => {
            input::load_vectors(costs, demand, capacity, p)
        }
        _ => {
            eprintln!("Error: pass --instance, or --costs, --demand, --capacity and -p");
            std::process::exit(1);
        }
    };
    match loaded {
        Ok(instance) => {
            info!(n = instance.n(), p = instance.p(), "instance loaded");
            instance
        }
        Err(e) => {
            eprintln!("Input error: {}", e);
            std::process::exit(1);
        }
    }
}
