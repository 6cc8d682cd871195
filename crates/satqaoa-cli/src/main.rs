//! satqaoa command-line interface.
//!
//! ```text
//! satqaoa generate --vars 5 --seed 1 -o formula.cnf
//! satqaoa circuit  -i formula.cnf --variant grover-mixer --layers 2
//! satqaoa run      -i formula.cnf --variant standard --layers 2 --shots 1024
//! satqaoa sweep    --config sweep.yaml --output-dir results
//! satqaoa summarize results/*.json.gz
//! ```

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use clap::{Parser, Subcommand, ValueEnum};
use console::style;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use satqaoa_algo::{OracleSynthesis, QaoaVariant};

mod commands;

use commands::{circuit, generate, run, summarize, sweep};

/// QAOA with bitflip-oracle phase separators for random 3SAT
#[derive(Parser)]
#[command(name = "satqaoa")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Output format for machine-readable commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a random 3SAT formula in DIMACS format
    Generate {
        /// Number of variables
        #[arg(long)]
        vars: u32,

        /// Number of clauses (defaults to round(ratio * vars))
        #[arg(long)]
        clauses: Option<usize>,

        /// Clauses per variable when --clauses is omitted
        #[arg(long, default_value = "4.26")]
        ratio: f64,

        /// Literals per clause
        #[arg(short, long, default_value = "3")]
        k: u32,

        /// RNG seed
        #[arg(short, long, default_value = "42")]
        seed: u64,

        /// Redraw until the formula is satisfiable
        #[arg(long)]
        satisfiable: bool,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Build a QAOA circuit for a formula and print its statistics
    Circuit {
        /// Input DIMACS file
        #[arg(short, long)]
        input: PathBuf,

        /// QAOA variant (standard, grover-phase, grover-mixer)
        #[arg(long, default_value = "standard")]
        variant: QaoaVariant,

        /// Number of layers
        #[arg(short = 'p', long, default_value = "1")]
        layers: usize,

        /// Oracle synthesis (fprm, pprm, minterm, clause-ancilla)
        #[arg(long, default_value = "fprm")]
        synthesis: OracleSynthesis,

        /// Write the circuit as JSON
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Optimize one QAOA circuit on the simulator
    Run {
        /// Input DIMACS file
        #[arg(short, long)]
        input: PathBuf,

        /// QAOA variant (standard, grover-phase, grover-mixer)
        #[arg(long, default_value = "standard")]
        variant: QaoaVariant,

        /// Number of layers
        #[arg(short = 'p', long, default_value = "1")]
        layers: usize,

        /// Shots per evaluation
        #[arg(short, long, default_value = "1024")]
        shots: u32,

        /// RNG seed for shots, initial parameters and the optimizer
        #[arg(long, default_value = "42")]
        seed: u64,

        /// Optimizer (cobyla, spsa)
        #[arg(long, default_value = "cobyla")]
        optimizer: String,

        /// Optimizer iteration budget
        #[arg(long, default_value = "100")]
        maxiter: usize,

        /// Oracle synthesis (fprm, pprm, minterm, clause-ancilla)
        #[arg(long, default_value = "fprm")]
        synthesis: OracleSynthesis,

        /// Number of top outcomes to show
        #[arg(long, default_value = "8")]
        top: usize,

        /// Output format (table, json)
        #[arg(short, long, value_enum, default_value = "table")]
        format: OutputFormat,
    },

    /// Run the experiment suite, one archive per variant
    Sweep {
        /// YAML config (defaults to ~/.satqaoa/config.yaml, then built-in defaults)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Override the output directory
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// Override the base seed
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Summarize experiment archives
    Summarize {
        /// Archive files (<variant>.json.gz)
        #[arg(required = true)]
        archives: Vec<PathBuf>,

        /// Output format (table, json)
        #[arg(short, long, value_enum, default_value = "table")]
        format: OutputFormat,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    // Execute command
    let result = match cli.command {
        Commands::Generate {
            vars,
            clauses,
            ratio,
            k,
            seed,
            satisfiable,
            output,
        } => generate::execute(vars, clauses, ratio, k, seed, satisfiable, output.as_deref()),

        Commands::Circuit {
            input,
            variant,
            layers,
            synthesis,
            output,
        } => circuit::execute(&input, variant, layers, synthesis, output.as_deref()),

        Commands::Run {
            input,
            variant,
            layers,
            shots,
            seed,
            optimizer,
            maxiter,
            synthesis,
            top,
            format,
        } => run::execute(&run::RunArgs {
            input,
            variant,
            layers,
            shots,
            seed,
            optimizer,
            maxiter,
            synthesis,
            top,
            format,
        }),

        Commands::Sweep {
            config,
            output_dir,
            seed,
        } => sweep::execute(config.as_deref(), output_dir, seed),

        Commands::Summarize { archives, format } => summarize::execute(&archives, format),
    };

    // Handle errors
    if let Err(e) = result {
        eprintln!("{} {:#}", style("Error:").red().bold(), e);
        std::process::exit(1);
    }

    Ok(())
}
