//! Crossbar - Memristor Crossbar VMM Simulator
//!
//! Evaluates an analog vector-matrix multiply on a described crossbar.
//!
//! # Usage
//!
//! ```bash
//! crossbar array.xbar --input 0.1,0.2,0.3 --mode lineres --iterations 2
//! crossbar array.xbar --input 0.1,0.2,0.3 --compare
//! ```

use std::path::PathBuf;

use clap::Parser;
use crossbar_core::{config, error::Result, solver::DEFAULT_ITERATIONS, Crossbar, VmmMode};
use nalgebra::DVector;
use tracing_subscriber::EnvFilter;

/// Memristor crossbar vector-matrix multiply simulator
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the crossbar description file
    #[arg(value_name = "CROSSBAR_FILE")]
    crossbar_file: PathBuf,

    /// Applied word-line voltages, one per column (V)
    #[arg(short, long, value_delimiter = ',', allow_hyphen_values = true, required = true)]
    input: Vec<f64>,

    /// Multiply model: ideal, fitted, device or lineres
    #[arg(short, long, default_value = "lineres")]
    mode: String,

    /// Nonlinear refinement iterations for the lineres model
    #[arg(short = 'n', long, default_value_t = DEFAULT_ITERATIONS)]
    iterations: usize,

    /// Print all four models side by side
    #[arg(short, long)]
    compare: bool,

    /// Enable debug logging on stderr
    #[arg(short, long)]
    verbose: bool,
}

fn init_logging(verbose: bool) {
    let default = if verbose { "crossbar_core=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    // Parse and build the crossbar
    let crossbar = config::parse_file(&args.crossbar_file)?.build()?;
    let v = DVector::from_vec(args.input);

    if args.compare {
        print_comparison(&crossbar, &v, args.iterations)?;
        return Ok(());
    }

    let mode = match args.mode.parse()? {
        VmmMode::LineResistance { .. } => VmmMode::LineResistance {
            iterations: args.iterations,
        },
        mode => mode,
    };

    for current in crossbar.vmm(mode, &v)?.iter() {
        println!("{:.6e}", current);
    }

    Ok(())
}

fn print_comparison(crossbar: &Crossbar, v: &DVector<f64>, iterations: usize) -> Result<()> {
    let ideal = crossbar.ideal_vmm(v)?;
    let fitted = crossbar.fitted_vmm(v)?;
    let device = crossbar.device_vmm(v)?;
    let lineres = crossbar.lineres_vmm(v, iterations)?;

    println!(
        "{:>4} {:>14} {:>14} {:>14} {:>14}",
        "row", "ideal", "fitted", "device", "lineres"
    );
    for i in 0..crossbar.rows() {
        println!(
            "{:>4} {:>14.6e} {:>14.6e} {:>14.6e} {:>14.6e}",
            i, ideal[i], fitted[i], device[i], lineres[i]
        );
    }
    Ok(())
}
