mod tables;

use std::fs;
use std::io::Write;
use std::path::PathBuf;

use clap::Parser;
use env_logger::{Builder, Target};
use log::LevelFilter;
use windblade_calc::{
    BladeDesign, PolarSurface, ProjectionMode, RotorConstants, RotorState, StationReport,
};

#[derive(Parser)]
#[command(name = "windblade")]
#[command(version)]
#[command(about = "BEM blade design for small horizontal-axis wind turbines", long_about = None)]
struct Cli {
    /// Polar table CSV (Re, alpha, cl, cd, eta)
    #[arg(short = 'p', long, default_value = "dataS822.csv")]
    polar: PathBuf,

    /// Airfoil shape CSV (x, y), unit chord
    #[arg(short = 's', long, default_value = "shapeS822.csv")]
    shape: PathBuf,

    /// Rotor constants as JSON; missing fields keep the S822 preset
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,

    /// Directory for the coordinate CSV files
    #[arg(short = 'o', long, default_value = "output")]
    output: PathBuf,

    /// Number of BEM sweeps
    #[arg(short = 'n', long)]
    iterations: Option<usize>,

    /// Place flat sections at z = r instead of wrapping them onto cylinders
    #[arg(long)]
    planar: bool,

    /// Factor applied to the exported coordinates (100 = centimetres)
    #[arg(long)]
    unit_scale: Option<f64>,

    /// Log level (error, warn, info, debug, trace); falls back to RUST_LOG
    #[arg(long)]
    log_level: Option<String>,

    /// Also write the full design report as JSON
    #[arg(long)]
    report: Option<PathBuf>,
}

fn init_logging(level: Option<&str>) {
    let log_level = level
        .and_then(|l| l.parse::<LevelFilter>().ok())
        .or_else(|| {
            std::env::var("RUST_LOG")
                .ok()
                .and_then(|v| v.parse::<LevelFilter>().ok())
        })
        .unwrap_or(LevelFilter::Info);

    Builder::new()
        .filter_level(log_level)
        .target(Target::Stdout)
        .format(|buf, record| writeln!(buf, "[{:5}] {}", record.level(), record.args()))
        .init();
}

fn load_constants(cli: &Cli) -> Result<RotorConstants, Box<dyn std::error::Error>> {
    let mut constants = match &cli.config {
        Some(path) => {
            let text = fs::read_to_string(path)?;
            serde_json::from_str::<RotorConstants>(&text)?
        }
        None => RotorConstants::small_s822(),
    };

    if let Some(n) = cli.iterations {
        constants.iterations = n;
    }
    if cli.planar {
        constants.projection.mode = ProjectionMode::Planar;
    }
    if let Some(scale) = cli.unit_scale {
        constants.projection.unit_scale = scale;
    }

    constants.validate()?;
    Ok(constants)
}

fn log_station_table(sweep: usize, state: &RotorState) {
    log::info!("sweep {}", sweep);
    log::info!(
        "{:<10} {:<10} {:<10} {:<10} {:<10} {:<10} {:<10} {:<10} {:<10} {:<10} {:<10} {:<10} {:<10} {:<10}",
        "r", "w", "phi", "Re", "alpha", "cd", "cl", "chord", "cx", "cy", "a", "a1", "DeltaCp", "Twist"
    );
    for row in state.sections().iter().filter_map(StationReport::from_section) {
        log::info!(
            "{:<10.2} {:<10.2} {:<10.2} {:<10.0} {:<10.2} {:<10.2} {:<10.2} {:<10.3} {:<10.2} {:<10.2} {:<10.2} {:<10.2} {:<10.3} {:<10.3}",
            row.r,
            row.w,
            row.phi.to_degrees(),
            row.re,
            row.alpha,
            row.cd,
            row.cl,
            row.chord,
            row.cx,
            row.cy,
            row.a,
            row.a1,
            row.delta_cp,
            row.twist.to_degrees()
        );
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.log_level.as_deref());

    let constants = load_constants(&cli)?;
    for (key, value) in constants.summary() {
        log::debug!("{} = {}", key, value);
    }
    log::info!("Turbine rated speed: {:.2} rpm", constants.rated_rpm());

    let samples = tables::read_polar(&cli.polar)?;
    let shape = tables::read_shape(&cli.shape)?;
    let polar = PolarSurface::build(&samples)?;
    let bounds = polar.bounds();
    log::info!(
        "polar coverage: Re [{:.0}, {:.0}], alpha [{:.2}, {:.2}] deg, {} nodes",
        bounds.re_min,
        bounds.re_max,
        bounds.alpha_min,
        bounds.alpha_max,
        polar.len()
    );
    if bounds.alpha_min > constants.solver.alpha_min || bounds.alpha_max < constants.solver.alpha_max {
        log::warn!(
            "alpha search window [{}, {}] extends beyond the polar data",
            constants.solver.alpha_min,
            constants.solver.alpha_max
        );
    }

    let report = BladeDesign::new(&constants, &polar).run_with(&shape, log_station_table)?;
    log::info!("Turbine Cp: {:.4}", report.cp_total);
    if let Some(last) = report.residuals.last() {
        log::info!("last sweep changed the state by at most {:.3e}", last.max());
    }

    let written = tables::write_profiles(&cli.output, &report.profiles)?;
    log::info!("{} coordinate files written to {}", written, cli.output.display());

    if let Some(path) = &cli.report {
        fs::write(path, report.to_json()?)?;
        log::info!("design report written to {}", path.display());
    }

    Ok(())
}
