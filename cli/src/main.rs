//! Tools for building assignment-ready trip matrices from disaggregate travel-model output.
//! These are bundled as a single executable to reduce the cost of static linking in the
//! release's file size.

#[macro_use]
extern crate log;

mod random_trips;

use anyhow::Result;
use structopt::StructOpt;

use trip_tables::{records, Config, FileSink};

#[derive(StructOpt)]
#[structopt(
    name = "trip_tables",
    about = "Builds assignment-ready origin-destination matrices from disaggregate trip records"
)]
enum Command {
    /// Aggregates the individual and joint trip lists into one set of matrices per time period,
    /// then writes the parked-vehicle reports.
    MakeMatrices {
        /// The path to a run configuration JSON file
        #[structopt(long)]
        config: String,
        /// Overrides the configured sample rate, in (0, 1]
        #[structopt(long)]
        sample_rate: Option<f32>,
        /// Feedback iteration whose trip files to read; appended to the trip file stems as
        /// _<iteration>
        #[structopt(long)]
        iteration: Option<usize>,
    },
    /// Generates a matching set of synthetic trip files, geography tables, and a config, so the
    /// pipeline can be exercised without real model output.
    RandomTrips {
        /// A seed for generating random numbers
        #[structopt(long, default_value = "42")]
        rng_seed: u64,
        /// The directory to write everything into
        #[structopt(long)]
        out_dir: String,
        /// How many individual trip records to generate
        #[structopt(long, default_value = "1000")]
        num_individual: usize,
        /// How many joint trip records to generate
        #[structopt(long, default_value = "100")]
        num_joint: usize,
    },
    /// Prints a written matrix file as JSON
    DumpMatrix {
        #[structopt()]
        path: String,
    },
}

fn main() -> Result<()> {
    let cmd = Command::from_args();

    // All but a few commands want logging
    if !matches!(cmd, Command::DumpMatrix { .. }) {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    }

    match cmd {
        Command::MakeMatrices {
            config,
            sample_rate,
            iteration,
        } => make_matrices(config, sample_rate, iteration),
        Command::RandomTrips {
            rng_seed,
            out_dir,
            num_individual,
            num_joint,
        } => random_trips::run(rng_seed, out_dir, num_individual, num_joint),
        Command::DumpMatrix { path } => dump_matrix(path),
    }
}

fn make_matrices(path: String, sample_rate: Option<f32>, iteration: Option<usize>) -> Result<()> {
    let mut config = Config::load(&path)?;
    if let Some(rate) = sample_rate {
        config.sample_rate = rate;
    }
    if let Some(iteration) = iteration {
        config.individual_trips = records::iteration_path(&config.individual_trips, iteration);
        config.joint_trips = records::iteration_path(&config.joint_trips, iteration);
    }

    let mut sink = FileSink::new(&config.output_dir)?;
    trip_tables::generate(&config, &mut sink)
}

fn dump_matrix(path: String) -> Result<()> {
    let file = trip_tables::sink::read_matrix_file(&path)?;
    println!("{}", serde_json::to_string_pretty(&file)?);
    Ok(())
}
