//! Generates a synthetic-but-plausible set of trip records, geography tables, and a matching
//! config. Handy for exercising the whole pipeline without real model output.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::Result;
use rand::{Rng, SeedableRng};
use rand_xorshift::XorShiftRng;

use trip_tables::{records, Config, ModePartition, TripRecord};

const ZONES: usize = 25;
const LOCATIONS: usize = 100;
const ACCESS_POINTS: usize = 10;

const PURPOSES: [&str; 5] = ["Work", "School", "Shop", "Eating Out", "Discretionary"];

pub fn run(rng_seed: u64, out_dir: String, num_individual: usize, num_joint: usize) -> Result<()> {
    let mut rng = XorShiftRng::seed_from_u64(rng_seed);
    fs_err::create_dir_all(&out_dir)?;
    let dir = Path::new(&out_dir);
    let modes = ModePartition::default();

    // Every location and access point lands in a uniformly random zone. Not realistic density,
    // but it exercises every lookup.
    let locations_path = dir.join("locations.csv");
    {
        let mut out = csv::Writer::from_writer(fs_err::File::create(&locations_path)?);
        out.write_record(["location", "zone"])?;
        for location in 1..=LOCATIONS {
            let zone = rng.gen_range(1..=ZONES);
            out.write_record([location.to_string(), zone.to_string()])?;
        }
        out.flush()?;
    }

    let access_points_path = dir.join("access_points.csv");
    {
        let mut out = csv::Writer::from_writer(fs_err::File::create(&access_points_path)?);
        out.write_record(["access_point", "zone"])?;
        for access_point in 1..=ACCESS_POINTS {
            let zone = rng.gen_range(1..=ZONES);
            out.write_record([access_point.to_string(), zone.to_string()])?;
        }
        out.flush()?;
    }

    let individual: Vec<TripRecord> = (0..num_individual)
        .map(|_| random_trip(&mut rng, &modes, None))
        .collect();
    let individual_path = dir.join("individual_trips.csv");
    records::write_trips(individual_path.to_str().unwrap(), &individual)?;

    let joint: Vec<TripRecord> = (0..num_joint)
        .map(|_| {
            let party = rng.gen_range(2..=5);
            random_trip(&mut rng, &modes, Some(party))
        })
        .collect();
    let joint_path = dir.join("joint_trips.csv");
    records::write_trips(joint_path.to_str().unwrap(), &joint)?;

    let mut occupancy = BTreeMap::new();
    for purpose in PURPOSES {
        occupancy.insert(purpose.replace(' ', ""), 3.0 + rng.gen_range(0.0..1.0));
    }
    let config = Config {
        sample_rate: 1.0,
        vot_threshold_low: 10.0,
        vot_threshold_med: 25.0,
        occupancy,
        modes,
        individual_trips: individual_path.to_str().unwrap().to_string(),
        joint_trips: joint_path.to_str().unwrap().to_string(),
        locations: locations_path.to_str().unwrap().to_string(),
        access_points: access_points_path.to_str().unwrap().to_string(),
        output_dir: dir.join("matrices").to_str().unwrap().to_string(),
        ..Config::default()
    };
    let config_path = dir.join("config.json");
    fs_err::write(&config_path, serde_json::to_string_pretty(&config)?)?;

    info!(
        "Wrote {} individual and {} joint trips; run make-matrices --config {}",
        num_individual,
        num_joint,
        config_path.display()
    );
    Ok(())
}

fn random_trip(
    rng: &mut XorShiftRng,
    modes: &ModePartition,
    participants: Option<usize>,
) -> TripRecord {
    let mode = rng.gen_range(1..=modes.names.len());
    let transit = modes.walk_transit.contains(&mode) || modes.drive_transit.contains(&mode);
    let auto =
        modes.sov.contains(&mode) || modes.hov2.contains(&mode) || modes.hov3.contains(&mode);

    let (board_access, alight_access) = if transit {
        // A few trips get a missing access point, to exercise the skip path
        if rng.gen_bool(0.02) {
            (0, rng.gen_range(1..=ACCESS_POINTS))
        } else {
            (
                rng.gen_range(1..=ACCESS_POINTS),
                rng.gen_range(1..=ACCESS_POINTS),
            )
        }
    } else {
        (0, 0)
    };

    let parking = if auto && rng.gen_bool(0.1) {
        rng.gen_range(1..=LOCATIONS)
    } else {
        0
    };

    TripRecord {
        depart_period: rng.gen_range(1..=40),
        origin: rng.gen_range(1..=LOCATIONS),
        destination: rng.gen_range(1..=LOCATIONS),
        mode,
        inbound: rng.gen_range(0..=1),
        board_access,
        alight_access,
        parking,
        purpose: PURPOSES[rng.gen_range(0..PURPOSES.len())].to_string(),
        participants,
        value_of_time: rng.gen_range(0.0..50.0),
    }
}
