//! The aggregation engine: one pass over the trip records per time period, accumulating weighted
//! origin-destination flows into that period's matrices and parked vehicles into the run-wide
//! facility counters.

use anyhow::{Context, Result};

use crate::config::Config;
use crate::counters::FacilityCounters;
use crate::geography::Geography;
use crate::matrix::MatrixSet;
use crate::modes::{ModeGroup, ModeTable};
use crate::occupancy::OccupancyTable;
use crate::periods::TimePeriod;
use crate::records::{self, TripRecord};
use crate::sink::MatrixSink;
use crate::vot::VotBinner;
use crate::writer;

/// Owns the run-lifetime state (facility counters, skip counts) and accumulates one period at a
/// time. The matrices themselves live only as long as their period.
pub struct Aggregator<'a> {
    modes: &'a ModeTable,
    geography: &'a Geography,
    occupancy: &'a OccupancyTable,
    vot: VotBinner,
    sample_rate: f32,
    counters: FacilityCounters,
    skipped: usize,
}

impl<'a> Aggregator<'a> {
    pub fn new(
        modes: &'a ModeTable,
        geography: &'a Geography,
        occupancy: &'a OccupancyTable,
        vot: VotBinner,
        sample_rate: f32,
    ) -> Aggregator<'a> {
        Aggregator {
            modes,
            geography,
            occupancy,
            vot,
            sample_rate,
            counters: FacilityCounters::new(
                geography.max_location(),
                geography.max_access_point(),
            ),
            skipped: 0,
        }
    }

    /// Builds one period's matrices from both trip collections: first every individual trip,
    /// then every joint-tour trip.
    pub fn build_period(
        &mut self,
        period: TimePeriod,
        individual: &[TripRecord],
        joint: &[TripRecord],
    ) -> Result<MatrixSet> {
        let mut matrices = MatrixSet::new(period, self.modes, self.geography);
        self.process_trips(period, individual, false, &mut matrices)?;
        self.process_trips(period, joint, true, &mut matrices)?;
        for group in ModeGroup::all() {
            info!(
                "Period {}: {:.1} {} trips",
                period.label(),
                matrices.group_sum(group),
                group.describe()
            );
        }
        Ok(matrices)
    }

    /// Accumulates every record of one collection that departs in the given period. `joint`
    /// marks the joint-tour collection, whose records each stand for a whole traveling party.
    pub fn process_trips(
        &mut self,
        period: TimePeriod,
        trips: &[TripRecord],
        joint: bool,
        matrices: &mut MatrixSet,
    ) -> Result<()> {
        for (idx, trip) in trips.iter().enumerate() {
            if TimePeriod::containing(trip.depart_period) != period {
                continue;
            }
            self.accumulate(period, trip, joint, matrices).with_context(|| {
                format!(
                    "{} trip record {} (period {})",
                    if joint { "joint" } else { "individual" },
                    idx,
                    period.label()
                )
            })?;
        }
        Ok(())
    }

    fn accumulate(
        &mut self,
        period: TimePeriod,
        trip: &TripRecord,
        joint: bool,
        matrices: &mut MatrixSet,
    ) -> Result<()> {
        // A code outside the table means the trip files and the mode configuration disagree
        // about the code space. Nothing downstream would be trustworthy, so give up.
        let entry = self
            .modes
            .classify(trip.mode)
            .ok_or_else(|| anyhow!("mode code {} is outside the classification table", trip.mode))?;

        let person = if joint {
            let participants = trip
                .participants
                .ok_or_else(|| anyhow!("joint trip record has no participants field"))?;
            if participants == 0 {
                bail!("joint trip record has a party size of 0");
            }
            participants as f32
        } else {
            1.0
        };

        // An individual shared-ride record is one person in a vehicle that the other occupants'
        // records also describe, so it counts as a fraction of a vehicle. A joint record already
        // stands for the whole realized party.
        let mut vehicle = person;
        if !joint && entry.hov2 {
            vehicle = 0.5;
        } else if !joint && entry.hov3 {
            vehicle = 1.0 / self.occupancy.lookup(&trip.purpose)?;
        }

        // Expand the simulated sample to the full population
        let person = person / self.sample_rate;
        let vehicle = vehicle / self.sample_rate;

        let bin = if entry.group.vot_bins() > 1 {
            self.vot.bin(trip.value_of_time)
        } else {
            0
        };

        match entry.group {
            ModeGroup::Auto => {
                let origin = self.geography.zone_of_location(trip.origin)?;
                let mut destination = self.geography.zone_of_location(trip.destination)?;
                if trip.parking > 0 {
                    // The vehicle actually ends up at the parking location, not the trip
                    // destination
                    destination = self.geography.zone_of_location(trip.parking)?;
                    self.counters.add_parked(trip.parking, period, vehicle);
                }
                matrices
                    .get_mut(ModeGroup::Auto, bin, entry.sub_mode)
                    .add(origin, destination, vehicle)?;
            }
            ModeGroup::NonMotorized | ModeGroup::Other => {
                let origin = self.geography.zone_of_location(trip.origin)?;
                let destination = self.geography.zone_of_location(trip.destination)?;
                matrices
                    .get_mut(entry.group, bin, entry.sub_mode)
                    .add(origin, destination, person)?;
            }
            ModeGroup::Transit => {
                if trip.board_access == 0 || trip.alight_access == 0 {
                    self.skipped += 1;
                    warn!(
                        "Skipping a {} transit trip with no usable access points (board {}, alight {})",
                        entry.name, trip.board_access, trip.alight_access
                    );
                    return Ok(());
                }
                matrices
                    .get_mut(ModeGroup::Transit, bin, entry.sub_mode)
                    .add(trip.board_access, trip.alight_access, person)?;

                // Drive-access trips also put a vehicle on the road between the lot and the
                // non-transit trip end. That leg lands in the base auto matrix.
                if entry.drive_transit {
                    if trip.outbound() {
                        let origin = self.geography.zone_of_location(trip.origin)?;
                        let lot_zone = self.geography.zone_of_access_point(trip.board_access)?;
                        matrices
                            .get_mut(ModeGroup::Auto, 0, 0)
                            .add(origin, lot_zone, vehicle)?;
                        self.counters
                            .add_parked_at_access_point(trip.board_access, period, vehicle);
                    } else {
                        // Egress leg: the vehicle leaves the lot, so nothing new parks there
                        let lot_zone = self.geography.zone_of_access_point(trip.alight_access)?;
                        let destination = self.geography.zone_of_location(trip.destination)?;
                        matrices
                            .get_mut(ModeGroup::Auto, 0, 0)
                            .add(lot_zone, destination, vehicle)?;
                    }
                }
            }
        }
        Ok(())
    }

    /// How many malformed transit records were skipped so far.
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    pub fn counters(&self) -> &FacilityCounters {
        &self.counters
    }
}

/// The whole pipeline: load the reference tables and trip lists named by the config, aggregate
/// period by period, hand each period's matrices to the sink, then write the facility reports.
pub fn generate(config: &Config, sink: &mut dyn MatrixSink) -> Result<()> {
    config.validate()?;

    let modes = ModeTable::new(&config.modes)?;
    let geography = Geography::load(&config.locations, &config.access_points)?;
    let occupancy = OccupancyTable::new(&config.occupancy)?;
    let vot = VotBinner::new(config.vot_threshold_low, config.vot_threshold_med)?;

    let individual = records::read_trips(&config.individual_trips)?;
    let joint = records::read_trips(&config.joint_trips)?;

    let mut aggregator = Aggregator::new(&modes, &geography, &occupancy, vot, config.sample_rate);

    // One period at a time, so peak memory is one period's matrices
    for period in TimePeriod::all() {
        info!("Aggregating trips for period {}", period.label());
        let matrices = aggregator.build_period(period, &individual, &joint)?;
        writer::write_period(&matrices, config, sink)?;
    }

    fs_err::create_dir_all(&config.output_dir)?;
    let location_report = std::path::Path::new(&config.output_dir).join(&config.location_report);
    aggregator
        .counters()
        .write_location_report(fs_err::File::create(&location_report)?)?;
    let access_point_report =
        std::path::Path::new(&config.output_dir).join(&config.access_point_report);
    aggregator
        .counters()
        .write_access_point_report(fs_err::File::create(&access_point_report)?)?;

    if aggregator.skipped() > 0 {
        info!(
            "Skipped {} transit records with no boarding or alighting access point",
            aggregator.skipped()
        );
    }
    Ok(())
}
