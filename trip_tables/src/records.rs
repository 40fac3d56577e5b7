//! Reading and writing the disaggregate trip lists. Two files per model run: one record per
//! person-trip in the individual file, one record per joint-tour-trip (a whole traveling party)
//! in the joint file.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// A single trip, as written by the upstream choice models. Field names match the CSV headers.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TripRecord {
    /// Half-hour departure-time code, 1-based.
    pub depart_period: usize,
    /// Origin location id (finer than a zone).
    pub origin: usize,
    /// Destination location id.
    pub destination: usize,
    /// Detailed mode code.
    pub mode: usize,
    /// 0 for the outbound half of the tour, 1 for the inbound half.
    pub inbound: usize,
    /// Boarding access point; 0 unless this is a transit trip.
    pub board_access: usize,
    /// Alighting access point; 0 unless this is a transit trip.
    pub alight_access: usize,
    /// Parking location id; 0 when the vehicle parks at the destination itself.
    pub parking: usize,
    /// Tour purpose label, e.g. "Work" or "Eating Out".
    pub purpose: String,
    /// Party size; only present in the joint file.
    #[serde(default)]
    pub participants: Option<usize>,
    /// The traveler's value of time, non-negative.
    pub value_of_time: f32,
}

impl TripRecord {
    pub fn outbound(&self) -> bool {
        self.inbound == 0
    }
}

pub fn read_trips(path: &str) -> Result<Vec<TripRecord>> {
    info!("Reading trip records from {}", path);
    let mut trips = Vec::new();
    for rec in csv::Reader::from_reader(fs_err::File::open(path)?).deserialize() {
        let rec: TripRecord = rec.with_context(|| format!("Bad trip record in {}", path))?;
        trips.push(rec);
    }
    info!("Read {} trip records", trips.len());
    Ok(trips)
}

pub fn write_trips(path: &str, trips: &[TripRecord]) -> Result<()> {
    let mut out = csv::Writer::from_writer(fs_err::File::create(path)?);
    for trip in trips {
        out.serialize(trip)?;
    }
    out.flush()?;
    Ok(())
}

/// Appends a feedback-iteration number to a trip file's stem: `trips.csv` with iteration 2
/// becomes `trips_2.csv`.
pub fn iteration_path(path: &str, iteration: usize) -> String {
    match path.rfind('.') {
        Some(idx) => format!("{}_{}{}", &path[..idx], iteration, &path[idx..]),
        None => format!("{}_{}", path, iteration),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn iteration_suffix() {
        assert_eq!(iteration_path("out/trips.csv", 3), "out/trips_3.csv");
        assert_eq!(iteration_path("trips", 1), "trips_1");
    }

    #[test]
    fn parse_with_and_without_participants() {
        let individual = "\
depart_period,origin,destination,mode,inbound,board_access,alight_access,parking,purpose,value_of_time
5,10,20,1,0,0,0,0,Work,12.5
";
        let trips: Vec<TripRecord> = csv::Reader::from_reader(individual.as_bytes())
            .deserialize()
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(trips.len(), 1);
        assert_eq!(trips[0].mode, 1);
        assert_eq!(trips[0].participants, None);
        assert!(trips[0].outbound());

        let joint = "\
depart_period,origin,destination,mode,inbound,board_access,alight_access,parking,purpose,participants,value_of_time
23,10,20,6,1,0,0,0,Shop,3,8.0
";
        let trips: Vec<TripRecord> = csv::Reader::from_reader(joint.as_bytes())
            .deserialize()
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(trips[0].participants, Some(3));
        assert!(!trips[0].outbound());
    }
}
