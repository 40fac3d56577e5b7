//! Run-lifetime counts of vehicle-equivalents parked at constrained locations and at
//! drive-access boarding points. Unlike matrices, these accumulate across every period and are
//! only read at the very end, for the facility reports.

use std::io::Write;

use anyhow::Result;

use crate::periods::TimePeriod;

pub struct FacilityCounters {
    // Indexed by raw location / access-point id; most rows stay all-zero
    parked_at_location: Vec<[f32; TimePeriod::COUNT]>,
    parked_at_access_point: Vec<[f32; TimePeriod::COUNT]>,
}

impl FacilityCounters {
    pub fn new(max_location: usize, max_access_point: usize) -> FacilityCounters {
        FacilityCounters {
            parked_at_location: vec![[0.0; TimePeriod::COUNT]; max_location + 1],
            parked_at_access_point: vec![[0.0; TimePeriod::COUNT]; max_access_point + 1],
        }
    }

    pub fn add_parked(&mut self, location: usize, period: TimePeriod, weight: f32) {
        self.parked_at_location[location][period.index()] += weight;
    }

    pub fn add_parked_at_access_point(
        &mut self,
        access_point: usize,
        period: TimePeriod,
        weight: f32,
    ) {
        self.parked_at_access_point[access_point][period.index()] += weight;
    }

    pub fn parked(&self, location: usize, period: TimePeriod) -> f32 {
        self.parked_at_location[location][period.index()]
    }

    pub fn parked_at_access_point(&self, access_point: usize, period: TimePeriod) -> f32 {
        self.parked_at_access_point[access_point][period.index()]
    }

    /// Writes the parked-vehicles-by-location table: one row per location with any usage, one
    /// column per period plus a total.
    pub fn write_location_report<W: Write>(&self, out: W) -> Result<()> {
        write_report("location", &self.parked_at_location, out)
    }

    pub fn write_access_point_report<W: Write>(&self, out: W) -> Result<()> {
        write_report("access_point", &self.parked_at_access_point, out)
    }
}

fn write_report<W: Write>(
    id_column: &str,
    rows: &[[f32; TimePeriod::COUNT]],
    out: W,
) -> Result<()> {
    let mut writer = csv::Writer::from_writer(out);

    let mut header = vec![id_column.to_string()];
    for period in TimePeriod::all() {
        header.push(period.label().to_string());
    }
    header.push("Total".to_string());
    writer.write_record(&header)?;

    for (id, row) in rows.iter().enumerate() {
        let total: f32 = row.iter().sum();
        // Only facilities that actually got used are interesting downstream
        if total == 0.0 {
            continue;
        }
        let mut record = vec![id.to_string()];
        for value in row {
            record.push(value.to_string());
        }
        record.push(total.to_string());
        writer.write_record(&record)?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_omits_unused_rows() {
        let mut counters = FacilityCounters::new(10, 5);
        counters.add_parked(3, TimePeriod::AmPeak, 1.5);
        counters.add_parked(3, TimePeriod::AmPeak, 1.0);
        counters.add_parked(7, TimePeriod::Evening, 0.5);

        let mut buffer = Vec::new();
        counters.write_location_report(&mut buffer).unwrap();
        let report = String::from_utf8(buffer).unwrap();

        let mut lines = report.lines();
        assert_eq!(lines.next().unwrap(), "location,EA,AM,MD,PM,EV,Total");
        assert_eq!(lines.next().unwrap(), "3,0,2.5,0,0,0,2.5");
        assert_eq!(lines.next().unwrap(), "7,0,0,0,0,0.5,0.5");
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn empty_report_is_just_the_header() {
        let counters = FacilityCounters::new(10, 5);
        let mut buffer = Vec::new();
        counters.write_access_point_report(&mut buffer).unwrap();
        let report = String::from_utf8(buffer).unwrap();
        assert_eq!(report.trim(), "access_point,EA,AM,MD,PM,EV,Total");
    }
}
