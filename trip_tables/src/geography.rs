//! Read-only geographic reference data: which zone contains each location, and the set of
//! transit access points with their containing zones. Everything else in the pipeline treats
//! zones, locations, and access points as opaque ids.

use std::collections::BTreeMap;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct LocationRow {
    pub location: usize,
    pub zone: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AccessPointRow {
    pub access_point: usize,
    pub zone: usize,
}

pub struct Geography {
    // Indexed by location id; 0 means the location isn't in the table
    zone_of_location: Vec<usize>,
    max_zone: usize,
    // Sorted; these ids label the rows/columns of transit matrices
    access_points: Vec<usize>,
    zone_of_access_point: BTreeMap<usize, usize>,
}

impl Geography {
    pub fn new(
        locations: Vec<LocationRow>,
        access_points: Vec<AccessPointRow>,
    ) -> Result<Geography> {
        let max_location = locations.iter().map(|row| row.location).max().unwrap_or(0);
        let mut zone_of_location = vec![0; max_location + 1];
        let mut max_zone = 0;
        for row in locations {
            if row.location == 0 || row.zone == 0 {
                bail!("the locations table has a 0 id: {:?}", row);
            }
            if zone_of_location[row.location] != 0 {
                bail!("location {} appears twice in the locations table", row.location);
            }
            zone_of_location[row.location] = row.zone;
            max_zone = max_zone.max(row.zone);
        }

        let mut zone_of_access_point = BTreeMap::new();
        for row in access_points {
            if row.access_point == 0 || row.zone == 0 {
                bail!("the access-point table has a 0 id: {:?}", row);
            }
            if zone_of_access_point.insert(row.access_point, row.zone).is_some() {
                bail!(
                    "access point {} appears twice in the access-point table",
                    row.access_point
                );
            }
            max_zone = max_zone.max(row.zone);
        }
        let access_points = zone_of_access_point.keys().cloned().collect();

        Ok(Geography {
            zone_of_location,
            max_zone,
            access_points,
            zone_of_access_point,
        })
    }

    pub fn load(locations_path: &str, access_points_path: &str) -> Result<Geography> {
        let locations = read_rows::<LocationRow>(locations_path)?;
        let access_points = read_rows::<AccessPointRow>(access_points_path)?;
        info!(
            "{} locations in {} zones, {} access points",
            locations.len(),
            locations.iter().map(|row| row.zone).max().unwrap_or(0),
            access_points.len()
        );
        Geography::new(locations, access_points)
    }

    /// The zone-id space is 1..=max_zone; matrices for every non-transit group are dimensioned by
    /// it.
    pub fn max_zone(&self) -> usize {
        self.max_zone
    }

    pub fn max_location(&self) -> usize {
        self.zone_of_location.len().saturating_sub(1)
    }

    pub fn zone_of_location(&self, location: usize) -> Result<usize> {
        match self.zone_of_location.get(location) {
            Some(&zone) if zone != 0 => Ok(zone),
            _ => bail!("location {} is not in the locations table", location),
        }
    }

    /// All valid access-point ids, sorted. These label transit matrices.
    pub fn access_points(&self) -> &[usize] {
        &self.access_points
    }

    pub fn max_access_point(&self) -> usize {
        self.access_points.last().cloned().unwrap_or(0)
    }

    pub fn zone_of_access_point(&self, access_point: usize) -> Result<usize> {
        self.zone_of_access_point
            .get(&access_point)
            .cloned()
            .ok_or_else(|| anyhow!("access point {} is not in the access-point table", access_point))
    }
}

fn read_rows<T: serde::de::DeserializeOwned>(path: &str) -> Result<Vec<T>> {
    let mut rows = Vec::new();
    for rec in csv::Reader::from_reader(fs_err::File::open(path)?).deserialize() {
        rows.push(rec.with_context(|| format!("Bad row in {}", path))?);
    }
    Ok(rows)
}
