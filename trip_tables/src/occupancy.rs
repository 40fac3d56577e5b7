//! Average vehicle occupancies for three-plus-occupant auto trips, by tour purpose. Used to
//! deflate individual person trips into vehicle trips.

use std::collections::BTreeMap;

use anyhow::Result;

pub struct OccupancyTable {
    by_purpose: BTreeMap<String, f32>,
}

impl OccupancyTable {
    pub fn new(occupancies: &BTreeMap<String, f32>) -> Result<OccupancyTable> {
        let mut by_purpose = BTreeMap::new();
        for (purpose, &occ) in occupancies {
            if occ <= 1.0 {
                bail!(
                    "average occupancy for purpose {} is {}; a three-plus-occupant vehicle must average above 1",
                    purpose,
                    occ
                );
            }
            by_purpose.insert(normalize(purpose), occ);
        }
        Ok(OccupancyTable { by_purpose })
    }

    /// Looks up the occupancy for a purpose label as it appears in the trip data. Purposes
    /// missing from the table are a configuration error, never silently defaulted.
    pub fn lookup(&self, purpose: &str) -> Result<f32> {
        self.by_purpose
            .get(&normalize(purpose))
            .copied()
            .ok_or_else(|| anyhow!("no average occupancy configured for purpose {}", purpose))
    }
}

// Trip files write purposes like "Work-Based" or "Eating Out"; the table is keyed without the
// punctuation.
fn normalize(label: &str) -> String {
    label.replace(' ', "").replace('-', "")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_normalization() {
        let mut occ = BTreeMap::new();
        occ.insert("EatingOut".to_string(), 3.5);
        occ.insert("Work-Based".to_string(), 3.2);
        let table = OccupancyTable::new(&occ).unwrap();

        assert_eq!(table.lookup("Eating Out").unwrap(), 3.5);
        assert_eq!(table.lookup("WorkBased").unwrap(), 3.2);
        assert!(table.lookup("Escort").is_err());
    }

    #[test]
    fn rejects_deflating_occupancy() {
        let mut occ = BTreeMap::new();
        occ.insert("Work".to_string(), 1.0);
        assert!(OccupancyTable::new(&occ).is_err());
    }
}
