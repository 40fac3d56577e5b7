//! Dense square origin-destination matrices, and the per-period set of them.

use anyhow::Result;

use crate::geography::Geography;
use crate::modes::{ModeGroup, ModeTable, VOT_BIN_NAMES};
use crate::periods::TimePeriod;

/// A square matrix of trip weights whose rows and columns are labeled by external ids (zone ids,
/// or access-point ids for transit). Downstream assignment indexes by these labels, never by raw
/// array position, so the labeling is part of the matrix, not the file format.
#[derive(Clone, Debug, PartialEq)]
pub struct Matrix {
    name: String,
    // Strictly increasing; row/column i holds the flows for ids[i]
    ids: Vec<usize>,
    data: Vec<f32>,
}

impl Matrix {
    pub fn new(name: String, ids: Vec<usize>) -> Matrix {
        debug_assert!(ids.windows(2).all(|pair| pair[0] < pair[1]));
        let n = ids.len();
        Matrix {
            name,
            ids,
            data: vec![0.0; n * n],
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn ids(&self) -> &[usize] {
        &self.ids
    }

    pub fn dim(&self) -> usize {
        self.ids.len()
    }

    /// Row-major cell values.
    pub fn values(&self) -> &[f32] {
        &self.data
    }

    fn offset(&self, id: usize) -> Option<usize> {
        self.ids.binary_search(&id).ok()
    }

    /// Accumulates a weight into the cell for (from, to). Ids outside the external numbering are
    /// an error; the caller decides whether that's fatal.
    pub fn add(&mut self, from: usize, to: usize, weight: f32) -> Result<()> {
        match (self.offset(from), self.offset(to)) {
            (Some(row), Some(col)) => {
                self.data[row * self.ids.len() + col] += weight;
                Ok(())
            }
            _ => bail!(
                "matrix {} has no row/column for ({}, {}); its ids span {}..={}",
                self.name,
                from,
                to,
                self.ids.first().cloned().unwrap_or(0),
                self.ids.last().cloned().unwrap_or(0)
            ),
        }
    }

    pub fn value(&self, from: usize, to: usize) -> f32 {
        match (self.offset(from), self.offset(to)) {
            (Some(row), Some(col)) => self.data[row * self.ids.len() + col],
            _ => 0.0,
        }
    }

    pub fn sum(&self) -> f64 {
        self.data.iter().map(|&x| x as f64).sum()
    }
}

/// All matrices for one time period, indexed by (group, value-of-time bin, sub-mode). Built from
/// scratch at the start of each period and discarded after writing, so only one period's tables
/// are ever in memory.
#[derive(Debug, PartialEq)]
pub struct MatrixSet {
    period: TimePeriod,
    // [group][vot bin][sub-mode]
    tables: Vec<Vec<Vec<Matrix>>>,
}

impl MatrixSet {
    pub fn new(period: TimePeriod, modes: &ModeTable, geography: &Geography) -> MatrixSet {
        let zone_ids: Vec<usize> = (1..=geography.max_zone()).collect();
        let access_point_ids = geography.access_points().to_vec();

        let mut tables = Vec::new();
        for group in ModeGroup::all() {
            let ids = if group == ModeGroup::Transit {
                &access_point_ids
            } else {
                &zone_ids
            };
            let mut bins = Vec::new();
            for bin in 0..group.vot_bins() {
                bins.push(
                    modes
                        .sub_mode_names(group)
                        .iter()
                        .map(|name| {
                            let mut label = format!("{}_{}", name, period.label());
                            // Only segmented groups carry the bin in their label
                            if group.vot_bins() > 1 {
                                label = format!("{}_{}", label, VOT_BIN_NAMES[bin]);
                            }
                            Matrix::new(label, ids.clone())
                        })
                        .collect(),
                );
            }
            tables.push(bins);
        }
        MatrixSet { period, tables }
    }

    pub fn period(&self) -> TimePeriod {
        self.period
    }

    pub fn get(&self, group: ModeGroup, bin: usize, sub_mode: usize) -> &Matrix {
        &self.tables[group.index()][bin][sub_mode]
    }

    pub fn get_mut(&mut self, group: ModeGroup, bin: usize, sub_mode: usize) -> &mut Matrix {
        &mut self.tables[group.index()][bin][sub_mode]
    }

    /// All sub-mode matrices for one (group, bin), in sub-mode order. One sink write per bundle.
    pub fn group_bin(&self, group: ModeGroup, bin: usize) -> &[Matrix] {
        &self.tables[group.index()][bin]
    }

    /// Total weight accumulated for a group across all its bins and sub-modes.
    pub fn group_sum(&self, group: ModeGroup) -> f64 {
        self.tables[group.index()]
            .iter()
            .flatten()
            .map(|m| m.sum())
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modes::ModePartition;

    #[test]
    fn external_numbering() {
        let mut m = Matrix::new("test".to_string(), vec![2, 5, 9]);
        m.add(2, 9, 1.5).unwrap();
        m.add(2, 9, 0.5).unwrap();
        m.add(9, 2, 1.0).unwrap();
        assert_eq!(m.value(2, 9), 2.0);
        assert_eq!(m.value(9, 2), 1.0);
        assert_eq!(m.value(5, 5), 0.0);
        assert_eq!(m.sum(), 3.0);

        // 3 isn't one of the external ids
        assert!(m.add(3, 9, 1.0).is_err());
    }

    #[test]
    fn set_dimensions() {
        let modes = ModeTable::new(&ModePartition::default()).unwrap();
        let geography = Geography::new(
            vec![
                crate::geography::LocationRow { location: 1, zone: 1 },
                crate::geography::LocationRow { location: 2, zone: 3 },
            ],
            vec![
                crate::geography::AccessPointRow { access_point: 8, zone: 2 },
                crate::geography::AccessPointRow { access_point: 12, zone: 3 },
            ],
        )
        .unwrap();

        let set = MatrixSet::new(TimePeriod::AmPeak, &modes, &geography);
        // Zone-dimensioned groups span 1..=max_zone even when some zones are empty
        assert_eq!(set.get(ModeGroup::Auto, 0, 0).ids(), &[1, 2, 3]);
        assert_eq!(set.get(ModeGroup::Auto, 0, 0).name(), "SOV_GP_AM_low");
        assert_eq!(set.get(ModeGroup::Auto, 2, 1).name(), "SOV_PAY_AM_high");
        assert_eq!(set.group_bin(ModeGroup::Auto, 2).len(), 8);
        // Transit is dimensioned by access points instead
        assert_eq!(set.get(ModeGroup::Transit, 0, 0).ids(), &[8, 12]);
        assert_eq!(set.group_bin(ModeGroup::Transit, 0).len(), 15);
    }
}
