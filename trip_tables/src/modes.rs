//! Classifying detailed mode codes into broad groups and dense per-group sub-mode indices.

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// The four broad groups of travel modes. The group decides everything downstream: how a matrix
/// is dimensioned (zones for most groups, access points for transit), how many value-of-time bins
/// segment it, and whether person or vehicle trips get accumulated.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ModeGroup {
    Auto,
    NonMotorized,
    Transit,
    Other,
}

impl ModeGroup {
    pub fn all() -> Vec<ModeGroup> {
        vec![
            ModeGroup::Auto,
            ModeGroup::NonMotorized,
            ModeGroup::Transit,
            ModeGroup::Other,
        ]
    }

    pub fn index(self) -> usize {
        match self {
            ModeGroup::Auto => 0,
            ModeGroup::NonMotorized => 1,
            ModeGroup::Transit => 2,
            ModeGroup::Other => 3,
        }
    }

    /// How many value-of-time bins segment this group's matrices. Only auto trips are split by
    /// value of time.
    pub fn vot_bins(self) -> usize {
        match self {
            ModeGroup::Auto => 3,
            _ => 1,
        }
    }

    pub fn describe(self) -> &'static str {
        match self {
            ModeGroup::Auto => "auto",
            ModeGroup::NonMotorized => "non-motorized",
            ModeGroup::Transit => "transit",
            ModeGroup::Other => "other",
        }
    }
}

/// Names for the three value-of-time bins, in bin order. Only used in file names for groups with
/// more than one bin.
pub const VOT_BIN_NAMES: [&str; 3] = ["low", "med", "high"];

/// The ordered partition of the detailed mode-code space. Codes are 1-based positions into
/// `names`; any code not claimed by one of the lists lands in the Other group.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ModePartition {
    /// One display name per detailed mode code, in code order.
    pub names: Vec<String>,
    /// Single-occupant auto codes.
    pub sov: Vec<usize>,
    /// Two-occupant shared-ride auto codes.
    pub hov2: Vec<usize>,
    /// Three-plus-occupant shared-ride auto codes.
    pub hov3: Vec<usize>,
    pub non_motorized: Vec<usize>,
    /// Transit codes reached on foot.
    pub walk_transit: Vec<usize>,
    /// Transit codes with a park-and-ride or kiss-and-ride vehicle leg.
    pub drive_transit: Vec<usize>,
}

impl Default for ModePartition {
    /// The standard 26-code space: 8 auto modes split by occupancy and toll payment, walk and
    /// bike, 5 walk-access and 10 drive-access transit modes, and school bus.
    fn default() -> ModePartition {
        ModePartition {
            names: vec![
                "SOV_GP", "SOV_PAY", "SR2_GP", "SR2_HOV", "SR2_PAY", "SR3_GP", "SR3_HOV",
                "SR3_PAY", "WALK", "BIKE", "WLK_LOC", "WLK_EXP", "WLK_BRT", "WLK_LRT", "WLK_CMR",
                "PNR_LOC", "PNR_EXP", "PNR_BRT", "PNR_LRT", "PNR_CMR", "KNR_LOC", "KNR_EXP",
                "KNR_BRT", "KNR_LRT", "KNR_CMR", "SCHLBUS",
            ]
            .into_iter()
            .map(|x| x.to_string())
            .collect(),
            sov: vec![1, 2],
            hov2: vec![3, 4, 5],
            hov3: vec![6, 7, 8],
            non_motorized: vec![9, 10],
            walk_transit: vec![11, 12, 13, 14, 15],
            drive_transit: vec![16, 17, 18, 19, 20, 21, 22, 23, 24, 25],
        }
    }
}

/// One detailed mode code's precomputed classification.
#[derive(Clone, Debug)]
pub struct ModeEntry {
    pub name: String,
    pub group: ModeGroup,
    /// This mode's zero-based position within its group. Dense; matrices are indexed by it.
    pub sub_mode: usize,
    pub hov2: bool,
    pub hov3: bool,
    pub drive_transit: bool,
}

/// A static lookup from detailed mode code to classification, built once at startup. Replaces
/// per-record conditional chains with a table covering the whole closed code space.
pub struct ModeTable {
    entries: Vec<ModeEntry>,
    names_by_group: Vec<Vec<String>>,
}

impl ModeTable {
    pub fn new(partition: &ModePartition) -> Result<ModeTable> {
        let n = partition.names.len();
        if n == 0 {
            bail!("the mode partition names no mode codes");
        }
        // Which list claimed each code, to catch overlaps
        let mut claimed: Vec<Option<&'static str>> = vec![None; n + 1];
        for (label, list) in [
            ("sov", &partition.sov),
            ("hov2", &partition.hov2),
            ("hov3", &partition.hov3),
            ("non_motorized", &partition.non_motorized),
            ("walk_transit", &partition.walk_transit),
            ("drive_transit", &partition.drive_transit),
        ] {
            for &code in list {
                if code == 0 || code > n {
                    bail!(
                        "mode code {} in the {} list is outside the code space 1..={}",
                        code,
                        label,
                        n
                    );
                }
                if let Some(other) = claimed[code] {
                    bail!(
                        "mode code {} is claimed by both the {} and {} lists",
                        code,
                        other,
                        label
                    );
                }
                claimed[code] = Some(label);
            }
        }

        let mut entries = Vec::new();
        let mut names_by_group: Vec<Vec<String>> = vec![Vec::new(); 4];
        let mut counters = [0; 4];
        // Walk the code space in order, so sub-mode indices are dense and follow code order
        for code in 1..=n {
            let name = partition.names[code - 1].clone();
            let group = match claimed[code] {
                Some("sov") | Some("hov2") | Some("hov3") => ModeGroup::Auto,
                Some("non_motorized") => ModeGroup::NonMotorized,
                Some("walk_transit") | Some("drive_transit") => ModeGroup::Transit,
                _ => ModeGroup::Other,
            };
            let sub_mode = counters[group.index()];
            counters[group.index()] += 1;
            names_by_group[group.index()].push(name.clone());
            entries.push(ModeEntry {
                name,
                group,
                sub_mode,
                hov2: claimed[code] == Some("hov2"),
                hov3: claimed[code] == Some("hov3"),
                drive_transit: claimed[code] == Some("drive_transit"),
            });
        }

        if !partition.drive_transit.is_empty() && counters[ModeGroup::Auto.index()] == 0 {
            bail!("drive-access transit modes need at least one auto mode to hold their vehicle leg");
        }

        for group in ModeGroup::all() {
            info!(
                "{} {} modes",
                counters[group.index()],
                group.describe()
            );
        }

        Ok(ModeTable {
            entries,
            names_by_group,
        })
    }

    /// Classifies a detailed mode code. None means the code is outside the configured space,
    /// which callers treat as fatal.
    pub fn classify(&self, code: usize) -> Option<&ModeEntry> {
        if code == 0 {
            return None;
        }
        self.entries.get(code - 1)
    }

    /// How many sub-modes the group has.
    pub fn sub_modes(&self, group: ModeGroup) -> usize {
        self.names_by_group[group.index()].len()
    }

    /// Display names of the group's sub-modes, in sub-mode order.
    pub fn sub_mode_names(&self, group: ModeGroup) -> &[String] {
        &self.names_by_group[group.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_partition() {
        let table = ModeTable::new(&ModePartition::default()).unwrap();

        assert_eq!(table.sub_modes(ModeGroup::Auto), 8);
        assert_eq!(table.sub_modes(ModeGroup::NonMotorized), 2);
        assert_eq!(table.sub_modes(ModeGroup::Transit), 15);
        assert_eq!(table.sub_modes(ModeGroup::Other), 1);

        let sov = table.classify(1).unwrap();
        assert_eq!(sov.group, ModeGroup::Auto);
        assert_eq!(sov.sub_mode, 0);
        assert!(!sov.hov2 && !sov.hov3);

        let sr2 = table.classify(3).unwrap();
        assert!(sr2.hov2);
        let sr3 = table.classify(8).unwrap();
        assert!(sr3.hov3);
        assert_eq!(sr3.sub_mode, 7);

        let walk = table.classify(9).unwrap();
        assert_eq!(walk.group, ModeGroup::NonMotorized);
        assert_eq!(walk.sub_mode, 0);

        // First drive-access mode comes after the 5 walk-access sub-modes
        let pnr = table.classify(16).unwrap();
        assert_eq!(pnr.group, ModeGroup::Transit);
        assert_eq!(pnr.sub_mode, 5);
        assert!(pnr.drive_transit);
        assert!(!table.classify(11).unwrap().drive_transit);

        let bus = table.classify(26).unwrap();
        assert_eq!(bus.group, ModeGroup::Other);
        assert_eq!(bus.sub_mode, 0);
        assert_eq!(bus.name, "SCHLBUS");

        assert!(table.classify(0).is_none());
        assert!(table.classify(27).is_none());
    }

    #[test]
    fn rejects_bad_partitions() {
        let mut overlapping = ModePartition::default();
        overlapping.non_motorized.push(3);
        assert!(ModeTable::new(&overlapping).is_err());

        let mut out_of_range = ModePartition::default();
        out_of_range.sov.push(99);
        assert!(ModeTable::new(&out_of_range).is_err());
    }
}
