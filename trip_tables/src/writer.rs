//! Naming and dispatching one period's finished matrices to a sink.

use anyhow::{Context, Result};

use crate::config::Config;
use crate::matrix::MatrixSet;
use crate::modes::{ModeGroup, VOT_BIN_NAMES};
use crate::sink::MatrixSink;

/// Writes every (group, value-of-time bin) bundle of the period. File names follow
/// `<base>_<period>`, with the bin name appended only for groups segmented by value of time.
pub fn write_period(
    matrices: &MatrixSet,
    config: &Config,
    sink: &mut dyn MatrixSink,
) -> Result<()> {
    for group in ModeGroup::all() {
        for bin in 0..group.vot_bins() {
            let mut name = format!(
                "{}_{}",
                config.matrix_base_name(group),
                matrices.period().label()
            );
            if group.vot_bins() > 1 {
                name = format!("{}_{}", name, VOT_BIN_NAMES[bin]);
            }

            let bundle = matrices.group_bin(group, bin);
            for matrix in bundle {
                info!(
                    "{} has {} rows and a total of {:.2} trips",
                    matrix.name(),
                    matrix.dim(),
                    matrix.sum()
                );
            }
            sink.write(&name, bundle, config.matrix_format)
                .with_context(|| format!("Failed to write matrix file {}", name))?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geography::{AccessPointRow, Geography, LocationRow};
    use crate::matrix::MatrixSet;
    use crate::modes::{ModePartition, ModeTable};
    use crate::periods::TimePeriod;
    use crate::sink::MemorySink;

    #[test]
    fn file_names_per_bin() {
        let modes = ModeTable::new(&ModePartition::default()).unwrap();
        let geography = Geography::new(
            vec![LocationRow { location: 1, zone: 1 }],
            vec![AccessPointRow { access_point: 2, zone: 1 }],
        )
        .unwrap();
        let matrices = MatrixSet::new(TimePeriod::PmPeak, &modes, &geography);

        let mut sink = MemorySink::default();
        write_period(&matrices, &Config::default(), &mut sink).unwrap();

        let names: Vec<&str> = sink.written.iter().map(|(name, _)| name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "auto_trips_PM_low",
                "auto_trips_PM_med",
                "auto_trips_PM_high",
                "nmot_trips_PM",
                "transit_trips_PM",
                "other_trips_PM",
            ]
        );
        // Each auto file carries all 8 sub-mode matrices
        assert_eq!(sink.written[0].1.len(), 8);
        assert_eq!(sink.written[4].1.len(), 15);
    }
}
