//! Binning a continuous value of time into the three ordinal classes that segment auto matrices.

use anyhow::Result;

/// Two configured thresholds split travelers into low/medium/high value-of-time classes. Groups
/// with a single bin never consult this.
pub struct VotBinner {
    low: f32,
    med: f32,
}

impl VotBinner {
    pub fn new(low: f32, med: f32) -> Result<VotBinner> {
        if low < 0.0 || med < 0.0 {
            bail!("value-of-time thresholds must be non-negative ({}, {})", low, med);
        }
        if low > med {
            bail!(
                "the low value-of-time threshold {} exceeds the medium threshold {}",
                low,
                med
            );
        }
        Ok(VotBinner { low, med })
    }

    pub fn bin(&self, value: f32) -> usize {
        if value < self.low {
            0
        } else if value < self.med {
            1
        } else {
            2
        }
    }
}
