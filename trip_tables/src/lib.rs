//! Turns the disaggregate trip lists produced by a regional travel-demand model into the
//! origin-destination matrices that traffic and transit assignment consume.
//!
//! Each person-trip record carries a departure-time code, a detailed travel mode, origin and
//! destination locations, and behavioral attributes (occupancy class, value of time, parking
//! location, transit access points). One pass per time period classifies every record into a
//! (mode group, value-of-time bin, sub-mode) cell, derives person- and vehicle-trip weights, and
//! accumulates them into that period's matrices. Processing is period-at-a-time so only one
//! period's matrices are ever in memory.

#[macro_use]
extern crate anyhow;
#[macro_use]
extern crate log;

pub use crate::config::Config;
pub use crate::counters::FacilityCounters;
pub use crate::engine::{generate, Aggregator};
pub use crate::geography::Geography;
pub use crate::matrix::{Matrix, MatrixSet};
pub use crate::modes::{ModeGroup, ModePartition, ModeTable};
pub use crate::occupancy::OccupancyTable;
pub use crate::periods::TimePeriod;
pub use crate::records::TripRecord;
pub use crate::sink::{FileSink, MatrixFile, MatrixFormat, MatrixSink, MemorySink};
pub use crate::vot::VotBinner;
pub use crate::writer::write_period;

pub mod config;
pub mod counters;
pub mod engine;
pub mod geography;
pub mod matrix;
pub mod modes;
pub mod occupancy;
pub mod periods;
pub mod records;
pub mod sink;
pub mod vot;
pub mod writer;
