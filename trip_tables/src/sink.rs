//! The boundary between this pipeline and matrix persistence. The engine hands every finished
//! (group, period, value-of-time bin) bundle of sub-mode matrices to a sink by name; whether the
//! bytes land on local disk or with a remote matrix server is not the engine's business.

use std::io::BufWriter;
use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::matrix::Matrix;

/// Numeric encoding requested for persisted matrix values.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatrixFormat {
    Float32,
    Float64,
}

impl Default for MatrixFormat {
    fn default() -> MatrixFormat {
        MatrixFormat::Float32
    }
}

pub trait MatrixSink {
    /// Persists one named bundle of matrices. A failure here is fatal for the run; a
    /// half-written period would leave assignment inputs inconsistent, so nothing retries.
    fn write(&mut self, name: &str, matrices: &[Matrix], format: MatrixFormat) -> Result<()>;
}

/// The on-disk container: all sub-mode matrices for one (group, period, bin), with their external
/// numbering, in the requested encoding.
#[derive(Serialize, Deserialize)]
pub struct MatrixFile {
    pub matrices: Vec<StoredMatrix>,
}

#[derive(Serialize, Deserialize)]
pub struct StoredMatrix {
    pub name: String,
    pub ids: Vec<usize>,
    pub values: StoredValues,
}

#[derive(Serialize, Deserialize)]
pub enum StoredValues {
    Float32(Vec<f32>),
    Float64(Vec<f64>),
}

impl StoredMatrix {
    fn from_matrix(matrix: &Matrix, format: MatrixFormat) -> StoredMatrix {
        let values = match format {
            MatrixFormat::Float32 => StoredValues::Float32(matrix.values().to_vec()),
            MatrixFormat::Float64 => {
                StoredValues::Float64(matrix.values().iter().map(|&x| x as f64).collect())
            }
        };
        StoredMatrix {
            name: matrix.name().to_string(),
            ids: matrix.ids().to_vec(),
            values,
        }
    }
}

/// Writes each bundle as a bincode file named `<name>.bin` under one output directory.
pub struct FileSink {
    dir: PathBuf,
}

impl FileSink {
    pub fn new<P: Into<PathBuf>>(dir: P) -> Result<FileSink> {
        let dir = dir.into();
        fs_err::create_dir_all(&dir)?;
        Ok(FileSink { dir })
    }
}

impl MatrixSink for FileSink {
    fn write(&mut self, name: &str, matrices: &[Matrix], format: MatrixFormat) -> Result<()> {
        let path = self.dir.join(format!("{}.bin", name));
        let file = MatrixFile {
            matrices: matrices
                .iter()
                .map(|m| StoredMatrix::from_matrix(m, format))
                .collect(),
        };
        let out = BufWriter::new(fs_err::File::create(&path)?);
        bincode::serialize_into(out, &file)
            .with_context(|| format!("Failed to serialize {}", path.display()))?;
        Ok(())
    }
}

pub fn read_matrix_file(path: &str) -> Result<MatrixFile> {
    let file = fs_err::File::open(path)?;
    bincode::deserialize_from(std::io::BufReader::new(file))
        .with_context(|| format!("Failed to deserialize {}", path))
}

/// Retains everything written, in order. Tests and the conservation checks use this instead of
/// touching disk.
#[derive(Default)]
pub struct MemorySink {
    pub written: Vec<(String, Vec<Matrix>)>,
}

impl MatrixSink for MemorySink {
    fn write(&mut self, name: &str, matrices: &[Matrix], _format: MatrixFormat) -> Result<()> {
        self.written.push((name.to_string(), matrices.to_vec()));
        Ok(())
    }
}
