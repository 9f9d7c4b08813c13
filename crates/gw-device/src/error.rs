use thiserror::Error;

#[derive(Error, Debug)]
pub enum DeviceError {
    #[error("local size along axis {axis} must be non-zero")]
    InvalidLocalSize { axis: usize },
    #[error("invalid axis {axis} for a 3-dimensional range")]
    InvalidAxis { axis: usize },
    #[error("device reports no compute slices: eu_count={eu_count}, max_eus_per_wg={max_eus_per_wg}")]
    NoComputeSlices { eu_count: u32, max_eus_per_wg: u32 },
    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, DeviceError>;
