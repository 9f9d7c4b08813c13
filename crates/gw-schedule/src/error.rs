use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScheduleError {
    #[error("invalid driver info: {0}")]
    InvalidDriverInfo(String),
    #[error("invalid problem: {0}")]
    InvalidProblem(String),
    #[error("device error: {0}")]
    Device(#[from] gw_device::DeviceError),
}

pub type Result<T> = std::result::Result<T, ScheduleError>;
