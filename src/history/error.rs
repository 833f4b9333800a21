use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("history index {index} is out of range for a log of {len} entries")]
    OutOfRange { index: usize, len: usize },
}
