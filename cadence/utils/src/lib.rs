//! Shared utilities for the Cadence scheduler.
mod errors;
mod id;
mod out_file;

pub use errors::{CadenceResult, Error, ErrorKind};
pub use id::{GSym, GetName, Id};
pub use out_file::OutputFile;
