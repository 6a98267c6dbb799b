//! pcapscope - classify packet captures and report traffic statistics.
//!
//! The heavy lifting lives in [`pcapscope_core`]; this crate adds the
//! analysis [`Session`](session::Session), the SQLite storage adapter and the
//! command-line front end.
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use pcapscope::session::Session;
//! use pcapscope::storage::SaveMode;
//!
//! fn main() -> anyhow::Result<()> {
//!     let mut session = Session::open("pcapscope.db")?;
//!     session.load_capture(Path::new("capture.pcap"))?;
//!     session.write_diagnostics(Path::new("logs"))?;
//!     session.save("monday", SaveMode::Create)?;
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod error;
pub mod session;
pub mod storage;

pub use error::{Error, Result, StorageError};
