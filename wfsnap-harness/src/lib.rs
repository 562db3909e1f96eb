//! A driver for the snapshot objects of [`wfsnap_mem`].
//!
//! Writer threads update a shared snapshot object at exponentially
//! distributed intervals while reader threads take a fixed number of
//! snapshots, each of which is timed. Every operation is logged with the wall
//! clock time at which it finished.
pub mod params;
pub mod run;

pub use params::{Params, ParamsError};
pub use run::{run, Event, Report, RunConfig, Stats, Variant};
