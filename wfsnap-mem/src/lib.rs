//! Wait-free atomic snapshot objects for shared-memory threads.
//!
//! Two objects are provided:
//!
//! * [`MrmwSnapshot`](snapshot::MrmwSnapshot), in which any writer may update
//!   any component, and readers are helped by snapshots that writers leave
//!   behind in a per-writer help table.
//! * [`MrswSnapshot`](snapshot::MrswSnapshot), in which each component is
//!   owned by exactly one writer, and every published component carries the
//!   view its writer obtained immediately before publishing.
//!
//! Both are generic over the [`Register`](register::Register) used to store
//! each component.
pub mod register;
pub mod snapshot;
pub(crate) mod sync;
