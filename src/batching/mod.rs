//! Merging independent commands into one round trip.
//!
//! A [`CommandBatch`] concatenates the text of every admitted step, renames each step's
//! parameters so no two steps collide, and after execution feeds each result set to the step
//! that asked for it, in registration order. [`BatchManager`] rotates batches as transport
//! limits are reached.

mod batch;
mod manager;
mod step;

pub use batch::{Admission, CommandBatch, RejectReason};
pub use manager::BatchManager;
pub use step::{CommandBatchStep, ResultCallback};
