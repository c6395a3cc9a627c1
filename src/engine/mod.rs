// Conversion engine - independent of the command line

pub mod batch;
pub mod core;
pub mod worker;

pub use batch::{BatchOptions, plan_batch, run_batch};
pub use self::core::*;
