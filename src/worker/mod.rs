//! Worker pool: spawns the pacer and the bounded set of request workers,
//! and owns the job/result channel lifecycle for one run of the engine.

pub mod pool;
pub mod worker;

pub use pool::{worker_count_for_rps, Pool, PoolConfig};
