//! Static partitioning across independent ranks
//!
//! Rank 0 coordinates: it partitions the task list round-robin, scatters each
//! rank its partition, runs its own partition locally and gathers one
//! [`RankReport`] from every other rank. Ranks share no state; they exchange
//! only [`Partition`] and [`RankReport`] messages through a [`Transport`].
//!
//! ```text
//!        ┌──────────── scatter ────────────┐
//!        │                                 │
//! ┌──────┴──────┐   ┌─────────┐       ┌─────────┐
//! │   Rank 0    │   │ Rank 1  │  ...  │ Rank N-1│
//! │ coordinator │   │ pipeline│       │ pipeline│
//! │ + pipeline  │   └────┬────┘       └────┬────┘
//! └──────┬──────┘        │                 │
//!        └──────────── gather ─────────────┘
//! ```

mod coordinator;
mod messages;
mod partition;
mod transport;
mod worker;

pub use coordinator::{DistributedCoordinator, DistributedRun};
pub use messages::{Partition, RankReport};
pub use partition::distribute;
pub use transport::{LocalTransport, RankHandler, Transport};
pub use worker::RankWorker;

/// Logical worker identity, `0..N-1`
pub type Rank = usize;

/// The coordinating rank
pub const COORDINATOR: Rank = 0;
