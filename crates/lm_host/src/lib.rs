//! # lm_host - Match hosting runtime
//!
//! Runs `lm_core` matches live: one owning tokio task per match
//! (single-writer), a fixed 100ms tick interval, an mpsc command
//! queue, broadcast event/snapshot feeds, a throttled background
//! advisor refresh, and a durable per-match store.
//!
//! No shared mutable state crosses matches; the registry only hands
//! out cloneable handles.

pub mod actor;
pub mod advisor;
pub mod error;
pub mod registry;
pub mod service;
pub mod store;

pub use actor::{MatchCommand, MatchFeed, MatchHandle};
pub use advisor::{HeuristicAdvisor, NullAdvisor, TacticsAdvisor};
pub use error::HostError;
pub use registry::MatchRegistry;
pub use service::MatchService;
pub use store::{FileMatchStore, MatchStore, StoreError};
