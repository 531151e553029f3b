//! Cluster streaming: viewpoint-driven populate/dispose of world clusters.
//!
//! Each display tick the host asks for the current cluster coordinate. On a
//! change, out-of-range clusters are disposed synchronously and new ones are
//! queued; otherwise at most one queued build is drained under a fixed pacing
//! delay.
//!
//! # Invariants
//! - One cluster record per coordinate; the grid is the sole mutator of
//!   cluster lifecycle state.
//! - At most one generation job is in flight across the whole grid.
//! - Dispose for a viewpoint jump completes before any new build is queued.
//! - A failed matter reduces the cluster; it never leaves it `Building`.

mod cluster;
mod grid;

pub use cluster::{Cluster, ClusterStatus, MatterInstance};
pub use grid::{ClusterGrid, ClustersStatus, GridConfig, GridError, GridStats};

pub fn crate_info() -> &'static str {
    "driftspace-grid v0.1.0"
}
