//! Custom widgets drawn straight to the buffer.

pub mod net_chart;

pub use net_chart::{DateCluster, NetChart};
