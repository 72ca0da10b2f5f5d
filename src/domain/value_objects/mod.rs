//! Value Objects
//!
//! Small immutable-by-API types shared by the registry and the aggregator.

mod page_counters;
mod stats_filter;

pub use page_counters::PageCounters;
pub use stats_filter::StatsFilter;
