pub mod projection;
pub mod timeline;

pub use projection::{BalanceCache, CategoryShares, ProjectionService};
pub use timeline::{Granularity, Timeline, TimelineBucket, TimelineService};
