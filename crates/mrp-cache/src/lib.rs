//! # MRP Cache
//!
//! 增量計算模組：只重算輸入變動的物料及其下階物料

pub mod dirty_tracking;
pub mod incremental;

// Re-export 主要類型
pub use dirty_tracking::DirtyTracker;
pub use incremental::IncrementalCalculator;
