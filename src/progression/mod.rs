//! Content progression: batch planning and unlock evaluation.

pub mod planner;
pub mod unlock;

pub use planner::{plan_batches, Batch, BatchPlan, CategoryPlan, GroupingRule};
pub use unlock::{meets_unlock_criteria, unlocked_batches};
