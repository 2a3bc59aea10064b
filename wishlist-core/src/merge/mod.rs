pub mod merge;

pub use merge::{merge_app_data, merge_rosters, merge_snapshots, MergeResult};
