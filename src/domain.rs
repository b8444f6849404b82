pub mod catalog;
pub mod job;
pub mod merge_tree;
pub mod pipeline;
pub mod properties;
pub mod utils;
pub mod workflow;
