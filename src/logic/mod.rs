pub mod activity;
pub mod boundary;
pub mod cultivation;
pub mod merge;
