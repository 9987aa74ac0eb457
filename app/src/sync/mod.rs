//! 同步模块 - 将源目录单向镜像到副本目录

mod driver;
mod event_log;
mod stats;
mod synchronizer;


pub use driver::{run, SyncParams};
pub use event_log::{Category, EventLog};
pub use stats::SyncStats;
pub use synchronizer::Synchronizer;
