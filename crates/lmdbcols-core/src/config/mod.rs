pub mod env;

pub use env::{round_up_to_page, EnvConfig, SyncMode, PAGE_GRANULARITY};
