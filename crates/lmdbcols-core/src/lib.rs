//! lmdbcols core: store-agnostic building blocks for typed LMDB collections
//!
//! - [`AlignedView`]: zero-copy, checked reinterpretation of byte ranges
//! - [`EightPadded`] / [`PaddedBuf`]: zero padding to the next multiple of eight
//! - [`Record`]: the layout rule every stored key and value must satisfy
//! - [`EnvConfig`]: environment configuration
//! - [`LogSink`]: injectable diagnostic logging

pub mod config;
pub mod error;
pub mod layout;
pub mod log;
pub mod observe;
pub mod padding;
pub mod view;

pub use config::{round_up_to_page, EnvConfig, SyncMode, PAGE_GRANULARITY};
pub use error::{ColsError, Result, ViewError};
pub use layout::{is_paddable, is_valid_record, is_valid_record_layout, Record, RECORD_ALIGNMENT};
pub use log::{LogEvent, LogSink, MemorySink, TracingSink};
pub use padding::{EightPadded, PaddedBuf};
pub use view::AlignedView;
