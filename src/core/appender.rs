//! Appender trait for log output destinations

use super::{error::Result, record::Record};
use parking_lot::Mutex;
use std::sync::Arc;

/// A sink receiving rendered text plus the original record
///
/// Failure handling (retry, drop, propagate) is up to the implementation; the
/// logger only counts and reports errors returned from `append`.
pub trait Appender: Send + Sync {
    fn append(&mut self, rendered: &str, record: &Record) -> Result<()>;
    fn flush(&mut self) -> Result<()>;
    fn name(&self) -> &str;
}

/// An appender binding shared by every config and scope that references it
pub type SharedAppender = Arc<Mutex<Box<dyn Appender>>>;

pub fn share<A: Appender + 'static>(appender: A) -> SharedAppender {
    Arc::new(Mutex::new(Box::new(appender)))
}
