//! Authorization number pool.
//!
//! The pool is a flat text file of pre-issued numbers. A batch run loads it
//! (after an optional timestamped backup), consumes numbers front to back,
//! gives back any number whose patient failed, and persists what is left.
//!
//! ```
//! use apac_model::AuthorizationNumber;
//! use apac_pool::NumberPool;
//!
//! let mut pool = NumberPool::parse("NUMERAÇÃO APAC\n352570409959-9\n352570409960-0\n");
//! let (number, remaining) = pool.consume().unwrap();
//! assert_eq!(number, AuthorizationNumber::new("3525704099599").unwrap());
//! assert_eq!(remaining, 1);
//! pool.give_back(number);
//! assert_eq!(pool.len(), 2);
//! ```

mod backup;
mod error;
mod pool;
mod report;

pub use backup::{backup, backup_path};
pub use error::{PoolError, Result};
pub use pool::{NumberPool, POOL_HEADER};
pub use report::{interval_report_path, render_interval_report, write_interval_report};
