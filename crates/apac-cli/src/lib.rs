//! Library side of the `apac-remessa` binary.
//!
//! [`pipeline`] runs a generation end to end and is what the integration
//! tests drive; [`logging`] installs the tracing subscriber.

pub mod logging;
pub mod pipeline;
