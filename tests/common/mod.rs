#![allow(dead_code)]

pub use dagexec_test_utils::{init_tracing, with_timeout};

use std::time::Duration;

use dagexec::errors::DagError;

/// Long enough for any worker that could still run a node to have done so.
pub const SETTLE: Duration = Duration::from_millis(50);

/// Unwrap a `DagError::Process` or panic with the actual error.
pub fn expect_process_error(err: DagError) -> dagexec::errors::ProcessError {
    match err {
        DagError::Process(e) => e,
        other => panic!("expected ProcessError, got: {other:?}"),
    }
}
