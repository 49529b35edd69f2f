/*!
   Utilities for suspending the test.
*/

use core::time::Duration;
use std::thread::sleep;
use tracing::{error, warn};

use crate::error::Error;

/**
   Call this function in the middle of a test code of interest,
   so that we can suspend the test and still interact with the
   spawned chains and relayer for debugging.
*/
pub fn suspend<R>() -> R {
    warn!("suspending the test indefinitely. you can still interact with any spawned chains and relayers");

    loop {
        sleep(Duration::from_secs(999_999_999))
    }
}

/**
   Suspends the test using [`suspend`] if `hang_on_fail` is `true` and if
   the continuation returns an error.
*/
pub fn hang_on_error<R>(
    hang_on_fail: bool,
    cont: impl FnOnce() -> Result<R, Error>,
) -> Result<R, Error> {
    let result = cont();

    match result {
        Err(e) if hang_on_fail => {
            error!("test failure occurred with HANG_ON_FAIL=1, suspending the test to allow debugging: {:?}",
                e);

            suspend()
        }
        Err(e) => {
            error!("test failure occurred. set HANG_ON_FAIL=1 to suspend the test on failure for debugging: {}",
                e);

            Err(e)
        }
        _ => result,
    }
}
