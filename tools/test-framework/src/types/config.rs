/*!
   Definition for the test configuration.
*/

use core::fmt::Debug;
use std::path::PathBuf;

/**
   The test configuration loaded from the environment variables during
   [`init_test`](crate::bootstrap::init::init_test).
*/
#[derive(Debug, Clone)]
pub struct TestConfig {
    /**
       The directory in which the test artifacts, such as the relayer home
       and the exported `.env` file, are stored.

       Configured through the `CHAIN_STORE_DIR` environment variable. Each
       test run gets a random `test-<n>` sub directory of it.
    */
    pub chain_store_dir: PathBuf,

    /**
       The path to the `rly` executable, configured through
       `RELAYER_COMMAND_PATH`.
    */
    pub relayer_command_path: String,

    /**
       Whether to suspend a test case when it fails, so that the chains
       can be inspected. Set `HANG_ON_FAIL=1` to enable.
    */
    pub hang_on_fail: bool,
}

impl TestConfig {
    pub fn relayer_home(&self) -> PathBuf {
        self.chain_store_dir.join("relayer")
    }

    pub fn env_file(&self, test_name: &str) -> PathBuf {
        self.chain_store_dir.join(format!("{test_name}.env"))
    }
}
