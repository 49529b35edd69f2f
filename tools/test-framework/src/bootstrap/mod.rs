/*!
   Process-wide setup run at the beginning of each test: logging, error
   reporting and the [`TestConfig`](crate::types::config::TestConfig) read
   from the environment.

   Test authors normally reach this through
   [`run_interchain_test`](crate::framework::interchain::run_interchain_test).
*/

pub mod init;
