// #![deny(warnings)]
#![allow(clippy::too_many_arguments)]
#![allow(clippy::type_complexity)]
#![allow(clippy::ptr_arg)]
#![doc = include_str!("../README.md")]

//!
//! ## Overview
//!
//! This framework wires a set of chains and a relayer into named IBC paths.
//! A test case declares its topology: the chains to start, the transfer
//! paths between them, and the provider/consumer paths used by interchain
//! security. The framework then validates the topology, patches the genesis
//! of each chain, asks the relayer to create every path, and finally
//! discovers the channel identifiers that the relayer picked.
//!
//! ## Example Test
//!
//! ```rust,no_run
//! use interchain_test_framework::prelude::*;
//!
//! pub struct ExampleTest;
//!
//! pub fn example_test() -> Result<(), Error> {
//!     run_interchain_test(&ExampleTest, &MockBootstrap::default())
//! }
//!
//! impl InterchainTest for ExampleTest {
//!     fn topology(&self) -> TopologyConfig {
//!         TopologyConfig::new(&["gaia", "neutron"]).with_path("gaia-neutron", &[0, 1])
//!     }
//!
//!     fn run<Chain: ChainHandle, Relayer: RelayerHandle>(
//!         &self,
//!         _config: &TestConfig,
//!         interchain: ConnectedInterchain<Chain, Relayer>,
//!     ) -> Result<(), Error> {
//!         let channel = interchain.channel("gaia-neutron", 0)?;
//!
//!         info!("gaia transfer channel: {}", channel.channel_id());
//!
//!         suspend()
//!     }
//! }
//! ```
//!
//! The `example_test` function only specifies which test to run and how its
//! chains are started. Here the in-memory
//! [`MockBootstrap`](crate::relayer_mock::bootstrap::MockBootstrap) is used,
//! so no process is spawned.
//!
//! The `topology` method returns the chains by their built-in name, and the
//! paths by name with the indices of the two chains they connect. An invalid
//! path, such as one with a single chain index, fails the test before any
//! chain is started.
//!
//! The `run` method receives a
//! [`ConnectedInterchain`](crate::framework::interchain::ConnectedInterchain)
//! holding the chains in topology order, the relayer and the discovered
//! channels of every path.
//!
//! ## Running Tests
//!
//! ```bash
//! RUST_LOG=info RUST_BACKTRACE=1 \
//!     cargo test -p interchain-integration-test -- --test-threads=1
//! ```
//!
//! The environment variable RUST_LOG controls the log level. Take a look at
//! the [`TestConfig`](crate::types::config::TestConfig) type for the other
//! environment variables read at the beginning of a test.
//!
//! Each test run writes its artifacts to a random `test-<n>` sub directory
//! of `CHAIN_STORE_DIR`. The discovered channels are exported to a
//! `<test name>.env` file in that directory, with one prefixed group of
//! variables per channel end:
//!
//! ```text
//! 0_IBC_PATH=gaia-neutron
//! 0_CHAIN_ID=gaia-1
//! 0_CHANNEL_ID=channel-0
//! 0_PORT_ID=transfer
//! ...
//! ```

pub mod bootstrap;
pub mod chain;
pub mod error;
pub mod framework;
pub mod ibc;
pub mod interchain;
pub mod prelude;
pub mod relayer;
pub mod relayer_mock;
pub mod topology;
pub mod types;
pub mod util;
