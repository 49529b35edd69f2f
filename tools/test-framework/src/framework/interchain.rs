/*!
   Constructs for running test cases over a topology of chains connected
   by named paths.

   The test case only declares the topology and, optionally, adjusts the
   chain configurations. The runner then:

   1. validates the topology, before any chain is started;
   2. resolves the built-in chain configurations;
   3. bootstraps the chains and the relayer;
   4. registers the links and builds the interchain;
   5. discovers the channels of every path, and exports them to a `.env`
      file in the test directory;
   6. runs the test body, suspending on failure if `HANG_ON_FAIL=1`.
*/

use core::any::type_name;
use tracing::info;

use crate::bootstrap::init::init_test;
use crate::chain::builtin::builtin_chain_configs;
use crate::chain::config::ChainConfig;
use crate::chain::handle::ChainHandle;
use crate::error::Error;
use crate::interchain::builder::Interchain;
use crate::interchain::built::{BuiltInterchain, InterchainBuildOptions};
use crate::relayer::handle::RelayerHandle;
use crate::topology::discover::{discover_channels, get_ics_channel, get_transfer_channel};
use crate::topology::link::{link_ibc_paths, link_provider_consumer_paths, resolve_chain};
use crate::topology::validate::validate_topology;
use crate::types::channel::ChannelRecord;
use crate::types::config::TestConfig;
use crate::types::env::write_env;
use crate::types::topology::TopologyConfig;
use crate::util::suspend::hang_on_error;

pub const RELAYER_NAME: &str = "relayer";

/**
   Starts the chains and the relayer of a test. This is where container
   orchestration plugs in; the in-memory
   [`MockBootstrap`](crate::relayer_mock::bootstrap::MockBootstrap) is
   provided for running topologies without any external process.
*/
pub trait InterchainBootstrap {
    type Chain: ChainHandle;

    type Relayer: RelayerHandle;

    fn bootstrap_chain(
        &self,
        config: &TestConfig,
        chain_config: ChainConfig,
    ) -> Result<Self::Chain, Error>;

    fn bootstrap_relayer(
        &self,
        config: &TestConfig,
        chains: &[Self::Chain],
    ) -> Result<Self::Relayer, Error>;
}

pub trait InterchainTest {
    fn topology(&self) -> TopologyConfig;

    fn test_name(&self) -> String {
        type_name::<Self>()
            .rsplit("::")
            .next()
            .unwrap_or("interchain-test")
            .to_string()
    }

    /**
       Adjust the resolved chain configurations before the chains are
       started, e.g. to add genesis modifiers.
    */
    fn modify_chain_configs(&self, _configs: &mut [ChainConfig]) {}

    fn run<Chain: ChainHandle, Relayer: RelayerHandle>(
        &self,
        config: &TestConfig,
        interchain: ConnectedInterchain<Chain, Relayer>,
    ) -> Result<(), Error>;
}

/**
   Everything a test body gets to work with: the chains in topology order,
   the relayer, the built interchain and the discovered channels.
*/
pub struct ConnectedInterchain<Chain, Relayer> {
    pub chains: Vec<Chain>,
    pub relayer: Relayer,
    pub interchain: BuiltInterchain<Chain, Relayer>,
    pub channels: Vec<ChannelRecord>,
}

impl<Chain: ChainHandle, Relayer> ConnectedInterchain<Chain, Relayer> {
    pub fn chain(&self, index: usize) -> Result<&Chain, Error> {
        resolve_chain(&self.chains, "<test>", index)
    }

    fn find_channel(
        &self,
        path: &str,
        index: usize,
        ordered: bool,
    ) -> Result<&ChannelRecord, Error> {
        let chain_id = self.chain(index)?.chain_id();

        self.channels
            .iter()
            .find(|record| {
                record.path == path
                    && record.chain_id == chain_id
                    && record.channel.is_ordered() == ordered
            })
            .ok_or_else(|| Error::unknown_path(path.to_string()))
    }

    /**
       The transfer channel end of `path` on the chain at `index`.
    */
    pub fn channel(&self, path: &str, index: usize) -> Result<&ChannelRecord, Error> {
        self.find_channel(path, index, false)
    }

    /**
       The interchain security channel end of a provider/consumer `path`
       on the chain at `index`.
    */
    pub fn ics_channel(&self, path: &str, index: usize) -> Result<&ChannelRecord, Error> {
        self.find_channel(path, index, true)
    }

    pub fn channels_of(&self, index: usize) -> Result<Vec<&ChannelRecord>, Error> {
        let chain_id = self.chain(index)?.chain_id();

        Ok(self
            .channels
            .iter()
            .filter(|record| record.chain_id == chain_id)
            .collect())
    }
}

pub fn run_interchain_test<Test, Bootstrap>(test: &Test, bootstrap: &Bootstrap) -> Result<(), Error>
where
    Test: InterchainTest,
    Bootstrap: InterchainBootstrap,
{
    let config = init_test()?;
    let test_name = test.test_name();

    info!("starting test {} with test config: {:?}", test_name, config);

    let topology = test.topology();
    let (paths, provider_consumer_paths) = validate_topology(&topology)?;

    let mut chain_configs = builtin_chain_configs(&topology.chains)?;
    test.modify_chain_configs(&mut chain_configs);

    let chains = chain_configs
        .into_iter()
        .map(|chain_config| bootstrap.bootstrap_chain(&config, chain_config))
        .collect::<Result<Vec<_>, Error>>()?;

    let relayer = bootstrap.bootstrap_relayer(&config, &chains)?;

    let mut interchain = Interchain::new();

    for chain in &chains {
        interchain.add_chain(chain.clone());
    }

    interchain.add_relayer(relayer.clone(), RELAYER_NAME);

    link_ibc_paths(&topology.paths, &chains, &relayer, &mut interchain)?;
    link_provider_consumer_paths(
        &topology.provider_consumer_paths,
        &chains,
        &relayer,
        &mut interchain,
    )?;

    let built = interchain.build(&InterchainBuildOptions::new(&test_name))?;

    let mut channels = discover_channels(
        &paths,
        &chains,
        &relayer,
        get_transfer_channel::<Bootstrap::Relayer>,
    )?;

    if !provider_consumer_paths.is_empty() {
        channels.extend(discover_channels(
            &provider_consumer_paths,
            &chains,
            &relayer,
            get_transfer_channel::<Bootstrap::Relayer>,
        )?);

        channels.extend(discover_channels(
            &provider_consumer_paths,
            &chains,
            &relayer,
            get_ics_channel::<Bootstrap::Relayer>,
        )?);
    }

    let env_path = config.env_file(&test_name);
    write_env(&env_path, &channels)?;

    info!(
        "written discovered channels to {}. you can `source` the file to use the channel IDs",
        env_path.display()
    );

    let connected = ConnectedInterchain {
        chains,
        relayer,
        interchain: built,
        channels,
    };

    hang_on_error(config.hang_on_fail, || test.run(&config, connected))
}
