//! Bootstrap pairing chains started by another [`InterchainBootstrap`]
//! with an `rly` relayer process.

use eyre::eyre;
use tracing::info;

use crate::chain::config::ChainConfig;
use crate::chain::handle::ChainHandle;
use crate::error::Error;
use crate::framework::interchain::InterchainBootstrap;
use crate::relayer::rly::RlyRelayer;
use crate::types::config::TestConfig;

/**
   Starts the chains through `Chains`, then initializes an `rly` home in
   the test directory and registers every chain in it.

   The `rly` executable is taken from `RELAYER_COMMAND_PATH`. Each chain
   must expose an [`rpc_address`](ChainHandle::rpc_address).
*/
#[derive(Debug, Clone)]
pub struct RlyBootstrap<Chains> {
    pub chains: Chains,
}

impl<Chains> RlyBootstrap<Chains> {
    pub fn new(chains: Chains) -> Self {
        Self { chains }
    }
}

impl<Chains: InterchainBootstrap> InterchainBootstrap for RlyBootstrap<Chains> {
    type Chain = Chains::Chain;

    type Relayer = RlyRelayer;

    fn bootstrap_chain(
        &self,
        config: &TestConfig,
        chain_config: ChainConfig,
    ) -> Result<Self::Chain, Error> {
        self.chains.bootstrap_chain(config, chain_config)
    }

    fn bootstrap_relayer(
        &self,
        config: &TestConfig,
        chains: &[Self::Chain],
    ) -> Result<RlyRelayer, Error> {
        let relayer = RlyRelayer::new(&config.relayer_command_path, config.relayer_home());

        relayer.init_config()?;

        for chain in chains {
            let rpc_address = chain.rpc_address().ok_or_else(|| {
                Error::generic(eyre!(
                    "chain {} has no rpc address for the rly relayer to connect to",
                    chain.chain_id()
                ))
            })?;

            relayer.add_chain(chain.config(), &rpc_address)?;
        }

        info!(
            "initialized rly relayer home {} with {} chains",
            relayer.home.display(),
            chains.len()
        );

        Ok(relayer)
    }
}
