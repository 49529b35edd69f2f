//! Bootstrap of in-memory chains and relayer for
//! [`run_interchain_test`](crate::framework::interchain::run_interchain_test).

use tracing::info;

use crate::chain::config::ChainConfig;
use crate::chain::handle::ChainHandle;
use crate::error::Error;
use crate::framework::interchain::InterchainBootstrap;
use crate::relayer_mock::chain::MockChain;
use crate::relayer_mock::relayer::MockRelayer;
use crate::types::config::TestConfig;

/// Amount of native tokens the default account of each chain starts with.
pub const INITIAL_BALANCE: u128 = 10_000_000_000;

/// A minimal Cosmos SDK style genesis document.
pub const DEFAULT_GENESIS: &str = r#"{
  "genesis_time": "2023-01-01T00:00:00Z",
  "chain_id": "",
  "app_state": {
    "bank": { "balances": [] },
    "gov": {
      "deposit_params": {
        "min_deposit": [{ "denom": "stake", "amount": "10000000" }],
        "max_deposit_period": "172800s"
      },
      "voting_params": { "voting_period": "172800s" }
    }
  }
}"#;

#[derive(Debug, Clone)]
pub struct MockBootstrap {
    pub genesis: Vec<u8>,
    pub initial_balance: u128,
}

impl Default for MockBootstrap {
    fn default() -> Self {
        Self {
            genesis: DEFAULT_GENESIS.as_bytes().to_vec(),
            initial_balance: INITIAL_BALANCE,
        }
    }
}

impl InterchainBootstrap for MockBootstrap {
    type Chain = MockChain;

    type Relayer = MockRelayer;

    fn bootstrap_chain(
        &self,
        _config: &TestConfig,
        chain_config: ChainConfig,
    ) -> Result<MockChain, Error> {
        let denom = chain_config.denom.clone();
        let chain = MockChain::new(chain_config, &self.genesis)?;

        chain.fund(&chain.default_address()?, &denom, self.initial_balance)?;

        info!(
            "started mock chain {} with {}{} in the default account",
            chain.chain_id(),
            self.initial_balance,
            denom
        );

        Ok(chain)
    }

    fn bootstrap_relayer(
        &self,
        _config: &TestConfig,
        chains: &[MockChain],
    ) -> Result<MockRelayer, Error> {
        let relayer = MockRelayer::new();

        for chain in chains {
            relayer.add_chain(chain.clone())?;
        }

        Ok(relayer)
    }
}
