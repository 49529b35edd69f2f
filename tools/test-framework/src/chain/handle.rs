/*!
   The chain handle through which the topology code talks to a running
   chain.

   Spawning the chain, funding wallets and signing transactions are the
   business of the orchestration layer. The framework only needs to know
   the identity of a chain, its native denomination, and how to query
   balances once tokens have been relayed.
*/

use core::time::Duration;
use eyre::eyre;

use ibc_relayer_types::core::ics24_host::identifier::{ChainId, ChannelId};

use crate::chain::config::ChainConfig;
use crate::error::Error;
use crate::util::retry::assert_eventually_succeed;

/**
   Number of times (seconds) to try and query a wallet to reach the
   target amount, as used by [`assert_eventual_balance`].

   We set this to around 60 seconds to make sure that the tests still
   pass in slower environments like the CI.

   [`assert_eventual_balance`]: ChainHandleExt::assert_eventual_balance
*/
const WAIT_BALANCE_ATTEMPTS: u16 = 60;

/**
   A handle to a chain that has already been started.

   Implementations are expected to be cheap to clone, and to be safe to
   share between threads for read access.
*/
pub trait ChainHandle: Clone + Send + Sync + 'static {
    fn chain_id(&self) -> ChainId;

    fn config(&self) -> &ChainConfig;

    /**
       The native denomination of the chain.
    */
    fn denom(&self) -> String {
        self.config().denom.clone()
    }

    /**
       The address of the chain's default account, encoded with the given
       bech32 prefix.
    */
    fn bech32_address(&self, prefix: &str) -> Result<String, Error>;

    fn query_balance(&self, address: &str, denom: &str) -> Result<u128, Error>;

    /**
       The RPC endpoint a relayer process can reach the chain at, if the
       chain runs as a real node.
    */
    fn rpc_address(&self) -> Option<String> {
        None
    }

    /**
       Send an ICS-20 token transfer from the chain's default account over
       the local `channel_id`. The packet still needs to be relayed.
    */
    fn ibc_transfer(
        &self,
        channel_id: &ChannelId,
        receiver: &str,
        denom: &str,
        amount: u128,
    ) -> Result<(), Error>;
}

pub trait ChainHandleExt: ChainHandle {
    /**
       The default account address, with the chain's own bech32 prefix.
    */
    fn address(&self) -> Result<String, Error>;

    /**
       Assert that an account should eventually hold exactly `amount` of
       `denom`.
    */
    fn assert_eventual_balance(&self, address: &str, denom: &str, amount: u128) -> Result<(), Error>;
}

impl<Chain: ChainHandle> ChainHandleExt for Chain {
    fn address(&self) -> Result<String, Error> {
        self.bech32_address(&self.config().bech32_prefix)
    }

    fn assert_eventual_balance(&self, address: &str, denom: &str, amount: u128) -> Result<(), Error> {
        assert_eventually_succeed(
            &format!("account {address} reach {amount}{denom} on {}", self.chain_id()),
            WAIT_BALANCE_ATTEMPTS,
            Duration::from_secs(1),
            || {
                let balance = self.query_balance(address, denom)?;

                if balance == amount {
                    Ok(())
                } else {
                    Err(Error::generic(eyre!(
                        "current balance of account {} with amount {}{} does not match the target amount {}{}",
                        address,
                        balance,
                        denom,
                        amount,
                        denom
                    )))
                }
            },
        )
    }
}
