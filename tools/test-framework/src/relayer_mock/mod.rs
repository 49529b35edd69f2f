/*!
   In-memory chains and relayer implementing
   [`ChainHandle`](crate::chain::handle::ChainHandle) and
   [`RelayerHandle`](crate::relayer::handle::RelayerHandle), for running
   topologies without spawning any process.
*/

pub mod bootstrap;
pub mod chain;
pub mod relayer;
pub mod util;
