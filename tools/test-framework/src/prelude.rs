/*!
   Re-export of common constructs that are used by test cases.
*/

pub use core::time::Duration;
pub use eyre::eyre;
pub use std::thread::sleep;
pub use tracing::{debug, error, info, warn};

pub use ibc_relayer_types::core::ics04_channel::channel::Ordering as Order;
pub use ibc_relayer_types::core::ics24_host::identifier::{
    ChainId, ChannelId, ClientId, ConnectionId, PortId,
};

pub use crate::chain::builtin::{builtin_chain_config, builtin_chain_configs};
pub use crate::chain::config::{ChainConfig, GenesisModifier};
pub use crate::chain::genesis::{
    modify_genesis_proposal_time, patch_genesis, GenesisOverride, KeyPath, PathSegment,
};
pub use crate::chain::handle::{ChainHandle, ChainHandleExt};
pub use crate::error::{handle_generic_error, Error};
pub use crate::framework::interchain::{
    run_interchain_test, ConnectedInterchain, InterchainBootstrap, InterchainTest,
};
pub use crate::ibc::denom::{derive_ibc_denom, Denom};
pub use crate::interchain::builder::{Interchain, NetworkBuilder};
pub use crate::interchain::built::{BuiltInterchain, InterchainBuildOptions};
pub use crate::key_path;
pub use crate::relayer::bootstrap::RlyBootstrap;
pub use crate::relayer::handle::{ChannelOptions, RelayerHandle};
pub use crate::relayer::rly::RlyRelayer;
pub use crate::relayer_mock::bootstrap::MockBootstrap;
pub use crate::relayer_mock::chain::MockChain;
pub use crate::relayer_mock::relayer::MockRelayer;
pub use crate::topology::discover::{get_channel_connections, get_ics_channel_connections};
pub use crate::topology::link::{link_ibc_paths, link_provider_consumer_paths};
pub use crate::topology::validate::{validate_topology, verify_ibc_paths};
pub use crate::types::channel::{ChannelInfo, ChannelRecord};
pub use crate::types::config::TestConfig;
pub use crate::types::link::{InterchainLink, ProviderConsumerLink};
pub use crate::types::topology::{IbcPaths, PathSpec, TopologyConfig};
pub use crate::util::assert::*;
pub use crate::util::interchain_security::{modify_consumer_gov_genesis, modify_consumer_genesis};
pub use crate::util::random::{random_string, random_u128_range};
pub use crate::util::retry::assert_eventually_succeed;
pub use crate::util::suspend::suspend;
