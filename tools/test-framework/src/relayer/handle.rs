/*!
   The operations the topology code needs from a relayer.
*/

use ibc_relayer_types::core::ics04_channel::channel::Ordering as Order;
use ibc_relayer_types::core::ics24_host::identifier::{ChainId, ChannelId};

use crate::error::Error;
use crate::types::channel::{ChannelInfo, ClientInfo, ConnectionInfo};

pub const TRANSFER_PORT: &str = "transfer";
pub const TRANSFER_VERSION: &str = "ics20-1";

pub const CONSUMER_PORT: &str = "consumer";
pub const PROVIDER_PORT: &str = "provider";
pub const ICS_VERSION: &str = "1";

/**
   Ports, ordering and version of a channel to be opened on a path.
   The source side is the first chain of the path.
*/
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelOptions {
    pub src_port: String,
    pub dst_port: String,
    pub ordering: Order,
    pub version: String,
}

impl ChannelOptions {
    /**
       An unordered ICS-20 token transfer channel.
    */
    pub fn transfer() -> Self {
        Self {
            src_port: TRANSFER_PORT.to_string(),
            dst_port: TRANSFER_PORT.to_string(),
            ordering: Order::Unordered,
            version: TRANSFER_VERSION.to_string(),
        }
    }

    /**
       The ordered interchain security channel, opened from the consumer
       side towards the provider.
    */
    pub fn ics() -> Self {
        Self {
            src_port: CONSUMER_PORT.to_string(),
            dst_port: PROVIDER_PORT.to_string(),
            ordering: Order::Ordered,
            version: ICS_VERSION.to_string(),
        }
    }
}

/**
   A handle to a relayer that is already running, or that can be invoked
   on demand.

   Chains are named by their chain ID and paths by the name they were
   registered under.
*/
pub trait RelayerHandle: Clone + Send + Sync + 'static {
    /**
       Register a new path between two chains, without creating anything
       on chain yet.
    */
    fn generate_path(&self, chain_a: &ChainId, chain_b: &ChainId, path: &str) -> Result<(), Error>;

    /**
       Create the clients, the connection and a first channel on a path.
    */
    fn link_path(&self, path: &str, options: &ChannelOptions) -> Result<(), Error>;

    /**
       Open an additional channel over the connection of an already linked
       path.
    */
    fn create_channel(&self, path: &str, options: &ChannelOptions) -> Result<(), Error>;

    /**
       Relay the pending packets sent over `channel_id`, which is local to
       the first chain of the path.
    */
    fn flush_packets(&self, path: &str, channel_id: &ChannelId) -> Result<(), Error>;

    fn flush_acknowledgements(&self, path: &str, channel_id: &ChannelId) -> Result<(), Error>;

    fn get_channels(&self, chain_id: &ChainId) -> Result<Vec<ChannelInfo>, Error>;

    fn get_connections(&self, chain_id: &ChainId) -> Result<Vec<ConnectionInfo>, Error>;

    fn get_clients(&self, chain_id: &ChainId) -> Result<Vec<ClientInfo>, Error>;
}
