/*!
   Channel, connection and client records as reported by a relayer, and
   the per-chain channel records produced by channel discovery.
*/

use core::str::FromStr;
use eyre::eyre;
use serde::Deserialize;

use ibc_relayer_types::core::ics04_channel::channel::Ordering as Order;
use ibc_relayer_types::core::ics24_host::identifier::{
    ChainId, ChannelId, ClientId, ConnectionId, PortId,
};

use crate::error::Error;
use crate::types::env::{EnvWriter, ExportEnv};

pub const STATE_OPEN: &str = "STATE_OPEN";

/**
   The remote end of a channel. The channel ID is only known once the
   counterparty has answered the handshake, so it is `None` for channels
   still in `STATE_INIT`.
*/
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelCounterparty {
    pub port_id: PortId,
    pub channel_id: Option<ChannelId>,
}

/**
   A channel end as seen from the chain that was queried.
*/
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelInfo {
    pub state: String,
    pub ordering: Order,
    pub version: String,
    pub port_id: PortId,
    pub channel_id: ChannelId,
    pub connection_hops: Vec<ConnectionId>,
    pub counterparty: ChannelCounterparty,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionInfo {
    pub connection_id: ConnectionId,
    pub client_id: ClientId,
    pub state: String,
    pub counterparty_client_id: ClientId,
    pub counterparty_connection_id: Option<ConnectionId>,
}

/**
   A light client hosted on the queried chain, tracking `tracked_chain_id`.
*/
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientInfo {
    pub client_id: ClientId,
    pub tracked_chain_id: ChainId,
}

/**
   The outcome of discovery for one side of one path: the channel as seen
   by `chain_id`. The channel ID is always local to `chain_id`, and the
   remote side only ever appears under `channel.counterparty`.
*/
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelRecord {
    pub chain_id: ChainId,
    pub path: String,
    pub channel: ChannelInfo,
}

impl ChannelInfo {
    pub fn is_open(&self) -> bool {
        self.state == STATE_OPEN
    }

    pub fn is_ordered(&self) -> bool {
        self.ordering == Order::Ordered
    }

    /**
       The counterparty channel ID, failing for channels whose handshake
       has not reached the counterparty yet.
    */
    pub fn counterparty_channel_id(&self) -> Result<&ChannelId, Error> {
        self.counterparty.channel_id.as_ref().ok_or_else(|| {
            Error::generic(eyre!(
                "channel {}/{} has no counterparty channel yet",
                self.port_id,
                self.channel_id
            ))
        })
    }

    /**
       The single connection the channel is built on, or `None` for
       multi-hop channels.
    */
    pub fn single_hop(&self) -> Option<&ConnectionId> {
        match self.connection_hops.as_slice() {
            [connection_id] => Some(connection_id),
            _ => None,
        }
    }
}

impl ChannelRecord {
    pub fn new(chain_id: ChainId, path: &str, channel: ChannelInfo) -> Self {
        Self {
            chain_id,
            path: path.to_string(),
            channel,
        }
    }

    pub fn channel_id(&self) -> &ChannelId {
        &self.channel.channel_id
    }

    pub fn port_id(&self) -> &PortId {
        &self.channel.port_id
    }

    pub fn ordering(&self) -> Order {
        self.channel.ordering
    }

    pub fn counterparty_channel_id(&self) -> Option<&ChannelId> {
        self.channel.counterparty.channel_id.as_ref()
    }

    pub fn counterparty_port_id(&self) -> &PortId {
        &self.channel.counterparty.port_id
    }
}

impl ExportEnv for ChannelRecord {
    fn export_env(&self, writer: &mut impl EnvWriter) {
        writer.write_env("IBC_PATH", &self.path);
        writer.write_env("CHAIN_ID", self.chain_id.as_str());
        writer.write_env("CHANNEL_ID", self.channel_id().as_str());
        writer.write_env("PORT_ID", self.port_id().as_str());
        writer.write_env("ORDERING", self.ordering().as_str());
        if let Some(channel_id) = self.counterparty_channel_id() {
            writer.write_env("COUNTERPARTY_CHANNEL_ID", channel_id.as_str());
        }
        writer.write_env("COUNTERPARTY_PORT_ID", self.counterparty_port_id().as_str());
    }
}

/*
   Raw shapes of the JSON lines printed by `rly q channels`,
   `rly q connections` and `rly q clients`. Identifiers are validated when
   converting into the typed records above.
*/

#[derive(Debug, Deserialize)]
pub struct RawChannelCounterparty {
    pub port_id: String,
    #[serde(default)]
    pub channel_id: String,
}

#[derive(Debug, Deserialize)]
pub struct RawChannel {
    pub state: String,
    pub ordering: String,
    #[serde(default)]
    pub version: String,
    pub port_id: String,
    pub channel_id: String,
    #[serde(default)]
    pub connection_hops: Vec<String>,
    pub counterparty: RawChannelCounterparty,
}

#[derive(Debug, Deserialize)]
pub struct RawConnectionCounterparty {
    pub client_id: String,
    #[serde(default)]
    pub connection_id: String,
}

#[derive(Debug, Deserialize)]
pub struct RawConnection {
    pub id: String,
    pub client_id: String,
    pub state: String,
    pub counterparty: RawConnectionCounterparty,
}

#[derive(Debug, Deserialize)]
pub struct RawClientState {
    pub chain_id: String,
}

#[derive(Debug, Deserialize)]
pub struct RawClient {
    pub client_id: String,
    pub client_state: RawClientState,
}

fn parse_id<T: FromStr>(kind: &str, raw: &str) -> Result<T, Error>
where
    T::Err: core::fmt::Display,
{
    raw.parse()
        .map_err(|e| Error::generic(eyre!("invalid {} '{}': {}", kind, raw, e)))
}

impl TryFrom<RawChannel> for ChannelInfo {
    type Error = Error;

    fn try_from(raw: RawChannel) -> Result<Self, Error> {
        let counterparty_channel_id = if raw.counterparty.channel_id.is_empty() {
            None
        } else {
            Some(parse_id("channel id", &raw.counterparty.channel_id)?)
        };

        let connection_hops = raw
            .connection_hops
            .iter()
            .map(|hop| parse_id("connection id", hop))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            state: raw.state,
            ordering: parse_id("channel ordering", &raw.ordering)?,
            version: raw.version,
            port_id: parse_id("port id", &raw.port_id)?,
            channel_id: parse_id("channel id", &raw.channel_id)?,
            connection_hops,
            counterparty: ChannelCounterparty {
                port_id: parse_id("port id", &raw.counterparty.port_id)?,
                channel_id: counterparty_channel_id,
            },
        })
    }
}

impl TryFrom<RawConnection> for ConnectionInfo {
    type Error = Error;

    fn try_from(raw: RawConnection) -> Result<Self, Error> {
        let counterparty_connection_id = if raw.counterparty.connection_id.is_empty() {
            None
        } else {
            Some(parse_id("connection id", &raw.counterparty.connection_id)?)
        };

        Ok(Self {
            connection_id: parse_id("connection id", &raw.id)?,
            client_id: parse_id("client id", &raw.client_id)?,
            state: raw.state,
            counterparty_client_id: parse_id("client id", &raw.counterparty.client_id)?,
            counterparty_connection_id,
        })
    }
}

impl TryFrom<RawClient> for ClientInfo {
    type Error = Error;

    fn try_from(raw: RawClient) -> Result<Self, Error> {
        Ok(Self {
            client_id: parse_id("client id", &raw.client_id)?,
            tracked_chain_id: ChainId::from_string(&raw.client_state.chain_id),
        })
    }
}
