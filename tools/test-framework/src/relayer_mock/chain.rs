//! An in-memory chain. It keeps the patched genesis document, the bank
//! balances, and the IBC clients, connections and channels created on it
//! by the [`MockRelayer`](crate::relayer_mock::relayer::MockRelayer).
//! Token transfers are queued as packets until the relayer delivers them.

use bech32::{ToBase32, Variant};
use core::str::FromStr;
use eyre::eyre;
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tracing::debug;

use ibc_relayer_types::core::ics24_host::identifier::{
    ChainId, ChannelId, ClientId, ConnectionId, PortId,
};

use crate::chain::config::ChainConfig;
use crate::chain::genesis::parse_genesis;
use crate::chain::handle::ChainHandle;
use crate::error::{handle_generic_error, Error};
use crate::ibc::denom::{derive_ibc_denom, Denom};
use crate::relayer::handle::TRANSFER_PORT;
use crate::relayer_mock::util::MutexUtil;
use crate::types::channel::{ChannelInfo, ClientInfo, ConnectionInfo, STATE_OPEN};

pub const DEFAULT_ACCOUNT: &str = "default";

#[derive(Debug, Clone)]
pub struct TransferPacket {
    pub sequence: u64,
    pub source_port: PortId,
    pub source_channel: ChannelId,
    pub destination_port: PortId,
    pub destination_channel: ChannelId,
    /// The denom as known on the sending chain.
    pub denom: Denom,
    pub amount: u128,
    pub sender: String,
    pub receiver: String,
}

#[derive(Debug, Default)]
pub struct MockChainState {
    pub genesis: Value,
    pub balances: HashMap<(String, String), u128>,
    pub denom_traces: HashMap<String, Denom>,
    pub clients: Vec<ClientInfo>,
    pub connections: Vec<ConnectionInfo>,
    pub channels: Vec<ChannelInfo>,
    pub next_sequence: u64,
    pub outgoing_packets: Vec<TransferPacket>,
    /// Sent packets whose acknowledgement has not been relayed back yet.
    pub unacknowledged: Vec<(ChannelId, u64)>,
    /// Acknowledgements written for received packets, by destination channel.
    pub written_acks: Vec<(ChannelId, u64)>,
}

#[derive(Debug, Clone)]
pub struct MockChain {
    config: Arc<ChainConfig>,
    state: Arc<Mutex<MockChainState>>,
}

impl MockChain {
    /**
       Create a chain from a raw genesis document, after running it
       through the genesis modifier of `config`.
    */
    pub fn new(config: ChainConfig, genesis: &[u8]) -> Result<Self, Error> {
        let patched = config.apply_genesis_modifier(genesis)?;
        let genesis = parse_genesis(&patched)?;

        debug!("created mock chain {} from genesis", config.chain_id);

        Ok(Self {
            config: Arc::new(config),
            state: Arc::new(Mutex::new(MockChainState {
                genesis,
                next_sequence: 1,
                ..Default::default()
            })),
        })
    }

    pub fn genesis(&self) -> Result<Value, Error> {
        Ok(self.state.acquire_mutex()?.genesis.clone())
    }

    /**
       The address of a named account on this chain. Addresses are derived
       from the chain ID and the account name, so they are stable across
       runs.
    */
    pub fn account_address(&self, name: &str) -> Result<String, Error> {
        encode_address(&self.config.bech32_prefix, &self.config.chain_id, name)
    }

    pub fn default_address(&self) -> Result<String, Error> {
        self.account_address(DEFAULT_ACCOUNT)
    }

    pub fn fund(&self, address: &str, denom: &str, amount: u128) -> Result<(), Error> {
        let mut state = self.state.acquire_mutex()?;

        *state
            .balances
            .entry((address.to_string(), denom.to_string()))
            .or_default() += amount;

        Ok(())
    }

    pub fn create_client(&self, tracked_chain_id: &ChainId) -> Result<ClientId, Error> {
        let mut state = self.state.acquire_mutex()?;

        let raw = format!("07-tendermint-{}", state.clients.len());
        let client_id = ClientId::from_str(&raw)
            .map_err(|e| Error::generic(eyre!("invalid client id {}: {}", raw, e)))?;

        state.clients.push(ClientInfo {
            client_id: client_id.clone(),
            tracked_chain_id: tracked_chain_id.clone(),
        });

        Ok(client_id)
    }

    pub fn open_connection(
        &self,
        client_id: &ClientId,
        counterparty_client_id: &ClientId,
        counterparty_connection_id: Option<ConnectionId>,
    ) -> Result<ConnectionId, Error> {
        let mut state = self.state.acquire_mutex()?;

        let connection_id = ConnectionId::new(state.connections.len() as u64);

        state.connections.push(ConnectionInfo {
            connection_id: connection_id.clone(),
            client_id: client_id.clone(),
            state: STATE_OPEN.to_string(),
            counterparty_client_id: counterparty_client_id.clone(),
            counterparty_connection_id,
        });

        Ok(connection_id)
    }

    pub fn set_connection_counterparty(
        &self,
        connection_id: &ConnectionId,
        counterparty_connection_id: &ConnectionId,
    ) -> Result<(), Error> {
        let mut state = self.state.acquire_mutex()?;

        let connection = state
            .connections
            .iter_mut()
            .find(|connection| &connection.connection_id == connection_id)
            .ok_or_else(|| {
                Error::generic(eyre!(
                    "connection {} not found on chain {}",
                    connection_id,
                    self.config.chain_id
                ))
            })?;

        connection.counterparty_connection_id = Some(counterparty_connection_id.clone());

        Ok(())
    }

    /**
       The ID the next channel opened on this chain will get.
    */
    pub fn next_channel_id(&self) -> Result<ChannelId, Error> {
        Ok(ChannelId::new(self.state.acquire_mutex()?.channels.len() as u64))
    }

    pub fn add_channel(&self, channel: ChannelInfo) -> Result<(), Error> {
        let mut state = self.state.acquire_mutex()?;

        if channel.channel_id != ChannelId::new(state.channels.len() as u64) {
            return Err(Error::generic(eyre!(
                "channel {} was not allocated on chain {}",
                channel.channel_id,
                self.config.chain_id
            )));
        }

        state.channels.push(channel);

        Ok(())
    }

    pub fn clients(&self) -> Result<Vec<ClientInfo>, Error> {
        Ok(self.state.acquire_mutex()?.clients.clone())
    }

    pub fn connections(&self) -> Result<Vec<ConnectionInfo>, Error> {
        Ok(self.state.acquire_mutex()?.connections.clone())
    }

    pub fn channels(&self) -> Result<Vec<ChannelInfo>, Error> {
        Ok(self.state.acquire_mutex()?.channels.clone())
    }

    pub fn channel(&self, channel_id: &ChannelId) -> Result<ChannelInfo, Error> {
        self.channels()?
            .into_iter()
            .find(|channel| &channel.channel_id == channel_id)
            .ok_or_else(|| {
                Error::generic(eyre!(
                    "channel {} not found on chain {}",
                    channel_id,
                    self.config.chain_id
                ))
            })
    }

    /**
       Escrow or burn `amount` of `denom` from `sender` and queue an ICS-20
       packet on `channel_id`. The packet stays queued until a relayer
       flushes the channel. Returns the packet sequence.
    */
    pub fn send_transfer(
        &self,
        channel_id: &ChannelId,
        sender: &str,
        receiver: &str,
        denom: &str,
        amount: u128,
    ) -> Result<u64, Error> {
        let channel = self.channel(channel_id)?;

        if !channel.is_open() || channel.port_id.as_str() != TRANSFER_PORT {
            return Err(Error::generic(eyre!(
                "channel {}/{} on chain {} is not an open transfer channel",
                channel.port_id,
                channel.channel_id,
                self.config.chain_id
            )));
        }

        let destination_channel = channel.counterparty_channel_id()?.clone();

        let mut state = self.state.acquire_mutex()?;

        let key = (sender.to_string(), denom.to_string());
        let balance = state.balances.get(&key).copied().unwrap_or(0);

        if balance < amount {
            return Err(Error::insufficient_funds(
                sender.to_string(),
                denom.to_string(),
                balance,
                amount,
            ));
        }

        state.balances.insert(key, balance - amount);

        let sequence = state.next_sequence;
        state.next_sequence += 1;

        let denom = state
            .denom_traces
            .get(denom)
            .cloned()
            .unwrap_or_else(|| Denom::base(denom));

        state.outgoing_packets.push(TransferPacket {
            sequence,
            source_port: channel.port_id.clone(),
            source_channel: channel.channel_id.clone(),
            destination_port: channel.counterparty.port_id.clone(),
            destination_channel,
            denom,
            amount,
            sender: sender.to_string(),
            receiver: receiver.to_string(),
        });

        state.unacknowledged.push((channel.channel_id, sequence));

        Ok(sequence)
    }

    pub fn take_packets(&self, channel_id: &ChannelId) -> Result<Vec<TransferPacket>, Error> {
        let mut state = self.state.acquire_mutex()?;

        let (taken, kept): (Vec<_>, Vec<_>) = state
            .outgoing_packets
            .drain(..)
            .partition(|packet| &packet.source_channel == channel_id);

        state.outgoing_packets = kept;

        Ok(taken)
    }

    pub fn pending_packets(&self) -> Result<usize, Error> {
        Ok(self.state.acquire_mutex()?.outgoing_packets.len())
    }

    /**
       Credit the receiver of a packet. A token coming back over the
       channel it left through gets its last hop removed; any other token
       gets an `ibc/` voucher denom prefixed with this chain's channel end.
    */
    pub fn receive_packet(&self, packet: &TransferPacket) -> Result<(), Error> {
        let received = match packet
            .denom
            .strip_hop(&packet.source_port, &packet.source_channel)?
        {
            Some(unwound) => unwound,
            None => derive_ibc_denom(
                &packet.destination_port,
                &packet.destination_channel,
                &packet.denom,
            )?,
        };

        debug!(
            "chain {} receiving {}{} for {} on {}",
            self.config.chain_id,
            packet.amount,
            received,
            packet.receiver,
            packet.destination_channel
        );

        let mut state = self.state.acquire_mutex()?;

        if let Denom::Ibc { hashed, .. } = &received {
            state
                .denom_traces
                .insert(hashed.clone(), received.clone());
        }

        *state
            .balances
            .entry((packet.receiver.clone(), received.as_str().to_string()))
            .or_default() += packet.amount;

        state
            .written_acks
            .push((packet.destination_channel.clone(), packet.sequence));

        Ok(())
    }

    pub fn take_acknowledgements(&self, channel_id: &ChannelId) -> Result<Vec<u64>, Error> {
        let mut state = self.state.acquire_mutex()?;

        let (taken, kept): (Vec<_>, Vec<_>) = state
            .written_acks
            .drain(..)
            .partition(|(channel, _)| channel == channel_id);

        state.written_acks = kept;

        Ok(taken.into_iter().map(|(_, sequence)| sequence).collect())
    }

    pub fn acknowledge(&self, channel_id: &ChannelId, sequences: &[u64]) -> Result<(), Error> {
        let mut state = self.state.acquire_mutex()?;

        state
            .unacknowledged
            .retain(|(channel, sequence)| !(channel == channel_id && sequences.contains(sequence)));

        Ok(())
    }

    pub fn unacknowledged_packets(&self, channel_id: &ChannelId) -> Result<Vec<u64>, Error> {
        let state = self.state.acquire_mutex()?;

        Ok(state
            .unacknowledged
            .iter()
            .filter(|(channel, _)| channel == channel_id)
            .map(|(_, sequence)| *sequence)
            .collect())
    }
}

fn encode_address(prefix: &str, chain_id: &str, account: &str) -> Result<String, Error> {
    let mut hasher = Sha256::new();
    hasher.update(format!("{chain_id}/{account}").as_bytes());

    let digest = hasher.finalize();

    bech32::encode(prefix, digest[..20].to_vec().to_base32(), Variant::Bech32).map_err(handle_generic_error)
}

impl ChainHandle for MockChain {
    fn chain_id(&self) -> ChainId {
        self.config.id()
    }

    fn config(&self) -> &ChainConfig {
        &self.config
    }

    fn bech32_address(&self, prefix: &str) -> Result<String, Error> {
        encode_address(prefix, &self.config.chain_id, DEFAULT_ACCOUNT)
    }

    fn query_balance(&self, address: &str, denom: &str) -> Result<u128, Error> {
        let state = self.state.acquire_mutex()?;

        Ok(state
            .balances
            .get(&(address.to_string(), denom.to_string()))
            .copied()
            .unwrap_or(0))
    }

    fn ibc_transfer(
        &self,
        channel_id: &ChannelId,
        receiver: &str,
        denom: &str,
        amount: u128,
    ) -> Result<(), Error> {
        let sender = self.default_address()?;
        self.send_transfer(channel_id, &sender, receiver, denom, amount)?;

        Ok(())
    }
}
