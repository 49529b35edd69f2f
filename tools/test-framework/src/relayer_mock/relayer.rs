//! A relayer over [`MockChain`]s. Paths, clients, connections and
//! channels are created synchronously, and packets are only delivered when
//! a channel is flushed.

use core::str::FromStr;
use eyre::eyre;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use tracing::{debug, info};

use ibc_relayer_types::core::ics24_host::identifier::{ChainId, ChannelId, ConnectionId, PortId};

use crate::chain::handle::ChainHandle;
use crate::error::Error;
use crate::relayer::handle::{ChannelOptions, RelayerHandle};
use crate::relayer_mock::chain::MockChain;
use crate::relayer_mock::util::MutexUtil;
use crate::types::channel::{ChannelCounterparty, ChannelInfo, ClientInfo, ConnectionInfo, STATE_OPEN};

#[derive(Debug, Clone)]
pub struct MockPath {
    pub chain_a: ChainId,
    pub chain_b: ChainId,
    /// The connection ends on chain A and chain B, once linked.
    pub connection: Option<(ConnectionId, ConnectionId)>,
}

#[derive(Debug, Default)]
pub struct MockRelayerState {
    pub chains: BTreeMap<String, MockChain>,
    pub paths: BTreeMap<String, MockPath>,
}

#[derive(Debug, Clone, Default)]
pub struct MockRelayer {
    state: Arc<Mutex<MockRelayerState>>,
}

fn parse_port(port: &str) -> Result<PortId, Error> {
    PortId::from_str(port).map_err(|e| Error::generic(eyre!("invalid port id {}: {}", port, e)))
}

impl MockRelayer {
    pub fn new() -> Self {
        Self::default()
    }

    /**
       Make a chain known to the relayer, under its chain ID.
    */
    pub fn add_chain(&self, chain: MockChain) -> Result<(), Error> {
        let chain_id = chain.chain_id().to_string();
        let mut state = self.state.acquire_mutex()?;

        if state.chains.contains_key(&chain_id) {
            return Err(Error::duplicate_chain(chain_id));
        }

        state.chains.insert(chain_id, chain);

        Ok(())
    }

    pub fn chain(&self, chain_id: &ChainId) -> Result<MockChain, Error> {
        self.state
            .acquire_mutex()?
            .chains
            .get(chain_id.as_str())
            .cloned()
            .ok_or_else(|| Error::generic(eyre!("relayer has no chain {} configured", chain_id)))
    }

    pub fn path(&self, path: &str) -> Result<MockPath, Error> {
        self.state
            .acquire_mutex()?
            .paths
            .get(path)
            .cloned()
            .ok_or_else(|| Error::unknown_path(path.to_string()))
    }

    pub fn paths(&self) -> Result<Vec<String>, Error> {
        Ok(self.state.acquire_mutex()?.paths.keys().cloned().collect())
    }

    fn linked_chains(&self, path: &str) -> Result<(MockChain, MockChain, MockPath), Error> {
        let mock_path = self.path(path)?;

        Ok((
            self.chain(&mock_path.chain_a)?,
            self.chain(&mock_path.chain_b)?,
            mock_path,
        ))
    }

    fn open_channel(
        &self,
        chain_a: &MockChain,
        chain_b: &MockChain,
        connection: &(ConnectionId, ConnectionId),
        options: &ChannelOptions,
    ) -> Result<(ChannelId, ChannelId), Error> {
        let (src_port, dst_port) = (parse_port(&options.src_port)?, parse_port(&options.dst_port)?);

        let channel_a = chain_a.next_channel_id()?;
        let channel_b = chain_b.next_channel_id()?;

        chain_a.add_channel(ChannelInfo {
            state: STATE_OPEN.to_string(),
            ordering: options.ordering,
            version: options.version.clone(),
            port_id: src_port.clone(),
            channel_id: channel_a.clone(),
            connection_hops: vec![connection.0.clone()],
            counterparty: ChannelCounterparty {
                port_id: dst_port.clone(),
                channel_id: Some(channel_b.clone()),
            },
        })?;

        chain_b.add_channel(ChannelInfo {
            state: STATE_OPEN.to_string(),
            ordering: options.ordering,
            version: options.version.clone(),
            port_id: dst_port,
            channel_id: channel_b.clone(),
            connection_hops: vec![connection.1.clone()],
            counterparty: ChannelCounterparty {
                port_id: src_port,
                channel_id: Some(channel_a.clone()),
            },
        })?;

        info!(
            "opened channel {}/{} <=> {}/{}",
            chain_a.chain_id(),
            channel_a,
            chain_b.chain_id(),
            channel_b
        );

        Ok((channel_a, channel_b))
    }

    fn deliver_packets(
        source: &MockChain,
        destination: &MockChain,
        channel_id: &ChannelId,
    ) -> Result<usize, Error> {
        let packets = source.take_packets(channel_id)?;

        for packet in &packets {
            destination.receive_packet(packet)?;
        }

        Ok(packets.len())
    }

    fn deliver_acknowledgements(
        source: &MockChain,
        destination: &MockChain,
        channel: &ChannelInfo,
    ) -> Result<usize, Error> {
        let sequences = destination.take_acknowledgements(channel.counterparty_channel_id()?)?;

        source.acknowledge(&channel.channel_id, &sequences)?;

        Ok(sequences.len())
    }
}

impl RelayerHandle for MockRelayer {
    fn generate_path(&self, chain_a: &ChainId, chain_b: &ChainId, path: &str) -> Result<(), Error> {
        self.chain(chain_a)?;
        self.chain(chain_b)?;

        let mut state = self.state.acquire_mutex()?;

        if state.paths.contains_key(path) {
            return Err(Error::duplicate_path(path.to_string()));
        }

        state.paths.insert(
            path.to_string(),
            MockPath {
                chain_a: chain_a.clone(),
                chain_b: chain_b.clone(),
                connection: None,
            },
        );

        Ok(())
    }

    fn link_path(&self, path: &str, options: &ChannelOptions) -> Result<(), Error> {
        let (chain_a, chain_b, mock_path) = self.linked_chains(path)?;

        if mock_path.connection.is_some() {
            return Err(Error::generic(eyre!("path {} is already linked", path)));
        }

        let client_a = chain_a.create_client(&mock_path.chain_b)?;
        let client_b = chain_b.create_client(&mock_path.chain_a)?;

        let connection_a = chain_a.open_connection(&client_a, &client_b, None)?;
        let connection_b =
            chain_b.open_connection(&client_b, &client_a, Some(connection_a.clone()))?;
        chain_a.set_connection_counterparty(&connection_a, &connection_b)?;

        debug!(
            "path {}: clients {} / {}, connections {} / {}",
            path, client_a, client_b, connection_a, connection_b
        );

        let connection = (connection_a, connection_b);

        if let Some(linked) = self.state.acquire_mutex()?.paths.get_mut(path) {
            linked.connection = Some(connection.clone());
        }

        self.open_channel(&chain_a, &chain_b, &connection, options)?;

        Ok(())
    }

    fn create_channel(&self, path: &str, options: &ChannelOptions) -> Result<(), Error> {
        let (chain_a, chain_b, mock_path) = self.linked_chains(path)?;

        let connection = mock_path
            .connection
            .ok_or_else(|| Error::generic(eyre!("path {} is not linked yet", path)))?;

        self.open_channel(&chain_a, &chain_b, &connection, options)?;

        Ok(())
    }

    fn flush_packets(&self, path: &str, channel_id: &ChannelId) -> Result<(), Error> {
        let (chain_a, chain_b, _) = self.linked_chains(path)?;
        let channel = chain_a.channel(channel_id)?;

        let sent = Self::deliver_packets(&chain_a, &chain_b, &channel.channel_id)?;
        let received =
            Self::deliver_packets(&chain_b, &chain_a, channel.counterparty_channel_id()?)?;

        info!(
            "relayed {} packets from {} and {} packets from {} on path {}",
            sent,
            chain_a.chain_id(),
            received,
            chain_b.chain_id(),
            path
        );

        Ok(())
    }

    fn flush_acknowledgements(&self, path: &str, channel_id: &ChannelId) -> Result<(), Error> {
        let (chain_a, chain_b, _) = self.linked_chains(path)?;

        let channel_a = chain_a.channel(channel_id)?;
        let channel_b = chain_b.channel(channel_a.counterparty_channel_id()?)?;

        let acked_a = Self::deliver_acknowledgements(&chain_a, &chain_b, &channel_a)?;
        let acked_b = Self::deliver_acknowledgements(&chain_b, &chain_a, &channel_b)?;

        info!(
            "relayed {} acknowledgements to {} and {} to {} on path {}",
            acked_a,
            chain_a.chain_id(),
            acked_b,
            chain_b.chain_id(),
            path
        );

        Ok(())
    }

    fn get_channels(&self, chain_id: &ChainId) -> Result<Vec<ChannelInfo>, Error> {
        self.chain(chain_id)?.channels()
    }

    fn get_connections(&self, chain_id: &ChainId) -> Result<Vec<ConnectionInfo>, Error> {
        self.chain(chain_id)?.connections()
    }

    fn get_clients(&self, chain_id: &ChainId) -> Result<Vec<ClientInfo>, Error> {
        self.chain(chain_id)?.clients()
    }
}
