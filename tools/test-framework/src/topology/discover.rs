/*!
   Discovery of the channels opened for each path, once the interchain is
   built.

   Channel IDs are local to a chain, so each side of a path is queried on
   its own. For a chain and its counterparty, the candidate channels are
   found by following the relayer's view of the chain:

   1. the clients hosted on the chain that track the counterparty chain;
   2. the connections built on those clients;
   3. the single-hop channels built on those connections.

   The relayer does not list channels in any particular order, so the
   channel is then picked by rule: the ordered channel is the interchain
   security channel, and the unordered channel whose counterparty port is
   `transfer` is the token transfer channel. More than one match is an
   error.
*/

use std::collections::BTreeMap;
use tracing::{debug, info};

use ibc_relayer_types::core::ics24_host::identifier::ChainId;

use crate::chain::handle::ChainHandle;
use crate::error::Error;
use crate::relayer::handle::{RelayerHandle, TRANSFER_PORT};
use crate::topology::link::resolve_chain;
use crate::topology::validate::validate_paths;
use crate::types::channel::{ChannelInfo, ChannelRecord};
use crate::types::topology::{IbcPaths, PathSpec};

/**
   All open single-hop channels on `chain_id` whose connection is built on
   a client tracking `counterparty_chain_id`.
*/
pub fn channels_towards<Relayer: RelayerHandle>(
    relayer: &Relayer,
    chain_id: &ChainId,
    counterparty_chain_id: &ChainId,
) -> Result<Vec<ChannelInfo>, Error> {
    let trace = |e: Error| {
        e.add_trace(&format!(
            "failed to query channels on chain {chain_id} towards chain {counterparty_chain_id}"
        ))
    };

    let client_ids = relayer
        .get_clients(chain_id)
        .map_err(trace)?
        .into_iter()
        .filter(|client| &client.tracked_chain_id == counterparty_chain_id)
        .map(|client| client.client_id)
        .collect::<Vec<_>>();

    let connection_ids = relayer
        .get_connections(chain_id)
        .map_err(trace)?
        .into_iter()
        .filter(|connection| client_ids.contains(&connection.client_id))
        .map(|connection| connection.connection_id)
        .collect::<Vec<_>>();

    let channels = relayer
        .get_channels(chain_id)
        .map_err(trace)?
        .into_iter()
        .filter(|channel| channel.is_open())
        .filter(|channel| {
            channel
                .single_hop()
                .map(|connection_id| connection_ids.contains(connection_id))
                .unwrap_or(false)
        })
        .collect::<Vec<_>>();

    debug!(
        "found {} channels on chain {} towards chain {}: {:?}",
        channels.len(),
        chain_id,
        counterparty_chain_id,
        channels
    );

    Ok(channels)
}

fn select_one(
    chain_id: &ChainId,
    counterparty_chain_id: &ChainId,
    mut matches: Vec<ChannelInfo>,
    none_found: impl FnOnce() -> Error,
) -> Result<ChannelInfo, Error> {
    match matches.len() {
        0 => Err(none_found()),
        1 => Ok(matches.remove(0)),
        _ => Err(Error::ambiguous_channel(
            chain_id.to_string(),
            counterparty_chain_id.to_string(),
            matches
                .iter()
                .map(|channel| format!("{}/{}", channel.port_id, channel.channel_id))
                .collect(),
        )),
    }
}

/**
   Pick the token transfer channel: the unordered channel whose
   counterparty port is `transfer`.
*/
pub fn select_transfer_channel(
    chain_id: &ChainId,
    counterparty_chain_id: &ChainId,
    channels: Vec<ChannelInfo>,
) -> Result<ChannelInfo, Error> {
    let matches = channels
        .into_iter()
        .filter(|channel| !channel.is_ordered())
        .filter(|channel| channel.counterparty.port_id.as_str() == TRANSFER_PORT)
        .collect();

    select_one(chain_id, counterparty_chain_id, matches, || {
        Error::no_transfer_channel(chain_id.to_string(), counterparty_chain_id.to_string())
    })
}

/**
   Pick the interchain security channel: the ordered channel.
*/
pub fn select_ics_channel(
    chain_id: &ChainId,
    counterparty_chain_id: &ChainId,
    channels: Vec<ChannelInfo>,
) -> Result<ChannelInfo, Error> {
    let matches = channels
        .into_iter()
        .filter(ChannelInfo::is_ordered)
        .collect();

    select_one(chain_id, counterparty_chain_id, matches, || {
        Error::no_ics_channel(chain_id.to_string(), counterparty_chain_id.to_string())
    })
}

pub fn get_transfer_channel<Relayer: RelayerHandle>(
    relayer: &Relayer,
    chain_id: &ChainId,
    counterparty_chain_id: &ChainId,
) -> Result<ChannelInfo, Error> {
    let channels = channels_towards(relayer, chain_id, counterparty_chain_id)?;
    select_transfer_channel(chain_id, counterparty_chain_id, channels)
}

pub fn get_ics_channel<Relayer: RelayerHandle>(
    relayer: &Relayer,
    chain_id: &ChainId,
    counterparty_chain_id: &ChainId,
) -> Result<ChannelInfo, Error> {
    let channels = channels_towards(relayer, chain_id, counterparty_chain_id)?;
    select_ics_channel(chain_id, counterparty_chain_id, channels)
}

/**
   Check that the two channel ends of a path name each other as
   counterparty.
*/
pub fn verify_channel_pair(
    path: &str,
    record_a: &ChannelRecord,
    record_b: &ChannelRecord,
) -> Result<(), Error> {
    if record_a.counterparty_channel_id() == Some(record_b.channel_id())
        && record_b.counterparty_channel_id() == Some(record_a.channel_id())
    {
        Ok(())
    } else {
        Err(Error::channel_mismatch(
            path.to_string(),
            record_a.chain_id.to_string(),
            record_a.channel_id().to_string(),
            record_b.chain_id.to_string(),
            record_b.channel_id().to_string(),
        ))
    }
}

fn discover_pair<Chain, Relayer>(
    spec: &PathSpec,
    chains: &[Chain],
    relayer: &Relayer,
    query: impl Fn(&Relayer, &ChainId, &ChainId) -> Result<ChannelInfo, Error>,
) -> Result<[ChannelRecord; 2], Error>
where
    Chain: ChainHandle,
    Relayer: RelayerHandle,
{
    let chain_a = resolve_chain(chains, &spec.name, spec.chain_a)?.chain_id();
    let chain_b = resolve_chain(chains, &spec.name, spec.chain_b)?.chain_id();

    let trace = |e: Error| {
        e.add_trace(&format!(
            "failed to discover channels of path {} between {} and {}",
            spec.name, chain_a, chain_b
        ))
    };

    let channel_a = query(relayer, &chain_a, &chain_b).map_err(trace)?;
    let channel_b = query(relayer, &chain_b, &chain_a).map_err(trace)?;

    let record_a = ChannelRecord::new(chain_a, &spec.name, channel_a);
    let record_b = ChannelRecord::new(chain_b, &spec.name, channel_b);

    verify_channel_pair(&spec.name, &record_a, &record_b)?;

    info!(
        "discovered channels for path {}: {}/{} <=> {}/{}",
        spec.name,
        record_a.chain_id,
        record_a.channel_id(),
        record_b.chain_id,
        record_b.channel_id()
    );

    Ok([record_a, record_b])
}

/**
   Query the transfer channel of every path, from both sides. Returns two
   records per path, in path order, the first one for the first chain of
   the path.

   The relayer is queried on every call. A failing query fails the whole
   discovery, so this should only be called after the interchain is built.
*/
pub fn get_channel_connections<Chain, Relayer>(
    paths: &IbcPaths,
    chains: &[Chain],
    relayer: &Relayer,
) -> Result<Vec<ChannelRecord>, Error>
where
    Chain: ChainHandle,
    Relayer: RelayerHandle,
{
    let specs = validate_paths(paths, chains.len())?;
    discover_channels(&specs, chains, relayer, get_transfer_channel::<Relayer>)
}

/**
   Query the interchain security channel of every provider/consumer path,
   from both sides.
*/
pub fn get_ics_channel_connections<Chain, Relayer>(
    paths: &IbcPaths,
    chains: &[Chain],
    relayer: &Relayer,
) -> Result<Vec<ChannelRecord>, Error>
where
    Chain: ChainHandle,
    Relayer: RelayerHandle,
{
    let specs = validate_paths(paths, chains.len())?;
    discover_channels(&specs, chains, relayer, get_ics_channel::<Relayer>)
}

pub fn discover_channels<Chain, Relayer>(
    specs: &[PathSpec],
    chains: &[Chain],
    relayer: &Relayer,
    query: impl Fn(&Relayer, &ChainId, &ChainId) -> Result<ChannelInfo, Error>,
) -> Result<Vec<ChannelRecord>, Error>
where
    Chain: ChainHandle,
    Relayer: RelayerHandle,
{
    let mut records = Vec::with_capacity(specs.len() * 2);

    for spec in specs {
        records.extend(discover_pair(spec, chains, relayer, &query)?);
    }

    Ok(records)
}

/**
   Group channel records by the chain they were discovered on.
*/
pub fn channels_by_chain(records: &[ChannelRecord]) -> BTreeMap<String, Vec<ChannelRecord>> {
    let mut grouped = BTreeMap::<String, Vec<ChannelRecord>>::new();

    for record in records {
        grouped
            .entry(record.chain_id.to_string())
            .or_default()
            .push(record.clone());
    }

    grouped
}

#[cfg(test)]
mod tests {
    use super::*;

    use core::str::FromStr;
    use test_log::test;

    use ibc_relayer_types::core::ics04_channel::channel::Ordering as Order;
    use ibc_relayer_types::core::ics24_host::identifier::{ChannelId, ConnectionId, PortId};

    use crate::error::ErrorDetail;
    use crate::types::channel::{ChannelCounterparty, STATE_OPEN};

    fn channel(port: &str, id: u64, ordering: Order, counterparty_port: &str) -> ChannelInfo {
        ChannelInfo {
            state: STATE_OPEN.to_string(),
            ordering,
            version: String::new(),
            port_id: PortId::from_str(port).unwrap(),
            channel_id: ChannelId::new(id),
            connection_hops: vec![ConnectionId::new(0)],
            counterparty: ChannelCounterparty {
                port_id: PortId::from_str(counterparty_port).unwrap(),
                channel_id: Some(ChannelId::new(id)),
            },
        }
    }

    fn ids() -> (ChainId, ChainId) {
        (
            ChainId::from_string("gaia-1"),
            ChainId::from_string("neutron-2"),
        )
    }

    #[test]
    fn transfer_channel_skips_ordered_and_other_ports() {
        let (a, b) = ids();

        let selected = select_transfer_channel(
            &a,
            &b,
            vec![
                channel("provider", 0, Order::Ordered, "consumer"),
                channel("icahost", 1, Order::Unordered, "icacontroller-x"),
                channel("transfer", 2, Order::Unordered, "transfer"),
            ],
        )
        .unwrap();

        assert_eq!(selected.channel_id, ChannelId::new(2));
    }

    #[test]
    fn ics_channel_is_the_ordered_one() {
        let (a, b) = ids();

        let selected = select_ics_channel(
            &a,
            &b,
            vec![
                channel("transfer", 1, Order::Unordered, "transfer"),
                channel("provider", 0, Order::Ordered, "consumer"),
            ],
        )
        .unwrap();

        assert_eq!(selected.port_id.as_str(), "provider");
    }

    #[test]
    fn two_transfer_channels_are_ambiguous() {
        let (a, b) = ids();

        let err = select_transfer_channel(
            &a,
            &b,
            vec![
                channel("transfer", 0, Order::Unordered, "transfer"),
                channel("transfer", 3, Order::Unordered, "transfer"),
            ],
        )
        .unwrap_err();

        match err.detail() {
            ErrorDetail::AmbiguousChannel(e) => {
                assert_eq!(e.candidates, vec!["transfer/channel-0", "transfer/channel-3"]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn no_ordered_channel() {
        let (a, b) = ids();

        let err = select_ics_channel(&a, &b, vec![channel("transfer", 0, Order::Unordered, "transfer")])
            .unwrap_err();

        match err.detail() {
            ErrorDetail::NoIcsChannel(e) => {
                assert_eq!(e.chain_id, "gaia-1");
                assert_eq!(e.counterparty_chain_id, "neutron-2");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn mismatched_pair_is_rejected() {
        let (a, b) = ids();

        let record_a = ChannelRecord::new(a, "p1", channel("transfer", 0, Order::Unordered, "transfer"));
        let mut record_b = ChannelRecord::new(b, "p1", channel("transfer", 0, Order::Unordered, "transfer"));

        verify_channel_pair("p1", &record_a, &record_b).unwrap();

        record_b.channel.channel_id = ChannelId::new(4);

        let err = verify_channel_pair("p1", &record_a, &record_b).unwrap_err();
        assert!(matches!(err.detail(), ErrorDetail::ChannelMismatch(_)));
    }

    mod over_mock_relayer {
        use super::*;
        use test_log::test;

        use crate::chain::builtin::builtin_chain_configs;
        use crate::relayer::handle::ChannelOptions;
        use crate::relayer_mock::chain::MockChain;
        use crate::relayer_mock::relayer::MockRelayer;

        fn setup(links: &[(&str, usize, usize)]) -> (Vec<MockChain>, MockRelayer) {
            let names = ["gaia", "neutron", "stride"].map(String::from);

            let chains = builtin_chain_configs(&names)
                .unwrap()
                .into_iter()
                .map(|config| MockChain::new(config, b"{}").unwrap())
                .collect::<Vec<_>>();

            let relayer = MockRelayer::new();
            for chain in &chains {
                relayer.add_chain(chain.clone()).unwrap();
            }

            for (path, a, b) in links {
                relayer
                    .generate_path(&chains[*a].chain_id(), &chains[*b].chain_id(), path)
                    .unwrap();
                relayer.link_path(path, &ChannelOptions::transfer()).unwrap();
            }

            (chains, relayer)
        }

        fn paths(entries: &[(&str, [usize; 2])]) -> IbcPaths {
            entries
                .iter()
                .map(|(name, indices)| (name.to_string(), indices.to_vec()))
                .collect()
        }

        #[test]
        fn two_paths_sharing_a_chain() {
            let (chains, relayer) = setup(&[("p1", 0, 1), ("p2", 0, 2)]);

            let records = get_channel_connections(
                &paths(&[("p1", [0, 1]), ("p2", [0, 2])]),
                &chains,
                &relayer,
            )
            .unwrap();

            assert_eq!(records.len(), 4);

            for pair in records.chunks(2) {
                assert_eq!(pair[0].path, pair[1].path);
                assert_eq!(pair[0].counterparty_channel_id(), Some(pair[1].channel_id()));
                assert_eq!(pair[1].counterparty_channel_id(), Some(pair[0].channel_id()));
            }

            let gaia = &channels_by_chain(&records)["gaia-1"];
            assert_eq!(gaia.len(), 2);
            assert_ne!(gaia[0].channel_id(), gaia[1].channel_id());
        }

        #[test]
        fn channels_in_handshake_are_skipped() {
            let (chains, relayer) = setup(&[("p1", 0, 1)]);

            let gaia = &chains[0];
            let pending = gaia.next_channel_id().unwrap();

            gaia.add_channel(ChannelInfo {
                state: "STATE_INIT".to_string(),
                ordering: Order::Unordered,
                version: "ics20-1".to_string(),
                port_id: PortId::transfer(),
                channel_id: pending.clone(),
                connection_hops: vec![ConnectionId::new(0)],
                counterparty: ChannelCounterparty {
                    port_id: PortId::transfer(),
                    channel_id: None,
                },
            })
            .unwrap();

            let records =
                get_channel_connections(&paths(&[("p1", [0, 1])]), &chains, &relayer).unwrap();

            assert_eq!(records.len(), 2);
            assert_ne!(records[0].channel_id(), &pending);
        }

        #[test]
        fn unbuilt_path_names_the_chain_pair() {
            let (chains, relayer) = setup(&[("p1", 0, 1)]);

            let err = get_channel_connections(
                &paths(&[("p1", [0, 1]), ("p3", [1, 2])]),
                &chains,
                &relayer,
            )
            .unwrap_err();

            assert!(matches!(err.detail(), ErrorDetail::NoTransferChannel(_)));

            let report = format!("{err:?}");
            assert!(report.contains("p3"), "{report}");
            assert!(report.contains("between neutron-2 and stride-1"), "{report}");
        }

        #[test]
        fn ics_channels_of_provider_consumer_path() {
            let (chains, relayer) = setup(&[]);

            relayer
                .generate_path(&chains[1].chain_id(), &chains[0].chain_id(), "ics")
                .unwrap();
            relayer.link_path("ics", &ChannelOptions::ics()).unwrap();
            relayer
                .create_channel("ics", &ChannelOptions::transfer())
                .unwrap();

            let records =
                get_ics_channel_connections(&paths(&[("ics", [0, 1])]), &chains, &relayer)
                    .unwrap();

            assert_eq!(records.len(), 2);
            assert_eq!(records[0].port_id().as_str(), "provider");
            assert_eq!(records[1].port_id().as_str(), "consumer");
            assert!(records.iter().all(|record| record.ordering() == Order::Ordered));
        }
    }

    #[test]
    fn records_are_grouped_per_chain() {
        let (a, b) = ids();

        let records = vec![
            ChannelRecord::new(a.clone(), "p1", channel("transfer", 0, Order::Unordered, "transfer")),
            ChannelRecord::new(b, "p1", channel("transfer", 0, Order::Unordered, "transfer")),
            ChannelRecord::new(a, "p2", channel("transfer", 1, Order::Unordered, "transfer")),
        ];

        let grouped = channels_by_chain(&records);

        assert_eq!(grouped["gaia-1"].len(), 2);
        assert_eq!(grouped["neutron-2"].len(), 1);
    }
}
