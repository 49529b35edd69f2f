/*!
   The builder that collects chains, relayers and links during the setup
   phase of a test, and asks the relayers to create the paths on
   [`build`](Interchain::build).
*/

use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, info};

use crate::chain::handle::ChainHandle;
use crate::error::{handle_generic_error, Error};
use crate::interchain::built::{BuiltInterchain, InterchainBuildOptions};
use crate::relayer::handle::{ChannelOptions, RelayerHandle};
use crate::types::link::{InterchainLink, LinkSummary, ProviderConsumerLink};

/**
   Anything links can be registered with.

   Registration takes the builder by exclusive reference, so all links
   are registered from a single thread before the network is built.
*/
pub trait NetworkBuilder<Chain, Relayer> {
    fn add_link(&mut self, link: InterchainLink<Chain, Relayer>) -> &mut Self;

    fn add_provider_consumer_link(&mut self, link: ProviderConsumerLink<Chain, Relayer>)
        -> &mut Self;
}

pub struct Interchain<Chain, Relayer> {
    chains: Vec<Chain>,
    relayers: Vec<(String, Relayer)>,
    links: Vec<InterchainLink<Chain, Relayer>>,
    provider_consumer_links: Vec<ProviderConsumerLink<Chain, Relayer>>,
}

impl<Chain, Relayer> Default for Interchain<Chain, Relayer> {
    fn default() -> Self {
        Self {
            chains: Vec::new(),
            relayers: Vec::new(),
            links: Vec::new(),
            provider_consumer_links: Vec::new(),
        }
    }
}

impl<Chain, Relayer> NetworkBuilder<Chain, Relayer> for Interchain<Chain, Relayer> {
    fn add_link(&mut self, link: InterchainLink<Chain, Relayer>) -> &mut Self {
        self.links.push(link);
        self
    }

    fn add_provider_consumer_link(
        &mut self,
        link: ProviderConsumerLink<Chain, Relayer>,
    ) -> &mut Self {
        self.provider_consumer_links.push(link);
        self
    }
}

impl<Chain, Relayer> Interchain<Chain, Relayer>
where
    Chain: ChainHandle,
    Relayer: RelayerHandle,
{
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_chain(&mut self, chain: Chain) -> &mut Self {
        self.chains.push(chain);
        self
    }

    pub fn add_relayer(&mut self, relayer: Relayer, name: &str) -> &mut Self {
        self.relayers.push((name.to_string(), relayer));
        self
    }

    pub fn links(&self) -> &[InterchainLink<Chain, Relayer>] {
        &self.links
    }

    pub fn provider_consumer_links(&self) -> &[ProviderConsumerLink<Chain, Relayer>] {
        &self.provider_consumer_links
    }

    pub fn link_summaries(&self) -> Vec<LinkSummary> {
        self.links
            .iter()
            .map(InterchainLink::summary)
            .chain(
                self.provider_consumer_links
                    .iter()
                    .map(ProviderConsumerLink::summary),
            )
            .collect()
    }

    fn check_topology(&self) -> Result<(), Error> {
        let mut chain_ids = BTreeSet::new();

        for chain in &self.chains {
            let chain_id = chain.chain_id().to_string();
            if !chain_ids.insert(chain_id.clone()) {
                return Err(Error::duplicate_chain(chain_id));
            }
        }

        let mut paths = BTreeSet::new();

        for link in self.link_summaries() {
            for chain_id in [&link.chain_a, &link.chain_b] {
                if !chain_ids.contains(chain_id) {
                    return Err(Error::unknown_chain(chain_id.clone(), link.path.clone()));
                }
            }

            if self.relayers.is_empty() {
                return Err(Error::missing_relayer(link.path.clone()));
            }

            if !paths.insert(link.path.clone()) {
                return Err(Error::duplicate_path(link.path));
            }
        }

        Ok(())
    }

    fn create_paths(&self) -> Result<(), Error> {
        for link in &self.links {
            let (chain_a, chain_b) = (link.chain_a.chain_id(), link.chain_b.chain_id());

            info!(
                "creating transfer path {} between {} and {}",
                link.path, chain_a, chain_b
            );

            link.relayer
                .generate_path(&chain_a, &chain_b, &link.path)
                .and_then(|_| link.relayer.link_path(&link.path, &ChannelOptions::transfer()))
                .map_err(|e| e.add_trace(&format!("failed to create path {}", link.path)))?;
        }

        for link in &self.provider_consumer_links {
            let (provider, consumer) = (link.provider.chain_id(), link.consumer.chain_id());

            info!(
                "creating provider/consumer path {} between provider {} and consumer {}",
                link.path, provider, consumer
            );

            link.relayer
                .generate_path(&consumer, &provider, &link.path)
                .and_then(|_| link.relayer.link_path(&link.path, &ChannelOptions::ics()))
                .and_then(|_| {
                    link.relayer
                        .create_channel(&link.path, &ChannelOptions::transfer())
                })
                .map_err(|e| e.add_trace(&format!("failed to create path {}", link.path)))?;
        }

        Ok(())
    }

    /**
       Check the registered topology and, unless
       [`skip_path_creation`](InterchainBuildOptions::skip_path_creation)
       is set, create every path.

       Transfer links get one unordered transfer channel. Provider/consumer
       links get the ordered interchain security channel, opened from the
       consumer, followed by a transfer channel on the same connection.
    */
    pub fn build(
        self,
        options: &InterchainBuildOptions,
    ) -> Result<BuiltInterchain<Chain, Relayer>, Error> {
        self.check_topology()?;

        let links = self.link_summaries();

        info!(
            "building interchain for test {} with {} chains and {} links",
            options.test_name,
            self.chains.len(),
            links.len()
        );

        debug!(
            "interchain links: {}",
            serde_json::to_string_pretty(&links).map_err(handle_generic_error)?
        );

        if !options.skip_path_creation {
            self.create_paths()?;
        }

        let relayers = self.relayers.into_iter().collect::<BTreeMap<_, _>>();

        Ok(BuiltInterchain::new(self.chains, relayers, links))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use test_log::test;

    use crate::chain::builtin::{gaia_config, neutron_config, stride_config};
    use crate::error::ErrorDetail;
    use crate::relayer_mock::chain::MockChain;
    use crate::relayer_mock::relayer::MockRelayer;

    fn setup() -> (MockRelayer, MockChain, MockChain, MockChain) {
        let gaia = MockChain::new(gaia_config(), b"{}").unwrap();
        let neutron = MockChain::new(neutron_config(), b"{}").unwrap();
        let stride = MockChain::new(stride_config(), b"{}").unwrap();

        let relayer = MockRelayer::new();
        for chain in [&gaia, &neutron, &stride] {
            relayer.add_chain(chain.clone()).unwrap();
        }

        (relayer, gaia, neutron, stride)
    }

    fn transfer_link(
        chain_a: &MockChain,
        chain_b: &MockChain,
        path: &str,
        relayer: &MockRelayer,
    ) -> InterchainLink<MockChain, MockRelayer> {
        InterchainLink {
            chain_a: chain_a.clone(),
            chain_b: chain_b.clone(),
            path: path.to_string(),
            relayer: relayer.clone(),
        }
    }

    #[test]
    fn build_creates_transfer_paths() {
        let (relayer, gaia, neutron, stride) = setup();

        let mut interchain = Interchain::new();
        interchain
            .add_chain(gaia.clone())
            .add_chain(neutron.clone())
            .add_chain(stride.clone())
            .add_relayer(relayer.clone(), "rly")
            .add_link(transfer_link(&gaia, &neutron, "p1", &relayer))
            .add_link(transfer_link(&gaia, &stride, "p2", &relayer));

        let built = interchain
            .build(&InterchainBuildOptions::new("transfer"))
            .unwrap();

        assert_eq!(built.chains().len(), 3);
        assert!(built.relayer("rly").is_some());
        assert_eq!(built.link("p2").unwrap().chain_b, "stride-1");

        assert_eq!(relayer.paths().unwrap(), vec!["p1", "p2"]);

        let gaia_channels = gaia.channels().unwrap();
        assert_eq!(gaia_channels.len(), 2);
        assert_ne!(gaia_channels[0].channel_id, gaia_channels[1].channel_id);
    }

    #[test]
    fn provider_consumer_path_has_two_channels() {
        let (relayer, gaia, neutron, _) = setup();

        let mut interchain = Interchain::new();
        interchain
            .add_chain(gaia.clone())
            .add_chain(neutron.clone())
            .add_relayer(relayer.clone(), "rly")
            .add_provider_consumer_link(ProviderConsumerLink {
                provider: gaia.clone(),
                consumer: neutron.clone(),
                path: "ics".to_string(),
                relayer: relayer.clone(),
            });

        interchain.build(&InterchainBuildOptions::new("ics")).unwrap();

        // The path is generated from the consumer side.
        assert_eq!(relayer.path("ics").unwrap().chain_a, neutron.chain_id());

        let channels = neutron.channels().unwrap();
        assert_eq!(channels.len(), 2);

        let (ordered, unordered): (Vec<_>, Vec<_>) =
            channels.into_iter().partition(|channel| channel.is_ordered());

        assert_eq!(ordered[0].port_id.as_str(), "consumer");
        assert_eq!(ordered[0].counterparty.port_id.as_str(), "provider");
        assert_eq!(unordered[0].port_id.as_str(), "transfer");
    }

    #[test]
    fn skip_path_creation_only_checks() {
        let (relayer, gaia, neutron, _) = setup();

        let mut interchain = Interchain::new();
        interchain
            .add_chain(gaia.clone())
            .add_chain(neutron.clone())
            .add_relayer(relayer.clone(), "rly")
            .add_link(transfer_link(&gaia, &neutron, "p1", &relayer));

        let options = InterchainBuildOptions {
            skip_path_creation: true,
            ..InterchainBuildOptions::new("skip")
        };

        let built = interchain.build(&options).unwrap();

        assert_eq!(built.links().len(), 1);
        assert!(relayer.paths().unwrap().is_empty());
        assert!(gaia.channels().unwrap().is_empty());
    }

    #[test]
    fn duplicate_chain_is_rejected() {
        let (_, gaia, _, _) = setup();

        let mut interchain = Interchain::<MockChain, MockRelayer>::new();
        interchain.add_chain(gaia.clone()).add_chain(gaia);

        let err = interchain
            .build(&InterchainBuildOptions::new("dup"))
            .unwrap_err();

        match err.detail() {
            ErrorDetail::DuplicateChain(e) => assert_eq!(e.chain_id, "gaia-1"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn link_to_unknown_chain_is_rejected() {
        let (relayer, gaia, neutron, stride) = setup();

        let mut interchain = Interchain::new();
        interchain
            .add_chain(gaia.clone())
            .add_chain(neutron)
            .add_relayer(relayer.clone(), "rly")
            .add_link(transfer_link(&gaia, &stride, "p1", &relayer));

        let err = interchain
            .build(&InterchainBuildOptions::new("unknown"))
            .unwrap_err();

        match err.detail() {
            ErrorDetail::UnknownChain(e) => {
                assert_eq!(e.chain_id, "stride-1");
                assert_eq!(e.path, "p1");
            }
            other => panic!("unexpected error: {other:?}"),
        }

        assert!(relayer.paths().unwrap().is_empty());
    }

    #[test]
    fn links_need_a_relayer() {
        let (relayer, gaia, neutron, _) = setup();

        let mut interchain = Interchain::new();
        interchain
            .add_chain(gaia.clone())
            .add_chain(neutron.clone())
            .add_link(transfer_link(&gaia, &neutron, "p1", &relayer));

        let err = interchain
            .build(&InterchainBuildOptions::new("norelayer"))
            .unwrap_err();

        assert!(matches!(err.detail(), ErrorDetail::MissingRelayer(_)));
    }

    #[test]
    fn duplicate_path_name_is_rejected() {
        let (relayer, gaia, neutron, stride) = setup();

        let mut interchain = Interchain::new();
        interchain
            .add_chain(gaia.clone())
            .add_chain(neutron.clone())
            .add_chain(stride.clone())
            .add_relayer(relayer.clone(), "rly")
            .add_link(transfer_link(&gaia, &neutron, "p1", &relayer))
            .add_link(transfer_link(&gaia, &stride, "p1", &relayer));

        let err = interchain
            .build(&InterchainBuildOptions::new("duppath"))
            .unwrap_err();

        assert!(matches!(err.detail(), ErrorDetail::DuplicatePath(_)));
        assert!(relayer.paths().unwrap().is_empty());
    }

    #[test]
    fn empty_interchain_builds() {
        let built = Interchain::<MockChain, MockRelayer>::new()
            .build(&InterchainBuildOptions::new("empty"))
            .unwrap();

        assert!(built.chains().is_empty());
        assert!(built.links().is_empty());
    }
}
