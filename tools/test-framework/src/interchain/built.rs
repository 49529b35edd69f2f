use std::collections::BTreeMap;

use crate::chain::handle::ChainHandle;
use crate::types::link::LinkSummary;

#[derive(Debug, Clone, Default)]
pub struct InterchainBuildOptions {
    pub test_name: String,

    /**
       Only check the registered topology, without asking the relayers to
       create any client, connection or channel.
    */
    pub skip_path_creation: bool,
}

/**
   An interchain after [`build`](crate::interchain::builder::Interchain::build).
   It can only be inspected; no chain, relayer or link can be added.
*/
#[derive(Debug, Clone)]
pub struct BuiltInterchain<Chain, Relayer> {
    chains: Vec<Chain>,
    relayers: BTreeMap<String, Relayer>,
    links: Vec<LinkSummary>,
}

impl InterchainBuildOptions {
    pub fn new(test_name: &str) -> Self {
        Self {
            test_name: test_name.to_string(),
            skip_path_creation: false,
        }
    }
}

impl<Chain: ChainHandle, Relayer> BuiltInterchain<Chain, Relayer> {
    pub(crate) fn new(
        chains: Vec<Chain>,
        relayers: BTreeMap<String, Relayer>,
        links: Vec<LinkSummary>,
    ) -> Self {
        Self {
            chains,
            relayers,
            links,
        }
    }

    pub fn chains(&self) -> &[Chain] {
        &self.chains
    }

    pub fn chain(&self, chain_id: &str) -> Option<&Chain> {
        self.chains
            .iter()
            .find(|chain| chain.chain_id().as_str() == chain_id)
    }

    pub fn relayer(&self, name: &str) -> Option<&Relayer> {
        self.relayers.get(name)
    }

    pub fn links(&self) -> &[LinkSummary] {
        &self.links
    }

    pub fn link(&self, path: &str) -> Option<&LinkSummary> {
        self.links.iter().find(|link| link.path == path)
    }
}
