/*!
   Links registered with the interchain builder.
*/

use serde::Serialize;

use crate::chain::handle::ChainHandle;

/**
   A transfer path between two chains, carried out by `relayer`.
*/
#[derive(Debug, Clone)]
pub struct InterchainLink<Chain, Relayer> {
    pub chain_a: Chain,
    pub chain_b: Chain,
    pub path: String,
    pub relayer: Relayer,
}

/**
   An interchain security path from a provider chain to one of its
   consumers. Besides the ordered security channel, a transfer channel is
   opened on the same connection.
*/
#[derive(Debug, Clone)]
pub struct ProviderConsumerLink<Chain, Relayer> {
    pub provider: Chain,
    pub consumer: Chain,
    pub path: String,
    pub relayer: Relayer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum LinkKind {
    Transfer,
    ProviderConsumer,
}

/**
   Serializable view of a registered link, used for logging and for
   inspecting a built interchain.
*/
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkSummary {
    pub path: String,
    pub kind: LinkKind,
    pub chain_a: String,
    pub chain_b: String,
}

impl<Chain: ChainHandle, Relayer> InterchainLink<Chain, Relayer> {
    pub fn summary(&self) -> LinkSummary {
        LinkSummary {
            path: self.path.clone(),
            kind: LinkKind::Transfer,
            chain_a: self.chain_a.chain_id().to_string(),
            chain_b: self.chain_b.chain_id().to_string(),
        }
    }
}

impl<Chain: ChainHandle, Relayer> ProviderConsumerLink<Chain, Relayer> {
    pub fn summary(&self) -> LinkSummary {
        LinkSummary {
            path: self.path.clone(),
            kind: LinkKind::ProviderConsumer,
            chain_a: self.provider.chain_id().to_string(),
            chain_b: self.consumer.chain_id().to_string(),
        }
    }
}
