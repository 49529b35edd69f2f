/*!
   Registration of validated paths with a [`NetworkBuilder`].
*/

use tracing::{debug, info};

use crate::chain::handle::ChainHandle;
use crate::error::{handle_generic_error, Error};
use crate::interchain::builder::NetworkBuilder;
use crate::topology::validate::validate_paths;
use crate::types::link::{InterchainLink, ProviderConsumerLink};
use crate::types::topology::{IbcPaths, PathSpec};

/**
   Look up the chain at `index`, reporting the path that referred to it
   when the index is out of range.
*/
pub fn resolve_chain<'a, Chain>(
    chains: &'a [Chain],
    path: &str,
    index: usize,
) -> Result<&'a Chain, Error> {
    chains
        .get(index)
        .ok_or_else(|| Error::chain_index_out_of_range(path.to_string(), index, chains.len()))
}

fn resolve_pair<'a, Chain>(
    chains: &'a [Chain],
    spec: &PathSpec,
) -> Result<(&'a Chain, &'a Chain), Error> {
    Ok((
        resolve_chain(chains, &spec.name, spec.chain_a)?,
        resolve_chain(chains, &spec.name, spec.chain_b)?,
    ))
}

/**
   Validate the whole batch of transfer paths, then register one
   [`InterchainLink`] per path. Nothing is registered when any path of the
   batch is invalid.

   Returns the registered path specs, in registration order.
*/
pub fn link_ibc_paths<Chain, Relayer, Builder>(
    paths: &IbcPaths,
    chains: &[Chain],
    relayer: &Relayer,
    builder: &mut Builder,
) -> Result<Vec<PathSpec>, Error>
where
    Chain: ChainHandle,
    Relayer: Clone,
    Builder: NetworkBuilder<Chain, Relayer>,
{
    let specs = validate_paths(paths, chains.len())?;

    let links = specs
        .iter()
        .map(|spec| {
            let (chain_a, chain_b) = resolve_pair(chains, spec)?;

            Ok(InterchainLink {
                chain_a: chain_a.clone(),
                chain_b: chain_b.clone(),
                path: spec.name.clone(),
                relayer: relayer.clone(),
            })
        })
        .collect::<Result<Vec<_>, Error>>()?;

    for link in links {
        info!(
            "registering path {} between {} and {}",
            link.path,
            link.chain_a.chain_id(),
            link.chain_b.chain_id()
        );

        debug!(
            "link: {}",
            serde_json::to_string(&link.summary()).map_err(handle_generic_error)?
        );

        builder.add_link(link);
    }

    Ok(specs)
}

/**
   Same as [`link_ibc_paths`] for interchain security paths, where the
   first index of each entry is the provider and the second the consumer.
*/
pub fn link_provider_consumer_paths<Chain, Relayer, Builder>(
    paths: &IbcPaths,
    chains: &[Chain],
    relayer: &Relayer,
    builder: &mut Builder,
) -> Result<Vec<PathSpec>, Error>
where
    Chain: ChainHandle,
    Relayer: Clone,
    Builder: NetworkBuilder<Chain, Relayer>,
{
    let specs = validate_paths(paths, chains.len())?;

    let links = specs
        .iter()
        .map(|spec| {
            let (provider, consumer) = resolve_pair(chains, spec)?;

            Ok(ProviderConsumerLink {
                provider: provider.clone(),
                consumer: consumer.clone(),
                path: spec.name.clone(),
                relayer: relayer.clone(),
            })
        })
        .collect::<Result<Vec<_>, Error>>()?;

    for link in links {
        info!(
            "registering provider/consumer path {} from provider {} to consumer {}",
            link.path,
            link.provider.chain_id(),
            link.consumer.chain_id()
        );

        debug!(
            "link: {}",
            serde_json::to_string(&link.summary()).map_err(handle_generic_error)?
        );

        builder.add_provider_consumer_link(link);
    }

    Ok(specs)
}
