/*!
   Validation of declared paths against the list of chains.

   Validation always runs over the whole batch before anything is
   registered, so that a misconfigured topology fails without leaving
   some of its paths linked.
*/

use std::collections::BTreeSet;

use crate::error::Error;
use crate::types::topology::{IbcPaths, PathSpec, TopologyConfig};

/**
   Check that every path has exactly two chain indices.
*/
pub fn verify_ibc_paths(paths: &IbcPaths) -> Result<(), Error> {
    for (name, indices) in paths {
        verify_cardinality(name, indices)?;
    }

    Ok(())
}

fn verify_cardinality(name: &str, indices: &[usize]) -> Result<(), Error> {
    match indices.len() {
        2 => Ok(()),
        size if size < 2 => Err(Error::under_specified_path(name.to_string(), size)),
        size => Err(Error::over_specified_path(name.to_string(), size)),
    }
}

fn validate_path(name: &str, indices: &[usize], chain_count: usize) -> Result<PathSpec, Error> {
    if name.is_empty() {
        return Err(Error::empty_path_name());
    }

    verify_cardinality(name, indices)?;

    let (chain_a, chain_b) = (indices[0], indices[1]);

    if chain_a == chain_b {
        return Err(Error::self_loop_path(name.to_string(), chain_a));
    }

    for index in [chain_a, chain_b] {
        if index >= chain_count {
            return Err(Error::chain_index_out_of_range(
                name.to_string(),
                index,
                chain_count,
            ));
        }
    }

    Ok(PathSpec::new(name, chain_a, chain_b))
}

/**
   Validate every path of the batch and return them in iteration order.
   The first offending path is reported and no spec is returned.
*/
pub fn validate_paths(paths: &IbcPaths, chain_count: usize) -> Result<Vec<PathSpec>, Error> {
    paths
        .iter()
        .map(|(name, indices)| validate_path(name, indices, chain_count))
        .collect()
}

/**
   Validate the transfer and the provider/consumer paths of a topology.
   Path names must also be unique across the two kinds, since the relayer
   knows paths by name only.
*/
pub fn validate_topology(topology: &TopologyConfig) -> Result<(Vec<PathSpec>, Vec<PathSpec>), Error> {
    let chain_count = topology.chains.len();

    let paths = validate_paths(&topology.paths, chain_count)?;
    let provider_consumer_paths = validate_paths(&topology.provider_consumer_paths, chain_count)?;

    let mut names = BTreeSet::new();

    for spec in paths.iter().chain(provider_consumer_paths.iter()) {
        if !names.insert(spec.name.as_str()) {
            return Err(Error::duplicate_path(spec.name.clone()));
        }
    }

    Ok((paths, provider_consumer_paths))
}
