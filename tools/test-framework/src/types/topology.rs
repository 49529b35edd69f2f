/*!
   Declarative description of a test topology: which chains to start and
   which named paths connect them.

   ```json
   {
     "chains": ["gaia", "neutron", "stride"],
     "paths": { "p1": [0, 1], "p2": [0, 2] },
     "provider_consumer_paths": { "ics-path": [0, 1] }
   }
   ```
*/

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::error::{handle_generic_error, Error};

/**
   Path name to chain indices. A valid entry has exactly two distinct
   indices into the chain list.
*/
pub type IbcPaths = BTreeMap<String, Vec<usize>>;

/**
   A path that passed validation. `chain_a` is the first index of the
   entry, which is the source side when the relayer opens channels, or the
   provider for provider/consumer paths.
*/
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PathSpec {
    pub name: String,
    pub chain_a: usize,
    pub chain_b: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopologyConfig {
    /**
       Names of built-in chain configurations, in index order.
    */
    pub chains: Vec<String>,

    #[serde(default)]
    pub paths: IbcPaths,

    /**
       Interchain security paths, as `[provider, consumer]`.
    */
    #[serde(default)]
    pub provider_consumer_paths: IbcPaths,
}

impl PathSpec {
    pub fn new(name: &str, chain_a: usize, chain_b: usize) -> Self {
        Self {
            name: name.to_string(),
            chain_a,
            chain_b,
        }
    }
}

impl TopologyConfig {
    pub fn new(chains: &[&str]) -> Self {
        Self {
            chains: chains.iter().map(|c| c.to_string()).collect(),
            ..Default::default()
        }
    }

    pub fn with_path(mut self, name: &str, indices: &[usize]) -> Self {
        self.paths.insert(name.to_string(), indices.to_vec());
        self
    }

    pub fn with_provider_consumer_path(mut self, name: &str, indices: &[usize]) -> Self {
        self.provider_consumer_paths
            .insert(name.to_string(), indices.to_vec());
        self
    }

    pub fn from_json_str(content: &str) -> Result<Self, Error> {
        serde_json::from_str(content).map_err(handle_generic_error)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, Error> {
        toml::from_str(content).map_err(handle_generic_error)
    }

    /**
       Load a topology file. Files ending in `.toml` are read as TOML,
       anything else as JSON.
    */
    pub fn load(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Self::from_toml_str(&content),
            _ => Self::from_json_str(&content),
        }
    }
}
