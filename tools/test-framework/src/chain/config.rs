/*!
    Configuration of a chain taking part in an interchain test.

    The configuration mirrors what the orchestration layer needs to know
    about a chain in order to spawn it: the docker image and binary to run,
    the address prefix, the native denomination and gas settings. It can be
    loaded from JSON or TOML, except for the genesis modifier which can
    only be set from code.
*/

use core::fmt::{self, Debug};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use ibc_relayer_types::core::ics24_host::identifier::ChainId;

use crate::error::Error;

/**
   A function that receives the chain configuration and the raw genesis
   document, and returns the patched genesis document.
*/
pub type GenesisModifierFn = dyn Fn(&ChainConfig, &[u8]) -> Result<Vec<u8>, Error> + Send + Sync;

/**
   A cheaply clonable [`GenesisModifierFn`].
*/
#[derive(Clone)]
pub struct GenesisModifier(Arc<GenesisModifierFn>);

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DockerImage {
    pub repository: String,
    pub version: String,
    #[serde(default)]
    pub uid_gid: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChainConfig {
    #[serde(rename = "type")]
    pub chain_type: String,

    pub name: String,

    pub chain_id: String,

    #[serde(default)]
    pub images: Vec<DockerImage>,

    /**
       The name of the chain binary inside the image, e.g. `gaiad`.
    */
    pub bin: String,

    pub bech32_prefix: String,

    pub denom: String,

    pub gas_prices: String,

    pub gas_adjustment: f64,

    pub trusting_period: String,

    #[serde(default)]
    pub no_host_mount: bool,

    #[serde(skip)]
    pub modify_genesis: Option<GenesisModifier>,
}

impl GenesisModifier {
    pub fn new(
        modifier: impl Fn(&ChainConfig, &[u8]) -> Result<Vec<u8>, Error> + Send + Sync + 'static,
    ) -> Self {
        Self(Arc::new(modifier))
    }

    pub fn apply(&self, config: &ChainConfig, genesis: &[u8]) -> Result<Vec<u8>, Error> {
        (self.0)(config, genesis)
    }

    /**
       Run `self` first, then feed its output into `next`.
    */
    pub fn then(self, next: GenesisModifier) -> Self {
        Self::new(move |config, genesis| {
            let genesis = self.apply(config, genesis)?;
            next.apply(config, &genesis)
        })
    }
}

/**
   Chain a list of modifiers left to right into a single modifier.
   An empty list yields a modifier that returns the genesis unchanged.
*/
pub fn compose(modifiers: impl IntoIterator<Item = GenesisModifier>) -> GenesisModifier {
    modifiers.into_iter().fold(
        GenesisModifier::new(|_, genesis| Ok(genesis.to_vec())),
        GenesisModifier::then,
    )
}

impl Debug for GenesisModifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("GenesisModifier")
    }
}

impl ChainConfig {
    pub fn id(&self) -> ChainId {
        ChainId::from_string(&self.chain_id)
    }

    pub fn with_genesis_modifier(mut self, modifier: GenesisModifier) -> Self {
        self.modify_genesis = Some(modifier);
        self
    }

    /**
       Append `modifier` after any modifier that is already configured.
    */
    pub fn add_genesis_modifier(&mut self, modifier: GenesisModifier) {
        self.modify_genesis = Some(match self.modify_genesis.take() {
            Some(existing) => existing.then(modifier),
            None => modifier,
        });
    }

    /**
       Run the configured genesis modifier, if any, over the raw genesis.
    */
    pub fn apply_genesis_modifier(&self, genesis: &[u8]) -> Result<Vec<u8>, Error> {
        match &self.modify_genesis {
            Some(modifier) => modifier.apply(self, genesis),
            None => Ok(genesis.to_vec()),
        }
    }
}
