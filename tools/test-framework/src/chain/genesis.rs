/*!
    Helper functions for patching a chain's genesis document before the
    chain is started.

    Since every chain type lays out its genesis state differently, we do
    not deserialize the document into proper types. Instead the document
    is kept as a dynamic [`serde_json::Value`] tree, and overrides are
    applied by walking a [`KeyPath`] of object keys and array indices,
    creating any missing intermediate containers along the way.
*/

use core::fmt::{self, Display};
use serde_json::{json, Value};
use tracing::{debug, info};

use crate::chain::config::{ChainConfig, GenesisModifier};
use crate::error::{handle_generic_error, Error};

/**
   A single step in a [`KeyPath`]: either the key of a JSON object or the
   index of an element in a JSON array.
*/
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    Key(String),
    Index(usize),
}

/**
   A non-empty sequence of [`PathSegment`]s addressing a value inside a
   genesis document.

   Use the [`key_path!`](crate::key_path) macro to build one from a mix of
   string keys and integer indices.
*/
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPath(Vec<PathSegment>);

/**
   Replace the value found at `key_path` with `value`.
*/
#[derive(Debug, Clone, PartialEq)]
pub struct GenesisOverride {
    pub key_path: KeyPath,
    pub value: Value,
}

/**
   Build a [`KeyPath`] from a list of segments.

   ```rust
   use interchain_test_framework::key_path;

   let path = key_path!["app_state", "gov", "deposit_params", "min_deposit", 0, "denom"];
   assert_eq!(path.to_string(), "app_state.gov.deposit_params.min_deposit[0].denom");
   ```
*/
#[macro_export]
macro_rules! key_path {
    ( $( $segment:expr ),* $(,)? ) => {
        $crate::chain::genesis::KeyPath::new(vec![
            $( $crate::chain::genesis::PathSegment::from($segment) ),*
        ])
    };
}

impl From<&str> for PathSegment {
    fn from(key: &str) -> Self {
        Self::Key(key.to_string())
    }
}

impl From<String> for PathSegment {
    fn from(key: String) -> Self {
        Self::Key(key)
    }
}

impl From<usize> for PathSegment {
    fn from(index: usize) -> Self {
        Self::Index(index)
    }
}

impl PathSegment {
    fn empty_container(&self) -> Value {
        match self {
            Self::Key(_) => Value::Object(Default::default()),
            Self::Index(_) => Value::Array(Vec::new()),
        }
    }
}

impl KeyPath {
    pub fn new(segments: Vec<PathSegment>) -> Self {
        Self(segments)
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.0
    }
}

impl Display for KeyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.0.iter().enumerate() {
            match segment {
                PathSegment::Key(key) if i == 0 => write!(f, "{key}")?,
                PathSegment::Key(key) => write!(f, ".{key}")?,
                PathSegment::Index(index) => write!(f, "[{index}]")?,
            }
        }

        Ok(())
    }
}

impl GenesisOverride {
    pub fn new(key_path: KeyPath, value: impl Into<Value>) -> Self {
        Self {
            key_path,
            value: value.into(),
        }
    }
}

/**
   Parse raw genesis bytes into a document. The top level of the document
   must be a JSON object.
*/
pub fn parse_genesis(genesis: &[u8]) -> Result<Value, Error> {
    let document: Value = serde_json::from_slice(genesis)
        .map_err(|e| Error::malformed_document(e.to_string()))?;

    if !document.is_object() {
        return Err(Error::malformed_document(
            "top level of the genesis document is not an object".to_string(),
        ));
    }

    Ok(document)
}

/**
   Set `value` at `key_path` inside `document`.

   Missing object keys and `null` values along the path are replaced by an
   empty container matching the next segment. An array index may address an
   existing element or the position right after the last one, in which case
   the element is appended.

   Fails with [`PathNotSettable`](crate::error::ErrorDetail::PathNotSettable)
   if a segment runs into a scalar, or into a container of the other kind.
   The document is left untouched on failure.
*/
pub fn set_value(document: &mut Value, key_path: &KeyPath, value: Value) -> Result<(), Error> {
    let segments = key_path.segments();
    let (last, parents) = segments.split_last().ok_or_else(Error::empty_key_path)?;

    if !is_settable(document, segments) {
        return Err(Error::path_not_settable(key_path.to_string()));
    }

    let mut current = document;

    for (i, segment) in parents.iter().enumerate() {
        let next = &segments[i + 1];

        current = child_mut(current, segment, next)
            .ok_or_else(|| Error::path_not_settable(key_path.to_string()))?;
    }

    assign(current, last, value).ok_or_else(|| Error::path_not_settable(key_path.to_string()))
}

fn is_settable(current: &Value, segments: &[PathSegment]) -> bool {
    let Some((segment, rest)) = segments.split_first() else {
        return true;
    };

    let child = match segment {
        PathSegment::Key(key) => match current.as_object() {
            Some(fields) => fields.get(key),
            None => return false,
        },
        PathSegment::Index(index) => match current.as_array() {
            Some(elements) if *index <= elements.len() => elements.get(*index),
            _ => return false,
        },
    };

    match (child, rest.first()) {
        (_, None) => true,
        (Some(child), Some(_)) if !child.is_null() => is_settable(child, rest),
        (_, Some(next)) => is_settable(&next.empty_container(), rest),
    }
}

fn child_mut<'a>(
    current: &'a mut Value,
    segment: &PathSegment,
    next: &PathSegment,
) -> Option<&'a mut Value> {
    let child = match segment {
        PathSegment::Key(key) => current
            .as_object_mut()?
            .entry(key.clone())
            .or_insert(Value::Null),
        PathSegment::Index(index) => {
            let elements = current.as_array_mut()?;

            if *index == elements.len() {
                elements.push(Value::Null);
            }

            elements.get_mut(*index)?
        }
    };

    if child.is_null() {
        *child = next.empty_container();
    }

    Some(child)
}

fn assign(current: &mut Value, segment: &PathSegment, value: Value) -> Option<()> {
    match segment {
        PathSegment::Key(key) => {
            current.as_object_mut()?.insert(key.clone(), value);
        }
        PathSegment::Index(index) => {
            let elements = current.as_array_mut()?;

            if *index < elements.len() {
                elements[*index] = value;
            } else if *index == elements.len() {
                elements.push(value);
            } else {
                return None;
            }
        }
    }

    Some(())
}

/**
   Apply the overrides in order. Stops at the first override that cannot
   be applied.
*/
pub fn apply_overrides(document: &mut Value, overrides: &[GenesisOverride]) -> Result<(), Error> {
    for genesis_override in overrides {
        debug!(
            "setting genesis value at {} to {}",
            genesis_override.key_path, genesis_override.value
        );

        set_value(
            document,
            &genesis_override.key_path,
            genesis_override.value.clone(),
        )?;
    }

    Ok(())
}

/**
   Parse the genesis bytes, apply all overrides and serialize the result
   into a new byte vector. The input slice is left untouched.
*/
pub fn patch_genesis(genesis: &[u8], overrides: &[GenesisOverride]) -> Result<Vec<u8>, Error> {
    let mut document = parse_genesis(genesis)?;

    apply_overrides(&mut document, overrides)?;

    serde_json::to_vec(&document).map_err(handle_generic_error)
}

pub fn set_voting_period(genesis: &mut Value, period: &str) -> Result<(), Error> {
    set_value(
        genesis,
        &crate::key_path!["app_state", "gov", "voting_params", "voting_period"],
        json!(period),
    )
}

pub fn set_max_deposit_period(genesis: &mut Value, period: &str) -> Result<(), Error> {
    set_value(
        genesis,
        &crate::key_path!["app_state", "gov", "deposit_params", "max_deposit_period"],
        json!(period),
    )
}

/**
   Shorten the governance voting and deposit periods, and make the minimum
   deposit payable in the chain's own denomination.
*/
pub fn modify_genesis_proposal_time(
    voting_period: &str,
    max_deposit_period: &str,
) -> GenesisModifier {
    let voting_period = voting_period.to_string();
    let max_deposit_period = max_deposit_period.to_string();

    GenesisModifier::new(move |config: &ChainConfig, genesis: &[u8]| {
        patch_genesis(
            genesis,
            &[
                GenesisOverride::new(
                    crate::key_path!["app_state", "gov", "voting_params", "voting_period"],
                    voting_period.as_str(),
                ),
                GenesisOverride::new(
                    crate::key_path!["app_state", "gov", "deposit_params", "max_deposit_period"],
                    max_deposit_period.as_str(),
                ),
                GenesisOverride::new(
                    crate::key_path![
                        "app_state",
                        "gov",
                        "deposit_params",
                        "min_deposit",
                        0,
                        "denom"
                    ],
                    config.denom.as_str(),
                ),
            ],
        )
    })
}

/**
   Log the genesis document of the chain and pass it through unchanged.
*/
pub fn print_genesis() -> GenesisModifier {
    GenesisModifier::new(|config: &ChainConfig, genesis: &[u8]| {
        let document = parse_genesis(genesis)?;

        let pretty = serde_json::to_string_pretty(&document).map_err(handle_generic_error)?;
        info!("genesis of chain {}:\n{}", config.chain_id, pretty);

        serde_json::to_vec(&document).map_err(handle_generic_error)
    })
}
