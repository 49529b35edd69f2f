use serde_json::{json, Value};

use crate::chain::config::{ChainConfig, GenesisModifier};
use crate::chain::genesis::{parse_genesis, patch_genesis, set_voting_period, GenesisOverride};
use crate::error::{handle_generic_error, Error};

pub fn update_genesis_for_consumer_chain(
    genesis: &mut Value,
    voting_period: &str,
) -> Result<(), Error> {
    // Consumer chain doesn't have a gov key.
    if genesis
        .get("app_state")
        .and_then(|app_state| app_state.get("gov"))
        .is_some()
    {
        set_voting_period(genesis, voting_period)?;
    }
    Ok(())
}

/**
   Shorten the voting period of a chain that may run as a consumer chain,
   leaving the genesis untouched when it has no governance module.
*/
pub fn modify_consumer_gov_genesis(voting_period: &str) -> GenesisModifier {
    let voting_period = voting_period.to_string();

    GenesisModifier::new(move |_: &ChainConfig, genesis: &[u8]| {
        let mut document = parse_genesis(genesis)?;
        update_genesis_for_consumer_chain(&mut document, &voting_period)?;
        serde_json::to_vec(&document).map_err(handle_generic_error)
    })
}

/**
   Set the `ccvconsumer` parameters that a consumer chain needs before it
   can be started against a provider.
*/
pub fn modify_consumer_genesis(
    soft_opt_out_threshold: &str,
    reward_denoms: &[&str],
    provider_reward_denoms: &[&str],
) -> GenesisModifier {
    let overrides = [
        GenesisOverride::new(
            crate::key_path!["app_state", "ccvconsumer", "params", "soft_opt_out_threshold"],
            soft_opt_out_threshold,
        ),
        GenesisOverride::new(
            crate::key_path!["app_state", "ccvconsumer", "params", "reward_denoms"],
            json!(reward_denoms),
        ),
        GenesisOverride::new(
            crate::key_path!["app_state", "ccvconsumer", "params", "provider_reward_denoms"],
            json!(provider_reward_denoms),
        ),
    ];

    GenesisModifier::new(move |_: &ChainConfig, genesis: &[u8]| {
        patch_genesis(genesis, &overrides)
    })
}
