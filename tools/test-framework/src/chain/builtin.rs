/*!
   Built-in chain configurations that topology files can refer to by name.
*/

use crate::chain::config::{ChainConfig, DockerImage};
use crate::error::Error;

const COSMOS_UID_GID: &str = "1025:1025";

pub fn gaia_config() -> ChainConfig {
    ChainConfig {
        chain_type: "cosmos".to_string(),
        name: "gaia".to_string(),
        chain_id: "gaia-1".to_string(),
        images: vec![DockerImage {
            repository: "ghcr.io/strangelove-ventures/heighliner/gaia".to_string(),
            version: "v9.1.0".to_string(),
            uid_gid: Some(COSMOS_UID_GID.to_string()),
        }],
        bin: "gaiad".to_string(),
        bech32_prefix: "cosmos".to_string(),
        denom: "uatom".to_string(),
        gas_prices: "0.01uatom".to_string(),
        gas_adjustment: 1.3,
        trusting_period: "504h".to_string(),
        no_host_mount: false,
        modify_genesis: None,
    }
}

pub fn neutron_config() -> ChainConfig {
    ChainConfig {
        chain_type: "cosmos".to_string(),
        name: "neutron".to_string(),
        chain_id: "neutron-2".to_string(),
        images: vec![DockerImage {
            repository: "neutron-node".to_string(),
            version: "latest".to_string(),
            uid_gid: None,
        }],
        bin: "neutrond".to_string(),
        bech32_prefix: "neutron".to_string(),
        denom: "untrn".to_string(),
        gas_prices: "0.01untrn".to_string(),
        gas_adjustment: 1.3,
        trusting_period: "1197504s".to_string(),
        no_host_mount: false,
        modify_genesis: None,
    }
}

pub fn stride_config() -> ChainConfig {
    ChainConfig {
        chain_type: "cosmos".to_string(),
        name: "stride".to_string(),
        chain_id: "stride-1".to_string(),
        images: vec![DockerImage {
            repository: "ghcr.io/strangelove-ventures/heighliner/stride".to_string(),
            version: "v9.0.0".to_string(),
            uid_gid: Some(COSMOS_UID_GID.to_string()),
        }],
        bin: "strided".to_string(),
        bech32_prefix: "stride".to_string(),
        denom: "ustrd".to_string(),
        gas_prices: "0.01ustrd".to_string(),
        gas_adjustment: 1.3,
        trusting_period: "336h".to_string(),
        no_host_mount: false,
        modify_genesis: None,
    }
}

/**
   Look up a built-in chain configuration by its name.
*/
pub fn builtin_chain_config(name: &str) -> Result<ChainConfig, Error> {
    match name {
        "gaia" => Ok(gaia_config()),
        "neutron" => Ok(neutron_config()),
        "stride" => Ok(stride_config()),
        _ => Err(Error::unknown_chain_name(name.to_string())),
    }
}

/**
   Resolve every name, failing on the first unknown one.

   The same name may appear more than once, e.g. for topologies with two
   consumer chains of the same type. Repeated entries get their chain ID
   suffixed with their position so that every chain stays distinct.
*/
pub fn builtin_chain_configs(names: &[String]) -> Result<Vec<ChainConfig>, Error> {
    let mut configs = Vec::with_capacity(names.len());

    for (i, name) in names.iter().enumerate() {
        let mut config = builtin_chain_config(name)?;

        if names[..i].contains(name) {
            config.chain_id = format!("{}-{}", config.chain_id, i);
        }

        configs.push(config);
    }

    Ok(configs)
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::error::ErrorDetail;

    #[test]
    fn resolves_known_chains() {
        let names = ["gaia", "neutron", "stride"].map(String::from);
        let configs = builtin_chain_configs(&names).unwrap();

        let ids = configs.iter().map(|c| c.chain_id.as_str()).collect::<Vec<_>>();
        assert_eq!(ids, ["gaia-1", "neutron-2", "stride-1"]);
    }

    #[test]
    fn repeated_names_get_distinct_ids() {
        let names = ["gaia", "neutron", "neutron"].map(String::from);
        let configs = builtin_chain_configs(&names).unwrap();

        assert_eq!(configs[1].chain_id, "neutron-2");
        assert_eq!(configs[2].chain_id, "neutron-2-2");
    }

    #[test]
    fn unknown_chain_name() {
        let err = builtin_chain_config("osmosis").unwrap_err();

        match err.detail() {
            ErrorDetail::UnknownChainName(e) => assert_eq!(e.name, "osmosis"),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
