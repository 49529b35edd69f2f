/*!
   [`RelayerHandle`] implementation driving the `rly` command line relayer.

   Every operation is a single `rly` invocation against the relayer home
   directory. Chains are configured in that home under their chain IDs,
   see [`RlyRelayer::add_chain`].
*/

use serde_json::{json, Value};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use ibc_relayer_types::core::ics04_channel::channel::Ordering as Order;
use ibc_relayer_types::core::ics24_host::identifier::{ChainId, ChannelId};

use crate::chain::config::ChainConfig;
use crate::chain::exec::{parse_json_lines, simple_exec};
use crate::error::{handle_generic_error, Error};
use crate::relayer::handle::{ChannelOptions, RelayerHandle};
use crate::types::channel::{
    ChannelInfo, ClientInfo, ConnectionInfo, RawChannel, RawClient, RawConnection,
};

#[derive(Debug, Clone)]
pub struct RlyRelayer {
    pub command_path: String,
    pub home: PathBuf,
}

impl RlyRelayer {
    pub fn new(command_path: &str, home: impl AsRef<Path>) -> Self {
        Self {
            command_path: command_path.to_string(),
            home: home.as_ref().to_path_buf(),
        }
    }

    /**
       Run `rly` with the given arguments, followed by `--home`, and return
       its standard output.
    */
    pub fn exec(&self, desc: &str, args: &[String]) -> Result<String, Error> {
        let home = self.home.display().to_string();

        let mut full_args = args.iter().map(String::as_str).collect::<Vec<_>>();
        full_args.extend(["--home", home.as_str()]);

        let output = simple_exec(desc, &self.command_path, &full_args)?;

        Ok(output.stdout)
    }

    /**
       Create the relayer home and its empty configuration.
    */
    pub fn init_config(&self) -> Result<(), Error> {
        fs::create_dir_all(&self.home)?;

        self.exec("init config", &["config".to_string(), "init".to_string()])?;

        Ok(())
    }

    /**
       Write the chain file of `config` next to the relayer home and register
       it with `rly chains add`, named after the chain ID.
    */
    pub fn add_chain(&self, config: &ChainConfig, rpc_address: &str) -> Result<PathBuf, Error> {
        let chain_file = self.home.join(format!("{}.json", config.chain_id));

        let content = serde_json::to_string_pretty(&chain_file_content(config, rpc_address))
            .map_err(handle_generic_error)?;

        fs::write(&chain_file, content)?;

        self.exec(
            &format!("add chain {}", config.chain_id),
            &add_chain_args(&chain_file, &config.chain_id),
        )?;

        info!(
            "added chain {} to relayer home {} with rpc address {}",
            config.chain_id,
            self.home.display(),
            rpc_address
        );

        Ok(chain_file)
    }
}

/**
   The chain file read by `rly chains add --file`. The signing key is named
   `default`, and transactions use the chain's gas settings.
*/
pub fn chain_file_content(config: &ChainConfig, rpc_address: &str) -> Value {
    json!({
        "type": config.chain_type,
        "value": {
            "key": "default",
            "chain-id": config.chain_id,
            "rpc-addr": rpc_address,
            "account-prefix": config.bech32_prefix,
            "keyring-backend": "test",
            "gas-adjustment": config.gas_adjustment,
            "gas-prices": config.gas_prices,
            "trusting-period": config.trusting_period,
            "debug": true,
            "timeout": "20s",
            "output-format": "json",
            "sign-mode": "direct",
        }
    })
}

pub fn add_chain_args(chain_file: &Path, name: &str) -> Vec<String> {
    vec![
        "chains".to_string(),
        "add".to_string(),
        "--file".to_string(),
        chain_file.display().to_string(),
        name.to_string(),
    ]
}

fn ordering_arg(ordering: Order) -> &'static str {
    match ordering {
        Order::Ordered => "ordered",
        _ => "unordered",
    }
}

fn channel_option_args(options: &ChannelOptions) -> Vec<String> {
    vec![
        "--src-port".to_string(),
        options.src_port.clone(),
        "--dst-port".to_string(),
        options.dst_port.clone(),
        "--order".to_string(),
        ordering_arg(options.ordering).to_string(),
        "--version".to_string(),
        options.version.clone(),
    ]
}

pub fn generate_path_args(chain_a: &ChainId, chain_b: &ChainId, path: &str) -> Vec<String> {
    ["paths", "new", chain_a.as_str(), chain_b.as_str(), path]
        .map(String::from)
        .to_vec()
}

pub fn link_path_args(path: &str, options: &ChannelOptions) -> Vec<String> {
    let mut args = ["tx", "link", path].map(String::from).to_vec();
    args.extend(channel_option_args(options));
    args
}

pub fn create_channel_args(path: &str, options: &ChannelOptions) -> Vec<String> {
    let mut args = ["tx", "channel", path].map(String::from).to_vec();
    args.extend(channel_option_args(options));
    args.push("--override".to_string());
    args
}

pub fn parse_channels(output: &str) -> Result<Vec<ChannelInfo>, Error> {
    parse_json_lines::<RawChannel>(output)?
        .into_iter()
        .map(ChannelInfo::try_from)
        .collect()
}

pub fn parse_connections(output: &str) -> Result<Vec<ConnectionInfo>, Error> {
    parse_json_lines::<RawConnection>(output)?
        .into_iter()
        .map(ConnectionInfo::try_from)
        .collect()
}

pub fn parse_clients(output: &str) -> Result<Vec<ClientInfo>, Error> {
    parse_json_lines::<RawClient>(output)?
        .into_iter()
        .map(ClientInfo::try_from)
        .collect()
}

impl RelayerHandle for RlyRelayer {
    fn generate_path(&self, chain_a: &ChainId, chain_b: &ChainId, path: &str) -> Result<(), Error> {
        info!(
            "generating relayer path {} between {} and {}",
            path, chain_a, chain_b
        );

        self.exec("generate path", &generate_path_args(chain_a, chain_b, path))?;

        Ok(())
    }

    fn link_path(&self, path: &str, options: &ChannelOptions) -> Result<(), Error> {
        info!("linking relayer path {} with {:?}", path, options);

        self.exec("link path", &link_path_args(path, options))?;

        Ok(())
    }

    fn create_channel(&self, path: &str, options: &ChannelOptions) -> Result<(), Error> {
        info!("creating channel on relayer path {} with {:?}", path, options);

        self.exec("create channel", &create_channel_args(path, options))?;

        Ok(())
    }

    fn flush_packets(&self, path: &str, channel_id: &ChannelId) -> Result<(), Error> {
        let args = ["tx", "relay-packets", path, channel_id.as_str()].map(String::from);

        self.exec("relay packets", &args)?;

        Ok(())
    }

    fn flush_acknowledgements(&self, path: &str, channel_id: &ChannelId) -> Result<(), Error> {
        let args = ["tx", "relay-acknowledgements", path, channel_id.as_str()].map(String::from);

        self.exec("relay acknowledgements", &args)?;

        Ok(())
    }

    fn get_channels(&self, chain_id: &ChainId) -> Result<Vec<ChannelInfo>, Error> {
        let args = ["q", "channels", chain_id.as_str()].map(String::from);

        parse_channels(&self.exec("query channels", &args)?)
    }

    fn get_connections(&self, chain_id: &ChainId) -> Result<Vec<ConnectionInfo>, Error> {
        let args = ["q", "connections", chain_id.as_str()].map(String::from);

        parse_connections(&self.exec("query connections", &args)?)
    }

    fn get_clients(&self, chain_id: &ChainId) -> Result<Vec<ClientInfo>, Error> {
        let args = ["q", "clients", chain_id.as_str()].map(String::from);

        parse_clients(&self.exec("query clients", &args)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use test_log::test;

    use crate::chain::builtin::gaia_config;

    #[test]
    fn link_args_for_transfer() {
        let args = link_path_args("p1", &ChannelOptions::transfer());

        assert_eq!(
            args,
            [
                "tx",
                "link",
                "p1",
                "--src-port",
                "transfer",
                "--dst-port",
                "transfer",
                "--order",
                "unordered",
                "--version",
                "ics20-1"
            ]
        );
    }

    #[test]
    fn channel_args_for_ics() {
        let args = create_channel_args("ics-path", &ChannelOptions::ics());

        let has_flag = |flag: &str, value: &str| {
            args.windows(2).any(|w| w[0] == flag && w[1] == value)
        };

        assert_eq!(args[..3], ["tx", "channel", "ics-path"]);
        assert!(has_flag("--order", "ordered"));
        assert!(has_flag("--src-port", "consumer"));
        assert!(has_flag("--dst-port", "provider"));
        assert_eq!(args.last().map(String::as_str), Some("--override"));
    }

    #[test]
    fn chain_file_uses_config_values() {
        let content = chain_file_content(&gaia_config(), "http://gaia:26657");

        assert_eq!(content["type"], "cosmos");
        assert_eq!(content["value"]["chain-id"], "gaia-1");
        assert_eq!(content["value"]["rpc-addr"], "http://gaia:26657");
        assert_eq!(content["value"]["account-prefix"], "cosmos");
        assert_eq!(content["value"]["gas-prices"], "0.01uatom");

        let args = add_chain_args(Path::new("/tmp/relayer/gaia-1.json"), "gaia-1");
        assert_eq!(args, ["chains", "add", "--file", "/tmp/relayer/gaia-1.json", "gaia-1"]);
    }

    #[test]
    fn path_args() {
        let args = generate_path_args(
            &ChainId::from_string("gaia-1"),
            &ChainId::from_string("neutron-2"),
            "p1",
        );

        assert_eq!(args, ["paths", "new", "gaia-1", "neutron-2", "p1"]);
    }

    #[test]
    fn handshake_in_progress_does_not_fail_the_query() {
        let channels = parse_channels(concat!(
            r#"{"state":"STATE_OPEN","ordering":"ORDER_UNORDERED","counterparty":{"port_id":"transfer","channel_id":"channel-1"},"connection_hops":["connection-0"],"version":"ics20-1","port_id":"transfer","channel_id":"channel-0"}"#,
            "\n",
            r#"{"state":"STATE_INIT","ordering":"ORDER_UNORDERED","counterparty":{"port_id":"transfer","channel_id":""},"connection_hops":["connection-0"],"version":"ics20-1","port_id":"transfer","channel_id":"channel-1"}"#,
        ))
        .unwrap();

        assert_eq!(channels.len(), 2);
        assert!(channels[0].is_open());
        assert!(!channels[1].is_open());
        assert_eq!(channels[1].counterparty.channel_id, None);
    }

    #[test]
    fn parses_query_outputs() {
        let channels = parse_channels(concat!(
            r#"{"state":"STATE_OPEN","ordering":"ORDER_ORDERED","counterparty":{"port_id":"provider","channel_id":"channel-0"},"connection_hops":["connection-0"],"version":"1","port_id":"consumer","channel_id":"channel-0"}"#,
            "\n",
            r#"{"state":"STATE_OPEN","ordering":"ORDER_UNORDERED","counterparty":{"port_id":"transfer","channel_id":"channel-1"},"connection_hops":["connection-0"],"version":"ics20-1","port_id":"transfer","channel_id":"channel-1"}"#,
            "\n"
        ))
        .unwrap();

        assert_eq!(channels.len(), 2);
        assert!(channels[0].is_ordered());
        assert_eq!(channels[1].counterparty.port_id.as_str(), "transfer");

        let connections = parse_connections(
            r#"{"id":"connection-0","client_id":"07-tendermint-0","versions":[],"state":"STATE_OPEN","counterparty":{"client_id":"07-tendermint-0","connection_id":"connection-0","prefix":{"key_prefix":"aWJj"}},"delay_period":"0"}"#,
        )
        .unwrap();

        assert_eq!(connections[0].client_id.as_str(), "07-tendermint-0");

        let clients = parse_clients(
            r#"{"client_id":"07-tendermint-0","client_state":{"@type":"/ibc.lightclients.tendermint.v1.ClientState","chain_id":"neutron-2"}}"#,
        )
        .unwrap();

        assert_eq!(clients[0].tracked_chain_id.as_str(), "neutron-2");
    }
}
