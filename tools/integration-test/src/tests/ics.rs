//! Interchain security topologies: a provider chain connected to one or
//! more consumer chains. Each provider/consumer path carries an ordered
//! channel between the `provider` and `consumer` ports, plus a transfer
//! channel on the same connection.

use serde_json::json;

use interchain_test_framework::prelude::*;
use interchain_test_framework::relayer_mock::bootstrap::DEFAULT_GENESIS;

const VOTING_PERIOD: &str = "10s";
const MAX_DEPOSIT_PERIOD: &str = "10s";

#[test]
fn test_single_consumer() -> Result<(), Error> {
    run_interchain_test(&SingleConsumerTest, &MockBootstrap::default())
}

#[test]
fn test_multi_consumer() -> Result<(), Error> {
    run_interchain_test(&MultiConsumerTest, &MockBootstrap::default())
}

#[test]
fn test_consumer_genesis() -> Result<(), Error> {
    let names = ["gaia".to_string(), "neutron".to_string()];
    let mut configs = builtin_chain_configs(&names)?;

    SingleConsumerTest.modify_chain_configs(&mut configs);

    let provider = MockChain::new(configs[0].clone(), DEFAULT_GENESIS.as_bytes())?.genesis()?;
    let consumer = MockChain::new(configs[1].clone(), DEFAULT_GENESIS.as_bytes())?.genesis()?;

    let provider_gov = &provider["app_state"]["gov"];

    assert_eq(
        "provider voting period",
        &provider_gov["voting_params"]["voting_period"],
        &json!(VOTING_PERIOD),
    )?;

    assert_eq(
        "provider deposit is paid in the provider denom",
        &provider_gov["deposit_params"]["min_deposit"][0]["denom"],
        &json!("uatom"),
    )?;

    assert_eq(
        "consumer voting period",
        &consumer["app_state"]["gov"]["voting_params"]["voting_period"],
        &json!(VOTING_PERIOD),
    )?;

    assert_eq(
        "consumer reward denoms",
        &consumer["app_state"]["ccvconsumer"]["params"]["reward_denoms"],
        &json!(["untrn"]),
    )?;

    Ok(())
}

fn modify_ics_chain_configs(configs: &mut [ChainConfig]) {
    if let Some((provider, consumers)) = configs.split_first_mut() {
        provider.add_genesis_modifier(modify_genesis_proposal_time(
            VOTING_PERIOD,
            MAX_DEPOSIT_PERIOD,
        ));

        for consumer in consumers {
            let reward_denom = consumer.denom.clone();

            consumer.add_genesis_modifier(modify_consumer_gov_genesis(VOTING_PERIOD));
            consumer.add_genesis_modifier(modify_consumer_genesis(
                "0.05",
                &[reward_denom.as_str()],
                &["uatom"],
            ));
        }
    }
}

fn assert_ics_path<Chain: ChainHandle, Relayer: RelayerHandle>(
    interchain: &ConnectedInterchain<Chain, Relayer>,
    path: &str,
    consumer: usize,
) -> Result<(), Error> {
    let provider_end = interchain.ics_channel(path, 0)?;
    let consumer_end = interchain.ics_channel(path, consumer)?;

    assert_eq(
        "ics channels are ordered",
        &provider_end.ordering(),
        &Order::Ordered,
    )?;

    assert_eq(
        "provider end is bound to the provider port",
        &provider_end.port_id().as_str(),
        &"provider",
    )?;

    assert_eq(
        "consumer end is bound to the consumer port",
        &consumer_end.port_id().as_str(),
        &"consumer",
    )?;

    assert_channel_pair(provider_end, consumer_end)?;

    let transfer_end = interchain.channel(path, consumer)?;

    assert_not_eq(
        "transfer channel is separate from the ics channel",
        transfer_end.channel_id(),
        consumer_end.channel_id(),
    )?;

    assert_eq(
        "transfer channel shares the ics connection",
        &transfer_end.channel.connection_hops,
        &consumer_end.channel.connection_hops,
    )
}

pub struct SingleConsumerTest;

impl InterchainTest for SingleConsumerTest {
    fn topology(&self) -> TopologyConfig {
        TopologyConfig::new(&["gaia", "neutron"]).with_provider_consumer_path("ics-neutron", &[0, 1])
    }

    fn modify_chain_configs(&self, configs: &mut [ChainConfig]) {
        modify_ics_chain_configs(configs)
    }

    fn run<Chain: ChainHandle, Relayer: RelayerHandle>(
        &self,
        _config: &TestConfig,
        interchain: ConnectedInterchain<Chain, Relayer>,
    ) -> Result<(), Error> {
        assert_eq(
            "transfer and ics records on both chains",
            &interchain.channels.len(),
            &4,
        )?;

        assert_ics_path(&interchain, "ics-neutron", 1)
    }
}

pub struct MultiConsumerTest;

impl InterchainTest for MultiConsumerTest {
    fn topology(&self) -> TopologyConfig {
        TopologyConfig::new(&["gaia", "neutron", "stride"])
            .with_provider_consumer_path("ics-neutron", &[0, 1])
            .with_provider_consumer_path("ics-stride", &[0, 2])
    }

    fn modify_chain_configs(&self, configs: &mut [ChainConfig]) {
        modify_ics_chain_configs(configs)
    }

    fn run<Chain: ChainHandle, Relayer: RelayerHandle>(
        &self,
        _config: &TestConfig,
        interchain: ConnectedInterchain<Chain, Relayer>,
    ) -> Result<(), Error> {
        assert_ics_path(&interchain, "ics-neutron", 1)?;
        assert_ics_path(&interchain, "ics-stride", 2)?;

        assert_not_eq(
            "each consumer has its own ics channel on the provider",
            interchain.ics_channel("ics-neutron", 0)?.channel_id(),
            interchain.ics_channel("ics-stride", 0)?.channel_id(),
        )?;

        assert_eq(
            "provider holds two channel ends per consumer",
            &interchain.channels_of(0)?.len(),
            &4,
        )?;

        let links = interchain.interchain.links();

        assert_eq("one link per consumer", &links.len(), &2)?;

        Ok(())
    }
}
