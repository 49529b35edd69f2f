//! Topologies with an invalid path are rejected before any chain is
//! started, and no path is created.

use interchain_test_framework::error::ErrorDetail;
use interchain_test_framework::prelude::*;

#[test]
fn test_under_specified_path() -> Result<(), Error> {
    let test = InvalidTopologyTest(TopologyConfig::from_json_str(
        r#"{ "chains": ["gaia", "neutron"], "paths": { "ok": [0, 1], "bad": [0] } }"#,
    )?);

    let result = run_interchain_test(&test, &MockBootstrap::default());

    match result {
        Err(e) => match e.detail() {
            ErrorDetail::UnderSpecifiedPath(e) => {
                assert_eq("offending path", &e.path, &"bad".to_string())?;
                assert_eq("offending size", &e.size, &1)
            }
            other => Err(Error::assertion(format!("unexpected error: {other:?}"))),
        },
        Ok(()) => Err(Error::assertion(
            "expected the topology to be rejected".to_string(),
        )),
    }
}

#[test]
fn test_self_loop_path() -> Result<(), Error> {
    let test = InvalidTopologyTest(
        TopologyConfig::new(&["gaia", "neutron"]).with_path("loop", &[1, 1]),
    );

    let result = run_interchain_test(&test, &MockBootstrap::default());

    match result {
        Err(e) => match e.detail() {
            ErrorDetail::SelfLoopPath(_) => Ok(()),
            other => Err(Error::assertion(format!("unexpected error: {other:?}"))),
        },
        Ok(()) => Err(Error::assertion(
            "expected the topology to be rejected".to_string(),
        )),
    }
}

pub struct InvalidTopologyTest(pub TopologyConfig);

impl InterchainTest for InvalidTopologyTest {
    fn topology(&self) -> TopologyConfig {
        self.0.clone()
    }

    fn run<Chain: ChainHandle, Relayer: RelayerHandle>(
        &self,
        _config: &TestConfig,
        _interchain: ConnectedInterchain<Chain, Relayer>,
    ) -> Result<(), Error> {
        Err(Error::assertion(
            "test body should not run for an invalid topology".to_string(),
        ))
    }
}
