/*!
   Assertions returning [`Error::assertion`] instead of panicking, so that
   a failing test body goes through
   [`hang_on_error`](crate::util::suspend::hang_on_error).
*/

use core::fmt::Debug;

use crate::error::Error;
use crate::types::channel::ChannelRecord;

fn fail(message: &str, expectation: String) -> Result<(), Error> {
    Err(Error::assertion(format!("{message}: {expectation}")))
}

pub fn assert_eq<T: Eq + Debug>(message: &str, left: &T, right: &T) -> Result<(), Error> {
    if left == right {
        Ok(())
    } else {
        fail(message, format!("expected {left:?} to equal {right:?}"))
    }
}

pub fn assert_not_eq<T: Eq + Debug>(message: &str, left: &T, right: &T) -> Result<(), Error> {
    if left != right {
        Ok(())
    } else {
        fail(message, format!("expected {left:?} to differ from {right:?}"))
    }
}

pub fn assert_gt<T: Ord + Debug>(message: &str, left: &T, right: &T) -> Result<(), Error> {
    if left > right {
        Ok(())
    } else {
        fail(message, format!("expected {left:?} to be greater than {right:?}"))
    }
}

pub fn assert_err<T: Debug, E: Debug>(message: &str, result: Result<T, E>) -> Result<(), Error> {
    match result {
        Err(_) => Ok(()),
        Ok(value) => fail(message, format!("expected an error, got {value:?}")),
    }
}

/**
   Assert that two channel records are the two ends of the same channel:
   on different chains, each naming the other as its counterparty.
*/
pub fn assert_channel_pair(a: &ChannelRecord, b: &ChannelRecord) -> Result<(), Error> {
    let message = format!("channel ends on {} and {}", a.chain_id, b.chain_id);

    assert_not_eq(&message, &a.chain_id, &b.chain_id)?;
    assert_eq(&message, &a.counterparty_channel_id(), &Some(b.channel_id()))?;
    assert_eq(&message, a.counterparty_port_id(), b.port_id())?;
    assert_eq(&message, &b.counterparty_channel_id(), &Some(a.channel_id()))?;
    assert_eq(&message, b.counterparty_port_id(), a.port_id())?;
    assert_eq(&message, &a.ordering(), &b.ordering())
}

#[cfg(test)]
mod tests {
    use super::*;

    use core::str::FromStr;
    use ibc_relayer_types::core::ics04_channel::channel::Ordering as Order;
    use ibc_relayer_types::core::ics24_host::identifier::{ChainId, ChannelId, ConnectionId, PortId};

    use crate::types::channel::{ChannelCounterparty, ChannelInfo, STATE_OPEN};

    fn record(chain: &str, channel: u64, counterparty: u64) -> ChannelRecord {
        ChannelRecord::new(
            ChainId::from_string(chain),
            "p1",
            ChannelInfo {
                state: STATE_OPEN.to_string(),
                ordering: Order::Unordered,
                version: "ics20-1".to_string(),
                port_id: PortId::transfer(),
                channel_id: ChannelId::new(channel),
                connection_hops: vec![ConnectionId::new(0)],
                counterparty: ChannelCounterparty {
                    port_id: PortId::transfer(),
                    channel_id: Some(ChannelId::new(counterparty)),
                },
            },
        )
    }

    #[test]
    fn matching_ends_form_a_pair() {
        assert!(assert_channel_pair(&record("gaia-1", 0, 3), &record("neutron-2", 3, 0)).is_ok());
    }

    #[test]
    fn crossed_ends_are_not_a_pair() {
        assert!(assert_channel_pair(&record("gaia-1", 0, 3), &record("neutron-2", 2, 0)).is_err());
        assert!(assert_channel_pair(&record("gaia-1", 0, 0), &record("gaia-1", 0, 0)).is_err());
    }

    #[test]
    fn port_mismatch_is_reported() {
        let a = record("gaia-1", 0, 3);
        let mut b = record("neutron-2", 3, 0);
        b.channel.port_id = PortId::from_str("consumer").unwrap();

        assert!(assert_channel_pair(&a, &b).is_err());
    }
}
