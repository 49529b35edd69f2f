/*!
   Helper functions for deriving IBC denom.
*/

use core::fmt::{self, Display};
use ibc_relayer_types::core::ics24_host::identifier::{ChannelId, PortId};
use sha2::{Digest, Sha256};
use subtle_encoding::hex;

use crate::error::{handle_generic_error, Error};

/**
   A denomination, together with the trace of the hops it took when it
   was received over IBC.
*/
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Denom {
    Base(String),
    Ibc {
        /**
           The `port/channel` hops, most recent first, as seen on the
           chain holding the token.
        */
        path: String,
        denom: String,
        hashed: String,
    },
}

/**
   Derive the transferred token denomination using
   <https://github.com/cosmos/ibc-go/blob/main/docs/architecture/adr-001-coin-source-tracing.md>
*/
fn derive_denom_with_path(transfer_path: &str) -> Result<String, Error> {
    let mut hasher = Sha256::new();
    hasher.update(transfer_path.as_bytes());

    let denom_bytes = hasher.finalize();
    let denom_hex = String::from_utf8(hex::encode_upper(denom_bytes)).map_err(handle_generic_error)?;

    Ok(format!("ibc/{denom_hex}"))
}

/**
   Derives the denom on the receiving chain of a token sent from the
   counterparty chain, where `port_id` and `channel_id` are the receiving
   chain's end of the channel.
*/
pub fn derive_ibc_denom(
    port_id: &PortId,
    channel_id: &ChannelId,
    denom: &Denom,
) -> Result<Denom, Error> {
    let path = match denom {
        Denom::Base(_) => format!("{port_id}/{channel_id}"),
        Denom::Ibc { path, .. } => format!("{port_id}/{channel_id}/{path}"),
    };

    let base = denom.base_denom().to_string();
    let hashed = derive_denom_with_path(&format!("{path}/{base}"))?;

    Ok(Denom::Ibc {
        path,
        denom: base,
        hashed,
    })
}

impl Denom {
    pub fn base(denom: &str) -> Self {
        Denom::Base(denom.to_string())
    }

    pub fn base_denom(&self) -> &str {
        match self {
            Denom::Base(denom) => denom,
            Denom::Ibc { denom, .. } => denom,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Denom::Base(denom) => denom,
            Denom::Ibc { hashed, .. } => hashed,
        }
    }

    /**
       Remove the most recent hop if it went through `port_id/channel_id`,
       which is the case when a token is sent back the way it came.
       Returns `None` otherwise.
    */
    pub fn strip_hop(&self, port_id: &PortId, channel_id: &ChannelId) -> Result<Option<Denom>, Error> {
        let Denom::Ibc { path, denom, .. } = self else {
            return Ok(None);
        };

        let hop = format!("{port_id}/{channel_id}");

        if *path == hop {
            Ok(Some(Denom::Base(denom.clone())))
        } else if let Some(rest) = path.strip_prefix(&format!("{hop}/")) {
            Ok(Some(Denom::Ibc {
                path: rest.to_string(),
                denom: denom.clone(),
                hashed: derive_denom_with_path(&format!("{rest}/{denom}"))?,
            }))
        } else {
            Ok(None)
        }
    }
}

impl Display for Denom {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        write!(f, "{}", self.as_str())
    }
}
