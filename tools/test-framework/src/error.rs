//! Error type used for the tests.

use core::convert::{From, Into};
use eyre::Report;
use flex_error::{define_error, TraceError};
use std::io::{Error as IoError, ErrorKind as IoErrorKind};

define_error! {
    Error {
        Generic
            [ TraceError<Report> ]
            | _ | { "generic error" },

        Assertion
            { message: String }
            | e | { format_args!("assertion failure: {}", e.message) },

        Io
            [ TraceError<IoError> ]
            | _ | { "io error"},

        CommandNotFound
            { command: String }
            [ TraceError<IoError> ]
            | e | { format_args!("failed to execute command: {}. make sure it is available in $PATH", e.command) },

        UnderSpecifiedPath
            { path: String, size: usize }
            | e | {
                format_args!("ibc path '{}' has only {} chain(s), expected exactly 2",
                    e.path, e.size)
            },

        OverSpecifiedPath
            { path: String, size: usize }
            | e | {
                format_args!("ibc path '{}' has {} chains, expected exactly 2",
                    e.path, e.size)
            },

        EmptyPathName
            | _ | { "ibc path name must not be empty" },

        SelfLoopPath
            { path: String, index: usize }
            | e | {
                format_args!("ibc path '{}' connects chain {} to itself",
                    e.path, e.index)
            },

        DuplicatePath
            { path: String }
            | e | { format_args!("ibc path '{}' is declared more than once", e.path) },

        ChainIndexOutOfRange
            { path: String, index: usize, size: usize }
            | e | {
                format_args!("ibc path '{}' refers to chain {} but only {} chain(s) are available",
                    e.path, e.index, e.size)
            },

        MalformedDocument
            { reason: String }
            | e | { format_args!("malformed genesis document: {}", e.reason) },

        PathNotSettable
            { key_path: String }
            | e | {
                format_args!("cannot set genesis value at `{}`: an intermediate segment is not a matching container",
                    e.key_path)
            },

        EmptyKeyPath
            | _ | { "genesis key path must not be empty" },

        NoTransferChannel
            { chain_id: String, counterparty_chain_id: String }
            | e | {
                format_args!("no transfer channel found on chain {} towards chain {}",
                    e.chain_id, e.counterparty_chain_id)
            },

        NoIcsChannel
            { chain_id: String, counterparty_chain_id: String }
            | e | {
                format_args!("no ordered interchain security channel found on chain {} towards chain {}",
                    e.chain_id, e.counterparty_chain_id)
            },

        AmbiguousChannel
            { chain_id: String, counterparty_chain_id: String, candidates: Vec<String> }
            | e | {
                format_args!("found {} matching channels on chain {} towards chain {}: [{}]",
                    e.candidates.len(), e.chain_id, e.counterparty_chain_id, e.candidates.join(", "))
            },

        ChannelMismatch
            { path: String, chain_a: String, channel_a: String, chain_b: String, channel_b: String }
            | e | {
                format_args!("channels discovered for path '{}' do not reference each other: {}/{} and {}/{}",
                    e.path, e.chain_a, e.channel_a, e.chain_b, e.channel_b)
            },

        DuplicateChain
            { chain_id: String }
            | e | { format_args!("chain {} was added to the interchain more than once", e.chain_id) },

        UnknownChain
            { chain_id: String, path: String }
            | e | {
                format_args!("ibc path '{}' refers to chain {} which was not added to the interchain",
                    e.path, e.chain_id)
            },

        UnknownChainName
            { name: String }
            | e | { format_args!("no built-in chain configuration named '{}'", e.name) },

        MissingRelayer
            { path: String }
            | e | { format_args!("ibc path '{}' requires a relayer but none was added", e.path) },

        UnknownPath
            { path: String }
            | e | { format_args!("relayer does not know ibc path '{}'", e.path) },

        InsufficientFunds
            { address: String, denom: String, balance: u128, amount: u128 }
            | e | {
                format_args!("account {} holds {}{} which is less than {}{}",
                    e.address, e.balance, e.denom, e.amount, e.denom)
            },

        PoisonedMutex
            | _ | { "poisoned mutex lock" },

        Retry
            {
                task_name: String,
                attempts: u16,
            }
            | e | {
                format_args!(
                    "Expected task to eventually succeeed, but failed after {} attempts: {}",
                    e.attempts,
                    e.task_name
                )
            },
    }
}

pub fn handle_generic_error(e: impl Into<Report>) -> Error {
    Error::generic(e.into())
}

pub fn handle_exec_error(command: &str) -> impl FnOnce(IoError) -> Error + '_ {
    |e| match e.kind() {
        IoErrorKind::NotFound => Error::command_not_found(command.to_string(), e),
        _ => Error::io(e),
    }
}

impl From<Report> for Error {
    fn from(e: Report) -> Self {
        Error::generic(e)
    }
}

impl From<IoError> for Error {
    fn from(e: IoError) -> Self {
        Error::io(e)
    }
}
