/*!
   Chain configurations, genesis patching, and the handle through which
   tests interact with a running chain.
*/

pub mod builtin;
pub mod config;
pub mod exec;
pub mod genesis;
pub mod handle;
