/*!
   The relayer interface used to create paths and query channels, and its
   implementation on top of the `rly` command line.
*/

pub mod bootstrap;
pub mod handle;
pub mod rly;
