/*!
   Definitions of data types used by the framework: the topology
   description, links, channel records and the test configuration.
*/

pub mod channel;
pub mod config;
pub mod env;
pub mod link;
pub mod topology;
