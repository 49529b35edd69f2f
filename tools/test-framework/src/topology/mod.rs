/*!
   Validation, registration and channel discovery of the named paths
   connecting the chains of a test.
*/

pub mod discover;
pub mod link;
pub mod validate;
