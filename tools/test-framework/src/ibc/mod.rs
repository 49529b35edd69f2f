/*!
   Code that may belong to the [`ibc_relayer_types`] crate, but is only
   needed for testing.
*/

pub mod denom;
