/*!
   Utility and helper functions used in the tests.
*/

pub mod assert;
pub mod interchain_security;
pub mod random;
pub mod retry;
pub mod suspend;
