/*!
   Framework code for making it easier to write test cases.
*/

pub mod interchain;
