pub mod builder;
pub mod built;
