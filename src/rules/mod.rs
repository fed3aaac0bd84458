pub mod compile;
pub mod defs;
pub mod loader;
pub mod validate;
