//! String scanning helpers shared by the parser, the store and code synthesis.
pub mod finder;
pub mod macros;
