//! Core reconstruction modules
//!
//! - `markup`: reduces a raw fragment to normalized table markup
//! - `options`: content clean-up options
//! - `table`: row/cell parser, grid linker and the `Table` facade

pub mod markup;
pub mod options;
pub mod table;
