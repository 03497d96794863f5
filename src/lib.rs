#[macro_use]
extern crate log;

pub mod bound;
pub mod cli;
pub mod diagnostics;
pub mod filter;
pub mod io;
pub mod pipeline;
pub mod quality;
pub mod seq;
pub mod summary;
pub mod transform;
