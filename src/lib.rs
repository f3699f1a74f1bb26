#[macro_use]
extern crate tracing;

pub mod backend;
pub mod cli;
pub mod input;
pub mod layout;
pub mod state;
pub mod utils;
