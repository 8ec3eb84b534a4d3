pub mod cli;
pub mod commands;
pub mod common;
pub mod density;
pub mod ingest;
pub mod normalize;
pub mod reference;
pub mod resolve;
