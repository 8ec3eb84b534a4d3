pub mod duplicates;
pub mod pipeline;
pub mod resolve;

pub use duplicates::run_duplicates;
pub use pipeline::run_pipeline;
pub use resolve::{process_year, run_resolve};
