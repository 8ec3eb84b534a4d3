pub mod error;
pub mod logging;
pub mod output;
pub mod progress;
pub mod types;
pub mod utils;

pub use error::PipelineError;
pub use logging::*;
pub use output::YearOutputPaths;
pub use types::*;
pub use utils::*;

pub use progress::create_count_progress_bar;
