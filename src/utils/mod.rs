// Utils

pub mod logging;
pub mod progress;

pub use logging::init_tracing;
pub use progress::create_progress_bar;
