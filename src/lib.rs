// Library surface for headless/integration tests and reuse.
// The binary in main.rs only adds argument parsing and the terminal loop.
pub mod app;
pub mod app_dirs;
pub mod clock;
pub mod config;
pub mod error;
pub mod games;
pub mod playground;
pub mod random;
pub mod runtime;
pub mod timer;
pub mod ui;
pub mod util;

pub use app::App;
pub use error::{PlaygroundError, Result};
