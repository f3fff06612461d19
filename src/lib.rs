pub mod cli;
pub mod io;
pub mod model;
pub mod ops;
pub mod tracing_setup;
pub mod tui;
pub mod util;
