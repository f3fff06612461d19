pub mod api;
pub mod config_io;
pub mod memory;
pub mod worker;
