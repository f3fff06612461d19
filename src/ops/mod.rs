pub mod client;
pub mod format;
pub mod hashtags;
pub mod request;
pub mod selection;
pub mod session;
pub mod titles;
