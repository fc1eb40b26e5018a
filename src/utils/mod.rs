pub mod display;
pub mod host;
