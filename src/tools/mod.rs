pub mod delegate;
pub mod runner;
pub mod toolchain;
