pub mod config;
pub mod repl;

pub use config::Config;
