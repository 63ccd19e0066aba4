pub mod config;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod portal;
pub mod prompt;
pub mod ranking;
pub mod roster;
pub mod semester;
pub mod types;
