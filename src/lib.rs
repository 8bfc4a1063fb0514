pub mod api;
pub mod config;
pub mod engine;
pub mod entities;
pub mod error;
pub mod external;
pub mod planner;
pub mod prompt;
pub mod server;

#[cfg(test)]
mod test_support;
