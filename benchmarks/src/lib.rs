pub mod args;
pub mod results;
pub mod runner;
pub mod service;
