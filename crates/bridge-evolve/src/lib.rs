pub mod config;
pub mod evolution;
pub mod logging;
pub mod report;
pub mod runner;
pub mod simulation;
