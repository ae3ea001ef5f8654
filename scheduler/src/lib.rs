pub mod cluster;
pub mod config;
pub mod framework;
pub mod plugins;
pub mod runner;
