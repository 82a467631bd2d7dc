pub mod app;
pub mod cli;
pub mod config;
pub mod error;
pub mod input;
pub mod loading;
pub mod render;
pub mod session;
