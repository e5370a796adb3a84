pub mod app;
pub mod config;
pub mod games;
pub mod input;
pub mod scheduler;
pub mod session;
pub mod ui;
