#![deny(warnings)]
pub mod batch;
pub mod config;
pub mod logging;
pub mod menu;
