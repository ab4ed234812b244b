pub mod codec;
pub mod commands;
pub mod config;
pub mod error;
pub mod form;
pub mod logging;
pub mod model;
pub mod output;
pub mod preview;
pub mod settings;
