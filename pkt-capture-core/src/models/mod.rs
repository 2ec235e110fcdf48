pub mod config;
pub mod error;
pub mod frame;
pub mod ids;
pub mod mode;
pub mod state;
