pub mod allocator;
pub mod config_source;
pub mod lifecycle_handler;
pub mod monitor_thread;
pub mod object_manager;
