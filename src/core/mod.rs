//! Core process state shared across the codebase.

mod state;

pub use state::{
    is_shutdown, register_server, register_shutdown_signal, setup_shutdown_handler,
};
