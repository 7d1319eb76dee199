// Server module entry point
// Listener bootstrap, connection handling, shutdown signals, and the
// accept loop

pub mod connection;
pub mod listener;
pub mod signal;

// `loop` is a keyword, so the module is declared as `server_loop`
#[path = "loop.rs"]
pub mod server_loop;

pub use listener::create_listener;
pub use server_loop::start_server_loop;
