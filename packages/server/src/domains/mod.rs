pub mod debug_log;
pub mod webhook;
