//! Interactive consultation in the terminal.
//!
//! Entry point: `loop_runner::run_chat_loop`.

pub mod banner;
pub mod commands;
pub mod form_entry;
pub mod input;
pub mod loop_runner;
pub mod renderer;
