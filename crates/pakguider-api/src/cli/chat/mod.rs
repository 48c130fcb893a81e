//! Interactive terminal chat for PakGuider.
//!
//! Implements the chat loop: welcome banner, greeting, example shortcuts,
//! a spinner while the pipeline runs, markdown-rendered answers and slash
//! commands. Entry point: `loop_runner::run_chat_loop`.

pub mod banner;
pub mod commands;
pub mod input;
pub mod loop_runner;
pub mod renderer;
