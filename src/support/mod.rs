//! Small cross-cutting helpers shared by the lexer and parser engines.

mod code;
mod log;

pub use code::{Code, Position};
pub use log::BuildLog;
