//! Augmented-prompt assembly.

pub mod assembler;
