//! completion-context: context assembly engine for AI code completion
//!
//! Assembles fill-in-the-middle prompts from editor state: a sliding text
//! window around the cursor, recursive structural summaries of the current
//! file and its imports, staged VCS changes, and other open files. An
//! orchestrator layers debouncing, a per-line cache, and cancellation on
//! top so an editor plugin can forward raw keystrokes.

pub mod cli;
pub mod config;
pub mod domain;
pub mod editor;
pub mod orchestrator;
pub mod prompt;
pub mod providers;
pub mod summary;
