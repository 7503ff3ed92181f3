#[allow(clippy::module_inception)]
mod coordinator;
mod notice;
mod rename_prompt;

pub use {coordinator::SessionCoordinator, notice::Notice, rename_prompt::RenamePrompt};
