/// Main configuration module.
///
/// Re-exports submodules for gameplay constants and the environment-driven server settings.
pub mod game;
pub mod server;
