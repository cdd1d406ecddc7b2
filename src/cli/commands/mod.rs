//! Subcommand implementations.

mod doctor;
mod stage;
mod upgrade;

pub use doctor::doctor;
pub use stage::run_stage;
pub use upgrade::upgrade;
