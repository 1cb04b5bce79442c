//! CLI command handlers. Each command is in its own file.

pub(super) mod images;
mod inspect;
pub(super) mod sweep;

pub use images::{run_images, ImageArgs};
pub use inspect::run_inspect;
pub use sweep::{run_sweep, SweepArgs};
