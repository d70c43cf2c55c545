// Shared utilities module
pub mod config_loader;
pub mod errors;
pub mod logging;
pub mod path_aliases;
pub mod ui;

pub use config_loader::*;
pub use errors::*;
pub use logging::*;
pub use path_aliases::*;
pub use ui::*;
