// Core domain layer
pub mod descriptor;
pub mod env;
pub mod filename;
pub mod mode;
pub mod models;
pub mod plugins;
pub mod rules;

pub use descriptor::*;
pub use env::*;
pub use filename::*;
pub use mode::*;
pub use models::*;
pub use plugins::*;
pub use rules::*;
