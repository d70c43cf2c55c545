// Scrumpy Build - mode-resolved build descriptors for the front-end bundle

pub mod cli;
pub mod core;
pub mod paths;
pub mod utils;

pub use crate::core::{resolve_for_mode, BuildDescriptor, DescriptorBuilder, Mode};
