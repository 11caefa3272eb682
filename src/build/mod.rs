//! Batch generation for dexsprite
//!
//! Runs the generation steps over every species directory of a project.
//!
//! # Overview
//!
//! - **Discovery**: every subdirectory of the sprites root is a species
//! - **Steps**: front, back, overworld and icons, each over all species
//! - **Isolation**: a failing species is reported and the step continues
//!
//! # Example
//!
//! ```ignore
//! use dexsprite::build::{BuildContext, ConsoleProgress, Generator, StepSelection};
//! use dexsprite::config::load_config;
//!
//! let config = load_config(None)?;
//! let context = BuildContext::new(config, project_root);
//! let generator = Generator::new(context)?;
//!
//! let result = generator.run(&StepSelection::all(), &ConsoleProgress::new())?;
//! println!("{}", result.summary());
//! ```

pub mod context;
pub mod discovery;
pub mod parallel;
pub mod pipeline;
pub mod progress;
pub mod result;

pub use context::*;
pub use discovery::*;
pub use parallel::*;
pub use pipeline::*;
pub use progress::*;
pub use result::*;
