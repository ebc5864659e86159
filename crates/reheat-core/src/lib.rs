#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

pub mod entry;
pub mod error;
pub mod inject;
pub mod options;

pub use entry::{Entry, EntryFactory, FactoryArgs, FactoryError};
pub use error::Error;
pub use inject::{inject, inject_value, InjectOptions, OverlayEntry};
pub use options::{OverlaySetting, RefreshOptions, RuntimeModules};
