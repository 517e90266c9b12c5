//! Hook system — typed hook definitions, registry, and dispatcher.

pub mod definitions;
pub mod dispatcher;
pub mod registry;

pub use definitions::{HookOutput, HookParams, HookPoint, RuntimeEnv};
pub use dispatcher::HookDispatcher;
pub use registry::{HookHandler, HookRegistry};
