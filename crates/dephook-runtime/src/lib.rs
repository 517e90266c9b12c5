//! # dephook-runtime
//!
//! Runtime boundary for deployment hooks. Provides:
//!
//! - Narrow capability traits for everything the host supplies (token
//!   factory, chain client, app installer, proxy handle, clock)
//! - Hook points, the registry (one handler per point), and the dispatcher
//!   that enforces at-most-once invocation per deployment run
//! - An in-memory recording runtime behind the `mock` feature

pub mod capabilities;
pub mod hooks;
#[cfg(feature = "mock")]
pub mod mock;

pub use hooks::definitions::{HookOutput, HookParams, HookPoint, RuntimeEnv};
pub use hooks::dispatcher::HookDispatcher;
pub use hooks::registry::{HookHandler, HookRegistry};
