//! Token DAO deployment scenario.
//!
//! Deploys a MiniMe token before the app proxy is initialized, hands its
//! address to the proxy initializer, installs voting, vault and finance with
//! their permissions, and assigns vestings after each upgrade.

pub mod hooks;
pub mod plugin;
pub mod session;

pub use dephook_core::constants;
pub use plugin::TokenDaoHooks;
pub use session::DeploymentSession;
