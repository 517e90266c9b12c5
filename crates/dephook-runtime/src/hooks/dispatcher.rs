//! Hook dispatcher — fires one hook point at a time on behalf of the host.
//!
//! - A point with no registered handler is inert and yields `HookOutput::None`.
//! - Every point except `postUpdate` may fire at most once per run.
//! - Handler errors are returned unchanged; nothing is retried or rolled back.

use std::sync::{Arc, Mutex};

use tracing::{debug, error, info};
use uuid::Uuid;

use dephook_core::error::AppError;
use dephook_core::result::AppResult;

use super::definitions::{HookOutput, HookParams, HookPoint, RuntimeEnv};
use super::registry::HookRegistry;

/// Dispatches hook points to registered handlers for one deployment run.
#[derive(Debug)]
pub struct HookDispatcher {
    /// Hook registry.
    registry: Arc<HookRegistry>,
    /// Identifies this run in logs.
    run_id: Uuid,
    /// Points fired so far, in order.
    fired: Mutex<Vec<HookPoint>>,
}

impl HookDispatcher {
    /// Creates a dispatcher for a new deployment run.
    pub fn new(registry: Arc<HookRegistry>) -> Self {
        Self {
            registry,
            run_id: Uuid::new_v4(),
            fired: Mutex::new(Vec::new()),
        }
    }

    /// Fires `hook` with the host's params and environment.
    pub async fn dispatch(
        &self,
        hook: HookPoint,
        params: &HookParams,
        env: &RuntimeEnv,
    ) -> AppResult<HookOutput> {
        self.mark_fired(hook)?;

        let Some(handler) = self.registry.get(hook).await else {
            debug!(run_id = %self.run_id, hook = %hook, "No handler registered, skipping");
            return Ok(HookOutput::None);
        };

        info!(
            run_id = %self.run_id,
            hook = %hook,
            handler = %handler.name(),
            "Running hook"
        );

        match handler.handle(params, env).await {
            Ok(output) => {
                debug!(run_id = %self.run_id, hook = %hook, "Hook finished");
                Ok(output)
            }
            Err(e) => {
                error!(
                    run_id = %self.run_id,
                    hook = %hook,
                    handler = %handler.name(),
                    error = %e,
                    "Hook failed"
                );
                Err(e)
            }
        }
    }

    /// Fires `getInitParams` and returns the proxy initializer arguments.
    pub async fn init_params(
        &self,
        params: &HookParams,
        env: &RuntimeEnv,
    ) -> AppResult<Vec<serde_json::Value>> {
        if !self.registry.contains(HookPoint::GetInitParams).await {
            return Err(AppError::not_found("No getInitParams hook registered"));
        }

        self.dispatch(HookPoint::GetInitParams, params, env)
            .await?
            .into_init_params()
            .ok_or_else(|| AppError::internal("getInitParams hook returned no init params"))
    }

    /// Returns the points fired so far, in order.
    pub fn fired(&self) -> Vec<HookPoint> {
        self.fired.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Returns the run id.
    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    fn mark_fired(&self, hook: HookPoint) -> AppResult<()> {
        let mut fired = self.fired.lock().unwrap_or_else(|e| e.into_inner());
        if !hook.is_repeatable() && fired.contains(&hook) {
            return Err(AppError::conflict(format!(
                "Hook '{hook}' already fired in run {}",
                self.run_id
            )));
        }
        fired.push(hook);
        Ok(())
    }
}
