//! Hook registry — one handler per hook point.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::info;

use dephook_core::error::AppError;
use dephook_core::result::AppResult;

use super::definitions::{HookOutput, HookParams, HookPoint, RuntimeEnv};

/// Trait for hook handler implementations.
#[async_trait]
pub trait HookHandler: Send + Sync + std::fmt::Debug {
    /// Handler name used in logs.
    fn name(&self) -> &str;

    /// The hook point this handler serves.
    fn hook_point(&self) -> HookPoint;

    /// Runs the hook.
    async fn handle(&self, params: &HookParams, env: &RuntimeEnv) -> AppResult<HookOutput>;
}

/// Registry of hook handlers keyed by hook point.
#[derive(Debug)]
pub struct HookRegistry {
    /// Hook point → handler.
    handlers: RwLock<BTreeMap<HookPoint, Arc<dyn HookHandler>>>,
}

impl HookRegistry {
    /// Creates a new empty hook registry.
    pub fn new() -> Self {
        Self {
            handlers: RwLock::new(BTreeMap::new()),
        }
    }

    /// Registers a handler under its hook point.
    ///
    /// Fails with `Conflict` if the point already has a handler.
    pub async fn register(&self, handler: Arc<dyn HookHandler>) -> AppResult<()> {
        let hook = handler.hook_point();
        let mut handlers = self.handlers.write().await;

        if let Some(existing) = handlers.get(&hook) {
            return Err(AppError::conflict(format!(
                "Hook '{}' already handled by '{}'",
                hook,
                existing.name()
            )));
        }

        info!(hook = %hook, handler = %handler.name(), "Hook handler registered");
        handlers.insert(hook, handler);

        Ok(())
    }

    /// Registers every handler, stopping at the first conflict.
    pub async fn register_all(&self, handlers: Vec<Arc<dyn HookHandler>>) -> AppResult<()> {
        for handler in handlers {
            self.register(handler).await?;
        }
        Ok(())
    }

    /// Returns the handler for a hook point.
    pub async fn get(&self, hook: HookPoint) -> Option<Arc<dyn HookHandler>> {
        let handlers = self.handlers.read().await;
        handlers.get(&hook).cloned()
    }

    /// Returns whether a handler is registered for a hook point.
    pub async fn contains(&self, hook: HookPoint) -> bool {
        let handlers = self.handlers.read().await;
        handlers.contains_key(&hook)
    }

    /// Returns registered hook points in lifecycle order.
    pub async fn registered_points(&self) -> Vec<HookPoint> {
        let handlers = self.handlers.read().await;
        handlers.keys().copied().collect()
    }

    /// Returns the number of registered handlers.
    pub async fn len(&self) -> usize {
        let handlers = self.handlers.read().await;
        handlers.len()
    }

    /// Returns whether no handler is registered.
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl Default for HookRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Noop(HookPoint, &'static str);

    #[async_trait]
    impl HookHandler for Noop {
        fn name(&self) -> &str {
            self.1
        }

        fn hook_point(&self) -> HookPoint {
            self.0
        }

        async fn handle(&self, _params: &HookParams, _env: &RuntimeEnv) -> AppResult<HookOutput> {
            Ok(HookOutput::None)
        }
    }

    #[tokio::test]
    async fn test_duplicate_point_rejected() {
        let registry = HookRegistry::new();
        registry
            .register(Arc::new(Noop(HookPoint::PreInit, "first")))
            .await
            .unwrap();

        let err = registry
            .register(Arc::new(Noop(HookPoint::PreInit, "second")))
            .await
            .unwrap_err();
        assert_eq!(err.kind, dephook_core::error::ErrorKind::Conflict);
        assert!(err.message.contains("first"));

        let kept = registry.get(HookPoint::PreInit).await.unwrap();
        assert_eq!(kept.name(), "first");
    }

    #[tokio::test]
    async fn test_points_listed_in_lifecycle_order() {
        let registry = HookRegistry::new();
        registry
            .register_all(vec![
                Arc::new(Noop(HookPoint::PostUpdate, "c")) as Arc<dyn HookHandler>,
                Arc::new(Noop(HookPoint::PreDao, "a")),
                Arc::new(Noop(HookPoint::GetInitParams, "b")),
            ])
            .await
            .unwrap();

        assert_eq!(
            registry.registered_points().await,
            vec![
                HookPoint::PreDao,
                HookPoint::GetInitParams,
                HookPoint::PostUpdate
            ]
        );
        assert_eq!(registry.len().await, 3);
        assert!(!registry.contains(HookPoint::PostInit).await);
    }
}
