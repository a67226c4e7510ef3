//! Hot-swappable handle to the active decision engine.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

use arc_swap::ArcSwapOption;
use authz_pep_sdk::{
    EvaluationRequest, EvaluationResult, PdpFactory, PolicyDecisionPoint, PolicyEnforcer,
    TimeoutPdp,
};
use tokio::sync::Mutex;
use tracing::info;

use super::error::DomainError;

/// Lifecycle state of an [`EngineHandle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    /// No engine was ever built.
    Uninitialized,
    /// An engine is active. `generation` increases with every build.
    Active { generation: u64 },
    /// The engine was torn down.
    Destroyed,
}

/// An engine instance together with the generation it was built as.
pub struct ActiveEngine {
    generation: u64,
    engine: Arc<dyn PolicyDecisionPoint>,
}

impl ActiveEngine {
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    #[must_use]
    pub fn engine(&self) -> &Arc<dyn PolicyDecisionPoint> {
        &self.engine
    }

    /// Enforcer bound to this engine instance.
    #[must_use]
    pub fn enforcer(&self) -> PolicyEnforcer {
        PolicyEnforcer::new(Arc::clone(&self.engine))
    }
}

impl std::fmt::Debug for ActiveEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActiveEngine")
            .field("generation", &self.generation)
            .finish_non_exhaustive()
    }
}

/// Owns the active engine and the factory that builds it.
///
/// Readers take a lock-free snapshot of the active engine and evaluate
/// against it outside any lock. Builds are serialized by `lifecycle`, which is
/// held only across build-and-store and never by evaluations. A new engine is
/// fully built before it is published, so readers never see a partial one.
pub struct EngineHandle {
    factory: Arc<dyn PdpFactory>,
    evaluation_timeout: Option<Duration>,
    active: ArcSwapOption<ActiveEngine>,
    last_generation: AtomicU64,
    destroyed: AtomicBool,
    lifecycle: Mutex<()>,
}

impl EngineHandle {
    #[must_use]
    pub fn new(factory: Arc<dyn PdpFactory>, evaluation_timeout: Option<Duration>) -> Self {
        Self {
            factory,
            evaluation_timeout,
            active: ArcSwapOption::from(None),
            last_generation: AtomicU64::new(0),
            destroyed: AtomicBool::new(false),
            lifecycle: Mutex::new(()),
        }
    }

    /// Name of the engine the factory builds.
    #[must_use]
    pub fn engine_name(&self) -> &str {
        self.factory.name()
    }

    /// Build an engine and make it active. Calling it again behaves like
    /// [`EngineHandle::reload`], and it may be called after a teardown.
    ///
    /// # Errors
    ///
    /// [`DomainError::BuildFailed`] if the factory fails; the previously active
    /// engine, if any, stays active.
    #[tracing::instrument(skip_all, fields(engine = %self.factory.name()))]
    pub async fn initialize(&self) -> Result<u64, DomainError> {
        let _guard = self.lifecycle.lock().await;
        let generation = self.build_and_store().await?;
        self.destroyed.store(false, Ordering::Release);
        info!(generation, "Decision engine initialized");
        Ok(generation)
    }

    /// Build a new engine from the stored factory and swap it in.
    ///
    /// Calls holding the previous engine finish against it.
    ///
    /// # Errors
    ///
    /// - [`DomainError::NotActive`] if no engine is active
    /// - [`DomainError::BuildFailed`] if the factory fails; the previous engine stays active
    #[tracing::instrument(skip_all, fields(engine = %self.factory.name()))]
    pub async fn reload(&self) -> Result<u64, DomainError> {
        let _guard = self.lifecycle.lock().await;
        let previous = self
            .active
            .load()
            .as_ref()
            .map(|a| a.generation)
            .ok_or(DomainError::NotActive)?;

        let generation = self.build_and_store().await?;
        info!(previous, generation, "Decision engine reloaded");
        Ok(generation)
    }

    /// Drop the active engine. Returns whether one was active.
    #[tracing::instrument(skip_all, fields(engine = %self.factory.name()))]
    pub async fn teardown(&self) -> bool {
        let _guard = self.lifecycle.lock().await;
        let previous = self.active.swap(None);
        self.destroyed.store(true, Ordering::Release);
        if let Some(previous) = &previous {
            info!(generation = previous.generation, "Decision engine torn down");
        }
        previous.is_some()
    }

    /// Snapshot of the active engine.
    #[must_use]
    pub fn current(&self) -> Option<Arc<ActiveEngine>> {
        self.active.load_full()
    }

    /// Evaluate one request against the active engine.
    ///
    /// # Errors
    ///
    /// - [`DomainError::NotActive`] if no engine is active
    /// - engine errors converted from [`authz_pep_sdk::PdpError`]
    pub async fn evaluate(
        &self,
        request: &EvaluationRequest,
    ) -> Result<EvaluationResult, DomainError> {
        let active = self.current().ok_or(DomainError::NotActive)?;
        Ok(active.engine.evaluate(request).await?)
    }

    #[must_use]
    pub fn state(&self) -> EngineState {
        match self.active.load().as_ref() {
            Some(active) => EngineState::Active {
                generation: active.generation,
            },
            None if self.destroyed.load(Ordering::Acquire) => EngineState::Destroyed,
            None => EngineState::Uninitialized,
        }
    }

    /// Caller must hold `lifecycle`.
    async fn build_and_store(&self) -> Result<u64, DomainError> {
        let engine = self
            .factory
            .build()
            .await
            .map_err(|source| DomainError::BuildFailed {
                engine: self.factory.name().to_owned(),
                source,
            })?;

        let engine: Arc<dyn PolicyDecisionPoint> = match self.evaluation_timeout {
            Some(deadline) => Arc::new(TimeoutPdp::new(engine, deadline)),
            None => engine,
        };

        let generation = self.last_generation.fetch_add(1, Ordering::AcqRel) + 1;
        self.active
            .store(Some(Arc::new(ActiveEngine { generation, engine })));
        Ok(generation)
    }
}

impl std::fmt::Debug for EngineHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EngineHandle")
            .field("engine", &self.factory.name())
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use std::sync::atomic::AtomicUsize;

    use async_trait::async_trait;
    use authz_pep_sdk::pep::{wrap_action, wrap_resource, wrap_subject};
    use authz_pep_sdk::{Decision, PdpError};

    use super::*;

    /// Engine that tags every result with the build it came from.
    struct Tagged(usize);

    #[async_trait]
    impl PolicyDecisionPoint for Tagged {
        async fn evaluate(&self, _req: &EvaluationRequest) -> Result<EvaluationResult, PdpError> {
            Ok(EvaluationResult::new(Decision::Permit).with_status(self.0.to_string()))
        }
    }

    /// Factory counting builds; fails every build once `fail` is set.
    #[derive(Default)]
    struct CountingFactory {
        builds: AtomicUsize,
        fail: AtomicBool,
    }

    #[async_trait]
    impl PdpFactory for CountingFactory {
        fn name(&self) -> &'static str {
            "counting"
        }

        async fn build(&self) -> Result<Arc<dyn PolicyDecisionPoint>, PdpError> {
            if self.fail.load(Ordering::SeqCst) {
                return Err(PdpError::InvalidConfiguration("broken policy".to_owned()));
            }
            let n = self.builds.fetch_add(1, Ordering::SeqCst) + 1;
            Ok(Arc::new(Tagged(n)))
        }
    }

    fn request() -> EvaluationRequest {
        EvaluationRequest {
            subject: Arc::new(wrap_subject(Some("alice"))),
            action: Arc::new(wrap_action("getDatastream", "API-A", "")),
            resource: wrap_resource("obj:42", "example-ns").unwrap(),
        }
    }

    #[tokio::test]
    async fn evaluate_before_initialize_is_not_active() {
        let handle = EngineHandle::new(Arc::new(CountingFactory::default()), None);

        assert_eq!(handle.state(), EngineState::Uninitialized);
        assert!(handle.current().is_none());
        assert!(matches!(
            handle.evaluate(&request()).await,
            Err(DomainError::NotActive)
        ));
    }

    #[tokio::test]
    async fn initialize_then_reload_swaps_engine() {
        let handle = EngineHandle::new(Arc::new(CountingFactory::default()), None);

        assert_eq!(handle.initialize().await.unwrap(), 1);
        let before = handle.current().unwrap();
        assert_eq!(
            handle.evaluate(&request()).await.unwrap().status_message.as_deref(),
            Some("1")
        );

        assert_eq!(handle.reload().await.unwrap(), 2);
        assert_eq!(handle.state(), EngineState::Active { generation: 2 });
        assert_eq!(
            handle.evaluate(&request()).await.unwrap().status_message.as_deref(),
            Some("2")
        );

        // A snapshot taken before the swap still evaluates against the old engine.
        let old = before.engine().evaluate(&request()).await.unwrap();
        assert_eq!(old.status_message.as_deref(), Some("1"));
    }

    #[tokio::test]
    async fn second_initialize_behaves_like_reload() {
        let handle = EngineHandle::new(Arc::new(CountingFactory::default()), None);

        handle.initialize().await.unwrap();
        assert_eq!(handle.initialize().await.unwrap(), 2);
        assert_eq!(handle.state(), EngineState::Active { generation: 2 });
    }

    #[tokio::test]
    async fn reload_requires_an_active_engine() {
        let handle = EngineHandle::new(Arc::new(CountingFactory::default()), None);

        assert!(matches!(handle.reload().await, Err(DomainError::NotActive)));
    }

    #[tokio::test]
    async fn failed_build_keeps_previous_engine() {
        let factory = Arc::new(CountingFactory::default());
        let handle = EngineHandle::new(factory.clone(), None);
        handle.initialize().await.unwrap();

        factory.fail.store(true, Ordering::SeqCst);
        let err = handle.reload().await.unwrap_err();

        assert!(matches!(
            err,
            DomainError::BuildFailed { ref engine, source: PdpError::InvalidConfiguration(_) }
                if engine == "counting"
        ));
        assert_eq!(handle.state(), EngineState::Active { generation: 1 });
        assert_eq!(
            handle.evaluate(&request()).await.unwrap().status_message.as_deref(),
            Some("1")
        );
    }

    #[tokio::test]
    async fn teardown_then_reinitialize() {
        let handle = EngineHandle::new(Arc::new(CountingFactory::default()), None);
        handle.initialize().await.unwrap();

        assert!(handle.teardown().await);
        assert_eq!(handle.state(), EngineState::Destroyed);
        assert!(matches!(
            handle.evaluate(&request()).await,
            Err(DomainError::NotActive)
        ));
        assert!(!handle.teardown().await);

        assert_eq!(handle.initialize().await.unwrap(), 2);
        assert_eq!(handle.state(), EngineState::Active { generation: 2 });
    }

    #[tokio::test(start_paused = true)]
    async fn timeout_wraps_the_engine() {
        struct Hanging;

        #[async_trait]
        impl PolicyDecisionPoint for Hanging {
            async fn evaluate(
                &self,
                _req: &EvaluationRequest,
            ) -> Result<EvaluationResult, PdpError> {
                std::future::pending().await
            }
        }

        struct HangingFactory;

        #[async_trait]
        impl PdpFactory for HangingFactory {
            fn name(&self) -> &'static str {
                "hanging"
            }

            async fn build(&self) -> Result<Arc<dyn PolicyDecisionPoint>, PdpError> {
                Ok(Arc::new(Hanging))
            }
        }

        let handle = EngineHandle::new(Arc::new(HangingFactory), Some(Duration::from_millis(20)));
        handle.initialize().await.unwrap();

        let result = handle.evaluate(&request()).await.unwrap();
        assert_eq!(result.decision, Decision::Indeterminate);
    }
}
