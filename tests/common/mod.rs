//! Shared test doubles for the provisioning collaborator seams.
//!
//! Every mock records what it was asked to do and can be configured to fail,
//! so tests can assert both the happy path and the failure wrapping.
//!
//! Each integration test binary compiles this module independently, so not
//! every helper is used by every binary.
#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

use wireup_core::config::ConfigMap;
use wireup_core::error::BoxError;
use wireup_core::provision::{
    ConnectionFactory, ConnectionFactorySource, PoolSettings, PooledFactoryComposer,
    ServiceRegistrar, TransactionSupport, XaConnectionFactory,
};
use wireup_core::registry::{
    CoordinatorRef, DerivedRegistration, DerivedServiceFactory, TransactionCoordinator,
};
use wireup_core::secrets::SecretDecryptor;

/// Stub transaction coordinator with a fixed name
pub struct StubCoordinator {
    name: String,
}

impl StubCoordinator {
    pub fn with_name(name: &str) -> CoordinatorRef {
        Arc::new(Self { name: name.into() })
    }
}

impl TransactionCoordinator for StubCoordinator {
    fn name(&self) -> &str {
        &self.name
    }
}

/// Connection factory stub tagged with the provider that produced it
pub struct StubFactory {
    provider: String,
}

impl ConnectionFactory for StubFactory {
    fn provider(&self) -> &str {
        &self.provider
    }
}

pub struct StubXaFactory {
    provider: String,
}

impl XaConnectionFactory for StubXaFactory {
    fn provider(&self) -> &str {
        &self.provider
    }
}

/// Mock connection factory source tracking every construction call
pub struct MockFactorySource {
    provider: String,
    pub plain_calls: Mutex<Vec<ConfigMap>>,
    pub xa_calls: Mutex<Vec<ConfigMap>>,
    fail_with: Mutex<Option<String>>,
}

impl MockFactorySource {
    pub fn new(provider: &str) -> Arc<Self> {
        Arc::new(Self {
            provider: provider.into(),
            plain_calls: Mutex::new(Vec::new()),
            xa_calls: Mutex::new(Vec::new()),
            fail_with: Mutex::new(None),
        })
    }

    /// Configure every construction call to fail with `message`
    pub fn fail_with(self: &Arc<Self>, message: &str) {
        *self.fail_with.lock() = Some(message.into());
    }

    pub fn plain_call_count(&self) -> usize {
        self.plain_calls.lock().len()
    }

    pub fn xa_call_count(&self) -> usize {
        self.xa_calls.lock().len()
    }

    /// The property map received by the most recent construction call
    pub fn last_plain_props(&self) -> Option<ConfigMap> {
        self.plain_calls.lock().last().cloned()
    }

    fn configured_failure(&self) -> Option<BoxError> {
        self.fail_with.lock().clone().map(BoxError::from)
    }
}

impl ConnectionFactorySource for MockFactorySource {
    fn create_connection_factory(
        &self,
        props: &ConfigMap,
    ) -> Result<Arc<dyn ConnectionFactory>, BoxError> {
        self.plain_calls.lock().push(props.clone());
        if let Some(err) = self.configured_failure() {
            return Err(err);
        }
        Ok(Arc::new(StubFactory {
            provider: self.provider.clone(),
        }))
    }

    fn create_xa_connection_factory(
        &self,
        props: &ConfigMap,
    ) -> Result<Arc<dyn XaConnectionFactory>, BoxError> {
        self.xa_calls.lock().push(props.clone());
        if let Some(err) = self.configured_failure() {
            return Err(err);
        }
        Ok(Arc::new(StubXaFactory {
            provider: self.provider.clone(),
        }))
    }
}

/// One recorded composition call
#[derive(Debug, Clone)]
pub struct RecordedComposition {
    pub base_provider: String,
    pub xa_provider: Option<String>,
    pub support: TransactionSupport,
    pub coordinator: Option<String>,
    pub pool: PoolSettings,
}

/// Mock pooling composer recording every composition
pub struct MockComposer {
    pub compositions: Mutex<Vec<RecordedComposition>>,
    fail_with: Mutex<Option<String>>,
}

impl MockComposer {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            compositions: Mutex::new(Vec::new()),
            fail_with: Mutex::new(None),
        })
    }

    pub fn fail_with(self: &Arc<Self>, message: &str) {
        *self.fail_with.lock() = Some(message.into());
    }

    pub fn composition_count(&self) -> usize {
        self.compositions.lock().len()
    }

    pub fn last_composition(&self) -> Option<RecordedComposition> {
        self.compositions.lock().last().cloned()
    }
}

impl PooledFactoryComposer for MockComposer {
    fn compose(
        &self,
        base: Arc<dyn ConnectionFactory>,
        xa: Option<Arc<dyn XaConnectionFactory>>,
        support: TransactionSupport,
        coordinator: Option<CoordinatorRef>,
        pool: &PoolSettings,
    ) -> Result<Arc<dyn ConnectionFactory>, BoxError> {
        self.compositions.lock().push(RecordedComposition {
            base_provider: base.provider().to_string(),
            xa_provider: xa.as_ref().map(|f| f.provider().to_string()),
            support,
            coordinator: coordinator.as_ref().map(|c| c.name().to_string()),
            pool: pool.clone(),
        });

        if let Some(message) = self.fail_with.lock().clone() {
            return Err(message.into());
        }
        Ok(Arc::new(StubFactory {
            provider: format!("pooled:{}", base.provider()),
        }))
    }
}

/// Mock registry surface counting registrations and withdrawals
pub struct MockRegistrar {
    pub registered: AtomicUsize,
    pub unregistered: Arc<AtomicUsize>,
}

impl MockRegistrar {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            registered: AtomicUsize::new(0),
            unregistered: Arc::new(AtomicUsize::new(0)),
        })
    }

    pub fn registered_count(&self) -> usize {
        self.registered.load(Ordering::SeqCst)
    }

    pub fn unregistered_count(&self) -> usize {
        self.unregistered.load(Ordering::SeqCst)
    }
}

struct MockRegistrationHandle {
    unregistered: Arc<AtomicUsize>,
}

impl DerivedRegistration for MockRegistrationHandle {
    fn unregister(&self) {
        self.unregistered.fetch_add(1, Ordering::SeqCst);
    }
}

impl ServiceRegistrar for MockRegistrar {
    fn register_xa_composer(
        &self,
        _coordinator: &CoordinatorRef,
        _composer: Arc<dyn PooledFactoryComposer>,
    ) -> Arc<dyn DerivedRegistration> {
        self.registered.fetch_add(1, Ordering::SeqCst);
        Arc::new(MockRegistrationHandle {
            unregistered: self.unregistered.clone(),
        })
    }
}

/// Derived-service factory that produces inert registrations, for tests that
/// only exercise selection
pub struct NoopDerivedFactory;

impl NoopDerivedFactory {
    pub fn shared() -> Arc<Self> {
        Arc::new(Self)
    }
}

struct NoopRegistration;

impl DerivedRegistration for NoopRegistration {
    fn unregister(&self) {}
}

impl DerivedServiceFactory for NoopDerivedFactory {
    fn create_service(&self, _coordinator: &CoordinatorRef) -> Arc<dyn DerivedRegistration> {
        Arc::new(NoopRegistration)
    }
}

/// Test cipher: "encryption" reverses the plaintext
pub struct ReversingDecryptor;

impl SecretDecryptor for ReversingDecryptor {
    fn decrypt(&self, ciphertext: &str) -> Result<String, BoxError> {
        Ok(ciphertext.chars().rev().collect())
    }
}

/// Mask `plaintext` the way [`ReversingDecryptor`] expects to find it
pub fn masked(plaintext: &str) -> String {
    let ciphertext: String = plaintext.chars().rev().collect();
    format!("ENC({ciphertext})")
}
