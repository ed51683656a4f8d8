//! Structural record validators.
//!
//! [`NamespacedValidator`] dispatches on the first key segment to a
//! validator registered at construction time. [`PublicKeyValidator`] covers
//! `/pk/`; [`FreshnessValidator`] layers the retention window over any
//! other validator.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use shared_crypto::{derive_peer_id, unmarshal_public_key};
use shared_types::{PeerId, Record};

use crate::domain::errors::ValidationError;
use crate::domain::freshness::RecordFreshnessPolicy;
use crate::domain::keys::{split_namespace, PUBLIC_KEY_NAMESPACE};
use crate::ports::outbound::{RecordValidator, TimeSource};

/// Per-namespace dispatch.
#[derive(Clone, Default)]
pub struct NamespacedValidator {
    validators: HashMap<String, Arc<dyn RecordValidator>>,
}

impl NamespacedValidator {
    /// No namespaces registered; every record is rejected.
    pub fn new() -> Self {
        Self::default()
    }

    /// Validator with the `/pk/` namespace registered.
    pub fn with_public_keys() -> Self {
        Self::new().with_namespace(PUBLIC_KEY_NAMESPACE, Arc::new(PublicKeyValidator))
    }

    /// Register `validator` for keys under `/<namespace>/`.
    pub fn with_namespace(
        mut self,
        namespace: impl Into<String>,
        validator: Arc<dyn RecordValidator>,
    ) -> Self {
        self.validators.insert(namespace.into(), validator);
        self
    }

    /// Whether `namespace` has a validator.
    pub fn handles(&self, namespace: &str) -> bool {
        self.validators.contains_key(namespace)
    }
}

impl RecordValidator for NamespacedValidator {
    fn verify_structure(&self, record: &Record) -> Result<(), ValidationError> {
        let (namespace, _) = split_namespace(&record.key)?;
        let validator = self
            .validators
            .get(namespace)
            .ok_or_else(|| ValidationError::UnknownNamespace(namespace.to_owned()))?;
        validator.verify_structure(record)
    }
}

/// `/pk/<id>` records: the value must be a public key deriving to `<id>`.
///
/// This is what lets the DHT tier skip its own identity check.
#[derive(Debug, Default, Clone, Copy)]
pub struct PublicKeyValidator;

impl RecordValidator for PublicKeyValidator {
    fn verify_structure(&self, record: &Record) -> Result<(), ValidationError> {
        let (namespace, path) = split_namespace(&record.key)?;
        if namespace != PUBLIC_KEY_NAMESPACE {
            return Err(ValidationError::UnknownNamespace(namespace.to_owned()));
        }

        let expected = PeerId::from_slice(path)
            .map_err(|err| ValidationError::MalformedKey(err.to_string()))?;
        let key = unmarshal_public_key(&record.value)
            .map_err(|err| ValidationError::InvalidValue(err.to_string()))?;

        let derived = derive_peer_id(&key);
        if derived != expected {
            return Err(ValidationError::KeyIdMismatch { expected, derived });
        }
        Ok(())
    }
}

/// System wall clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemTimeSource;

impl TimeSource for SystemTimeSource {
    fn now(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_secs())
            .unwrap_or(0)
    }
}

/// Rejects records received longer ago than the retention window, then
/// defers to `inner`.
pub struct FreshnessValidator {
    inner: Arc<dyn RecordValidator>,
    policy: RecordFreshnessPolicy,
    clock: Arc<dyn TimeSource>,
}

impl FreshnessValidator {
    pub fn new(
        inner: Arc<dyn RecordValidator>,
        policy: RecordFreshnessPolicy,
        clock: Arc<dyn TimeSource>,
    ) -> Self {
        Self {
            inner,
            policy,
            clock,
        }
    }
}

impl RecordValidator for FreshnessValidator {
    fn verify_structure(&self, record: &Record) -> Result<(), ValidationError> {
        self.policy.check(record, self.clock.now())?;
        self.inner.verify_structure(record)
    }
}
