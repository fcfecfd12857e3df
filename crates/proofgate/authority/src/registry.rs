use std::collections::BTreeMap;
use std::sync::OnceLock;

use proofgate_types::{AuthorityClass, InvariantCategory};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{AuthorityError, AuthorityResult};

/// One ranked class as frozen into the registry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorityEntry {
    pub class: AuthorityClass,
    pub level: u8,
    /// Classes this one may refute (itself and all lower ranks).
    pub refutes: Vec<AuthorityClass>,
}

/// Immutable authority hierarchy.
///
/// Built once by [`AuthorityRegistry::bootstrap`] or a [`RegistryBuilder`];
/// there are no mutating methods. Hand it out by reference.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthorityRegistry {
    entries: Vec<AuthorityEntry>,
    refuters: BTreeMap<InvariantCategory, Vec<AuthorityClass>>,
}

impl AuthorityRegistry {
    /// The standard hierarchy with every category's default refuter set.
    pub fn bootstrap() -> Self {
        Self::from_overrides(BTreeMap::new())
    }

    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    fn from_overrides(overrides: BTreeMap<InvariantCategory, Vec<AuthorityClass>>) -> Self {
        let entries = AuthorityClass::ALL
            .iter()
            .map(|class| AuthorityEntry {
                class: *class,
                level: class.level(),
                refutes: class.refutation_set(),
            })
            .collect();

        let mut refuters = BTreeMap::new();
        for category in InvariantCategory::VIOLATIONS
            .iter()
            .chain(std::iter::once(&InvariantCategory::None))
        {
            let allowed = overrides
                .get(category)
                .cloned()
                .unwrap_or_else(|| category.allowed_refuters());
            refuters.insert(*category, allowed);
        }

        Self { entries, refuters }
    }

    pub fn entries(&self) -> &[AuthorityEntry] {
        &self.entries
    }

    pub fn level(&self, class: AuthorityClass) -> u8 {
        class.level()
    }

    /// Whether `refuter` outranks or equals `refuted`.
    pub fn outranks_or_equals(&self, refuter: AuthorityClass, refuted: AuthorityClass) -> bool {
        self.level(refuter) >= self.level(refuted)
    }

    /// Classes allowed to refute findings of `category`.
    pub fn allowed_refuters(&self, category: InvariantCategory) -> &[AuthorityClass] {
        self.refuters
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

impl Default for AuthorityRegistry {
    fn default() -> Self {
        Self::bootstrap()
    }
}

// ── Builder ────────────────────────────────────────────────────────────

/// Narrows refuter sets before the registry is frozen.
///
/// Restrictions may only remove classes from a category's default set;
/// supremacy-1 categories stay empty no matter what is requested.
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    overrides: BTreeMap<InvariantCategory, Vec<AuthorityClass>>,
}

impl RegistryBuilder {
    pub fn restrict(mut self, category: InvariantCategory, refuters: Vec<AuthorityClass>) -> Self {
        self.overrides.insert(category, refuters);
        self
    }

    pub fn build(self) -> AuthorityResult<AuthorityRegistry> {
        for (category, requested) in &self.overrides {
            let permitted = category.allowed_refuters();
            if let Some(class) = requested.iter().find(|c| !permitted.contains(c)) {
                return Err(AuthorityError::RefuterExpansion {
                    category: *category,
                    class: *class,
                });
            }
        }
        let mut overrides = self.overrides;
        for refuters in overrides.values_mut() {
            refuters.sort();
            refuters.dedup();
        }
        Ok(AuthorityRegistry::from_overrides(overrides))
    }
}

// ── Bootstrap cell ─────────────────────────────────────────────────────

/// Write-once holder for hosts that keep a single registry.
///
/// Bootstrapping twice fails with [`AuthorityError::AlreadyBootstrapped`];
/// reading before bootstrap fails with [`AuthorityError::NotBootstrapped`].
#[derive(Debug, Default)]
pub struct RegistryCell {
    inner: OnceLock<AuthorityRegistry>,
}

impl RegistryCell {
    pub const fn new() -> Self {
        Self {
            inner: OnceLock::new(),
        }
    }

    pub fn bootstrap(&self, registry: AuthorityRegistry) -> AuthorityResult<&AuthorityRegistry> {
        self.inner
            .set(registry)
            .map_err(|_| AuthorityError::AlreadyBootstrapped)?;
        info!("authority registry bootstrapped and frozen");
        self.get()
    }

    pub fn get(&self) -> AuthorityResult<&AuthorityRegistry> {
        self.inner.get().ok_or(AuthorityError::NotBootstrapped)
    }

    pub fn is_bootstrapped(&self) -> bool {
        self.inner.get().is_some()
    }
}
