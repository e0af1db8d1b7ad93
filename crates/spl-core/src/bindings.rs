// SPDX-License-Identifier: MIT OR Apache-2.0

//! Host-supplied context an evaluation runs against: the request, free
//! variables, clock, and crypto/counter callbacks.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::value::Value;

/// The default gas budget when a caller does not supply one.
pub const DEFAULT_MAX_GAS: u32 = 10_000;

/// The hard nesting-depth cap. Not configurable — see `spec.md` §4.3.
pub const MAX_DEPTH: u32 = 64;

/// A request mapping, read-only during evaluation.
pub type Request = BTreeMap<String, Value>;

/// Host-provided crypto side-channel predicates.
///
/// Each predicate defaults to `true` when the host does not supply one,
/// matching the documented "maybe present" semantics: a host that has no
/// opinion about DPoP, Merkle inclusion, VRF freshness, or threshold
/// co-signatures simply omits the hook rather than wiring up a stub that
/// always returns `true`.
#[derive(Clone, Default)]
pub struct CryptoHost {
    dpop: Option<Arc<dyn Fn() -> bool + Send + Sync>>,
    merkle: Option<Arc<dyn Fn(&[Value]) -> bool + Send + Sync>>,
    vrf: Option<Arc<dyn Fn(&str, f64) -> bool + Send + Sync>>,
    thresh: Option<Arc<dyn Fn() -> bool + Send + Sync>>,
}

impl fmt::Debug for CryptoHost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CryptoHost")
            .field("dpop", &self.dpop.is_some())
            .field("merkle", &self.merkle.is_some())
            .field("vrf", &self.vrf.is_some())
            .field("thresh", &self.thresh.is_some())
            .finish()
    }
}

impl CryptoHost {
    /// Set the `(dpop_ok?)` predicate.
    #[must_use]
    pub fn with_dpop_ok(mut self, f: impl Fn() -> bool + Send + Sync + 'static) -> Self {
        self.dpop = Some(Arc::new(f));
        self
    }

    /// Set the `(merkle_ok? e...)` predicate. Receives the evaluated arguments.
    #[must_use]
    pub fn with_merkle_ok(mut self, f: impl Fn(&[Value]) -> bool + Send + Sync + 'static) -> Self {
        self.merkle = Some(Arc::new(f));
        self
    }

    /// Set the `(vrf_ok? day amount)` predicate.
    #[must_use]
    pub fn with_vrf_ok(mut self, f: impl Fn(&str, f64) -> bool + Send + Sync + 'static) -> Self {
        self.vrf = Some(Arc::new(f));
        self
    }

    /// Set the `(thresh_ok?)` predicate.
    ///
    /// Stub in v0.1: intended as a future *k*-of-*n* co-signature check.
    /// Callers that want threshold enforcement today must supply this hook
    /// themselves; the evaluator does not guess a concrete scheme.
    #[must_use]
    pub fn with_thresh_ok(mut self, f: impl Fn() -> bool + Send + Sync + 'static) -> Self {
        self.thresh = Some(Arc::new(f));
        self
    }

    /// Evaluate `(dpop_ok?)`.
    #[must_use]
    pub fn dpop_ok(&self) -> bool {
        self.dpop.as_ref().map_or(true, |f| f())
    }

    /// Evaluate `(merkle_ok? e...)` over the already-evaluated arguments.
    #[must_use]
    pub fn merkle_ok(&self, args: &[Value]) -> bool {
        self.merkle.as_ref().map_or(true, |f| f(args))
    }

    /// Evaluate `(vrf_ok? day amount)`.
    #[must_use]
    pub fn vrf_ok(&self, day: &str, amount: f64) -> bool {
        self.vrf.as_ref().map_or(true, |f| f(day, amount))
    }

    /// Evaluate `(thresh_ok?)`.
    #[must_use]
    pub fn thresh_ok(&self) -> bool {
        self.thresh.as_ref().map_or(true, |f| f())
    }
}

/// The full evaluation context: request, free variables, clock, counters,
/// and crypto callbacks.
#[derive(Clone)]
pub struct Bindings {
    /// The request mapping supplied by the host.
    pub req: Request,
    /// Host-provided free variables (e.g. `allowed_recipients`).
    pub vars: BTreeMap<String, Value>,
    /// Current time as an ISO 8601 UTC string.
    pub now: String,
    /// `(action, day) -> count` callback for `(per-day-count ...)`.
    /// Defaults to `0` when absent.
    pub per_day_count: Option<Arc<dyn Fn(&str, &str) -> i64 + Send + Sync>>,
    /// Crypto side-channel predicates.
    pub crypto: CryptoHost,
    /// Operation budget for one `eval_policy` call.
    pub max_gas: u32,
}

impl fmt::Debug for Bindings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bindings")
            .field("req", &self.req)
            .field("vars", &self.vars)
            .field("now", &self.now)
            .field("per_day_count", &self.per_day_count.is_some())
            .field("crypto", &self.crypto)
            .field("max_gas", &self.max_gas)
            .finish()
    }
}

impl Default for Bindings {
    fn default() -> Self {
        Self {
            req: Request::new(),
            vars: BTreeMap::new(),
            now: String::new(),
            per_day_count: None,
            crypto: CryptoHost::default(),
            max_gas: DEFAULT_MAX_GAS,
        }
    }
}

impl Bindings {
    /// Call the host's `per_day_count` callback, defaulting to `0`.
    #[must_use]
    pub fn per_day_count(&self, action: &str, day: &str) -> i64 {
        self.per_day_count
            .as_ref()
            .map_or(0, |f| f(action, day))
    }
}
