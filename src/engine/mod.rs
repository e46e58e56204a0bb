//! Output validation and normalization engine
//!
//! This module provides the three-stage pipeline that turns untrusted
//! generator output into contract-satisfying records:
//!
//! 1. **Schema gate** (`gate`): presence, type, and bound checks; fail-fast
//!    with a `SchemaViolation`.
//! 2. **Canonicalizer** (`canonical`): closed-vocabulary normalization of
//!    free-text labels.
//! 3. **Guardrail repairer** (`guardrail`): ordered cross-field repairs and
//!    haptic derivation; total over gate-valid input.
//!
//! Both record kinds share one pipeline, parametrized by the
//! [`ReportContract`] trait and per-kind guardrail tables, rather than
//! duplicating the stages per kind.
//!
//! The engine is a pure, synchronous transform: no I/O, no shared mutable
//! state, no locks. Every invocation is independent and re-entrant.

pub mod canonical;
pub mod gate;
pub mod guardrail;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::contracts::{GuidanceReport, HazardReport};
use crate::error::SchemaViolation;
use guardrail::{Guardrail, GuardrailContext};

/// Contract implemented by each record kind the engine can normalize.
pub trait ReportContract: Serialize + Sized {
    /// Stable kind label used in logs, metrics, and responses
    const KIND: &'static str;

    /// Schema-gate a raw mapping into a typed candidate plus the context
    /// the guardrails need
    fn extract(map: &Map<String, Value>) -> Result<(Self, GuardrailContext), SchemaViolation>;

    /// Normalize free-text vocabulary in place
    fn canonicalize(&mut self);

    /// Ordered repair rules for this kind
    fn guardrails() -> &'static [Guardrail<Self>];
}

impl ReportContract for HazardReport {
    const KIND: &'static str = "hazard";

    fn extract(map: &Map<String, Value>) -> Result<(Self, GuardrailContext), SchemaViolation> {
        let (report, declared_haptic) = gate::extract_hazard(map)?;
        Ok((report, GuardrailContext { declared_haptic }))
    }

    fn canonicalize(&mut self) {
        canonical::canonicalize_hazard(self);
    }

    fn guardrails() -> &'static [Guardrail<Self>] {
        guardrail::HAZARD_GUARDRAILS
    }
}

impl ReportContract for GuidanceReport {
    const KIND: &'static str = "guidance";

    fn extract(map: &Map<String, Value>) -> Result<(Self, GuardrailContext), SchemaViolation> {
        let (report, declared_haptic) = gate::extract_guidance(map)?;
        Ok((report, GuardrailContext { declared_haptic }))
    }

    fn canonicalize(&mut self) {
        canonical::canonicalize_guidance(self);
    }

    fn guardrails() -> &'static [Guardrail<Self>] {
        guardrail::GUIDANCE_GUARDRAILS
    }
}

/// A normalized record plus the repairs that produced it.
#[derive(Debug, Clone)]
pub struct Normalized<R> {
    pub record: R,
    /// Ids of the guardrails that fired, in evaluation order
    pub repairs: Vec<&'static str>,
}

/// The three-stage normalization pipeline.
///
/// Stateless: the struct exists so callers can hold "an engine" the same
/// way they hold other services, and so construction has an obvious home
/// if per-deployment configuration ever appears.
#[derive(Debug, Clone, Copy, Default)]
pub struct NormalizationEngine;

impl NormalizationEngine {
    /// Create a new engine
    pub fn new() -> Self {
        Self
    }

    /// Run the full pipeline, returning only the record.
    pub fn normalize<R: ReportContract + 'static>(&self, raw: &Value) -> Result<R, SchemaViolation> {
        self.normalize_with_report(raw).map(|n| n.record)
    }

    /// Run the full pipeline, reporting which guardrails fired.
    ///
    /// Deterministic: the same input always produces the same record and
    /// the same repair list.
    pub fn normalize_with_report<R: ReportContract + 'static>(
        &self,
        raw: &Value,
    ) -> Result<Normalized<R>, SchemaViolation> {
        let map = raw
            .as_object()
            .ok_or_else(|| SchemaViolation::wrong_type("$", "object", gate::json_type(raw)))?;

        let (mut record, context) = R::extract(map)?;
        record.canonicalize();

        let mut repairs = Vec::new();
        for rule in R::guardrails() {
            if (rule.apply)(&mut record, &context) {
                tracing::debug!(kind = R::KIND, guardrail = rule.id, "guardrail repair applied");
                repairs.push(rule.id);
            }
        }

        Ok(Normalized { record, repairs })
    }
}

/// Normalize a raw hazard analysis.
pub fn normalize_hazard(raw: &Value) -> Result<HazardReport, SchemaViolation> {
    NormalizationEngine::new().normalize(raw)
}

/// Normalize a raw navigation guidance analysis.
pub fn normalize_guidance(raw: &Value) -> Result<GuidanceReport, SchemaViolation> {
    NormalizationEngine::new().normalize(raw)
}
