//! Shared fixtures for the behavioural scenarios.

use config_reconcile::{ConfigDiff, ReconcileResult};
use rstest::fixture;
use rstest_bdd::Slot;
use rstest_bdd_macros::ScenarioState;
use serde_json::Value;
use test_helpers::fixtures::ConfigPair;

/// State shared between the steps of one scenario.
#[derive(Debug, Default, ScenarioState)]
pub struct ReconcileContext {
    /// The remote/local pair under test.
    pub pair: Slot<ConfigPair>,
    /// The outcome of reconciling `pair`.
    pub outcome: Slot<ConfigDiff>,
    /// An annotated diff handed to the patch builder.
    pub annotated: Slot<Value>,
    /// The result of building a patch from `annotated`.
    pub patch: Slot<ReconcileResult<Value>>,
}

/// Creates an empty context for each scenario.
#[fixture]
pub fn reconcile_context() -> ReconcileContext {
    ReconcileContext::default()
}
