//! Binds the feature files to the step registry.

use crate::fixtures::{ReconcileContext, reconcile_context};
use rstest_bdd_macros::scenarios;

scenarios!(
    "tests/features/reconcile.feature",
    fixtures = [reconcile_context: ReconcileContext]
);
scenarios!(
    "tests/features/patch.feature",
    fixtures = [reconcile_context: ReconcileContext]
);
