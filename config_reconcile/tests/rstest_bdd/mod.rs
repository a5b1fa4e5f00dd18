//! `rstest-bdd` behavioural tests for `config_reconcile`.
//!
//! Feature files live under `tests/features`; [`scenarios`] binds them to the
//! shared [`fixtures`] and the step registry in [`steps`].

mod fixtures;
mod scenarios;
mod steps;
