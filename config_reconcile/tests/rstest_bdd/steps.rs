//! Step definitions for the reconciliation and patch scenarios.

use anyhow::{Result, anyhow, ensure};
use config_reconcile::patch::{apply_patch, build_patch, build_patch_for_environment};
use config_reconcile::reconcile;
use rstest_bdd_macros::{given, then, when};
use test_helpers::fixtures::{config_pair, document};
use test_helpers::text::unquote;

use crate::fixtures::ReconcileContext;

#[given("the configurations from the {name} fixture")]
fn load_pair(reconcile_context: &ReconcileContext, name: String) -> Result<()> {
    ensure!(reconcile_context.pair.is_empty(), "configurations already loaded");
    reconcile_context.pair.set(config_pair(unquote(&name))?);
    Ok(())
}

#[given("the annotated diff {name}")]
fn load_annotation(reconcile_context: &ReconcileContext, name: String) -> Result<()> {
    reconcile_context.annotated.set(document(unquote(&name))?);
    Ok(())
}

#[when("the configurations are reconciled")]
fn run_reconcile(reconcile_context: &ReconcileContext) -> Result<()> {
    let pair = reconcile_context
        .pair
        .get()
        .ok_or_else(|| anyhow!("no configurations loaded"))?;
    reconcile_context
        .outcome
        .set(reconcile(&pair.remote, &pair.local));
    Ok(())
}

#[when("a patch is built")]
fn run_build_patch(reconcile_context: &ReconcileContext) -> Result<()> {
    let annotated = reconcile_context
        .annotated
        .get()
        .ok_or_else(|| anyhow!("no annotated diff loaded"))?;
    reconcile_context.patch.set(build_patch(&annotated));
    Ok(())
}

#[when("a patch is built for the {environment} environment")]
fn run_build_environment_patch(
    reconcile_context: &ReconcileContext,
    environment: String,
) -> Result<()> {
    let annotated = reconcile_context
        .annotated
        .get()
        .ok_or_else(|| anyhow!("no annotated diff loaded"))?;
    reconcile_context.patch.set(build_patch_for_environment(
        &annotated,
        Some(unquote(&environment)),
    ));
    Ok(())
}

#[then("no differences are reported")]
fn no_differences(reconcile_context: &ReconcileContext) -> Result<()> {
    let outcome = reconcile_context
        .outcome
        .get()
        .ok_or_else(|| anyhow!("configurations were not reconciled"))?;
    ensure!(outcome.is_empty(), "unexpected diff:\n{:?}", outcome.diff());
    Ok(())
}

#[then("the outcome is non-destructive")]
fn outcome_non_destructive(reconcile_context: &ReconcileContext) -> Result<()> {
    let non_destructive = reconcile_context
        .outcome
        .with_ref(config_reconcile::ConfigDiff::is_non_destructive)
        .ok_or_else(|| anyhow!("configurations were not reconciled"))?;
    ensure!(non_destructive, "expected a non-destructive outcome");
    Ok(())
}

#[then("the outcome is destructive")]
fn outcome_destructive(reconcile_context: &ReconcileContext) -> Result<()> {
    let non_destructive = reconcile_context
        .outcome
        .with_ref(config_reconcile::ConfigDiff::is_non_destructive)
        .ok_or_else(|| anyhow!("configurations were not reconciled"))?;
    ensure!(!non_destructive, "expected a destructive outcome");
    Ok(())
}

#[then("the diff contains the line {line}")]
fn diff_contains_line(reconcile_context: &ReconcileContext, line: String) -> Result<()> {
    let text = reconcile_context
        .outcome
        .with_ref(|outcome| outcome.diff().map(ToString::to_string))
        .flatten()
        .ok_or_else(|| anyhow!("no diff was rendered"))?;
    let wanted = unquote(&line);
    ensure!(
        text.lines().any(|candidate| candidate == wanted),
        "line {wanted:?} missing from:\n{text}"
    );
    Ok(())
}

#[then("applying the patch to the local configuration restores the remote one")]
fn patch_restores_remote(reconcile_context: &ReconcileContext) -> Result<()> {
    let pair = reconcile_context
        .pair
        .get()
        .ok_or_else(|| anyhow!("no configurations loaded"))?;
    let outcome = reconcile_context
        .outcome
        .get()
        .ok_or_else(|| anyhow!("configurations were not reconciled"))?;
    let mut patched = pair.local.clone();
    apply_patch(&mut patched, outcome.patch());
    let replay = reconcile(&pair.remote, &patched);
    ensure!(replay.is_empty(), "patched configuration still differs:\n{:?}", replay.diff());
    Ok(())
}

#[then("the patch equals the {name} document")]
fn patch_equals(reconcile_context: &ReconcileContext, name: String) -> Result<()> {
    let patch = reconcile_context
        .patch
        .take()
        .ok_or_else(|| anyhow!("no patch was built"))?
        .map_err(|err| anyhow!("patch building failed: {err}"))?;
    let expected = document(unquote(&name))?;
    ensure!(patch == expected, "patch {patch} differs from {expected}");
    Ok(())
}

#[then("patch building fails at {path}")]
fn patch_fails_at(reconcile_context: &ReconcileContext, path: String) -> Result<()> {
    let result = reconcile_context
        .patch
        .take()
        .ok_or_else(|| anyhow!("no patch was built"))?;
    let err = result
        .err()
        .ok_or_else(|| anyhow!("expected patch building to fail"))?;
    let location = err
        .tree_path()
        .map(ToString::to_string)
        .ok_or_else(|| anyhow!("error {err} carries no path"))?;
    ensure!(location == unquote(&path), "error {err} reported at {location}");
    Ok(())
}
