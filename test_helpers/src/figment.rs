//! Shared helpers for working with `figment::Jail` in tests.
//!
//! Option loading reads files relative to the working directory and
//! environment variables, so tests run it inside a jail that provides a
//! scratch directory and restores the environment afterwards.

use anyhow::{Result, anyhow};

/// Executes `f` inside a [`figment::Jail`], returning the closure's output.
///
/// The jail is torn down automatically once the closure completes, even when
/// the closure returns an error. Failures are converted into `anyhow::Error`
/// values so callers can use the `?` operator without extra boilerplate.
///
/// # Errors
///
/// Returns an error if the jail initialisation fails or the closure returns a
/// [`figment::error::Error`].
///
/// # Examples
///
/// ```
/// use config_reconcile_test_helpers::figment::with_jail;
///
/// let contents = with_jail(|jail| {
///     jail.create_file("reconcile.toml", "align_record_lists = false")?;
///     std::fs::read_to_string("reconcile.toml").map_err(|e| figment::Error::from(e.to_string()))
/// })?;
/// assert_eq!(contents, "align_record_lists = false");
/// # Ok::<(), anyhow::Error>(())
/// ```
pub fn with_jail<F, T>(f: F) -> Result<T>
where
    F: FnOnce(&mut figment::Jail) -> figment::error::Result<T>,
{
    let mut output = None;
    figment::Jail::try_with(|j| {
        output = Some(f(j)?);
        Ok(())
    })
    .map_err(|err| anyhow!(err.to_string()))?;
    output.ok_or_else(|| anyhow!("jail closure did not return a value"))
}
