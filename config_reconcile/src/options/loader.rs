//! Layered loading of [`ReconcileOptions`].

use camino::Utf8Path;
use figment::{
    Figment,
    providers::{Env, Format, Json, Serialized, Toml},
};

use super::ReconcileOptions;
use crate::{ReconcileError, ReconcileResult, ReconcileResultExt};

/// Prefix for environment variables overriding options.
pub const ENV_PREFIX: &str = "CONFIG_RECONCILE_";

impl ReconcileOptions {
    /// Loads options from defaults, an optional options file and the
    /// environment, in increasing order of precedence.
    ///
    /// Files ending in `.json` are parsed as JSON; anything else as TOML.
    ///
    /// # Errors
    ///
    /// Returns [`ReconcileError::File`] when the file cannot be read or
    /// parsed and [`ReconcileError::Options`] when the merged layers do not
    /// describe valid options.
    pub fn load(path: Option<&Utf8Path>) -> ReconcileResult<Self> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));
        if let Some(file) = path {
            figment = figment.merge(read_options_file(file)?);
        }
        figment
            .merge(Env::prefixed(ENV_PREFIX))
            .extract()
            .into_reconcile()
    }
}

fn read_options_file(path: &Utf8Path) -> ReconcileResult<Figment> {
    let data = std::fs::read_to_string(path)
        .map_err(|e| ReconcileError::file(path.as_std_path(), e))?;
    parse_options_by_format(path, &data)
}

/// Parse options according to the file extension.
///
/// The data is validated up front so parse failures are reported against the
/// file rather than surfacing later as an extraction error.
fn parse_options_by_format(path: &Utf8Path, data: &str) -> ReconcileResult<Figment> {
    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    if is_json {
        serde_json::from_str::<serde_json::Value>(data)
            .map_err(|e| ReconcileError::file(path.as_std_path(), e))?;
        return Ok(Figment::from(Json::string(data)));
    }
    toml::from_str::<toml::Value>(data).map_err(|e| ReconcileError::file(path.as_std_path(), e))?;
    Ok(Figment::from(Toml::string(data)))
}
