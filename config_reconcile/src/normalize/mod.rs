//! Making a remote and a local configuration directly comparable.
//!
//! The remote management API serialises sparsely: unset fields disappear,
//! some blocks only report a subset of their fields, and key order follows
//! whatever the API chose. The local configuration is fully resolved and
//! carries fields that only matter on the developer's machine. [`normalize`]
//! irons out those differences so that every remaining difference between the
//! two returned trees is a real one.
//!
//! Inputs are never mutated; fresh trees are returned. Values in shapes the
//! normaliser does not recognise pass through untouched, so an unexpected
//! field shows up as a change instead of aborting the reconciliation.

mod defaults;
mod local;
mod order;

use serde_json::{Map, Value};
use tracing::debug;

use crate::ReconcileOptions;

pub use order::order_object_fields;

/// A remote/local pair after normalisation.
#[derive(Clone, Debug, PartialEq)]
pub struct NormalizedPair {
    /// The deployed configuration, keys ordered like `local`.
    pub remote: Value,
    /// The configuration about to be deployed.
    pub local: Value,
}

/// Normalises `remote` and `local` so they can be diffed.
///
/// Non-mapping roots are returned unchanged; there is nothing to align.
///
/// # Examples
///
/// ```
/// use config_reconcile::{ReconcileOptions, normalize::normalize};
/// use serde_json::json;
///
/// let pair = normalize(
///     &json!({"compatibility_date": "2025-07-08", "name": "svc"}),
///     &json!({"name": "svc", "compatibility_date": "2025-07-08"}),
///     &ReconcileOptions::default(),
/// );
/// let keys: Vec<_> = pair.remote.as_object().into_iter().flat_map(|m| m.keys()).collect();
/// assert_eq!(keys.first().map(|k| k.as_str()), Some("name"));
/// ```
#[must_use]
pub fn normalize(remote: &Value, local: &Value, options: &ReconcileOptions) -> NormalizedPair {
    let (Some(remote_map), Some(local_map)) = (remote.as_object(), local.as_object()) else {
        debug!("configuration roots are not both mappings; skipping normalisation");
        return NormalizedPair {
            remote: remote.clone(),
            local: local.clone(),
        };
    };

    let mut remote_tree = remote_map.clone();
    let mut local_tree = local_map.clone();

    for tree in [&mut remote_tree, &mut local_tree] {
        local::strip_nulls(tree);
        local::strip_local_only_keys(tree, &options.local_only_keys);
    }
    local::strip_binding_flags(&mut local_tree, options);
    local::project_remote_visible(&mut local_tree, &options.remote_visible_fields);

    for tree in [&mut remote_tree, &mut local_tree] {
        if options.derive_subdomain_defaults {
            defaults::fill_subdomain_defaults(tree);
        }
        defaults::fill_observability(tree);
    }
    defaults::align_empty_values(&mut remote_tree, &mut local_tree);

    let ordered_remote = order_object_fields(&remote_tree, &local_tree);
    NormalizedPair {
        remote: Value::Object(ordered_remote),
        local: Value::Object(local_tree),
    }
}

type Tree = Map<String, Value>;
