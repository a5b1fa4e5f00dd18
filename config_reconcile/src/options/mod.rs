//! Tunables for normalisation and diffing.
//!
//! [`ReconcileOptions`] describes which fields are local-only, which lists hold
//! binding records, and which keys identify a record. The defaults match the
//! deploy tool's configuration schema; callers with a different schema can
//! load overrides with [`ReconcileOptions::load`].

mod loader;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub use loader::ENV_PREFIX;

/// Options controlling how two configuration trees are made comparable.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default)]
pub struct ReconcileOptions {
    /// Keys identifying a record inside a list, in order of preference.
    pub identity_keys: Vec<String>,
    /// Top-level keys that never exist remotely and are excluded from the diff.
    pub local_only_keys: Vec<String>,
    /// Per-binding flag that only has meaning for local development.
    pub local_binding_flag: String,
    /// Dotted paths of lists whose entries are bindings.
    pub binding_lists: Vec<String>,
    /// Top-level keys holding a single binding mapping.
    pub binding_singletons: Vec<String>,
    /// Blocks for which the remote side only reports the listed sub-fields.
    pub remote_visible_fields: BTreeMap<String, Vec<String>>,
    /// Fill `workers_dev` and `preview_urls` when they are absent.
    pub derive_subdomain_defaults: bool,
    /// Re-seat equal records so reordering a binding list is not a change.
    pub align_record_lists: bool,
}

fn owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|item| (*item).to_owned()).collect()
}

impl Default for ReconcileOptions {
    fn default() -> Self {
        Self {
            identity_keys: owned(&["binding", "name", "id"]),
            local_only_keys: owned(&[
                "dev",
                "build",
                "main",
                "alias",
                "rules",
                "base_dir",
                "find_additional_modules",
                "preserve_file_names",
                "no_bundle",
                "minify",
                "keep_vars",
                "upload_source_maps",
                "tsconfig",
                "jsx_factory",
                "jsx_fragment",
                "send_metrics",
            ]),
            local_binding_flag: "remote".to_owned(),
            binding_lists: owned(&[
                "kv_namespaces",
                "r2_buckets",
                "d1_databases",
                "services",
                "vpc_services",
                "workflows",
                "dispatch_namespaces",
                "mtls_certificates",
                "pipelines",
                "vectorize",
                "send_email",
                "queues.producers",
            ]),
            binding_singletons: owned(&["browser", "ai", "images", "media"]),
            remote_visible_fields: BTreeMap::from([(
                "assets".to_owned(),
                owned(&["binding"]),
            )]),
            derive_subdomain_defaults: true,
            align_record_lists: true,
        }
    }
}
