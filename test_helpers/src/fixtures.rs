//! Named configuration fixtures.
//!
//! Behavioural scenarios refer to configurations by name rather than embedding
//! JSON in step text. Each name maps to a JSON document; pairs are stored as
//! `{"remote": ..., "local": ...}`.

use anyhow::{Context, Result, anyhow};
use serde_json::Value;

/// A deployed configuration and the local configuration about to replace it.
#[derive(Clone, Debug, PartialEq)]
pub struct ConfigPair {
    /// What the remote management API reports.
    pub remote: Value,
    /// The fully resolved local configuration.
    pub local: Value,
}

const PAIRS: &[(&str, &str)] = &[
    (
        "unchanged service",
        r#"{
            "remote": {"name": "svc", "compatibility_date": "2025-07-08"},
            "local": {"name": "svc", "compatibility_date": "2025-07-08"}
        }"#,
    ),
    (
        "bumped compatibility date",
        r#"{
            "remote": {"compatibility_date": "2025-07-08"},
            "local": {"compatibility_date": "2025-07-09"}
        }"#,
    ),
    (
        "added kv namespace",
        r#"{
            "remote": {"kv_namespaces": []},
            "local": {"kv_namespaces": [{"binding": "MY_KV", "id": "my-kv-123"}]}
        }"#,
    ),
    (
        "second kv namespace",
        r#"{
            "remote": {"kv_namespaces": [{"binding": "MY_KV", "id": "my-kv-123"}]},
            "local": {"kv_namespaces": [
                {"binding": "MY_KV", "id": "my-kv-123"},
                {"binding": "MY_KV_2", "id": "my-kv-456"}
            ]}
        }"#,
    ),
    (
        "removed kv namespace",
        r#"{
            "remote": {"kv_namespaces": [
                {"binding": "MY_KV", "id": "my-kv-123"},
                {"binding": "MY_KV_2", "id": "my-kv-456"}
            ]},
            "local": {"kv_namespaces": [{"binding": "MY_KV", "id": "my-kv-123"}]}
        }"#,
    ),
    (
        "removed middle kv namespace",
        r#"{
            "remote": {"kv_namespaces": [
                {"binding": "MY_KV", "id": "my-kv-123"},
                {"binding": "MY_KV_2", "id": "my-kv-456"},
                {"binding": "MY_KV_3", "id": "my-kv-789"}
            ]},
            "local": {"kv_namespaces": [
                {"binding": "MY_KV", "id": "my-kv-123"},
                {"binding": "MY_KV_3", "id": "my-kv-789"}
            ]}
        }"#,
    ),
    (
        "reordered durable objects",
        r#"{
            "remote": {"durable_objects": {"bindings": [
                {"name": "DO_A", "class_name": "A"},
                {"name": "DO_B", "class_name": "B"}
            ]}},
            "local": {"durable_objects": {"bindings": [
                {"class_name": "B", "name": "DO_B"},
                {"name": "DO_A", "class_name": "A"}
            ]}}
        }"#,
    ),
    (
        "local development settings",
        r#"{
            "remote": {"name": "svc", "main": "/tmp/bundle/index.js"},
            "local": {
                "name": "svc",
                "main": "src/index.ts",
                "dev": {"port": 8787},
                "build": {"command": "npm run build"},
                "kv_namespaces": [],
                "vars": {}
            }
        }"#,
    ),
    (
        "remote binding flag",
        r#"{
            "remote": {"d1_databases": [{"binding": "DB", "database_id": "db-1"}]},
            "local": {"d1_databases": [{"binding": "DB", "database_id": "db-1", "remote": true}]}
        }"#,
    ),
    (
        "deployed service",
        r#"{
            "remote": {
                "name": "my-worker",
                "compatibility_date": "2025-07-08",
                "workers_dev": true,
                "preview_urls": true,
                "kv_namespaces": [{"binding": "MY_KV", "id": "my-kv-123"}],
                "assets": {"binding": "ASSETS"},
                "observability": {
                    "enabled": true,
                    "head_sampling_rate": 1,
                    "logs": {
                        "enabled": true,
                        "head_sampling_rate": 1,
                        "invocation_logs": true,
                        "persist": true
                    },
                    "traces": {"enabled": false, "persist": true, "head_sampling_rate": 1}
                }
            },
            "local": {
                "name": "my-worker",
                "main": "src/index.ts",
                "compatibility_date": "2025-07-08",
                "observability": {"enabled": true},
                "kv_namespaces": [{"binding": "MY_KV", "id": "my-kv-123", "remote": true}],
                "assets": {"binding": "ASSETS", "directory": "./public"},
                "dev": {"port": 8787},
                "vars": {}
            }
        }"#,
    ),
    (
        "disabled observability",
        r#"{
            "remote": {"observability": {"enabled": false, "logs": {"enabled": false}}},
            "local": {}
        }"#,
    ),
    (
        "enabled observability",
        r#"{
            "remote": {},
            "local": {"observability": {"enabled": true}}
        }"#,
    ),
    (
        "routed service",
        r#"{
            "remote": {"workers_dev": true},
            "local": {"routes": ["example.com/*"]}
        }"#,
    ),
];

const DOCUMENTS: &[(&str, &str)] = &[
    ("deleted var", r#"{"vars": {"MY_VAR__deleted": "ABC"}}"#),
    (
        "renamed var",
        r#"{"vars": {"MY_VAR__deleted": "ABC", "VAR__added": "ABC"}}"#,
    ),
    ("restored var", r#"{"vars": {"MY_VAR": "ABC"}}"#),
    (
        "changed date",
        r#"{"compatibility_date": {"__old": "2025-07-08", "__new": "2025-07-09"}}"#,
    ),
    ("restored date", r#"{"compatibility_date": "2025-07-08"}"#),
    (
        "edited bindings",
        r#"{"kv_namespaces": [
            [" "],
            ["-", {"binding": "OLD_KV", "id": "kv-1"}],
            ["~", {"id": {"__old": "kv-2", "__new": "kv-3"}}],
            ["+", {"binding": "NEW_KV", "id": "kv-4"}]
        ]}"#,
    ),
    (
        "restored bindings",
        r#"{"kv_namespaces": [{}, {"id": "kv-2"}, {}, {"binding": "OLD_KV", "id": "kv-1"}]}"#,
    ),
    ("unknown list tag", r#"{"kv_namespaces": [[" "], ["?", {}]]}"#),
    (
        "nested old value",
        r#"{"vars": {"A": {"__old": {"B__deleted": 1}, "__new": 2}}}"#,
    ),
    (
        "staging restored var",
        r#"{"env": {"staging": {"vars": {"MY_VAR": "ABC"}}}}"#,
    ),
];

fn lookup(table: &[(&str, &str)], name: &str) -> Result<Value> {
    let (_, text) = table
        .iter()
        .find(|(candidate, _)| *candidate == name)
        .ok_or_else(|| anyhow!("unknown fixture {name:?}"))?;
    serde_json::from_str(text).with_context(|| format!("fixture {name:?} is not valid JSON"))
}

/// Loads the named remote/local pair.
///
/// # Errors
///
/// Returns an error when no pair has that name.
///
/// # Examples
///
/// ```
/// use config_reconcile_test_helpers::fixtures::config_pair;
///
/// let pair = config_pair("unchanged service")?;
/// assert_eq!(pair.remote, pair.local);
/// # Ok::<(), anyhow::Error>(())
/// ```
pub fn config_pair(name: &str) -> Result<ConfigPair> {
    let mut document = lookup(PAIRS, name)?;
    let mut side = |key: &str| {
        document
            .get_mut(key)
            .map(Value::take)
            .ok_or_else(|| anyhow!("fixture {name:?} has no {key} side"))
    };
    Ok(ConfigPair {
        remote: side("remote")?,
        local: side("local")?,
    })
}

/// Loads a named standalone document: an annotated diff or an expected patch.
///
/// # Errors
///
/// Returns an error when no document has that name.
pub fn document(name: &str) -> Result<Value> {
    lookup(DOCUMENTS, name)
}
