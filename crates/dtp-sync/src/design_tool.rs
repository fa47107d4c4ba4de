//! Import of design-tool variables as token files.
//!
//! The design tool's local-variables endpoint returns collections (each with
//! a list of modes) and variables keyed by id. Every collection/mode pair
//! becomes one token file named `<collection>.<mode>.json`, with the
//! variable's `/`-separated name as its path.

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Map, Value};
use tracing::debug;

use crate::error::{SyncError, SyncResult};

const ALIAS_TYPE: &str = "VARIABLE_ALIAS";

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Mode {
    pub mode_id: String,
    pub name: String,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariableCollection {
    pub name: String,
    #[serde(default)]
    pub modes: Vec<Mode>,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Variable {
    pub name: String,
    pub variable_collection_id: String,
    pub resolved_type: String,
    #[serde(default)]
    pub values_by_mode: HashMap<String, Value>,
    pub description: Option<String>,
    #[serde(default)]
    pub remote: bool,
    #[serde(default)]
    pub hidden_from_publishing: bool,
    #[serde(default)]
    pub scopes: Vec<String>,
    #[serde(default)]
    pub code_syntax: Value,
}

impl Variable {
    /// Token `$type` for the variable's resolved type.
    pub fn token_type(&self) -> Option<&'static str> {
        match self.resolved_type.as_str() {
            "BOOLEAN" => Some("boolean"),
            "COLOR" => Some("color"),
            "FLOAT" => Some("number"),
            "STRING" => Some("string"),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariablesMeta {
    #[serde(default)]
    pub variable_collections: HashMap<String, VariableCollection>,
    /// Raw variables in response order, keyed by id.
    #[serde(default)]
    pub variables: Map<String, Value>,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct LocalVariablesResponse {
    pub meta: VariablesMeta,
}

impl LocalVariablesResponse {
    pub fn from_json(text: &str) -> SyncResult<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Parsed variables, in response order.
    pub fn variables(&self) -> SyncResult<Vec<(String, Variable)>> {
        self.meta
            .variables
            .iter()
            .map(|(id, raw)| {
                serde_json::from_value(raw.clone())
                    .map(|variable| (id.clone(), variable))
                    .map_err(|e| SyncError::Variables(format!("variable {id}: {e}")))
            })
            .collect()
    }
}

/// Source of design-tool variables.
#[async_trait]
pub trait DesignToolClient: Send + Sync {
    async fn fetch_local_variables(&self, file_key: &str) -> SyncResult<LocalVariablesResponse>;
}

/// A client serving a fixed response, e.g. one saved from the API.
pub struct StaticDesignTool {
    response: LocalVariablesResponse,
}

impl StaticDesignTool {
    pub fn new(response: LocalVariablesResponse) -> Self {
        Self { response }
    }
}

#[async_trait]
impl DesignToolClient for StaticDesignTool {
    async fn fetch_local_variables(&self, file_key: &str) -> SyncResult<LocalVariablesResponse> {
        debug!(file_key, "serving saved variables response");
        Ok(self.response.clone())
    }
}

fn token_value(raw: &Value, names: &HashMap<&str, &str>) -> Value {
    let is_alias = raw.get("type").and_then(Value::as_str) == Some(ALIAS_TYPE);
    let target = raw.get("id").and_then(Value::as_str).and_then(|id| names.get(id));
    match (is_alias, target) {
        (true, Some(name)) => Value::String(format!("{{{}}}", name.replace('/', "."))),
        _ => raw.clone(),
    }
}

/// Walk `path` down from `root`, creating groups as needed.
fn group_at<'a>(root: &'a mut Map<String, Value>, path: &str) -> SyncResult<&'a mut Map<String, Value>> {
    let mut node = root;
    for segment in path.split('/') {
        node = node
            .entry(segment)
            .or_insert_with(|| Value::Object(Map::new()))
            .as_object_mut()
            .ok_or_else(|| SyncError::Variables(format!("{path}: `{segment}` is not a group")))?;
    }
    Ok(node)
}

/// Convert a local-variables response into token files keyed by file name.
/// Remote variables are skipped.
pub fn token_files_from_variables(
    response: &LocalVariablesResponse,
) -> SyncResult<BTreeMap<String, Value>> {
    let variables = response.variables()?;
    let names: HashMap<&str, &str> = variables
        .iter()
        .map(|(id, v)| (id.as_str(), v.name.as_str()))
        .collect();

    let mut files: BTreeMap<String, Map<String, Value>> = BTreeMap::new();
    for (id, variable) in &variables {
        if variable.remote {
            continue;
        }
        let collection = response
            .meta
            .variable_collections
            .get(&variable.variable_collection_id)
            .ok_or_else(|| {
                SyncError::Variables(format!(
                    "variable {id} refers to unknown collection {}",
                    variable.variable_collection_id
                ))
            })?;

        for mode in &collection.modes {
            let file = files
                .entry(format!("{}.{}.json", collection.name, mode.name))
                .or_default();
            let token = group_at(file, &variable.name)?;
            if let Some(token_type) = variable.token_type() {
                token.insert("$type".into(), json!(token_type));
            }
            if let Some(raw) = variable.values_by_mode.get(&mode.mode_id) {
                token.insert("$value".into(), token_value(raw, &names));
            }
            if let Some(description) = &variable.description {
                token.insert("$description".into(), json!(description));
            }
            token.insert(
                "$extensions".into(),
                json!({"com.figma": {
                    "hiddenFromPublishing": variable.hidden_from_publishing,
                    "scopes": variable.scopes,
                    "codeSyntax": variable.code_syntax,
                }}),
            );
        }
    }
    debug!(files = files.len(), variables = variables.len(), "converted variables");
    Ok(files
        .into_iter()
        .map(|(name, map)| (name, Value::Object(map)))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response() -> LocalVariablesResponse {
        LocalVariablesResponse::from_json(
            &json!({
                "status": 200,
                "meta": {
                    "variableCollections": {
                        "c1": {"name": "palette", "modes": [
                            {"modeId": "m1", "name": "light"},
                            {"modeId": "m2", "name": "dark"}
                        ]}
                    },
                    "variables": {
                        "v1": {
                            "name": "blue/100",
                            "variableCollectionId": "c1",
                            "resolvedType": "COLOR",
                            "valuesByMode": {
                                "m1": {"r": 0.1, "g": 0.2, "b": 0.9, "a": 1},
                                "m2": {"r": 0.0, "g": 0.1, "b": 0.5, "a": 1}
                            },
                            "description": "Primary blue",
                            "remote": false,
                            "hiddenFromPublishing": false,
                            "scopes": ["ALL_SCOPES"],
                            "codeSyntax": {}
                        },
                        "v2": {
                            "name": "brand/primary",
                            "variableCollectionId": "c1",
                            "resolvedType": "COLOR",
                            "valuesByMode": {
                                "m1": {"type": "VARIABLE_ALIAS", "id": "v1"},
                                "m2": {"type": "VARIABLE_ALIAS", "id": "v1"}
                            },
                            "remote": false
                        },
                        "v3": {
                            "name": "external/thing",
                            "variableCollectionId": "c9",
                            "resolvedType": "FLOAT",
                            "valuesByMode": {},
                            "remote": true
                        }
                    }
                }
            })
            .to_string(),
        )
        .unwrap()
    }

    #[test]
    fn one_file_per_collection_mode() {
        let files = token_files_from_variables(&response()).unwrap();
        let names: Vec<&str> = files.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["palette.dark.json", "palette.light.json"]);

        let light = &files["palette.light.json"];
        assert_eq!(
            light["blue"]["100"],
            json!({
                "$type": "color",
                "$value": {"r": 0.1, "g": 0.2, "b": 0.9, "a": 1},
                "$description": "Primary blue",
                "$extensions": {"com.figma": {
                    "hiddenFromPublishing": false,
                    "scopes": ["ALL_SCOPES"],
                    "codeSyntax": {}
                }}
            })
        );
        assert_eq!(light["brand"]["primary"]["$value"], json!("{blue.100}"));
        assert!(light["brand"]["primary"].get("$description").is_none());
        assert_eq!(files["palette.dark.json"]["blue"]["100"]["$value"]["b"], json!(0.5));
    }

    #[test]
    fn remote_variables_are_skipped() {
        let files = token_files_from_variables(&response()).unwrap();
        assert!(files.values().all(|file| file.get("external").is_none()));
    }

    #[test]
    fn unknown_collection_is_an_error() {
        let mut response = response();
        response.meta.variables.insert(
            "v4".into(),
            json!({"name": "x", "variableCollectionId": "nope", "resolvedType": "STRING"}),
        );
        assert!(matches!(
            token_files_from_variables(&response),
            Err(SyncError::Variables(_))
        ));
    }

    #[tokio::test]
    async fn static_client_serves_its_response() {
        let client = StaticDesignTool::new(response());
        let fetched = client.fetch_local_variables("file-key").await.unwrap();
        assert_eq!(fetched, response());
    }
}
