//! JSON:API document flattening.
//!
//! Resources come back as `{ id, type, ...attributes, <relationship>: ... }`
//! with relationships resolved from the document's `included` array. A
//! relationship whose target is not included stays an `{ id, type }` stub.
//! Resource-identifier `meta` (image alt text, dimensions) is kept under
//! `meta` on the resolved object.

use serde_json::{Map, Value};
use std::collections::HashMap;

/// Relationships are followed at most this deep.
const MAX_DEPTH: usize = 8;

type Index<'a> = HashMap<(&'a str, &'a str), &'a Value>;

/// Flatten a JSON:API document.
///
/// Returns `Ok(None)` for `"data": null`, an array for collections and an
/// object for single resources.
pub fn flatten_document(document: &Value) -> Result<Option<Value>, String> {
    let doc = document
        .as_object()
        .ok_or_else(|| "document is not a JSON object".to_string())?;

    let data = match doc.get("data") {
        Some(data) => data,
        None => {
            if let Some(errors) = doc.get("errors") {
                return Err(format!("document contains errors: {}", errors));
            }
            return Err("document has no data member".to_string());
        }
    };

    let mut index: Index = HashMap::new();
    if let Some(included) = doc.get("included").and_then(Value::as_array) {
        for resource in included {
            if let Some(key) = identity(resource) {
                index.insert(key, resource);
            }
        }
    }
    // Primary resources can also be relationship targets of each other
    let primary: Vec<&Value> = match data {
        Value::Array(items) => items.iter().collect(),
        Value::Object(_) => vec![data],
        _ => vec![],
    };
    for resource in primary {
        if let Some(key) = identity(resource) {
            index.entry(key).or_insert(resource);
        }
    }

    let mut path = Vec::new();
    match data {
        Value::Null => Ok(None),
        Value::Array(items) => {
            let flattened = items
                .iter()
                .map(|item| flatten_resource(item, &index, &mut path))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Some(Value::Array(flattened)))
        }
        Value::Object(_) => flatten_resource(data, &index, &mut path).map(Some),
        other => Err(format!("unexpected data member: {}", other)),
    }
}

fn identity(resource: &Value) -> Option<(&str, &str)> {
    let kind = resource.get("type")?.as_str()?;
    let id = resource.get("id")?.as_str()?;
    Some((kind, id))
}

fn flatten_resource<'a>(
    resource: &'a Value,
    index: &Index<'a>,
    path: &mut Vec<(&'a str, &'a str)>,
) -> Result<Value, String> {
    let key = identity(resource).ok_or_else(|| "resource without type or id".to_string())?;

    let mut flat = Map::new();
    flat.insert("id".to_string(), Value::String(key.1.to_string()));
    flat.insert("type".to_string(), Value::String(key.0.to_string()));

    if let Some(attributes) = resource.get("attributes").and_then(Value::as_object) {
        for (name, value) in attributes {
            if name != "id" && name != "type" {
                flat.insert(name.clone(), value.clone());
            }
        }
    }

    if let Some(relationships) = resource.get("relationships").and_then(Value::as_object) {
        path.push(key);
        for (name, relationship) in relationships {
            let resolved = match relationship.get("data") {
                Some(Value::Array(targets)) => Value::Array(
                    targets
                        .iter()
                        .map(|target| resolve(target, index, path))
                        .collect::<Result<Vec<_>, _>>()?,
                ),
                Some(target @ Value::Object(_)) => resolve(target, index, path)?,
                _ => Value::Null,
            };
            flat.insert(name.clone(), resolved);
        }
        path.pop();
    }

    Ok(Value::Object(flat))
}

fn resolve<'a>(
    target: &'a Value,
    index: &Index<'a>,
    path: &mut Vec<(&'a str, &'a str)>,
) -> Result<Value, String> {
    let key = identity(target).ok_or_else(|| "relationship target without type or id".to_string())?;

    let mut resolved = match index.get(&key) {
        Some(&resource) if path.len() < MAX_DEPTH && !path.contains(&key) => {
            flatten_resource(resource, index, path)?
        }
        _ => {
            let mut stub = Map::new();
            stub.insert("id".to_string(), Value::String(key.1.to_string()));
            stub.insert("type".to_string(), Value::String(key.0.to_string()));
            Value::Object(stub)
        }
    };

    if let (Some(meta), Some(obj)) = (target.get("meta"), resolved.as_object_mut()) {
        obj.insert("meta".to_string(), meta.clone());
    }

    Ok(resolved)
}
