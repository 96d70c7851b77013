//! The backend serializes a one-element list as a bare object and an empty
//! list as a missing key. Everything list-shaped goes through here.

use serde::{Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany<T> {
	Many(Vec<T>),
	One(T),
}

impl<T> From<OneOrMany<T>> for Vec<T> {
	fn from(value: OneOrMany<T>) -> Self {
		match value {
			OneOrMany::Many(items) => items,
			OneOrMany::One(item) => vec![item],
		}
	}
}

/// Use with `#[serde(default, deserialize_with = "one_or_many")]`.
pub fn one_or_many<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
	D: Deserializer<'de>,
	T: Deserialize<'de>,
{
	let value = Option::<OneOrMany<T>>::deserialize(deserializer)?;
	Ok(value.map(Vec::from).unwrap_or_default())
}

/// Parses a top-level response body that may be a list or a single object.
pub fn list_from_value<T>(value: serde_json::Value) -> serde_json::Result<Vec<T>>
where
	T: for<'de> Deserialize<'de>,
{
	if value.is_null() {
		return Ok(Vec::new());
	}
	let items: OneOrMany<T> = serde_json::from_value(value)?;
	Ok(items.into())
}

/// Numbers the search index sometimes sends as strings.
pub fn lenient_u64<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
	D: Deserializer<'de>,
{
	#[derive(Deserialize)]
	#[serde(untagged)]
	enum NumOrString {
		Num(u64),
		Str(String),
	}

	match Option::<NumOrString>::deserialize(deserializer)? {
		None => Ok(0),
		Some(NumOrString::Num(n)) => Ok(n),
		Some(NumOrString::Str(s)) => s.trim().parse().map_err(serde::de::Error::custom),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;

	#[derive(Deserialize, Debug, PartialEq)]
	struct Item {
		name: String,
	}

	#[derive(Deserialize, Debug)]
	struct Wrapper {
		#[serde(default, deserialize_with = "one_or_many")]
		items: Vec<Item>,
	}

	#[test]
	fn bare_object_becomes_single_element_list() {
		let single: Wrapper = serde_json::from_value(json!({ "items": { "name": "a" } })).unwrap();
		let list: Wrapper = serde_json::from_value(json!({ "items": [{ "name": "a" }] })).unwrap();
		assert_eq!(single.items, list.items);
	}

	#[test]
	fn missing_or_null_is_empty() {
		let missing: Wrapper = serde_json::from_value(json!({})).unwrap();
		let null: Wrapper = serde_json::from_value(json!({ "items": null })).unwrap();
		assert!(missing.items.is_empty());
		assert!(null.items.is_empty());
	}

	#[test]
	fn top_level_object_is_listed() {
		let items: Vec<Item> = list_from_value(json!({ "name": "solo" })).unwrap();
		assert_eq!(items, vec![Item { name: "solo".into() }]);
	}
}
