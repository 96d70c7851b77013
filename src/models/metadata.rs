use super::one_or_many::one_or_many;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// Vocabulary of a controlled field: internal key to submitted value.
pub type MetadataCollection = BTreeMap<String, String>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
	Text(String),
	List(Vec<String>),
}

impl Default for FieldValue {
	fn default() -> Self {
		FieldValue::Text(String::new())
	}
}

impl FieldValue {
	pub fn as_text(&self) -> Option<&str> {
		match self {
			FieldValue::Text(s) => Some(s),
			FieldValue::List(_) => None,
		}
	}

	/// List view of the value; a scalar becomes a list of one unless empty.
	pub fn as_list(&self) -> Vec<String> {
		match self {
			FieldValue::List(items) => items.clone(),
			FieldValue::Text(s) if s.is_empty() => Vec::new(),
			FieldValue::Text(s) => vec![s.clone()],
		}
	}

	pub fn display(&self) -> String {
		match self {
			FieldValue::Text(s) => s.clone(),
			FieldValue::List(items) => items.join(", "),
		}
	}
}

impl<'de> Deserialize<'de> for FieldValue {
	fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
	where
		D: Deserializer<'de>,
	{
		use serde_json::Value;

		fn scalar(v: Value) -> String {
			match v {
				Value::String(s) => s,
				Value::Null => String::new(),
				other => other.to_string(),
			}
		}

		Ok(match Value::deserialize(deserializer)? {
			Value::Array(items) => FieldValue::List(items.into_iter().map(scalar).collect()),
			other => FieldValue::Text(scalar(other)),
		})
	}
}

impl Serialize for FieldValue {
	fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: serde::Serializer,
	{
		match self {
			FieldValue::Text(s) => serializer.serialize_str(s),
			FieldValue::List(items) => items.serialize(serializer),
		}
	}
}

/// The backend's `type` tag for a metadata field.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum FieldKind {
	Text,
	MixedText,
	TextLong,
	OrderedText,
	Date,
	StartDate,
	Boolean,
	Other(String),
}

impl From<String> for FieldKind {
	fn from(tag: String) -> Self {
		match tag.as_str() {
			"text" => FieldKind::Text,
			"mixed_text" => FieldKind::MixedText,
			"text_long" => FieldKind::TextLong,
			"ordered_text" => FieldKind::OrderedText,
			"date" => FieldKind::Date,
			"start_date" => FieldKind::StartDate,
			"boolean" => FieldKind::Boolean,
			_ => FieldKind::Other(tag),
		}
	}
}

impl FieldKind {
	pub fn tag(&self) -> &str {
		match self {
			FieldKind::Text => "text",
			FieldKind::MixedText => "mixed_text",
			FieldKind::TextLong => "text_long",
			FieldKind::OrderedText => "ordered_text",
			FieldKind::Date => "date",
			FieldKind::StartDate => "start_date",
			FieldKind::Boolean => "boolean",
			FieldKind::Other(tag) => tag,
		}
	}
}

impl Default for FieldKind {
	fn default() -> Self {
		FieldKind::Text
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetadataField {
	pub id: String,
	#[serde(default)]
	pub label: String,
	#[serde(default)]
	pub value: FieldValue,
	#[serde(rename = "type", default)]
	pub kind: FieldKind,
	#[serde(default)]
	pub collection: Option<MetadataCollection>,
	#[serde(default)]
	pub read_only: bool,
	#[serde(default, alias = "locked")]
	pub lock_reason: Option<String>,
	#[serde(default)]
	pub translatable: bool,
	#[serde(default)]
	pub required: bool,
}

impl MetadataField {
	pub fn is_locked(&self) -> bool {
		self.read_only || self.lock_reason.as_deref().is_some_and(|r| !r.is_empty())
	}
}

/// A group of fields sharing a catalog flavor, e.g. `dublincore/episode`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MetadataContainer {
	#[serde(default)]
	pub flavor: String,
	#[serde(default)]
	pub title: String,
	#[serde(default, deserialize_with = "one_or_many")]
	pub fields: Vec<MetadataField>,
}

impl MetadataContainer {
	pub fn field(&self, id: &str) -> Option<&MetadataField> {
		self.fields.iter().find(|f| f.id == id)
	}
}

pub fn find_field<'a>(containers: &'a [MetadataContainer], id: &str) -> Option<&'a MetadataField> {
	containers.iter().find_map(|c| c.field(id))
}

/// A vocabulary key, which may carry a JSON payload instead of a plain label.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CollectionKey {
	pub label: String,
	#[serde(default)]
	pub order: Option<i64>,
	#[serde(default)]
	pub selectable: Option<bool>,
}

impl CollectionKey {
	/// Keys starting with `{` are JSON; anything unparsable is its own label.
	pub fn parse(key: &str) -> CollectionKey {
		let literal = || CollectionKey {
			label: key.to_owned(),
			order: None,
			selectable: None,
		};
		if !key.starts_with('{') {
			return literal();
		}
		match serde_json::from_str(key) {
			Ok(parsed) => parsed,
			Err(err) => {
				tracing::debug!(key, %err, "vocabulary key is not valid JSON, using it as label");
				literal()
			}
		}
	}
}

#[derive(Serialize)]
struct SubmittedField<'a> {
	id: &'a str,
	value: &'a FieldValue,
}

#[derive(Serialize)]
struct SubmittedContainer<'a> {
	flavor: &'a str,
	fields: Vec<SubmittedField<'a>>,
}

/// JSON body for metadata submission, restricted to the fields in `allowed`.
pub fn submission_json(containers: &[MetadataContainer], allowed: &[&str]) -> serde_json::Result<String> {
	let payload: Vec<SubmittedContainer> = containers
		.iter()
		.map(|c| SubmittedContainer {
			flavor: &c.flavor,
			fields: c
				.fields
				.iter()
				.filter(|f| allowed.contains(&f.id.as_str()))
				.map(|f| SubmittedField {
					id: &f.id,
					value: &f.value,
				})
				.collect(),
		})
		.collect();
	serde_json::to_string(&payload)
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;

	#[test]
	fn json_key_yields_label_and_order() {
		let key = CollectionKey::parse(r#"{"label":"Creative Commons","order":2,"selectable":true}"#);
		assert_eq!(key.label, "Creative Commons");
		assert_eq!(key.order, Some(2));
		assert_eq!(key.selectable, Some(true));
	}

	#[test]
	fn malformed_json_key_is_literal() {
		let key = CollectionKey::parse("{not json");
		assert_eq!(key.label, "{not json");
		assert_eq!(key.order, None);
	}

	#[test]
	fn field_values_accept_scalars_lists_and_null() {
		let container: MetadataContainer = serde_json::from_value(json!({
			"flavor": "dublincore/episode",
			"fields": [
				{ "id": "title", "value": "Intro", "type": "text" },
				{ "id": "creator", "value": ["A", "B"], "type": "mixed_text", "collection": {} },
				{ "id": "duration", "value": null, "type": "text", "readOnly": true },
				{ "id": "flag", "value": true, "type": "boolean" }
			]
		}))
		.unwrap();
		assert_eq!(container.field("title").unwrap().value, FieldValue::Text("Intro".into()));
		assert_eq!(container.field("creator").unwrap().value.as_list(), vec!["A", "B"]);
		assert_eq!(container.field("creator").unwrap().kind, FieldKind::MixedText);
		assert!(container.field("duration").unwrap().is_locked());
		assert_eq!(container.field("flag").unwrap().value.display(), "true");
	}

	#[test]
	fn submission_only_carries_allowed_fields() {
		let containers: Vec<MetadataContainer> = vec![serde_json::from_value(json!({
			"flavor": "dublincore/episode",
			"fields": [
				{ "id": "title", "value": "Intro" },
				{ "id": "duration", "value": "6000" }
			]
		}))
		.unwrap()];
		let body = submission_json(&containers, &["title"]).unwrap();
		assert_eq!(body, r#"[{"flavor":"dublincore/episode","fields":[{"id":"title","value":"Intro"}]}]"#);
	}
}
