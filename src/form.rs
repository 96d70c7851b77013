//! Editable model of the backend's dynamic metadata schema.

use crate::error::{MediaError, OkOrDomain, Result};
use crate::event::Event;
use crate::messages::Messages;
use crate::models::metadata::find_field;
use crate::models::{
	CollectionKey, FieldKind, FieldValue, MediaFile, MetadataCollection, MetadataContainer,
	MetadataField,
};
use crate::requester::EDITABLE_FIELDS;
use std::fmt::Write;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
	pub value: String,
	pub label: String,
	pub selectable: bool,
	order: Option<i64>,
}

/// How one field is presented and edited.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldControl {
	ReadOnlyText(String),
	Text(String),
	/// Multi-valued, accepts values outside the vocabulary.
	FreeTags(Vec<String>),
	Select {
		options: Vec<SelectOption>,
		current: Option<SelectOption>,
	},
	Unsupported(String),
}

pub fn collection_to_options(
	collection: Option<&MetadataCollection>,
	translatable: bool,
	messages: &Messages,
) -> Vec<SelectOption> {
	let Some(collection) = collection else {
		return Vec::new();
	};
	let mut options: Vec<SelectOption> = collection
		.iter()
		.map(|(key, value)| {
			let key = CollectionKey::parse(key);
			SelectOption {
				value: value.clone(),
				label: if translatable {
					messages.t(&key.label)
				} else {
					key.label
				},
				selectable: key.selectable.unwrap_or(true),
				order: key.order,
			}
		})
		.collect();
	options.sort_by(|a, b| {
		(a.order.is_none(), a.order, &a.label).cmp(&(b.order.is_none(), b.order, &b.label))
	});
	options
}

pub fn control_for(field: &MetadataField, messages: &Messages) -> FieldControl {
	match (&field.kind, &field.collection) {
		(FieldKind::Text, None) if field.is_locked() => FieldControl::ReadOnlyText(field.value.display()),
		(FieldKind::Text, None) => FieldControl::Text(field.value.display()),
		(FieldKind::MixedText, Some(_)) => FieldControl::FreeTags(field.value.as_list()),
		(_, Some(collection)) => {
			let options = collection_to_options(Some(collection), field.translatable, messages);
			let current = field
				.value
				.as_text()
				.and_then(|v| options.iter().find(|o| o.value == v))
				.cloned();
			FieldControl::Select { options, current }
		}
		(kind, None) => FieldControl::Unsupported(kind.tag().to_owned()),
	}
}

/// Returns `containers` with field `id` replaced. The whole record is
/// rebuilt on every edit.
pub fn with_field_value(containers: &[MetadataContainer], id: &str, value: FieldValue) -> Vec<MetadataContainer> {
	containers
		.iter()
		.map(|c| MetadataContainer {
			fields: c
				.fields
				.iter()
				.map(|f| {
					if f.id == id {
						MetadataField {
							value: value.clone(),
							..f.clone()
						}
					} else {
						f.clone()
					}
				})
				.collect(),
			..c.clone()
		})
		.collect()
}

/// Initial and working copies of the metadata plus the files picked for upload.
#[derive(Debug, Default)]
pub struct MetadataForm {
	initial: Vec<MetadataContainer>,
	edited: Vec<MetadataContainer>,
	presenter: Option<MediaFile>,
	caption: Option<MediaFile>,
	pub on_data_change: Event<Vec<MetadataContainer>>,
}

impl MetadataForm {
	pub fn new(initial: Vec<MetadataContainer>) -> Self {
		MetadataForm {
			edited: initial.clone(),
			initial,
			..Default::default()
		}
	}

	pub fn initial(&self) -> &[MetadataContainer] {
		&self.initial
	}

	pub fn edited(&self) -> &[MetadataContainer] {
		&self.edited
	}

	pub fn field(&self, id: &str) -> Option<&MetadataField> {
		find_field(&self.edited, id)
	}

	/// Fields the form presents, in backend order.
	pub fn visible_fields(&self) -> impl Iterator<Item = &MetadataField> {
		self.edited
			.iter()
			.flat_map(|c| c.fields.iter())
			.filter(|f| EDITABLE_FIELDS.contains(&f.id.as_str()))
	}

	pub fn set_value(&mut self, id: &str, value: FieldValue) -> Result<()> {
		let field = self
			.visible_fields()
			.find(|f| f.id == id)
			.ok_or_domain(format!("no editable field '{id}'"))?;
		if field.is_locked() {
			return Err(MediaError::Domain(format!("field '{id}' is locked")));
		}
		if let FieldControl::Select { options, .. } = control_for(field, &Messages::new()) {
			let chosen = value.as_text().and_then(|v| options.iter().find(|o| o.value == v));
			match chosen {
				Some(option) if option.selectable => {}
				Some(_) => return Err(MediaError::Domain(format!("'{}' cannot be selected for '{id}'", value.display()))),
				None => return Err(MediaError::Domain(format!("'{}' is not an option of '{id}'", value.display()))),
			}
		}
		self.replace_value(id, value);
		Ok(())
	}

	/// Writes a value regardless of lock state; used for values the tool
	/// derives itself, such as the resolved series.
	pub(crate) fn replace_value(&mut self, id: &str, value: FieldValue) {
		self.edited = with_field_value(&self.edited, id, value);
		self.on_data_change.call(&self.edited);
	}

	pub fn set_presenter_file(&mut self, file: MediaFile) {
		self.presenter = Some(file);
	}

	pub fn set_caption_file(&mut self, file: MediaFile) {
		self.caption = Some(file);
	}

	pub fn presenter(&self) -> Option<&MediaFile> {
		self.presenter.as_ref()
	}

	pub fn caption(&self) -> Option<&MediaFile> {
		self.caption.as_ref()
	}

	/// Back to the fetched state, files dropped.
	pub fn reset(&mut self) {
		self.edited = self.initial.clone();
		self.presenter = None;
		self.caption = None;
		self.on_data_change.call(&self.edited);
	}

	/// Copies read-only flags and lock reasons from a fresh fetch. Values are
	/// left alone; fields the fresh copy lacks keep their current state.
	pub fn apply_locks(&mut self, fresh: &[MetadataContainer]) -> bool {
		let mut changed = false;
		for field in self.edited.iter_mut().flat_map(|c| c.fields.iter_mut()) {
			let Some(remote) = find_field(fresh, &field.id) else {
				continue;
			};
			if field.read_only != remote.read_only || field.lock_reason != remote.lock_reason {
				field.read_only = remote.read_only;
				field.lock_reason = remote.lock_reason.clone();
				changed = true;
			}
		}
		if changed {
			self.on_data_change.call(&self.edited);
		}
		changed
	}

	pub fn render(&self, messages: &Messages, with_upload: bool, pending: bool) -> String {
		let mut out = String::new();
		for field in self.visible_fields() {
			let label = messages.t(&field.label);
			let _ = write!(out, "{label} [{}]: ", field.id);
			match control_for(field, messages) {
				FieldControl::ReadOnlyText(v) => {
					let _ = write!(out, "{v}");
					if let Some(reason) = field.lock_reason.as_deref().filter(|r| !r.is_empty()) {
						let _ = write!(out, " ({})", messages.t_with("LOCKED", &[("reason", reason)]));
					}
				}
				FieldControl::Text(v) => {
					let _ = write!(out, "\"{v}\"");
				}
				FieldControl::FreeTags(tags) => {
					let _ = write!(out, "{}", tags.join(" | "));
				}
				FieldControl::Select { options, current } => {
					let shown = current
						.map(|c| c.label)
						.unwrap_or_else(|| messages.t("SELECT_OPTION"));
					let choices: Vec<&str> = options.iter().map(|o| o.label.as_str()).collect();
					let _ = write!(out, "{shown} <{}>", choices.join(", "));
				}
				FieldControl::Unsupported(kind) => {
					let _ = write!(out, "{}", messages.t_with("CANNOT_DISPLAY_CONTROL", &[("type", &kind)]));
				}
			}
			out.push('\n');
		}
		if with_upload {
			let presenter = self.presenter.as_ref().map_or("-", |f| f.file_name.as_str());
			let caption = self.caption.as_ref().map_or("-", |f| f.file_name.as_str());
			let _ = writeln!(out, "{}: {presenter}", messages.t("PRESENTER"));
			let _ = writeln!(out, "{}: {caption}", messages.t("CAPTION"));
		}
		let button = if pending { "UPLOADING" } else { "UPLOAD" };
		let _ = writeln!(out, "[{}]{}", messages.t(button), if pending { " (disabled)" } else { "" });
		out
	}
}
