use serde::Deserialize;

pub const INSTRUCTOR_ROLE: &str = "Instructor";

/// Launch context claims of the current LTI session.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LtiData {
	pub roles: Vec<String>,
	pub context_label: Option<String>,
}

impl LtiData {
	pub fn is_instructor(&self) -> bool {
		self.roles.iter().any(|r| r == INSTRUCTOR_ROLE)
	}
}

#[derive(Deserialize)]
pub(crate) struct RawLti {
	roles: Option<String>,
	context_label: Option<String>,
}

impl From<RawLti> for LtiData {
	fn from(raw: RawLti) -> Self {
		let roles = raw
			.roles
			.map(|r| r.split(',').map(|s| s.trim().to_owned()).collect())
			.unwrap_or_default();
		LtiData {
			roles,
			context_label: raw.context_label,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;

	#[test]
	fn roles_are_split_on_commas() {
		let raw: RawLti = serde_json::from_value(json!({ "roles": "Learner,Instructor", "context_label": "CS101" })).unwrap();
		let lti = LtiData::from(raw);
		assert_eq!(lti.roles, vec!["Learner", "Instructor"]);
		assert!(lti.is_instructor());
		assert_eq!(lti.context_label.as_deref(), Some("CS101"));
	}

	#[test]
	fn missing_roles_means_no_roles() {
		let raw: RawLti = serde_json::from_value(json!({})).unwrap();
		assert!(!LtiData::from(raw).is_instructor());
	}
}
