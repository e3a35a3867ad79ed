//! Scenario plan types
//!
//! A plan is an ordered list of scenario descriptors. The built-in suite is
//! one such plan; others can be loaded from YAML files.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

use crate::api::types::{self, STORY_ALL, STORY_CREATE};
use crate::api::StoryDraft;
use crate::common::{Error, Result};

/// An ordered list of scenarios run against one session
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ScenarioPlan {
    /// Name of the plan
    pub name: String,
    /// Optional description of what the plan covers
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Scenarios in execution order
    pub scenarios: Vec<Scenario>,
}

/// A single independently asserted call against the service
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Scenario {
    /// Name shown in the report
    pub name: String,
    /// Optional description of what the scenario verifies
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// The call to make
    pub action: Action,
    /// What the response must look like
    pub expect: Expectation,
}

/// The API call a scenario makes
///
/// Edit and delete without an `id` target the story captured by the most
/// recent capturing create.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Action {
    /// POST a story to the create endpoint
    CreateStory {
        story: StoryDraft,
        /// Remember the returned `storyId` for later scenarios
        #[serde(default)]
        capture: bool,
    },
    /// PUT a replacement story
    EditStory {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        id: Option<String>,
        story: StoryDraft,
    },
    /// GET every story
    ListStories,
    /// DELETE a story
    DeleteStory {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        id: Option<String>,
    },
}

impl Action {
    pub fn method(&self) -> &'static str {
        match self {
            Action::CreateStory { .. } => "POST",
            Action::EditStory { .. } => "PUT",
            Action::ListStories => "GET",
            Action::DeleteStory { .. } => "DELETE",
        }
    }

    /// Request path, with `{storyId}` standing in for a captured id
    pub fn path(&self) -> String {
        match self {
            Action::CreateStory { .. } => STORY_CREATE.to_string(),
            Action::EditStory { id, .. } => types::story_edit(id.as_deref().unwrap_or("{storyId}")),
            Action::ListStories => STORY_ALL.to_string(),
            Action::DeleteStory { id } => {
                types::story_delete(id.as_deref().unwrap_or("{storyId}"))
            }
        }
    }

    /// Whether this action needs the story captured by an earlier create
    pub fn needs_story(&self) -> bool {
        matches!(
            self,
            Action::EditStory { id: None, .. } | Action::DeleteStory { id: None }
        )
    }

    /// Whether this action captures a story id for later scenarios
    pub fn captures_story(&self) -> bool {
        matches!(self, Action::CreateStory { capture: true, .. })
    }
}

/// Expectations for a scenario's response
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Expectation {
    /// Expected HTTP status code
    pub status: u16,
    /// Expected value of the `msg` body field
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub msg: Option<String>,
    /// Body must be a non-empty JSON array
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub non_empty: bool,
}

impl Expectation {
    pub fn status(status: u16) -> Self {
        Self {
            status,
            msg: None,
            non_empty: false,
        }
    }

    pub fn with_msg(mut self, msg: &str) -> Self {
        self.msg = Some(msg.to_string());
        self
    }

    pub fn non_empty(mut self) -> Self {
        self.non_empty = true;
        self
    }
}

impl ScenarioPlan {
    /// Load and validate a plan from a YAML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::FileRead {
            path: path.display().to_string(),
            error: e.to_string(),
        })?;
        Self::from_yaml(&content)
    }

    /// Parse and validate a plan from YAML text
    pub fn from_yaml(content: &str) -> Result<Self> {
        let plan: ScenarioPlan = serde_yaml::from_str(content)
            .map_err(|e| Error::Plan(format!("Failed to parse scenario plan: {}", e)))?;
        plan.validate()?;
        Ok(plan)
    }

    /// Check ordering dependencies and naming
    ///
    /// Every scenario that targets the captured story must come after a
    /// capturing create.
    pub fn validate(&self) -> Result<()> {
        if self.scenarios.is_empty() {
            return Err(Error::Plan(format!("Plan '{}' has no scenarios", self.name)));
        }

        let mut names = HashSet::new();
        let mut captured = false;
        for (i, scenario) in self.scenarios.iter().enumerate() {
            if !names.insert(scenario.name.as_str()) {
                return Err(Error::Plan(format!(
                    "Duplicate scenario name '{}'",
                    scenario.name
                )));
            }
            if scenario.action.needs_story() && !captured {
                return Err(Error::Plan(format!(
                    "Scenario {} '{}' targets the created story but no earlier scenario captures one",
                    i + 1,
                    scenario.name
                )));
            }
            captured |= scenario.action.captures_story();
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PLAN: &str = r#"
name: redelete
scenarios:
  - name: create
    action:
      type: create_story
      capture: true
      story:
        title: A
        description: B
        url: ""
    expect:
      status: 201
      msg: Successfully created!
  - name: list
    action:
      type: list_stories
    expect:
      status: 200
      non_empty: true
  - name: delete
    action:
      type: delete_story
    expect:
      status: 200
  - name: delete_literal
    action:
      type: delete_story
      id: "123"
    expect:
      status: 400
"#;

    #[test]
    fn test_parse_plan() {
        let plan = ScenarioPlan::from_yaml(PLAN).unwrap();
        assert_eq!(plan.scenarios.len(), 4);
        assert!(plan.scenarios[0].action.captures_story());
        assert_eq!(plan.scenarios[1].action, Action::ListStories);
        assert!(plan.scenarios[1].expect.non_empty);
        assert!(plan.scenarios[2].action.needs_story());
        assert_eq!(
            plan.scenarios[3].action,
            Action::DeleteStory {
                id: Some("123".to_string())
            }
        );
    }

    #[test]
    fn test_rejects_dependency_before_capture() {
        let yaml = r#"
name: broken
scenarios:
  - name: edit
    action:
      type: edit_story
      story: { title: X }
    expect:
      status: 200
"#;
        let err = ScenarioPlan::from_yaml(yaml).unwrap_err();
        assert!(matches!(err, Error::Plan(_)));
        assert!(err.to_string().contains("no earlier scenario captures"));
    }

    #[test]
    fn test_rejects_duplicate_names() {
        let yaml = r#"
name: dup
scenarios:
  - name: list
    action: { type: list_stories }
    expect: { status: 200 }
  - name: list
    action: { type: list_stories }
    expect: { status: 200 }
"#;
        assert!(ScenarioPlan::from_yaml(yaml).is_err());
    }

    #[test]
    fn test_rejects_unknown_action() {
        let yaml = r#"
name: bad
scenarios:
  - name: patch
    action: { type: patch_story }
    expect: { status: 200 }
"#;
        assert!(matches!(
            ScenarioPlan::from_yaml(yaml),
            Err(Error::Plan(_))
        ));
    }

    #[test]
    fn test_action_paths() {
        let edit = Action::EditStory {
            id: None,
            story: StoryDraft::default(),
        };
        assert_eq!(edit.method(), "PUT");
        assert_eq!(edit.path(), "/api/Story/Edit/{storyId}");

        let delete = Action::DeleteStory {
            id: Some("123".to_string()),
        };
        assert_eq!(delete.path(), "/api/Story/Delete/123");
        assert!(!delete.needs_story());
    }
}
