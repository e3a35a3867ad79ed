//! The built-in Story Spoiler CRUD suite

use crate::api::StoryDraft;

use super::config::{Action, Expectation, Scenario, ScenarioPlan};

pub const MSG_CREATED: &str = "Successfully created!";
pub const MSG_EDITED: &str = "Successfully edited";
pub const MSG_DELETED: &str = "Deleted successfully!";
pub const MSG_NOT_FOUND: &str = "No spoilers...";
pub const MSG_DELETE_FAILED: &str = "Unable to delete this story spoiler!";

/// Id that is never created by the suite
pub const MISSING_STORY_ID: &str = "123";

fn scenario(name: &str, description: &str, action: Action, expect: Expectation) -> Scenario {
    Scenario {
        name: name.to_string(),
        description: Some(description.to_string()),
        action,
        expect,
    }
}

/// Create, edit, list and delete one story, then check the error paths
pub fn story_crud() -> ScenarioPlan {
    ScenarioPlan {
        name: "story-spoiler-crud".to_string(),
        description: Some("CRUD and negative-path checks for /api/Story".to_string()),
        scenarios: vec![
            scenario(
                "create_story",
                "Creating a complete story returns 201 and a storyId",
                Action::CreateStory {
                    story: StoryDraft::new("New Story Title", "Test story description", ""),
                    capture: true,
                },
                Expectation::status(201).with_msg(MSG_CREATED),
            ),
            scenario(
                "edit_story",
                "Editing the created story returns 200",
                Action::EditStory {
                    id: None,
                    story: StoryDraft::new("Edited Title", "Edited story description", ""),
                },
                Expectation::status(200).with_msg(MSG_EDITED),
            ),
            scenario(
                "list_stories",
                "Listing returns a non-empty array",
                Action::ListStories,
                Expectation::status(200).non_empty(),
            ),
            scenario(
                "delete_story",
                "Deleting the created story returns 200",
                Action::DeleteStory { id: None },
                Expectation::status(200).with_msg(MSG_DELETED),
            ),
            scenario(
                "create_story_missing_fields",
                "Creating a story without title and description returns 400",
                Action::CreateStory {
                    story: StoryDraft {
                        url: Some(String::new()),
                        ..Default::default()
                    },
                    capture: false,
                },
                Expectation::status(400),
            ),
            scenario(
                "edit_missing_story",
                "Editing an unknown story returns 404",
                Action::EditStory {
                    id: Some(MISSING_STORY_ID.to_string()),
                    story: StoryDraft::new("Edited Title", "Edited description", ""),
                },
                Expectation::status(404).with_msg(MSG_NOT_FOUND),
            ),
            scenario(
                "delete_missing_story",
                "Deleting an unknown story returns 400",
                Action::DeleteStory {
                    id: Some(MISSING_STORY_ID.to_string()),
                },
                Expectation::status(400).with_msg(MSG_DELETE_FAILED),
            ),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_suite_is_valid() {
        let plan = story_crud();
        plan.validate().unwrap();
        assert_eq!(plan.scenarios.len(), 7);
    }

    #[test]
    fn test_builtin_suite_order() {
        let names: Vec<_> = story_crud()
            .scenarios
            .into_iter()
            .map(|s| s.name)
            .collect();
        assert_eq!(
            names,
            [
                "create_story",
                "edit_story",
                "list_stories",
                "delete_story",
                "create_story_missing_fields",
                "edit_missing_story",
                "delete_missing_story",
            ]
        );
    }

    #[test]
    fn test_only_first_scenario_captures() {
        let plan = story_crud();
        let capturing: Vec<_> = plan
            .scenarios
            .iter()
            .filter(|s| s.action.captures_story())
            .map(|s| s.name.as_str())
            .collect();
        assert_eq!(capturing, ["create_story"]);
    }

    #[test]
    fn test_suite_survives_yaml_round_trip() {
        let yaml = serde_yaml::to_string(&story_crud()).unwrap();
        let plan = ScenarioPlan::from_yaml(&yaml).unwrap();
        assert_eq!(plan.scenarios[4].action, story_crud().scenarios[4].action);
    }
}
