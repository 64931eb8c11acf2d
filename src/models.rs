use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct User {
    pub id: u64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub team_id: Option<u64>,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Team {
    pub id: u64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Activity {
    pub id: u64,
    #[serde(default)]
    pub activity_type: String,
    #[serde(default)]
    pub user_id: Option<u64>,
    #[serde(default)]
    pub duration: i64,
    #[serde(default)]
    pub distance: Option<f64>,
    #[serde(default)]
    pub calories: i64,
    #[serde(default)]
    pub date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Workout {
    pub id: u64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub activity_type: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub estimated_duration: i64,
    #[serde(default)]
    pub estimated_calories: i64,
    #[serde(default)]
    pub difficulty: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct LeaderboardEntry {
    pub id: u64,
    pub user_id: u64,
    #[serde(default)]
    pub total_calories: Option<i64>,
    #[serde(default)]
    pub total_activities: Option<i64>,
    #[serde(default)]
    pub total_duration: Option<i64>,
}

/// Body of `PUT /users/{id}/`. `team_id` always serializes, as `null` when unset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserUpdate {
    pub name: String,
    pub email: String,
    pub team_id: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

impl Workout {
    pub fn difficulty_level(&self) -> Difficulty {
        match self.difficulty.as_str() {
            "Beginner" => Difficulty::Beginner,
            "Intermediate" => Difficulty::Intermediate,
            _ => Difficulty::Advanced,
        }
    }
}

impl Team {
    pub fn description_text(&self) -> Option<&str> {
        self.description
            .as_deref()
            .filter(|value| !value.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_tolerates_missing_optional_fields() {
        let user: User = serde_json::from_str(r#"{"id": 3, "name": "Ana"}"#).unwrap();
        assert_eq!(user.team_id, None);
        assert_eq!(user.email, "");
        assert_eq!(user.created_at, None);
    }

    #[test]
    fn update_payload_serializes_null_team() {
        let payload = UserUpdate {
            name: "A".to_string(),
            email: "a@x.com".to_string(),
            team_id: None,
        };
        let value = serde_json::to_value(&payload).unwrap();
        assert!(value["team_id"].is_null());
    }

    #[test]
    fn unknown_difficulty_is_advanced() {
        let workout = Workout {
            id: 1,
            name: "Sprint".to_string(),
            activity_type: "Running".to_string(),
            description: String::new(),
            estimated_duration: 20,
            estimated_calories: 300,
            difficulty: "Expert".to_string(),
        };
        assert_eq!(workout.difficulty_level(), Difficulty::Advanced);
    }

    #[test]
    fn blank_team_description_is_absent() {
        let team = Team {
            id: 1,
            name: "Red".to_string(),
            description: Some("  ".to_string()),
            created_at: None,
        };
        assert_eq!(team.description_text(), None);
    }
}
