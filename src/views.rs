use crate::dates::display_date;
use crate::joins::{MemberCounts, TeamDirectory, UserDirectory, rank_glyph};
use crate::models::{Activity, Difficulty, LeaderboardEntry, Team, User, Workout};

/// Lifecycle of one mounted view. Terminal until the view is remounted.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadState<T> {
    Loading,
    Ready(T),
    Failed(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Plain,
    Strong,
    Muted,
    Badge,
    Success,
    Warning,
    Danger,
    Gold,
    Silver,
    Bronze,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableCell {
    pub text: String,
    pub tone: Tone,
}

impl TableCell {
    fn new(text: impl Into<String>, tone: Tone) -> Self {
        Self {
            text: text.into(),
            tone,
        }
    }

    fn plain(text: impl Into<String>) -> Self {
        Self::new(text, Tone::Plain)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableBody {
    Rows(Vec<Vec<TableCell>>),
    /// Shown across every column when the collection is empty.
    Placeholder(&'static str),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableModel {
    pub columns: &'static [&'static str],
    /// Relative column weights, one per column.
    pub weights: &'static [u16],
    pub body: TableBody,
}

impl TableModel {
    fn build<T>(
        columns: &'static [&'static str],
        weights: &'static [u16],
        empty: &'static str,
        items: &[T],
        row: impl Fn(usize, &T) -> Vec<TableCell>,
    ) -> Self {
        let body = if items.is_empty() {
            TableBody::Placeholder(empty)
        } else {
            TableBody::Rows(
                items
                    .iter()
                    .enumerate()
                    .map(|(index, item)| row(index, item))
                    .collect(),
            )
        };
        Self {
            columns,
            weights,
            body,
        }
    }

    #[cfg(test)]
    pub fn row_count(&self) -> usize {
        match &self.body {
            TableBody::Rows(rows) => rows.len(),
            TableBody::Placeholder(_) => 0,
        }
    }
}

pub trait Tabular {
    fn table(&self) -> TableModel;

    fn len(&self) -> usize;
}

#[derive(Debug, Clone)]
pub struct UsersData {
    pub users: Vec<User>,
    pub teams: Vec<Team>,
    team_names: TeamDirectory,
}

impl UsersData {
    pub fn new(users: Vec<User>, teams: Vec<Team>) -> Self {
        let team_names = TeamDirectory::build(&teams);
        Self {
            users,
            teams,
            team_names,
        }
    }

    /// Replaces the record with the saved user's id. Returns false when no
    /// record matched.
    pub fn apply_saved(&mut self, saved: User) -> bool {
        match self.users.iter_mut().find(|user| user.id == saved.id) {
            Some(slot) => {
                *slot = saved;
                true
            }
            None => false,
        }
    }
}

impl Tabular for UsersData {
    fn table(&self) -> TableModel {
        TableModel::build(
            &["Name", "Email", "Team", "Created At"],
            &[3, 4, 3, 2],
            "No users found.",
            &self.users,
            |_, user| {
                vec![
                    TableCell::new(&user.name, Tone::Strong),
                    TableCell::plain(&user.email),
                    TableCell::plain(self.team_names.user_team_label(user.team_id)),
                    TableCell::plain(display_date(user.created_at.as_deref())),
                ]
            },
        )
    }

    fn len(&self) -> usize {
        self.users.len()
    }
}

#[derive(Debug, Clone)]
pub struct TeamsData {
    pub teams: Vec<Team>,
    members: MemberCounts,
}

impl TeamsData {
    pub fn new(teams: Vec<Team>, users: &[User]) -> Self {
        Self {
            teams,
            members: MemberCounts::build(users),
        }
    }
}

impl Tabular for TeamsData {
    fn table(&self) -> TableModel {
        TableModel::build(
            &["Team Name", "Description", "Members", "Created"],
            &[3, 6, 1, 2],
            "No teams found.",
            &self.teams,
            |_, team| {
                let description = match team.description_text() {
                    Some(text) => TableCell::plain(text),
                    None => TableCell::new("No description", Tone::Muted),
                };
                vec![
                    TableCell::new(&team.name, Tone::Strong),
                    description,
                    TableCell::new(self.members.for_team(team.id).to_string(), Tone::Badge),
                    TableCell::plain(display_date(team.created_at.as_deref())),
                ]
            },
        )
    }

    fn len(&self) -> usize {
        self.teams.len()
    }
}

#[derive(Debug, Clone)]
pub struct ActivitiesData {
    pub activities: Vec<Activity>,
}

impl Tabular for ActivitiesData {
    fn table(&self) -> TableModel {
        TableModel::build(
            &[
                "Activity Type",
                "User",
                "Duration (min)",
                "Distance (km)",
                "Calories Burned",
                "Date",
            ],
            &[3, 1, 2, 2, 2, 2],
            "No activities found.",
            &self.activities,
            |_, activity| {
                vec![
                    TableCell::new(&activity.activity_type, Tone::Badge),
                    TableCell::plain(
                        activity
                            .user_id
                            .map(|id| id.to_string())
                            .unwrap_or_else(|| "-".to_string()),
                    ),
                    TableCell::plain(activity.duration.to_string()),
                    TableCell::plain(
                        activity
                            .distance
                            .map(|km| format!("{km:.1}"))
                            .unwrap_or_else(|| "-".to_string()),
                    ),
                    TableCell::plain(activity.calories.to_string()),
                    TableCell::plain(display_date(activity.date.as_deref())),
                ]
            },
        )
    }

    fn len(&self) -> usize {
        self.activities.len()
    }
}

#[derive(Debug, Clone)]
pub struct WorkoutsData {
    pub workouts: Vec<Workout>,
}

impl Tabular for WorkoutsData {
    fn table(&self) -> TableModel {
        TableModel::build(
            &[
                "Workout Name",
                "Type",
                "Description",
                "Duration (min)",
                "Calories",
                "Difficulty",
            ],
            &[3, 2, 6, 2, 2, 2],
            "No workouts found.",
            &self.workouts,
            |_, workout| {
                let difficulty_tone = match workout.difficulty_level() {
                    Difficulty::Beginner => Tone::Success,
                    Difficulty::Intermediate => Tone::Warning,
                    Difficulty::Advanced => Tone::Danger,
                };
                vec![
                    TableCell::new(&workout.name, Tone::Strong),
                    TableCell::new(&workout.activity_type, Tone::Badge),
                    TableCell::plain(&workout.description),
                    TableCell::plain(workout.estimated_duration.to_string()),
                    TableCell::plain(workout.estimated_calories.to_string()),
                    TableCell::new(&workout.difficulty, difficulty_tone),
                ]
            },
        )
    }

    fn len(&self) -> usize {
        self.workouts.len()
    }
}

#[derive(Debug, Clone)]
pub struct LeaderboardData {
    pub entries: Vec<LeaderboardEntry>,
    users: UserDirectory,
    teams: TeamDirectory,
}

impl LeaderboardData {
    pub fn new(entries: Vec<LeaderboardEntry>, users: &[User], teams: &[Team]) -> Self {
        Self {
            entries,
            users: UserDirectory::build(users),
            teams: TeamDirectory::build(teams),
        }
    }
}

impl Tabular for LeaderboardData {
    fn table(&self) -> TableModel {
        TableModel::build(
            &[
                "Rank",
                "User",
                "Team",
                "Total Calories",
                "Activities",
                "Duration (min)",
            ],
            &[1, 3, 3, 2, 2, 2],
            "No leaderboard data found.",
            &self.entries,
            |index, entry| {
                let rank_tone = match index {
                    0 => Tone::Gold,
                    1 => Tone::Silver,
                    2 => Tone::Bronze,
                    _ => Tone::Plain,
                };
                vec![
                    TableCell::new(rank_glyph(index), rank_tone),
                    TableCell::new(self.users.display_name(entry.user_id), Tone::Strong),
                    TableCell::plain(self.users.team_name(entry.user_id, &self.teams)),
                    TableCell::new(
                        format!("{} cal", entry.total_calories.unwrap_or(0)),
                        Tone::Badge,
                    ),
                    TableCell::plain(entry.total_activities.unwrap_or(0).to_string()),
                    TableCell::plain(entry.total_duration.unwrap_or(0).to_string()),
                ]
            },
        )
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::decode_collection;

    fn user(id: u64, name: &str, team_id: Option<u64>) -> User {
        User {
            id,
            name: name.to_string(),
            email: format!("{}@x.com", name.to_lowercase()),
            team_id,
            created_at: None,
        }
    }

    fn team(id: u64, name: &str) -> Team {
        Team {
            id,
            name: name.to_string(),
            description: None,
            created_at: None,
        }
    }

    fn entry(id: u64, user_id: u64, calories: i64) -> LeaderboardEntry {
        LeaderboardEntry {
            id,
            user_id,
            total_calories: Some(calories),
            total_activities: Some(1),
            total_duration: None,
        }
    }

    fn rows(model: &TableModel) -> &Vec<Vec<TableCell>> {
        match &model.body {
            TableBody::Rows(rows) => rows,
            TableBody::Placeholder(text) => panic!("expected rows, got placeholder {text}"),
        }
    }

    #[test]
    fn every_empty_view_renders_a_placeholder() {
        let tables = vec![
            UsersData::new(Vec::new(), Vec::new()).table(),
            TeamsData::new(Vec::new(), &[]).table(),
            ActivitiesData {
                activities: Vec::new(),
            }
            .table(),
            WorkoutsData {
                workouts: Vec::new(),
            }
            .table(),
            LeaderboardData::new(Vec::new(), &[], &[]).table(),
        ];
        for table in tables {
            assert!(matches!(table.body, TableBody::Placeholder(_)));
            assert_eq!(table.row_count(), 0);
            assert_eq!(table.columns.len(), table.weights.len());
        }
    }

    #[test]
    fn envelope_and_bare_render_the_same_rows() {
        let bare: Vec<Activity> = decode_collection(
            "activities",
            r#"[{"id": 1, "activity_type": "Run", "user_id": 4, "duration": 30, "calories": 250}]"#,
        )
        .unwrap();
        let wrapped: Vec<Activity> = decode_collection(
            "activities",
            r#"{"results": [{"id": 1, "activity_type": "Run", "user_id": 4, "duration": 30, "calories": 250}]}"#,
        )
        .unwrap();
        let bare_table = ActivitiesData { activities: bare }.table();
        let wrapped_table = ActivitiesData {
            activities: wrapped,
        }
        .table();
        assert_eq!(bare_table, wrapped_table);
        assert_eq!(bare_table.row_count(), 1);
        assert_eq!(rows(&bare_table)[0][1].text, "4");
        assert_eq!(rows(&bare_table)[0][3].text, "-");
    }

    #[test]
    fn leaderboard_keeps_arrival_order() {
        let data = LeaderboardData::new(
            vec![
                entry(1, 5, 100),
                entry(2, 6, 900),
                entry(3, 7, 500),
                entry(4, 99, 5000),
            ],
            &[
                user(5, "Ana", Some(2)),
                user(6, "Ben", None),
                user(7, "Cat", Some(2)),
            ],
            &[team(2, "Red")],
        );
        let table = data.table();
        let rows = rows(&table);
        let ranks: Vec<&str> = rows.iter().map(|row| row[0].text.as_str()).collect();
        assert_eq!(ranks, vec!["🥇", "🥈", "🥉", "4"]);
        assert_eq!(rows[0][1].text, "Ana");
        assert_eq!(rows[0][2].text, "Red");
        assert_eq!(rows[1][2].text, "N/A");
        assert_eq!(rows[3][1].text, "User 99");
        assert_eq!(rows[3][2].text, "N/A");
        assert_eq!(rows[3][3].text, "5000 cal");
    }

    #[test]
    fn leaderboard_missing_totals_default_to_zero() {
        let data = LeaderboardData::new(
            vec![LeaderboardEntry {
                id: 1,
                user_id: 1,
                total_calories: None,
                total_activities: None,
                total_duration: None,
            }],
            &[],
            &[],
        );
        let table = data.table();
        let row = &rows(&table)[0];
        assert_eq!(row[3].text, "0 cal");
        assert_eq!(row[4].text, "0");
    }

    #[test]
    fn users_table_resolves_team_names() {
        let data = UsersData::new(
            vec![user(1, "A", None), user(2, "B", Some(2)), user(3, "C", Some(9))],
            vec![team(2, "Red")],
        );
        let table = data.table();
        let teams: Vec<&str> = rows(&table).iter().map(|row| row[2].text.as_str()).collect();
        assert_eq!(teams, vec!["No team", "Red", "Team 9"]);
    }

    #[test]
    fn teams_table_counts_members_and_marks_missing_description() {
        let data = TeamsData::new(
            vec![team(2, "Red")],
            &[user(1, "A", Some(2)), user(2, "B", Some(2)), user(3, "C", None)],
        );
        let table = data.table();
        let row = &rows(&table)[0];
        assert_eq!(row[1].text, "No description");
        assert_eq!(row[1].tone, Tone::Muted);
        assert_eq!(row[2].text, "2");
    }

    #[test]
    fn workout_difficulty_tones() {
        let workout = |difficulty: &str| Workout {
            id: 1,
            name: "W".to_string(),
            activity_type: "Cycling".to_string(),
            description: "Intervals".to_string(),
            estimated_duration: 45,
            estimated_calories: 400,
            difficulty: difficulty.to_string(),
        };
        let data = WorkoutsData {
            workouts: vec![workout("Beginner"), workout("Intermediate"), workout("Pro")],
        };
        let table = data.table();
        let tones: Vec<Tone> = rows(&table).iter().map(|row| row[5].tone).collect();
        assert_eq!(tones, vec![Tone::Success, Tone::Warning, Tone::Danger]);
    }

    #[test]
    fn apply_saved_replaces_only_matching_user() {
        let mut data = UsersData::new(
            vec![user(1, "A", None), user(2, "B", Some(2)), user(3, "C", None)],
            vec![team(2, "Red")],
        );
        let before = data.users.clone();
        let mut saved = user(2, "Bea", None);
        saved.email = "bea@x.com".to_string();

        assert!(data.apply_saved(saved.clone()));
        assert_eq!(data.users[0], before[0]);
        assert_eq!(data.users[1], saved);
        assert_eq!(data.users[2], before[2]);
    }

    #[test]
    fn apply_saved_ignores_unknown_id() {
        let mut data = UsersData::new(vec![user(1, "A", None)], Vec::new());
        let before = data.users.clone();
        assert!(!data.apply_saved(user(42, "Ghost", None)));
        assert_eq!(data.users, before);
    }
}
