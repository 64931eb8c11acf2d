use std::collections::HashMap;

use crate::models::{Team, User};

const MEDALS: [&str; 3] = ["🥇", "🥈", "🥉"];

/// Team names keyed by id. The first team with a given id wins.
#[derive(Debug, Clone, Default)]
pub struct TeamDirectory {
    names: HashMap<u64, String>,
}

impl TeamDirectory {
    pub fn build(teams: &[Team]) -> Self {
        let mut names = HashMap::with_capacity(teams.len());
        for team in teams {
            names.entry(team.id).or_insert_with(|| team.name.clone());
        }
        Self { names }
    }

    pub fn name(&self, team_id: u64) -> Option<&str> {
        self.names.get(&team_id).map(String::as_str)
    }

    /// Label used by the users table.
    pub fn user_team_label(&self, team_id: Option<u64>) -> String {
        match team_id {
            None => "No team".to_string(),
            Some(id) => self
                .name(id)
                .map(str::to_string)
                .unwrap_or_else(|| format!("Team {id}")),
        }
    }
}

#[derive(Debug, Clone)]
struct UserRef {
    name: String,
    team_id: Option<u64>,
}

#[derive(Debug, Clone, Default)]
pub struct UserDirectory {
    users: HashMap<u64, UserRef>,
}

impl UserDirectory {
    pub fn build(users: &[User]) -> Self {
        let mut map = HashMap::with_capacity(users.len());
        for user in users {
            map.entry(user.id).or_insert_with(|| UserRef {
                name: user.name.clone(),
                team_id: user.team_id,
            });
        }
        Self { users: map }
    }

    pub fn display_name(&self, user_id: u64) -> String {
        self.users
            .get(&user_id)
            .map(|user| user.name.clone())
            .unwrap_or_else(|| format!("User {user_id}"))
    }

    pub fn team_name(&self, user_id: u64, teams: &TeamDirectory) -> String {
        self.users
            .get(&user_id)
            .and_then(|user| user.team_id)
            .and_then(|team_id| teams.name(team_id))
            .map(str::to_string)
            .unwrap_or_else(|| "N/A".to_string())
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemberCounts {
    counts: HashMap<u64, usize>,
}

impl MemberCounts {
    pub fn build(users: &[User]) -> Self {
        let mut counts = HashMap::new();
        for team_id in users.iter().filter_map(|user| user.team_id) {
            *counts.entry(team_id).or_insert(0) += 1;
        }
        Self { counts }
    }

    pub fn for_team(&self, team_id: u64) -> usize {
        self.counts.get(&team_id).copied().unwrap_or(0)
    }
}

/// Rank shown for the entry at `index`; arrival order is the ranking.
pub fn rank_glyph(index: usize) -> String {
    MEDALS
        .get(index)
        .map(|medal| medal.to_string())
        .unwrap_or_else(|| (index + 1).to_string())
}
