use crate::models::{Team, User, UserUpdate};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorField {
    Name,
    Email,
    Team,
}

impl EditorField {
    fn next(self) -> Self {
        match self {
            EditorField::Name => EditorField::Email,
            EditorField::Email => EditorField::Team,
            EditorField::Team => EditorField::Name,
        }
    }

    fn previous(self) -> Self {
        match self {
            EditorField::Name => EditorField::Team,
            EditorField::Email => EditorField::Name,
            EditorField::Team => EditorField::Email,
        }
    }
}

/// Unsaved copy of a user. `team` holds the selection value: empty for
/// "No team", otherwise the team id as text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserDraft {
    pub name: String,
    pub email: String,
    pub team: String,
}

impl UserDraft {
    pub fn from_user(user: &User) -> Self {
        Self {
            name: user.name.clone(),
            email: user.email.clone(),
            team: user.team_id.map(|id| id.to_string()).unwrap_or_default(),
        }
    }

    pub fn to_update(&self) -> Result<UserUpdate, String> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err("Name is required.".to_string());
        }
        let email = self.email.trim();
        if email.is_empty() {
            return Err("Email is required.".to_string());
        }
        if !email.contains('@') {
            return Err("Enter a valid email address.".to_string());
        }
        Ok(UserUpdate {
            name: name.to_string(),
            email: email.to_string(),
            team_id: parse_team_selection(&self.team)?,
        })
    }
}

pub fn parse_team_selection(value: &str) -> Result<Option<u64>, String> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }
    value
        .parse::<u64>()
        .map(Some)
        .map_err(|_| format!("Invalid team selection: {value}"))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditPhase {
    Editing,
    Saving,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditSession {
    pub user_id: u64,
    pub draft: UserDraft,
    pub focus: EditorField,
    pub phase: EditPhase,
    pub error: Option<String>,
}

impl EditSession {
    pub fn is_saving(&self) -> bool {
        self.phase == EditPhase::Saving
    }

    pub fn next_field(&mut self) {
        self.focus = self.focus.next();
    }

    pub fn previous_field(&mut self) {
        self.focus = self.focus.previous();
    }

    pub fn push_char(&mut self, ch: char) {
        match self.focus {
            EditorField::Name => self.draft.name.push(ch),
            EditorField::Email => self.draft.email.push(ch),
            EditorField::Team => {}
        }
    }

    pub fn pop_char(&mut self) {
        match self.focus {
            EditorField::Name => {
                self.draft.name.pop();
            }
            EditorField::Email => {
                self.draft.email.pop();
            }
            EditorField::Team => self.draft.team.clear(),
        }
    }

    /// Steps through "No team" followed by every team, wrapping around.
    pub fn cycle_team(&mut self, teams: &[Team], forward: bool) {
        let options: Vec<String> = std::iter::once(String::new())
            .chain(teams.iter().map(|team| team.id.to_string()))
            .collect();
        let current = options
            .iter()
            .position(|value| *value == self.draft.team)
            .unwrap_or(0);
        let next = if forward {
            (current + 1) % options.len()
        } else if current == 0 {
            options.len() - 1
        } else {
            current - 1
        };
        self.draft.team = options[next].clone();
    }

    pub fn team_label(&self, teams: &[Team]) -> String {
        match parse_team_selection(&self.draft.team) {
            Ok(None) => "No team".to_string(),
            Ok(Some(id)) => teams
                .iter()
                .find(|team| team.id == id)
                .map(|team| team.name.clone())
                .unwrap_or_else(|| format!("Team {id}")),
            Err(message) => message,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Editor {
    #[default]
    Closed,
    Open(EditSession),
}

impl Editor {
    pub fn open(user: &User) -> Self {
        Editor::Open(EditSession {
            user_id: user.id,
            draft: UserDraft::from_user(user),
            focus: EditorField::Name,
            phase: EditPhase::Editing,
            error: None,
        })
    }

    pub fn is_open(&self) -> bool {
        matches!(self, Editor::Open(_))
    }

    pub fn session(&self) -> Option<&EditSession> {
        match self {
            Editor::Open(session) => Some(session),
            Editor::Closed => None,
        }
    }

    pub fn session_mut(&mut self) -> Option<&mut EditSession> {
        match self {
            Editor::Open(session) => Some(session),
            Editor::Closed => None,
        }
    }

    /// Moves `Editing` to `Saving` and returns the request to send. Form
    /// errors keep the editor in `Editing` with the message set.
    pub fn begin_save(&mut self) -> Option<(u64, UserUpdate)> {
        let session = self.session_mut()?;
        if session.is_saving() {
            return None;
        }
        match session.draft.to_update() {
            Ok(update) => {
                session.phase = EditPhase::Saving;
                session.error = None;
                Some((session.user_id, update))
            }
            Err(message) => {
                session.error = Some(message);
                None
            }
        }
    }

    pub fn save_failed(&mut self, message: String) {
        if let Some(session) = self.session_mut() {
            session.phase = EditPhase::Editing;
            session.error = Some(message);
        }
    }

    pub fn save_succeeded(&mut self) {
        *self = Editor::Closed;
    }

    /// Closes the editor unless a save is in flight.
    pub fn cancel(&mut self) -> bool {
        match self {
            Editor::Open(session) if session.is_saving() => false,
            _ => {
                *self = Editor::Closed;
                true
            }
        }
    }
}
