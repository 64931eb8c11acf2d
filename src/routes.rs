#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Home,
    Users,
    Teams,
    Activities,
    Workouts,
    Leaderboard,
}

pub const ROUTES: [Route; 6] = [
    Route::Home,
    Route::Users,
    Route::Teams,
    Route::Activities,
    Route::Workouts,
    Route::Leaderboard,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HomeCard {
    pub route: Route,
    pub title: &'static str,
    pub description: &'static str,
}

/// Cards on the landing screen, in display order.
pub const HOME_CARDS: [HomeCard; 4] = [
    HomeCard {
        route: Route::Users,
        title: "👤 Users",
        description: "View and manage user profiles",
    },
    HomeCard {
        route: Route::Activities,
        title: "🏋️ Activities",
        description: "Log your workouts and monitor your progress",
    },
    HomeCard {
        route: Route::Teams,
        title: "👥 Teams",
        description: "Collaborate with others to reach your fitness goals",
    },
    HomeCard {
        route: Route::Leaderboard,
        title: "🏆 Leaderboard",
        description: "Check the leaderboard and see how you rank",
    },
];

impl Route {
    pub fn path(self) -> &'static str {
        match self {
            Route::Home => "/",
            Route::Users => "/users",
            Route::Teams => "/teams",
            Route::Activities => "/activities",
            Route::Workouts => "/workouts",
            Route::Leaderboard => "/leaderboard",
        }
    }

    /// Unknown paths resolve to `None`; a trailing slash is accepted.
    pub fn from_path(path: &str) -> Option<Self> {
        let trimmed = path.trim();
        let normalized = if trimmed.len() > 1 {
            trimmed.trim_end_matches('/')
        } else {
            trimmed
        };
        ROUTES
            .into_iter()
            .find(|route| route.path() == normalized)
    }

    pub fn title(self) -> &'static str {
        match self {
            Route::Home => "Home",
            Route::Users => "Users",
            Route::Teams => "Teams",
            Route::Activities => "Activities",
            Route::Workouts => "Workouts",
            Route::Leaderboard => "Leaderboard",
        }
    }

    pub fn heading(self) -> &'static str {
        match self {
            Route::Home => "Welcome to OctoFit Tracker",
            Route::Users => "Users",
            Route::Teams => "Teams",
            Route::Activities => "Activities",
            Route::Workouts => "Suggested Workouts",
            Route::Leaderboard => "🏆 Leaderboard",
        }
    }

    pub fn loading_message(self) -> &'static str {
        match self {
            Route::Home => "",
            Route::Users => "Loading users...",
            Route::Teams => "Loading teams...",
            Route::Activities => "Loading activities...",
            Route::Workouts => "Loading workouts...",
            Route::Leaderboard => "Loading leaderboard...",
        }
    }

    pub fn index(self) -> usize {
        ROUTES
            .iter()
            .position(|route| *route == self)
            .unwrap_or(0)
    }

    pub fn next(self) -> Self {
        ROUTES[(self.index() + 1) % ROUTES.len()]
    }

    pub fn previous(self) -> Self {
        ROUTES[(self.index() + ROUTES.len() - 1) % ROUTES.len()]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    EditUser,
    Refresh,
    /// Presented but not implemented yet.
    Unavailable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewAction {
    pub key: char,
    pub label: &'static str,
    pub kind: ActionKind,
}

const fn action(key: char, label: &'static str, kind: ActionKind) -> ViewAction {
    ViewAction { key, label, kind }
}

const USER_ACTIONS: [ViewAction; 4] = [
    action('a', "Add User", ActionKind::Unavailable),
    action('v', "View", ActionKind::Unavailable),
    action('e', "Edit", ActionKind::EditUser),
    action('x', "Delete", ActionKind::Unavailable),
];

const TEAM_ACTIONS: [ViewAction; 4] = [
    action('a', "Create Team", ActionKind::Unavailable),
    action('v', "View", ActionKind::Unavailable),
    action('e', "Edit", ActionKind::Unavailable),
    action('x', "Delete", ActionKind::Unavailable),
];

const ACTIVITY_ACTIONS: [ViewAction; 4] = [
    action('a', "Log Activity", ActionKind::Unavailable),
    action('v', "View", ActionKind::Unavailable),
    action('e', "Edit", ActionKind::Unavailable),
    action('x', "Delete", ActionKind::Unavailable),
];

const WORKOUT_ACTIONS: [ViewAction; 4] = [
    action('a', "Create Workout", ActionKind::Unavailable),
    action('s', "Start", ActionKind::Unavailable),
    action('v', "View", ActionKind::Unavailable),
    action('b', "Save", ActionKind::Unavailable),
];

const LEADERBOARD_ACTIONS: [ViewAction; 4] = [
    action('f', "Filter by Team", ActionKind::Unavailable),
    action('r', "Refresh", ActionKind::Refresh),
    action('v', "View Profile", ActionKind::Unavailable),
    action('l', "Activities", ActionKind::Unavailable),
];

pub fn actions(route: Route) -> &'static [ViewAction] {
    match route {
        Route::Home => &[],
        Route::Users => &USER_ACTIONS,
        Route::Teams => &TEAM_ACTIONS,
        Route::Activities => &ACTIVITY_ACTIONS,
        Route::Workouts => &WORKOUT_ACTIONS,
        Route::Leaderboard => &LEADERBOARD_ACTIONS,
    }
}

pub fn find_action(route: Route, key: char) -> Option<ViewAction> {
    actions(route).iter().copied().find(|action| action.key == key)
}
