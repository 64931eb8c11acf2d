use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::thread::{self, ScopedJoinHandle};

use crate::api::{ApiClient, ApiError};
use crate::models::{User, UserUpdate};
use crate::routes::Route;
use crate::views::{ActivitiesData, LeaderboardData, TeamsData, UsersData, WorkoutsData};

/// Lifetime of one mounted view. Work started under a scope is dropped once
/// the scope is cancelled.
#[derive(Debug, Clone)]
pub struct ViewScope {
    id: u64,
    cancelled: Arc<AtomicBool>,
}

impl ViewScope {
    fn new(id: u64) -> Self {
        Self {
            id,
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

#[derive(Debug)]
pub enum Payload {
    Users(Result<UsersData, ApiError>),
    Teams(Result<TeamsData, ApiError>),
    Activities(Result<ActivitiesData, ApiError>),
    Workouts(Result<WorkoutsData, ApiError>),
    Leaderboard(Result<LeaderboardData, ApiError>),
    UserSaved(Result<User, ApiError>),
}

#[derive(Debug)]
pub struct Message {
    pub scope: u64,
    pub payload: Payload,
}

pub struct Loader {
    client: ApiClient,
    sender: Sender<Message>,
    receiver: Receiver<Message>,
    next_scope: u64,
}

impl Loader {
    pub fn new(client: ApiClient) -> Self {
        let (sender, receiver) = mpsc::channel();
        Self {
            client,
            sender,
            receiver,
            next_scope: 1,
        }
    }

    pub fn new_scope(&mut self) -> ViewScope {
        let scope = ViewScope::new(self.next_scope);
        self.next_scope += 1;
        scope
    }

    /// Starts the fetches for `route` on a worker thread.
    pub fn mount(&self, route: Route, scope: &ViewScope) {
        if route == Route::Home {
            return;
        }
        let client = self.client.clone();
        self.spawn(scope, move || load_route(&client, route));
    }

    pub fn save_user(&self, scope: &ViewScope, id: u64, update: UserUpdate) {
        let client = self.client.clone();
        self.spawn(scope, move || {
            Some(Payload::UserSaved(client.update_user(id, &update)))
        });
    }

    pub fn try_next(&self) -> Option<Message> {
        match self.receiver.try_recv() {
            Ok(message) => Some(message),
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => None,
        }
    }

    fn spawn<F>(&self, scope: &ViewScope, work: F)
    where
        F: FnOnce() -> Option<Payload> + Send + 'static,
    {
        let scope = scope.clone();
        let sender = self.sender.clone();
        thread::spawn(move || {
            let Some(payload) = work() else { return };
            if scope.is_cancelled() {
                tracing::debug!(scope = scope.id(), "Dropping result for closed view");
                return;
            }
            let _ = sender.send(Message {
                scope: scope.id(),
                payload,
            });
        });
    }
}

pub fn load_route(client: &ApiClient, route: Route) -> Option<Payload> {
    let payload = match route {
        Route::Home => return None,
        Route::Users => Payload::Users(
            fetch_both(|| client.fetch_users(), || client.fetch_teams())
                .map(|(users, teams)| UsersData::new(users, teams)),
        ),
        Route::Teams => Payload::Teams(
            fetch_both(|| client.fetch_teams(), || client.fetch_users())
                .map(|(teams, users)| TeamsData::new(teams, &users)),
        ),
        Route::Activities => Payload::Activities(
            client
                .fetch_activities()
                .map(|activities| ActivitiesData { activities }),
        ),
        Route::Workouts => Payload::Workouts(
            client
                .fetch_workouts()
                .map(|workouts| WorkoutsData { workouts }),
        ),
        Route::Leaderboard => Payload::Leaderboard(
            fetch_three(
                || client.fetch_leaderboard(),
                || client.fetch_users(),
                || client.fetch_teams(),
            )
            .map(|(entries, users, teams)| LeaderboardData::new(entries, &users, &teams)),
        ),
    };
    Some(payload)
}

/// Runs both requests at once. The first error in argument order wins.
pub fn fetch_both<A, B>(
    first: impl FnOnce() -> Result<A, ApiError> + Send,
    second: impl FnOnce() -> Result<B, ApiError> + Send,
) -> Result<(A, B), ApiError>
where
    A: Send,
    B: Send,
{
    thread::scope(|s| {
        let first = s.spawn(first);
        let second = s.spawn(second);
        let first = joined(first);
        let second = joined(second);
        Ok((first?, second?))
    })
}

pub fn fetch_three<A, B, C>(
    first: impl FnOnce() -> Result<A, ApiError> + Send,
    second: impl FnOnce() -> Result<B, ApiError> + Send,
    third: impl FnOnce() -> Result<C, ApiError> + Send,
) -> Result<(A, B, C), ApiError>
where
    A: Send,
    B: Send,
    C: Send,
{
    thread::scope(|s| {
        let first = s.spawn(first);
        let second = s.spawn(second);
        let third = s.spawn(third);
        let first = joined(first);
        let second = joined(second);
        let third = joined(third);
        Ok((first?, second?, third?))
    })
}

fn joined<T>(handle: ScopedJoinHandle<'_, Result<T, ApiError>>) -> Result<T, ApiError> {
    handle
        .join()
        .unwrap_or_else(|_| Err(ApiError::Network("request worker panicked".to_string())))
}
