//! In-memory [`GardenRemote`] and fixtures shared by unit tests.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use crate::garden::{
    Comment, CommentId, Flower, FlowerColor, FlowerId, Garden, GardenId, GardenSummary, User, UserId,
};
use crate::remote::{GardenRemote, NewUser, RemoteError};

pub(crate) fn user(id: UserId, first_name: &str) -> User {
    User { id, first_name: first_name.into(), last_name: String::new(), gardens: Vec::new() }
}

pub(crate) fn garden(id: GardenId, author: &User, flowers: Vec<Flower>) -> Garden {
    Garden {
        id,
        name: format!("Garden {id}"),
        author: author.first_name.clone(),
        author_id: author.id,
        flowers,
        comments: Vec::new(),
    }
}

pub(crate) fn comment(id: CommentId, author: &User, content: &str) -> Comment {
    Comment { id, author: author.first_name.clone(), author_id: author.id, content: content.into() }
}

pub(crate) fn red(id: FlowerId, x: f64, y: f64) -> Flower {
    Flower::saved(id, FlowerColor::Red, x, y)
}

fn status(status: u16) -> RemoteError {
    RemoteError::Status { status, body: String::new() }
}

// =============================================================================
// MockRemote
// =============================================================================

#[derive(Default)]
pub(crate) struct MockStore {
    gardens: BTreeMap<GardenId, Garden>,
    next_id: i64,
    calls: Vec<String>,
    fail_flower_writes: bool,
    fail_fetches: bool,
    user: Option<User>,
    accounts: Vec<(String, String, User)>,
}

/// Behaves like the gardens server: assigns ids, enforces ownership, and
/// keeps a log of every call as `"METHOD /route"`.
#[derive(Default)]
pub(crate) struct MockRemote {
    store: Mutex<MockStore>,
}

impl MockRemote {
    pub(crate) fn new() -> Self {
        let remote = Self::default();
        remote.store().next_id = 1000;
        remote
    }

    pub(crate) fn with_garden(self, garden: Garden) -> Self {
        self.store().gardens.insert(garden.id, garden);
        self
    }

    pub(crate) fn with_account(self, email: &str, password: &str, user: User) -> Self {
        self.store().accounts.push((email.into(), password.into(), user));
        self
    }

    pub(crate) fn logged_in_as(self, user: User) -> Self {
        self.store().user = Some(user);
        self
    }

    pub(crate) fn set_fail_flower_writes(&self, fail: bool) {
        self.store().fail_flower_writes = fail;
    }

    pub(crate) fn set_fail_fetches(&self, fail: bool) {
        self.store().fail_fetches = fail;
    }

    pub(crate) fn calls(&self) -> Vec<String> {
        self.store().calls.clone()
    }

    pub(crate) fn clear_calls(&self) {
        self.store().calls.clear();
    }

    pub(crate) fn garden(&self, id: GardenId) -> Option<Garden> {
        self.store().gardens.get(&id).cloned()
    }

    fn store(&self) -> MutexGuard<'_, MockStore> {
        self.store.lock().unwrap()
    }
}

impl MockStore {
    fn log(&mut self, call: String) {
        self.calls.push(call);
    }

    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn require_user(&self) -> Result<User, RemoteError> {
        self.user.clone().ok_or_else(|| status(401))
    }

    fn owned_garden(&mut self, id: GardenId) -> Result<&mut Garden, RemoteError> {
        let user = self.require_user()?;
        let garden = self.gardens.get_mut(&id).ok_or_else(|| status(404))?;
        if garden.author_id != user.id {
            return Err(status(403));
        }
        Ok(garden)
    }
}

#[async_trait::async_trait]
impl GardenRemote for MockRemote {
    async fn fetch_garden(&self, id: GardenId) -> Result<Garden, RemoteError> {
        let mut store = self.store();
        store.log(format!("GET /gardens/{id}"));
        if store.fail_fetches {
            return Err(RemoteError::Request("connection refused".into()));
        }
        store.gardens.get(&id).cloned().ok_or_else(|| status(404))
    }

    async fn list_gardens(&self) -> Result<Vec<GardenSummary>, RemoteError> {
        let mut store = self.store();
        store.log("GET /gardens".into());
        Ok(store
            .gardens
            .values()
            .map(|g| GardenSummary { id: g.id, name: g.name.clone(), author: g.author.clone(), author_id: g.author_id })
            .collect())
    }

    async fn create_garden(&self, name: &str, author: &str) -> Result<GardenId, RemoteError> {
        let mut store = self.store();
        store.log("POST /gardens".into());
        let user = store.require_user()?;
        let id = store.next_id();
        let garden = Garden {
            id,
            name: name.into(),
            author: author.into(),
            author_id: user.id,
            flowers: Vec::new(),
            comments: Vec::new(),
        };
        store.gardens.insert(id, garden);
        Ok(id)
    }

    async fn rename_garden(&self, id: GardenId, name: &str) -> Result<(), RemoteError> {
        let mut store = self.store();
        store.log(format!("PUT /gardens/{id}"));
        store.owned_garden(id)?.name = name.into();
        Ok(())
    }

    async fn delete_garden(&self, id: GardenId) -> Result<(), RemoteError> {
        let mut store = self.store();
        store.log(format!("DELETE /gardens/{id}"));
        store.owned_garden(id)?;
        store.gardens.remove(&id);
        Ok(())
    }

    async fn create_flower(&self, garden_id: GardenId, flower: &Flower) -> Result<(), RemoteError> {
        let mut store = self.store();
        store.log("POST /flowers".into());
        if store.fail_flower_writes {
            return Err(status(500));
        }
        let id = store.next_id();
        let garden = store.gardens.get_mut(&garden_id).ok_or_else(|| status(404))?;
        garden.flowers.push(Flower::saved(id, flower.color, flower.x, flower.y));
        Ok(())
    }

    async fn delete_flower(&self, id: FlowerId) -> Result<(), RemoteError> {
        let mut store = self.store();
        store.log(format!("DELETE /flowers/{id}"));
        if store.fail_flower_writes {
            return Err(status(500));
        }
        for garden in store.gardens.values_mut() {
            if let Some(pos) = garden.flowers.iter().position(|f| f.id == Some(id)) {
                garden.flowers.remove(pos);
                return Ok(());
            }
        }
        Err(status(404))
    }

    async fn create_comment(&self, garden_id: GardenId, content: &str) -> Result<(), RemoteError> {
        let mut store = self.store();
        store.log("POST /comments".into());
        let user = store.require_user()?;
        let id = store.next_id();
        let garden = store.gardens.get_mut(&garden_id).ok_or_else(|| status(404))?;
        garden.comments.push(comment(id, &user, content));
        Ok(())
    }

    async fn delete_comment(&self, id: CommentId) -> Result<(), RemoteError> {
        let mut store = self.store();
        store.log(format!("DELETE /comments/{id}"));
        let user = store.require_user()?;
        for garden in store.gardens.values_mut() {
            if let Some(pos) = garden.comments.iter().position(|c| c.id == id) {
                if garden.comments[pos].author_id != user.id {
                    return Err(status(403));
                }
                garden.comments.remove(pos);
                return Ok(());
            }
        }
        Err(status(404))
    }

    async fn current_user(&self) -> Result<Option<User>, RemoteError> {
        let mut store = self.store();
        store.log("GET /me".into());
        let Some(mut user) = store.user.clone() else {
            return Ok(None);
        };
        user.gardens = store
            .gardens
            .values()
            .filter(|g| g.author_id == user.id)
            .map(|g| GardenSummary { id: g.id, name: g.name.clone(), author: g.author.clone(), author_id: g.author_id })
            .collect();
        Ok(Some(user))
    }

    async fn create_user(&self, new_user: &NewUser<'_>) -> Result<bool, RemoteError> {
        let mut store = self.store();
        store.log("POST /users".into());
        if store.accounts.iter().any(|(email, _, _)| email == new_user.email) {
            return Ok(false);
        }
        let id = store.next_id();
        let user = User {
            id,
            first_name: new_user.first_name.into(),
            last_name: new_user.last_name.into(),
            gardens: Vec::new(),
        };
        store.accounts.push((new_user.email.into(), new_user.password.into(), user));
        Ok(true)
    }

    async fn create_session(&self, email: &str, password: &str) -> Result<bool, RemoteError> {
        let mut store = self.store();
        store.log("POST /sessions".into());
        let found = store
            .accounts
            .iter()
            .find(|(e, p, _)| e == email && p == password)
            .map(|(_, _, u)| u.clone());
        let ok = found.is_some();
        store.user = found;
        Ok(ok)
    }

    async fn delete_session(&self) -> Result<(), RemoteError> {
        let mut store = self.store();
        store.log("DELETE /sessions".into());
        store.user = None;
        Ok(())
    }
}
