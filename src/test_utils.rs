use crate::api::Backend;
use crate::clock::Clock;
use crate::config::Config;
use crate::error::app_error::AppError;
use crate::frontend::Frontend;
use crate::models::auth::{AuthResponse, LoginRequest, RegisterRequest};
use crate::models::session::Session;
use crate::models::user::{ActiveUser, CreateUserRequest, StatusResponse, UpdateSelfRequest, UpdateUserRequest, User};
use crate::portal::Portal;
use crate::session_store::SessionStore;
use crate::storage::MemoryStore;
use chrono::{DateTime, Duration, TimeZone, Utc};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

fn guard<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

pub fn alice() -> User {
    User {
        id: 1,
        username: "alice".into(),
        email: "alice@example.com".into(),
        is_admin: true,
    }
}

pub fn bob() -> User {
    User {
        id: 2,
        username: "bob".into(),
        email: "bob@example.com".into(),
        is_admin: false,
    }
}

pub fn carol() -> User {
    User {
        id: 3,
        username: "Carol".into(),
        email: "carol@example.com".into(),
        is_admin: false,
    }
}

pub fn ok_status(message: &str) -> StatusResponse {
    StatusResponse {
        status: Some(StatusResponse::SUCCESS.to_string()),
        message: Some(message.to_string()),
    }
}

/// Clock that only moves when told to.
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new() -> Self {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap();
        Self { now: Mutex::new(start) }
    }

    pub fn advance(&self, by: Duration) {
        *guard(&self.now) += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *guard(&self.now)
    }
}

/// Records alerts and confirmation prompts; answers every prompt the same way.
pub struct RecordingFrontend {
    alerts: Mutex<Vec<String>>,
    prompts: Mutex<Vec<String>>,
    confirm: AtomicBool,
}

impl RecordingFrontend {
    pub fn new() -> Self {
        Self {
            alerts: Mutex::new(Vec::new()),
            prompts: Mutex::new(Vec::new()),
            confirm: AtomicBool::new(true),
        }
    }

    pub fn answer_confirm(&self, answer: bool) {
        self.confirm.store(answer, Ordering::SeqCst);
    }

    pub fn alerts(&self) -> Vec<String> {
        guard(&self.alerts).clone()
    }

    pub fn prompts(&self) -> Vec<String> {
        guard(&self.prompts).clone()
    }
}

impl Frontend for RecordingFrontend {
    fn alert(&self, message: &str) {
        guard(&self.alerts).push(message.to_string());
    }

    fn confirm(&self, message: &str) -> bool {
        guard(&self.prompts).push(message.to_string());
        self.confirm.load(Ordering::SeqCst)
    }
}

/// Canned answer for one endpoint.
#[derive(Debug, Clone)]
pub enum Reply<T> {
    Ok(T),
    Rejected(u16, Option<String>),
    Forbidden,
    Offline,
}

impl<T: Clone> Reply<T> {
    fn resolve(&self) -> Result<T, AppError> {
        match self {
            Reply::Ok(value) => Ok(value.clone()),
            Reply::Rejected(status, message) => Err(AppError::rejected(*status, message.clone())),
            Reply::Forbidden => Err(AppError::Forbidden),
            Reply::Offline => Err(AppError::Connection("connection refused".to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Login(LoginRequest),
    Register(RegisterRequest),
    Logout,
    CurrentUser,
    UpdateCurrentUser(UpdateSelfRequest),
    ListUsers,
    ActiveUsers,
    CreateUser(CreateUserRequest),
    UpdateUser(i64, UpdateUserRequest),
    DeleteUser(i64),
}

struct Replies {
    login: Reply<AuthResponse>,
    register: Reply<AuthResponse>,
    logout: Reply<()>,
    current_user: Reply<User>,
    update_current_user: Reply<StatusResponse>,
    list_users: Reply<Vec<User>>,
    active_users: Reply<Vec<ActiveUser>>,
    create_user: Reply<StatusResponse>,
    update_user: Reply<StatusResponse>,
    delete_user: Reply<StatusResponse>,
}

impl Default for Replies {
    fn default() -> Self {
        let admin = alice();
        Self {
            login: Reply::Ok(AuthResponse {
                token: Some("token-alice".into()),
                username: Some(admin.username.clone()),
                is_admin: true,
                message: None,
            }),
            register: Reply::Ok(AuthResponse {
                token: Some("token-registered".into()),
                username: None,
                is_admin: false,
                message: None,
            }),
            logout: Reply::Ok(()),
            current_user: Reply::Ok(admin.clone()),
            update_current_user: Reply::Ok(ok_status("Profile updated")),
            list_users: Reply::Ok(vec![admin.clone(), bob(), carol()]),
            active_users: Reply::Ok(vec![ActiveUser {
                id: Some(admin.id),
                username: admin.username,
                email: admin.email,
                is_admin: true,
            }]),
            create_user: Reply::Ok(ok_status("User created")),
            update_user: Reply::Ok(ok_status("User updated")),
            delete_user: Reply::Ok(ok_status("User deleted")),
        }
    }
}

/// In-memory backend recording every call it receives.
pub struct MockBackend {
    replies: Mutex<Replies>,
    calls: Mutex<Vec<Call>>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self {
            replies: Mutex::new(Replies::default()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        guard(&self.calls).clone()
    }

    pub fn count(&self, predicate: impl Fn(&Call) -> bool) -> usize {
        guard(&self.calls).iter().filter(|call| predicate(call)).count()
    }

    pub fn set_login(&self, reply: Reply<AuthResponse>) {
        guard(&self.replies).login = reply;
    }

    pub fn set_register(&self, reply: Reply<AuthResponse>) {
        guard(&self.replies).register = reply;
    }

    pub fn set_logout(&self, reply: Reply<()>) {
        guard(&self.replies).logout = reply;
    }

    pub fn set_current_user(&self, reply: Reply<User>) {
        guard(&self.replies).current_user = reply;
    }

    pub fn set_update_current_user(&self, reply: Reply<StatusResponse>) {
        guard(&self.replies).update_current_user = reply;
    }

    pub fn set_list_users(&self, reply: Reply<Vec<User>>) {
        guard(&self.replies).list_users = reply;
    }

    pub fn set_active_users(&self, reply: Reply<Vec<ActiveUser>>) {
        guard(&self.replies).active_users = reply;
    }

    pub fn set_create_user(&self, reply: Reply<StatusResponse>) {
        guard(&self.replies).create_user = reply;
    }

    pub fn set_update_user(&self, reply: Reply<StatusResponse>) {
        guard(&self.replies).update_user = reply;
    }

    pub fn set_delete_user(&self, reply: Reply<StatusResponse>) {
        guard(&self.replies).delete_user = reply;
    }

    fn record(&self, call: Call) {
        guard(&self.calls).push(call);
    }
}

#[async_trait::async_trait]
impl Backend for MockBackend {
    async fn login(&self, request: &LoginRequest) -> Result<AuthResponse, AppError> {
        self.record(Call::Login(request.clone()));
        guard(&self.replies).login.resolve()
    }

    async fn register(&self, request: &RegisterRequest) -> Result<AuthResponse, AppError> {
        self.record(Call::Register(request.clone()));
        guard(&self.replies).register.resolve()
    }

    async fn logout(&self, _token: &str) -> Result<(), AppError> {
        self.record(Call::Logout);
        guard(&self.replies).logout.resolve()
    }

    async fn current_user(&self, _token: &str) -> Result<User, AppError> {
        self.record(Call::CurrentUser);
        guard(&self.replies).current_user.resolve()
    }

    async fn update_current_user(&self, _token: &str, request: &UpdateSelfRequest) -> Result<StatusResponse, AppError> {
        self.record(Call::UpdateCurrentUser(request.clone()));
        guard(&self.replies).update_current_user.resolve()
    }

    async fn list_users(&self, _token: &str) -> Result<Vec<User>, AppError> {
        self.record(Call::ListUsers);
        guard(&self.replies).list_users.resolve()
    }

    async fn active_users(&self, _token: &str) -> Result<Vec<ActiveUser>, AppError> {
        self.record(Call::ActiveUsers);
        guard(&self.replies).active_users.resolve()
    }

    async fn create_user(&self, _token: &str, request: &CreateUserRequest) -> Result<StatusResponse, AppError> {
        self.record(Call::CreateUser(request.clone()));
        guard(&self.replies).create_user.resolve()
    }

    async fn update_user(&self, _token: &str, id: i64, request: &UpdateUserRequest) -> Result<StatusResponse, AppError> {
        self.record(Call::UpdateUser(id, request.clone()));
        guard(&self.replies).update_user.resolve()
    }

    async fn delete_user(&self, _token: &str, id: i64) -> Result<StatusResponse, AppError> {
        self.record(Call::DeleteUser(id));
        guard(&self.replies).delete_user.resolve()
    }
}

/// A [`Portal`] wired to the mocks above, with no reload delay after saves.
pub struct TestPortal {
    pub portal: Portal,
    pub backend: Arc<MockBackend>,
    pub frontend: Arc<RecordingFrontend>,
    pub clock: Arc<ManualClock>,
    pub store: Arc<MemoryStore>,
}

impl TestPortal {
    pub fn new() -> Self {
        let mut config = Config::default();
        config.admin.reload_delay_ms = 0;
        Self::with_config(config)
    }

    pub fn with_config(config: Config) -> Self {
        let backend = Arc::new(MockBackend::new());
        let frontend = Arc::new(RecordingFrontend::new());
        let clock = Arc::new(ManualClock::new());
        let store = Arc::new(MemoryStore::new());
        let portal = Portal::new(config, backend.clone(), store.clone(), frontend.clone(), clock.clone());

        Self {
            portal,
            backend,
            frontend,
            clock,
            store,
        }
    }

    pub fn sessions(&self) -> SessionStore {
        SessionStore::new(self.store.clone())
    }

    /// Persists a session for alice without going through the login flow.
    pub fn sign_in_storage(&self, is_admin: bool) {
        if let Err(e) = self.sessions().save(&Session::new("token-alice", "alice", is_admin)) {
            panic!("failed to store session: {e}");
        }
    }
}
