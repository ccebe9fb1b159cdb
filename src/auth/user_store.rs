//! User Storage
//! Mission: Store and manage user accounts with SQLite

use crate::auth::models::{User, UserRole};
use crate::db::Db;
use bcrypt::{hash, verify, DEFAULT_COST};
use rusqlite::params;
use tracing::{info, warn};

/// What went wrong inside the credential store.
#[derive(Debug)]
pub enum UserStoreError {
    DuplicateUsername,
    Hash(bcrypt::BcryptError),
    Storage(rusqlite::Error),
}

impl std::fmt::Display for UserStoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UserStoreError::DuplicateUsername => write!(f, "Username already taken"),
            UserStoreError::Hash(e) => write!(f, "Password hashing failed: {}", e),
            UserStoreError::Storage(e) => write!(f, "User storage error: {}", e),
        }
    }
}

impl std::error::Error for UserStoreError {}

/// User storage backed by the shared SQLite connection.
pub struct UserStore {
    db: Db,
}

impl UserStore {
    pub fn new(db: Db) -> Self {
        Self { db }
    }

    /// Create a new user with a freshly hashed password.
    ///
    /// A username collision fails the insert and leaves prior state
    /// untouched.
    pub fn create_user(
        &self,
        username: &str,
        password: &str,
        role: UserRole,
    ) -> Result<User, UserStoreError> {
        let password_hash = hash(password, DEFAULT_COST).map_err(UserStoreError::Hash)?;

        let conn = self.db.lock();
        conn.execute(
            "INSERT INTO users (username, password, role) VALUES (?1, ?2, ?3)",
            params![username, password_hash, role.as_str()],
        )
        .map_err(|e| match e {
            rusqlite::Error::SqliteFailure(err, _)
                if err.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                UserStoreError::DuplicateUsername
            }
            other => UserStoreError::Storage(other),
        })?;

        let id = conn.last_insert_rowid();

        info!("✅ Created user: {} ({})", username, role.as_str());

        Ok(User {
            id,
            username: username.to_string(),
            password_hash,
            role,
        })
    }

    /// Get user by username
    pub fn find_by_username(&self, username: &str) -> Result<Option<User>, UserStoreError> {
        let conn = self.db.lock();

        let mut stmt = conn
            .prepare("SELECT id, username, password, role FROM users WHERE username = ?1")
            .map_err(UserStoreError::Storage)?;

        let user_result = stmt.query_row(params![username], |row| {
            let role_str: String = row.get(3)?;
            Ok(User {
                id: row.get(0)?,
                username: row.get(1)?,
                password_hash: row.get(2)?,
                role: UserRole::from_str(&role_str).unwrap_or(UserRole::User),
            })
        });

        match user_result {
            Ok(user) => Ok(Some(user)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(UserStoreError::Storage(e)),
        }
    }

    /// Verify username and password.
    ///
    /// bcrypt's own comparison path is used, so timing does not correlate
    /// with the number of matching characters. Unknown users verify false.
    pub fn verify_password(&self, username: &str, password: &str) -> Result<bool, UserStoreError> {
        match self.find_by_username(username)? {
            Some(user) => verify(password, &user.password_hash).map_err(UserStoreError::Hash),
            None => Ok(false),
        }
    }

    /// Seed the admin account at startup. No-op if the username exists.
    pub fn ensure_admin(&self, username: &str, password: &str) -> Result<(), UserStoreError> {
        if self.find_by_username(username)?.is_some() {
            return Ok(());
        }

        self.create_user(username, password, UserRole::Admin)?;

        info!(
            "🔐 Default admin user created (username: {}, password: {})",
            username, password
        );
        warn!("⚠️  CHANGE DEFAULT PASSWORD IN PRODUCTION!");

        Ok(())
    }
}
