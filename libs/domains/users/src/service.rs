use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use axum_helpers::TokenIssuer;
use database::{DocumentCollection, with_deadline};
use mongodb::IndexModel;
use mongodb::bson::doc;
use mongodb::options::IndexOptions;
use std::sync::Arc;
use std::time::Duration;
use tracing::instrument;
use validator::Validate;

use crate::error::{UserError, UserResult};
use crate::models::{Authenticated, LoginRequest, RegisterUser, User};

/// Upper bound for a single store call
pub const DEFAULT_STORE_TIMEOUT: Duration = Duration::from_secs(10);

/// Registration and authentication over any [`DocumentCollection`] of users.
///
/// Email uniqueness rests on the unique index created by
/// [`UserService::init_indexes`]; the lookup before insert only produces the
/// friendlier error in the common case.
pub struct UserService<S: DocumentCollection<User>> {
    store: Arc<S>,
    issuer: TokenIssuer,
    timeout: Duration,
}

impl<S: DocumentCollection<User>> UserService<S> {
    pub fn new(store: S, issuer: TokenIssuer) -> Self {
        Self {
            store: Arc::new(store),
            issuer,
            timeout: DEFAULT_STORE_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Create the unique index on `email`. Run once at startup.
    #[instrument(skip(self))]
    pub async fn init_indexes(&self) -> UserResult<()> {
        let index = IndexModel::builder()
            .keys(doc! { "email": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();
        with_deadline(self.timeout, self.store.create_index(index)).await?;
        tracing::info!("Unique email index ready");
        Ok(())
    }

    /// Register a non-admin user and mint their first token.
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn register(&self, input: RegisterUser) -> UserResult<Authenticated> {
        input.validate()?;

        if self.find_by_email(&input.email).await?.is_some() {
            return Err(UserError::DuplicateEmail(input.email));
        }

        let user = User {
            password_hash: hash_password(input.password).await?,
            email: input.email,
            is_admin: false,
        };

        match with_deadline(self.timeout, self.store.insert_one(&user)).await {
            Ok(_) => {}
            Err(e) if e.is_duplicate_key() => {
                tracing::info!("Lost registration race on unique email index");
                return Err(UserError::DuplicateEmail(user.email));
            }
            Err(e) => return Err(e.into()),
        }

        tracing::info!("User registered");
        self.authenticated(&user)
    }

    /// Check credentials and mint a token.
    ///
    /// Unknown email is `NotFound`; a wrong password is `InvalidCredentials`.
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn authenticate(&self, input: LoginRequest) -> UserResult<Authenticated> {
        input.validate()?;

        let user = self
            .find_by_email(&input.email)
            .await?
            .ok_or_else(|| UserError::NotFound(input.email.clone()))?;

        if !verify_password(input.password, user.password_hash.clone()).await? {
            tracing::info!("Rejected credentials");
            return Err(UserError::InvalidCredentials);
        }

        self.authenticated(&user)
    }

    async fn find_by_email(&self, email: &str) -> UserResult<Option<User>> {
        Ok(with_deadline(self.timeout, self.store.find_one(doc! { "email": email })).await?)
    }

    fn authenticated(&self, user: &User) -> UserResult<Authenticated> {
        let token = self.issuer.issue(&user.email, user.is_admin)?;
        Ok(Authenticated {
            email: user.email.clone(),
            token,
        })
    }
}

// Argon2 is deliberately slow; keep it off the async workers.

async fn hash_password(password: String) -> UserResult<String> {
    tokio::task::spawn_blocking(move || {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| UserError::PasswordHash(e.to_string()))
    })
    .await
    .map_err(|e| UserError::PasswordHash(e.to_string()))?
}

async fn verify_password(password: String, hash: String) -> UserResult<bool> {
    tokio::task::spawn_blocking(move || {
        let parsed_hash =
            PasswordHash::new(&hash).map_err(|e| UserError::PasswordHash(e.to_string()))?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    })
    .await
    .map_err(|e| UserError::PasswordHash(e.to_string()))?
}
