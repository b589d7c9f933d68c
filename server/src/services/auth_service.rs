// revstoran_server/src/services/auth_service.rs

//! Account registration, credential checks and Argon2 password hashing.

use crate::errors::AppError;
use crate::models::User;
use argon2::{
  password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
  Argon2,
};
use sqlx::PgPool;
use tracing::{debug, error, info, instrument, warn};

/// Constraint names declared in `schema.sql`.
const USERS_EMAIL_CONSTRAINT: &str = "users_email_key";
const USERS_USERNAME_CONSTRAINT: &str = "users_username_key";

/// Registration input after trimming; see [`Registration::normalize`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
  pub username: String,
  pub email: String,
  pub password: String,
}

impl Registration {
  /// Trims username and email, lowercases the email, and requires all three
  /// fields to be non-empty. The password is taken as-is.
  pub fn normalize(username: &str, email: &str, password: &str) -> Result<Self, AppError> {
    let username = username.trim().to_string();
    let email = email.trim().to_lowercase();
    if username.is_empty() || email.is_empty() || password.is_empty() {
      return Err(AppError::Validation("All fields are required.".to_string()));
    }
    Ok(Self {
      username,
      email,
      password: password.to_string(),
    })
  }
}

pub fn normalize_email(email: &str) -> String {
  email.trim().to_lowercase()
}

/// Hashes a plain-text password using Argon2 with a fresh random salt.
#[instrument(name = "auth_service::hash_password", skip(password), err(Display))]
pub fn hash_password(password: &str) -> Result<String, AppError> {
  if password.is_empty() {
    error!("Password hashing failed: Password cannot be empty.");
    return Err(AppError::Validation("Password cannot be empty for hashing.".to_string()));
  }

  let salt = SaltString::generate(&mut OsRng);
  match Argon2::default().hash_password(password.as_bytes(), &salt) {
    Ok(hash) => Ok(hash.to_string()),
    Err(argon_err) => {
      error!(error = %argon_err, "Argon2 password hashing failed.");
      Err(AppError::Internal(format!("Password hashing process failed: {}", argon_err)))
    }
  }
}

/// Verifies a plain-text password against a stored Argon2 hash.
///
/// Returns `Ok(false)` on mismatch; `Err` only when the stored hash is unusable.
#[instrument(
  name = "auth_service::verify_password",
  skip(hashed_password_str, provided_password),
  err(Display),
  fields(hash_len = hashed_password_str.len())
)]
pub fn verify_password(hashed_password_str: &str, provided_password: &str) -> Result<bool, AppError> {
  if provided_password.is_empty() {
    return Ok(false);
  }

  let parsed_hash = match PasswordHash::new(hashed_password_str) {
    Ok(ph) => ph,
    Err(parse_err) => {
      error!(error = %parse_err, "Failed to parse stored password hash string.");
      return Err(AppError::Internal(format!("Invalid stored password hash format: {}", parse_err)));
    }
  };

  match Argon2::default().verify_password(provided_password.as_bytes(), &parsed_hash) {
    Ok(()) => Ok(true),
    Err(argon2::password_hash::Error::Password) => {
      debug!("Password verification failed: Passwords do not match.");
      Ok(false)
    }
    Err(other_argon_err) => {
      error!(error = %other_argon_err, "Argon2 password verification process encountered an error.");
      Err(AppError::Internal(format!(
        "Password verification process failed: {}",
        other_argon_err
      )))
    }
  }
}

/// Creates a user. Email uniqueness is checked before username uniqueness.
#[instrument(name = "auth_service::register_user", skip_all, fields(email = %input.email), err(Display))]
pub async fn register_user(pool: &PgPool, input: &Registration) -> Result<User, AppError> {
  let email_taken: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)")
    .bind(&input.email)
    .fetch_one(pool)
    .await?;
  if email_taken {
    warn!("Registration rejected: email already registered.");
    return Err(email_taken_error());
  }

  let username_taken: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE username = $1)")
    .bind(&input.username)
    .fetch_one(pool)
    .await?;
  if username_taken {
    warn!("Registration rejected: username already taken.");
    return Err(username_taken_error());
  }

  let password_hash = hash_password(&input.password)?;
  let user: User = sqlx::query_as(
    "INSERT INTO users (username, email, password_hash) VALUES ($1, $2, $3) \
     RETURNING id, username, email, password_hash, created_at",
  )
  .bind(&input.username)
  .bind(&input.email)
  .bind(&password_hash)
  .fetch_one(pool)
  .await
  .map_err(registration_insert_error)?;

  info!(user_id = user.id, "User registered.");
  Ok(user)
}

fn email_taken_error() -> AppError {
  AppError::Validation("An account with this email already exists.".to_string())
}

fn username_taken_error() -> AppError {
  AppError::Validation("This username is already taken.".to_string())
}

/// A concurrent registration can still win the race between the checks and
/// the insert; its unique violation gets the same message as the check.
fn registration_insert_error(err: sqlx::Error) -> AppError {
  let conflict = match &err {
    sqlx::Error::Database(db_err) if db_err.is_unique_violation() => unique_violation_error(db_err.constraint()),
    _ => None,
  };
  match conflict {
    Some(conflict) => {
      warn!(error = %err, "Registration rejected by a unique constraint.");
      conflict
    }
    None => AppError::Sqlx(err),
  }
}

fn unique_violation_error(constraint: Option<&str>) -> Option<AppError> {
  match constraint {
    Some(USERS_EMAIL_CONSTRAINT) => Some(email_taken_error()),
    Some(USERS_USERNAME_CONSTRAINT) => Some(username_taken_error()),
    _ => None,
  }
}

/// Looks the user up by (normalized) email and checks the password. Unknown
/// email and wrong password produce the same error.
#[instrument(name = "auth_service::authenticate", skip(pool, password), err(Display))]
pub async fn authenticate(pool: &PgPool, email: &str, password: &str) -> Result<User, AppError> {
  let email = normalize_email(email);
  let user: Option<User> =
    sqlx::query_as("SELECT id, username, email, password_hash, created_at FROM users WHERE email = $1")
      .bind(&email)
      .fetch_optional(pool)
      .await?;

  let invalid = || AppError::Auth("Invalid login credentials.".to_string());
  let user = user.ok_or_else(invalid)?;
  if !verify_password(&user.password_hash, password)? {
    return Err(invalid());
  }
  Ok(user)
}
