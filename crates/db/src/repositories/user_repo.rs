//! Queries over `users`.

use launchpad_core::roles::Role;
use launchpad_core::types::DbId;
use sqlx::PgPool;

use crate::models::user::{CreateUser, UpdateProfile, UpdateUser, User};

const COLUMNS: &str = "id, email, name, password_hash, role_id, email_verified, \
                       bio, profile_image, created_at, updated_at";

pub struct UserRepo;

impl UserRepo {
    /// A taken email surfaces as a unique violation on `uq_users_email`.
    pub async fn create(pool: &PgPool, input: &CreateUser) -> Result<User, sqlx::Error> {
        let sql = format!(
            "INSERT INTO users (email, name, password_hash, role_id) \
             VALUES ($1, $2, $3, $4) RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&sql)
            .bind(&input.email)
            .bind(&input.name)
            .bind(&input.password_hash)
            .bind(input.role_id)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<User>, sqlx::Error> {
        let sql = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Exact match; callers lowercase `email` first, as signup does.
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, sqlx::Error> {
        let sql = format!("SELECT {COLUMNS} FROM users WHERE email = $1");
        sqlx::query_as::<_, User>(&sql)
            .bind(email)
            .fetch_optional(pool)
            .await
    }

    /// Newest accounts first. `role = None` lists everyone.
    pub async fn list(pool: &PgPool, role: Option<Role>) -> Result<Vec<User>, sqlx::Error> {
        let sql = format!(
            "SELECT {COLUMNS} FROM users \
             WHERE ($1::BIGINT IS NULL OR role_id = $1) \
             ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, User>(&sql)
            .bind(role.map(Role::id))
            .fetch_all(pool)
            .await
    }

    pub async fn exists_with_role(pool: &PgPool, role: Role) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM users WHERE role_id = $1)")
            .bind(role.id())
            .fetch_one(pool)
            .await
    }

    /// Admin edit; unset fields keep their value. `None` for an unknown id.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateUser,
    ) -> Result<Option<User>, sqlx::Error> {
        let sql = format!(
            "UPDATE users \
             SET name = COALESCE($2, name), \
                 role_id = COALESCE($3, role_id), \
                 email_verified = COALESCE($4, email_verified) \
             WHERE id = $1 RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .bind(&input.name)
            .bind(input.role_id)
            .bind(input.email_verified)
            .fetch_optional(pool)
            .await
    }

    /// Self-service edit; unset fields keep their value.
    pub async fn update_profile(
        pool: &PgPool,
        id: DbId,
        input: &UpdateProfile,
    ) -> Result<Option<User>, sqlx::Error> {
        let sql = format!(
            "UPDATE users \
             SET name = COALESCE($2, name), \
                 bio = COALESCE($3, bio), \
                 profile_image = COALESCE($4, profile_image) \
             WHERE id = $1 RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .bind(&input.name)
            .bind(&input.bio)
            .bind(&input.profile_image)
            .fetch_optional(pool)
            .await
    }
}
