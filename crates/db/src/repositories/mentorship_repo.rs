//! Repository for the `mentorships` table.

use launchpad_core::access::MentorshipScope;
use launchpad_core::status::MentorshipStatus;
use launchpad_core::types::{DbId, StatusId};
use sqlx::PgPool;

use crate::models::mentorship::{
    CreateMentorship, Mentorship, MentorshipWithOwner, UpdateMentorship,
};

const COLUMNS: &str = "id, mentor_id, product_id, status_id, notes, created_at, updated_at";

/// Mentorship columns qualified with `m.` plus the owning product's owner.
const JOINED_COLUMNS: &str = "m.id, m.mentor_id, m.product_id, m.status_id, m.notes, \
                               m.created_at, m.updated_at, p.owner_id AS product_owner_id";

/// Owner and mentor filters for a [`MentorshipScope`], as nullable binds.
fn scope_binds(scope: MentorshipScope) -> (Option<DbId>, Option<DbId>) {
    match scope {
        MentorshipScope::All => (None, None),
        MentorshipScope::MentoredBy(id) => (Some(id), None),
        MentorshipScope::ProductsOwnedBy(id) => (None, Some(id)),
    }
}

/// Provides CRUD operations for mentorships.
pub struct MentorshipRepo;

impl MentorshipRepo {
    /// Insert a new `active` mentorship.
    ///
    /// A second mentorship for the same product fails with a unique violation
    /// on `uq_mentorships_product_id`.
    pub async fn create(
        pool: &PgPool,
        input: &CreateMentorship,
    ) -> Result<Mentorship, sqlx::Error> {
        let query = format!(
            "INSERT INTO mentorships (mentor_id, product_id, status_id, notes)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Mentorship>(&query)
            .bind(input.mentor_id)
            .bind(input.product_id)
            .bind(MentorshipStatus::Active.id())
            .bind(&input.notes)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<MentorshipWithOwner>, sqlx::Error> {
        let query = format!(
            "SELECT {JOINED_COLUMNS} FROM mentorships m
             JOIN products p ON p.id = m.product_id
             WHERE m.id = $1"
        );
        sqlx::query_as::<_, MentorshipWithOwner>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// The mentorship attached to a product, if one exists.
    pub async fn find_by_product(
        pool: &PgPool,
        product_id: DbId,
    ) -> Result<Option<Mentorship>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM mentorships WHERE product_id = $1");
        sqlx::query_as::<_, Mentorship>(&query)
            .bind(product_id)
            .fetch_optional(pool)
            .await
    }

    /// Whether `mentor_id` is on any mentorship, terminal ones included.
    pub async fn exists_for_mentor(pool: &PgPool, mentor_id: DbId) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM mentorships WHERE mentor_id = $1)")
            .bind(mentor_id)
            .fetch_one(pool)
            .await
    }

    /// List mentorships visible under `scope`, most recently updated first.
    pub async fn list(
        pool: &PgPool,
        scope: MentorshipScope,
        status: Option<MentorshipStatus>,
    ) -> Result<Vec<Mentorship>, sqlx::Error> {
        let (mentor_id, owner_id) = scope_binds(scope);
        let query = format!(
            "SELECT {JOINED_COLUMNS} FROM mentorships m
             JOIN products p ON p.id = m.product_id
             WHERE ($1::BIGINT IS NULL OR m.mentor_id = $1)
               AND ($2::BIGINT IS NULL OR p.owner_id = $2)
               AND ($3::SMALLINT IS NULL OR m.status_id = $3)
             ORDER BY m.updated_at DESC, m.id DESC"
        );
        let rows = sqlx::query_as::<_, MentorshipWithOwner>(&query)
            .bind(mentor_id)
            .bind(owner_id)
            .bind(status.map(MentorshipStatus::id))
            .fetch_all(pool)
            .await?;
        Ok(rows.into_iter().map(|r| r.mentorship).collect())
    }

    /// Apply `input` while the mentorship's status is still `expected`.
    ///
    /// Returns `None` if the row is gone or its status changed concurrently.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        expected: MentorshipStatus,
        input: &UpdateMentorship,
    ) -> Result<Option<Mentorship>, sqlx::Error> {
        let query = format!(
            "UPDATE mentorships SET
                mentor_id = COALESCE($3, mentor_id),
                status_id = COALESCE($4, status_id),
                notes = COALESCE($5, notes)
             WHERE id = $1 AND status_id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Mentorship>(&query)
            .bind(id)
            .bind(expected.id())
            .bind(input.mentor_id)
            .bind(input.status.map(MentorshipStatus::id))
            .bind(&input.notes)
            .fetch_optional(pool)
            .await
    }

    /// Status of every mentorship in scope, for dashboard counts.
    pub async fn list_statuses(
        pool: &PgPool,
        scope: MentorshipScope,
    ) -> Result<Vec<StatusId>, sqlx::Error> {
        let (mentor_id, owner_id) = scope_binds(scope);
        sqlx::query_scalar(
            "SELECT m.status_id FROM mentorships m
             JOIN products p ON p.id = m.product_id
             WHERE ($1::BIGINT IS NULL OR m.mentor_id = $1)
               AND ($2::BIGINT IS NULL OR p.owner_id = $2)",
        )
        .bind(mentor_id)
        .bind(owner_id)
        .fetch_all(pool)
        .await
    }
}
