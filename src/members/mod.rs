//! Member lifecycle: create-or-revive, partial update, soft delete and reads.
//!
//! An identifier is unique among active members. Soft-deleted rows keep their
//! identifier and are revived in place when a create request reuses it.
//!
//! The revival runs in a second transaction after the failed insert has been
//! rolled back, so another caller can act in between. The revive statement only
//! touches rows that are still soft-deleted; losing that race yields `Conflict`.

use std::future::Future;
use std::time::Duration;

use chrono::Utc;

use crate::db::{InsertOutcome, MemberStore, MemberTx};
use crate::errors::AppError;
use crate::models::{CreateMemberRequest, Member, MemberFields, ReadScope, UpdateMemberRequest};

/// Reconciles member writes against the soft-delete state held in storage.
#[derive(Clone)]
pub struct MemberService {
    store: MemberStore,
    timeout: Option<Duration>,
}

impl MemberService {
    pub fn new(store: MemberStore) -> Self {
        Self {
            store,
            timeout: None,
        }
    }

    /// Bound every operation by `timeout`. `None` waits indefinitely.
    ///
    /// An expired operation is abandoned mid-flight: its open transaction is
    /// dropped, which rolls it back and returns the connection to the pool.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Create a member, reviving a soft-deleted row with the same identifier.
    pub async fn create(&self, request: &CreateMemberRequest) -> Result<Member, AppError> {
        self.bounded("create", self.create_or_revive(request)).await
    }

    /// Apply a partial update. Returns `None` when no row has this identifier.
    pub async fn update(
        &self,
        id: &str,
        request: &UpdateMemberRequest,
    ) -> Result<Option<Member>, AppError> {
        self.bounded("update", self.apply_update(id, request)).await
    }

    /// Soft-delete a member. Unknown identifiers are ignored.
    pub async fn remove(&self, id: &str) -> Result<(), AppError> {
        self.bounded("remove", async {
            let now = Utc::now().to_rfc3339();
            if self.store.mark_deleted(id, &now).await? {
                tracing::info!(member_id = id, "Member soft-deleted");
            } else {
                tracing::debug!(member_id = id, "Remove ignored, no such member");
            }
            Ok::<(), AppError>(())
        })
        .await
    }

    pub async fn find_by_id(&self, id: &str, scope: ReadScope) -> Result<Option<Member>, AppError> {
        self.bounded("find_by_id", async {
            self.store.find(id, scope).await.map_err(AppError::from)
        })
        .await
    }

    pub async fn find_all(&self, scope: ReadScope) -> Result<Vec<Member>, AppError> {
        self.bounded("find_all", async {
            self.store.find_all(scope).await.map_err(AppError::from)
        })
        .await
    }

    async fn bounded<T>(
        &self,
        operation: &'static str,
        fut: impl Future<Output = Result<T, AppError>>,
    ) -> Result<T, AppError> {
        let Some(limit) = self.timeout else {
            return fut.await;
        };

        match tokio::time::timeout(limit, fut).await {
            Ok(result) => result,
            Err(_) => {
                tracing::warn!(operation, ?limit, "Member operation timed out");
                Err(AppError::Timeout(format!(
                    "Member {} did not finish within {}ms",
                    operation,
                    limit.as_millis()
                )))
            }
        }
    }

    async fn create_or_revive(&self, request: &CreateMemberRequest) -> Result<Member, AppError> {
        let fields = MemberFields::from(request);
        let now = Utc::now().to_rfc3339();

        let mut tx = self.store.begin().await?;
        let outcome = insert_new(&mut tx, request, &fields, &now).await;
        match outcome {
            Ok(InsertOutcome::Inserted) => {
                tx.commit().await?;
                tracing::info!(member_id = %request.id, "Member created");
                Ok(Member {
                    id: request.id.clone(),
                    name: fields.name,
                    position: fields.position,
                    join_date: fields.join_date,
                    note: fields.note,
                    employee_number: fields.employee_number,
                    skills: request.skills.clone(),
                    deleted: false,
                    updated_at: now,
                })
            }
            Ok(InsertOutcome::DuplicateId) => {
                tx.rollback().await?;
                self.reconcile_existing(request, &fields, &now).await
            }
            Err(e) => {
                rollback_after_failure(tx).await;
                Err(e.into())
            }
        }
    }

    /// The identifier is taken: revive it if soft-deleted, otherwise conflict.
    async fn reconcile_existing(
        &self,
        request: &CreateMemberRequest,
        fields: &MemberFields,
        now: &str,
    ) -> Result<Member, AppError> {
        let existing = self
            .store
            .find(&request.id, ReadScope::IncludeDeleted)
            .await?
            .ok_or_else(|| {
                AppError::Internal(format!(
                    "Member {} reported as duplicate but could not be read",
                    request.id
                ))
            })?;

        if !existing.deleted {
            tracing::warn!(member_id = %request.id, "Create rejected, member is active");
            return Err(AppError::Conflict {
                id: request.id.clone(),
            });
        }

        let mut tx = self.store.begin().await?;
        let outcome = revive_existing(&mut tx, request, fields, now).await;
        match outcome {
            Ok(Some(member)) => {
                tx.commit().await?;
                tracing::info!(member_id = %request.id, "Soft-deleted member revived");
                Ok(member)
            }
            Ok(None) => {
                tx.rollback().await?;
                tracing::warn!(member_id = %request.id, "Member was revived concurrently");
                Err(AppError::Conflict {
                    id: request.id.clone(),
                })
            }
            Err(e) => {
                rollback_after_failure(tx).await;
                Err(e.into())
            }
        }
    }

    async fn apply_update(
        &self,
        id: &str,
        request: &UpdateMemberRequest,
    ) -> Result<Option<Member>, AppError> {
        let now = Utc::now().to_rfc3339();

        let mut tx = self.store.begin().await?;
        let outcome = update_existing(&mut tx, id, request, &now).await;
        match outcome {
            Ok(Some(member)) => {
                tx.commit().await?;
                Ok(Some(member))
            }
            Ok(None) => {
                tx.rollback().await?;
                Ok(None)
            }
            Err(e) => {
                rollback_after_failure(tx).await;
                Err(e.into())
            }
        }
    }
}

async fn insert_new(
    tx: &mut MemberTx,
    request: &CreateMemberRequest,
    fields: &MemberFields,
    now: &str,
) -> Result<InsertOutcome, sqlx::Error> {
    let outcome = tx.insert_member(&request.id, fields, now).await?;
    if outcome == InsertOutcome::Inserted {
        tx.insert_skills(&request.id, &request.skills).await?;
    }
    Ok(outcome)
}

/// `None` when the row is no longer soft-deleted.
async fn revive_existing(
    tx: &mut MemberTx,
    request: &CreateMemberRequest,
    fields: &MemberFields,
    now: &str,
) -> Result<Option<Member>, sqlx::Error> {
    if !tx.revive(&request.id, fields, now).await? {
        return Ok(None);
    }
    tx.clear_skills(&request.id).await?;
    tx.insert_skills(&request.id, &request.skills).await?;
    tx.fetch_member(&request.id).await
}

/// `None` when no row has this identifier.
async fn update_existing(
    tx: &mut MemberTx,
    id: &str,
    request: &UpdateMemberRequest,
    now: &str,
) -> Result<Option<Member>, sqlx::Error> {
    let Some(current) = tx.fetch_member(id).await? else {
        return Ok(None);
    };

    if request.has_fields() {
        tx.update_fields(id, &MemberFields::merged(&current, request), now)
            .await?;
    }

    if let Some(skills) = &request.skills {
        tx.clear_skills(id).await?;
        tx.insert_skills(id, skills).await?;
    }

    tx.fetch_member(id).await
}

/// Roll back after a failed statement. The original failure is what the caller
/// sees, so a rollback error is only logged.
async fn rollback_after_failure(tx: MemberTx) {
    if let Err(e) = tx.rollback().await {
        tracing::error!("Rollback failed: {:?}", e);
    }
}
