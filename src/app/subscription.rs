//! Subscription use cases: reconcile a fan's memberships, list them, build the
//! edit form model.
//!
//! Subscriptions are never edited in place. They appear and disappear only
//! through [`subscription_reconcile`] or by cascade when a fan or club is
//! deleted.

use crate::domain::{reconcile, Reconciliation};
use crate::error::AppError;
use crate::infra::get_connection;
use crate::infra::DbPool;
use rusqlite::{params, Connection, ErrorCode, OptionalExtension};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Storage operations the reconciler needs. Atomicity comes from the caller:
/// run them on a transaction and commit once, or drop it to roll back.
pub trait SubscriptionGateway {
    fn fan_exists(&self, fan_id: i64) -> Result<bool, AppError>;
    fn load_subscriptions(&self, fan_id: i64) -> Result<BTreeSet<String>, AppError>;
    /// The subset of `club_ids` with no matching sport club.
    fn unknown_clubs(&self, club_ids: &BTreeSet<String>) -> Result<Vec<String>, AppError>;
    fn insert_subscription(&self, fan_id: i64, club_id: &str) -> Result<(), AppError>;
    fn delete_subscription(&self, fan_id: i64, club_id: &str) -> Result<(), AppError>;
}

impl SubscriptionGateway for Connection {
    fn fan_exists(&self, fan_id: i64) -> Result<bool, AppError> {
        Ok(self
            .query_row("SELECT 1 FROM Fan WHERE Id = ?1", [fan_id], |_| Ok(()))
            .optional()?
            .is_some())
    }

    fn load_subscriptions(&self, fan_id: i64) -> Result<BTreeSet<String>, AppError> {
        let mut stmt = self.prepare("SELECT SportClubId FROM Subscription WHERE FanId = ?1")?;
        let rows = stmt.query_map([fan_id], |r| r.get::<_, String>(0))?;
        let mut out = BTreeSet::new();
        for r in rows {
            out.insert(r?);
        }
        Ok(out)
    }

    fn unknown_clubs(&self, club_ids: &BTreeSet<String>) -> Result<Vec<String>, AppError> {
        let mut stmt = self.prepare("SELECT 1 FROM SportClub WHERE Id = ?1")?;
        let mut unknown = Vec::new();
        for id in club_ids {
            if !stmt.exists([id])? {
                unknown.push(id.clone());
            }
        }
        Ok(unknown)
    }

    fn insert_subscription(&self, fan_id: i64, club_id: &str) -> Result<(), AppError> {
        self.execute(
            "INSERT INTO Subscription (FanId, SportClubId) VALUES (?1, ?2)",
            params![fan_id, club_id],
        )
        .map_err(|e| match e.sqlite_error_code() {
            // Foreign key backstop for a club removed after the upfront check.
            Some(ErrorCode::ConstraintViolation) => {
                AppError::UnknownClubs(vec![club_id.to_string()])
            }
            _ => AppError::from(e),
        })?;
        Ok(())
    }

    fn delete_subscription(&self, fan_id: i64, club_id: &str) -> Result<(), AppError> {
        self.execute(
            "DELETE FROM Subscription WHERE FanId = ?1 AND SportClubId = ?2",
            params![fan_id, club_id],
        )?;
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionReconcileReq {
    #[serde(skip)]
    pub fan_id: i64,
    #[serde(default)]
    pub subscriptions: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct SubscriptionDto {
    pub sport_club_id: String,
    pub title: String,
}

/// One row of the subscription edit form: every club, flagged if the fan is a member.
#[derive(Debug, Serialize)]
pub struct SubscriptionOptionDto {
    pub sport_club_id: String,
    pub title: String,
    pub is_member: bool,
}

/// Validate the desired set against the gateway and write the delta.
///
/// Nothing is written unless the fan exists and every desired club does.
pub fn apply_reconciliation<G>(
    gateway: &G,
    fan_id: i64,
    desired: &[String],
) -> Result<Reconciliation, AppError>
where
    G: SubscriptionGateway + ?Sized,
{
    if !gateway.fan_exists(fan_id)? {
        return Err(AppError::NotFound(format!("fan {}", fan_id)));
    }

    let desired: BTreeSet<String> = desired
        .iter()
        .map(|id| id.trim())
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .collect();

    let current = gateway.load_subscriptions(fan_id)?;
    let delta = reconcile(&current, desired);

    // Only newly added ids can be dangling; current ones are held by the foreign key.
    let unknown = gateway.unknown_clubs(&delta.to_add)?;
    if !unknown.is_empty() {
        return Err(AppError::UnknownClubs(unknown));
    }

    for club_id in &delta.to_add {
        gateway.insert_subscription(fan_id, club_id)?;
    }
    for club_id in &delta.to_remove {
        gateway.delete_subscription(fan_id, club_id)?;
    }
    Ok(delta)
}

/// Replace a fan's memberships with exactly the submitted set, in one transaction.
pub fn subscription_reconcile(
    pool: &DbPool,
    req: SubscriptionReconcileReq,
) -> Result<Reconciliation, AppError> {
    let conn = get_connection(pool);
    let tx = conn.unchecked_transaction()?;

    let delta = apply_reconciliation(&*tx, req.fan_id, &req.subscriptions)?;

    tx.commit()?;
    if delta.is_empty() {
        log::debug!("fan {} subscriptions unchanged", req.fan_id);
    } else {
        log::info!(
            "fan {} subscriptions: +{} -{}",
            req.fan_id,
            delta.to_add.len(),
            delta.to_remove.len()
        );
    }
    Ok(delta)
}

/// Clubs the fan belongs to, ordered by title.
pub fn fan_subscriptions(pool: &DbPool, fan_id: i64) -> Result<Vec<SubscriptionDto>, AppError> {
    let conn = get_connection(pool);
    if !conn.fan_exists(fan_id)? {
        return Err(AppError::NotFound(format!("fan {}", fan_id)));
    }
    let mut stmt = conn.prepare(
        "SELECT c.Id, c.Title FROM Subscription s \
         JOIN SportClub c ON c.Id = s.SportClubId \
         WHERE s.FanId = ?1 \
         ORDER BY c.Title COLLATE NOCASE, c.Id",
    )?;
    let rows = stmt.query_map([fan_id], |r| {
        Ok(SubscriptionDto {
            sport_club_id: r.get(0)?,
            title: r.get(1)?,
        })
    })?;
    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

/// Every club with the fan's membership flag; members first, then by title.
pub fn fan_subscription_options(
    pool: &DbPool,
    fan_id: i64,
) -> Result<Vec<SubscriptionOptionDto>, AppError> {
    let conn = get_connection(pool);
    if !conn.fan_exists(fan_id)? {
        return Err(AppError::NotFound(format!("fan {}", fan_id)));
    }
    let mut stmt = conn.prepare(
        "SELECT c.Id, c.Title, s.FanId IS NOT NULL AS IsMember \
         FROM SportClub c \
         LEFT JOIN Subscription s ON s.SportClubId = c.Id AND s.FanId = ?1 \
         ORDER BY IsMember DESC, c.Title COLLATE NOCASE, c.Id",
    )?;
    let rows = stmt.query_map([fan_id], |r| {
        Ok(SubscriptionOptionDto {
            sport_club_id: r.get(0)?,
            title: r.get(1)?,
            is_member: r.get(2)?,
        })
    })?;
    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}
