//! Sport club use cases.

use crate::app::fan::full_name;
use crate::domain::{Fee, FeeInput};
use crate::error::AppError;
use crate::infra::get_connection;
use crate::infra::DbPool;
use rusqlite::{params, ErrorCode, OptionalExtension, Row};
use serde::{Deserialize, Serialize};

const ID_MAX: usize = 450;
const TITLE_MIN: usize = 3;
const TITLE_MAX: usize = 50;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClubCreateReq {
    pub id: String,
    pub title: String,
    pub fee: FeeInput,
}

/// The registration number is not part of an update; it never changes.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClubUpdateReq {
    #[serde(skip)]
    pub id: String,
    pub title: Option<String>,
    pub fee: Option<FeeInput>,
}

#[derive(Debug, Serialize)]
pub struct ClubDto {
    pub id: String,
    pub title: String,
    pub fee: Fee,
}

#[derive(Debug, Serialize)]
pub struct ClubMemberDto {
    pub fan_id: i64,
    pub full_name: String,
}

fn row_to_club(row: &Row<'_>) -> rusqlite::Result<ClubDto> {
    Ok(ClubDto {
        id: row.get(0)?,
        title: row.get(1)?,
        fee: Fee::from_units(row.get(2)?),
    })
}

fn validate_id(value: &str) -> Result<String, AppError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AppError::validation("id", "is required"));
    }
    if value.chars().count() > ID_MAX {
        return Err(AppError::validation(
            "id",
            format!("must be at most {} characters", ID_MAX),
        ));
    }
    Ok(value.to_string())
}

fn validate_title(value: &str) -> Result<String, AppError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AppError::validation("title", "is required"));
    }
    let len = value.chars().count();
    if !(TITLE_MIN..=TITLE_MAX).contains(&len) {
        return Err(AppError::validation(
            "title",
            format!("must be between {} and {} characters", TITLE_MIN, TITLE_MAX),
        ));
    }
    Ok(value.to_string())
}

fn validate_fee(value: &FeeInput) -> Result<Fee, AppError> {
    value
        .parse()
        .map_err(|e| AppError::validation("fee", e.to_string()))
}

pub fn club_create(pool: &DbPool, req: ClubCreateReq) -> Result<ClubDto, AppError> {
    let id = validate_id(&req.id)?;
    let title = validate_title(&req.title)?;
    let fee = validate_fee(&req.fee)?;

    let conn = get_connection(pool);
    conn.execute(
        "INSERT INTO SportClub (Id, Title, Fee) VALUES (?1, ?2, ?3)",
        params![&id, &title, fee.units()],
    )
    .map_err(|e| match e.sqlite_error_code() {
        Some(ErrorCode::ConstraintViolation) => {
            AppError::Conflict(format!("sport club {} already exists", id))
        }
        _ => AppError::from(e),
    })?;
    log::info!("created sport club {}", id);

    Ok(ClubDto { id, title, fee })
}

pub fn club_get(pool: &DbPool, id: &str) -> Result<ClubDto, AppError> {
    let conn = get_connection(pool);
    conn.query_row(
        "SELECT Id, Title, Fee FROM SportClub WHERE Id = ?1",
        [id],
        row_to_club,
    )
    .optional()?
    .ok_or_else(|| AppError::NotFound(format!("sport club {}", id)))
}

pub fn club_list(pool: &DbPool) -> Result<Vec<ClubDto>, AppError> {
    let conn = get_connection(pool);
    let mut stmt =
        conn.prepare("SELECT Id, Title, Fee FROM SportClub ORDER BY Title COLLATE NOCASE, Id")?;
    let rows = stmt.query_map([], row_to_club)?;
    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

pub fn club_update(pool: &DbPool, req: ClubUpdateReq) -> Result<ClubDto, AppError> {
    {
        let conn = get_connection(pool);

        let (title, fee): (String, i64) = conn
            .query_row(
                "SELECT Title, Fee FROM SportClub WHERE Id = ?1",
                [&req.id],
                |r| Ok((r.get(0)?, r.get(1)?)),
            )
            .optional()?
            .ok_or_else(|| AppError::NotFound(format!("sport club {}", req.id)))?;

        let title = match req.title.as_deref() {
            Some(v) => validate_title(v)?,
            None => title,
        };
        let fee = match req.fee.as_ref() {
            Some(v) => validate_fee(v)?,
            None => Fee::from_units(fee),
        };

        let changed = conn.execute(
            "UPDATE SportClub SET Title = ?1, Fee = ?2 WHERE Id = ?3",
            params![&title, fee.units(), &req.id],
        )?;
        if changed == 0 {
            return Err(AppError::NotFound(format!("sport club {}", req.id)));
        }
    } // release conn before calling club_get to avoid deadlock

    club_get(pool, &req.id)
}

/// Delete a club; subscriptions to it go with it.
pub fn club_delete(pool: &DbPool, id: &str) -> Result<(), AppError> {
    let conn = get_connection(pool);
    let changed = conn.execute("DELETE FROM SportClub WHERE Id = ?1", [id])?;
    if changed == 0 {
        return Err(AppError::NotFound(format!("sport club {}", id)));
    }
    log::info!("deleted sport club {}", id);
    Ok(())
}

/// Fans subscribed to a club, by name.
pub fn club_members(pool: &DbPool, club_id: &str) -> Result<Vec<ClubMemberDto>, AppError> {
    let conn = get_connection(pool);
    let exists = conn
        .query_row("SELECT 1 FROM SportClub WHERE Id = ?1", [club_id], |_| Ok(()))
        .optional()?
        .is_some();
    if !exists {
        return Err(AppError::NotFound(format!("sport club {}", club_id)));
    }

    let mut stmt = conn.prepare(
        "SELECT f.Id, f.LastName, f.FirstName \
         FROM Subscription s \
         JOIN Fan f ON f.Id = s.FanId \
         WHERE s.SportClubId = ?1 \
         ORDER BY f.LastName COLLATE NOCASE, f.FirstName COLLATE NOCASE, f.Id",
    )?;
    let rows = stmt.query_map([club_id], |r| {
        let last_name: String = r.get(1)?;
        let first_name: String = r.get(2)?;
        Ok(ClubMemberDto {
            fan_id: r.get(0)?,
            full_name: full_name(&last_name, &first_name),
        })
    })?;
    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_bounds() {
        assert!(validate_title("ab").is_err());
        assert!(validate_title("abc").is_ok());
        assert!(validate_title(&"x".repeat(TITLE_MAX)).is_ok());
        assert!(validate_title(&"x".repeat(TITLE_MAX + 1)).is_err());
        assert!(validate_title("   ").is_err());
    }

    #[test]
    fn id_trimmed_and_bounded() {
        assert_eq!(validate_id("  REG-1 ").unwrap(), "REG-1");
        assert!(validate_id("").is_err());
        assert!(validate_id(&"r".repeat(ID_MAX + 1)).is_err());
    }

    #[test]
    fn fee_errors_name_field() {
        let err = validate_fee(&FeeInput::from("12,50")).unwrap_err();
        assert_eq!(err.to_string(), "Validation failed: fee is not a valid amount");
    }
}
