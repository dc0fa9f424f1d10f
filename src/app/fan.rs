//! Fan use cases.

use crate::error::AppError;
use crate::infra::get_connection;
use crate::infra::DbPool;
use chrono::NaiveDate;
use rusqlite::{params, OptionalExtension, Row};
use serde::{Deserialize, Serialize};

const NAME_MAX: usize = 50;
const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FanCreateReq {
    pub last_name: String,
    pub first_name: String,
    pub birth_date: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FanUpdateReq {
    #[serde(skip)]
    pub id: i64,
    pub last_name: Option<String>,
    pub first_name: Option<String>,
    pub birth_date: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct FanDto {
    pub id: i64,
    pub last_name: String,
    pub first_name: String,
    pub birth_date: String,
    pub full_name: String,
}

#[derive(Debug, Serialize)]
pub struct FanListItemDto {
    #[serde(flatten)]
    pub fan: FanDto,
    pub subscriptions: Vec<String>,
}

pub(crate) fn full_name(last_name: &str, first_name: &str) -> String {
    format!("{}, {}", last_name, first_name)
}

fn row_to_fan(row: &Row<'_>) -> rusqlite::Result<FanDto> {
    let last_name: String = row.get(1)?;
    let first_name: String = row.get(2)?;
    Ok(FanDto {
        id: row.get(0)?,
        full_name: full_name(&last_name, &first_name),
        last_name,
        first_name,
        birth_date: row.get(3)?,
    })
}

fn validate_name(field: &'static str, value: &str) -> Result<String, AppError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AppError::validation(field, "is required"));
    }
    if value.chars().count() > NAME_MAX {
        return Err(AppError::validation(
            field,
            format!("must be at most {} characters", NAME_MAX),
        ));
    }
    Ok(value.to_string())
}

fn validate_birth_date(value: &str) -> Result<String, AppError> {
    let date = NaiveDate::parse_from_str(value.trim(), DATE_FORMAT)
        .map_err(|_| AppError::validation("birth_date", "must be a date in YYYY-MM-DD format"))?;
    Ok(date.format(DATE_FORMAT).to_string())
}

pub fn fan_create(pool: &DbPool, req: FanCreateReq) -> Result<FanDto, AppError> {
    let last_name = validate_name("last_name", &req.last_name)?;
    let first_name = validate_name("first_name", &req.first_name)?;
    let birth_date = validate_birth_date(&req.birth_date)?;

    let conn = get_connection(pool);
    conn.execute(
        "INSERT INTO Fan (LastName, FirstName, BirthDate) VALUES (?1, ?2, ?3)",
        params![&last_name, &first_name, &birth_date],
    )?;
    let id = conn.last_insert_rowid();
    log::info!("created fan {}", id);

    Ok(FanDto {
        id,
        full_name: full_name(&last_name, &first_name),
        last_name,
        first_name,
        birth_date,
    })
}

pub fn fan_get(pool: &DbPool, id: i64) -> Result<FanDto, AppError> {
    let conn = get_connection(pool);
    conn.query_row(
        "SELECT Id, LastName, FirstName, BirthDate FROM Fan WHERE Id = ?1",
        [id],
        row_to_fan,
    )
    .optional()?
    .ok_or_else(|| AppError::NotFound(format!("fan {}", id)))
}

/// All fans with the ids of the clubs they subscribe to.
pub fn fan_list(pool: &DbPool) -> Result<Vec<FanListItemDto>, AppError> {
    let conn = get_connection(pool);
    let mut stmt = conn.prepare(
        "SELECT Id, LastName, FirstName, BirthDate FROM Fan \
         ORDER BY LastName COLLATE NOCASE, FirstName COLLATE NOCASE, Id",
    )?;
    let fans = stmt
        .query_map([], row_to_fan)?
        .collect::<Result<Vec<_>, _>>()?;

    let mut subs = conn.prepare(
        "SELECT SportClubId FROM Subscription WHERE FanId = ?1 ORDER BY SportClubId",
    )?;
    let mut out = Vec::with_capacity(fans.len());
    for fan in fans {
        let subscriptions = subs
            .query_map([fan.id], |r| r.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        out.push(FanListItemDto { fan, subscriptions });
    }
    Ok(out)
}

pub fn fan_update(pool: &DbPool, req: FanUpdateReq) -> Result<FanDto, AppError> {
    {
        let conn = get_connection(pool);

        let (last_name, first_name, birth_date): (String, String, String) = conn
            .query_row(
                "SELECT LastName, FirstName, BirthDate FROM Fan WHERE Id = ?1",
                [req.id],
                |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?)),
            )
            .optional()?
            .ok_or_else(|| AppError::NotFound(format!("fan {}", req.id)))?;

        let last_name = match req.last_name.as_deref() {
            Some(v) => validate_name("last_name", v)?,
            None => last_name,
        };
        let first_name = match req.first_name.as_deref() {
            Some(v) => validate_name("first_name", v)?,
            None => first_name,
        };
        let birth_date = match req.birth_date.as_deref() {
            Some(v) => validate_birth_date(v)?,
            None => birth_date,
        };

        let changed = conn.execute(
            "UPDATE Fan SET LastName = ?1, FirstName = ?2, BirthDate = ?3 WHERE Id = ?4",
            params![&last_name, &first_name, &birth_date, req.id],
        )?;
        if changed == 0 {
            return Err(AppError::NotFound(format!("fan {}", req.id)));
        }
    } // release conn before calling fan_get to avoid deadlock

    fan_get(pool, req.id)
}

/// Delete a fan; its subscriptions go with it.
pub fn fan_delete(pool: &DbPool, id: i64) -> Result<(), AppError> {
    let conn = get_connection(pool);
    let changed = conn.execute("DELETE FROM Fan WHERE Id = ?1", [id])?;
    if changed == 0 {
        return Err(AppError::NotFound(format!("fan {}", id)));
    }
    log::info!("deleted fan {}", id);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_name_is_last_comma_first() {
        assert_eq!(full_name("Doe", "Jane"), "Doe, Jane");
    }

    #[test]
    fn name_length_counts_chars() {
        let ok = "é".repeat(NAME_MAX);
        assert!(validate_name("last_name", &ok).is_ok());
        let too_long = "é".repeat(NAME_MAX + 1);
        assert!(validate_name("last_name", &too_long).is_err());
    }

    #[test]
    fn birth_date_normalized() {
        assert_eq!(validate_birth_date(" 1990-01-05 ").unwrap(), "1990-01-05");
        assert!(validate_birth_date("05/01/1990").is_err());
        assert!(validate_birth_date("1990-02-30").is_err());
    }
}
