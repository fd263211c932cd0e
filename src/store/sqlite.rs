use std::path::Path;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension, Row, params};

use super::Store;
use super::schema::SCHEMA;
use crate::error::{Error, Result};
use crate::types::*;

pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    pub fn new<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        let conn = Connection::open(db_path)?;

        conn.pragma_update(None, "foreign_keys", "ON")?;
        conn.pragma_update(None, "journal_mode", "WAL")?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> std::sync::MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(|e| e.into_inner())
    }
}

fn parse_datetime(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .or_else(|_| {
            // Handle SQLite's default datetime format: "YYYY-MM-DD HH:MM:SS"
            chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").map(|ndt| ndt.and_utc())
        })
        .unwrap_or_else(|e| {
            tracing::error!("Invalid datetime in database: '{}' - {}", s, e);
            Utc::now()
        })
}

fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339()
}

const SCHEDULE_COLUMNS: &str =
    "schedule_id, schedule_name, memo, created_by, created_at, updated_at";

fn schedule_from_row(row: &Row<'_>) -> rusqlite::Result<Schedule> {
    Ok(Schedule {
        schedule_id: row.get(0)?,
        schedule_name: row.get(1)?,
        memo: row.get(2)?,
        created_by: row.get(3)?,
        created_at: parse_datetime(&row.get::<_, String>(4)?),
        updated_at: parse_datetime(&row.get::<_, String>(5)?),
    })
}

fn candidate_from_row(row: &Row<'_>) -> rusqlite::Result<Candidate> {
    Ok(Candidate {
        candidate_id: row.get(0)?,
        candidate_name: row.get(1)?,
        schedule_id: row.get(2)?,
        display_order: row.get(3)?,
    })
}

fn availability_from_row(row: &Row<'_>) -> rusqlite::Result<Availability> {
    let ordinal: i64 = row.get(3)?;
    let availability = AvailabilityLevel::from_ordinal(ordinal).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            3,
            rusqlite::types::Type::Integer,
            format!("availability out of range: {ordinal}").into(),
        )
    })?;

    Ok(Availability {
        schedule_id: row.get(0)?,
        user_id: row.get(1)?,
        candidate_id: row.get(2)?,
        availability,
    })
}

fn query_user(conn: &Connection, user_id: i64) -> rusqlite::Result<Option<User>> {
    conn.query_row(
        "SELECT user_id, username FROM users WHERE user_id = ?1",
        params![user_id],
        |row| {
            Ok(User {
                user_id: row.get(0)?,
                username: row.get(1)?,
            })
        },
    )
    .optional()
}

fn query_schedule(conn: &Connection, schedule_id: &str) -> rusqlite::Result<Option<Schedule>> {
    conn.query_row(
        &format!("SELECT {SCHEDULE_COLUMNS} FROM schedules WHERE schedule_id = ?1"),
        params![schedule_id],
        schedule_from_row,
    )
    .optional()
}

fn query_candidates(conn: &Connection, schedule_id: &str) -> rusqlite::Result<Vec<Candidate>> {
    let mut stmt = conn.prepare(
        "SELECT candidate_id, candidate_name, schedule_id, display_order
         FROM candidates WHERE schedule_id = ?1 ORDER BY display_order, candidate_id",
    )?;
    let rows = stmt.query_map(params![schedule_id], candidate_from_row)?;
    rows.collect()
}

fn query_availabilities(
    conn: &Connection,
    schedule_id: &str,
) -> rusqlite::Result<Vec<Availability>> {
    let mut stmt = conn.prepare(
        "SELECT schedule_id, user_id, candidate_id, availability
         FROM availabilities WHERE schedule_id = ?1 ORDER BY user_id, candidate_id",
    )?;
    let rows = stmt.query_map(params![schedule_id], availability_from_row)?;
    rows.collect()
}

fn query_comments(conn: &Connection, schedule_id: &str) -> rusqlite::Result<Vec<Comment>> {
    let mut stmt = conn.prepare(
        "SELECT schedule_id, user_id, comment
         FROM comments WHERE schedule_id = ?1 ORDER BY user_id",
    )?;
    let rows = stmt.query_map(params![schedule_id], |row| {
        Ok(Comment {
            schedule_id: row.get(0)?,
            user_id: row.get(1)?,
            comment: row.get(2)?,
        })
    })?;
    rows.collect()
}

fn query_participants(conn: &Connection, schedule_id: &str) -> rusqlite::Result<Vec<User>> {
    let mut stmt = conn.prepare(
        "SELECT p.user_id, COALESCE(u.username, '')
         FROM (
             SELECT user_id FROM availabilities WHERE schedule_id = ?1
             UNION
             SELECT user_id FROM comments WHERE schedule_id = ?1
         ) p
         LEFT JOIN users u ON u.user_id = p.user_id
         ORDER BY p.user_id",
    )?;
    let rows = stmt.query_map(params![schedule_id], |row| {
        Ok(User {
            user_id: row.get(0)?,
            username: row.get(1)?,
        })
    })?;
    rows.collect()
}

impl Store for SqliteStore {
    fn initialize(&self) -> Result<()> {
        self.conn().execute_batch(SCHEMA)?;
        Ok(())
    }

    // User operations

    fn upsert_user(&self, user: &User) -> Result<()> {
        self.conn().execute(
            "INSERT INTO users (user_id, username) VALUES (?1, ?2)
             ON CONFLICT (user_id) DO UPDATE SET username = excluded.username",
            params![user.user_id, user.username],
        )?;
        Ok(())
    }

    fn get_user(&self, user_id: i64) -> Result<Option<User>> {
        query_user(&self.conn(), user_id).map_err(Error::from)
    }

    // Schedule operations

    fn create_schedule(
        &self,
        schedule: &Schedule,
        candidate_names: &[String],
    ) -> Result<Vec<Candidate>> {
        let mut conn = self.conn();
        let tx = conn.transaction()?;

        tx.execute(
            "INSERT INTO schedules (schedule_id, schedule_name, memo, created_by, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                schedule.schedule_id,
                schedule.schedule_name,
                schedule.memo,
                schedule.created_by,
                format_datetime(&schedule.created_at),
                format_datetime(&schedule.updated_at),
            ],
        )?;

        let mut candidates = Vec::with_capacity(candidate_names.len());
        for (order, name) in (0_i64..).zip(candidate_names) {
            tx.execute(
                "INSERT INTO candidates (candidate_name, schedule_id, display_order)
                 VALUES (?1, ?2, ?3)",
                params![name, schedule.schedule_id, order],
            )?;
            candidates.push(Candidate {
                candidate_id: tx.last_insert_rowid(),
                candidate_name: name.clone(),
                schedule_id: schedule.schedule_id.clone(),
                display_order: order,
            });
        }

        tx.commit()?;
        Ok(candidates)
    }

    fn get_schedule(&self, schedule_id: &str) -> Result<Option<Schedule>> {
        query_schedule(&self.conn(), schedule_id).map_err(Error::from)
    }

    fn list_schedules_by_creator(&self, user_id: i64) -> Result<Vec<Schedule>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(&format!(
            "SELECT {SCHEDULE_COLUMNS} FROM schedules
             WHERE created_by = ?1 ORDER BY updated_at DESC, schedule_id"
        ))?;

        let rows = stmt.query_map(params![user_id], schedule_from_row)?;

        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }

    fn load_schedule_aggregate(&self, schedule_id: &str) -> Result<Option<ScheduleAggregate>> {
        let mut conn = self.conn();
        let tx = conn.transaction()?;

        let Some(schedule) = query_schedule(&tx, schedule_id)? else {
            return Ok(None);
        };

        let aggregate = ScheduleAggregate {
            creator: query_user(&tx, schedule.created_by)?,
            candidates: query_candidates(&tx, schedule_id)?,
            availabilities: query_availabilities(&tx, schedule_id)?,
            comments: query_comments(&tx, schedule_id)?,
            participants: query_participants(&tx, schedule_id)?,
            schedule,
        };

        tx.commit()?;
        Ok(Some(aggregate))
    }

    fn update_schedule(
        &self,
        schedule: &Schedule,
        append_names: &[String],
    ) -> Result<Vec<Candidate>> {
        let mut conn = self.conn();
        let tx = conn.transaction()?;

        let rows = tx.execute(
            "UPDATE schedules SET schedule_name = ?1, memo = ?2, updated_at = ?3
             WHERE schedule_id = ?4",
            params![
                schedule.schedule_name,
                schedule.memo,
                format_datetime(&schedule.updated_at),
                schedule.schedule_id,
            ],
        )?;

        if rows == 0 {
            return Err(Error::NotFound);
        }

        let mut next_order: i64 = tx.query_row(
            "SELECT COALESCE(MAX(display_order), -1) + 1 FROM candidates WHERE schedule_id = ?1",
            params![schedule.schedule_id],
            |row| row.get(0),
        )?;

        let mut appended = Vec::new();
        for name in append_names {
            // Re-checked inside the transaction so concurrent edits cannot
            // append the same name twice.
            let exists: bool = tx.query_row(
                "SELECT EXISTS (
                     SELECT 1 FROM candidates WHERE schedule_id = ?1 AND candidate_name = ?2
                 )",
                params![schedule.schedule_id, name],
                |row| row.get(0),
            )?;
            if exists {
                continue;
            }

            tx.execute(
                "INSERT INTO candidates (candidate_name, schedule_id, display_order)
                 VALUES (?1, ?2, ?3)",
                params![name, schedule.schedule_id, next_order],
            )?;
            appended.push(Candidate {
                candidate_id: tx.last_insert_rowid(),
                candidate_name: name.clone(),
                schedule_id: schedule.schedule_id.clone(),
                display_order: next_order,
            });
            next_order += 1;
        }

        tx.commit()?;
        Ok(appended)
    }

    fn delete_schedule_aggregate(
        &self,
        schedule_id: &str,
        steps: &[AggregatePart],
    ) -> Result<DeletionReport> {
        let mut conn = self.conn();
        let tx = conn.transaction()?;

        let mut report = DeletionReport::default();
        for part in steps {
            let removed = tx.execute(
                &format!("DELETE FROM {} WHERE schedule_id = ?1", part.table()),
                params![schedule_id],
            )?;
            report.removed.push((*part, removed));
        }

        tx.commit()?;
        Ok(report)
    }

    // Candidate operations

    fn get_candidate(&self, candidate_id: i64) -> Result<Option<Candidate>> {
        let conn = self.conn();
        conn.query_row(
            "SELECT candidate_id, candidate_name, schedule_id, display_order
             FROM candidates WHERE candidate_id = ?1",
            params![candidate_id],
            candidate_from_row,
        )
        .optional()
        .map_err(Error::from)
    }

    fn list_candidates(&self, schedule_id: &str) -> Result<Vec<Candidate>> {
        query_candidates(&self.conn(), schedule_id).map_err(Error::from)
    }

    // Availability operations

    fn upsert_availability(&self, availability: &Availability) -> Result<()> {
        self.conn()
            .execute(
                "INSERT INTO availabilities (schedule_id, user_id, candidate_id, availability)
                 VALUES (?1, ?2, ?3, ?4)
                 ON CONFLICT (schedule_id, user_id, candidate_id) DO UPDATE SET
                    availability = excluded.availability",
                params![
                    availability.schedule_id,
                    availability.user_id,
                    availability.candidate_id,
                    availability.availability.ordinal(),
                ],
            )
            .map_err(Error::from_write)?;
        Ok(())
    }

    fn list_availabilities(&self, schedule_id: &str) -> Result<Vec<Availability>> {
        query_availabilities(&self.conn(), schedule_id).map_err(Error::from)
    }

    // Comment operations

    fn upsert_comment(&self, comment: &Comment) -> Result<()> {
        self.conn()
            .execute(
                "INSERT INTO comments (schedule_id, user_id, comment) VALUES (?1, ?2, ?3)
                 ON CONFLICT (schedule_id, user_id) DO UPDATE SET comment = excluded.comment",
                params![comment.schedule_id, comment.user_id, comment.comment],
            )
            .map_err(Error::from_write)?;
        Ok(())
    }

    fn list_comments(&self, schedule_id: &str) -> Result<Vec<Comment>> {
        query_comments(&self.conn(), schedule_id).map_err(Error::from)
    }

    fn list_schedule_participants(&self, schedule_id: &str) -> Result<Vec<User>> {
        query_participants(&self.conn(), schedule_id).map_err(Error::from)
    }
}
