//! Member repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide read and import APIs over the `members` table.
//! - Keep SQL details inside the persistence boundary.
//!
//! # Invariants
//! - Write paths call `MemberRecord::validate()` before SQL mutations.
//! - Listing is deterministic: `generation ASC, id ASC`.
//! - Relational links are stored as-is; dangling ids are not rejected.

use crate::db::migrations::{current_user_version, latest_version};
use crate::db::DbError;
use crate::model::member::{MemberId, MemberRecord, MemberValidationError};
use rusqlite::{params, Connection, ErrorCode, OptionalExtension, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

const MEMBER_SELECT_SQL: &str = "SELECT
    id,
    name,
    birth_year,
    notes,
    phone_number,
    address,
    generation,
    parent_id,
    spouse_id
FROM members";

pub type RepoResult<T> = Result<T, RepoError>;

/// Errors from member repository operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(MemberValidationError),
    Db(DbError),
    /// A record with the same id already exists.
    DuplicateId(MemberId),
    /// Connection schema is not at the expected migrated version.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    /// Persisted row cannot be converted to a valid record.
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::DuplicateId(id) => write!(f, "member id already exists: {id}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "member repository requires schema version {expected_version}, got {actual_version}"
            ),
            Self::InvalidData(message) => write!(f, "invalid persisted member data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::DuplicateId(_) => None,
            Self::UninitializedConnection { .. } => None,
            Self::InvalidData(_) => None,
        }
    }
}

impl From<MemberValidationError> for RepoError {
    fn from(value: MemberValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Repository interface for the member store.
pub trait MemberRepository {
    /// Inserts one record.
    fn insert_member(&self, member: &MemberRecord) -> RepoResult<()>;
    /// Replaces the whole store content with `members` atomically.
    fn replace_all(&self, members: &[MemberRecord]) -> RepoResult<usize>;
    /// Loads one record by id.
    fn get_member(&self, id: MemberId) -> RepoResult<Option<MemberRecord>>;
    /// Lists every record ordered by generation, then id.
    fn list_members(&self) -> RepoResult<Vec<MemberRecord>>;
    /// Counts stored records.
    fn count_members(&self) -> RepoResult<usize>;
}

/// SQLite-backed member repository.
pub struct SqliteMemberRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteMemberRepository<'conn> {
    /// Creates repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        let expected_version = latest_version();
        let actual_version = current_user_version(conn)?;
        if actual_version != expected_version {
            return Err(RepoError::UninitializedConnection {
                expected_version,
                actual_version,
            });
        }
        Ok(Self { conn })
    }
}

impl MemberRepository for SqliteMemberRepository<'_> {
    fn insert_member(&self, member: &MemberRecord) -> RepoResult<()> {
        insert_row(self.conn, member)
    }

    fn replace_all(&self, members: &[MemberRecord]) -> RepoResult<usize> {
        for member in members {
            member.validate()?;
        }

        let tx = self.conn.unchecked_transaction()?;
        tx.execute("DELETE FROM members;", [])?;
        for member in members {
            insert_row(&tx, member)?;
        }
        tx.commit()?;
        Ok(members.len())
    }

    fn get_member(&self, id: MemberId) -> RepoResult<Option<MemberRecord>> {
        let sql = format!("{MEMBER_SELECT_SQL} WHERE id = ?1;");
        let row = self
            .conn
            .query_row(sql.as_str(), [id], parse_member_row)
            .optional()?;
        row.transpose()
    }

    fn list_members(&self) -> RepoResult<Vec<MemberRecord>> {
        let sql = format!("{MEMBER_SELECT_SQL} ORDER BY generation ASC, id ASC;");
        let mut stmt = self.conn.prepare(sql.as_str())?;
        let mut rows = stmt.query([])?;

        let mut members = Vec::new();
        while let Some(row) = rows.next()? {
            members.push(parse_member_row(row)??);
        }
        Ok(members)
    }

    fn count_members(&self) -> RepoResult<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM members;", [], |row| row.get(0))?;
        usize::try_from(count)
            .map_err(|_| RepoError::InvalidData(format!("negative member count {count}")))
    }
}

fn insert_row(conn: &Connection, member: &MemberRecord) -> RepoResult<()> {
    member.validate()?;

    let result = conn.execute(
        "INSERT INTO members (
            id,
            name,
            birth_year,
            notes,
            phone_number,
            address,
            generation,
            parent_id,
            spouse_id
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9);",
        params![
            member.id,
            member.name.as_str(),
            member.birth_year.as_deref(),
            member.notes.as_deref(),
            member.phone_number.as_deref(),
            member.address.as_deref(),
            member.generation,
            member.parent_id,
            member.spouse_id,
        ],
    );

    match result {
        Ok(_) => Ok(()),
        Err(rusqlite::Error::SqliteFailure(err, _)) if err.code == ErrorCode::ConstraintViolation => {
            Err(RepoError::DuplicateId(member.id))
        }
        Err(err) => Err(err.into()),
    }
}

/// Parses one row; the outer result carries SQLite errors, the inner one
/// carries data conversion errors.
fn parse_member_row(row: &Row<'_>) -> rusqlite::Result<RepoResult<MemberRecord>> {
    let id: MemberId = row.get(0)?;
    let generation: i64 = row.get(6)?;
    let generation = match u32::try_from(generation) {
        Ok(value) => value,
        Err(_) => {
            return Ok(Err(RepoError::InvalidData(format!(
                "member {id} has invalid generation {generation}"
            ))))
        }
    };

    Ok(Ok(MemberRecord {
        id,
        name: row.get(1)?,
        birth_year: row.get(2)?,
        notes: row.get(3)?,
        phone_number: row.get(4)?,
        address: row.get(5)?,
        generation,
        parent_id: row.get(7)?,
        spouse_id: row.get(8)?,
    }))
}

#[cfg(test)]
mod tests {
    use super::{MemberRepository, RepoError, SqliteMemberRepository};
    use crate::db::open_db_in_memory;
    use crate::model::member::MemberRecord;

    #[test]
    fn try_new_rejects_unmigrated_connection() {
        let conn = rusqlite::Connection::open_in_memory().unwrap();
        let err = SqliteMemberRepository::try_new(&conn)
            .err()
            .expect("unmigrated connection must be rejected");
        assert!(matches!(
            err,
            RepoError::UninitializedConnection {
                actual_version: 0,
                ..
            }
        ));
    }

    #[test]
    fn insert_rejects_duplicate_id() {
        let conn = open_db_in_memory().unwrap();
        let repo = SqliteMemberRepository::try_new(&conn).unwrap();

        repo.insert_member(&MemberRecord::new(1, "Root", 0)).unwrap();
        let err = repo
            .insert_member(&MemberRecord::new(1, "Again", 0))
            .unwrap_err();
        assert!(matches!(err, RepoError::DuplicateId(1)));
    }

    #[test]
    fn replace_all_rolls_back_when_any_record_is_invalid() {
        let conn = open_db_in_memory().unwrap();
        let repo = SqliteMemberRepository::try_new(&conn).unwrap();
        repo.insert_member(&MemberRecord::new(1, "Root", 0)).unwrap();

        let err = repo
            .replace_all(&[
                MemberRecord::new(2, "Fine", 0),
                MemberRecord::new(3, " ", 1),
            ])
            .unwrap_err();
        assert!(matches!(err, RepoError::Validation(_)));
        assert_eq!(repo.count_members().unwrap(), 1);
    }
}
