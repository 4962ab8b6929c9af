//! Record sources feeding the tree builder.
//!
//! # Responsibility
//! - Define the seam between the load pipeline and wherever records live.
//! - Map transport failures into one `SourceError` taxonomy.
//!
//! # Invariants
//! - Sources return records ordered by `generation` ascending, stable on ties.
//! - Sources never inspect or repair relational links.

use crate::model::member::MemberRecord;
use crate::repo::member_repo::{MemberRepository, RepoError, SqliteMemberRepository};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

mod json;

pub use json::JsonFileSource;

pub type SourceResult<T> = Result<T, SourceError>;

/// Errors raised while fetching member records.
#[derive(Debug)]
pub enum SourceError {
    /// Reading the source failed.
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Source content is not a valid record list.
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    /// Member store failure.
    Repo(RepoError),
}

impl Display for SourceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to read records from `{}`: {source}", path.display())
            }
            Self::Parse { path, source } => {
                write!(f, "invalid record list in `{}`: {source}", path.display())
            }
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for SourceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse { source, .. } => Some(source),
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<RepoError> for SourceError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Supplies the flat member record list for one load.
pub trait MemberSource {
    /// Fetches every record, ordered by generation ascending.
    fn fetch_members(&self) -> SourceResult<Vec<MemberRecord>>;
}

impl MemberSource for SqliteMemberRepository<'_> {
    fn fetch_members(&self) -> SourceResult<Vec<MemberRecord>> {
        self.list_members().map_err(Into::into)
    }
}

impl MemberSource for Vec<MemberRecord> {
    fn fetch_members(&self) -> SourceResult<Vec<MemberRecord>> {
        let mut members = self.clone();
        sort_by_generation(&mut members);
        Ok(members)
    }
}

pub(crate) fn sort_by_generation(members: &mut [MemberRecord]) {
    members.sort_by_key(|member| member.generation);
}
