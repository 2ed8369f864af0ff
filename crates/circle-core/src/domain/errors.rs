//! Errors - エラー型と分類
//!
//! - `StoreError`: RelationshipStore / ContentStore が返すストレージ層のエラー
//! - `CircleError`: 呼び出し側（presentation 層）に返すエラー
//!
//! どのエラーも内部でリトライしません。リトライしてよいのは
//! `ErrorKind::Transient`（ストレージ障害）のときだけです。

use thiserror::Error;

use super::ids::StoryId;

/// ErrorKind は実行エラーの運用分類
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// 恒久的なエラー（リトライ無意味）
    Permanent,
    /// 一時的なエラー（ストレージ側の障害、呼び出し側がリトライ可能）
    Transient,
}

/// Failures reported by the storage ports.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("follow edge endpoints must differ")]
    SelfEdge,

    #[error("follow edge already exists")]
    DuplicateEdge,

    #[error("follow request endpoints must differ")]
    SelfRequest,

    #[error("a pending request or an edge already exists for this pair")]
    DuplicateRequest,

    #[error("no pending follow request for this pair")]
    RequestNotFound,

    #[error("story id already stored")]
    DuplicateStory,

    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Caller-facing error taxonomy.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CircleError {
    #[error("cannot follow yourself")]
    SelfEdge,

    #[error("cannot send a follow request to yourself")]
    SelfRequest,

    #[error("already following")]
    DuplicateEdge,

    #[error("follow request already pending or already following")]
    DuplicateRequest,

    #[error("no pending follow request")]
    NoSuchRequest,

    #[error("not authorized to perform this transition")]
    NotAuthorized,

    #[error("no authenticated user")]
    Unauthenticated,

    #[error("story not found: {0}")]
    NotFound(StoryId),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("storage error: {0}")]
    Storage(String),
}

impl CircleError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CircleError::Storage(_) => ErrorKind::Transient,
            _ => ErrorKind::Permanent,
        }
    }

    /// HTTP-like status code for surfacing the error over a request/response boundary.
    ///
    /// Each variant maps to a distinct (code, variant) pair so the presentation
    /// layer can react differently to e.g. `DuplicateRequest` and `NotAuthorized`.
    pub fn status_code(&self) -> u16 {
        match self {
            CircleError::SelfEdge | CircleError::SelfRequest => 400,
            CircleError::Unauthenticated => 401,
            CircleError::NotAuthorized => 403,
            CircleError::NoSuchRequest | CircleError::NotFound(_) => 404,
            CircleError::DuplicateEdge | CircleError::DuplicateRequest => 409,
            CircleError::InvalidInput(_) => 422,
            CircleError::Storage(_) => 503,
        }
    }
}

impl From<StoreError> for CircleError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::SelfEdge => CircleError::SelfEdge,
            StoreError::DuplicateEdge => CircleError::DuplicateEdge,
            StoreError::SelfRequest => CircleError::SelfRequest,
            StoreError::DuplicateRequest => CircleError::DuplicateRequest,
            StoreError::RequestNotFound => CircleError::NoSuchRequest,
            // ULID の衝突は実質起こらないので、ストレージ側の異常として扱う
            StoreError::DuplicateStory => CircleError::Storage(err.to_string()),
            StoreError::Unavailable(msg) => CircleError::Storage(msg),
        }
    }
}
