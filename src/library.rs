pub mod catalog;
pub mod repo;
pub mod schemas;
pub mod shelf;

use crate::error::ServiceError;
use thiserror::Error;
use uuid::Uuid;

/// 새로 등록된 서재 항목의 기본 독서 상태
pub const DEFAULT_READING_STATUS: &str = "want_to_read";

/// 새로 등록된 서재 항목의 기본 진행 페이지
pub const DEFAULT_PROGRESS_PAGE: i32 = 0;

/// 저장소 계층에서 발생하는 에러
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    /// 커넥션 풀에서 커넥션을 얻지 못함
    #[error("connect error: {0}")]
    ConnectError(String),

    /// 쿼리 실행 실패
    #[error("sql execute error: {0}")]
    SqlExecuteError(String),

    /// 유니크 제약 조건 위반
    #[error("unique violation: {0}")]
    UniqueViolation(String),

    /// 외래키 제약 조건 위반
    #[error("foreign key violation: {0}")]
    ForeignKeyViolation(String),
}

impl From<RepositoryError> for ServiceError {
    fn from(err: RepositoryError) -> Self {
        ServiceError::Internal(err.to_string())
    }
}

/// 카탈로그에 등록된 도서
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Book {
    id: Uuid,
    title: String,
    author: String,
    genre: Option<String>,
}

impl Book {
    pub fn new(id: Uuid, title: String, author: String, genre: Option<String>) -> Self {
        Self { id, title, author, genre }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn genre(&self) -> Option<&str> {
        self.genre.as_deref()
    }
}

/// 사용자 서재에 담긴 도서 한 권
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserBook {
    id: Uuid,
    user_id: Uuid,
    book_id: Uuid,
    reading_status: String,
    progress_page: i32,
}

impl UserBook {
    pub fn new(id: Uuid, user_id: Uuid, book_id: Uuid, reading_status: String, progress_page: i32) -> Self {
        Self { id, user_id, book_id, reading_status, progress_page }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn user_id(&self) -> Uuid {
        self.user_id
    }

    pub fn book_id(&self) -> Uuid {
        self.book_id
    }

    pub fn reading_status(&self) -> &str {
        &self.reading_status
    }

    pub fn progress_page(&self) -> i32 {
        self.progress_page
    }

    /// 입력된 필드만 반영 한다.
    pub fn apply(&mut self, changes: &UserBookChanges) {
        if let Some(status) = &changes.reading_status {
            self.reading_status = status.clone();
        }
        if let Some(page) = changes.progress_page {
            self.progress_page = page;
        }
    }
}

/// 서재 항목의 부분 수정 내용으로 `None`인 필드는 수정하지 않는다.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserBookChanges {
    pub reading_status: Option<String>,
    pub progress_page: Option<i32>,
}

impl UserBookChanges {
    pub fn is_empty(&self) -> bool {
        self.reading_status.is_none() && self.progress_page.is_none()
    }
}

/// 도서 카탈로그 저장소
pub trait BookRepository {

    /// 저장소에 정의된 순서로 `skip`개를 건너뛰고 최대 `limit`개의 도서를 가져온다.
    fn find_books(&self, skip: i64, limit: i64) -> Result<Vec<Book>, RepositoryError>;

    fn find_book(&self, id: Uuid) -> Result<Option<Book>, RepositoryError>;

    fn save_book(&self, book: &Book) -> Result<Book, RepositoryError>;

    /// 제목, 저자, 장르를 모두 덮어쓴다. 도서가 없으면 `None`을 반환한다.
    fn update_book(&self, book: &Book) -> Result<Option<Book>, RepositoryError>;

    /// 삭제된 행의 수를 반환한다. 서재에서 참조 중인 도서는 [`RepositoryError::ForeignKeyViolation`]
    fn delete_book(&self, id: Uuid) -> Result<usize, RepositoryError>;
}

/// 사용자 서재 저장소
pub trait UserBookRepository {

    fn find_by_user(&self, user_id: Uuid) -> Result<Vec<UserBook>, RepositoryError>;

    fn find_entry(&self, user_id: Uuid, book_id: Uuid) -> Result<Option<UserBook>, RepositoryError>;

    /// 같은 (사용자, 도서) 쌍이 이미 있으면 [`RepositoryError::UniqueViolation`],
    /// 카탈로그에 없는 도서면 [`RepositoryError::ForeignKeyViolation`]
    fn save_entry(&self, entry: &UserBook) -> Result<UserBook, RepositoryError>;

    fn update_entry(&self, user_id: Uuid, book_id: Uuid, changes: &UserBookChanges) -> Result<Option<UserBook>, RepositoryError>;

    fn delete_entry(&self, user_id: Uuid, book_id: Uuid) -> Result<usize, RepositoryError>;
}

/// 문자열을 식별자로 변환하며 실패 시 저장소에 접근하지 않고 바로 에러를 반환한다.
pub(crate) fn parse_id(raw: &str, message: &str) -> Result<Uuid, ServiceError> {
    Uuid::parse_str(raw).map_err(|_| ServiceError::invalid_argument(message))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn apply_overwrites_only_present_fields() {
        let mut entry = UserBook::new(Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4(), "reading".into(), 42);

        entry.apply(&UserBookChanges { reading_status: None, progress_page: Some(0) });

        assert_eq!(entry.reading_status(), "reading");
        assert_eq!(entry.progress_page(), 0);
    }

    #[test]
    fn parse_id_rejects_garbage() {
        let err = parse_id("not-a-uuid", "Invalid book ID format").unwrap_err();
        assert_eq!(err, ServiceError::invalid_argument("Invalid book ID format"));
    }
}
