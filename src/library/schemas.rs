use crate::error::ServiceError;
use crate::library::{Book, UserBook, UserBookChanges, DEFAULT_PROGRESS_PAGE, DEFAULT_READING_STATUS};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const TITLE_MAX_LENGTH: usize = 255;
pub const AUTHOR_MAX_LENGTH: usize = 255;
pub const GENRE_MAX_LENGTH: usize = 100;
pub const READING_STATUS_MAX_LENGTH: usize = 50;

pub const DEFAULT_SKIP: i64 = 0;
pub const DEFAULT_LIMIT: i64 = 100;

/// 도서 등록/수정 요청으로 수정 시에도 세 필드를 모두 덮어쓴다.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BookCreate {
    pub title: String,
    pub author: String,
    #[serde(default)]
    pub genre: Option<String>,
}

impl BookCreate {
    pub fn validate(&self) -> Result<(), ServiceError> {
        require_text("title", &self.title, TITLE_MAX_LENGTH)?;
        require_text("author", &self.author, AUTHOR_MAX_LENGTH)?;
        if let Some(genre) = &self.genre {
            limit_length("genre", genre, GENRE_MAX_LENGTH)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookResponse {
    pub book_id: Uuid,
    pub title: String,
    pub author: String,
    pub genre: Option<String>,
}

impl From<Book> for BookResponse {
    fn from(book: Book) -> Self {
        Self {
            book_id: book.id,
            title: book.title,
            author: book.author,
            genre: book.genre,
        }
    }
}

/// 서재에 도서를 담을 때의 초기 상태
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UserBookCreate {
    #[serde(default = "default_reading_status")]
    pub reading_status: String,
    #[serde(default = "default_progress_page")]
    pub progress_page: i32,
}

impl Default for UserBookCreate {
    fn default() -> Self {
        Self {
            reading_status: default_reading_status(),
            progress_page: default_progress_page(),
        }
    }
}

impl UserBookCreate {
    pub fn validate(&self) -> Result<(), ServiceError> {
        limit_length("reading_status", &self.reading_status, READING_STATUS_MAX_LENGTH)
    }
}

/// 서재 항목 부분 수정 요청
///
/// 필드가 없는 경우(`None`)와 `null`로 입력된 경우(`Some(None)`)를 구분한다.
/// 두 컬럼 모두 `NOT NULL`이므로 `null`은 검증 에러로 처리한다.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct UserBookUpdate {
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub reading_status: Option<Option<String>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub progress_page: Option<Option<i32>>,
}

impl UserBookUpdate {
    pub fn into_changes(self) -> Result<UserBookChanges, ServiceError> {
        let reading_status = match self.reading_status {
            None => None,
            Some(None) => return Err(ServiceError::validation("reading_status may not be null")),
            Some(Some(status)) => {
                limit_length("reading_status", &status, READING_STATUS_MAX_LENGTH)?;
                Some(status)
            }
        };
        let progress_page = match self.progress_page {
            None => None,
            Some(None) => return Err(ServiceError::validation("progress_page may not be null")),
            Some(Some(page)) => Some(page),
        };

        Ok(UserBookChanges { reading_status, progress_page })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserBookResponse {
    pub user_book_id: Uuid,
    pub user_id: Uuid,
    pub book_id: Uuid,
    pub reading_status: String,
    pub progress_page: i32,
}

impl From<UserBook> for UserBookResponse {
    fn from(entry: UserBook) -> Self {
        Self {
            user_book_id: entry.id,
            user_id: entry.user_id,
            book_id: entry.book_id,
            reading_status: entry.reading_status,
            progress_page: entry.progress_page,
        }
    }
}

/// 도서 목록 조회 쿼리 파라미터
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct ListQuery {
    #[serde(default = "default_skip")]
    pub skip: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self { skip: DEFAULT_SKIP, limit: DEFAULT_LIMIT }
    }
}

impl ListQuery {
    pub fn validate(&self) -> Result<(), ServiceError> {
        if self.skip < 0 {
            return Err(ServiceError::validation("skip must be greater than or equal to 0"));
        }
        if self.limit < 0 {
            return Err(ServiceError::validation("limit must be greater than or equal to 0"));
        }
        Ok(())
    }
}

fn default_reading_status() -> String {
    DEFAULT_READING_STATUS.to_owned()
}

fn default_progress_page() -> i32 {
    DEFAULT_PROGRESS_PAGE
}

fn default_skip() -> i64 {
    DEFAULT_SKIP
}

fn default_limit() -> i64 {
    DEFAULT_LIMIT
}

fn require_text(field: &str, value: &str, max: usize) -> Result<(), ServiceError> {
    if value.trim().is_empty() {
        return Err(ServiceError::validation(format!("{} must not be empty", field)));
    }
    limit_length(field, value, max)
}

fn limit_length(field: &str, value: &str, max: usize) -> Result<(), ServiceError> {
    if value.chars().count() > max {
        return Err(ServiceError::validation(format!("{} must be at most {} characters", field, max)));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn book_create_accepts_valid_data() {
        let book: BookCreate = serde_json::from_str(
            r#"{"title": "Clean Code", "author": "Robert C. Martin", "genre": "programming"}"#
        ).unwrap();

        assert!(book.validate().is_ok());
        assert_eq!(book.title, "Clean Code");
        assert_eq!(book.author, "Robert C. Martin");
        assert_eq!(book.genre.as_deref(), Some("programming"));
    }

    #[test]
    fn book_create_genre_is_optional() {
        let book: BookCreate = serde_json::from_str(r#"{"title": "Dune", "author": "Frank Herbert"}"#).unwrap();
        assert_eq!(book.genre, None);
    }

    #[test]
    fn book_create_requires_title() {
        let result = serde_json::from_str::<BookCreate>(r#"{"author": "Frank Herbert"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn book_create_rejects_blank_and_oversized_fields() {
        let blank = BookCreate { title: "  ".into(), author: "A".into(), genre: None };
        assert!(matches!(blank.validate(), Err(ServiceError::Validation(_))));

        let long = BookCreate { title: "t".repeat(256), author: "A".into(), genre: None };
        assert!(matches!(long.validate(), Err(ServiceError::Validation(_))));

        let edge = BookCreate { title: "가".repeat(255), author: "A".into(), genre: Some("g".repeat(100)) };
        assert!(edge.validate().is_ok());

        let long_genre = BookCreate { title: "T".into(), author: "A".into(), genre: Some("g".repeat(101)) };
        assert!(matches!(long_genre.validate(), Err(ServiceError::Validation(_))));
    }

    #[test]
    fn user_book_create_defaults_from_empty_object() {
        let create: UserBookCreate = serde_json::from_str("{}").unwrap();
        assert_eq!(create, UserBookCreate::default());
        assert_eq!(create.reading_status, "want_to_read");
        assert_eq!(create.progress_page, 0);
    }

    #[test]
    fn user_book_update_keeps_absent_fields_unset() {
        let update: UserBookUpdate = serde_json::from_str(r#"{"reading_status": "reading"}"#).unwrap();
        let changes = update.into_changes().unwrap();

        assert_eq!(changes.reading_status.as_deref(), Some("reading"));
        assert_eq!(changes.progress_page, None);
    }

    #[test]
    fn user_book_update_applies_zero_values() {
        let update: UserBookUpdate = serde_json::from_str(r#"{"progress_page": 0}"#).unwrap();
        let changes = update.into_changes().unwrap();

        assert_eq!(changes.progress_page, Some(0));
        assert_eq!(changes.reading_status, None);
    }

    #[test]
    fn user_book_update_rejects_explicit_null() {
        let update: UserBookUpdate = serde_json::from_str(r#"{"progress_page": null}"#).unwrap();
        assert!(matches!(update.into_changes(), Err(ServiceError::Validation(_))));
    }

    #[test]
    fn list_query_rejects_negative_window() {
        assert!(ListQuery { skip: -1, limit: 10 }.validate().is_err());
        assert!(ListQuery { skip: 0, limit: -5 }.validate().is_err());
        assert!(ListQuery::default().validate().is_ok());
    }
}
