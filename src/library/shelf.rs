use crate::error::ServiceError;
use crate::library::schemas::UserBookCreate;
use crate::library::{parse_id, BookRepository, RepositoryError, UserBook, UserBookChanges, UserBookRepository};
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

const INVALID_ID: &str = "Invalid ID format";
const INVALID_USER_ID: &str = "Invalid user ID format";
const ALREADY_IN_LIBRARY: &str = "Book already in library";
const NOT_IN_CATALOG: &str = "Book not found in catalog";
const NOT_IN_LIBRARY: &str = "Book not found in user library";

/// 사용자 서재 서비스
///
/// (사용자, 도서) 쌍의 유일성은 저장소의 유니크 제약이 보장하며
/// 저장 전 조회는 더 명확한 에러 메시지를 위한 사전 확인이다.
pub struct ShelfService<R> {
    repository: Arc<R>,
}

impl<R> ShelfService<R> {
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }
}

impl<R: BookRepository + UserBookRepository> ShelfService<R> {

    pub fn add(&self, user_id: &str, book_id: &str, request: UserBookCreate) -> Result<UserBook, ServiceError> {
        let (user_id, book_id) = parse_pair(user_id, book_id)?;

        if self.repository.find_entry(user_id, book_id)?.is_some() {
            return Err(ServiceError::conflict(ALREADY_IN_LIBRARY));
        }
        if self.repository.find_book(book_id)?.is_none() {
            return Err(ServiceError::not_found(NOT_IN_CATALOG));
        }

        let entry = UserBook::new(Uuid::new_v4(), user_id, book_id, request.reading_status, request.progress_page);
        let saved = self.repository.save_entry(&entry)
            .map_err(|err| match err {
                RepositoryError::UniqueViolation(message) => {
                    warn!("동시에 같은 도서가 서재에 추가 되었습니다. (user_id: {}, book_id: {}, {})", user_id, book_id, message);
                    ServiceError::conflict(ALREADY_IN_LIBRARY)
                }
                RepositoryError::ForeignKeyViolation(message) => {
                    warn!("서재에 추가하는 중 도서가 삭제 되었습니다. (book_id: {}, {})", book_id, message);
                    ServiceError::not_found(NOT_IN_CATALOG)
                }
                e => e.into(),
            })?;

        info!("서재에 도서 추가 (user_id: {}, book_id: {})", user_id, book_id);
        Ok(saved)
    }

    pub fn list(&self, user_id: &str) -> Result<Vec<UserBook>, ServiceError> {
        let user_id = parse_id(user_id, INVALID_USER_ID)?;
        let entries = self.repository.find_by_user(user_id)?;
        Ok(entries)
    }

    pub fn update(&self, user_id: &str, book_id: &str, changes: UserBookChanges) -> Result<UserBook, ServiceError> {
        let (user_id, book_id) = parse_pair(user_id, book_id)?;

        let updated = self.repository.update_entry(user_id, book_id, &changes)?
            .ok_or_else(|| ServiceError::not_found(NOT_IN_LIBRARY))?;

        info!("서재 도서 수정 (user_id: {}, book_id: {}, changes: {:?})", user_id, book_id, changes);
        Ok(updated)
    }

    pub fn remove(&self, user_id: &str, book_id: &str) -> Result<(), ServiceError> {
        let (user_id, book_id) = parse_pair(user_id, book_id)?;

        if self.repository.delete_entry(user_id, book_id)? == 0 {
            return Err(ServiceError::not_found(NOT_IN_LIBRARY));
        }

        info!("서재에서 도서 삭제 (user_id: {}, book_id: {})", user_id, book_id);
        Ok(())
    }
}

fn parse_pair(user_id: &str, book_id: &str) -> Result<(Uuid, Uuid), ServiceError> {
    Ok((parse_id(user_id, INVALID_ID)?, parse_id(book_id, INVALID_ID)?))
}
