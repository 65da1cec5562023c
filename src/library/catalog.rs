use crate::error::ServiceError;
use crate::library::schemas::BookCreate;
use crate::library::{parse_id, Book, BookRepository, RepositoryError};
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// 한 번에 조회할 수 있는 최대 도서 수로 이보다 큰 `limit`은 이 값으로 줄어든다.
pub const MAX_LIST_LIMIT: i64 = 1000;

const INVALID_BOOK_ID: &str = "Invalid book ID format";
const BOOK_NOT_FOUND: &str = "Book not found";
const BOOK_REFERENCED: &str = "Book is still referenced by user libraries";

/// 도서 카탈로그 서비스
pub struct CatalogService<R> {
    repository: Arc<R>,
}

impl<R> CatalogService<R> {
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }
}

impl<R: BookRepository> CatalogService<R> {

    pub fn create(&self, request: BookCreate) -> Result<Book, ServiceError> {
        let book = Book::new(Uuid::new_v4(), request.title, request.author, request.genre);
        let saved = self.repository.save_book(&book)?;

        info!("도서 등록 (book_id: {})", saved.id());
        Ok(saved)
    }

    pub fn list(&self, skip: i64, limit: i64) -> Result<Vec<Book>, ServiceError> {
        if limit > MAX_LIST_LIMIT {
            debug!("limit {}이 최대값을 넘어 {}로 조정 됩니다.", limit, MAX_LIST_LIMIT);
        }
        let books = self.repository.find_books(skip, limit.min(MAX_LIST_LIMIT))?;
        Ok(books)
    }

    pub fn get(&self, book_id: &str) -> Result<Book, ServiceError> {
        let id = parse_id(book_id, INVALID_BOOK_ID)?;

        self.repository.find_book(id)?
            .ok_or_else(|| ServiceError::not_found(BOOK_NOT_FOUND))
    }

    pub fn update(&self, book_id: &str, request: BookCreate) -> Result<Book, ServiceError> {
        let id = parse_id(book_id, INVALID_BOOK_ID)?;

        let book = Book::new(id, request.title, request.author, request.genre);
        let updated = self.repository.update_book(&book)?
            .ok_or_else(|| ServiceError::not_found(BOOK_NOT_FOUND))?;

        info!("도서 수정 (book_id: {})", id);
        Ok(updated)
    }

    pub fn delete(&self, book_id: &str) -> Result<(), ServiceError> {
        let id = parse_id(book_id, INVALID_BOOK_ID)?;

        match self.repository.delete_book(id) {
            Ok(0) => Err(ServiceError::not_found(BOOK_NOT_FOUND)),
            Ok(_) => {
                info!("도서 삭제 (book_id: {})", id);
                Ok(())
            }
            Err(RepositoryError::ForeignKeyViolation(message)) => {
                warn!("서재에서 참조 중인 도서는 삭제할 수 없습니다. (book_id: {}, {})", id, message);
                Err(ServiceError::conflict(BOOK_REFERENCED))
            }
            Err(err) => Err(err.into()),
        }
    }
}
