use crate::library::{Book, BookRepository, RepositoryError, UserBook, UserBookChanges, UserBookRepository};
use std::sync::{Mutex, MutexGuard};
use uuid::Uuid;

/// 프로세스 메모리에 데이터를 보관하는 저장소
///
/// PostgreSQL 스키마와 같은 제약 조건을 따른다.
/// - (user_id, book_id) 쌍은 유일하다.
/// - 서재 항목은 카탈로그에 존재하는 도서만 참조할 수 있다.
/// - 서재에서 참조 중인 도서는 삭제할 수 없다.
#[derive(Debug, Default)]
pub struct MemoryRepository {
    state: Mutex<State>,
}

#[derive(Debug, Default)]
struct State {
    books: Vec<Book>,
    entries: Vec<UserBook>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, State>, RepositoryError> {
        self.state.lock()
            .map_err(|e| RepositoryError::ConnectError(e.to_string()))
    }
}

impl BookRepository for MemoryRepository {
    fn find_books(&self, skip: i64, limit: i64) -> Result<Vec<Book>, RepositoryError> {
        let state = self.lock()?;
        Ok(state.books.iter()
            .skip(skip.max(0) as usize)
            .take(limit.max(0) as usize)
            .cloned()
            .collect())
    }

    fn find_book(&self, id: Uuid) -> Result<Option<Book>, RepositoryError> {
        let state = self.lock()?;
        Ok(state.books.iter().find(|b| b.id == id).cloned())
    }

    fn save_book(&self, book: &Book) -> Result<Book, RepositoryError> {
        let mut state = self.lock()?;
        if state.books.iter().any(|b| b.id == book.id) {
            return Err(RepositoryError::UniqueViolation(format!("duplicate book_id {}", book.id)));
        }
        state.books.push(book.clone());
        Ok(book.clone())
    }

    fn update_book(&self, book: &Book) -> Result<Option<Book>, RepositoryError> {
        let mut state = self.lock()?;
        Ok(state.books.iter_mut()
            .find(|b| b.id == book.id)
            .map(|stored| {
                *stored = book.clone();
                stored.clone()
            }))
    }

    fn delete_book(&self, id: Uuid) -> Result<usize, RepositoryError> {
        let mut state = self.lock()?;
        if state.entries.iter().any(|e| e.book_id == id) {
            return Err(RepositoryError::ForeignKeyViolation(format!("book {} is referenced by user_books", id)));
        }
        let before = state.books.len();
        state.books.retain(|b| b.id != id);
        Ok(before - state.books.len())
    }
}

impl UserBookRepository for MemoryRepository {
    fn find_by_user(&self, user_id: Uuid) -> Result<Vec<UserBook>, RepositoryError> {
        let state = self.lock()?;
        Ok(state.entries.iter()
            .filter(|e| e.user_id == user_id)
            .cloned()
            .collect())
    }

    fn find_entry(&self, user_id: Uuid, book_id: Uuid) -> Result<Option<UserBook>, RepositoryError> {
        let state = self.lock()?;
        Ok(state.entries.iter()
            .find(|e| e.user_id == user_id && e.book_id == book_id)
            .cloned())
    }

    fn save_entry(&self, entry: &UserBook) -> Result<UserBook, RepositoryError> {
        let mut state = self.lock()?;
        if state.entries.iter().any(|e| e.user_id == entry.user_id && e.book_id == entry.book_id) {
            return Err(RepositoryError::UniqueViolation(format!("duplicate entry ({}, {})", entry.user_id, entry.book_id)));
        }
        if !state.books.iter().any(|b| b.id == entry.book_id) {
            return Err(RepositoryError::ForeignKeyViolation(format!("book {} does not exist", entry.book_id)));
        }
        state.entries.push(entry.clone());
        Ok(entry.clone())
    }

    fn update_entry(&self, user_id: Uuid, book_id: Uuid, changes: &UserBookChanges) -> Result<Option<UserBook>, RepositoryError> {
        let mut state = self.lock()?;
        Ok(state.entries.iter_mut()
            .find(|e| e.user_id == user_id && e.book_id == book_id)
            .map(|stored| {
                stored.apply(changes);
                stored.clone()
            }))
    }

    fn delete_entry(&self, user_id: Uuid, book_id: Uuid) -> Result<usize, RepositoryError> {
        let mut state = self.lock()?;
        let before = state.entries.len();
        state.entries.retain(|e| !(e.user_id == user_id && e.book_id == book_id));
        Ok(before - state.entries.len())
    }
}
