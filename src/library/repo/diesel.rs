use crate::library::{Book, BookRepository, RepositoryError, UserBook, UserBookChanges, UserBookRepository};
use diesel::connection::SimpleConnection;
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, PooledConnection};
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use diesel::{debug_query, PgConnection};
use r2d2::Pool;
use tracing::{debug, enabled, info};
use uuid::Uuid;

mod schema;

use schema::library_service::{books, user_books};

pub type DbPool = Pool<ConnectionManager<PgConnection>>;
type DbConnection = PooledConnection<ConnectionManager<PgConnection>>;

/// `library_service` 스키마와 테이블을 생성하고 이전 버전의 테이블에 없는 제약 조건을 추가한다.
/// 여러번 실행해도 안전하다.
const SCHEMA_SQL: &str = include_str!("../../../migrations/2025-01-01-000000_create_library/up.sql");

#[derive(Queryable, Selectable, Debug)]
#[diesel(table_name = books)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct BookEntity {
    pub book_id: Uuid,
    pub title: String,
    pub author: String,
    pub genre: Option<String>,
}

impl BookEntity {
    pub fn to_domain(self) -> Book {
        Book::new(self.book_id, self.title, self.author, self.genre)
    }
}

#[derive(Insertable)]
#[diesel(table_name = books)]
pub struct NewBook<'a> {
    pub book_id: Uuid,
    pub title: &'a str,
    pub author: &'a str,
    pub genre: Option<&'a str>,
}

impl<'a> NewBook<'a> {
    pub fn from(book: &'a Book) -> Self {
        Self {
            book_id: book.id(),
            title: book.title(),
            author: book.author(),
            genre: book.genre(),
        }
    }
}

/// 전체 수정 폼으로 장르가 없으면 `NULL`로 덮어쓴다.
#[derive(AsChangeset)]
#[diesel(table_name = books)]
#[diesel(treat_none_as_null = true)]
pub struct BookForm<'a> {
    pub title: &'a str,
    pub author: &'a str,
    pub genre: Option<&'a str>,
}

impl<'a> BookForm<'a> {
    pub fn from(book: &'a Book) -> Self {
        Self {
            title: book.title(),
            author: book.author(),
            genre: book.genre(),
        }
    }
}

#[derive(Queryable, Selectable, Debug)]
#[diesel(table_name = user_books)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UserBookEntity {
    pub user_book_id: Uuid,
    pub user_id: Uuid,
    pub book_id: Uuid,
    pub reading_status: String,
    pub progress_page: i32,
}

impl UserBookEntity {
    pub fn to_domain(self) -> UserBook {
        UserBook::new(self.user_book_id, self.user_id, self.book_id, self.reading_status, self.progress_page)
    }
}

#[derive(Insertable)]
#[diesel(table_name = user_books)]
pub struct NewUserBook<'a> {
    pub user_book_id: Uuid,
    pub user_id: Uuid,
    pub book_id: Uuid,
    pub reading_status: &'a str,
    pub progress_page: i32,
}

impl<'a> NewUserBook<'a> {
    pub fn from(entry: &'a UserBook) -> Self {
        Self {
            user_book_id: entry.id(),
            user_id: entry.user_id(),
            book_id: entry.book_id(),
            reading_status: entry.reading_status(),
            progress_page: entry.progress_page(),
        }
    }
}

/// 부분 수정 폼으로 `None`인 컬럼은 SET 절에서 빠진다.
#[derive(AsChangeset)]
#[diesel(table_name = user_books)]
pub struct UserBookForm<'a> {
    pub reading_status: Option<&'a str>,
    pub progress_page: Option<i32>,
}

impl<'a> UserBookForm<'a> {
    pub fn from(changes: &'a UserBookChanges) -> Self {
        Self {
            reading_status: changes.reading_status.as_deref(),
            progress_page: changes.progress_page,
        }
    }
}

pub fn sql_debugging<T>(sql: T) -> T
where
    T: diesel::query_builder::QueryFragment<Pg>,
{
    if enabled!(tracing::Level::DEBUG) {
        let debug_str = debug_query::<Pg, _>(&sql).to_string();
        debug!("SQL: {}", debug_str);
    }
    sql
}

fn sql_error(err: DieselError) -> RepositoryError {
    match err {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
            RepositoryError::UniqueViolation(info.message().to_owned())
        }
        DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, info) => {
            RepositoryError::ForeignKeyViolation(info.message().to_owned())
        }
        e => RepositoryError::SqlExecuteError(e.to_string()),
    }
}

/// PostgreSQL 저장소로 작업마다 풀에서 커넥션을 얻고 작업이 끝나면 반환 한다.
pub struct DieselRepository {
    pool: DbPool,
}

impl DieselRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn connection(&self) -> Result<DbConnection, RepositoryError> {
        self.pool.get()
            .map_err(|e| RepositoryError::ConnectError(e.to_string()))
    }

    /// 스키마와 테이블이 없으면 생성한다.
    pub fn initialize_schema(&self) -> Result<(), RepositoryError> {
        let mut connection = self.connection()?;
        upgrade_schema(&mut connection)?;

        info!("library_service 스키마 초기화 완료");
        Ok(())
    }
}

/// 주어진 커넥션에서 스키마 DDL을 실행한다.
///
/// 기존 `user_books`의 NULL 값은 기본값으로 채우고 중복된 (user_id, book_id) 행은 먼저 저장된 행만 남긴다.
pub fn upgrade_schema(connection: &mut PgConnection) -> Result<(), RepositoryError> {
    connection.batch_execute(SCHEMA_SQL)
        .map_err(sql_error)
}

impl BookRepository for DieselRepository {
    fn find_books(&self, skip: i64, limit: i64) -> Result<Vec<Book>, RepositoryError> {
        let mut connection = self.connection()?;
        let entities = sql_debugging(books::table
            .select(BookEntity::as_select())
            .offset(skip)
            .limit(limit))
            .load::<BookEntity>(&mut connection)
            .map_err(sql_error)?;

        Ok(entities.into_iter().map(BookEntity::to_domain).collect())
    }

    fn find_book(&self, id: Uuid) -> Result<Option<Book>, RepositoryError> {
        let mut connection = self.connection()?;
        let entity = sql_debugging(books::table
            .find(id)
            .select(BookEntity::as_select()))
            .first::<BookEntity>(&mut connection)
            .optional()
            .map_err(sql_error)?;

        Ok(entity.map(BookEntity::to_domain))
    }

    fn save_book(&self, book: &Book) -> Result<Book, RepositoryError> {
        let mut connection = self.connection()?;
        let entity = sql_debugging(diesel::insert_into(books::table)
            .values(NewBook::from(book))
            .returning(BookEntity::as_returning()))
            .get_result::<BookEntity>(&mut connection)
            .map_err(sql_error)?;

        Ok(entity.to_domain())
    }

    fn update_book(&self, book: &Book) -> Result<Option<Book>, RepositoryError> {
        let mut connection = self.connection()?;
        let entity = sql_debugging(diesel::update(books::table.find(book.id()))
            .set(BookForm::from(book))
            .returning(BookEntity::as_returning()))
            .get_result::<BookEntity>(&mut connection)
            .optional()
            .map_err(sql_error)?;

        Ok(entity.map(BookEntity::to_domain))
    }

    fn delete_book(&self, id: Uuid) -> Result<usize, RepositoryError> {
        let mut connection = self.connection()?;
        sql_debugging(diesel::delete(books::table.find(id)))
            .execute(&mut connection)
            .map_err(sql_error)
    }
}

impl UserBookRepository for DieselRepository {
    fn find_by_user(&self, user_id: Uuid) -> Result<Vec<UserBook>, RepositoryError> {
        let mut connection = self.connection()?;
        let entities = sql_debugging(user_books::table
            .filter(user_books::user_id.eq(user_id))
            .select(UserBookEntity::as_select()))
            .load::<UserBookEntity>(&mut connection)
            .map_err(sql_error)?;

        Ok(entities.into_iter().map(UserBookEntity::to_domain).collect())
    }

    fn find_entry(&self, user_id: Uuid, book_id: Uuid) -> Result<Option<UserBook>, RepositoryError> {
        let mut connection = self.connection()?;
        let entity = sql_debugging(user_books::table
            .filter(user_books::user_id.eq(user_id))
            .filter(user_books::book_id.eq(book_id))
            .select(UserBookEntity::as_select()))
            .first::<UserBookEntity>(&mut connection)
            .optional()
            .map_err(sql_error)?;

        Ok(entity.map(UserBookEntity::to_domain))
    }

    fn save_entry(&self, entry: &UserBook) -> Result<UserBook, RepositoryError> {
        let mut connection = self.connection()?;
        let entity = sql_debugging(diesel::insert_into(user_books::table)
            .values(NewUserBook::from(entry))
            .returning(UserBookEntity::as_returning()))
            .get_result::<UserBookEntity>(&mut connection)
            .map_err(sql_error)?;

        Ok(entity.to_domain())
    }

    fn update_entry(&self, user_id: Uuid, book_id: Uuid, changes: &UserBookChanges) -> Result<Option<UserBook>, RepositoryError> {
        // 빈 SET 절은 diesel이 거부하므로 조회로 대신한다.
        if changes.is_empty() {
            return self.find_entry(user_id, book_id);
        }

        let mut connection = self.connection()?;
        let target = user_books::table
            .filter(user_books::user_id.eq(user_id))
            .filter(user_books::book_id.eq(book_id));
        let entity = sql_debugging(diesel::update(target)
            .set(UserBookForm::from(changes))
            .returning(UserBookEntity::as_returning()))
            .get_result::<UserBookEntity>(&mut connection)
            .optional()
            .map_err(sql_error)?;

        Ok(entity.map(UserBookEntity::to_domain))
    }

    fn delete_entry(&self, user_id: Uuid, book_id: Uuid) -> Result<usize, RepositoryError> {
        let mut connection = self.connection()?;
        let target = user_books::table
            .filter(user_books::user_id.eq(user_id))
            .filter(user_books::book_id.eq(book_id));
        sql_debugging(diesel::delete(target))
            .execute(&mut connection)
            .map_err(sql_error)
    }
}
