use sqlx::{FromRow, PgPool};

/// A stored user account row. The password hash stays inside the service;
/// responses are built from [`crate::users::dto::UserView`] instead.
#[derive(Debug, Clone, FromRow)]
pub struct UserAccount {
    pub id: i64,
    pub user_name: String,
    pub first_name: Option<String>,
    pub middle_name: Option<String>,
    pub last_name: Option<String>,
    pub email: String,
    pub primary_phone_number: String,
    pub password_hash: String,
}

/// Store-ready record produced by normalization; the store assigns the id.
#[derive(Debug, Clone)]
pub struct NewUserAccount {
    pub user_name: String,
    pub first_name: Option<String>,
    pub middle_name: Option<String>,
    pub last_name: Option<String>,
    pub email: String,
    pub primary_phone_number: String,
    pub password_hash: String,
}

/// Store failures the handlers need to tell apart.
#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    #[error("user_name already exists")]
    Conflict,
    #[error("no row matched the given id")]
    NotFound,
    #[error("{0}")]
    Database(sqlx::Error),
}

impl From<sqlx::Error> for RepoError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => RepoError::NotFound,
            sqlx::Error::Database(e) if e.is_unique_violation() => RepoError::Conflict,
            other => RepoError::Database(other),
        }
    }
}

impl UserAccount {
    pub async fn list(db: &PgPool, limit: i64, offset: i64) -> Result<Vec<UserAccount>, RepoError> {
        let rows = sqlx::query_as::<_, UserAccount>(
            r#"
            SELECT id, user_name, first_name, middle_name, last_name,
                   email, primary_phone_number, password_hash
            FROM user_accounts
            ORDER BY id
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    pub async fn insert(db: &PgPool, record: &NewUserAccount) -> Result<UserAccount, RepoError> {
        let row = sqlx::query_as::<_, UserAccount>(
            r#"
            INSERT INTO user_accounts
                (user_name, first_name, middle_name, last_name,
                 email, primary_phone_number, password_hash)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, user_name, first_name, middle_name, last_name,
                      email, primary_phone_number, password_hash
            "#,
        )
        .bind(&record.user_name)
        .bind(&record.first_name)
        .bind(&record.middle_name)
        .bind(&record.last_name)
        .bind(&record.email)
        .bind(&record.primary_phone_number)
        .bind(&record.password_hash)
        .fetch_one(db)
        .await?;
        Ok(row)
    }

    pub async fn find_by_id(db: &PgPool, id: i64) -> Result<UserAccount, RepoError> {
        let row = sqlx::query_as::<_, UserAccount>(
            r#"
            SELECT id, user_name, first_name, middle_name, last_name,
                   email, primary_phone_number, password_hash
            FROM user_accounts
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await?;
        row.ok_or(RepoError::NotFound)
    }

    /// Full replace of every profile field and the password hash for one row.
    pub async fn update(
        db: &PgPool,
        id: i64,
        record: &NewUserAccount,
    ) -> Result<UserAccount, RepoError> {
        let row = sqlx::query_as::<_, UserAccount>(
            r#"
            UPDATE user_accounts
            SET user_name = $2, first_name = $3, middle_name = $4, last_name = $5,
                email = $6, primary_phone_number = $7, password_hash = $8
            WHERE id = $1
            RETURNING id, user_name, first_name, middle_name, last_name,
                      email, primary_phone_number, password_hash
            "#,
        )
        .bind(id)
        .bind(&record.user_name)
        .bind(&record.first_name)
        .bind(&record.middle_name)
        .bind(&record.last_name)
        .bind(&record.email)
        .bind(&record.primary_phone_number)
        .bind(&record.password_hash)
        .fetch_optional(db)
        .await?;
        row.ok_or(RepoError::NotFound)
    }

    pub async fn delete(db: &PgPool, id: i64) -> Result<(), RepoError> {
        let result = sqlx::query("DELETE FROM user_accounts WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;
        if result.rows_affected() == 0 {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_not_found_classifies_as_not_found() {
        let err = RepoError::from(sqlx::Error::RowNotFound);
        assert!(matches!(err, RepoError::NotFound));
    }

    #[test]
    fn other_errors_classify_as_database() {
        let err = RepoError::from(sqlx::Error::PoolTimedOut);
        assert!(matches!(err, RepoError::Database(_)));
    }
}
