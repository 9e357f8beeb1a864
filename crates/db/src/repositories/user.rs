//! User repository for database operations.

use academy_core::auth::UserRole;
use academy_shared::types::UserId;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, Set,
};
use uuid::Uuid;

use crate::entities::users;

/// Fields of a new account. The password is already hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    /// Login email, stored lower-cased.
    pub email: String,
    /// Argon2 PHC string.
    pub password_hash: String,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// National identity document number.
    pub document_number: String,
    /// Contact phone.
    pub phone: Option<String>,
    /// Role.
    pub role: UserRole,
}

/// User repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct UserRepository {
    db: DatabaseConnection,
}

impl UserRepository {
    /// Creates a new user repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Finds a user by email (case-insensitive).
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_email(&self, email: &str) -> Result<Option<users::Model>, DbErr> {
        users::Entity::find()
            .filter(users::Column::Email.eq(email.trim().to_lowercase()))
            .one(&self.db)
            .await
    }

    /// Finds a user by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<users::Model>, DbErr> {
        users::Entity::find_by_id(id).one(&self.db).await
    }

    /// Creates a new active user.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails, including unique violations on
    /// email or document number.
    pub async fn create(&self, input: NewUser) -> Result<users::Model, DbErr> {
        let now = chrono::Utc::now().into();
        let user = users::ActiveModel {
            id: Set(UserId::new().into_inner()),
            email: Set(input.email.trim().to_lowercase()),
            document_number: Set(input.document_number.trim().to_string()),
            first_name: Set(input.first_name.trim().to_string()),
            last_name: Set(input.last_name.trim().to_string()),
            phone: Set(input.phone),
            password_hash: Set(input.password_hash),
            role: Set(input.role.into()),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        };

        user.insert(&self.db).await
    }

    /// Checks if an email is already registered.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn email_exists(&self, email: &str) -> Result<bool, DbErr> {
        let count = users::Entity::find()
            .filter(users::Column::Email.eq(email.trim().to_lowercase()))
            .count(&self.db)
            .await?;

        Ok(count > 0)
    }

    /// Checks if a document number is already registered.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn document_exists(&self, document_number: &str) -> Result<bool, DbErr> {
        let count = users::Entity::find()
            .filter(users::Column::DocumentNumber.eq(document_number.trim()))
            .count(&self.db)
            .await?;

        Ok(count > 0)
    }
}

/// Current role of a user, `None` if there is no such user.
///
/// Role checks read the stored role rather than trusting a token.
pub(crate) async fn role_of<C: ConnectionTrait>(
    conn: &C,
    user_id: Uuid,
) -> Result<Option<UserRole>, DbErr> {
    let user = users::Entity::find_by_id(user_id).one(conn).await?;
    Ok(user.map(|u| u.role.into()))
}
