//! Cart repository.
//!
//! Checkout runs every item through the enrollment creation path inside a
//! single transaction: either every item becomes an enrollment or none does.

use academy_core::cart::{CartStatus, cart_total};
use academy_core::catalog::PeriodStatus;
use academy_core::enrollment::{EnrollmentError, EnrollmentService, PaymentMethod};
use academy_shared::types::{CartId, CartItemId};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use serde::Serialize;
use uuid::Uuid;

use super::enrollment::{
    NewEnrollment, check_period, create_enrollment, db_err, is_enrolled, load_period,
};
use super::is_unique_violation;
use super::period::ledger_of;
use super::user::role_of;
use crate::entities::{cart_items, carts, courses, enrollments};

/// A cart with its items in insertion order.
#[derive(Debug, Clone, Serialize)]
pub struct CartView {
    /// The cart record.
    pub cart: carts::Model,
    /// Items, oldest first.
    pub items: Vec<cart_items::Model>,
}

/// Outcome of a successful checkout.
#[derive(Debug, Clone, Serialize)]
pub struct CheckoutResult {
    /// The cart, now processed and empty.
    pub cart: carts::Model,
    /// One enrollment per former item, in item order.
    pub enrollments: Vec<enrollments::Model>,
}

async fn check_student<C: ConnectionTrait>(
    conn: &C,
    student_id: Uuid,
) -> Result<(), EnrollmentError> {
    let role = role_of(conn, student_id).await.map_err(db_err)?;
    EnrollmentService::check_student(student_id, role)
}

async fn find_cart<C: ConnectionTrait>(
    conn: &C,
    student_id: Uuid,
) -> Result<Option<carts::Model>, EnrollmentError> {
    carts::Entity::find()
        .filter(carts::Column::StudentId.eq(student_id))
        .one(conn)
        .await
        .map_err(db_err)
}

async fn items_of<C: ConnectionTrait>(
    conn: &C,
    cart_id: Uuid,
) -> Result<Vec<cart_items::Model>, EnrollmentError> {
    cart_items::Entity::find()
        .filter(cart_items::Column::CartId.eq(cart_id))
        .order_by_asc(cart_items::Column::AddedAt)
        .order_by_asc(cart_items::Column::Id)
        .all(conn)
        .await
        .map_err(db_err)
}

/// Recomputes the total from the stored items and sets the status.
async fn refresh<C: ConnectionTrait>(
    conn: &C,
    cart: carts::Model,
    status: CartStatus,
) -> Result<CartView, EnrollmentError> {
    let items = items_of(conn, cart.id).await?;
    let total = cart_total(items.iter().map(|item| item.price));

    let mut active: carts::ActiveModel = cart.into();
    active.total = Set(total);
    active.status = Set(status.into());
    active.updated_at = Set(chrono::Utc::now().into());
    let cart = active.update(conn).await.map_err(db_err)?;

    Ok(CartView { cart, items })
}

/// Cart repository.
#[derive(Debug, Clone)]
pub struct CartRepository {
    db: DatabaseConnection,
}

impl CartRepository {
    /// Creates a new cart repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Returns the student's cart, creating an empty one on first access.
    ///
    /// # Errors
    ///
    /// Returns `StudentNotFound` or `InvalidRole` if the user is not a student.
    pub async fn get_or_create(&self, student_id: Uuid) -> Result<CartView, EnrollmentError> {
        check_student(&self.db, student_id).await?;

        let cart = self.ensure_cart(student_id).await?;
        let items = items_of(&self.db, cart.id).await?;
        Ok(CartView { cart, items })
    }

    async fn ensure_cart(&self, student_id: Uuid) -> Result<carts::Model, EnrollmentError> {
        if let Some(cart) = find_cart(&self.db, student_id).await? {
            return Ok(cart);
        }

        let now = chrono::Utc::now().into();
        let inserted = carts::ActiveModel {
            id: Set(CartId::new().into_inner()),
            student_id: Set(student_id),
            status: Set(CartStatus::Active.into()),
            total: Set(Decimal::ZERO),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await;

        match inserted {
            Ok(cart) => {
                tracing::debug!(cart_id = %cart.id, student_id = %student_id, "Cart created");
                Ok(cart)
            }
            // Lost a race with a concurrent request creating the same cart.
            Err(e) if is_unique_violation(&e) => find_cart(&self.db, student_id)
                .await?
                .ok_or(EnrollmentError::CartNotFound),
            Err(e) => Err(db_err(e)),
        }
    }

    /// Adds a (course, period) pair to the student's cart.
    ///
    /// The price is the course list price at this moment.
    ///
    /// # Errors
    ///
    /// Returns `PeriodNotFound`, `CourseNotFound`, `NotAvailable` unless the
    /// period is in progress, `CapacityExceeded`, `PeriodCourseMismatch`,
    /// `DuplicateEnrollment` if already enrolled, or `ItemAlreadyInCart`.
    pub async fn add_item(
        &self,
        student_id: Uuid,
        course_id: Uuid,
        period_id: Uuid,
    ) -> Result<CartView, EnrollmentError> {
        check_student(&self.db, student_id).await?;

        let period = load_period(&self.db, period_id).await?;
        let course = courses::Entity::find_by_id(course_id)
            .one(&self.db)
            .await
            .map_err(db_err)?
            .ok_or(EnrollmentError::CourseNotFound(course_id))?;

        let ledger = ledger_of(&period).map_err(|e| EnrollmentError::Database(e.to_string()))?;
        let status: PeriodStatus = period.status.into();
        EnrollmentService::check_cart_item(
            &period.code,
            status,
            &ledger,
            period.course_id,
            course.id,
        )?;

        if is_enrolled(&self.db, student_id, period_id)
            .await
            .map_err(db_err)?
        {
            return Err(EnrollmentError::DuplicateEnrollment);
        }

        let cart = self.ensure_cart(student_id).await?;
        let txn = self.db.begin().await.map_err(db_err)?;

        let duplicate = cart_items::Entity::find()
            .filter(cart_items::Column::CartId.eq(cart.id))
            .filter(cart_items::Column::CourseId.eq(course_id))
            .filter(cart_items::Column::PeriodId.eq(period_id))
            .one(&txn)
            .await
            .map_err(db_err)?;
        if duplicate.is_some() {
            return Err(EnrollmentError::ItemAlreadyInCart);
        }

        cart_items::ActiveModel {
            id: Set(CartItemId::new().into_inner()),
            cart_id: Set(cart.id),
            course_id: Set(course_id),
            period_id: Set(period_id),
            price: Set(course.price),
            added_at: Set(chrono::Utc::now().into()),
        }
        .insert(&txn)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                EnrollmentError::ItemAlreadyInCart
            } else {
                db_err(e)
            }
        })?;

        let status = CartStatus::from(cart.status).after_item_added();
        let view = refresh(&txn, cart, status).await?;
        txn.commit().await.map_err(db_err)?;

        tracing::info!(
            cart_id = %view.cart.id,
            period_id = %period_id,
            total = %view.cart.total,
            "Item added to cart"
        );

        Ok(view)
    }

    /// Removes one item from the student's cart.
    ///
    /// # Errors
    ///
    /// Returns `CartNotFound` or `CartItemNotFound`.
    pub async fn remove_item(
        &self,
        student_id: Uuid,
        item_id: Uuid,
    ) -> Result<CartView, EnrollmentError> {
        let txn = self.db.begin().await.map_err(db_err)?;

        let cart = find_cart(&txn, student_id)
            .await?
            .ok_or(EnrollmentError::CartNotFound)?;

        let result = cart_items::Entity::delete_many()
            .filter(cart_items::Column::Id.eq(item_id))
            .filter(cart_items::Column::CartId.eq(cart.id))
            .exec(&txn)
            .await
            .map_err(db_err)?;
        if result.rows_affected == 0 {
            return Err(EnrollmentError::CartItemNotFound(item_id));
        }

        let status = cart.status.into();
        let view = refresh(&txn, cart, status).await?;
        txn.commit().await.map_err(db_err)?;

        tracing::info!(cart_id = %view.cart.id, item_id = %item_id, "Item removed from cart");
        Ok(view)
    }

    /// Removes every item from the student's cart.
    ///
    /// # Errors
    ///
    /// Returns `CartNotFound` if the student has no cart.
    pub async fn clear(&self, student_id: Uuid) -> Result<CartView, EnrollmentError> {
        let txn = self.db.begin().await.map_err(db_err)?;

        let cart = find_cart(&txn, student_id)
            .await?
            .ok_or(EnrollmentError::CartNotFound)?;

        cart_items::Entity::delete_many()
            .filter(cart_items::Column::CartId.eq(cart.id))
            .exec(&txn)
            .await
            .map_err(db_err)?;

        let status = cart.status.into();
        let view = refresh(&txn, cart, status).await?;
        txn.commit().await.map_err(db_err)?;

        tracing::info!(cart_id = %view.cart.id, "Cart cleared");
        Ok(view)
    }

    /// Converts every cart item into an enrollment.
    ///
    /// Items are processed in insertion order inside one transaction. The
    /// first failure, typically `CapacityExceeded` naming the full period,
    /// rolls back the enrollments and seats of the items before it. On
    /// success the cart is emptied and marked processed.
    ///
    /// # Errors
    ///
    /// Returns `CartNotFound`, `EmptyCart`, or the first item's
    /// `EnrollmentError`.
    pub async fn checkout(
        &self,
        student_id: Uuid,
        payment_method: PaymentMethod,
    ) -> Result<CheckoutResult, EnrollmentError> {
        let txn = self.db.begin().await.map_err(db_err)?;

        check_student(&txn, student_id).await?;
        let cart = find_cart(&txn, student_id)
            .await?
            .ok_or(EnrollmentError::CartNotFound)?;
        let items = items_of(&txn, cart.id).await?;
        if items.is_empty() {
            return Err(EnrollmentError::EmptyCart);
        }

        let mut created = Vec::with_capacity(items.len());
        for item in items {
            let period = load_period(&txn, item.period_id).await?;
            let outcome = async {
                check_period(&period)?;
                if is_enrolled(&txn, student_id, period.id)
                    .await
                    .map_err(db_err)?
                {
                    return Err(EnrollmentError::DuplicateEnrollment);
                }
                create_enrollment(
                    &txn,
                    &period,
                    NewEnrollment {
                        student_id,
                        course_id: item.course_id,
                        payment_method,
                        amount_paid: item.price,
                        discount: Decimal::ZERO,
                        notes: None,
                        documents: Vec::new(),
                    },
                )
                .await
            }
            .await;

            match outcome {
                Ok(enrollment) => created.push(enrollment),
                Err(e) => {
                    tracing::warn!(
                        cart_id = %cart.id,
                        period = %period.code,
                        error = %e,
                        "Checkout rolled back"
                    );
                    return Err(e);
                }
            }
        }

        cart_items::Entity::delete_many()
            .filter(cart_items::Column::CartId.eq(cart.id))
            .exec(&txn)
            .await
            .map_err(db_err)?;
        let view = refresh(&txn, cart, CartStatus::Processed).await?;

        txn.commit().await.map_err(db_err)?;

        tracing::info!(
            cart_id = %view.cart.id,
            student_id = %student_id,
            enrollments = created.len(),
            "Cart checked out"
        );

        Ok(CheckoutResult {
            cart: view.cart,
            enrollments: created,
        })
    }
}
