//! Enrollment repository.
//!
//! Every enrollment is created through [`create_enrollment`], which admits
//! the seat and inserts the row on the caller's transaction. Direct
//! enrollment, administrator enrollment and cart checkout all end there.

use academy_core::catalog::PeriodStatus;
use academy_core::enrollment::{
    EnrollmentDocument, EnrollmentError, EnrollmentService, EnrollmentStatus, PaymentMethod,
    PaymentState,
};
use academy_shared::types::{EnrollmentId, PageRequest, PageResponse};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use serde::Serialize;
use uuid::Uuid;

use super::is_unique_violation;
use super::period::{admit_seat, ledger_of, release_seat};
use super::user::role_of;
use crate::entities::{
    courses, enrollment_documents, enrollment_payments, enrollments, periods,
    sea_orm_active_enums as db_enums,
};

pub(crate) fn db_err(err: DbErr) -> EnrollmentError {
    EnrollmentError::Database(err.to_string())
}

/// Direct enrollment request.
#[derive(Debug, Clone)]
pub struct EnrollInput {
    /// Student to enroll.
    pub student_id: Uuid,
    /// Target period.
    pub period_id: Uuid,
    /// Course; defaults to the period's course.
    pub course_id: Option<Uuid>,
    /// How the student paid.
    pub payment_method: PaymentMethod,
    /// Amount received at enrollment.
    pub amount_paid: Decimal,
    /// Discount percentage granted.
    pub discount: Decimal,
    /// Notes.
    pub notes: Option<String>,
    /// Documents handed in.
    pub documents: Vec<EnrollmentDocument>,
}

/// Administrator enrollment request.
#[derive(Debug, Clone)]
pub struct AdminEnrollInput {
    /// Acting administrator.
    pub admin_id: Uuid,
    /// Student to enroll.
    pub student_id: Uuid,
    /// Target period.
    pub period_id: Uuid,
    /// Defaults to cash.
    pub payment_method: Option<PaymentMethod>,
    /// Discount percentage, defaults to 0.
    pub discount: Option<Decimal>,
    /// Defaults to a standard note.
    pub notes: Option<String>,
}

/// A payment to record.
#[derive(Debug, Clone)]
pub struct PaymentInput {
    /// Amount, must be positive.
    pub amount: Decimal,
    /// How it was paid.
    pub payment_method: PaymentMethod,
    /// Receipt number.
    pub receipt: Option<String>,
}

/// Filter for listing enrollments.
#[derive(Debug, Clone, Default)]
pub struct EnrollmentFilter {
    /// Only this student's enrollments.
    pub student_id: Option<Uuid>,
    /// Only enrollments in this period.
    pub period_id: Option<Uuid>,
    /// Only enrollments in this status.
    pub status: Option<EnrollmentStatus>,
}

/// Changes an administrator may make to an enrollment.
#[derive(Debug, Clone, Default)]
pub struct UpdateEnrollmentInput {
    /// New status, subject to the allowed transitions.
    pub status: Option<EnrollmentStatus>,
    /// Replacement notes.
    pub notes: Option<String>,
}

/// An enrollment with its payment history and documents.
#[derive(Debug, Clone, Serialize)]
pub struct EnrollmentDetails {
    /// The enrollment record.
    pub enrollment: enrollments::Model,
    /// Payments, oldest first.
    pub payments: Vec<enrollment_payments::Model>,
    /// Attached documents.
    pub documents: Vec<enrollment_documents::Model>,
}

/// Fields of an enrollment row once eligibility has been checked.
#[derive(Debug, Clone)]
pub(crate) struct NewEnrollment {
    pub student_id: Uuid,
    pub course_id: Uuid,
    pub payment_method: PaymentMethod,
    pub amount_paid: Decimal,
    pub discount: Decimal,
    pub notes: Option<String>,
    pub documents: Vec<EnrollmentDocument>,
}

/// Admits a seat in `period` and inserts the enrollment.
///
/// Must run on a transaction: if the insert fails the seat must be rolled
/// back with it.
pub(crate) async fn create_enrollment<C: ConnectionTrait>(
    conn: &C,
    period: &periods::Model,
    new: NewEnrollment,
) -> Result<enrollments::Model, EnrollmentError> {
    if !admit_seat(conn, period.id).await.map_err(db_err)? {
        tracing::warn!(period_id = %period.id, code = %period.code, "Period is full");
        return Err(EnrollmentError::CapacityExceeded {
            period: period.code.clone(),
        });
    }

    let now = chrono::Utc::now().into();
    let enrollment = enrollments::ActiveModel {
        id: Set(EnrollmentId::new().into_inner()),
        student_id: Set(new.student_id),
        period_id: Set(period.id),
        course_id: Set(new.course_id),
        status: Set(db_enums::EnrollmentStatus::Active),
        payment_method: Set(new.payment_method.into()),
        amount_paid: Set(new.amount_paid),
        amount_pending: Set(Decimal::ZERO),
        discount: Set(new.discount),
        notes: Set(new.notes),
        enrolled_at: Set(now),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(conn)
    .await
    .map_err(|e| {
        if is_unique_violation(&e) {
            EnrollmentError::DuplicateEnrollment
        } else {
            db_err(e)
        }
    })?;

    for document in new.documents {
        enrollment_documents::ActiveModel {
            id: Set(Uuid::now_v7()),
            enrollment_id: Set(enrollment.id),
            kind: Set(document.kind.into()),
            url: Set(document.url),
            uploaded_at: Set(now),
        }
        .insert(conn)
        .await
        .map_err(db_err)?;
    }

    Ok(enrollment)
}

/// Returns true if the student already holds an enrollment in the period.
pub(crate) async fn is_enrolled<C: ConnectionTrait>(
    conn: &C,
    student_id: Uuid,
    period_id: Uuid,
) -> Result<bool, DbErr> {
    let count = enrollments::Entity::find()
        .filter(enrollments::Column::StudentId.eq(student_id))
        .filter(enrollments::Column::PeriodId.eq(period_id))
        .count(conn)
        .await?;
    Ok(count > 0)
}

/// Enrollment repository.
#[derive(Debug, Clone)]
pub struct EnrollmentRepository {
    db: DatabaseConnection,
}

impl EnrollmentRepository {
    /// Creates a new enrollment repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Enrolls a student in a period.
    ///
    /// Checks, in order: the student exists and is a student, the period
    /// exists, the period accepts enrollment, a seat is free, the student is
    /// not already enrolled. The seat and the row are then written in one
    /// transaction.
    ///
    /// # Errors
    ///
    /// Returns the first failed check as an `EnrollmentError`.
    pub async fn enroll(&self, input: EnrollInput) -> Result<enrollments::Model, EnrollmentError> {
        EnrollmentService::check_amount_paid(input.amount_paid)?;
        EnrollmentService::check_discount(input.discount)?;

        let txn = self.db.begin().await.map_err(db_err)?;

        let role = role_of(&txn, input.student_id).await.map_err(db_err)?;
        EnrollmentService::check_student(input.student_id, role)?;

        let period = load_period(&txn, input.period_id).await?;
        check_period(&period)?;

        if is_enrolled(&txn, input.student_id, period.id)
            .await
            .map_err(db_err)?
        {
            return Err(EnrollmentError::DuplicateEnrollment);
        }

        let course_id = input.course_id.unwrap_or(period.course_id);
        if course_id != period.course_id {
            return Err(EnrollmentError::PeriodCourseMismatch {
                period: period.code.clone(),
                course: course_id,
            });
        }

        let enrollment = create_enrollment(
            &txn,
            &period,
            NewEnrollment {
                student_id: input.student_id,
                course_id,
                payment_method: input.payment_method,
                amount_paid: input.amount_paid,
                discount: input.discount,
                notes: input.notes,
                documents: input.documents,
            },
        )
        .await?;

        txn.commit().await.map_err(db_err)?;

        tracing::info!(
            enrollment_id = %enrollment.id,
            student_id = %enrollment.student_id,
            period_id = %enrollment.period_id,
            "Student enrolled"
        );

        Ok(enrollment)
    }

    /// Enrolls a student on behalf of an administrator.
    ///
    /// The amount paid is the course list price less the discount, rounded
    /// to cents.
    ///
    /// # Errors
    ///
    /// Returns `InvalidRole` if `admin_id` is not an administrator,
    /// `InvalidDiscount` for a discount outside 0-100, or any error of
    /// [`EnrollmentRepository::enroll`].
    pub async fn admin_enroll(
        &self,
        input: AdminEnrollInput,
    ) -> Result<enrollments::Model, EnrollmentError> {
        let admin_role = role_of(&self.db, input.admin_id)
            .await
            .map_err(db_err)?
            .ok_or_else(|| {
                EnrollmentError::InvalidRole(format!("User {} not found", input.admin_id))
            })?;
        EnrollmentService::check_admin(admin_role)?;

        let student_role = role_of(&self.db, input.student_id)
            .await
            .map_err(db_err)?;
        EnrollmentService::check_student(input.student_id, student_role)?;

        let period = load_period(&self.db, input.period_id).await?;
        let course = courses::Entity::find_by_id(period.course_id)
            .one(&self.db)
            .await
            .map_err(db_err)?
            .ok_or(EnrollmentError::CourseNotFound(period.course_id))?;

        let terms = EnrollmentService::admin_terms(
            course.price,
            input.discount,
            input.payment_method,
            input.notes,
        )?;

        tracing::debug!(
            admin_id = %input.admin_id,
            list_price = %course.price,
            amount_paid = %terms.amount_paid,
            "Administrator enrollment priced"
        );

        self.enroll(EnrollInput {
            student_id: input.student_id,
            period_id: period.id,
            course_id: Some(course.id),
            payment_method: terms.payment_method,
            amount_paid: terms.amount_paid,
            discount: terms.discount,
            notes: Some(terms.notes),
            documents: Vec::new(),
        })
        .await
    }

    /// Records a payment against an enrollment.
    ///
    /// `amount_paid` grows by the amount; `amount_pending` shrinks by it,
    /// stopping at zero.
    ///
    /// # Errors
    ///
    /// Returns `InvalidAmount` for a non-positive amount or
    /// `EnrollmentNotFound`.
    pub async fn add_payment(
        &self,
        enrollment_id: Uuid,
        input: PaymentInput,
    ) -> Result<enrollments::Model, EnrollmentError> {
        let txn = self.db.begin().await.map_err(db_err)?;

        let enrollment = enrollments::Entity::find_by_id(enrollment_id)
            .one(&txn)
            .await
            .map_err(db_err)?
            .ok_or(EnrollmentError::EnrollmentNotFound(enrollment_id))?;

        let state = PaymentState::new(enrollment.amount_paid, enrollment.amount_pending)
            .apply(input.amount)?;

        let now = chrono::Utc::now().into();
        enrollment_payments::ActiveModel {
            id: Set(Uuid::now_v7()),
            enrollment_id: Set(enrollment_id),
            amount: Set(input.amount),
            payment_method: Set(input.payment_method.into()),
            receipt: Set(input.receipt),
            paid_at: Set(now),
        }
        .insert(&txn)
        .await
        .map_err(db_err)?;

        let mut active: enrollments::ActiveModel = enrollment.into();
        active.amount_paid = Set(state.paid);
        active.amount_pending = Set(state.pending);
        active.updated_at = Set(now);
        let enrollment = active.update(&txn).await.map_err(db_err)?;

        txn.commit().await.map_err(db_err)?;

        tracing::info!(
            enrollment_id = %enrollment_id,
            amount = %input.amount,
            pending = %enrollment.amount_pending,
            "Payment recorded"
        );

        Ok(enrollment)
    }

    /// Deletes an enrollment and gives its seat back.
    ///
    /// # Errors
    ///
    /// Returns `EnrollmentNotFound` if it does not exist.
    pub async fn delete(&self, enrollment_id: Uuid) -> Result<(), EnrollmentError> {
        let txn = self.db.begin().await.map_err(db_err)?;

        let enrollment = enrollments::Entity::find_by_id(enrollment_id)
            .one(&txn)
            .await
            .map_err(db_err)?
            .ok_or(EnrollmentError::EnrollmentNotFound(enrollment_id))?;

        if !release_seat(&txn, enrollment.period_id)
            .await
            .map_err(db_err)?
        {
            tracing::warn!(
                period_id = %enrollment.period_id,
                "No occupied seat to release"
            );
        }

        enrollment_payments::Entity::delete_many()
            .filter(enrollment_payments::Column::EnrollmentId.eq(enrollment_id))
            .exec(&txn)
            .await
            .map_err(db_err)?;
        enrollment_documents::Entity::delete_many()
            .filter(enrollment_documents::Column::EnrollmentId.eq(enrollment_id))
            .exec(&txn)
            .await
            .map_err(db_err)?;
        enrollments::Entity::delete_by_id(enrollment_id)
            .exec(&txn)
            .await
            .map_err(db_err)?;

        txn.commit().await.map_err(db_err)?;

        tracing::info!(enrollment_id = %enrollment_id, "Enrollment deleted");
        Ok(())
    }

    /// Finds an enrollment by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(
        &self,
        enrollment_id: Uuid,
    ) -> Result<Option<enrollments::Model>, EnrollmentError> {
        enrollments::Entity::find_by_id(enrollment_id)
            .one(&self.db)
            .await
            .map_err(db_err)
    }

    /// Gets an enrollment with its payments and documents.
    ///
    /// # Errors
    ///
    /// Returns `EnrollmentNotFound` if it does not exist.
    pub async fn get(&self, enrollment_id: Uuid) -> Result<EnrollmentDetails, EnrollmentError> {
        let enrollment = self
            .find_by_id(enrollment_id)
            .await?
            .ok_or(EnrollmentError::EnrollmentNotFound(enrollment_id))?;

        let payments = enrollment_payments::Entity::find()
            .filter(enrollment_payments::Column::EnrollmentId.eq(enrollment_id))
            .order_by_asc(enrollment_payments::Column::PaidAt)
            .order_by_asc(enrollment_payments::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err)?;

        let documents = enrollment_documents::Entity::find()
            .filter(enrollment_documents::Column::EnrollmentId.eq(enrollment_id))
            .order_by_asc(enrollment_documents::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err)?;

        Ok(EnrollmentDetails {
            enrollment,
            payments,
            documents,
        })
    }

    /// Lists enrollments matching a filter, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(
        &self,
        filter: EnrollmentFilter,
        page: &PageRequest,
    ) -> Result<PageResponse<enrollments::Model>, EnrollmentError> {
        let page = page.normalized();

        let mut query = enrollments::Entity::find();
        if let Some(student_id) = filter.student_id {
            query = query.filter(enrollments::Column::StudentId.eq(student_id));
        }
        if let Some(period_id) = filter.period_id {
            query = query.filter(enrollments::Column::PeriodId.eq(period_id));
        }
        if let Some(status) = filter.status {
            let status: db_enums::EnrollmentStatus = status.into();
            query = query.filter(enrollments::Column::Status.eq(status));
        }

        let total = query.clone().count(&self.db).await.map_err(db_err)?;
        let data = query
            .order_by_desc(enrollments::Column::EnrolledAt)
            .order_by_desc(enrollments::Column::Id)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await
            .map_err(db_err)?;

        Ok(PageResponse::new(data, page.page, page.per_page, total))
    }

    /// Lists all enrollments of a student, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_by_student(
        &self,
        student_id: Uuid,
    ) -> Result<Vec<enrollments::Model>, EnrollmentError> {
        enrollments::Entity::find()
            .filter(enrollments::Column::StudentId.eq(student_id))
            .order_by_desc(enrollments::Column::EnrolledAt)
            .all(&self.db)
            .await
            .map_err(db_err)
    }

    /// Updates the status and/or notes of an enrollment.
    ///
    /// # Errors
    ///
    /// Returns `EnrollmentNotFound` or `InvalidTransition`.
    pub async fn update(
        &self,
        enrollment_id: Uuid,
        input: UpdateEnrollmentInput,
    ) -> Result<enrollments::Model, EnrollmentError> {
        let enrollment = self
            .find_by_id(enrollment_id)
            .await?
            .ok_or(EnrollmentError::EnrollmentNotFound(enrollment_id))?;

        let current: EnrollmentStatus = enrollment.status.into();
        let mut active: enrollments::ActiveModel = enrollment.into();

        if let Some(next) = input.status {
            let next = EnrollmentService::transition(current, next)?;
            active.status = Set(next.into());
            tracing::info!(
                enrollment_id = %enrollment_id,
                from = %current,
                to = %next,
                "Enrollment status changed"
            );
        }
        if let Some(notes) = input.notes {
            active.notes = Set(Some(notes));
        }
        active.updated_at = Set(chrono::Utc::now().into());

        active.update(&self.db).await.map_err(db_err)
    }
}

/// Loads a period or fails with `PeriodNotFound`.
pub(crate) async fn load_period<C: ConnectionTrait>(
    conn: &C,
    period_id: Uuid,
) -> Result<periods::Model, EnrollmentError> {
    periods::Entity::find_by_id(period_id)
        .one(conn)
        .await
        .map_err(db_err)?
        .ok_or(EnrollmentError::PeriodNotFound(period_id))
}

/// Status and seat checks for direct enrollment.
pub(crate) fn check_period(period: &periods::Model) -> Result<(), EnrollmentError> {
    let ledger = ledger_of(period).map_err(|e| EnrollmentError::Database(e.to_string()))?;
    let status: PeriodStatus = period.status.into();
    EnrollmentService::check_period(&period.code, status, &ledger)
}

#[cfg(test)]
#[path = "enrollment_tests.rs"]
mod tests;
