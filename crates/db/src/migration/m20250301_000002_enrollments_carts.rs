//! Enrollments with their payments and documents, carts with their items.

use sea_orm_migration::{prelude::*, schema::*};

use super::m20250301_000001_accounts_catalog::{Courses, Periods, Users};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Enrollments::Table)
                    .if_not_exists()
                    .col(uuid(Enrollments::Id).primary_key())
                    .col(uuid(Enrollments::StudentId))
                    .col(uuid(Enrollments::PeriodId))
                    .col(uuid(Enrollments::CourseId))
                    .col(string_len(Enrollments::Status, 20))
                    .col(string_len(Enrollments::PaymentMethod, 20))
                    .col(decimal_len(Enrollments::AmountPaid, 12, 2))
                    .col(decimal_len(Enrollments::AmountPending, 12, 2))
                    .col(decimal_len(Enrollments::Discount, 5, 2))
                    .col(text_null(Enrollments::Notes))
                    .col(timestamp_with_time_zone(Enrollments::EnrolledAt))
                    .col(timestamp_with_time_zone(Enrollments::CreatedAt))
                    .col(timestamp_with_time_zone(Enrollments::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_enrollments_student")
                            .from(Enrollments::Table, Enrollments::StudentId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_enrollments_period")
                            .from(Enrollments::Table, Enrollments::PeriodId)
                            .to(Periods::Table, Periods::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_enrollments_course")
                            .from(Enrollments::Table, Enrollments::CourseId)
                            .to(Courses::Table, Courses::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .check(Expr::col(Enrollments::AmountPaid).gte(0))
                    .check(Expr::col(Enrollments::AmountPending).gte(0))
                    .check(Expr::col(Enrollments::Discount).between(0, 100))
                    .to_owned(),
            )
            .await?;

        // One enrollment per student and period.
        manager
            .create_index(
                Index::create()
                    .name("uq_enrollments_student_period")
                    .table(Enrollments::Table)
                    .col(Enrollments::StudentId)
                    .col(Enrollments::PeriodId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_enrollments_period")
                    .table(Enrollments::Table)
                    .col(Enrollments::PeriodId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(EnrollmentPayments::Table)
                    .if_not_exists()
                    .col(uuid(EnrollmentPayments::Id).primary_key())
                    .col(uuid(EnrollmentPayments::EnrollmentId))
                    .col(decimal_len(EnrollmentPayments::Amount, 12, 2))
                    .col(string_len(EnrollmentPayments::PaymentMethod, 20))
                    .col(string_len_null(EnrollmentPayments::Receipt, 100))
                    .col(timestamp_with_time_zone(EnrollmentPayments::PaidAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_enrollment_payments_enrollment")
                            .from(EnrollmentPayments::Table, EnrollmentPayments::EnrollmentId)
                            .to(Enrollments::Table, Enrollments::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .check(Expr::col(EnrollmentPayments::Amount).gt(0))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(EnrollmentDocuments::Table)
                    .if_not_exists()
                    .col(uuid(EnrollmentDocuments::Id).primary_key())
                    .col(uuid(EnrollmentDocuments::EnrollmentId))
                    .col(string_len(EnrollmentDocuments::Kind, 30))
                    .col(text(EnrollmentDocuments::Url))
                    .col(timestamp_with_time_zone(EnrollmentDocuments::UploadedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_enrollment_documents_enrollment")
                            .from(EnrollmentDocuments::Table, EnrollmentDocuments::EnrollmentId)
                            .to(Enrollments::Table, Enrollments::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Carts::Table)
                    .if_not_exists()
                    .col(uuid(Carts::Id).primary_key())
                    .col(uuid_uniq(Carts::StudentId))
                    .col(string_len(Carts::Status, 20))
                    .col(decimal_len(Carts::Total, 12, 2))
                    .col(timestamp_with_time_zone(Carts::CreatedAt))
                    .col(timestamp_with_time_zone(Carts::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_carts_student")
                            .from(Carts::Table, Carts::StudentId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(CartItems::Table)
                    .if_not_exists()
                    .col(uuid(CartItems::Id).primary_key())
                    .col(uuid(CartItems::CartId))
                    .col(uuid(CartItems::CourseId))
                    .col(uuid(CartItems::PeriodId))
                    .col(decimal_len(CartItems::Price, 12, 2))
                    .col(timestamp_with_time_zone(CartItems::AddedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_cart_items_cart")
                            .from(CartItems::Table, CartItems::CartId)
                            .to(Carts::Table, Carts::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_cart_items_course")
                            .from(CartItems::Table, CartItems::CourseId)
                            .to(Courses::Table, Courses::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_cart_items_period")
                            .from(CartItems::Table, CartItems::PeriodId)
                            .to(Periods::Table, Periods::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("uq_cart_items_cart_course_period")
                    .table(CartItems::Table)
                    .col(CartItems::CartId)
                    .col(CartItems::CourseId)
                    .col(CartItems::PeriodId)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for table in [
            CartItems::Table.into_iden(),
            Carts::Table.into_iden(),
            EnrollmentDocuments::Table.into_iden(),
            EnrollmentPayments::Table.into_iden(),
            Enrollments::Table.into_iden(),
        ] {
            manager
                .drop_table(Table::drop().table(table).if_exists().to_owned())
                .await?;
        }
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Enrollments {
    Table,
    Id,
    StudentId,
    PeriodId,
    CourseId,
    Status,
    PaymentMethod,
    AmountPaid,
    AmountPending,
    Discount,
    Notes,
    EnrolledAt,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum EnrollmentPayments {
    Table,
    Id,
    EnrollmentId,
    Amount,
    PaymentMethod,
    Receipt,
    PaidAt,
}

#[derive(DeriveIden)]
enum EnrollmentDocuments {
    Table,
    Id,
    EnrollmentId,
    Kind,
    Url,
    UploadedAt,
}

#[derive(DeriveIden)]
enum Carts {
    Table,
    Id,
    StudentId,
    Status,
    Total,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum CartItems {
    Table,
    Id,
    CartId,
    CourseId,
    PeriodId,
    Price,
    AddedAt,
}
