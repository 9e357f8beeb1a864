//! Users, courses, periods and period teachers.

use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(uuid(Users::Id).primary_key())
                    .col(string_len_uniq(Users::Email, 255))
                    .col(string_len_uniq(Users::DocumentNumber, 20))
                    .col(string_len(Users::FirstName, 100))
                    .col(string_len(Users::LastName, 100))
                    .col(string_len_null(Users::Phone, 20))
                    .col(string(Users::PasswordHash))
                    .col(string_len(Users::Role, 20))
                    .col(boolean(Users::IsActive).default(true))
                    .col(timestamp_with_time_zone(Users::CreatedAt))
                    .col(timestamp_with_time_zone(Users::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Courses::Table)
                    .if_not_exists()
                    .col(uuid(Courses::Id).primary_key())
                    .col(string_len_uniq(Courses::Code, 20))
                    .col(string_len(Courses::Name, 200))
                    .col(text_null(Courses::Description))
                    .col(integer(Courses::DurationWeeks))
                    .col(string_len(Courses::Level, 20))
                    .col(decimal_len(Courses::Price, 12, 2))
                    .col(integer(Courses::MaxCapacity))
                    .col(boolean(Courses::IsActive).default(true))
                    .col(timestamp_with_time_zone(Courses::CreatedAt))
                    .col(timestamp_with_time_zone(Courses::UpdatedAt))
                    .check(Expr::col(Courses::DurationWeeks).gte(1))
                    .check(Expr::col(Courses::Price).gte(0))
                    .check(Expr::col(Courses::MaxCapacity).gte(1))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Periods::Table)
                    .if_not_exists()
                    .col(uuid(Periods::Id).primary_key())
                    .col(uuid(Periods::CourseId))
                    .col(string_len_uniq(Periods::Code, 20))
                    .col(string_len(Periods::Name, 200))
                    .col(date(Periods::StartDate))
                    .col(date(Periods::EndDate))
                    .col(string_len_null(Periods::Schedule, 200))
                    .col(text_null(Periods::Notes))
                    .col(string_len(Periods::Status, 20))
                    .col(integer(Periods::Capacity))
                    .col(integer(Periods::SeatsOccupied).default(0))
                    .col(timestamp_with_time_zone(Periods::CreatedAt))
                    .col(timestamp_with_time_zone(Periods::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_periods_course")
                            .from(Periods::Table, Periods::CourseId)
                            .to(Courses::Table, Courses::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .check(Expr::col(Periods::Capacity).gte(1))
                    .check(Expr::col(Periods::SeatsOccupied).gte(0))
                    .check(Expr::col(Periods::SeatsOccupied).lte(Expr::col(Periods::Capacity)))
                    .check(Expr::col(Periods::StartDate).lte(Expr::col(Periods::EndDate)))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_periods_course")
                    .table(Periods::Table)
                    .col(Periods::CourseId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(PeriodTeachers::Table)
                    .if_not_exists()
                    .col(uuid(PeriodTeachers::PeriodId))
                    .col(uuid(PeriodTeachers::TeacherId))
                    .primary_key(
                        Index::create()
                            .col(PeriodTeachers::PeriodId)
                            .col(PeriodTeachers::TeacherId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_period_teachers_period")
                            .from(PeriodTeachers::Table, PeriodTeachers::PeriodId)
                            .to(Periods::Table, Periods::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_period_teachers_teacher")
                            .from(PeriodTeachers::Table, PeriodTeachers::TeacherId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for table in [
            PeriodTeachers::Table.into_iden(),
            Periods::Table.into_iden(),
            Courses::Table.into_iden(),
            Users::Table.into_iden(),
        ] {
            manager
                .drop_table(Table::drop().table(table).if_exists().to_owned())
                .await?;
        }
        Ok(())
    }
}

#[derive(DeriveIden)]
pub(super) enum Users {
    Table,
    Id,
    Email,
    DocumentNumber,
    FirstName,
    LastName,
    Phone,
    PasswordHash,
    Role,
    IsActive,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
pub(super) enum Courses {
    Table,
    Id,
    Code,
    Name,
    Description,
    DurationWeeks,
    Level,
    Price,
    MaxCapacity,
    IsActive,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
pub(super) enum Periods {
    Table,
    Id,
    CourseId,
    Code,
    Name,
    StartDate,
    EndDate,
    Schedule,
    Notes,
    Status,
    Capacity,
    SeatsOccupied,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum PeriodTeachers {
    Table,
    PeriodId,
    TeacherId,
}
