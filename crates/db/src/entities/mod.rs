//! `SeaORM` entities.

pub mod cart_items;
pub mod carts;
pub mod courses;
pub mod enrollment_documents;
pub mod enrollment_payments;
pub mod enrollments;
pub mod period_teachers;
pub mod periods;
pub mod sea_orm_active_enums;
pub mod users;
