//! Database seeder for local development.
//!
//! Creates one administrator, two teachers, three students, a small course
//! catalog and a few periods in different states. Running it twice is
//! harmless: existing rows are skipped.
//!
//! Every seeded account uses the password in `SEED_PASSWORD`
//! (default `academy123`).
//!
//! Usage: cargo run --bin seeder

use academy_core::auth::{UserRole, hash_password};
use academy_core::catalog::{CatalogError, CourseDraft, CourseLevel, PeriodDraft, PeriodStatus};
use academy_db::entities::{courses, users};
use academy_db::repositories::{
    CourseRepository, NewUser, PeriodFilter, PeriodRepository, UserRepository,
};
use academy_shared::AppConfig;
use anyhow::{Context, Result};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::DatabaseConnection;
use uuid::Uuid;

struct SeedUser {
    email: &'static str,
    first_name: &'static str,
    last_name: &'static str,
    document_number: &'static str,
    role: UserRole,
}

const USERS: &[SeedUser] = &[
    SeedUser {
        email: "admin@academy.dev",
        first_name: "Ada",
        last_name: "Admin",
        document_number: "0900000001",
        role: UserRole::Admin,
    },
    SeedUser {
        email: "lucia.teacher@academy.dev",
        first_name: "Lucia",
        last_name: "Mendoza",
        document_number: "0900000002",
        role: UserRole::Teacher,
    },
    SeedUser {
        email: "marco.teacher@academy.dev",
        first_name: "Marco",
        last_name: "Salazar",
        document_number: "0900000003",
        role: UserRole::Teacher,
    },
    SeedUser {
        email: "ana.student@academy.dev",
        first_name: "Ana",
        last_name: "Paredes",
        document_number: "0900000004",
        role: UserRole::Student,
    },
    SeedUser {
        email: "bruno.student@academy.dev",
        first_name: "Bruno",
        last_name: "Vera",
        document_number: "0900000005",
        role: UserRole::Student,
    },
    SeedUser {
        email: "carla.student@academy.dev",
        first_name: "Carla",
        last_name: "Ortiz",
        document_number: "0900000006",
        role: UserRole::Student,
    },
];

struct SeedCourse {
    code: &'static str,
    name: &'static str,
    weeks: i32,
    level: CourseLevel,
    /// Price in cents.
    price_cents: i64,
    max_capacity: i32,
}

const COURSES: &[SeedCourse] = &[
    SeedCourse {
        code: "BAR-101",
        name: "Barista Fundamentals",
        weeks: 8,
        level: CourseLevel::Basic,
        price_cents: 35_000,
        max_capacity: 20,
    },
    SeedCourse {
        code: "COC-201",
        name: "International Cuisine",
        weeks: 12,
        level: CourseLevel::Intermediate,
        price_cents: 48_050,
        max_capacity: 15,
    },
    SeedCourse {
        code: "PAS-301",
        name: "Advanced Pastry",
        weeks: 10,
        level: CourseLevel::Advanced,
        price_cents: 52_000,
        max_capacity: 12,
    },
];

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load().context("Failed to load configuration")?;
    let password = std::env::var("SEED_PASSWORD").unwrap_or_else(|_| "academy123".to_string());

    println!("Connecting to database...");
    let db = academy_db::connect(&config.database.url, 2, 1)
        .await
        .context("Failed to connect to database")?;

    println!("Seeding users...");
    let teachers = seed_users(&db, &password).await?;

    println!("Seeding courses...");
    let courses = seed_courses(&db).await?;

    println!("Seeding periods...");
    seed_periods(&db, &courses, &teachers).await?;

    println!("Seeding complete!");
    Ok(())
}

/// Seeds the accounts and returns the teachers' IDs.
async fn seed_users(db: &DatabaseConnection, password: &str) -> Result<Vec<Uuid>> {
    let repo = UserRepository::new(db.clone());
    let password_hash = hash_password(password).context("Failed to hash seed password")?;
    let mut teachers = Vec::new();

    for seed in USERS {
        let user: users::Model = if let Some(existing) = repo.find_by_email(seed.email).await? {
            println!("  {} already exists, skipping...", seed.email);
            existing
        } else {
            let user = repo
                .create(NewUser {
                    email: seed.email.to_string(),
                    password_hash: password_hash.clone(),
                    first_name: seed.first_name.to_string(),
                    last_name: seed.last_name.to_string(),
                    document_number: seed.document_number.to_string(),
                    phone: None,
                    role: seed.role,
                })
                .await
                .with_context(|| format!("Failed to insert {}", seed.email))?;
            println!("  Created {} ({})", user.email, seed.role);
            user
        };

        if seed.role == UserRole::Teacher {
            teachers.push(user.id);
        }
    }

    Ok(teachers)
}

async fn seed_courses(db: &DatabaseConnection) -> Result<Vec<courses::Model>> {
    let repo = CourseRepository::new(db.clone());

    for seed in COURSES {
        let draft = CourseDraft {
            code: seed.code.to_string(),
            name: seed.name.to_string(),
            description: None,
            duration_weeks: seed.weeks,
            level: seed.level,
            price: Decimal::new(seed.price_cents, 2),
            max_capacity: seed.max_capacity,
        };
        match repo.create(draft).await {
            Ok(course) => println!("  Created course {} at {}", course.code, course.price),
            Err(CatalogError::DuplicateCode(code)) => {
                println!("  Course {code} already exists, skipping...");
            }
            Err(e) => return Err(e).context("Failed to insert course"),
        }
    }

    Ok(repo.list(false).await?)
}

/// One open period per course, plus a planned one for the first course.
async fn seed_periods(
    db: &DatabaseConnection,
    courses: &[courses::Model],
    teachers: &[Uuid],
) -> Result<()> {
    let repo = PeriodRepository::new(db.clone());
    let start = NaiveDate::from_ymd_opt(2025, 3, 3).context("invalid start date")?;
    let end = NaiveDate::from_ymd_opt(2025, 6, 27).context("invalid end date")?;
    let next_start = NaiveDate::from_ymd_opt(2025, 7, 7).context("invalid start date")?;
    let next_end = NaiveDate::from_ymd_opt(2025, 10, 31).context("invalid end date")?;

    for (index, course) in courses.iter().enumerate() {
        let existing = repo
            .list(PeriodFilter {
                course_id: Some(course.id),
                status: None,
            })
            .await?;
        if !existing.is_empty() {
            println!("  Periods for {} already exist, skipping...", course.code);
            continue;
        }

        let teacher_ids = teachers
            .get(index % teachers.len().max(1))
            .copied()
            .into_iter()
            .collect();
        let open = repo
            .create(PeriodDraft {
                course_id: course.id,
                code: format!("{}-2025A", course.code),
                name: format!("{} - first term", course.name),
                start_date: start,
                end_date: end,
                schedule: Some("Mon-Wed 18:00-21:00".to_string()),
                notes: None,
                capacity: None,
                teacher_ids,
            })
            .await?;
        repo.update_status(open.period.id, PeriodStatus::InProgress)
            .await?;
        println!("  Created period {} (in progress)", open.period.code);

        if index == 0 {
            let planned = repo
                .create(PeriodDraft {
                    course_id: course.id,
                    code: format!("{}-2025B", course.code),
                    name: format!("{} - second term", course.name),
                    start_date: next_start,
                    end_date: next_end,
                    schedule: Some("Tue-Thu 09:00-12:00".to_string()),
                    notes: None,
                    capacity: Some(course.max_capacity / 2),
                    teacher_ids: Vec::new(),
                })
                .await?;
            println!("  Created period {} (planned)", planned.period.code);
        }
    }

    Ok(())
}
