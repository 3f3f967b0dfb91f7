//! Database seeding.
//!
//! Generation runs on the rayon pool; inserts are batched multi-row
//! statements inside one transaction per table. Every seeded account shares
//! the password printed at the end of [`seed_all`].

pub mod accounts;
pub mod models;
pub mod opportunities;

use solvex_core::hash_password;
use sqlx::PgPool;
use std::time::Instant;

pub use accounts::AccountKind;
pub use models::SeedConfig;

pub const SEED_PASSWORD: &str = "password123";

fn seed_password_hash() -> Result<String, Box<dyn std::error::Error>> {
    hash_password(SEED_PASSWORD)
        .map_err(|e| format!("Failed to hash password: {}", e.error).into())
}

pub async fn seed_all(db: &PgPool, config: SeedConfig) -> Result<(), Box<dyn std::error::Error>> {
    let start_time = Instant::now();
    println!("🌱 Starting database seed...\n");

    let password_hash = seed_password_hash()?;

    let tag_ids = opportunities::seed_tags(db).await?;

    let professor_ids =
        accounts::seed_accounts(db, AccountKind::Professor, config.num_professors, &password_hash)
            .await?;

    let opportunity_ids = opportunities::seed_opportunities(
        db,
        &professor_ids,
        config.opportunities_per_professor,
        &tag_ids,
    )
    .await?;

    let student_ids =
        accounts::seed_accounts(db, AccountKind::Student, config.num_students, &password_hash)
            .await?;
    accounts::insert_coins_batch(db, &student_ids, config.starting_coins).await?;

    println!("\n✅ Seeding complete in {:?}", start_time.elapsed());
    println!("   Tags: {}", tag_ids.len());
    println!("   Professors: {}", professor_ids.len());
    println!("   Opportunities: {}", opportunity_ids.len());
    println!("   Students: {}", student_ids.len());
    println!("   Password for all seeded accounts: {}", SEED_PASSWORD);

    Ok(())
}

/// Removes seeded students and professors. Tags are shared vocabulary and
/// stay.
pub async fn clear_all(db: &PgPool) -> Result<(), Box<dyn std::error::Error>> {
    let start_time = Instant::now();
    println!("🧹 Clearing seeded data...\n");

    let students = accounts::clear_accounts(db, AccountKind::Student).await?;
    let professors = accounts::clear_accounts(db, AccountKind::Professor).await?;

    println!(
        "\n✅ Cleared {} students and {} professors in {:?}",
        students,
        professors,
        start_time.elapsed()
    );

    Ok(())
}
