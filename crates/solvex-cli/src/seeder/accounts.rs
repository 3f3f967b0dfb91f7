//! Student and professor seeding.
//!
//! Seeded accounts all use `@example.com` addresses so `clear-seed` can
//! find them again.

use fake::Fake;
use fake::faker::name::en::*;
use rayon::prelude::*;
use sqlx::{PgPool, Postgres, Transaction};
use std::time::Instant;

use super::models::AccountSeed;

pub const SEED_EMAIL_DOMAIN: &str = "example.com";

#[derive(Clone, Copy, Debug)]
pub enum AccountKind {
    Student,
    Professor,
}

impl AccountKind {
    fn table(self) -> &'static str {
        match self {
            AccountKind::Student => "students",
            AccountKind::Professor => "professors",
        }
    }

    fn label(self) -> &'static str {
        match self {
            AccountKind::Student => "student",
            AccountKind::Professor => "professor",
        }
    }
}

/// Generates account rows in parallel. Emails are unique within one run
/// through the index suffix.
pub fn generate_accounts(kind: AccountKind, count: usize, password_hash: &str) -> Vec<AccountSeed> {
    (0..count)
        .into_par_iter()
        .map(|idx| {
            let first_name: String = FirstName().fake();
            let last_name: String = LastName().fake();

            let email = format!(
                "{}.{}+{}{}@{}",
                first_name.to_lowercase(),
                last_name.to_lowercase(),
                kind.label(),
                idx,
                SEED_EMAIL_DOMAIN
            );

            AccountSeed {
                first_name,
                last_name,
                email,
                password_hash: password_hash.to_string(),
            }
        })
        .collect()
}

pub async fn seed_accounts(
    db: &PgPool,
    kind: AccountKind,
    count: usize,
    password_hash: &str,
) -> Result<Vec<i64>, Box<dyn std::error::Error>> {
    let start_time = Instant::now();
    match kind {
        AccountKind::Student => println!("🎓 Seeding {} students...", count),
        AccountKind::Professor => println!("👩‍🏫 Seeding {} professors...", count),
    }

    let accounts = generate_accounts(kind, count, password_hash);
    let ids = insert_accounts_batch(db, kind, &accounts).await?;

    println!(
        "   ✓ Inserted {} {}s in {:?}",
        ids.len(),
        kind.label(),
        start_time.elapsed()
    );

    Ok(ids)
}

/// Inserts accounts with multi-row INSERT statements inside one transaction.
/// Existing live emails are skipped.
pub async fn insert_accounts_batch(
    db: &PgPool,
    kind: AccountKind,
    accounts: &[AccountSeed],
) -> Result<Vec<i64>, Box<dyn std::error::Error>> {
    let mut tx = db.begin().await?;

    // 4 params per account
    const BATCH_SIZE: usize = 1000;
    let mut all_ids = Vec::with_capacity(accounts.len());

    for chunk in accounts.chunks(BATCH_SIZE) {
        let ids = insert_accounts_chunk(&mut tx, kind, chunk).await?;
        all_ids.extend(ids);
    }

    tx.commit().await?;
    Ok(all_ids)
}

async fn insert_accounts_chunk(
    tx: &mut Transaction<'_, Postgres>,
    kind: AccountKind,
    accounts: &[AccountSeed],
) -> Result<Vec<i64>, Box<dyn std::error::Error>> {
    if accounts.is_empty() {
        return Ok(Vec::new());
    }

    let mut query = format!(
        "INSERT INTO {} (first_name, last_name, email, password) VALUES ",
        kind.table()
    );

    for i in 0..accounts.len() {
        if i > 0 {
            query.push_str(", ");
        }
        let param_idx = i * 4;
        query.push_str(&format!(
            "(${}, ${}, ${}, ${})",
            param_idx + 1,
            param_idx + 2,
            param_idx + 3,
            param_idx + 4
        ));
    }

    query.push_str(" ON CONFLICT (email) WHERE deleted_at IS NULL DO NOTHING RETURNING id");

    let mut q = sqlx::query_scalar(&query);
    for account in accounts {
        q = q
            .bind(&account.first_name)
            .bind(&account.last_name)
            .bind(&account.email)
            .bind(&account.password_hash);
    }

    let ids: Vec<i64> = q.fetch_all(&mut **tx).await?;
    Ok(ids)
}

/// Gives every student a coins row, as sign-up does.
pub async fn insert_coins_batch(
    db: &PgPool,
    student_ids: &[i64],
    amount: i64,
) -> Result<(), Box<dyn std::error::Error>> {
    let start_time = Instant::now();
    println!("🪙 Creating coin balances for {} students...", student_ids.len());

    // UNNEST keeps this to a single statement regardless of count
    sqlx::query(
        "INSERT INTO coins (student_id, amount) SELECT id, $2 FROM UNNEST($1::BIGINT[]) AS id",
    )
    .bind(student_ids)
    .bind(amount)
    .execute(db)
    .await?;

    println!("   ✓ Created balances in {:?}", start_time.elapsed());

    Ok(())
}

/// Hard-deletes seeded accounts. Child rows go with them through the
/// foreign keys, notifications are removed explicitly.
pub async fn clear_accounts(
    db: &PgPool,
    kind: AccountKind,
) -> Result<u64, Box<dyn std::error::Error>> {
    let start_time = Instant::now();
    println!("🗑️  Clearing seeded {}s...", kind.label());

    let pattern = format!("%@{}", SEED_EMAIL_DOMAIN);
    let mut tx = db.begin().await?;

    sqlx::query(&format!(
        "DELETE FROM notifications WHERE recipient_role = $1
         AND recipient_id IN (SELECT id FROM {} WHERE email LIKE $2)",
        kind.table()
    ))
    .bind(kind.label())
    .bind(&pattern)
    .execute(&mut *tx)
    .await?;

    let result = sqlx::query(&format!("DELETE FROM {} WHERE email LIKE $1", kind.table()))
        .bind(&pattern)
        .execute(&mut *tx)
        .await?
        .rows_affected();

    tx.commit().await?;

    println!(
        "   ✓ Deleted {} {}s in {:?}",
        result,
        kind.label(),
        start_time.elapsed()
    );

    Ok(result)
}
