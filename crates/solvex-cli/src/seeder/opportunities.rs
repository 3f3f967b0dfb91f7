//! Tag and opportunity seeding.

use fake::Fake;
use fake::faker::company::en::Buzzword;
use fake::faker::lorem::en::{Paragraph, Sentence};
use rayon::prelude::*;
use solvex_models::OpportunityType;
use sqlx::{PgPool, Postgres, Transaction};
use std::time::Instant;

use super::models::OpportunitySeed;

pub const DEFAULT_TAGS: &[&str] = &[
    "Machine Learning",
    "Data Science",
    "Web Development",
    "Mobile Development",
    "Cybersecurity",
    "Robotics",
    "Bioinformatics",
    "Distributed Systems",
    "Human-Computer Interaction",
    "Embedded Systems",
    "Computer Vision",
    "Quantum Computing",
];

const TAGS_PER_OPPORTUNITY: usize = 2;

/// Inserts the default tag vocabulary, keeping any that already exist, and
/// returns the ids of all of them.
pub async fn seed_tags(db: &PgPool) -> Result<Vec<i64>, Box<dyn std::error::Error>> {
    let start_time = Instant::now();
    println!("🏷️  Seeding {} tags...", DEFAULT_TAGS.len());

    let names: Vec<String> = DEFAULT_TAGS.iter().map(|t| t.to_string()).collect();

    sqlx::query(
        "INSERT INTO tags (name) SELECT name FROM UNNEST($1::TEXT[]) AS name
         ON CONFLICT (name) WHERE deleted_at IS NULL DO NOTHING",
    )
    .bind(&names)
    .execute(db)
    .await?;

    let ids: Vec<i64> = sqlx::query_scalar(
        "SELECT id FROM tags WHERE name = ANY($1) AND deleted_at IS NULL ORDER BY id",
    )
    .bind(&names)
    .fetch_all(db)
    .await?;

    println!("   ✓ {} tags ready in {:?}", ids.len(), start_time.elapsed());

    Ok(ids)
}

fn opportunity_type_for(idx: usize) -> OpportunityType {
    match idx % 3 {
        0 => OpportunityType::Research,
        1 => OpportunityType::Project,
        _ => OpportunityType::Internship,
    }
}

pub fn generate_opportunities(professor_ids: &[i64], per_professor: usize) -> Vec<OpportunitySeed> {
    professor_ids
        .par_iter()
        .flat_map(|&professor_id| {
            (0..per_professor)
                .map(|idx| {
                    let topic: String = Buzzword().fake();
                    let opportunity_type = opportunity_type_for(idx);

                    OpportunitySeed {
                        professor_id,
                        name: format!("{} {}", capitalize(&topic), opportunity_type),
                        details: Paragraph(2..4).fake(),
                        requirements: Sentence(6..12).fake(),
                        reward: format!("{} coins", (idx + 1) * 10),
                        opportunity_type,
                    }
                })
                .collect::<Vec<_>>()
        })
        .collect()
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub async fn seed_opportunities(
    db: &PgPool,
    professor_ids: &[i64],
    per_professor: usize,
    tag_ids: &[i64],
) -> Result<Vec<i64>, Box<dyn std::error::Error>> {
    let start_time = Instant::now();
    println!(
        "🔬 Seeding {} opportunities ({} per professor)...",
        professor_ids.len() * per_professor,
        per_professor
    );

    let opportunities = generate_opportunities(professor_ids, per_professor);

    let mut tx = db.begin().await?;

    // 6 params per opportunity
    const BATCH_SIZE: usize = 1000;
    let mut all_ids = Vec::with_capacity(opportunities.len());

    for chunk in opportunities.chunks(BATCH_SIZE) {
        let ids = insert_opportunities_chunk(&mut tx, chunk).await?;
        all_ids.extend(ids);
    }

    if !tag_ids.is_empty() {
        link_tags(&mut tx, &all_ids, tag_ids).await?;
    }

    tx.commit().await?;

    println!(
        "   ✓ Inserted {} opportunities in {:?}",
        all_ids.len(),
        start_time.elapsed()
    );

    Ok(all_ids)
}

async fn insert_opportunities_chunk(
    tx: &mut Transaction<'_, Postgres>,
    opportunities: &[OpportunitySeed],
) -> Result<Vec<i64>, Box<dyn std::error::Error>> {
    if opportunities.is_empty() {
        return Ok(Vec::new());
    }

    let mut query = String::from(
        "INSERT INTO opportunities (professor_id, name, details, requirements, reward, type) VALUES ",
    );

    for i in 0..opportunities.len() {
        if i > 0 {
            query.push_str(", ");
        }
        let param_idx = i * 6;
        query.push_str(&format!(
            "(${}, ${}, ${}, ${}, ${}, ${})",
            param_idx + 1,
            param_idx + 2,
            param_idx + 3,
            param_idx + 4,
            param_idx + 5,
            param_idx + 6
        ));
    }

    query.push_str(" RETURNING id");

    let mut q = sqlx::query_scalar(&query);
    for opportunity in opportunities {
        q = q
            .bind(opportunity.professor_id)
            .bind(&opportunity.name)
            .bind(&opportunity.details)
            .bind(&opportunity.requirements)
            .bind(&opportunity.reward)
            .bind(opportunity.opportunity_type.as_str());
    }

    let ids: Vec<i64> = q.fetch_all(&mut **tx).await?;
    Ok(ids)
}

/// Links each opportunity to a rotating pair of tags.
async fn link_tags(
    tx: &mut Transaction<'_, Postgres>,
    opportunity_ids: &[i64],
    tag_ids: &[i64],
) -> Result<(), Box<dyn std::error::Error>> {
    let (opportunities, tags): (Vec<i64>, Vec<i64>) = opportunity_ids
        .iter()
        .enumerate()
        .flat_map(|(i, &opportunity_id)| {
            (0..TAGS_PER_OPPORTUNITY.min(tag_ids.len()))
                .map(move |k| (opportunity_id, tag_ids[(i + k) % tag_ids.len()]))
        })
        .unzip();

    sqlx::query(
        "INSERT INTO opportunity_tags (opportunity_id, tag_id)
         SELECT * FROM UNNEST($1::BIGINT[], $2::BIGINT[])
         ON CONFLICT DO NOTHING",
    )
    .bind(&opportunities)
    .bind(&tags)
    .execute(&mut **tx)
    .await?;

    Ok(())
}
