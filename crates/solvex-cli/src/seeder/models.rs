//! Seed rows and seeding configuration.

use solvex_models::OpportunityType;

/// A student or professor row; both tables share these columns.
pub struct AccountSeed {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password_hash: String,
}

pub struct OpportunitySeed {
    pub professor_id: i64,
    pub name: String,
    pub details: String,
    pub requirements: String,
    pub reward: String,
    pub opportunity_type: OpportunityType,
}

#[derive(Clone)]
pub struct SeedConfig {
    pub num_professors: usize,
    pub opportunities_per_professor: usize,
    pub num_students: usize,
    /// Starting balance for every seeded student.
    pub starting_coins: i64,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            num_professors: 10,
            opportunities_per_professor: 3,
            num_students: 200,
            starting_coins: 0,
        }
    }
}

impl SeedConfig {
    pub fn new(num_professors: usize) -> Self {
        Self {
            num_professors,
            ..Default::default()
        }
    }

    pub fn with_students(mut self, num_students: usize) -> Self {
        self.num_students = num_students;
        self
    }

    pub fn with_opportunities(mut self, per_professor: usize) -> Self {
        self.opportunities_per_professor = per_professor;
        self
    }

    pub fn with_starting_coins(mut self, amount: i64) -> Self {
        self.starting_coins = amount;
        self
    }

    pub fn total_opportunities(&self) -> usize {
        self.num_professors * self.opportunities_per_professor
    }
}
