use clap::{Parser, Subcommand};
use dialoguer::{Input, Password};
use dotenvy::dotenv;
use solvex_cli::seeder::{self, SeedConfig};
use solvex_db::{PgPool, database_url_from_env, init_db_pool};

#[derive(Parser)]
#[command(name = "solvex-cli")]
#[command(about = "SolveX CLI - Administrative tools for SolveX", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a professor account without going through email verification
    CreateProfessor {
        /// First name of the professor
        #[arg(short = 'f', long)]
        first_name: Option<String>,

        /// Last name of the professor
        #[arg(short = 'l', long)]
        last_name: Option<String>,

        /// Email address
        #[arg(short = 'e', long)]
        email: Option<String>,

        /// Password (will be prompted securely if not provided)
        #[arg(short = 'p', long)]
        password: Option<String>,
    },
    /// Seed the database with fake tags, professors, opportunities and students
    Seed {
        /// Number of professors to create
        #[arg(short = 'p', long, default_value = "10")]
        professors: usize,

        /// Number of opportunities per professor
        #[arg(short = 'o', long, default_value = "3")]
        opportunities: usize,

        /// Number of students to create
        #[arg(short = 's', long, default_value = "200")]
        students: usize,

        /// Starting coin balance for each student
        #[arg(long, default_value = "0")]
        coins: i64,
    },
    /// Clear all seeded accounts and everything they own
    ClearSeed,
}

#[tokio::main]
async fn main() {
    dotenv().ok();

    let database_url = database_url_from_env().unwrap_or_else(|_| {
        eprintln!("❌ DATABASE_URL must be set");
        std::process::exit(1);
    });

    let pool = init_db_pool(&database_url).await.unwrap_or_else(|e| {
        eprintln!("❌ Failed to connect to database: {}", e);
        std::process::exit(1);
    });

    let cli = Cli::parse();

    match cli.command {
        Commands::CreateProfessor {
            first_name,
            last_name,
            email,
            password,
        } => handle_create_professor(&pool, first_name, last_name, email, password).await,
        Commands::Seed {
            professors,
            opportunities,
            students,
            coins,
        } => {
            let config = SeedConfig::new(professors)
                .with_opportunities(opportunities)
                .with_students(students)
                .with_starting_coins(coins);
            handle_seed(&pool, config).await
        }
        Commands::ClearSeed => handle_clear_seed(&pool).await,
    }
}

fn prompt(label: &str) -> String {
    Input::<String>::new()
        .with_prompt(label)
        .interact_text()
        .unwrap_or_else(|e| {
            eprintln!("❌ Failed to read {}: {}", label.to_lowercase(), e);
            std::process::exit(1);
        })
}

async fn handle_create_professor(
    pool: &PgPool,
    first_name: Option<String>,
    last_name: Option<String>,
    email: Option<String>,
    password: Option<String>,
) {
    let first_name = first_name.unwrap_or_else(|| prompt("First name"));
    let last_name = last_name.unwrap_or_else(|| prompt("Last name"));
    let email = email.unwrap_or_else(|| prompt("Email address"));

    let password = password.unwrap_or_else(|| {
        Password::new()
            .with_prompt("Password")
            .with_confirmation("Confirm password", "Passwords don't match")
            .interact()
            .unwrap_or_else(|e| {
                eprintln!("❌ Failed to read password: {}", e);
                std::process::exit(1);
            })
    });

    match create_professor(pool, &first_name, &last_name, &email, &password).await {
        Ok(id) => {
            println!("\n✅ Professor created successfully!");
            println!("   ID: {}", id);
            println!("   Email: {}", solvex_models::normalize_email(&email));
            println!("   Name: {} {}", first_name, last_name);
        }
        Err(e) => {
            eprintln!("\n❌ Error creating professor: {}", e);
            std::process::exit(1);
        }
    }
}

async fn handle_seed(pool: &PgPool, config: SeedConfig) {
    if let Err(e) = seeder::seed_all(pool, config).await {
        eprintln!("\n❌ Error seeding database: {}", e);
        std::process::exit(1);
    }
}

async fn handle_clear_seed(pool: &PgPool) {
    if let Err(e) = seeder::clear_all(pool).await {
        eprintln!("\n❌ Error clearing seeded data: {}", e);
        std::process::exit(1);
    }
}

async fn create_professor(
    db: &PgPool,
    first_name: &str,
    last_name: &str,
    email: &str,
    password: &str,
) -> Result<i64, Box<dyn std::error::Error>> {
    use solvex_core::hash_password;

    if password.len() < 8 {
        return Err("Password must be at least 8 characters".into());
    }

    let hashed_password =
        hash_password(password).map_err(|e| format!("Failed to hash password: {}", e.error))?;

    let professor_id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO professors (first_name, last_name, email, password)
         VALUES ($1, $2, $3, $4)
         ON CONFLICT (email) WHERE deleted_at IS NULL DO NOTHING
         RETURNING id",
    )
    .bind(first_name.trim())
    .bind(last_name.trim())
    .bind(solvex_models::normalize_email(email))
    .bind(&hashed_password)
    .fetch_optional(db)
    .await?;

    professor_id.ok_or_else(|| "Professor with this email already exists".into())
}
