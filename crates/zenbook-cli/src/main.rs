use anyhow::{Context, anyhow, bail};
use clap::{Parser, Subcommand};
use dialoguer::{Input, Password};
use dotenvy::dotenv;
use sqlx::PgPool;
use zenbook_cli::seeder::{self, SeedConfig};
use zenbook_core::hash_password;
use zenbook_models::{Email, TeacherId, UserId};

#[derive(Parser)]
#[command(name = "zenbook-cli")]
#[command(about = "Zenbook CLI - Administrative tools for the studio API", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an administrator account
    CreateAdmin {
        /// First name of the admin
        #[arg(short = 'f', long)]
        first_name: Option<String>,

        /// Last name of the admin
        #[arg(short = 'l', long)]
        last_name: Option<String>,

        /// Email address
        #[arg(short = 'e', long)]
        email: Option<String>,

        /// Password (will be prompted securely if not provided)
        #[arg(short = 'p', long)]
        password: Option<String>,
    },
    /// Add a teacher who can lead sessions
    AddTeacher {
        /// First name of the teacher
        #[arg(short = 'f', long)]
        first_name: Option<String>,

        /// Last name of the teacher
        #[arg(short = 'l', long)]
        last_name: Option<String>,
    },
    /// Seed the database with fake members and sessions
    Seed {
        /// Number of members to create
        #[arg(short = 'u', long, default_value = "50")]
        users: usize,

        /// Number of sessions to create
        #[arg(short = 's', long, default_value = "20")]
        sessions: usize,

        /// Maximum participants per session
        #[arg(long, default_value = "12")]
        max_participants: usize,
    },
    /// Clear all seeded members and sessions
    ClearSeed,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;

    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await
        .context("Failed to connect to database")?;

    let cli = Cli::parse();

    match cli.command {
        Commands::CreateAdmin {
            first_name,
            last_name,
            email,
            password,
        } => handle_create_admin(&pool, first_name, last_name, email, password).await,
        Commands::AddTeacher {
            first_name,
            last_name,
        } => handle_add_teacher(&pool, first_name, last_name).await,
        Commands::Seed {
            users,
            sessions,
            max_participants,
        } => {
            let config = SeedConfig::new(users)
                .with_sessions(sessions)
                .with_max_participants(max_participants);
            seeder::seed_all(&pool, config).await
        }
        Commands::ClearSeed => seeder::clear_all(&pool).await,
    }
}

fn prompt_or(value: Option<String>, prompt: &str) -> anyhow::Result<String> {
    match value {
        Some(value) => Ok(value),
        None => Input::new()
            .with_prompt(prompt)
            .interact_text()
            .with_context(|| format!("Failed to read {}", prompt.to_lowercase())),
    }
}

async fn handle_create_admin(
    pool: &PgPool,
    first_name: Option<String>,
    last_name: Option<String>,
    email: Option<String>,
    password: Option<String>,
) -> anyhow::Result<()> {
    let first_name = prompt_or(first_name, "First name")?;
    let last_name = prompt_or(last_name, "Last name")?;
    let email = Email::new(Email::normalize(&prompt_or(email, "Email address")?))?;

    let password = match password {
        Some(password) => password,
        None => Password::new()
            .with_prompt("Password")
            .with_confirmation("Confirm password", "Passwords don't match")
            .interact()
            .context("Failed to read password")?,
    };

    let user_id = create_admin(pool, &first_name, &last_name, &email, &password).await?;

    println!("\n✅ Admin created successfully!");
    println!("   Id: {}", user_id);
    println!("   Email: {}", email);
    println!("   Name: {} {}", first_name, last_name);
    Ok(())
}

async fn create_admin(
    db: &PgPool,
    first_name: &str,
    last_name: &str,
    email: &Email,
    password: &str,
) -> anyhow::Result<UserId> {
    let hashed_password =
        hash_password(password).map_err(|e| anyhow!("Failed to hash password: {}", e.error))?;

    let user_id: Option<UserId> = sqlx::query_scalar(
        "INSERT INTO users (first_name, last_name, email, password, admin)
         VALUES ($1, $2, $3, $4, TRUE)
         ON CONFLICT DO NOTHING
         RETURNING id",
    )
    .bind(first_name)
    .bind(last_name)
    .bind(email)
    .bind(&hashed_password)
    .fetch_optional(db)
    .await
    .context("Failed to insert admin")?;

    match user_id {
        Some(id) => Ok(id),
        None => bail!("User with this email already exists"),
    }
}

async fn handle_add_teacher(
    pool: &PgPool,
    first_name: Option<String>,
    last_name: Option<String>,
) -> anyhow::Result<()> {
    let first_name = prompt_or(first_name, "First name")?;
    let last_name = prompt_or(last_name, "Last name")?;

    let teacher_id: TeacherId = sqlx::query_scalar(
        "INSERT INTO teachers (first_name, last_name) VALUES ($1, $2) RETURNING id",
    )
    .bind(&first_name)
    .bind(&last_name)
    .fetch_one(pool)
    .await
    .context("Failed to insert teacher")?;

    println!("\n✅ Teacher {} {} added with id {}", first_name, last_name, teacher_id);
    Ok(())
}
