use anyhow::Context;
use clap::{Parser, Subcommand};
use dialoguer::{Input, Password, Select};
use dotenvy::dotenv;
use schoolhub_cli::admin::{self, NewAdmin};
use schoolhub_cli::seeder::{self, SeedConfig};
use schoolhub_config::DatabaseConfig;
use schoolhub_db::{PgPool, init_db_pool};
use schoolhub_models::Gender;

#[derive(Parser)]
#[command(name = "schoolhub-cli")]
#[command(about = "SchoolHub CLI - Administrative tools for SchoolHub", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a teacher account with the admin role
    CreateAdmin {
        #[arg(short = 'f', long)]
        first_name: Option<String>,

        #[arg(short = 'l', long)]
        last_name: Option<String>,

        #[arg(short = 'e', long)]
        email: Option<String>,

        /// male or female
        #[arg(short = 'g', long)]
        gender: Option<String>,

        /// Password (will be prompted securely if not provided)
        #[arg(short = 'p', long)]
        password: Option<String>,
    },
    /// Seed the database with fake teachers, students, courses and enrollments
    Seed {
        #[arg(short = 't', long, default_value = "8")]
        teachers: usize,

        #[arg(short = 's', long, default_value = "120")]
        students: usize,

        /// Courses owned by each seeded teacher
        #[arg(long, default_value = "2")]
        courses_per_teacher: usize,

        /// Enrollments per student, capped by course capacity
        #[arg(long, default_value = "3")]
        enrollments: usize,
    },
    /// Remove everything created by `seed`
    ClearSeed,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let cli = Cli::parse();

    let pool = init_db_pool(&DatabaseConfig::from_env())
        .await
        .context("Failed to connect to database")?;

    match cli.command {
        Commands::CreateAdmin {
            first_name,
            last_name,
            email,
            gender,
            password,
        } => handle_create_admin(&pool, first_name, last_name, email, gender, password).await,
        Commands::Seed {
            teachers,
            students,
            courses_per_teacher,
            enrollments,
        } => {
            let config = SeedConfig::new(teachers)
                .with_students(students)
                .with_courses_per_teacher(courses_per_teacher)
                .with_enrollments_per_student(enrollments);

            seeder::seed_all(&pool, config)
                .await
                .context("Error seeding database")
        }
        Commands::ClearSeed => seeder::clear_all(&pool)
            .await
            .context("Error clearing seeded data"),
    }
}

fn prompt(value: Option<String>, label: &str) -> anyhow::Result<String> {
    match value {
        Some(value) => Ok(value),
        None => Input::new()
            .with_prompt(label)
            .interact_text()
            .with_context(|| format!("Failed to read {}", label.to_lowercase())),
    }
}

async fn handle_create_admin(
    pool: &PgPool,
    first_name: Option<String>,
    last_name: Option<String>,
    email: Option<String>,
    gender: Option<String>,
    password: Option<String>,
) -> anyhow::Result<()> {
    let first_name = prompt(first_name, "First name")?;
    let last_name = prompt(last_name, "Last name")?;
    let email = prompt(email, "Email address")?;

    let gender = match gender {
        Some(raw) => admin::parse_gender(&raw)?,
        None => {
            let choice = Select::new()
                .with_prompt("Gender")
                .items(&["male", "female"])
                .default(0)
                .interact()
                .context("Failed to read gender")?;
            if choice == 0 { Gender::Male } else { Gender::Female }
        }
    };

    let password = match password {
        Some(password) => password,
        None => Password::new()
            .with_prompt("Password")
            .with_confirmation("Confirm password", "Passwords don't match")
            .interact()
            .context("Failed to read password")?,
    };

    let id = admin::create_admin(
        pool,
        NewAdmin {
            first_name: &first_name,
            last_name: &last_name,
            email: &email,
            password: &password,
            gender,
        },
    )
    .await?;

    println!("\n✅ Admin created successfully!");
    println!("   ID: {}", id);
    println!("   Email: {}", email);
    println!("   Name: {} {}", first_name, last_name);

    Ok(())
}
