//! Demo family seed script
//!
//! Seeds a demo family group with sample data:
//! - 2 users: an owner and a member, with display profiles
//! - Family group "The Demo Family" with a fixed invite code
//! - A handful of events, budget categories and transactions
//! - Grocery list items, a weekly meal plan, one savings goal
//! - A "General" message board with a few messages
//!
//! Usage:
//!   DATABASE_URL=... ./seed-demo --password Demo2024!

use anyhow::{Context, Result};
use chrono::{Duration, Utc};
use clap::Parser;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::env;
use uuid::Uuid;

use homeboard_api::models::family::{FamilyRole, NewFamilyGroup, NewFamilyMember};
use homeboard_api::services::family::FamilyStore;
use homeboard_api::db::family_store::PgFamilyStore;

#[derive(Parser)]
#[command(about = "Seed a demo family with sample data")]
struct Args {
    /// Password for the demo accounts
    #[arg(long, default_value = "Demo2024!")]
    password: String,

    /// Invite code assigned to the demo family
    #[arg(long, default_value = "DEMO01")]
    invite_code: String,
}

const OWNER_EMAIL: &str = "demo-owner@homeboard.local";
const MEMBER_EMAIL: &str = "demo-member@homeboard.local";

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    let database_url = env::var("DATABASE_URL").context("DATABASE_URL required")?;

    println!("=== Seed Demo Family ===");

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await
        .context("Failed to connect to database")?;

    println!("Cleaning existing demo data...");
    clean(&pool).await?;

    println!("Creating demo users...");
    let hash = bcrypt::hash(&args.password, bcrypt::DEFAULT_COST)?;
    let owner = create_user(&pool, OWNER_EMAIL, &hash, "#9b87f5", "🦊").await?;
    let member = create_user(&pool, MEMBER_EMAIL, &hash, "#f59e0b", "🐻").await?;

    println!("Creating demo family...");
    let store = PgFamilyStore::new(pool.clone());
    let family = store
        .insert_group(&NewFamilyGroup {
            name: "The Demo Family".into(),
            owner_id: owner,
            invite_code: args.invite_code.to_ascii_uppercase(),
        })
        .await
        .context("Failed to insert demo family")?;
    store
        .insert_member(&NewFamilyMember {
            family_id: family.id,
            user_id: owner,
            role: FamilyRole::Owner,
        })
        .await
        .context("Failed to insert owner membership")?;
    store
        .insert_member(&NewFamilyMember {
            family_id: family.id,
            user_id: member,
            role: FamilyRole::Member,
        })
        .await
        .context("Failed to insert member membership")?;

    println!("Seeding events...");
    let now = Utc::now();
    for (title, offset_days) in [
        ("Dentist appointment", 2i64),
        ("Soccer practice", 4),
        ("Grandma's birthday dinner", 9),
    ] {
        sqlx::query(
            "INSERT INTO events (family_id, title, start_at, created_by)
             VALUES ($1, $2, $3, $4)",
        )
        .bind(family.id)
        .bind(title)
        .bind(now + Duration::days(offset_days))
        .bind(owner)
        .execute(&pool)
        .await?;
    }

    println!("Seeding budget...");
    let groceries: Uuid = sqlx::query_scalar(
        "INSERT INTO budget_categories (family_id, name, monthly_budget)
         VALUES ($1, 'Groceries', 600) RETURNING id",
    )
    .bind(family.id)
    .fetch_one(&pool)
    .await?;
    sqlx::query(
        "INSERT INTO budget_categories (family_id, name, monthly_budget)
         VALUES ($1, 'Utilities', 250)",
    )
    .bind(family.id)
    .execute(&pool)
    .await?;
    sqlx::query(
        "INSERT INTO transactions
           (family_id, user_id, category_id, description, amount, kind, occurred_on)
         VALUES
           ($1, $2, NULL, 'Paycheck', 3200, 'income', CURRENT_DATE - 7),
           ($1, $2, $3, 'Weekly groceries', 142.50, 'expense', CURRENT_DATE - 3),
           ($1, $4, $3, 'Farmers market', 36.20, 'expense', CURRENT_DATE - 1)",
    )
    .bind(family.id)
    .bind(owner)
    .bind(groceries)
    .bind(member)
    .execute(&pool)
    .await?;

    println!("Seeding shopping list...");
    for (name, category) in [("Milk", "Dairy"), ("Bread", "Bakery"), ("Apples", "Produce")] {
        sqlx::query(
            "INSERT INTO shopping_items (family_id, list, category, name, created_by)
             VALUES ($1, 'grocery', $2, $3, $4)",
        )
        .bind(family.id)
        .bind(category)
        .bind(name)
        .bind(owner)
        .execute(&pool)
        .await?;
    }

    println!("Seeding meal plan...");
    for (day, meal_type, name) in [
        (1i16, "dinner", "Spaghetti bolognese"),
        (2, "dinner", "Taco night"),
        (3, "breakfast", "Pancakes"),
    ] {
        sqlx::query(
            "INSERT INTO meal_plan (family_id, day_of_week, meal_type, name, updated_by)
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(family.id)
        .bind(day)
        .bind(meal_type)
        .bind(name)
        .bind(owner)
        .execute(&pool)
        .await?;
    }

    println!("Seeding goals...");
    let goal: Uuid = sqlx::query_scalar(
        "INSERT INTO goals (family_id, name, description, goal_type, target, created_by)
         VALUES ($1, 'Summer vacation fund', 'Two weeks at the lake', 'money', 2500, $2)
         RETURNING id",
    )
    .bind(family.id)
    .bind(owner)
    .fetch_one(&pool)
    .await?;
    sqlx::query(
        "INSERT INTO goal_contributions (goal_id, user_id, amount)
         VALUES ($1, $2, 200), ($1, $3, 150)",
    )
    .bind(goal)
    .bind(owner)
    .bind(member)
    .execute(&pool)
    .await?;

    println!("Seeding message board...");
    let board: Uuid = sqlx::query_scalar(
        "INSERT INTO message_boards (family_id, name, created_by)
         VALUES ($1, 'General', $2) RETURNING id",
    )
    .bind(family.id)
    .bind(owner)
    .fetch_one(&pool)
    .await?;
    for (author, content) in [
        (owner, "Welcome to the family board!"),
        (member, "Don't forget the dentist on Thursday."),
    ] {
        sqlx::query("INSERT INTO messages (board_id, user_id, content) VALUES ($1, $2, $3)")
            .bind(board)
            .bind(author)
            .bind(content)
            .execute(&pool)
            .await?;
    }

    println!("Done.");
    println!("  Owner login:  {OWNER_EMAIL} / {}", args.password);
    println!("  Member login: {MEMBER_EMAIL} / {}", args.password);
    println!("  Invite code:  {}", family.invite_code);

    Ok(())
}

async fn clean(pool: &PgPool) -> Result<()> {
    // family_groups cascades to all family-scoped tables
    sqlx::query(
        "DELETE FROM family_groups WHERE owner_id IN (SELECT id FROM users WHERE email = ANY($1))",
    )
    .bind(vec![OWNER_EMAIL.to_string(), MEMBER_EMAIL.to_string()])
    .execute(pool)
    .await?;
    sqlx::query("DELETE FROM users WHERE email = ANY($1)")
        .bind(vec![OWNER_EMAIL.to_string(), MEMBER_EMAIL.to_string()])
        .execute(pool)
        .await?;
    Ok(())
}

async fn create_user(
    pool: &PgPool,
    email: &str,
    password_hash: &str,
    color: &str,
    emoji: &str,
) -> Result<Uuid> {
    let id: Uuid = sqlx::query_scalar(
        "INSERT INTO users (email, password_hash) VALUES ($1, $2) RETURNING id",
    )
    .bind(email)
    .bind(password_hash)
    .fetch_one(pool)
    .await?;
    sqlx::query("INSERT INTO profiles (user_id, color, emoji) VALUES ($1, $2, $3)")
        .bind(id)
        .bind(color)
        .bind(emoji)
        .execute(pool)
        .await?;
    Ok(id)
}
