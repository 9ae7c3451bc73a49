use anyhow::Context;
use rand::seq::IndexedRandom;
use rand::Rng;
use serde::Serialize;
use std::sync::Arc;

use crate::auth::{Argon2Hasher, PasswordHasher};
use crate::cli::OutputFormat;
use crate::config::AppConfig;
use crate::database::models::{NewUser, User};
use crate::database::{connect, ensure_schema, NoteStore, PgNoteStore, PgUserStore, UserStore};

pub const SAMPLE_PASSWORD: &str = "password123";

const SAMPLE_USERS: &[(&str, &str)] = &[
    ("John Doe", "john@example.com"),
    ("Jane Smith", "jane@example.com"),
    ("Bob Johnson", "bob@example.com"),
    ("Alice Brown", "alice@example.com"),
    ("Charlie Wilson", "charlie@example.com"),
];

const SAMPLE_TITLES: &[&str] = &[
    "Meeting Notes",
    "Project Ideas",
    "Shopping List",
    "Book Recommendations",
    "Travel Plans",
    "Recipe Collection",
    "Workout Routine",
    "Learning Goals",
    "Daily Reflections",
    "Code Snippets",
    "Business Ideas",
    "Movie Watchlist",
    "Gift Ideas",
    "Home Improvement",
    "Financial Planning",
];

const SAMPLE_CONTENTS: &[&str] = &[
    "A few loose thoughts to come back to later.",
    "Lorem ipsum dolor sit amet, consectetur adipiscing elit. Sed do eiusmod tempor incididunt ut labore.",
    "Things to remember:\n1. First point\n2. Second point\n3. Third point",
    "Agenda:\n- Review last week\n- Discuss new features\n- Plan next sprint",
    "Weekend:\n- Visit the museum\n- Try a new restaurant\n- Go for a hike",
    "Technical:\n- Propagate errors\n- Add logging\n- Write tests",
    "Goals:\n- Read more books\n- Exercise regularly\n- Learn a new skill",
    "Shopping:\n- Groceries\n- Office supplies\n- Birthday gift",
    "Travel checklist:\n- Book flights\n- Reserve hotel\n- Check weather",
    "End of day notes on work and personal projects.",
];

#[derive(Debug, Default, Serialize)]
pub struct SeedSummary {
    pub users_created: usize,
    pub users_skipped: usize,
    pub notes_created: usize,
    pub total_users: i64,
    pub total_notes: i64,
}

/// Random (title, content) pairs for one user, 3 to 7 of them.
fn sample_notes() -> Vec<(String, String)> {
    let mut rng = rand::rng();
    let count = rng.random_range(3..=7);

    (0..count)
        .map(|_| {
            let title = SAMPLE_TITLES.choose(&mut rng).copied().unwrap_or("Note");
            let content = SAMPLE_CONTENTS.choose(&mut rng).copied().unwrap_or("Empty");
            let title = if rng.random_bool(0.3) {
                format!("{} {}", title, rng.random_range(0..100))
            } else {
                title.to_string()
            };
            (title, content.to_string())
        })
        .collect()
}

/// Insert the sample users (skipping existing emails) and a handful of notes each.
pub async fn seed(
    users: &dyn UserStore,
    notes: &dyn NoteStore,
    passwords: &dyn PasswordHasher,
) -> anyhow::Result<SeedSummary> {
    let mut summary = SeedSummary::default();
    let mut seeded: Vec<User> = Vec::with_capacity(SAMPLE_USERS.len());

    for (name, email) in SAMPLE_USERS {
        if let Some(existing) = users.find_by_email(email).await? {
            tracing::info!("User {} already exists, skipping", email);
            summary.users_skipped += 1;
            seeded.push(existing);
            continue;
        }

        let user = users
            .create(NewUser {
                name: name.to_string(),
                email: email.to_string(),
                password_hash: passwords.hash(SAMPLE_PASSWORD)?,
            })
            .await
            .with_context(|| format!("failed to create user {}", email))?;
        tracing::info!("Created user {} ({})", user.name, user.email);
        summary.users_created += 1;
        seeded.push(user);
    }

    for user in &seeded {
        let planned = sample_notes();
        for (title, content) in &planned {
            notes
                .create(user.id, title, content)
                .await
                .with_context(|| format!("failed to create note for {}", user.email))?;
        }
        tracing::info!("Created {} notes for {}", planned.len(), user.email);
        summary.notes_created += planned.len();
    }

    summary.total_users = users.count().await?;
    summary.total_notes = notes.count().await?;
    Ok(summary)
}

pub async fn handle(config: AppConfig, output_format: OutputFormat) -> anyhow::Result<()> {
    let pool = connect(&config.database).await?;
    ensure_schema(&pool).await?;

    let users = PgUserStore::new(pool.clone());
    let notes = PgNoteStore::new(pool);
    let passwords = Arc::new(Argon2Hasher::new());

    let summary = seed(&users, &notes, passwords.as_ref()).await?;

    match output_format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&summary)?),
        OutputFormat::Text => {
            println!("Seeding completed");
            println!("Total users: {}", summary.total_users);
            println!("Total notes: {}", summary.total_notes);
            println!("\nSample login credentials:");
            for (_, email) in SAMPLE_USERS {
                println!("Email: {}, Password: {}", email, SAMPLE_PASSWORD);
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::NoteQuery;
    use crate::database::MemoryStore;

    fn cheap_hasher() -> Argon2Hasher {
        Argon2Hasher::with_params(argon2::Params::MIN_M_COST, 1, 1).unwrap()
    }

    #[test]
    fn test_sample_notes_bounds() {
        for _ in 0..20 {
            let planned = sample_notes();
            assert!((3..=7).contains(&planned.len()));
            assert!(planned.iter().all(|(t, c)| !t.is_empty() && !c.is_empty()));
        }
    }

    #[tokio::test]
    async fn test_seed_is_idempotent_for_users() {
        let store = MemoryStore::new();
        let hasher = cheap_hasher();

        let first = seed(&store, &store, &hasher).await.unwrap();
        assert_eq!(first.users_created, 5);
        assert_eq!(first.total_users, 5);
        assert!((15..=35).contains(&first.notes_created));

        let second = seed(&store, &store, &hasher).await.unwrap();
        assert_eq!(second.users_created, 0);
        assert_eq!(second.users_skipped, 5);
        assert_eq!(second.total_users, 5);

        let jane = UserStore::find_by_email(&store, "jane@example.com")
            .await
            .unwrap()
            .unwrap();
        assert!(hasher.verify(SAMPLE_PASSWORD, &jane.password_hash));

        let page = NoteStore::list(&store, jane.id, &NoteQuery::default()).await.unwrap();
        assert!(page.total >= 6);
    }
}
