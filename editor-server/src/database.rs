//! Demo schema and sample data for `--demo`

use sqlx::sqlite::SqlitePool;
use tracing::info;

const DEMO_ARTISTS: u32 = 25;
const DEMO_ALBUMS: u32 = 350;

/// Create the demo `artists` and `albums` tables and fill them when empty
pub async fn seed_demo(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS artists (
            ArtistId INTEGER PRIMARY KEY AUTOINCREMENT,
            Name TEXT
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS albums (
            AlbumId INTEGER PRIMARY KEY AUTOINCREMENT,
            Title TEXT NOT NULL,
            ArtistId INTEGER NOT NULL REFERENCES artists(ArtistId)
        )
        "#,
    )
    .execute(pool)
    .await?;

    let album_count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM albums")
        .fetch_one(pool)
        .await?;

    if album_count.0 > 0 {
        // Data already seeded
        return Ok(());
    }

    let adjectives = [
        "Electric", "Silent", "Golden", "Broken", "Midnight", "Velvet", "Northern", "Hollow",
        "Crimson", "Wild",
    ];
    let nouns = [
        "Rivers", "Machines", "Horizons", "Echoes", "Gardens", "Engines", "Letters", "Storms",
        "Mirrors", "Satellites", "Harbors", "Lanterns",
    ];

    let mut transaction = pool.begin().await?;

    for index in 0..DEMO_ARTISTS {
        sqlx::query("INSERT INTO artists (Name) VALUES (?)")
            .bind(format!("Artist {}", index + 1))
            .execute(&mut *transaction)
            .await?;
    }

    for index in 0..DEMO_ALBUMS as usize {
        let adjective = adjectives[index % adjectives.len()];
        let noun = nouns[(index / adjectives.len()) % nouns.len()];
        let artist_id = (index as u32 % DEMO_ARTISTS) + 1;

        sqlx::query("INSERT INTO albums (Title, ArtistId) VALUES (?, ?)")
            .bind(format!("{} {} {}", adjective, noun, index + 1))
            .bind(artist_id)
            .execute(&mut *transaction)
            .await?;
    }

    transaction.commit().await?;

    info!(
        artists = DEMO_ARTISTS,
        albums = DEMO_ALBUMS,
        "Demo data seeded"
    );
    Ok(())
}
