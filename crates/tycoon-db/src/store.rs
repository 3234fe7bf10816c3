//! Save document persistence.
//!
//! A save is the whole [`GameState`] serialized as one JSON document and
//! written atomically under the player's id. There is no partial update:
//! each save replaces the previous one, so a load always observes a state
//! the game loop actually produced.
//!
//! Three backends share the same `save`/`load` surface:
//!
//! - **Memory**: a shared map, for tests and ephemeral servers.
//! - **File**: one `<player>.json` per player under a save directory,
//!   written via a temp file + rename so a crash mid-write never
//!   truncates an existing save.
//! - **Postgres**: one JSONB row per player, upserted.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use tycoon_types::{GameState, PlayerId};

use crate::error::StoreError;
use crate::postgres::PostgresPool;

/// A persisted save row, as stored in `PostgreSQL`.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct SaveRow {
    /// Owning player.
    pub player_id: Uuid,
    /// Full game state document.
    pub document: serde_json::Value,
    /// When this save was written.
    pub saved_at: DateTime<Utc>,
}

/// Gateway to save persistence.
///
/// Cloning is cheap: the memory backend shares its map and the Postgres
/// backend shares its pool.
#[derive(Debug, Clone)]
pub enum SaveStore {
    /// In-memory saves, lost on shutdown.
    Memory(Arc<RwLock<BTreeMap<PlayerId, GameState>>>),
    /// One JSON file per player under `dir`.
    File {
        /// Directory holding `<player>.json` files.
        dir: PathBuf,
    },
    /// One JSONB row per player in the `saves` table.
    Postgres(PostgresPool),
}

impl SaveStore {
    /// Create an in-memory store.
    pub fn memory() -> Self {
        Self::Memory(Arc::new(RwLock::new(BTreeMap::new())))
    }

    /// Create a file-backed store rooted at `dir`.
    ///
    /// The directory is created on first save, not here, so constructing
    /// a store never touches the filesystem.
    pub fn file(dir: impl Into<PathBuf>) -> Self {
        Self::File { dir: dir.into() }
    }

    /// Create a Postgres-backed store over an existing pool.
    pub const fn postgres(pool: PostgresPool) -> Self {
        Self::Postgres(pool)
    }

    /// Persist `state` as the player's current save, replacing any
    /// previous one.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if serialization, the filesystem write, or
    /// the database upsert fails.
    pub async fn save(&self, player: &PlayerId, state: &GameState) -> Result<(), StoreError> {
        match self {
            Self::Memory(saves) => {
                saves.write().await.insert(*player, state.clone());
                tracing::debug!(player = %player, "Saved game to memory");
                Ok(())
            }
            Self::File { dir } => save_to_file(dir, player, state).await,
            Self::Postgres(pool) => save_to_postgres(pool, player, state).await,
        }
    }

    /// Load the player's save, if one exists.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the read or deserialization fails. A
    /// missing save is `Ok(None)`, not an error.
    pub async fn load(&self, player: &PlayerId) -> Result<Option<GameState>, StoreError> {
        match self {
            Self::Memory(saves) => Ok(saves.read().await.get(player).cloned()),
            Self::File { dir } => load_from_file(dir, player).await,
            Self::Postgres(pool) => load_from_postgres(pool, player).await,
        }
    }

    /// Delete the player's save, if one exists.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the filesystem or database delete fails.
    pub async fn delete(&self, player: &PlayerId) -> Result<(), StoreError> {
        match self {
            Self::Memory(saves) => {
                saves.write().await.remove(player);
                Ok(())
            }
            Self::File { dir } => {
                match tokio::fs::remove_file(save_path(dir, player)).await {
                    Ok(()) => Ok(()),
                    Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
                    Err(e) => Err(StoreError::Io(e)),
                }
            }
            Self::Postgres(pool) => {
                sqlx::query("DELETE FROM saves WHERE player_id = $1")
                    .bind(player.into_inner())
                    .execute(pool.pool())
                    .await?;
                Ok(())
            }
        }
    }
}

/// Path of a player's save file under `dir`.
fn save_path(dir: &Path, player: &PlayerId) -> PathBuf {
    dir.join(format!("{player}.json"))
}

async fn save_to_file(dir: &Path, player: &PlayerId, state: &GameState) -> Result<(), StoreError> {
    tokio::fs::create_dir_all(dir).await?;

    let document = serde_json::to_vec_pretty(state)?;
    let path = save_path(dir, player);

    // Write to a temp file in the same directory, then rename over the
    // final path. Rename is atomic on the same filesystem, so a crash
    // mid-write leaves the previous save intact.
    let tmp = path.with_extension("json.tmp");
    tokio::fs::write(&tmp, &document).await?;
    tokio::fs::rename(&tmp, &path).await?;

    tracing::debug!(player = %player, path = %path.display(), "Saved game to file");
    Ok(())
}

async fn load_from_file(dir: &Path, player: &PlayerId) -> Result<Option<GameState>, StoreError> {
    let path = save_path(dir, player);
    let bytes = match tokio::fs::read(&path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(StoreError::Io(e)),
    };

    let state: GameState = serde_json::from_slice(&bytes)?;
    tracing::debug!(player = %player, path = %path.display(), "Loaded game from file");
    Ok(Some(state))
}

async fn save_to_postgres(
    pool: &PostgresPool,
    player: &PlayerId,
    state: &GameState,
) -> Result<(), StoreError> {
    let document = serde_json::to_value(state)?;

    sqlx::query(
        "INSERT INTO saves (player_id, document, saved_at)
         VALUES ($1, $2, NOW())
         ON CONFLICT (player_id)
         DO UPDATE SET document = EXCLUDED.document, saved_at = EXCLUDED.saved_at",
    )
    .bind(player.into_inner())
    .bind(document)
    .execute(pool.pool())
    .await?;

    tracing::debug!(player = %player, "Saved game to PostgreSQL");
    Ok(())
}

async fn load_from_postgres(
    pool: &PostgresPool,
    player: &PlayerId,
) -> Result<Option<GameState>, StoreError> {
    let row: Option<SaveRow> = sqlx::query_as(
        "SELECT player_id, document, saved_at FROM saves WHERE player_id = $1",
    )
    .bind(player.into_inner())
    .fetch_optional(pool.pool())
    .await?;

    let Some(row) = row else {
        return Ok(None);
    };

    let state: GameState = serde_json::from_value(row.document)?;
    tracing::debug!(player = %player, saved_at = %row.saved_at, "Loaded game from PostgreSQL");
    Ok(Some(state))
}
