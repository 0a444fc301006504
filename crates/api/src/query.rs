//! Shared query and path parameter types for API handlers.

use adminlock_core::error::CoreError;
use adminlock_core::locking::{validate_entry_id, ContentType};
use adminlock_core::types::DbId;
use serde::Deserialize;

/// Maximum number of records one change-list badge request may ask for.
pub const MAX_BADGE_BATCH: usize = 500;

/// `{app}/{model}/{id}` path segments identifying one record.
#[derive(Debug, Deserialize)]
pub struct RecordPath {
    pub app: String,
    pub model: String,
    pub id: DbId,
}

impl RecordPath {
    /// Validate and split into the lock key.
    pub fn into_key(self) -> Result<(ContentType, DbId), CoreError> {
        let content_type = ContentType::new(&self.app, &self.model)?;
        validate_entry_id(self.id)?;
        Ok((content_type, self.id))
    }
}

/// `{app}/{model}` path segments identifying one kind of record.
#[derive(Debug, Deserialize)]
pub struct ModelPath {
    pub app: String,
    pub model: String,
}

impl ModelPath {
    pub fn content_type(&self) -> Result<ContentType, CoreError> {
        ContentType::new(&self.app, &self.model)
    }
}

/// `?ids=1,2,3` for change-list badge lookups.
#[derive(Debug, Deserialize)]
pub struct EntryIdsParams {
    #[serde(default)]
    pub ids: String,
}

impl EntryIdsParams {
    /// Parse the comma-separated id list. Blank entries are skipped.
    pub fn parse(&self) -> Result<Vec<DbId>, CoreError> {
        let ids = self
            .ids
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| {
                let id: DbId = s
                    .parse()
                    .map_err(|_| CoreError::Validation(format!("Invalid entry id '{s}'")))?;
                validate_entry_id(id)?;
                Ok(id)
            })
            .collect::<Result<Vec<_>, CoreError>>()?;

        if ids.len() > MAX_BADGE_BATCH {
            return Err(CoreError::Validation(format!(
                "At most {MAX_BADGE_BATCH} ids per request, got {}",
                ids.len()
            )));
        }
        Ok(ids)
    }
}
