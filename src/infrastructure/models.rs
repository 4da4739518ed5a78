use chrono::{DateTime, Utc};
use diesel::prelude::*;

use crate::schema::storage_entries;

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = storage_entries)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct StorageEntryRow {
    pub profile: String,
    pub key: String,
    pub value: String,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = storage_entries)]
pub struct NewStorageEntryRow<'a> {
    pub profile: &'a str,
    pub key: &'a str,
    pub value: &'a str,
}
