//! Media catalog adapters.
//!
//! - `InMemoryMediaCatalog` - In-process catalog for tests and local runs
//! - `SupabaseMediaCatalog` - Supabase PostgREST table plus Storage bucket

mod in_memory;
mod supabase;

pub use in_memory::InMemoryMediaCatalog;
pub use supabase::{SupabaseCatalogConfig, SupabaseMediaCatalog};
