//! Database schema and migrations for FileShare.
//!
//! Migrations are applied in order when the database is first opened or
//! upgraded. The schema_version table tracks which ones have run.

/// Database migrations.
pub const MIGRATIONS: &[&str] = &[
    // v1: File registry
    r#"
CREATE TABLE files (
    id           TEXT PRIMARY KEY,
    content_ref  TEXT NOT NULL,            -- stored blob name
    name         TEXT NOT NULL,            -- original file name, verbatim
    media_type   TEXT NOT NULL,
    size         INTEGER,                  -- bytes, NULL when unknown
    downloads    INTEGER NOT NULL DEFAULT 0 CHECK (downloads >= 0),
    uploaded_at  TEXT NOT NULL             -- RFC 3339, UTC
);

CREATE INDEX idx_files_uploaded_at ON files(uploaded_at);
"#,
];
