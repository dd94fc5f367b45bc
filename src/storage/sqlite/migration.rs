pub(crate) const MIGRATION: &str = r#"
    CREATE TABLE IF NOT EXISTS documents (
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL
    );
"#;
