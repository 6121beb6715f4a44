//! Constants used throughout the patients core crate.

/// Default SQLite database file when no explicit path is configured.
pub const DEFAULT_DATABASE_PATH: &str = "patients.sqlite";

/// Database path value that selects a private in-memory database.
pub const IN_MEMORY_DATABASE_PATH: &str = ":memory:";

/// Status applied by an update that does not carry one.
pub const DEFAULT_STATUS: &str = "Inquiry";

/// Statuses the UI offers. Not enforced server-side.
pub const KNOWN_STATUSES: [&str; 4] = ["Inquiry", "Onboarding", "Active", "Churned"];
