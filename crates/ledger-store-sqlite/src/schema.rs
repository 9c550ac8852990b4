//! SQL schema for the ledger SQLite store.
//!
//! Executed once at connection startup. The version is recorded in
//! `PRAGMA user_version`; there is no migration machinery beyond that.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

-- Reference tables are append-only: rows are never updated or deleted.
CREATE TABLE IF NOT EXISTS payer (
    id    INTEGER PRIMARY KEY AUTOINCREMENT,
    name  TEXT    NOT NULL UNIQUE
);

CREATE TABLE IF NOT EXISTS category (
    id    INTEGER PRIMARY KEY AUTOINCREMENT,
    name  TEXT    NOT NULL UNIQUE
);

-- The implicit rowid records insertion order and breaks created_at ties.
CREATE TABLE IF NOT EXISTS expense (
    id           TEXT    PRIMARY KEY,             -- hyphenated lowercase UUID
    description  TEXT    NOT NULL,
    payer_id     INTEGER NOT NULL REFERENCES payer(id),
    category_id  INTEGER NOT NULL REFERENCES category(id),
    amount       TEXT    NOT NULL,                -- verbatim, never parsed
    currency     TEXT    NOT NULL,
    created_at   TEXT    NOT NULL                 -- RFC 3339 UTC, nanoseconds
);

CREATE INDEX IF NOT EXISTS expense_created_idx ON expense(created_at);

PRAGMA user_version = 1;
";
