pub const SCHEMA: &str = r#"
-- Users are owned by the identity provider; rows are upserted on sight
CREATE TABLE IF NOT EXISTS users (
    user_id INTEGER PRIMARY KEY,
    username TEXT NOT NULL
);

-- Aggregate root
CREATE TABLE IF NOT EXISTS schedules (
    schedule_id TEXT PRIMARY KEY,
    schedule_name TEXT NOT NULL CHECK (length(schedule_name) > 0),
    memo TEXT NOT NULL DEFAULT '',
    created_by INTEGER NOT NULL REFERENCES users(user_id),
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

-- Candidates are append-only: never renamed, reordered or removed by an edit
CREATE TABLE IF NOT EXISTS candidates (
    candidate_id INTEGER PRIMARY KEY AUTOINCREMENT,
    candidate_name TEXT NOT NULL CHECK (length(candidate_name) > 0),
    schedule_id TEXT NOT NULL REFERENCES schedules(schedule_id),
    display_order INTEGER NOT NULL,

    -- Target for the composite key on availabilities
    UNIQUE(candidate_id, schedule_id)
);

-- One row per (schedule, user, candidate); the candidate must belong to the schedule
CREATE TABLE IF NOT EXISTS availabilities (
    schedule_id TEXT NOT NULL REFERENCES schedules(schedule_id),
    user_id INTEGER NOT NULL,
    candidate_id INTEGER NOT NULL,
    availability INTEGER NOT NULL DEFAULT 0 CHECK (availability IN (0, 1, 2)),
    PRIMARY KEY (schedule_id, user_id, candidate_id),
    FOREIGN KEY (candidate_id, schedule_id) REFERENCES candidates(candidate_id, schedule_id)
);

-- One row per (schedule, user)
CREATE TABLE IF NOT EXISTS comments (
    schedule_id TEXT NOT NULL REFERENCES schedules(schedule_id),
    user_id INTEGER NOT NULL,
    comment TEXT NOT NULL DEFAULT '',
    PRIMARY KEY (schedule_id, user_id)
);

CREATE INDEX IF NOT EXISTS idx_schedules_created_by ON schedules(created_by);
CREATE INDEX IF NOT EXISTS idx_candidates_schedule ON candidates(schedule_id);
CREATE INDEX IF NOT EXISTS idx_availabilities_candidate ON availabilities(candidate_id, schedule_id);
"#;
