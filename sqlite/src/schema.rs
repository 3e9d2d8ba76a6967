//! SQL schema generation for the flight tables.
//!
//! # Table structure
//!
//! - `destinations` — airports, referenced twice by each flight
//! - `pilots` — crew, referenced once by each flight
//! - `flights` — date, time, status and three foreign keys
//!
//! Tables are created in dependency order and dropped in reverse, so the
//! statements are valid with foreign-key enforcement switched on.
//!
//! `status` is plain `TEXT` with no `CHECK`; the closed vocabulary is
//! enforced where values enter and leave the store.

/// Names of all tables in creation order.
pub const TABLES: [&str; 3] = ["destinations", "pilots", "flights"];

/// Generates `CREATE TABLE` and `CREATE INDEX` statements for all tables.
pub fn generate_schema_sql() -> &'static str {
    r#"
CREATE TABLE IF NOT EXISTS destinations (
    destination_id INTEGER PRIMARY KEY AUTOINCREMENT,
    airport TEXT NOT NULL,
    city TEXT NOT NULL,
    country TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS pilots (
    pilot_id INTEGER PRIMARY KEY AUTOINCREMENT,
    forename TEXT NOT NULL,
    surname TEXT NOT NULL,
    license_no TEXT NOT NULL,
    years_of_xp INTEGER NOT NULL CHECK (years_of_xp >= 0),
    email TEXT,
    phone TEXT
);

CREATE TABLE IF NOT EXISTS flights (
    flight_id INTEGER PRIMARY KEY AUTOINCREMENT,
    date TEXT NOT NULL,
    time TEXT NOT NULL,
    origin_id INTEGER NOT NULL,
    destination_id INTEGER NOT NULL,
    pilot_id INTEGER NOT NULL,
    status TEXT NOT NULL,
    FOREIGN KEY (origin_id) REFERENCES destinations(destination_id),
    FOREIGN KEY (destination_id) REFERENCES destinations(destination_id),
    FOREIGN KEY (pilot_id) REFERENCES pilots(pilot_id)
);

CREATE INDEX IF NOT EXISTS idx_flights_origin ON flights(origin_id);
CREATE INDEX IF NOT EXISTS idx_flights_destination ON flights(destination_id);
CREATE INDEX IF NOT EXISTS idx_flights_pilot ON flights(pilot_id);
CREATE INDEX IF NOT EXISTS idx_destinations_airport ON destinations(airport);
"#
}

/// Generates SQL to drop all tables in reverse dependency order.
pub fn generate_drop_sql() -> &'static str {
    r#"
DROP TABLE IF EXISTS flights;
DROP TABLE IF EXISTS pilots;
DROP TABLE IF EXISTS destinations;
"#
}
