use eyre::{Result, WrapErr};
use sqlx::{Pool, Postgres};
use tracing::info;

const TABLES: &[(&str, &str)] = &[
    (
        "users",
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id BIGSERIAL PRIMARY KEY,
            name VARCHAR(255) NOT NULL,
            email VARCHAR(255) NOT NULL UNIQUE,
            phone VARCHAR(50) NULL,
            password_hash VARCHAR(255) NOT NULL,
            role VARCHAR(20) NOT NULL DEFAULT 'member',
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    ),
    (
        "sessions",
        r#"
        CREATE TABLE IF NOT EXISTS sessions (
            token VARCHAR(128) PRIMARY KEY,
            user_id BIGINT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            expires_at TIMESTAMP WITH TIME ZONE NOT NULL,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    ),
    (
        "coaches",
        r#"
        CREATE TABLE IF NOT EXISTS coaches (
            id BIGSERIAL PRIMARY KEY,
            name VARCHAR(255) NOT NULL,
            bio TEXT NULL,
            image_url TEXT NULL,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    ),
    (
        "locations",
        r#"
        CREATE TABLE IF NOT EXISTS locations (
            id BIGSERIAL PRIMARY KEY,
            name VARCHAR(255) NOT NULL,
            address TEXT NOT NULL,
            phone VARCHAR(50) NULL,
            link_maps TEXT NULL,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    ),
    (
        "location_facilities",
        r#"
        CREATE TABLE IF NOT EXISTS location_facilities (
            id BIGSERIAL PRIMARY KEY,
            location_id BIGINT NOT NULL REFERENCES locations(id) ON DELETE CASCADE,
            name VARCHAR(255) NOT NULL,
            capacity INTEGER NOT NULL CHECK (capacity > 0)
        );
        "#,
    ),
    (
        "location_operational_hours",
        r#"
        CREATE TABLE IF NOT EXISTS location_operational_hours (
            id BIGSERIAL PRIMARY KEY,
            location_id BIGINT NOT NULL REFERENCES locations(id) ON DELETE CASCADE,
            day_of_week SMALLINT NOT NULL CHECK (day_of_week BETWEEN 0 AND 6),
            open_time TIME NOT NULL,
            close_time TIME NOT NULL,
            CONSTRAINT valid_opening CHECK (open_time < close_time),
            UNIQUE (location_id, day_of_week, open_time)
        );
        "#,
    ),
    (
        "location_assets",
        r#"
        CREATE TABLE IF NOT EXISTS location_assets (
            id BIGSERIAL PRIMARY KEY,
            location_id BIGINT NOT NULL REFERENCES locations(id) ON DELETE CASCADE,
            name VARCHAR(255) NOT NULL,
            url TEXT NOT NULL
        );
        "#,
    ),
    (
        "class_types",
        r#"
        CREATE TABLE IF NOT EXISTS class_types (
            id BIGSERIAL PRIMARY KEY,
            name VARCHAR(255) NOT NULL UNIQUE
        );
        "#,
    ),
    (
        "classes",
        r#"
        CREATE TABLE IF NOT EXISTS classes (
            id BIGSERIAL PRIMARY KEY,
            name VARCHAR(255) NOT NULL,
            description TEXT NULL,
            class_type_id BIGINT NOT NULL REFERENCES class_types(id),
            duration_minutes INTEGER NOT NULL CHECK (duration_minutes > 0),
            capacity INTEGER NOT NULL CHECK (capacity > 0),
            is_active BOOLEAN NOT NULL DEFAULT TRUE,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    ),
    (
        "class_locations",
        r#"
        CREATE TABLE IF NOT EXISTS class_locations (
            class_id BIGINT NOT NULL REFERENCES classes(id) ON DELETE CASCADE,
            location_id BIGINT NOT NULL REFERENCES locations(id) ON DELETE CASCADE,
            PRIMARY KEY (class_id, location_id)
        );
        "#,
    ),
    (
        "class_assets",
        r#"
        CREATE TABLE IF NOT EXISTS class_assets (
            id BIGSERIAL PRIMARY KEY,
            class_id BIGINT NOT NULL REFERENCES classes(id) ON DELETE CASCADE,
            name VARCHAR(255) NOT NULL,
            url TEXT NOT NULL
        );
        "#,
    ),
    (
        "agenda_recurrences",
        r#"
        CREATE TABLE IF NOT EXISTS agenda_recurrences (
            id BIGSERIAL PRIMARY KEY,
            class_id BIGINT NOT NULL REFERENCES classes(id),
            coach_id BIGINT NOT NULL REFERENCES coaches(id),
            location_facility_id BIGINT NOT NULL REFERENCES location_facilities(id),
            day_of_week SMALLINT NOT NULL CHECK (day_of_week BETWEEN 0 AND 6),
            start_time TIME NOT NULL,
            start_date DATE NOT NULL,
            end_date DATE NOT NULL,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            CONSTRAINT valid_range CHECK (start_date <= end_date)
        );
        "#,
    ),
    (
        "agendas",
        r#"
        CREATE TABLE IF NOT EXISTS agendas (
            id BIGSERIAL PRIMARY KEY,
            class_id BIGINT NOT NULL REFERENCES classes(id),
            coach_id BIGINT NOT NULL REFERENCES coaches(id),
            location_facility_id BIGINT NOT NULL REFERENCES location_facilities(id),
            starts_at TIMESTAMP NOT NULL,
            recurrence_id BIGINT NULL REFERENCES agenda_recurrences(id) ON DELETE SET NULL,
            is_show BOOLEAN NOT NULL DEFAULT TRUE,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    ),
    (
        "agenda_bookings",
        r#"
        CREATE TABLE IF NOT EXISTS agenda_bookings (
            id BIGSERIAL PRIMARY KEY,
            agenda_id BIGINT NOT NULL REFERENCES agendas(id),
            user_id BIGINT NOT NULL REFERENCES users(id),
            status VARCHAR(20) NOT NULL DEFAULT 'booked',
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    ),
    (
        "deposit_accounts",
        r#"
        CREATE TABLE IF NOT EXISTS deposit_accounts (
            id BIGSERIAL PRIMARY KEY,
            bank_name VARCHAR(255) NOT NULL,
            account_name VARCHAR(255) NOT NULL,
            account_number VARCHAR(64) NOT NULL,
            is_active BOOLEAN NOT NULL DEFAULT TRUE
        );
        "#,
    ),
    (
        "packages",
        r#"
        CREATE TABLE IF NOT EXISTS packages (
            id BIGSERIAL PRIMARY KEY,
            name VARCHAR(255) NOT NULL,
            description TEXT NULL,
            price BIGINT NOT NULL CHECK (price >= 0),
            credit INTEGER NOT NULL CHECK (credit > 0),
            valid_days INTEGER NOT NULL CHECK (valid_days > 0),
            class_type_id BIGINT NOT NULL REFERENCES class_types(id),
            is_active BOOLEAN NOT NULL DEFAULT TRUE,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    ),
    (
        "user_packages",
        r#"
        CREATE TABLE IF NOT EXISTS user_packages (
            id BIGSERIAL PRIMARY KEY,
            user_id BIGINT NOT NULL REFERENCES users(id),
            package_id BIGINT NOT NULL REFERENCES packages(id),
            class_type_id BIGINT NOT NULL REFERENCES class_types(id),
            credit INTEGER NOT NULL,
            credit_used INTEGER NOT NULL DEFAULT 0,
            expired_at TIMESTAMP WITH TIME ZONE NOT NULL,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            CONSTRAINT credit_within_grant CHECK (credit_used >= 0 AND credit_used <= credit)
        );
        "#,
    ),
    (
        "vouchers",
        r#"
        CREATE TABLE IF NOT EXISTS vouchers (
            id BIGSERIAL PRIMARY KEY,
            code VARCHAR(32) NOT NULL UNIQUE,
            kind VARCHAR(20) NOT NULL,
            amount BIGINT NOT NULL CHECK (amount > 0),
            user_id BIGINT NULL REFERENCES users(id),
            expired_at TIMESTAMP WITH TIME ZONE NULL,
            is_active BOOLEAN NOT NULL DEFAULT TRUE,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    ),
    (
        "package_transactions",
        r#"
        CREATE TABLE IF NOT EXISTS package_transactions (
            id BIGSERIAL PRIMARY KEY,
            user_id BIGINT NOT NULL REFERENCES users(id),
            package_id BIGINT NOT NULL REFERENCES packages(id),
            voucher_id BIGINT NULL REFERENCES vouchers(id) ON DELETE SET NULL,
            deposit_account_id BIGINT NULL REFERENCES deposit_accounts(id) ON DELETE SET NULL,
            amount BIGINT NOT NULL,
            discount BIGINT NOT NULL DEFAULT 0,
            total BIGINT NOT NULL,
            status VARCHAR(20) NOT NULL DEFAULT 'pending',
            user_package_id BIGINT NULL REFERENCES user_packages(id),
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    ),
    (
        "credit_transactions",
        r#"
        CREATE TABLE IF NOT EXISTS credit_transactions (
            id BIGSERIAL PRIMARY KEY,
            user_id BIGINT NOT NULL REFERENCES users(id),
            class_type_id BIGINT NOT NULL REFERENCES class_types(id),
            kind VARCHAR(20) NOT NULL,
            amount INTEGER NOT NULL CHECK (amount > 0),
            note TEXT NULL,
            agenda_booking_id BIGINT NULL REFERENCES agenda_bookings(id),
            user_package_id BIGINT NULL REFERENCES user_packages(id),
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    ),
    (
        "loyalty_rewards",
        r#"
        CREATE TABLE IF NOT EXISTS loyalty_rewards (
            id BIGSERIAL PRIMARY KEY,
            name VARCHAR(255) NOT NULL,
            description TEXT NULL,
            points INTEGER NOT NULL CHECK (points > 0),
            trigger VARCHAR(32) NOT NULL,
            is_active BOOLEAN NOT NULL DEFAULT TRUE
        );
        "#,
    ),
    (
        "loyalty_shops",
        r#"
        CREATE TABLE IF NOT EXISTS loyalty_shops (
            id BIGSERIAL PRIMARY KEY,
            name VARCHAR(255) NOT NULL,
            description TEXT NULL,
            price INTEGER NOT NULL CHECK (price > 0),
            stock INTEGER NULL CHECK (stock >= 0),
            is_active BOOLEAN NOT NULL DEFAULT TRUE
        );
        "#,
    ),
    (
        "loyalty_transactions",
        r#"
        CREATE TABLE IF NOT EXISTS loyalty_transactions (
            id BIGSERIAL PRIMARY KEY,
            user_id BIGINT NOT NULL REFERENCES users(id),
            points INTEGER NOT NULL,
            note TEXT NULL,
            loyalty_reward_id BIGINT NULL REFERENCES loyalty_rewards(id) ON DELETE SET NULL,
            loyalty_shop_id BIGINT NULL REFERENCES loyalty_shops(id) ON DELETE SET NULL,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    ),
    (
        "web_settings",
        r#"
        CREATE TABLE IF NOT EXISTS web_settings (
            key VARCHAR(64) PRIMARY KEY,
            value TEXT NOT NULL
        );
        "#,
    ),
];

const INDEXES: &[&str] = &[
    "CREATE INDEX IF NOT EXISTS idx_sessions_user_id ON sessions(user_id)",
    "CREATE INDEX IF NOT EXISTS idx_facilities_location_id ON location_facilities(location_id)",
    "CREATE INDEX IF NOT EXISTS idx_hours_location_id ON location_operational_hours(location_id)",
    "CREATE INDEX IF NOT EXISTS idx_agendas_starts_at ON agendas(starts_at)",
    "CREATE INDEX IF NOT EXISTS idx_agendas_facility_time ON agendas(location_facility_id, starts_at)",
    "CREATE INDEX IF NOT EXISTS idx_agendas_recurrence_id ON agendas(recurrence_id)",
    "CREATE INDEX IF NOT EXISTS idx_bookings_agenda_id ON agenda_bookings(agenda_id)",
    "CREATE INDEX IF NOT EXISTS idx_bookings_user_id ON agenda_bookings(user_id)",
    "CREATE UNIQUE INDEX IF NOT EXISTS idx_bookings_live ON agenda_bookings(agenda_id, user_id) WHERE status <> 'cancelled'",
    "CREATE INDEX IF NOT EXISTS idx_user_packages_user_id ON user_packages(user_id)",
    "CREATE INDEX IF NOT EXISTS idx_credit_transactions_user_id ON credit_transactions(user_id)",
    "CREATE INDEX IF NOT EXISTS idx_package_transactions_user_id ON package_transactions(user_id)",
    "CREATE INDEX IF NOT EXISTS idx_loyalty_transactions_user_id ON loyalty_transactions(user_id)",
];

/// Creates every table and index that does not exist yet. Safe to run on
/// each start.
pub async fn initialize_database(pool: &Pool<Postgres>) -> Result<()> {
    info!("Initializing database schema...");

    for (table, ddl) in TABLES {
        sqlx::query(ddl)
            .execute(pool)
            .await
            .wrap_err_with(|| format!("Failed to create table {}", table))?;
    }

    for ddl in INDEXES {
        sqlx::query(ddl)
            .execute(pool)
            .await
            .wrap_err_with(|| format!("Failed to run: {}", ddl))?;
    }

    info!("Database schema initialized successfully.");
    Ok(())
}
