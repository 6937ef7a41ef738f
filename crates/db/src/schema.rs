use eyre::Result;
use sqlx::{Executor, Pool, Postgres};
use tracing::info;

pub async fn initialize_database(pool: &Pool<Postgres>) -> Result<()> {
    info!("Initializing database schema...");

    // Create users table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            email VARCHAR(255) NOT NULL UNIQUE,
            password_hash VARCHAR(255) NOT NULL,
            full_name VARCHAR(255) NOT NULL,
            role VARCHAR(16) NOT NULL,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            CONSTRAINT valid_role CHECK (role IN ('ADMIN', 'DOCTOR', 'STAFF', 'PATIENT'))
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create sessions table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS sessions (
            token UUID PRIMARY KEY,
            user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            expires_at TIMESTAMP WITH TIME ZONE NOT NULL
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create doctors table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS doctors (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            user_id UUID NULL UNIQUE REFERENCES users(id),
            name VARCHAR(255) NOT NULL,
            specialization VARCHAR(255) NULL,
            email VARCHAR(255) NOT NULL UNIQUE,
            phone VARCHAR(64) NULL,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create working_hours table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS working_hours (
            doctor_id UUID NOT NULL REFERENCES doctors(id) ON DELETE CASCADE,
            day_of_week SMALLINT NOT NULL,
            start_time VARCHAR(5) NOT NULL,
            end_time VARCHAR(5) NOT NULL,
            PRIMARY KEY (doctor_id, day_of_week),
            CONSTRAINT valid_day_of_week CHECK (day_of_week BETWEEN 0 AND 6)
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create patients table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS patients (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            user_id UUID NULL UNIQUE REFERENCES users(id),
            name VARCHAR(255) NOT NULL,
            date_of_birth DATE NULL,
            gender VARCHAR(32) NULL,
            phone VARCHAR(64) NULL,
            email VARCHAR(255) NULL,
            address TEXT NULL,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create appointments table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS appointments (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            patient_id UUID NOT NULL REFERENCES patients(id),
            doctor_id UUID NOT NULL REFERENCES doctors(id),
            appointment_date DATE NOT NULL,
            appointment_time VARCHAR(5) NULL,
            duration_minutes INTEGER NOT NULL DEFAULT 30,
            status VARCHAR(16) NOT NULL DEFAULT 'SCHEDULED',
            reason TEXT NULL,
            notes TEXT NULL,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            CONSTRAINT valid_status CHECK (
                status IN ('SCHEDULED', 'CONFIRMED', 'IN_PROGRESS', 'COMPLETED', 'CANCELLED', 'NO_SHOW')
            )
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create medicines table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS medicines (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            name VARCHAR(255) NOT NULL,
            generic_name VARCHAR(255) NULL,
            category VARCHAR(255) NULL,
            unit_price_cents BIGINT NOT NULL DEFAULT 0,
            stock_quantity INTEGER NOT NULL DEFAULT 0,
            reorder_level INTEGER NOT NULL DEFAULT 0,
            expiry_date DATE NULL,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            CONSTRAINT non_negative_stock CHECK (stock_quantity >= 0),
            CONSTRAINT non_negative_price CHECK (unit_price_cents >= 0)
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create indexes; several statements, so this goes through the simple query protocol
    pool.execute(
        r#"
        CREATE INDEX IF NOT EXISTS idx_sessions_user_id ON sessions(user_id);
        CREATE INDEX IF NOT EXISTS idx_sessions_expires_at ON sessions(expires_at);
        CREATE INDEX IF NOT EXISTS idx_appointments_doctor_date ON appointments(doctor_id, appointment_date);
        CREATE INDEX IF NOT EXISTS idx_appointments_patient_id ON appointments(patient_id);
        CREATE INDEX IF NOT EXISTS idx_appointments_status ON appointments(status);
        CREATE INDEX IF NOT EXISTS idx_doctors_specialization ON doctors(specialization);
        CREATE INDEX IF NOT EXISTS idx_patients_name ON patients(LOWER(name));
        CREATE INDEX IF NOT EXISTS idx_medicines_name ON medicines(LOWER(name));
        "#,
    )
    .await?;

    info!("Database schema initialized successfully.");
    Ok(())
}
