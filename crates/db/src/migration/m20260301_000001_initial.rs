//! Initial database migration.
//!
//! Creates the tenant, staff, customer, service, payment, and balance
//! tables plus the composite unique index backing the opening-balance
//! upserts.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        // ============================================================
        // PART 1: ENUMS
        // ============================================================
        db.execute_unprepared(ENUMS_SQL).await?;

        // ============================================================
        // PART 2: TENANCY
        // ============================================================
        db.execute_unprepared(COMPANIES_SQL).await?;
        db.execute_unprepared(BRANCHES_SQL).await?;
        db.execute_unprepared(USERS_SQL).await?;

        // ============================================================
        // PART 3: CUSTOMERS & DEVICES
        // ============================================================
        db.execute_unprepared(CUSTOMERS_SQL).await?;
        db.execute_unprepared(BRANDS_SQL).await?;
        db.execute_unprepared(CUSTOMER_DEVICES_SQL).await?;

        // ============================================================
        // PART 4: SERVICES & FAULT TAGS
        // ============================================================
        db.execute_unprepared(FAULTS_SQL).await?;
        db.execute_unprepared(SERVICES_SQL).await?;
        db.execute_unprepared(SERVICE_FAULTS_SQL).await?;

        // ============================================================
        // PART 5: PAYMENTS & BALANCES
        // ============================================================
        db.execute_unprepared(PAYMENT_METHODS_SQL).await?;
        db.execute_unprepared(PAYMENT_ENTRIES_SQL).await?;
        db.execute_unprepared(DAILY_OPENING_BALANCES_SQL).await?;

        // ============================================================
        // PART 6: INDEXES
        // ============================================================
        db.execute_unprepared(INDEXES_SQL).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        db.execute_unprepared(
            r"
            DROP TABLE IF EXISTS daily_opening_balances;
            DROP TABLE IF EXISTS payment_entries;
            DROP TABLE IF EXISTS payment_methods;
            DROP TABLE IF EXISTS service_faults;
            DROP TABLE IF EXISTS services;
            DROP TABLE IF EXISTS faults;
            DROP TABLE IF EXISTS customer_devices;
            DROP TABLE IF EXISTS brands;
            DROP TABLE IF EXISTS customers;
            DROP TABLE IF EXISTS users;
            DROP TABLE IF EXISTS branches;
            DROP TABLE IF EXISTS companies;
            DROP TYPE IF EXISTS service_status;
            ",
        )
        .await?;

        Ok(())
    }
}

const ENUMS_SQL: &str = r"
CREATE TYPE service_status AS ENUM (
    'received',
    'diagnosed',
    'in_progress',
    'waiting_for_parts',
    'completed',
    'delivered',
    'cancelled',
    'not_serviceable'
);
";

const COMPANIES_SQL: &str = r"
CREATE TABLE companies (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    name VARCHAR(255) NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);
";

const BRANCHES_SQL: &str = r"
CREATE TABLE branches (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    company_id UUID NOT NULL REFERENCES companies(id) ON DELETE CASCADE,
    name VARCHAR(255) NOT NULL,
    address TEXT,
    phone VARCHAR(50),
    is_active BOOLEAN NOT NULL DEFAULT TRUE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);
";

const USERS_SQL: &str = r"
CREATE TABLE users (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    company_id UUID NOT NULL REFERENCES companies(id) ON DELETE CASCADE,
    name VARCHAR(255) NOT NULL,
    email VARCHAR(255) NOT NULL UNIQUE,
    role VARCHAR(50) NOT NULL,
    is_active BOOLEAN NOT NULL DEFAULT TRUE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);
";

const CUSTOMERS_SQL: &str = r"
CREATE TABLE customers (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    company_id UUID NOT NULL REFERENCES companies(id) ON DELETE CASCADE,
    name VARCHAR(255) NOT NULL,
    phone VARCHAR(50),
    email VARCHAR(255),
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);
";

const BRANDS_SQL: &str = r"
CREATE TABLE brands (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    company_id UUID NOT NULL REFERENCES companies(id) ON DELETE CASCADE,
    name VARCHAR(255) NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);
";

const CUSTOMER_DEVICES_SQL: &str = r"
CREATE TABLE customer_devices (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    company_id UUID NOT NULL REFERENCES companies(id) ON DELETE CASCADE,
    customer_id UUID NOT NULL REFERENCES customers(id) ON DELETE CASCADE,
    brand_id UUID REFERENCES brands(id) ON DELETE SET NULL,
    model VARCHAR(255),
    serial_number VARCHAR(255),
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);
";

const FAULTS_SQL: &str = r"
CREATE TABLE faults (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    company_id UUID NOT NULL REFERENCES companies(id) ON DELETE CASCADE,
    name VARCHAR(255) NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);
";

const SERVICES_SQL: &str = r"
CREATE TABLE services (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    company_id UUID NOT NULL REFERENCES companies(id) ON DELETE CASCADE,
    branch_id UUID NOT NULL REFERENCES branches(id),
    ticket_number VARCHAR(50) NOT NULL UNIQUE,
    customer_id UUID NOT NULL REFERENCES customers(id),
    customer_device_id UUID REFERENCES customer_devices(id) ON DELETE SET NULL,
    status service_status NOT NULL DEFAULT 'received',
    estimated_cost NUMERIC(12, 2),
    actual_cost NUMERIC(12, 2),
    created_by_id UUID REFERENCES users(id) ON DELETE SET NULL,
    assigned_to_id UUID REFERENCES users(id) ON DELETE SET NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    completed_at TIMESTAMPTZ,
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);
";

const SERVICE_FAULTS_SQL: &str = r"
CREATE TABLE service_faults (
    service_id UUID NOT NULL REFERENCES services(id) ON DELETE CASCADE,
    fault_id UUID NOT NULL REFERENCES faults(id) ON DELETE CASCADE,
    PRIMARY KEY (service_id, fault_id)
);
";

const PAYMENT_METHODS_SQL: &str = r"
CREATE TABLE payment_methods (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    company_id UUID NOT NULL REFERENCES companies(id) ON DELETE CASCADE,
    name VARCHAR(255) NOT NULL,
    is_active BOOLEAN NOT NULL DEFAULT TRUE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);
";

const PAYMENT_ENTRIES_SQL: &str = r"
CREATE TABLE payment_entries (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    company_id UUID NOT NULL REFERENCES companies(id) ON DELETE CASCADE,
    amount NUMERIC(12, 2) NOT NULL,
    payment_method_id UUID NOT NULL REFERENCES payment_methods(id),
    payment_date TIMESTAMPTZ NOT NULL,
    service_id UUID REFERENCES services(id) ON DELETE SET NULL,
    notes TEXT,
    transaction_id VARCHAR(255),
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);
";

const DAILY_OPENING_BALANCES_SQL: &str = r"
CREATE TABLE daily_opening_balances (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    company_id UUID NOT NULL REFERENCES companies(id) ON DELETE CASCADE,
    branch_id UUID NOT NULL REFERENCES branches(id) ON DELETE CASCADE,
    payment_method_id UUID NOT NULL REFERENCES payment_methods(id) ON DELETE CASCADE,
    balance_date DATE NOT NULL,
    opening_amount NUMERIC(12, 2) NOT NULL DEFAULT 0,
    closing_amount NUMERIC(12, 2) NOT NULL DEFAULT 0,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    CONSTRAINT uq_daily_opening_balance UNIQUE (balance_date, payment_method_id, branch_id)
);
";

const INDEXES_SQL: &str = r"
CREATE INDEX idx_services_company_created ON services(company_id, created_at);
CREATE INDEX idx_services_branch ON services(branch_id);
CREATE INDEX idx_payment_entries_company_date ON payment_entries(company_id, payment_date);
CREATE INDEX idx_payment_entries_service ON payment_entries(service_id);
CREATE INDEX idx_daily_opening_balances_branch_date ON daily_opening_balances(branch_id, balance_date);
";
