//! Initial database migration.
//!
//! Creates accounts, profiles, clients, items and the documents tables.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        // ============================================================
        // PART 1: ACCOUNTS
        // ============================================================
        db.execute_unprepared(USERS_SQL).await?;
        db.execute_unprepared(PROFILES_SQL).await?;

        // ============================================================
        // PART 2: CATALOG
        // ============================================================
        db.execute_unprepared(CLIENTS_SQL).await?;
        db.execute_unprepared(ITEMS_SQL).await?;

        // ============================================================
        // PART 3: DOCUMENTS
        // ============================================================
        db.execute_unprepared(INVOICES_SQL).await?;
        db.execute_unprepared(INVOICE_ITEMS_SQL).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(
            r"
            DROP TABLE IF EXISTS invoice_items CASCADE;
            DROP TABLE IF EXISTS invoices CASCADE;
            DROP TABLE IF EXISTS items CASCADE;
            DROP TABLE IF EXISTS clients CASCADE;
            DROP TABLE IF EXISTS profiles CASCADE;
            DROP TABLE IF EXISTS users CASCADE;
            ",
        )
        .await?;
        Ok(())
    }
}

const USERS_SQL: &str = r"
CREATE TABLE users (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    email VARCHAR(255) NOT NULL UNIQUE,
    password_hash VARCHAR(255) NOT NULL,
    full_name VARCHAR(200) NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);
";

const PROFILES_SQL: &str = r"
CREATE TABLE profiles (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    user_id UUID NOT NULL UNIQUE REFERENCES users(id) ON DELETE CASCADE,
    business_name VARCHAR(200) NOT NULL,
    address TEXT,
    email VARCHAR(255),
    phone VARCHAR(50),
    logo_url TEXT,
    accent_color VARCHAR(20),
    currency CHAR(3) NOT NULL DEFAULT 'USD',
    timezone VARCHAR(64) NOT NULL DEFAULT 'UTC',
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);
";

const CLIENTS_SQL: &str = r"
CREATE TABLE clients (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    name VARCHAR(200) NOT NULL,
    email VARCHAR(255),
    phone VARCHAR(50),
    address TEXT,
    tax_id VARCHAR(50),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_clients_user ON clients(user_id, name);
";

const ITEMS_SQL: &str = r"
CREATE TABLE items (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    description TEXT NOT NULL,
    rate NUMERIC(19, 4) NOT NULL DEFAULT 0,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),

    CONSTRAINT chk_items_rate CHECK (rate >= 0)
);

CREATE INDEX idx_items_user ON items(user_id);
";

const INVOICES_SQL: &str = r"
-- One table for every document kind; NULL document_type = legacy invoice
CREATE TABLE invoices (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    client_id UUID REFERENCES clients(id) ON DELETE SET NULL,
    document_type VARCHAR(32),
    invoice_number VARCHAR(50) NOT NULL,
    status VARCHAR(16) NOT NULL DEFAULT 'draft',
    issue_date DATE NOT NULL,
    due_date DATE,
    currency CHAR(3) NOT NULL DEFAULT 'USD',
    notes TEXT,
    tax_rate NUMERIC(7, 4) NOT NULL DEFAULT 0,
    discount_rate NUMERIC(7, 4) NOT NULL DEFAULT 0,
    subtotal NUMERIC(19, 4) NOT NULL DEFAULT 0,
    discount_amount NUMERIC(19, 4) NOT NULL DEFAULT 0,
    tax_amount NUMERIC(19, 4) NOT NULL DEFAULT 0,
    total NUMERIC(19, 4) NOT NULL DEFAULT 0,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),

    CONSTRAINT chk_invoices_status CHECK (status IN ('draft', 'sent', 'paid', 'overdue')),
    CONSTRAINT chk_invoices_type CHECK (document_type IS NULL OR document_type IN (
        'Invoice', 'Estimate', 'Credit note', 'Delivery note', 'Purchase order'
    )),
    CONSTRAINT chk_invoices_rates CHECK (
        tax_rate BETWEEN 0 AND 100 AND discount_rate BETWEEN 0 AND 100
    ),
    CONSTRAINT chk_invoices_due CHECK (due_date IS NULL OR due_date >= issue_date)
);

CREATE INDEX idx_invoices_user_type ON invoices(user_id, document_type);
CREATE INDEX idx_invoices_user_recent ON invoices(user_id, issue_date DESC, created_at DESC);
CREATE INDEX idx_invoices_client ON invoices(client_id) WHERE client_id IS NOT NULL;
";

const INVOICE_ITEMS_SQL: &str = r"
CREATE TABLE invoice_items (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    invoice_id UUID NOT NULL REFERENCES invoices(id) ON DELETE CASCADE,
    description TEXT NOT NULL,
    quantity NUMERIC(19, 4) NOT NULL,
    rate NUMERIC(19, 4) NOT NULL,
    amount NUMERIC(19, 4) NOT NULL,
    position INTEGER NOT NULL DEFAULT 0,

    CONSTRAINT chk_invoice_items_non_negative CHECK (quantity >= 0 AND rate >= 0)
);

CREATE INDEX idx_invoice_items_invoice ON invoice_items(invoice_id, position);
";
