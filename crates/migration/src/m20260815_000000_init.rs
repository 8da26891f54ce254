//! Initial schema migration - creates all tables from scratch.
//!
//! It creates the complete schema for Coinbook:
//!
//! - `users`: authentication
//! - `stores`: arcade stores owned by users (the tenancy boundary)
//! - `financial_records`: one reconciled day per store, with derived totals
//!   and the running cash balance
//! - `revenue_lines`: per-source takings belonging to a record
//! - `expense_lines`: per-outlay expenses belonging to a record
//!
//! The unique index on `financial_records (store_id, date)` is load-bearing:
//! the chain recalculation orders records by `date`, and the database is the
//! layer that guarantees there is exactly one record per store per day.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

// ─────────────────────────────────────────────────────────────────────────────
// Table identifiers
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Iden)]
enum Users {
    Table,
    Username,
    Password,
}

#[derive(Iden)]
enum Stores {
    Table,
    Id,
    Name,
    Address,
    Notes,
    Active,
    UserId,
    CreatedAt,
}

#[derive(Iden)]
enum FinancialRecords {
    Table,
    Id,
    StoreId,
    Date,
    MoneyInMinor,
    MoneyOutMinor,
    DailyProfitMinor,
    CashBalanceMinor,
    ActualCashCountMinor,
    Notes,
    CreatedBy,
    UpdatedBy,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum StaffMembers {
    Table,
    Id,
    StoreId,
    Name,
    Position,
    Active,
    LoanAmountMinor,
    LoanRepaidMinor,
    LoanIssued,
    LoanDue,
    LoanStatus,
    LoanNotes,
    CreatedAt,
}

#[derive(Iden)]
enum RevenueLines {
    Table,
    Id,
    RecordId,
    Position,
    SourceId,
    SourceName,
    AmountMinor,
}

#[derive(Iden)]
enum ExpenseLines {
    Table,
    Id,
    RecordId,
    Position,
    Description,
    AmountMinor,
    Category,
}

// ─────────────────────────────────────────────────────────────────────────────
// Migration implementation
// ─────────────────────────────────────────────────────────────────────────────

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ───────────────────────────────────────────────────────────────────
        // 1. Users
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Users::Username)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Users::Password).string().not_null())
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 2. Stores
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Stores::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Stores::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Stores::Name).string().not_null())
                    .col(ColumnDef::new(Stores::Address).string().not_null())
                    .col(ColumnDef::new(Stores::Notes).string())
                    .col(ColumnDef::new(Stores::Active).boolean().not_null())
                    .col(ColumnDef::new(Stores::UserId).string().not_null())
                    .col(
                        ColumnDef::new(Stores::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-stores-user_id")
                            .from(Stores::Table, Stores::UserId)
                            .to(Users::Table, Users::Username),
                    )
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 3. Financial records
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(FinancialRecords::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(FinancialRecords::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(FinancialRecords::StoreId)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(FinancialRecords::Date).date().not_null())
                    .col(
                        ColumnDef::new(FinancialRecords::MoneyInMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(FinancialRecords::MoneyOutMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(FinancialRecords::DailyProfitMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(FinancialRecords::CashBalanceMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(FinancialRecords::ActualCashCountMinor).big_integer(),
                    )
                    .col(ColumnDef::new(FinancialRecords::Notes).string())
                    .col(
                        ColumnDef::new(FinancialRecords::CreatedBy)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(FinancialRecords::UpdatedBy).string())
                    .col(
                        ColumnDef::new(FinancialRecords::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(FinancialRecords::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-financial_records-store_id")
                            .from(FinancialRecords::Table, FinancialRecords::StoreId)
                            .to(Stores::Table, Stores::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-financial_records-store_id-date-unique")
                    .table(FinancialRecords::Table)
                    .col(FinancialRecords::StoreId)
                    .col(FinancialRecords::Date)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 4. Staff members
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(StaffMembers::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(StaffMembers::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(StaffMembers::StoreId).string().not_null())
                    .col(ColumnDef::new(StaffMembers::Name).string().not_null())
                    .col(ColumnDef::new(StaffMembers::Position).string())
                    .col(ColumnDef::new(StaffMembers::Active).boolean().not_null())
                    .col(ColumnDef::new(StaffMembers::LoanAmountMinor).big_integer())
                    .col(ColumnDef::new(StaffMembers::LoanRepaidMinor).big_integer())
                    .col(ColumnDef::new(StaffMembers::LoanIssued).date())
                    .col(ColumnDef::new(StaffMembers::LoanDue).date())
                    .col(ColumnDef::new(StaffMembers::LoanStatus).string())
                    .col(ColumnDef::new(StaffMembers::LoanNotes).string())
                    .col(
                        ColumnDef::new(StaffMembers::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-staff_members-store_id")
                            .from(StaffMembers::Table, StaffMembers::StoreId)
                            .to(Stores::Table, Stores::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-staff_members-store_id")
                    .table(StaffMembers::Table)
                    .col(StaffMembers::StoreId)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 5. Revenue lines
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(RevenueLines::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(RevenueLines::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(RevenueLines::RecordId).string().not_null())
                    .col(ColumnDef::new(RevenueLines::Position).integer().not_null())
                    .col(ColumnDef::new(RevenueLines::SourceId).string().not_null())
                    .col(
                        ColumnDef::new(RevenueLines::SourceName)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(RevenueLines::AmountMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-revenue_lines-record_id")
                            .from(RevenueLines::Table, RevenueLines::RecordId)
                            .to(FinancialRecords::Table, FinancialRecords::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-revenue_lines-record_id")
                    .table(RevenueLines::Table)
                    .col(RevenueLines::RecordId)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 6. Expense lines
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(ExpenseLines::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ExpenseLines::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ExpenseLines::RecordId).string().not_null())
                    .col(ColumnDef::new(ExpenseLines::Position).integer().not_null())
                    .col(
                        ColumnDef::new(ExpenseLines::Description)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ExpenseLines::AmountMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ExpenseLines::Category).string().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-expense_lines-record_id")
                            .from(ExpenseLines::Table, ExpenseLines::RecordId)
                            .to(FinancialRecords::Table, FinancialRecords::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-expense_lines-record_id")
                    .table(ExpenseLines::Table)
                    .col(ExpenseLines::RecordId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ExpenseLines::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(RevenueLines::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(StaffMembers::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(FinancialRecords::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Stores::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;
        Ok(())
    }
}
