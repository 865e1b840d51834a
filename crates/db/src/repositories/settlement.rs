//! Settlement repository: opening/closing balance reads and upserts.
//!
//! Balance rows are keyed by the composite (balance_date, payment_method_id,
//! branch_id) and written through upserts, so setting the same balance twice
//! converges on the same state. The carry-forward write is a manual,
//! explicit action: concurrent writers for the same key are not serialized
//! here, the last write wins.

use std::collections::HashMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ActiveValue::Set, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
};
use uuid::Uuid;

use crate::entities::{branches, daily_opening_balances};

/// Error types for settlement operations.
#[derive(Debug, thiserror::Error)]
pub enum SettlementError {
    /// Branch not found.
    #[error("Branch not found: {0}")]
    BranchNotFound(Uuid),

    /// Date arithmetic left the supported calendar range.
    #[error("Date out of range: {0}")]
    DateOutOfRange(NaiveDate),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Repository for daily opening/closing balances.
#[derive(Debug, Clone)]
pub struct SettlementRepository {
    db: DatabaseConnection,
}

impl SettlementRepository {
    /// Creates a new settlement repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Looks up a branch within a company.
    ///
    /// # Errors
    ///
    /// Returns [`SettlementError::BranchNotFound`] if the branch does not
    /// exist for that company.
    pub async fn find_branch(
        &self,
        company_id: Uuid,
        branch_id: Uuid,
    ) -> Result<branches::Model, SettlementError> {
        branches::Entity::find_by_id(branch_id)
            .filter(branches::Column::CompanyId.eq(company_id))
            .one(&self.db)
            .await?
            .ok_or(SettlementError::BranchNotFound(branch_id))
    }

    /// Loads the recorded opening balances per payment method for one
    /// branch and date. Methods without a row simply have no entry.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn opening_balances(
        &self,
        branch_id: Uuid,
        date: NaiveDate,
    ) -> Result<HashMap<Uuid, Decimal>, SettlementError> {
        let rows = daily_opening_balances::Entity::find()
            .filter(daily_opening_balances::Column::BranchId.eq(branch_id))
            .filter(daily_opening_balances::Column::BalanceDate.eq(date))
            .all(&self.db)
            .await?;

        Ok(rows
            .into_iter()
            .map(|row| (row.payment_method_id, row.opening_amount))
            .collect())
    }

    /// Upserts the opening balance for (date, method, branch).
    ///
    /// A freshly created row defaults its closing amount to zero; repeating
    /// the call overwrites the opening amount and nothing else.
    ///
    /// # Errors
    ///
    /// Returns an error if the upsert fails.
    pub async fn set_opening_balance(
        &self,
        company_id: Uuid,
        branch_id: Uuid,
        date: NaiveDate,
        payment_method_id: Uuid,
        opening_amount: Decimal,
    ) -> Result<(), SettlementError> {
        self.upsert_balance(
            company_id,
            branch_id,
            date,
            payment_method_id,
            BalanceField::Opening(opening_amount),
        )
        .await
    }

    /// Records the day's closing balance and carries it forward.
    ///
    /// Upserts the closing amount for (date, method, branch) exactly as
    /// given (no recomputation from transactions), then upserts the next
    /// day's opening amount to the same value. Returns the date the balance
    /// was carried forward to.
    ///
    /// # Errors
    ///
    /// Returns an error if either upsert fails or the next day is outside
    /// the calendar range.
    pub async fn set_closing_balance_and_carry_forward(
        &self,
        company_id: Uuid,
        branch_id: Uuid,
        date: NaiveDate,
        payment_method_id: Uuid,
        closing_amount: Decimal,
    ) -> Result<NaiveDate, SettlementError> {
        let next_day = date
            .succ_opt()
            .ok_or(SettlementError::DateOutOfRange(date))?;

        self.upsert_balance(
            company_id,
            branch_id,
            date,
            payment_method_id,
            BalanceField::Closing(closing_amount),
        )
        .await?;

        self.upsert_balance(
            company_id,
            branch_id,
            next_day,
            payment_method_id,
            BalanceField::Opening(closing_amount),
        )
        .await?;

        Ok(next_day)
    }

    /// Upserts one balance field for the composite key, leaving the other
    /// field untouched on existing rows.
    async fn upsert_balance(
        &self,
        company_id: Uuid,
        branch_id: Uuid,
        date: NaiveDate,
        payment_method_id: Uuid,
        field: BalanceField,
    ) -> Result<(), SettlementError> {
        let now = chrono::Utc::now().fixed_offset();
        let (opening, closing, update_column) = match field {
            BalanceField::Opening(amount) => (
                amount,
                Decimal::ZERO,
                daily_opening_balances::Column::OpeningAmount,
            ),
            BalanceField::Closing(amount) => (
                Decimal::ZERO,
                amount,
                daily_opening_balances::Column::ClosingAmount,
            ),
        };

        let model = daily_opening_balances::ActiveModel {
            id: Set(Uuid::new_v4()),
            company_id: Set(company_id),
            branch_id: Set(branch_id),
            payment_method_id: Set(payment_method_id),
            balance_date: Set(date),
            opening_amount: Set(opening),
            closing_amount: Set(closing),
            created_at: Set(now),
            updated_at: Set(now),
        };

        daily_opening_balances::Entity::insert(model)
            .on_conflict(
                OnConflict::columns([
                    daily_opening_balances::Column::BalanceDate,
                    daily_opening_balances::Column::PaymentMethodId,
                    daily_opening_balances::Column::BranchId,
                ])
                .update_columns([update_column, daily_opening_balances::Column::UpdatedAt])
                .to_owned(),
            )
            .exec(&self.db)
            .await?;

        Ok(())
    }
}

/// Which balance field an upsert writes.
#[derive(Debug, Clone, Copy)]
enum BalanceField {
    Opening(Decimal),
    Closing(Decimal),
}
