// ============================================================================
// LEDGER SERVICE
// ============================================================================
//
// Description:
//   Toute modification d'un solde du profil passe par ce service.
//   Chaque opération s'exécute dans UNE transaction SQL qui:
//     1. modifie la demande (dépôt / retrait / écriture)
//     2. modifie le solde dénormalisé du profil
//     3. crée ou met à jour la ligne de transaction_history correspondante
//   Les emails sont envoyés après le commit.
//
// Règles:
//   - Dépôt: crédité UNE SEULE fois, au passage vers "completed".
//     "completed" est terminal: re-marquer completed ne fait rien.
//   - Retrait: avail_balance débité à la création, remboursé si rejeté.
//     "completed" et "rejected" sont terminaux.
//   - Écritures ADA / Tax / Earnings / Balance: un débit ne peut pas rendre
//     le solde négatif.
//
// ============================================================================

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::*;
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::models::deposits::{self, DepositStatus, DepositType};
use crate::models::earnings_transactions::{self, EarningsSource};
use crate::models::enums::{EntryDirection, PaymentMethod};
use crate::models::transaction_history::{self, HistoryStatus, TransactionKind};
use crate::models::withdrawals::{self, WithdrawalStatus};
use crate::models::{ada_transactions, profiles, tax_transactions, users};
use crate::services::notifications::Notifier;
use crate::utils::money::{format_amount, round_money};

pub struct LedgerService;

/// deposits.amount: NUMERIC(10, 2)
const DEPOSIT_MAX_DIGITS: u32 = 10;
/// retraits, sous-ledgers, historique et soldes du profil: NUMERIC(15, 2)
const LEDGER_MAX_DIGITS: u32 = 15;

/// Solde du profil touché par une écriture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BalanceField {
    #[serde(rename = "balance")]
    Balance,
    #[serde(rename = "avail_balance")]
    Available,
    #[serde(rename = "ada")]
    Ada,
    #[serde(rename = "tax")]
    Tax,
    #[serde(rename = "earnings")]
    Earnings,
}

impl BalanceField {
    pub fn name(&self) -> &'static str {
        match self {
            BalanceField::Balance => "main",
            BalanceField::Available => "available",
            BalanceField::Ada => "ADA",
            BalanceField::Tax => "tax",
            BalanceField::Earnings => "earnings",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            BalanceField::Balance => "Balance",
            BalanceField::Available => "Available balance",
            BalanceField::Ada => "ADA",
            BalanceField::Tax => "Tax",
            BalanceField::Earnings => "Earnings",
        }
    }

    pub fn read(&self, profile: &profiles::Model) -> Decimal {
        match self {
            BalanceField::Balance => profile.balance,
            BalanceField::Available => profile.avail_balance,
            BalanceField::Ada => profile.ada,
            BalanceField::Tax => profile.tax_balance,
            BalanceField::Earnings => profile.earnings,
        }
    }

    fn write(&self, active: &mut profiles::ActiveModel, value: Decimal) {
        match self {
            BalanceField::Balance => active.balance = Set(value),
            BalanceField::Available => active.avail_balance = Set(value),
            BalanceField::Ada => active.ada = Set(value),
            BalanceField::Tax => active.tax_balance = Set(value),
            BalanceField::Earnings => active.earnings = Set(value),
        }
    }

    fn history_kind(&self) -> TransactionKind {
        match self {
            BalanceField::Balance | BalanceField::Available => TransactionKind::BalanceUpdate,
            BalanceField::Ada => TransactionKind::AdaUpdate,
            BalanceField::Tax => TransactionKind::TaxUpdate,
            BalanceField::Earnings => TransactionKind::EarningsUpdate,
        }
    }
}

impl From<DepositType> for BalanceField {
    fn from(deposit_type: DepositType) -> Self {
        match deposit_type {
            DepositType::Tax => BalanceField::Tax,
            DepositType::Fund => BalanceField::Balance,
            DepositType::Ada => BalanceField::Ada,
        }
    }
}

/// Mouvement appliqué à un solde
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BalanceChange {
    pub field: BalanceField,
    pub previous: Decimal,
    pub new: Decimal,
}

#[derive(Debug, Clone)]
pub struct NewDeposit {
    pub amount: Decimal,
    pub payment_type: PaymentMethod,
    pub deposit_type: DepositType,
    pub proof_of_payment: Option<String>,
    pub transaction_id: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewWithdrawal {
    pub amount: Decimal,
    pub payment_method: PaymentMethod,
    pub wallet_address: String,
    pub transaction_pin: Option<String>,
}

/// Écriture manuelle sur un solde (admin)
#[derive(Debug, Clone, Deserialize)]
pub struct LedgerEntry {
    pub user_id: i32,
    pub field: BalanceField,
    pub direction: EntryDirection,
    pub amount: Decimal,
    #[serde(default)]
    pub description: String,
    pub source: Option<EarningsSource>,
}

#[derive(Debug, Clone)]
pub struct DepositOutcome {
    pub deposit: deposits::Model,
    /// Some(..) uniquement quand CET appel a crédité le solde
    pub credited: Option<BalanceChange>,
}

#[derive(Debug, Clone)]
pub struct WithdrawalOutcome {
    pub withdrawal: withdrawals::Model,
    /// Débit à la création, remboursement au rejet
    pub change: Option<BalanceChange>,
}

#[derive(Debug, Clone)]
pub struct EntryOutcome {
    pub change: BalanceChange,
    pub history: transaction_history::Model,
}

struct HistoryEntry {
    user_id: i32,
    kind: TransactionKind,
    amount: Decimal,
    previous_balance: Decimal,
    new_balance: Decimal,
    status: HistoryStatus,
    description: String,
    reference_id: Option<String>,
    source_id: Option<i32>,
}

impl LedgerService {
    // ------------------------------------------------------------------
    // Dépôts
    // ------------------------------------------------------------------

    /// Crée une demande de dépôt (pending) et sa ligne d'historique
    pub async fn create_deposit(
        db: &DatabaseConnection,
        notifier: &Notifier,
        user_id: i32,
        request: NewDeposit,
    ) -> Result<deposits::Model, AppError> {
        let amount = positive_amount(request.amount, DEPOSIT_MAX_DIGITS)?;
        let proof = request
            .proof_of_payment
            .filter(|p| !p.trim().is_empty())
            .ok_or_else(|| AppError::validation("Amount, payment type, and proof of payment are required"))?;

        let txn = db.begin().await?;
        let user = load_user(&txn, user_id).await?;
        let profile = load_profile(&txn, user_id).await?;
        let now = Utc::now().naive_utc();

        let deposit = deposits::ActiveModel {
            user_id: Set(user_id),
            amount: Set(amount),
            payment_type: Set(request.payment_type),
            deposit_type: Set(request.deposit_type),
            status: Set(DepositStatus::Pending),
            transaction_id: Set(request.transaction_id.clone()),
            proof_of_payment: Set(Some(proof)),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        // Solde inchangé tant que le dépôt n'est pas complété
        record_history(
            &txn,
            HistoryEntry {
                user_id,
                kind: TransactionKind::Deposit,
                amount,
                previous_balance: profile.balance,
                new_balance: profile.balance,
                status: HistoryStatus::Pending,
                description: format!("Deposit via {}", deposit.payment_type.label()),
                reference_id: deposit.transaction_id.clone(),
                source_id: Some(deposit.id),
            },
        )
        .await?;

        txn.commit().await?;

        tracing::info!(deposit_id = deposit.id, user_id, amount = %amount, "deposit created");
        notifier.admin_new_deposit(&user, &deposit).await;

        Ok(deposit)
    }

    /// Change le statut d'un dépôt. Le passage vers "completed" crédite le
    /// solde correspondant au deposit_type, une seule fois.
    pub async fn set_deposit_status(
        db: &DatabaseConnection,
        notifier: &Notifier,
        deposit_id: i32,
        new_status: DepositStatus,
        transaction_id: Option<String>,
    ) -> Result<DepositOutcome, AppError> {
        let txn = db.begin().await?;

        let deposit = deposits::Entity::find_by_id(deposit_id)
            .one(&txn)
            .await?
            .ok_or_else(|| AppError::not_found("Deposit not found"))?;
        let old_status = deposit.status;

        if old_status == DepositStatus::Completed {
            if new_status == DepositStatus::Completed {
                tracing::info!(deposit_id, "deposit already completed, nothing to credit");
                return Ok(DepositOutcome { deposit, credited: None });
            }
            return Err(AppError::InvalidTransition {
                from: old_status.to_string(),
                to: new_status.to_string(),
            });
        }

        let user_id = deposit.user_id;
        let mut active: deposits::ActiveModel = deposit.into();
        active.status = Set(new_status);
        if let Some(tx_id) = transaction_id.filter(|t| !t.trim().is_empty()) {
            active.transaction_id = Set(Some(tx_id));
        }
        active.updated_at = Set(Utc::now().naive_utc());
        let deposit = active.update(&txn).await?;

        let history = find_source_history(&txn, user_id, TransactionKind::Deposit, deposit.id).await?;

        let credited = match new_status {
            DepositStatus::Completed => {
                let field = BalanceField::from(deposit.deposit_type);
                let profile = load_profile(&txn, user_id).await?;
                let change = apply_change(&txn, profile, field, EntryDirection::Credit, deposit.amount).await?;

                let description = format!(
                    "Deposit to {} via {}",
                    deposit.deposit_type.balance_label(),
                    deposit.payment_type.label()
                );
                upsert_history(
                    &txn,
                    history,
                    HistoryEntry {
                        user_id,
                        kind: TransactionKind::Deposit,
                        amount: deposit.amount,
                        previous_balance: change.previous,
                        new_balance: change.new,
                        status: HistoryStatus::Completed,
                        description,
                        reference_id: deposit.transaction_id.clone(),
                        source_id: Some(deposit.id),
                    },
                )
                .await?;
                Some(change)
            }
            DepositStatus::Failed | DepositStatus::Pending => {
                let status = if new_status == DepositStatus::Failed {
                    HistoryStatus::Failed
                } else {
                    HistoryStatus::Pending
                };
                if let Some(row) = history {
                    set_history_status(&txn, row, status).await?;
                }
                None
            }
        };

        txn.commit().await?;

        tracing::info!(deposit_id, from = %old_status, to = %new_status, "deposit status changed");

        if credited.is_some() {
            send_deposit_confirmation(db, notifier, user_id, &deposit).await;
        }

        Ok(DepositOutcome { deposit, credited })
    }

    // ------------------------------------------------------------------
    // Retraits
    // ------------------------------------------------------------------

    /// Crée une demande de retrait: vérifie le PIN, le minimum et le solde
    /// disponible, puis débite avail_balance.
    pub async fn create_withdrawal(
        db: &DatabaseConnection,
        notifier: &Notifier,
        min_withdrawal: Decimal,
        user_id: i32,
        request: NewWithdrawal,
    ) -> Result<WithdrawalOutcome, AppError> {
        let profile = load_profile(db, user_id).await?;

        let stored_pin = match profile.transaction_pin.as_deref() {
            Some(pin) if !pin.is_empty() => pin.to_string(),
            _ => return Err(AppError::PinRequired),
        };
        let given_pin = request
            .transaction_pin
            .as_deref()
            .filter(|p| !p.is_empty())
            .ok_or_else(|| AppError::validation("Transaction PIN is required"))?;
        if given_pin != stored_pin {
            return Err(AppError::validation("Invalid transaction PIN"));
        }

        let amount = positive_amount(request.amount, LEDGER_MAX_DIGITS)?;
        if amount < min_withdrawal {
            return Err(AppError::validation(format!(
                "Minimum withdrawal amount is ${}",
                min_withdrawal.normalize()
            )));
        }
        if request.wallet_address.trim().is_empty() {
            return Err(AppError::validation("Wallet address is required"));
        }

        let txn = db.begin().await?;
        let user = load_user(&txn, user_id).await?;
        // Relu dans la transaction
        let profile = load_profile(&txn, user_id).await?;
        if profile.avail_balance < amount {
            return Err(AppError::InsufficientFunds { field: BalanceField::Available.name() });
        }

        let now = Utc::now().naive_utc();
        let withdrawal = withdrawals::ActiveModel {
            user_id: Set(user_id),
            amount: Set(amount),
            payment_method: Set(request.payment_method),
            wallet_address: Set(request.wallet_address.trim().to_string()),
            transaction_id: Set(None),
            status: Set(WithdrawalStatus::Pending),
            notes: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        let change = apply_change(&txn, profile, BalanceField::Available, EntryDirection::Debit, amount).await?;

        record_history(
            &txn,
            HistoryEntry {
                user_id,
                kind: TransactionKind::Withdrawal,
                amount,
                previous_balance: change.previous,
                new_balance: change.new,
                status: HistoryStatus::Pending,
                description: format!("Withdrawal via {}", withdrawal.payment_method.label()),
                reference_id: None,
                source_id: Some(withdrawal.id),
            },
        )
        .await?;

        txn.commit().await?;

        tracing::info!(withdrawal_id = withdrawal.id, user_id, amount = %amount, "withdrawal created");
        notifier.admin_new_withdrawal(&user, &withdrawal).await;

        Ok(WithdrawalOutcome { withdrawal, change: Some(change) })
    }

    /// Change le statut d'un retrait (action admin)
    pub async fn set_withdrawal_status(
        db: &DatabaseConnection,
        notifier: &Notifier,
        withdrawal_id: i32,
        new_status: WithdrawalStatus,
        transaction_id: Option<String>,
        notes: Option<String>,
    ) -> Result<WithdrawalOutcome, AppError> {
        let txn = db.begin().await?;

        let withdrawal = withdrawals::Entity::find_by_id(withdrawal_id)
            .one(&txn)
            .await?
            .ok_or_else(|| AppError::not_found("Withdrawal not found"))?;
        let old_status = withdrawal.status;

        if old_status.is_terminal() {
            if old_status == new_status {
                return Ok(WithdrawalOutcome { withdrawal, change: None });
            }
            return Err(AppError::InvalidTransition {
                from: old_status.to_string(),
                to: new_status.to_string(),
            });
        }

        let user_id = withdrawal.user_id;
        let mut active: withdrawals::ActiveModel = withdrawal.into();
        active.status = Set(new_status);
        if let Some(tx_id) = transaction_id.filter(|t| !t.trim().is_empty()) {
            active.transaction_id = Set(Some(tx_id));
        }
        if let Some(notes) = notes {
            active.notes = Set(Some(notes));
        }
        active.updated_at = Set(Utc::now().naive_utc());
        let withdrawal = active.update(&txn).await?;

        let history = find_source_history(&txn, user_id, TransactionKind::Withdrawal, withdrawal.id).await?;

        let change = match new_status {
            WithdrawalStatus::Completed => {
                if let Some(row) = history {
                    let description = format!(
                        "Withdrawal completed via {} to {}",
                        withdrawal.payment_method.label(),
                        withdrawal.wallet_address
                    );
                    let mut active: transaction_history::ActiveModel = row.into();
                    active.status = Set(HistoryStatus::Completed);
                    active.description = Set(description);
                    active.reference_id = Set(withdrawal.transaction_id.clone());
                    active.updated_at = Set(Utc::now().naive_utc());
                    active.update(&txn).await?;
                }
                None
            }
            WithdrawalStatus::Rejected => {
                let profile = load_profile(&txn, user_id).await?;
                let change =
                    apply_change(&txn, profile, BalanceField::Available, EntryDirection::Credit, withdrawal.amount)
                        .await?;
                if let Some(row) = history {
                    set_history_status(&txn, row, HistoryStatus::Rejected).await?;
                }
                record_history(
                    &txn,
                    HistoryEntry {
                        user_id,
                        kind: TransactionKind::BalanceUpdate,
                        amount: withdrawal.amount,
                        previous_balance: change.previous,
                        new_balance: change.new,
                        status: HistoryStatus::Completed,
                        description: format!(
                            "Refund of rejected withdrawal via {}",
                            withdrawal.payment_method.label()
                        ),
                        reference_id: withdrawal.transaction_id.clone(),
                        source_id: Some(withdrawal.id),
                    },
                )
                .await?;
                Some(change)
            }
            WithdrawalStatus::Pending | WithdrawalStatus::Processing => None,
        };

        txn.commit().await?;

        tracing::info!(withdrawal_id, from = %old_status, to = %new_status, "withdrawal status changed");

        if new_status == WithdrawalStatus::Completed {
            send_withdrawal_approval(db, notifier, user_id, &withdrawal).await;
        }

        Ok(WithdrawalOutcome { withdrawal, change })
    }

    // ------------------------------------------------------------------
    // Écritures manuelles
    // ------------------------------------------------------------------

    /// Crédit / débit ADA, Tax ou Earnings: ligne du sous-ledger + historique
    pub async fn post_entry(db: &DatabaseConnection, entry: LedgerEntry) -> Result<EntryOutcome, AppError> {
        if !matches!(entry.field, BalanceField::Ada | BalanceField::Tax | BalanceField::Earnings) {
            return Err(AppError::validation("Entries can only target ada, tax or earnings"));
        }
        let amount = positive_amount(entry.amount, LEDGER_MAX_DIGITS)?;

        let txn = db.begin().await?;
        let profile = load_profile(&txn, entry.user_id).await?;
        let profile_id = profile.id;
        let change = apply_change(&txn, profile, entry.field, entry.direction, amount).await?;
        let now = Utc::now().naive_utc();

        let detail = match entry.field {
            BalanceField::Earnings => {
                let source = entry.source.unwrap_or(EarningsSource::Other);
                earnings_transactions::ActiveModel {
                    profile_id: Set(profile_id),
                    amount: Set(amount),
                    transaction_type: Set(entry.direction),
                    description: Set(entry.description.clone()),
                    source: Set(source),
                    created_at: Set(now),
                    ..Default::default()
                }
                .insert(&txn)
                .await?;
                source.label().to_string()
            }
            BalanceField::Ada => {
                ada_transactions::ActiveModel {
                    profile_id: Set(profile_id),
                    amount: Set(amount),
                    transaction_type: Set(entry.direction),
                    description: Set(entry.description.clone()),
                    created_at: Set(now),
                    ..Default::default()
                }
                .insert(&txn)
                .await?;
                entry.description.clone()
            }
            _ => {
                tax_transactions::ActiveModel {
                    profile_id: Set(profile_id),
                    amount: Set(amount),
                    transaction_type: Set(entry.direction),
                    description: Set(entry.description.clone()),
                    created_at: Set(now),
                    ..Default::default()
                }
                .insert(&txn)
                .await?;
                entry.description.clone()
            }
        };

        let description = if detail.is_empty() {
            format!("{} {}", entry.field.label(), entry.direction)
        } else {
            format!("{} {} - {}", entry.field.label(), entry.direction, detail)
        };

        let history = record_history(
            &txn,
            HistoryEntry {
                user_id: entry.user_id,
                kind: entry.field.history_kind(),
                amount,
                previous_balance: change.previous,
                new_balance: change.new,
                status: HistoryStatus::Completed,
                description,
                reference_id: None,
                source_id: None,
            },
        )
        .await?;

        txn.commit().await?;

        tracing::info!(
            user_id = entry.user_id,
            field = entry.field.name(),
            direction = %entry.direction,
            amount = %amount,
            "ledger entry posted"
        );

        Ok(EntryOutcome { change, history })
    }

    /// Correction admin du solde principal ou disponible
    pub async fn adjust_balance(db: &DatabaseConnection, entry: LedgerEntry) -> Result<EntryOutcome, AppError> {
        if !matches!(entry.field, BalanceField::Balance | BalanceField::Available) {
            return Err(AppError::validation("Adjustments can only target balance or avail_balance"));
        }
        let amount = positive_amount(entry.amount, LEDGER_MAX_DIGITS)?;

        let txn = db.begin().await?;
        let profile = load_profile(&txn, entry.user_id).await?;
        let change = apply_change(&txn, profile, entry.field, entry.direction, amount).await?;

        let description = if entry.description.trim().is_empty() {
            format!("{} {}", entry.field.label(), entry.direction)
        } else {
            entry.description.clone()
        };

        let history = record_history(
            &txn,
            HistoryEntry {
                user_id: entry.user_id,
                kind: TransactionKind::BalanceUpdate,
                amount,
                previous_balance: change.previous,
                new_balance: change.new,
                status: HistoryStatus::Completed,
                description,
                reference_id: None,
                source_id: None,
            },
        )
        .await?;

        txn.commit().await?;

        tracing::info!(
            user_id = entry.user_id,
            field = entry.field.name(),
            direction = %entry.direction,
            amount = %amount,
            "balance adjusted"
        );

        Ok(EntryOutcome { change, history })
    }
}

// Appelés après le commit: une erreur ne fait que sauter l'email

async fn send_deposit_confirmation(db: &DatabaseConnection, notifier: &Notifier, user_id: i32, deposit: &deposits::Model) {
    let result = match load_user(db, user_id).await {
        Ok(user) => notifier.deposit_confirmed(&user, deposit).await,
        Err(e) => Err(e),
    };
    if let Err(e) = result {
        tracing::warn!(error = %e, deposit_id = deposit.id, "deposit confirmation email failed");
    }
}

async fn send_withdrawal_approval(
    db: &DatabaseConnection,
    notifier: &Notifier,
    user_id: i32,
    withdrawal: &withdrawals::Model,
) {
    let result = match load_user(db, user_id).await {
        Ok(user) => notifier.withdrawal_approved(&user, withdrawal).await,
        Err(e) => Err(e),
    };
    if let Err(e) = result {
        tracing::warn!(error = %e, withdrawal_id = withdrawal.id, "withdrawal approval email failed");
    }
}

/// Plus petite valeur qui ne tient pas dans une colonne NUMERIC(max_digits, 2)
fn amount_limit(max_digits: u32) -> Decimal {
    Decimal::from(10_i64.pow(max_digits - 2))
}

fn positive_amount(amount: Decimal, max_digits: u32) -> Result<Decimal, AppError> {
    let amount = round_money(amount);
    if amount <= Decimal::ZERO {
        return Err(AppError::validation("Amount must be greater than 0"));
    }
    let limit = amount_limit(max_digits);
    if amount >= limit {
        return Err(AppError::validation(format!("Amount must be less than {}", limit)));
    }
    Ok(amount)
}

pub(crate) async fn load_user<C: ConnectionTrait>(conn: &C, user_id: i32) -> Result<users::Model, AppError> {
    users::Entity::find_by_id(user_id)
        .one(conn)
        .await?
        .ok_or_else(|| AppError::not_found("User not found"))
}

pub(crate) async fn load_profile<C: ConnectionTrait>(conn: &C, user_id: i32) -> Result<profiles::Model, AppError> {
    profiles::Entity::find()
        .filter(profiles::Column::UserId.eq(user_id))
        .one(conn)
        .await?
        .ok_or_else(|| AppError::not_found("Profile not found"))
}

/// Applique une écriture au profil et renvoie l'ancien / nouveau solde
async fn apply_change<C: ConnectionTrait>(
    conn: &C,
    profile: profiles::Model,
    field: BalanceField,
    direction: EntryDirection,
    amount: Decimal,
) -> Result<BalanceChange, AppError> {
    let previous = field.read(&profile);
    let new = direction.apply(previous, amount);
    if new < Decimal::ZERO {
        return Err(AppError::InsufficientFunds { field: field.name() });
    }
    if new >= amount_limit(LEDGER_MAX_DIGITS) {
        return Err(AppError::validation(format!("Resulting {} balance is too large", field.name())));
    }

    let mut active: profiles::ActiveModel = profile.into();
    field.write(&mut active, new);
    active.updated_at = Set(Utc::now().naive_utc());
    active.update(conn).await?;

    tracing::debug!(
        field = field.name(),
        previous = %format_amount(previous),
        new = %format_amount(new),
        "profile balance updated"
    );

    Ok(BalanceChange { field, previous, new })
}

async fn record_history<C: ConnectionTrait>(
    conn: &C,
    entry: HistoryEntry,
) -> Result<transaction_history::Model, AppError> {
    let now = Utc::now().naive_utc();
    let row = transaction_history::ActiveModel {
        user_id: Set(entry.user_id),
        transaction_type: Set(entry.kind),
        amount: Set(entry.amount),
        previous_balance: Set(entry.previous_balance),
        new_balance: Set(entry.new_balance),
        status: Set(entry.status),
        description: Set(entry.description),
        reference_id: Set(entry.reference_id),
        source_id: Set(entry.source_id),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(conn)
    .await?;
    Ok(row)
}

/// Met à jour la ligne existante, ou la crée si elle manque
async fn upsert_history<C: ConnectionTrait>(
    conn: &C,
    existing: Option<transaction_history::Model>,
    entry: HistoryEntry,
) -> Result<transaction_history::Model, AppError> {
    let Some(row) = existing else {
        return record_history(conn, entry).await;
    };

    let mut active: transaction_history::ActiveModel = row.into();
    active.previous_balance = Set(entry.previous_balance);
    active.new_balance = Set(entry.new_balance);
    active.status = Set(entry.status);
    active.description = Set(entry.description);
    active.reference_id = Set(entry.reference_id);
    active.updated_at = Set(Utc::now().naive_utc());
    Ok(active.update(conn).await?)
}

async fn set_history_status<C: ConnectionTrait>(
    conn: &C,
    row: transaction_history::Model,
    status: HistoryStatus,
) -> Result<transaction_history::Model, AppError> {
    let mut active: transaction_history::ActiveModel = row.into();
    active.status = Set(status);
    active.updated_at = Set(Utc::now().naive_utc());
    Ok(active.update(conn).await?)
}

async fn find_source_history<C: ConnectionTrait>(
    conn: &C,
    user_id: i32,
    kind: TransactionKind,
    source_id: i32,
) -> Result<Option<transaction_history::Model>, AppError> {
    Ok(transaction_history::Entity::find()
        .filter(transaction_history::Column::UserId.eq(user_id))
        .filter(transaction_history::Column::TransactionType.eq(kind))
        .filter(transaction_history::Column::SourceId.eq(source_id))
        .order_by_asc(transaction_history::Column::Id)
        .one(conn)
        .await?)
}
