//! Pot store business logic - Handles all pot-related operations.
//!
//! Provides functions for creating, retrieving, updating, and deleting
//! spending and savings pots. Balance movements on spending pots always go
//! through [`apply_spend_delta`], which keeps `amount_spent + amount_left ==
//! amount_allocated` by moving both columns in a single atomic update.

use crate::{
    entities::{
        AutomaticRule, HistoricPot, SavingsPot, SpendingPot, Transaction, automatic_rule,
        historic_pot, savings_pot, spending_pot, transaction,
    },
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, prelude::*};

/// Retrieves all spending pots, ordered alphabetically by name.
pub async fn get_all_spending_pots<C>(db: &C) -> Result<Vec<spending_pot::Model>>
where
    C: ConnectionTrait,
{
    SpendingPot::find()
        .order_by_asc(spending_pot::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves all savings pots, ordered alphabetically by name.
pub async fn get_all_savings_pots<C>(db: &C) -> Result<Vec<savings_pot::Model>>
where
    C: ConnectionTrait,
{
    SavingsPot::find()
        .order_by_asc(savings_pot::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Finds a spending pot by its unique ID.
pub async fn get_spending_pot_by_id<C>(db: &C, pot_id: i64) -> Result<Option<spending_pot::Model>>
where
    C: ConnectionTrait,
{
    SpendingPot::find_by_id(pot_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Finds a spending pot by its user-visible name.
pub async fn get_spending_pot_by_name(
    db: &DatabaseConnection,
    name: &str,
) -> Result<Option<spending_pot::Model>> {
    SpendingPot::find()
        .filter(spending_pot::Column::Name.eq(name))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Finds a savings pot by its unique ID.
pub async fn get_savings_pot_by_id<C>(db: &C, pot_id: i64) -> Result<Option<savings_pot::Model>>
where
    C: ConnectionTrait,
{
    SavingsPot::find_by_id(pot_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Creates a new spending pot with the given initial allocation.
///
/// Validates that the name is non-empty after trimming and unique, and that
/// the allocation is non-negative. The new pot starts fully unspent:
/// `amount_left == amount_allocated`, `amount_spent == 0`.
pub async fn create_spending_pot(
    db: &DatabaseConnection,
    name: String,
    initial_allocation: i64,
) -> Result<spending_pot::Model> {
    let name = name.trim().to_string();
    if name.is_empty() {
        return Err(Error::InvalidName {
            message: "Pot name cannot be empty".to_string(),
        });
    }
    if initial_allocation < 0 {
        return Err(Error::InvalidAllocation {
            message: format!("Allocation cannot be negative: {initial_allocation}"),
        });
    }

    if get_spending_pot_by_name(db, &name).await?.is_some() {
        return Err(Error::AlreadyExists { name });
    }

    let pot = spending_pot::ActiveModel {
        name: Set(name),
        amount_allocated: Set(initial_allocation),
        amount_added_this_cycle: Set(initial_allocation),
        amount_spent: Set(0),
        amount_left: Set(initial_allocation),
        ..Default::default()
    };

    let result = pot.insert(db).await?;
    Ok(result)
}

/// Creates a new savings pot starting at zero.
pub async fn create_savings_pot(
    db: &DatabaseConnection,
    name: String,
) -> Result<savings_pot::Model> {
    let name = name.trim().to_string();
    if name.is_empty() {
        return Err(Error::InvalidName {
            message: "Pot name cannot be empty".to_string(),
        });
    }

    let existing = SavingsPot::find()
        .filter(savings_pot::Column::Name.eq(name.clone()))
        .one(db)
        .await?;
    if existing.is_some() {
        return Err(Error::AlreadyExists { name });
    }

    let pot = savings_pot::ActiveModel {
        name: Set(name),
        amount_saved: Set(0),
        amount_added_this_cycle: Set(0),
        ..Default::default()
    };

    let result = pot.insert(db).await?;
    Ok(result)
}

/// Moves a spend amount through a spending pot atomically.
///
/// A positive `delta` records spending (`amount_spent` up, `amount_left`
/// down); a negative `delta` reverses it. Both columns move in one SQL
/// UPDATE so a crash or concurrent writer can never observe a pot where
/// `amount_spent + amount_left != amount_allocated`:
/// `UPDATE spending_pots SET amount_spent = amount_spent + d,
/// amount_left = amount_left - d WHERE id = ?`
///
/// Overdrawing is allowed: `amount_left` may go negative.
pub async fn apply_spend_delta<C>(db: &C, pot_id: i64, delta: i64) -> Result<spending_pot::Model>
where
    C: ConnectionTrait,
{
    use sea_orm::sea_query::Expr;

    // First verify the pot exists
    let _pot = SpendingPot::find_by_id(pot_id)
        .one(db)
        .await?
        .ok_or(Error::PotNotFound { id: pot_id })?;

    SpendingPot::update_many()
        .col_expr(
            spending_pot::Column::AmountSpent,
            Expr::col(spending_pot::Column::AmountSpent).add(delta),
        )
        .col_expr(
            spending_pot::Column::AmountLeft,
            Expr::col(spending_pot::Column::AmountLeft).sub(delta),
        )
        .filter(spending_pot::Column::Id.eq(pot_id))
        .exec(db)
        .await?;

    // Return the updated pot
    SpendingPot::find_by_id(pot_id)
        .one(db)
        .await?
        .ok_or(Error::PotNotFound { id: pot_id })
}

/// Renames a spending pot, keeping the uniqueness rules of creation.
pub async fn rename_spending_pot(
    db: &DatabaseConnection,
    pot_id: i64,
    new_name: String,
) -> Result<spending_pot::Model> {
    let new_name = new_name.trim().to_string();
    if new_name.is_empty() {
        return Err(Error::InvalidName {
            message: "Pot name cannot be empty".to_string(),
        });
    }

    let pot = get_spending_pot_by_id(db, pot_id)
        .await?
        .ok_or(Error::PotNotFound { id: pot_id })?;

    if let Some(existing) = get_spending_pot_by_name(db, &new_name).await? {
        if existing.id != pot_id {
            return Err(Error::AlreadyExists { name: new_name });
        }
    }

    let mut active: spending_pot::ActiveModel = pot.into();
    active.name = Set(new_name);
    active.update(db).await.map_err(Into::into)
}

/// Deletes a spending pot after checking for dependents.
///
/// There is no cascade: if any transaction, automatic rule, or historic
/// snapshot still references the pot, the delete is rejected with
/// `Conflict` and the caller must clean up first.
pub async fn delete_spending_pot(db: &DatabaseConnection, pot_id: i64) -> Result<()> {
    let pot = get_spending_pot_by_id(db, pot_id)
        .await?
        .ok_or(Error::PotNotFound { id: pot_id })?;

    let transaction_count = Transaction::find()
        .filter(transaction::Column::PotId.eq(pot_id))
        .count(db)
        .await?;
    if transaction_count > 0 {
        return Err(Error::Conflict {
            message: format!("Pot {pot_id} is referenced by {transaction_count} transactions"),
        });
    }

    let split_count = crate::entities::TransactionSplit::find()
        .filter(crate::entities::TransactionSplitColumn::PotId.eq(pot_id))
        .count(db)
        .await?;
    if split_count > 0 {
        return Err(Error::Conflict {
            message: format!("Pot {pot_id} is referenced by {split_count} transaction splits"),
        });
    }

    let rule_count = AutomaticRule::find()
        .filter(automatic_rule::Column::PotId.eq(pot_id))
        .count(db)
        .await?;
    if rule_count > 0 {
        return Err(Error::Conflict {
            message: format!("Pot {pot_id} is referenced by {rule_count} automatic rules"),
        });
    }

    let historic_count = HistoricPot::find()
        .filter(historic_pot::Column::PotId.eq(pot_id))
        .count(db)
        .await?;
    if historic_count > 0 {
        return Err(Error::Conflict {
            message: format!("Pot {pot_id} is referenced by {historic_count} historic snapshots"),
        });
    }

    pot.delete(db).await?;
    Ok(())
}

/// Deletes a savings pot.
///
/// Savings pots have no dependent rows, so this only fails when the pot
/// does not exist.
pub async fn delete_savings_pot(db: &DatabaseConnection, pot_id: i64) -> Result<()> {
    let pot = get_savings_pot_by_id(db, pot_id)
        .await?
        .ok_or(Error::PotNotFound { id: pot_id })?;

    pot.delete(db).await?;
    Ok(())
}

/// Seeds missing pots from the seed configuration.
///
/// Pots that already exist (by name) are left untouched; only missing ones
/// are created. Used at startup to bootstrap a fresh database.
pub async fn seed_initial_pots(
    db: &DatabaseConnection,
    config: &crate::config::pots::SeedConfig,
) -> Result<usize> {
    let mut created = 0;

    for seed in &config.spending_pots {
        if get_spending_pot_by_name(db, &seed.name).await?.is_none() {
            create_spending_pot(db, seed.name.clone(), seed.allocation).await?;
            created += 1;
        }
    }

    for seed in &config.savings_pots {
        let existing = SavingsPot::find()
            .filter(savings_pot::Column::Name.eq(seed.name.clone()))
            .one(db)
            .await?;
        if existing.is_none() {
            create_savings_pot(db, seed.name.clone()).await?;
            created += 1;
        }
    }

    Ok(created)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::{create_test_spending_pot, setup_test_db};

    #[tokio::test]
    async fn test_create_spending_pot_validation() -> Result<()> {
        let db = setup_test_db().await?;

        let result = create_spending_pot(&db, String::new(), 100).await;
        assert!(matches!(result.unwrap_err(), Error::InvalidName { message: _ }));

        let result = create_spending_pot(&db, "   ".to_string(), 100).await;
        assert!(matches!(result.unwrap_err(), Error::InvalidName { message: _ }));

        let result = create_spending_pot(&db, "Groceries".to_string(), -1).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::InvalidAllocation { message: _ }
        ));

        Ok(())
    }

    #[tokio::test]
    async fn test_create_spending_pot_starts_unspent() -> Result<()> {
        let db = setup_test_db().await?;

        let pot = create_spending_pot(&db, "Groceries".to_string(), 10000).await?;
        assert_eq!(pot.amount_allocated, 10000);
        assert_eq!(pot.amount_added_this_cycle, 10000);
        assert_eq!(pot.amount_spent, 0);
        assert_eq!(pot.amount_left, 10000);

        Ok(())
    }

    #[tokio::test]
    async fn test_create_spending_pot_duplicate_name() -> Result<()> {
        let db = setup_test_db().await?;

        create_spending_pot(&db, "Groceries".to_string(), 10000).await?;
        let result = create_spending_pot(&db, "Groceries".to_string(), 5000).await;
        assert!(matches!(result.unwrap_err(), Error::AlreadyExists { name } if name == "Groceries"));

        Ok(())
    }

    #[tokio::test]
    async fn test_apply_spend_delta_keeps_invariant() -> Result<()> {
        let db = setup_test_db().await?;
        let pot = create_test_spending_pot(&db, "Groceries", 10000).await?;

        let updated = apply_spend_delta(&db, pot.id, 3000).await?;
        assert_eq!(updated.amount_spent, 3000);
        assert_eq!(updated.amount_left, 7000);
        assert_eq!(
            updated.amount_spent + updated.amount_left,
            updated.amount_allocated
        );

        // Reversal restores the original state exactly
        let reversed = apply_spend_delta(&db, pot.id, -3000).await?;
        assert_eq!(reversed.amount_spent, 0);
        assert_eq!(reversed.amount_left, 10000);

        Ok(())
    }

    #[tokio::test]
    async fn test_apply_spend_delta_allows_overdraw() -> Result<()> {
        let db = setup_test_db().await?;
        let pot = create_test_spending_pot(&db, "Groceries", 1000).await?;

        let updated = apply_spend_delta(&db, pot.id, 1500).await?;
        assert_eq!(updated.amount_spent, 1500);
        assert_eq!(updated.amount_left, -500);

        Ok(())
    }

    #[tokio::test]
    async fn test_apply_spend_delta_pot_not_found() -> Result<()> {
        let db = setup_test_db().await?;

        let result = apply_spend_delta(&db, 999, 100).await;
        assert!(matches!(result.unwrap_err(), Error::PotNotFound { id: 999 }));

        Ok(())
    }

    #[tokio::test]
    async fn test_rename_spending_pot() -> Result<()> {
        let db = setup_test_db().await?;
        let pot = create_test_spending_pot(&db, "Groceries", 10000).await?;
        create_test_spending_pot(&db, "Eating Out", 5000).await?;

        let renamed = rename_spending_pot(&db, pot.id, "Food".to_string()).await?;
        assert_eq!(renamed.name, "Food");

        // Renaming onto another pot's name is rejected
        let result = rename_spending_pot(&db, pot.id, "Eating Out".to_string()).await;
        assert!(matches!(result.unwrap_err(), Error::AlreadyExists { name: _ }));

        // Renaming to its own name is a no-op, not a collision
        let same = rename_spending_pot(&db, pot.id, "Food".to_string()).await?;
        assert_eq!(same.name, "Food");

        Ok(())
    }

    #[tokio::test]
    async fn test_delete_spending_pot_rejects_dependents() -> Result<()> {
        let db = setup_test_db().await?;
        let pot = create_test_spending_pot(&db, "Groceries", 10000).await?;

        crate::core::rules::add_rule(&db, "Tesco".to_string(), pot.id, false).await?;

        let result = delete_spending_pot(&db, pot.id).await;
        assert!(matches!(result.unwrap_err(), Error::Conflict { message: _ }));

        Ok(())
    }

    #[tokio::test]
    async fn test_delete_spending_pot_without_dependents() -> Result<()> {
        let db = setup_test_db().await?;
        let pot = create_test_spending_pot(&db, "Groceries", 10000).await?;

        delete_spending_pot(&db, pot.id).await?;
        assert!(get_spending_pot_by_id(&db, pot.id).await?.is_none());

        Ok(())
    }

    #[tokio::test]
    async fn test_create_savings_pot() -> Result<()> {
        let db = setup_test_db().await?;

        let pot = create_savings_pot(&db, "Holiday".to_string()).await?;
        assert_eq!(pot.amount_saved, 0);
        assert_eq!(pot.amount_added_this_cycle, 0);

        let result = create_savings_pot(&db, "Holiday".to_string()).await;
        assert!(matches!(result.unwrap_err(), Error::AlreadyExists { name: _ }));

        Ok(())
    }

    #[tokio::test]
    async fn test_delete_savings_pot() -> Result<()> {
        let db = setup_test_db().await?;
        let pot = create_savings_pot(&db, "Holiday".to_string()).await?;

        delete_savings_pot(&db, pot.id).await?;
        assert!(get_savings_pot_by_id(&db, pot.id).await?.is_none());

        let result = delete_savings_pot(&db, pot.id).await;
        assert!(matches!(result.unwrap_err(), Error::PotNotFound { id: _ }));

        Ok(())
    }

    #[tokio::test]
    async fn test_seed_initial_pots_is_idempotent() -> Result<()> {
        let db = setup_test_db().await?;

        let config: crate::config::pots::SeedConfig = toml::from_str(
            r#"
            [[spending_pots]]
            name = "Groceries"
            allocation = 40000

            [[savings_pots]]
            name = "Holiday"
        "#,
        )
        .unwrap();

        let created = seed_initial_pots(&db, &config).await?;
        assert_eq!(created, 2);

        // Second run creates nothing and changes nothing
        let created_again = seed_initial_pots(&db, &config).await?;
        assert_eq!(created_again, 0);
        assert_eq!(get_all_spending_pots(&db).await?.len(), 1);
        assert_eq!(get_all_savings_pots(&db).await?.len(), 1);

        Ok(())
    }
}
