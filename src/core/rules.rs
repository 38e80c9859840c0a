//! Automatic categorisation rules - merchant name to default pot mapping.
//!
//! Rules are consulted by the ingestion entry point to pre-assign a pot to a
//! new transaction. Merchant names are unique case-insensitively; the lookup
//! lowers both sides so "TESCO" and "tesco" are the same rule.

use crate::{
    entities::{AutomaticRule, SpendingPot, automatic_rule},
    errors::{Error, Result},
};
use sea_orm::{
    QueryOrder, Set,
    prelude::*,
    sea_query::{Expr, Func},
};

/// Builds the case-insensitive merchant name filter used by lookups.
fn merchant_name_matches(merchant_name: &str) -> sea_orm::sea_query::SimpleExpr {
    Expr::expr(Func::lower(Expr::col(automatic_rule::Column::MerchantName)))
        .eq(merchant_name.to_lowercase())
}

/// Adds a categorisation rule for a merchant.
///
/// Fails with `AlreadyExists` if a rule for that merchant already exists
/// (case-insensitive compare) and with `PotNotFound` if the target spending
/// pot does not exist.
pub async fn add_rule(
    db: &DatabaseConnection,
    merchant_name: String,
    pot_id: i64,
    is_subscription: bool,
) -> Result<automatic_rule::Model> {
    let merchant_name = merchant_name.trim().to_string();
    if merchant_name.is_empty() {
        return Err(Error::InvalidName {
            message: "Merchant name cannot be empty".to_string(),
        });
    }

    SpendingPot::find_by_id(pot_id)
        .one(db)
        .await?
        .ok_or(Error::PotNotFound { id: pot_id })?;

    let existing = AutomaticRule::find()
        .filter(merchant_name_matches(&merchant_name))
        .one(db)
        .await?;
    if existing.is_some() {
        return Err(Error::AlreadyExists {
            name: merchant_name,
        });
    }

    let rule = automatic_rule::ActiveModel {
        merchant_name: Set(merchant_name),
        pot_id: Set(pot_id),
        is_subscription: Set(is_subscription),
        ..Default::default()
    };

    let result = rule.insert(db).await?;
    Ok(result)
}

/// Looks up the default pot for a merchant name, case-insensitively.
///
/// Pure read with no side effects; returns `None` when no rule matches.
pub async fn match_merchant<C>(db: &C, merchant_name: &str) -> Result<Option<i64>>
where
    C: ConnectionTrait,
{
    let rule = AutomaticRule::find()
        .filter(merchant_name_matches(merchant_name))
        .one(db)
        .await?;

    Ok(rule.map(|r| r.pot_id))
}

/// Removes a rule by id.
///
/// Previously allocated transactions are unaffected; the rule only applies
/// at ingestion time.
pub async fn remove_rule(db: &DatabaseConnection, rule_id: i64) -> Result<()> {
    let rule = AutomaticRule::find_by_id(rule_id)
        .one(db)
        .await?
        .ok_or(Error::RuleNotFound { id: rule_id })?;

    rule.delete(db).await?;
    Ok(())
}

/// Retrieves all rules, ordered alphabetically by merchant name.
pub async fn get_all_rules(db: &DatabaseConnection) -> Result<Vec<automatic_rule::Model>> {
    AutomaticRule::find()
        .order_by_asc(automatic_rule::Column::MerchantName)
        .all(db)
        .await
        .map_err(Into::into)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::{create_test_spending_pot, setup_test_db};

    #[tokio::test]
    async fn test_add_rule_requires_existing_pot() -> Result<()> {
        let db = setup_test_db().await?;

        let result = add_rule(&db, "Tesco".to_string(), 999, false).await;
        assert!(matches!(result.unwrap_err(), Error::PotNotFound { id: 999 }));

        Ok(())
    }

    #[tokio::test]
    async fn test_add_rule_rejects_empty_merchant_name() -> Result<()> {
        let db = setup_test_db().await?;
        let pot = create_test_spending_pot(&db, "Groceries", 10000).await?;

        let result = add_rule(&db, "   ".to_string(), pot.id, false).await;
        assert!(matches!(result.unwrap_err(), Error::InvalidName { message: _ }));

        Ok(())
    }

    #[tokio::test]
    async fn test_add_rule_case_insensitive_duplicate() -> Result<()> {
        let db = setup_test_db().await?;
        let pot = create_test_spending_pot(&db, "Groceries", 10000).await?;

        add_rule(&db, "Tesco".to_string(), pot.id, false).await?;

        let result = add_rule(&db, "TESCO".to_string(), pot.id, false).await;
        assert!(matches!(result.unwrap_err(), Error::AlreadyExists { name } if name == "TESCO"));

        Ok(())
    }

    #[tokio::test]
    async fn test_match_merchant_case_insensitive() -> Result<()> {
        let db = setup_test_db().await?;
        let pot = create_test_spending_pot(&db, "Groceries", 10000).await?;

        add_rule(&db, "Tesco".to_string(), pot.id, false).await?;

        assert_eq!(match_merchant(&db, "tesco").await?, Some(pot.id));
        assert_eq!(match_merchant(&db, "TESCO").await?, Some(pot.id));
        assert_eq!(match_merchant(&db, "Sainsburys").await?, None);

        Ok(())
    }

    #[tokio::test]
    async fn test_remove_rule() -> Result<()> {
        let db = setup_test_db().await?;
        let pot = create_test_spending_pot(&db, "Bills", 20000).await?;

        let rule = add_rule(&db, "Netflix".to_string(), pot.id, true).await?;
        assert!(rule.is_subscription);

        remove_rule(&db, rule.id).await?;
        assert_eq!(match_merchant(&db, "Netflix").await?, None);

        let result = remove_rule(&db, rule.id).await;
        assert!(matches!(result.unwrap_err(), Error::RuleNotFound { id: _ }));

        Ok(())
    }

    #[tokio::test]
    async fn test_get_all_rules_ordered() -> Result<()> {
        let db = setup_test_db().await?;
        let pot = create_test_spending_pot(&db, "Groceries", 10000).await?;

        add_rule(&db, "Tesco".to_string(), pot.id, false).await?;
        add_rule(&db, "Aldi".to_string(), pot.id, false).await?;

        let rules = get_all_rules(&db).await?;
        assert_eq!(rules.len(), 2);
        assert_eq!(rules[0].merchant_name, "Aldi");
        assert_eq!(rules[1].merchant_name, "Tesco");

        Ok(())
    }
}
