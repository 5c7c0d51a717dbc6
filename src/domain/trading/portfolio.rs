//! Portfolio valuation against a current-price snapshot.
//!
//! Pure: holdings in, summary out, same inputs always produce the same
//! summary. Valuations are ordered by asset id.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::domain::errors::PortfolioError;

/// A user-declared position: how much is held and at what cost.
///
/// # Invariants
///
/// - `quantity >= 0`
/// - `purchase_price >= 0`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Holding {
    pub id: String,
    pub quantity: Decimal,
    pub purchase_price: Decimal,
}

/// Valuation of a single holding at current prices.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HoldingValuation {
    pub id: String,
    pub quantity: Decimal,
    pub current_price: Decimal,
    pub value: Decimal,
    pub cost_basis: Decimal,
    pub pnl_abs: Decimal,
    /// Fractional P&L (`pnl_abs / cost_basis`), `None` when the cost basis
    /// is zero.
    pub pnl_pct: Option<Decimal>,
    /// Share of total portfolio value, zero when the total is zero.
    pub allocation: Decimal,
}

/// Full portfolio valuation for one analysis cycle.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PortfolioSummary {
    pub holdings: Vec<HoldingValuation>,
    pub total_value: Decimal,
    pub total_cost_basis: Decimal,
    pub total_pnl_abs: Decimal,
}

/// Value holdings against a price lookup.
///
/// Fails with `UnknownAsset` on the first holding whose id has no current
/// price; a partial valuation is never produced.
pub fn value_portfolio(
    holdings: &[Holding],
    prices: &HashMap<String, Decimal>,
) -> Result<PortfolioSummary, PortfolioError> {
    let mut valuations: Vec<HoldingValuation> = Vec::with_capacity(holdings.len());

    for holding in holdings {
        let current_price =
            *prices
                .get(&holding.id)
                .ok_or_else(|| PortfolioError::UnknownAsset {
                    id: holding.id.clone(),
                })?;

        let value = holding.quantity * current_price;
        let cost_basis = holding.quantity * holding.purchase_price;
        let pnl_abs = value - cost_basis;
        let pnl_pct = if cost_basis.is_zero() {
            None
        } else {
            Some(pnl_abs / cost_basis)
        };

        valuations.push(HoldingValuation {
            id: holding.id.clone(),
            quantity: holding.quantity,
            current_price,
            value,
            cost_basis,
            pnl_abs,
            pnl_pct,
            allocation: Decimal::ZERO,
        });
    }

    valuations.sort_by(|a, b| a.id.cmp(&b.id));

    let total_value: Decimal = valuations.iter().map(|v| v.value).sum();
    let total_cost_basis: Decimal = valuations.iter().map(|v| v.cost_basis).sum();
    let total_pnl_abs = total_value - total_cost_basis;

    if !total_value.is_zero() {
        for valuation in &mut valuations {
            valuation.allocation = valuation.value / total_value;
        }
    }

    Ok(PortfolioSummary {
        holdings: valuations,
        total_value,
        total_cost_basis,
        total_pnl_abs,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn holding(id: &str, quantity: Decimal, purchase_price: Decimal) -> Holding {
        Holding {
            id: id.to_string(),
            quantity,
            purchase_price,
        }
    }

    #[test]
    fn single_holding_valuation() {
        let holdings = [holding("btc", dec!(2), dec!(10))];
        let prices = HashMap::from([("btc".to_string(), dec!(15))]);

        let summary = value_portfolio(&holdings, &prices).unwrap();
        let v = &summary.holdings[0];
        assert_eq!(v.value, dec!(30));
        assert_eq!(v.cost_basis, dec!(20));
        assert_eq!(v.pnl_abs, dec!(10));
        assert_eq!(v.pnl_pct, Some(dec!(0.5)));
        assert_eq!(v.allocation, dec!(1));
        assert_eq!(summary.total_value, dec!(30));
    }

    #[test]
    fn total_is_sum_of_values_and_weights_sum_to_one() {
        let holdings = [
            holding("btc", dec!(1), dec!(40000)),
            holding("eth", dec!(10), dec!(2000)),
            holding("sol", dec!(100), dec!(90)),
        ];
        let prices = HashMap::from([
            ("btc".to_string(), dec!(50000)),
            ("eth".to_string(), dec!(2500)),
            ("sol".to_string(), dec!(80)),
        ]);

        let summary = value_portfolio(&holdings, &prices).unwrap();
        let value_sum: Decimal = summary.holdings.iter().map(|v| v.value).sum();
        assert_eq!(summary.total_value, value_sum);

        let weight_sum: Decimal = summary.holdings.iter().map(|v| v.allocation).sum();
        assert!((weight_sum - dec!(1)).abs() < dec!(0.000000001));
    }

    #[test]
    fn unknown_asset_fails_fast() {
        let holdings = [holding("doge", dec!(1000), dec!(0.1))];
        let err = value_portfolio(&holdings, &HashMap::new()).unwrap_err();
        assert_eq!(
            err,
            PortfolioError::UnknownAsset {
                id: "doge".to_string()
            }
        );
    }

    #[test]
    fn zero_cost_basis_has_no_percentage_pnl() {
        let holdings = [holding("airdrop", dec!(100), dec!(0))];
        let prices = HashMap::from([("airdrop".to_string(), dec!(2))]);

        let summary = value_portfolio(&holdings, &prices).unwrap();
        assert_eq!(summary.holdings[0].pnl_pct, None);
        assert_eq!(summary.holdings[0].pnl_abs, dec!(200));
    }

    #[test]
    fn zero_total_value_keeps_all_allocations_zero() {
        let holdings = [
            holding("a", dec!(0), dec!(5)),
            holding("b", dec!(0), dec!(7)),
        ];
        let prices = HashMap::from([
            ("a".to_string(), dec!(1)),
            ("b".to_string(), dec!(1)),
        ]);

        let summary = value_portfolio(&holdings, &prices).unwrap();
        assert_eq!(summary.total_value, Decimal::ZERO);
        assert!(summary
            .holdings
            .iter()
            .all(|v| v.allocation == Decimal::ZERO));
    }

    #[test]
    fn output_is_ordered_by_id_regardless_of_input_order() {
        let prices = HashMap::from([
            ("btc".to_string(), dec!(1)),
            ("ada".to_string(), dec!(1)),
            ("eth".to_string(), dec!(1)),
        ]);
        let holdings = [
            holding("eth", dec!(1), dec!(1)),
            holding("ada", dec!(1), dec!(1)),
            holding("btc", dec!(1), dec!(1)),
        ];

        let summary = value_portfolio(&holdings, &prices).unwrap();
        let ids: Vec<&str> = summary.holdings.iter().map(|v| v.id.as_str()).collect();
        assert_eq!(ids, vec!["ada", "btc", "eth"]);
    }
}
