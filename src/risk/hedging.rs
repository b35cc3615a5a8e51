//! Hedge quotes for open positions.
//!
//! Option delta is an input, like market volatility. The quotes themselves
//! are deterministic.

use serde::{Deserialize, Serialize};

/// Cost of a delta-neutral hedge as a fraction of the hedged amount.
pub const DELTA_HEDGE_COST_RATE: f64 = 0.001;
/// Put expiry in years (one day).
pub const PUT_EXPIRY_YEARS: f64 = 1.0 / 365.0;
/// Annualized volatility assumed when pricing puts.
pub const PUT_VOLATILITY: f64 = 0.5;
/// Scale applied to the simplified put premium.
const PUT_PREMIUM_SCALE: f64 = 0.1;

/// An open position to hedge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub token: String,
    /// Position size in token units.
    pub amount: f64,
    /// Spot price of the token.
    pub price: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeltaNeutralHedge {
    /// Signed offset in token units; negative means sell.
    pub hedge_amount: f64,
    pub hedge_token: String,
    pub cost: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProtectivePut {
    pub strike_price: f64,
    pub premium: f64,
    /// Loss is capped at the premium paid.
    pub max_loss: f64,
    pub breakeven: f64,
}

/// Offsets the position's delta exposure.
pub fn delta_neutral_hedge(position: &Position, delta: f64) -> DeltaNeutralHedge {
    let hedge_amount = -position.amount * delta;

    DeltaNeutralHedge {
        hedge_amount,
        hedge_token: position.token.clone(),
        cost: hedge_amount.abs() * DELTA_HEDGE_COST_RATE,
    }
}

/// Quotes a protective put at the given strike.
pub fn protective_put(position: &Position, strike_price: f64) -> ProtectivePut {
    let premium = put_premium(position.price, strike_price);

    ProtectivePut {
        strike_price,
        premium,
        max_loss: premium,
        breakeven: position.price + premium,
    }
}

/// Simplified one-day put premium: `spot * vol * sqrt(t) * (strike / spot) * 0.1`.
///
/// Returns 0 for a non-positive spot price.
pub fn put_premium(spot_price: f64, strike_price: f64) -> f64 {
    if spot_price <= 0.0 {
        return 0.0;
    }

    let moneyness = strike_price / spot_price;
    let base_premium = spot_price * PUT_VOLATILITY * PUT_EXPIRY_YEARS.sqrt();

    base_premium * moneyness * PUT_PREMIUM_SCALE
}
