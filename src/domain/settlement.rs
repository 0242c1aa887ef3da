use super::balance::Balances;
use super::participant::Participant;
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Decimal places of every settled amount.
pub const CENT_SCALE: u32 = 2;

const CENT: Decimal = dec!(0.01);
const HALF_CENT: Decimal = dec!(0.005);

/// A proposed payment from a debtor to a creditor.
#[derive(Debug, Clone, PartialEq)]
pub struct SettlementTransaction {
    pub from: Participant,
    pub to: Participant,
    /// Positive, rounded to two decimal places.
    pub amount: Decimal,
}

/// Tuning for the settlement engine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SettlementPolicy {
    /// Balances whose magnitude does not exceed this are treated as settled.
    pub tolerance: Decimal,
}

impl Default for SettlementPolicy {
    fn default() -> Self {
        Self { tolerance: CENT }
    }
}

/// Output of a settlement run.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SettlementPlan {
    pub transactions: Vec<SettlementTransaction>,
    /// Balances left over once either side ran out, signed like a balance.
    pub unsettled: Vec<(Participant, Decimal)>,
}

impl SettlementPlan {
    /// Total magnitude left unsettled.
    pub fn residual(&self) -> Decimal {
        self.unsettled
            .iter()
            .fold(Decimal::ZERO, |acc, (_, amount)| acc.saturating_add(amount.abs()))
    }
}

#[derive(Debug)]
struct Position<'a> {
    participant: &'a Participant,
    balance: Decimal,
    remaining: Decimal,
}

/// Turns a balance map into point-to-point payments.
///
/// Greedy matching over two worklists: debtors sorted ascending by balance,
/// creditors descending. Each step pays the smaller of the two outstanding
/// amounts and advances whichever side is exhausted, so the run emits at most
/// `debtors + creditors - 1` transactions. It does not search for the global
/// minimum.
#[derive(Debug, Clone, Default)]
pub struct SettlementEngine {
    policy: SettlementPolicy,
}

impl SettlementEngine {
    pub fn new(policy: SettlementPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> SettlementPolicy {
        self.policy
    }

    /// Returns the payments that settle `balances`.
    pub fn settle(&self, balances: &Balances) -> Vec<SettlementTransaction> {
        self.plan(balances).transactions
    }

    /// Like [`settle`](Self::settle), but also reports what could not be
    /// matched.
    pub fn plan(&self, balances: &Balances) -> SettlementPlan {
        let tolerance = self.policy.tolerance.abs();
        let mut debtors = Vec::new();
        let mut creditors = Vec::new();

        for (participant, balance) in balances.iter() {
            let balance = round_cents(balance);
            if balance < -tolerance {
                debtors.push(Position {
                    participant,
                    balance,
                    remaining: -balance,
                });
            } else if balance > tolerance {
                creditors.push(Position {
                    participant,
                    balance,
                    remaining: balance,
                });
            }
        }

        // Stable sorts: roster order breaks ties.
        debtors.sort_by(|a, b| a.balance.cmp(&b.balance));
        creditors.sort_by(|a, b| b.balance.cmp(&a.balance));

        let mut transactions = Vec::new();
        let (mut d, mut c) = (0, 0);
        while d < debtors.len() && c < creditors.len() {
            let debtor = &mut debtors[d];
            let creditor = &mut creditors[c];
            let amount = debtor.remaining.min(creditor.remaining);

            transactions.push(SettlementTransaction {
                from: debtor.participant.clone(),
                to: creditor.participant.clone(),
                amount: round_cents(amount),
            });

            debtor.remaining -= amount;
            creditor.remaining -= amount;

            if debtor.remaining < CENT {
                d += 1;
            }
            if creditor.remaining < CENT {
                c += 1;
            }
        }

        let unsettled: Vec<(Participant, Decimal)> = debtors[d..]
            .iter()
            .map(|p| (p.participant.clone(), -p.remaining))
            .chain(
                creditors[c..]
                    .iter()
                    .map(|p| (p.participant.clone(), p.remaining)),
            )
            .filter(|(_, amount)| !amount.is_zero())
            .collect();

        let plan = SettlementPlan {
            transactions,
            unsettled,
        };
        self.report_residual(balances, &plan);
        plan
    }

    fn report_residual(&self, balances: &Balances, plan: &SettlementPlan) {
        let residual = plan.residual();
        if residual.is_zero() {
            tracing::debug!(
                transactions = plan.transactions.len(),
                "balances fully settled"
            );
            return;
        }

        // Each rounded balance may drift half a cent, and each excluded one
        // may hold up to the tolerance.
        let explainable = self
            .policy
            .tolerance
            .abs()
            .saturating_add(HALF_CENT)
            .saturating_mul(Decimal::from(balances.len()));
        if residual > explainable {
            tracing::warn!(
                %residual,
                %explainable,
                unsettled = plan.unsettled.len(),
                "settlement left a residual beyond rounding drift; expense data may be inconsistent"
            );
        } else {
            tracing::debug!(%residual, "settlement left rounding residual");
        }
    }
}

/// Rounds half away from zero and pins the scale to exactly two places.
pub fn round_cents(value: Decimal) -> Decimal {
    let mut rounded =
        value.round_dp_with_strategy(CENT_SCALE, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(CENT_SCALE);
    if rounded.is_zero() {
        // No "-0.00" in reports.
        rounded.set_sign_positive(true);
    }
    rounded
}
