//! Positional pairing of transaction outputs with the payout schedule.
//!
//! From `payout_outputs_offset`, the first output is the marketplace fee
//! candidate and the next `payouts.len()` outputs pay the schedule, index for
//! index. Outputs after those are not inspected.

use crate::error::{MarketError, PayoutFault};
use crate::ledger::{TxOut, ValueSum};
use crate::listing::Payout;

/// Result of a successful correlation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Correlation<'a> {
    /// Output at the offset; checked later by the double-satisfaction guard.
    pub fee_output: &'a TxOut,
    /// Sum of all scheduled payout amounts, per asset class.
    pub payout_total: ValueSum,
}

pub fn correlate_payouts<'a>(
    outputs: &'a [TxOut],
    payout_outputs_offset: u64,
    payouts: &[Payout],
) -> Result<Correlation<'a>, MarketError> {
    let out_of_bounds = MarketError::OffsetOutOfBounds {
        offset: payout_outputs_offset,
        outputs: outputs.len(),
    };
    let start = usize::try_from(payout_outputs_offset).map_err(|_| out_of_bounds)?;
    let window = outputs.get(start..).ok_or(out_of_bounds)?;
    let (fee_output, paid) = window.split_first().ok_or(out_of_bounds)?;

    if paid.len() < payouts.len() {
        return Err(MarketError::PayoutMismatch {
            index: paid.len(),
            fault: PayoutFault::Missing,
        });
    }

    let mut payout_total = ValueSum::new();
    for (index, (payout, output)) in payouts.iter().zip(paid).enumerate() {
        check_payout_output(index, payout, output)?;
        payout_total.add(&payout.amount)?;
    }

    tracing::trace!(
        offset = payout_outputs_offset,
        payouts = payouts.len(),
        "payout outputs correlated"
    );

    Ok(Correlation {
        fee_output,
        payout_total,
    })
}

fn check_payout_output(index: usize, payout: &Payout, output: &TxOut) -> Result<(), MarketError> {
    let fault = if output.address != payout.address {
        PayoutFault::Address
    } else if !output.value.covers(&payout.amount) {
        PayoutFault::Value
    } else if !output.datum.is_none() {
        // Payout outputs must not carry a datum.
        PayoutFault::Datum
    } else {
        return Ok(());
    };
    Err(MarketError::PayoutMismatch { index, fault })
}

#[cfg(test)]
mod tests {
    use alloc::vec;
    use alloc::vec::Vec;

    use super::*;
    use crate::ledger::{Address, AssetClass, Credential, Datum, Value};

    const SELLER: Address = Address::new(Credential::VerificationKey([0x01; 28]));
    const ARTIST: Address = Address::new(Credential::VerificationKey([0x02; 28]));
    const MARKET: Address = Address::new(Credential::VerificationKey([0x03; 28]));
    const POLICY: [u8; 28] = [0x44; 28];

    fn schedule() -> Vec<Payout> {
        vec![
            Payout::new(SELLER, Value::from_lovelace(9_000_000)),
            Payout::new(ARTIST, Value::from_lovelace(1_000_000).with_asset(POLICY, b"tok", 5)),
        ]
    }

    fn outputs_paying(schedule: &[Payout]) -> Vec<TxOut> {
        let mut outputs = vec![
            TxOut::new(SELLER, Value::from_lovelace(2_000_000)),
            TxOut::new(MARKET, Value::from_lovelace(200_000)),
        ];
        outputs.extend(schedule.iter().map(|p| TxOut::new(p.address, p.amount.clone())));
        outputs
    }

    #[test]
    fn pairs_by_position_after_fee_output() {
        let payouts = schedule();
        let outputs = outputs_paying(&payouts);
        let c = correlate_payouts(&outputs, 1, &payouts).expect("correlate");
        assert_eq!(c.fee_output.address, MARKET);
        assert_eq!(c.payout_total.lovelace(), 10_000_000);
        assert_eq!(c.payout_total.quantity_of(&AssetClass::new(POLICY, b"tok")), 5);
    }

    #[test]
    fn offset_at_or_past_end_is_out_of_bounds() {
        let payouts = schedule();
        let outputs = outputs_paying(&payouts);
        for offset in [outputs.len() as u64, outputs.len() as u64 + 1, u64::MAX] {
            assert_eq!(
                correlate_payouts(&outputs, offset, &payouts),
                Err(MarketError::OffsetOutOfBounds {
                    offset,
                    outputs: outputs.len()
                })
            );
        }
    }

    #[test]
    fn too_few_outputs_after_offset() {
        let payouts = schedule();
        let outputs = outputs_paying(&payouts);
        let err = correlate_payouts(&outputs, 2, &payouts).unwrap_err();
        assert_eq!(
            err,
            MarketError::PayoutMismatch {
                index: 1,
                fault: PayoutFault::Missing
            }
        );
    }

    #[test]
    fn swapped_payout_order_is_rejected() {
        let payouts = schedule();
        let mut outputs = outputs_paying(&payouts);
        outputs.swap(2, 3);
        let err = correlate_payouts(&outputs, 1, &payouts).unwrap_err();
        assert_eq!(
            err,
            MarketError::PayoutMismatch {
                index: 0,
                fault: PayoutFault::Address
            }
        );
    }

    #[test]
    fn short_token_quantity_is_rejected() {
        let payouts = schedule();
        let mut outputs = outputs_paying(&payouts);
        outputs[3].value = Value::from_lovelace(5_000_000).with_asset(POLICY, b"tok", 4);
        let err = correlate_payouts(&outputs, 1, &payouts).unwrap_err();
        assert_eq!(
            err,
            MarketError::PayoutMismatch {
                index: 1,
                fault: PayoutFault::Value
            }
        );
    }

    #[test]
    fn payout_with_datum_is_rejected() {
        let payouts = schedule();
        let mut outputs = outputs_paying(&payouts);
        outputs[2].datum = Datum::Inline(vec![0x00]);
        let err = correlate_payouts(&outputs, 1, &payouts).unwrap_err();
        assert_eq!(
            err,
            MarketError::PayoutMismatch {
                index: 0,
                fault: PayoutFault::Datum
            }
        );
    }

    #[test]
    fn extra_lovelace_and_trailing_outputs_are_accepted() {
        let payouts = schedule();
        let mut outputs = outputs_paying(&payouts);
        outputs[2].value = Value::from_lovelace(9_500_000).with_asset([0x99; 28], b"x", 1);
        outputs.push(TxOut::new(SELLER, Value::from_lovelace(1)));
        let c = correlate_payouts(&outputs, 1, &payouts).expect("correlate");
        assert_eq!(c.payout_total.lovelace(), 10_000_000, "total follows the schedule, not the outputs");
    }
}
