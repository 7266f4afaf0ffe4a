//! End-to-end bootstrap scenarios across instrument types.

use approx::assert_relative_eq;

use strata_core::calendars::Calendar;
use strata_core::daycounts::DayCount;
use strata_core::types::{Date, Tenor};
use strata_curves::prelude::*;

fn d(y: i32, m: u32, day: u32) -> Date {
    Date::from_ymd(y, m, day).unwrap()
}

fn cash(effective: Date, rate: f64, tenor: &str, calendar: &Calendar) -> CashInstrument {
    CashInstrument::new(effective, rate, tenor.parse().unwrap(), calendar, DayCount::Act360)
        .unwrap()
}

#[test]
fn anchor_discount_factor_survives_build() {
    let effective = d(2020, 3, 16);
    let calendar = Calendar::weekends();
    let mut curve = Curve::new(effective);

    assert_relative_eq!(curve.discount_factor(effective).unwrap(), 1.0, epsilon = 1e-15);

    curve.add_instrument(cash(effective, 0.0155, "ON", &calendar)).unwrap();
    curve.add_instrument(cash(effective, 0.016, "3M", &calendar)).unwrap();
    curve.build().unwrap();

    assert_relative_eq!(curve.discount_factor(effective).unwrap(), 1.0, epsilon = 1e-15);
}

#[test]
fn overnight_deposit_discount_factor_is_closed_form() {
    let effective = d(2020, 3, 16);
    let calendar = Calendar::weekends();
    let mut curve = Curve::new(effective);
    curve.add_instrument(cash(effective, 0.0155, "ON", &calendar)).unwrap();

    let df = curve.discount_factor(d(2020, 3, 17)).unwrap();
    assert_relative_eq!(df, 1.0 / (1.0 + 0.0155 / 360.0), epsilon = 1e-14);
}

#[test]
fn cash_and_ois_strip_builds_past_the_deposits() {
    let effective = d(2020, 3, 16);
    let calendar = Calendar::weekends();
    let mut curve = Curve::new(effective);
    curve.add_instrument(cash(effective, 0.0155, "ON", &calendar)).unwrap();

    let conventions = SwapConventions {
        fixed_basis: DayCount::Act360,
        fixed_tenor: "1W".parse().unwrap(),
        float_tenor: "1W".parse().unwrap(),
        ..SwapConventions::default()
    };
    let ois = SwapInstrument::ois(effective, "1W".parse().unwrap(), 0.0157, &conventions).unwrap();
    curve.add_instrument(ois).unwrap();

    curve.build().unwrap();
    let nodes = curve.nodes();
    assert_eq!(nodes.len(), 3);
    assert_eq!(nodes[1].source, "CASH-ON");
    assert_eq!(nodes[2].source, "SWAP-OIS-1W");
    assert!(nodes[2].date > nodes[1].date);
}

#[test]
fn ois_swaps_reprice_to_par_after_build() {
    let effective = d(2020, 3, 16);
    let calendar = Calendar::weekends();
    let conventions = SwapConventions::default();

    let swaps: Vec<SwapInstrument> = [("1Y", 0.0150), ("2Y", 0.0155), ("3Y", 0.0162)]
        .iter()
        .map(|&(tenor, rate)| {
            SwapInstrument::ois(effective, tenor.parse().unwrap(), rate, &conventions).unwrap()
        })
        .collect();

    let mut curve = Curve::new(effective);
    curve.add_instrument(cash(effective, 0.0148, "3M", &calendar)).unwrap();
    for swap in &swaps {
        curve.add_instrument(swap.clone()).unwrap();
    }
    curve.build().unwrap();

    for swap in swaps {
        let residual = curve.present_value(&swap.into()).unwrap();
        assert!(residual.abs() < 1e-6, "off-par residual {residual:.3e}");
    }
}

#[test]
fn libor_swaps_reprice_to_par_after_build() {
    let effective = d(2020, 3, 16);
    let calendar = Calendar::weekends();
    let conventions = SwapConventions {
        float_tenor: "3M".parse().unwrap(),
        rate_tenor: "3M".parse().unwrap(),
        ..SwapConventions::default()
    };

    let swap =
        SwapInstrument::libor(effective, "2Y".parse().unwrap(), 0.0180, &conventions).unwrap();

    let mut curve = Curve::new(effective);
    curve.add_instrument(cash(effective, 0.0170, "3M", &calendar)).unwrap();
    curve.add_instrument(swap.clone()).unwrap();
    curve.build().unwrap();

    let residual = curve.present_value(&swap.into()).unwrap();
    assert!(residual.abs() < 1e-6, "off-par residual {residual:.3e}");
}

#[test]
fn log_discount_factors_decrease_with_positive_rates() {
    let effective = d(2020, 3, 16);
    let calendar = Calendar::weekends();
    let conventions = SwapConventions::default();

    let mut curve = Curve::new(effective);
    curve.add_instrument(cash(effective, 0.0155, "ON", &calendar)).unwrap();
    curve.add_instrument(cash(effective, 0.0160, "3M", &calendar)).unwrap();
    for (tenor, rate) in [("1Y", 0.0165), ("2Y", 0.0172), ("5Y", 0.0190)] {
        curve
            .add_instrument(
                SwapInstrument::ois(effective, tenor.parse().unwrap(), rate, &conventions)
                    .unwrap(),
            )
            .unwrap();
    }
    curve.build().unwrap();

    let nodes = curve.nodes();
    assert_eq!(nodes.len(), 6);
    for pair in nodes.windows(2) {
        assert!(
            pair[1].log_discount_factor < pair[0].log_discount_factor,
            "log DF not decreasing between {} and {}",
            pair[0].date,
            pair[1].date
        );
    }
}

#[test]
fn simple_futures_extend_a_cash_strip() {
    let effective = d(2020, 3, 16);
    let calendar = Calendar::weekends();
    let mut curve = Curve::new(effective);
    curve.add_instrument(cash(effective, 0.0155, "ON", &calendar)).unwrap();
    curve.add_instrument(cash(effective, 0.0160, "3M", &calendar)).unwrap();

    // H20 is 2020-03-18; the contract window sits inside the cash strip's
    // committed prefix plus extrapolated tail.
    for (code, price) in [("M20", 98.40), ("U20", 98.30)] {
        curve
            .add_instrument(
                FutureInstrument::by_imm_code(
                    code,
                    price,
                    "3M".parse().unwrap(),
                    &calendar,
                    DayCount::Act360,
                )
                .unwrap(),
            )
            .unwrap();
    }
    curve.build().unwrap();

    let nodes = curve.nodes();
    assert_eq!(nodes.len(), 5);
    assert_eq!(nodes[3].source, "FUT-M20");
    assert_eq!(nodes[4].source, "FUT-U20");
}

#[test]
fn dependent_curve_builds_its_discount_curve_first() {
    let effective = d(2020, 3, 16);
    let calendar = Calendar::weekends();

    let mut ois_curve = Curve::new(effective);
    ois_curve.add_instrument(cash(effective, 0.0148, "3M", &calendar)).unwrap();
    ois_curve
        .add_instrument(
            SwapInstrument::ois(
                effective,
                "2Y".parse().unwrap(),
                0.0152,
                &SwapConventions::default(),
            )
            .unwrap(),
        )
        .unwrap();
    let discount = shared(ois_curve);

    let conventions = SwapConventions {
        float_tenor: "3M".parse().unwrap(),
        rate_tenor: "3M".parse().unwrap(),
        ..SwapConventions::default()
    };
    let libor_swap =
        SwapInstrument::libor(effective, "2Y".parse().unwrap(), 0.0185, &conventions).unwrap();

    let mut projection = Curve::new(effective).with_discount_curve(discount.clone());
    projection.add_instrument(cash(effective, 0.0175, "3M", &calendar)).unwrap();
    projection.add_instrument(libor_swap.clone()).unwrap();

    // Building the dependent curve cascades into the discounting curve.
    projection.build().unwrap();
    assert_eq!(discount.read().state(), CurveState::Built);

    // The swap must reprice under the same dual-curve split it was
    // bootstrapped with.
    let residual = projection.present_value(&libor_swap.into()).unwrap();
    assert!(residual.abs() < 1e-6, "off-par residual {residual:.3e}");
}

#[test]
fn joint_strip_commits_nodes_to_both_curves() {
    let effective = d(2020, 3, 16);
    let calendar = Calendar::weekends();

    let mut discount_curve = Curve::new(effective);
    discount_curve.add_instrument(cash(effective, 0.0148, "3M", &calendar)).unwrap();
    discount_curve
        .add_instrument(
            SwapInstrument::ois(
                effective,
                "2Y".parse().unwrap(),
                0.0152,
                &SwapConventions::default(),
            )
            .unwrap(),
        )
        .unwrap();
    let discount = shared(discount_curve);

    // Seed both target curves with a short cash strip so the trial
    // interpolant has a committed prefix to extend.
    let mut curve_one = Curve::new(effective);
    curve_one.add_instrument(cash(effective, 0.0150, "3M", &calendar)).unwrap();
    let mut curve_two = Curve::new(effective);
    curve_two.add_instrument(cash(effective, 0.0172, "3M", &calendar)).unwrap();

    let basis = BasisSwapInstrument::average_index(
        effective,
        "1Y".parse().unwrap(),
        0.0022,
        &BasisSwapConventions::default(),
    )
    .unwrap();
    let conventions = SwapConventions {
        float_tenor: "3M".parse().unwrap(),
        rate_tenor: "3M".parse().unwrap(),
        ..SwapConventions::default()
    };
    let swap =
        SwapInstrument::libor(effective, "1Y".parse().unwrap(), 0.0180, &conventions).unwrap();

    let mut stripped = SimultaneousStrippedCurve::new(curve_one, curve_two, discount);
    stripped.add_instrument(SimultaneousInstrument::new(basis, swap));

    let outcomes = stripped.build().unwrap();
    assert_eq!(outcomes.len(), 1);
    match &outcomes[0].status {
        JointStatus::Solved { objective, .. } => {
            assert!(*objective < 1e-6, "joint residual {objective:.3e}");
        }
        JointStatus::Failed { reason } => panic!("joint solve failed: {reason}"),
    }

    // One cash node plus the joint node on each curve.
    assert_eq!(stripped.curve_one().nodes().len(), 3);
    assert_eq!(stripped.curve_two().nodes().len(), 3);
    assert_eq!(
        stripped.curve_one().nodes()[2].source,
        "SWAP-AVERAGEINDEX-1Y"
    );
    assert_eq!(stripped.curve_two().nodes()[2].source, "SWAP-LIBOR-1Y");
}

#[test]
fn basis_swap_cannot_join_a_solo_strip() {
    let effective = d(2020, 3, 16);
    let mut curve = Curve::new(effective);
    let basis = BasisSwapInstrument::compound_index(
        effective,
        "1Y".parse().unwrap(),
        0.001,
        &BasisSwapConventions::default(),
    )
    .unwrap();
    assert!(curve.add_instrument(basis).is_err());
}

#[test]
fn tenor_arithmetic_used_by_strips() {
    let effective = d(2020, 3, 16);
    let calendar = Calendar::weekends();

    let on: Tenor = "ON".parse().unwrap();
    assert_eq!(on.add_to(effective).unwrap(), d(2020, 3, 17));

    let three_months: Tenor = "3M".parse().unwrap();
    assert_eq!(three_months.add_to(effective).unwrap(), d(2020, 6, 16));

    // Two business days back from a Tuesday is the prior Friday.
    let two_bd: Tenor = "2BD".parse().unwrap();
    let fixing = calendar
        .reverse(
            d(2020, 3, 17),
            two_bd,
            strata_core::calendars::BusinessDayConvention::Preceding,
        )
        .unwrap();
    assert_eq!(fixing, d(2020, 3, 13));
}
