//! Allocation invariants: unification sums, class totals, exact buy plans.

use yajirobe::{
    AllocationTarget, AssetAllocation, AssetClass, EtfMap, Holding, unify, unify_portfolio,
};

fn fund(code: &str, class: AssetClass, acquisition: f64, current: f64) -> Holding {
    let mut h = Holding::fund(code, "Fund", 10_000, acquisition, current, class);
    h.acquisition_value = acquisition;
    h.current_value = current;
    h
}

fn scenario_targets() -> AllocationTarget {
    [
        (AssetClass::EmergingStocks, 0.25),
        (AssetClass::DomesticStocks, 0.30),
        (AssetClass::InternationalStocks, 0.45),
    ]
    .into_iter()
    .collect()
}

fn scenario() -> AssetAllocation {
    let holdings = vec![
        fund("1234", AssetClass::EmergingStocks, 0.0, 200.0),
        fund("5678", AssetClass::DomesticStocks, 0.0, 200.0),
        fund("90ab", AssetClass::InternationalStocks, 0.0, 600.0),
    ];
    AssetAllocation::aggregate(&unify(&holdings), &scenario_targets())
}

// === Unification ===

#[test]
fn same_fund_across_accounts_is_one_position() {
    let holdings = vec![
        fund("0331418A", AssetClass::InternationalStocks, 100.0, 120.0),
        fund("03311187", AssetClass::DomesticBonds, 50.0, 49.0),
        fund("0331418A", AssetClass::InternationalStocks, 300.0, 330.0),
        fund("0331418A", AssetClass::InternationalStocks, 25.0, 30.0),
    ];
    let unified = unify(&holdings);
    assert_eq!(unified.len(), 2);

    let p = &unified["0331418A"];
    assert_eq!(p.acquisition_value, 425.0);
    assert_eq!(p.current_value, 480.0);
    assert_eq!(p.quantity, 30_000);
    assert_eq!(p.sources.len(), 3);
}

#[test]
fn etf_and_fund_share_one_bucket_in_allocation() {
    let holdings = vec![
        Holding::stock("1680", "Foreign ETF", 100, 1_000.0, 1_100.0, AssetClass::DomesticStocks),
        Holding::fund("1680", "Foreign fund", 20_000, 10_000.0, 11_000.0, AssetClass::InternationalStocks),
        Holding::stock("7203", "Toyota", 100, 2_000.0, 2_100.0, AssetClass::DomesticStocks),
    ];
    let unified = unify_portfolio(&holdings, &EtfMap::default());
    let allocation = AssetAllocation::aggregate(&unified, &AllocationTarget::default());

    let intl = allocation.detail(AssetClass::InternationalStocks).unwrap();
    assert_eq!(intl.positions.len(), 1);
    assert_eq!(intl.current_value, 110_000.0 + 22_000.0);

    // Toyota is not an ETF: it stays out of every bucket and the totals.
    assert!(allocation.detail(AssetClass::DomesticStocks).is_none());
    assert_eq!(allocation.current_value(), 132_000.0);
    assert_eq!(allocation.classes(), vec![AssetClass::InternationalStocks]);
}

#[test]
fn plain_stock_does_not_dilute_ratios() {
    let holdings = vec![
        fund("W1", AssetClass::InternationalStocks, 10_000.0, 10_000.0),
        Holding::stock("7203", "Toyota", 5, 2_000.0, 2_000.0, AssetClass::DomesticStocks),
    ];
    let targets: AllocationTarget = [(AssetClass::InternationalStocks, 1.0)].into_iter().collect();
    let allocation = AssetAllocation::aggregate(&unify_portfolio(&holdings, &EtfMap::default()), &targets);

    assert_eq!(allocation.current_value(), 10_000.0);
    assert_eq!(allocation.len(), 1);
    let intl = allocation.detail(AssetClass::InternationalStocks).unwrap();
    assert_eq!(intl.actual_ratio, 1.0);
    assert_eq!(intl.diff, 0.0);
}

// === Aggregation ===

#[test]
fn class_totals_sum_to_portfolio_total() {
    let holdings = vec![
        fund("A", AssetClass::DomesticStocks, 123.45, 130.1),
        fund("B", AssetClass::EmergingBonds, 77.7, 60.3),
        fund("C", AssetClass::DomesticStocks, 0.1, 0.2),
        fund("D", AssetClass::Other, 1.0, 0.7),
    ];
    let allocation = AssetAllocation::aggregate(&unify(&holdings), &scenario_targets());

    let current: f64 = allocation.iter().map(|d| d.current_value).sum();
    let acquisition: f64 = allocation.iter().map(|d| d.acquisition_value).sum();
    assert_eq!(allocation.current_value(), current);
    assert_eq!(allocation.acquisition_value(), acquisition);
}

#[test]
fn output_classes_are_union_of_targets_and_holdings() {
    let holdings = vec![fund("A", AssetClass::Commodity, 1.0, 1.0)];
    let allocation = AssetAllocation::aggregate(&unify(&holdings), &scenario_targets());
    assert_eq!(
        allocation.classes(),
        vec![
            AssetClass::DomesticStocks,
            AssetClass::InternationalStocks,
            AssetClass::EmergingStocks,
            AssetClass::Commodity,
        ]
    );
}

#[test]
fn aggregate_is_idempotent() {
    let holdings = vec![
        fund("A", AssetClass::DomesticStocks, 0.1, 0.3),
        fund("B", AssetClass::InternationalStocks, 0.2, 0.7),
        fund("A", AssetClass::DomesticStocks, 0.4, 0.9),
    ];
    let first = AssetAllocation::aggregate(&unify(&holdings), &scenario_targets());
    let second = AssetAllocation::aggregate(&unify(&holdings), &scenario_targets());
    assert_eq!(
        first.current_value().to_bits(),
        second.current_value().to_bits()
    );
    assert_eq!(
        first.acquisition_value().to_bits(),
        second.acquisition_value().to_bits()
    );
    assert_eq!(first, second);
}

// === Rebalancing buy ===

#[test]
fn scenario_buy_plans() {
    let allocation = scenario();
    assert_eq!(allocation.current_value(), 1000.0);

    let expected = vec![
        (
            100.0,
            vec![(AssetClass::DomesticStocks, 63.0), (AssetClass::EmergingStocks, 37.0)],
        ),
        (
            300.0,
            vec![(AssetClass::DomesticStocks, 181.0), (AssetClass::EmergingStocks, 119.0)],
        ),
        (
            400.0,
            vec![
                (AssetClass::DomesticStocks, 220.0),
                (AssetClass::InternationalStocks, 30.0),
                (AssetClass::EmergingStocks, 150.0),
            ],
        ),
    ];

    for (contribution, amounts) in expected {
        let plan = allocation.rebalancing_buy(contribution);
        let got: Vec<(AssetClass, f64)> = plan.iter().collect();
        assert_eq!(got, amounts, "contribution {contribution}");
        assert_eq!(plan.total(), contribution);
    }
}

#[test]
fn buy_plan_never_targets_overweight_class() {
    let plan = scenario().rebalancing_buy(100.0);
    assert!(plan.get(AssetClass::InternationalStocks).is_none());
}

#[test]
fn buy_plan_sums_exactly_for_awkward_contributions() {
    let allocation = scenario();
    for contribution in [1.0, 7.0, 33.0, 101.0, 999.0, 12_345.0] {
        let plan = allocation.rebalancing_buy(contribution);
        assert_eq!(plan.total(), contribution, "contribution {contribution}");
        assert!(plan.iter().all(|(_, a)| a >= 0.0));
    }
}
