// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tallybook::engine::{self, Dashboard, MonthlyComparison};
use tallybook::models::{ExpenseRecord, IncomeRecord, MAX_AMOUNT, Month};

fn d(s: &str) -> Decimal {
    s.parse().unwrap()
}

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn month(s: &str) -> Month {
    s.parse().unwrap()
}

fn exp(dt: &str, cat: &str, amt: &str) -> ExpenseRecord {
    ExpenseRecord {
        date: date(dt),
        category: cat.to_string(),
        description: String::new(),
        amount: d(amt),
    }
}

fn inc(dt: &str, src: &str, amt: &str) -> IncomeRecord {
    IncomeRecord {
        date: date(dt),
        source: src.to_string(),
        amount: d(amt),
    }
}

fn sample() -> (Vec<ExpenseRecord>, Vec<IncomeRecord>) {
    (
        vec![
            exp("2024-01-05", "Food", "100"),
            exp("2024-02-10", "Food", "50"),
        ],
        vec![inc("2024-01-01", "Salary", "1000")],
    )
}

#[test]
fn worked_example_matches() {
    let (expenses, incomes) = sample();

    let totals = engine::compute_totals(&expenses, &incomes);
    assert_eq!(totals.expense, d("150"));
    assert_eq!(totals.income, d("1000"));
    assert_eq!(totals.savings, d("850"));

    let cmp = engine::compute_monthly_comparison(&incomes, &expenses);
    assert_eq!(
        cmp,
        vec![
            MonthlyComparison {
                month: month("2024-01"),
                income: d("1000"),
                expense: d("100"),
            },
            MonthlyComparison {
                month: month("2024-02"),
                income: Decimal::ZERO,
                expense: d("50"),
            },
        ]
    );

    let savings: Vec<Decimal> = engine::compute_cumulative_savings(&cmp)
        .into_iter()
        .map(|p| p.savings)
        .collect();
    assert_eq!(savings, vec![d("900"), d("850")]);
}

#[test]
fn totals_of_empty_ledgers_are_zero() {
    let totals = engine::compute_totals(&[], &[]);
    assert_eq!(totals.expense, Decimal::ZERO);
    assert_eq!(totals.income, Decimal::ZERO);
    assert_eq!(totals.savings, Decimal::ZERO);
}

#[test]
fn savings_is_income_minus_expense() {
    let expenses = vec![
        exp("2024-03-01", "Bills", "120.40"),
        exp("2024-03-02", "Food", "9.99"),
        exp("2024-04-11", "Other", "0"),
    ];
    let incomes = vec![inc("2024-03-01", "Salary", "80"), inc("2024-03-15", "Gift", "12.5")];
    let totals = engine::compute_totals(&expenses, &incomes);
    assert_eq!(totals.savings, d("92.5") - d("130.39"));
    assert!(totals.savings.is_sign_negative());
}

#[test]
fn category_totals_ignore_record_order() {
    let records = vec![
        exp("2024-01-01", "Food", "10"),
        exp("2024-01-02", "Bills", "40"),
        exp("2024-01-03", "Food", "5.5"),
        exp("2024-01-04", "Transport", "7"),
        exp("2024-02-01", "Bills", "1"),
    ];
    let expected = engine::compute_category_totals(&records);
    assert_eq!(expected.get("Food"), Some(&d("15.5")));
    assert_eq!(expected.get("Bills"), Some(&d("41")));
    assert_eq!(expected.len(), 3);

    let mut reversed = records.clone();
    reversed.reverse();
    assert_eq!(engine::compute_category_totals(&reversed), expected);

    for shift in 1..records.len() {
        let mut rotated = records.clone();
        rotated.rotate_left(shift);
        assert_eq!(engine::compute_category_totals(&rotated), expected);
    }
}

#[test]
fn unknown_categories_pass_through() {
    let records = vec![exp("2024-01-01", "Groceries", "3"), exp("2024-01-02", "food", "4")];
    let totals = engine::compute_category_totals(&records);
    assert_eq!(totals.get("Groceries"), Some(&d("3")));
    assert_eq!(totals.get("food"), Some(&d("4")));
    assert!(totals.get("Food").is_none());
}

#[test]
fn top_categories_sorted_and_truncated() {
    let records = vec![
        exp("2024-01-01", "Food", "30"),
        exp("2024-01-01", "Bills", "90"),
        exp("2024-01-01", "Shopping", "60"),
        exp("2024-01-01", "Transport", "10"),
        exp("2024-01-01", "Entertainment", "20"),
        exp("2024-01-01", "Other", "5"),
    ];
    let totals = engine::compute_category_totals(&records);
    let all = engine::top_categories(&totals, usize::MAX);
    let top = engine::top_categories(&totals, 3);

    assert_eq!(top.len(), 3);
    let names: Vec<&str> = top.iter().map(|c| c.category.as_str()).collect();
    assert_eq!(names, vec!["Bills", "Shopping", "Food"]);
    assert!(top.windows(2).all(|w| w[0].amount >= w[1].amount));
    assert_eq!(&all[..3], &top[..]);

    assert!(engine::top_categories(&totals, 0).is_empty());
    assert_eq!(engine::top_categories(&totals, 50).len(), 6);
}

#[test]
fn top_categories_ties_keep_grouping_order() {
    let records = vec![
        exp("2024-01-01", "Shopping", "25"),
        exp("2024-01-01", "Bills", "25"),
        exp("2024-01-01", "Food", "25"),
        exp("2024-01-01", "Other", "50"),
    ];
    let totals = engine::compute_category_totals(&records);
    let names: Vec<String> = engine::top_categories(&totals, 4)
        .into_iter()
        .map(|c| c.category)
        .collect();
    assert_eq!(names, vec!["Other", "Bills", "Food", "Shopping"]);
}

#[test]
fn category_shares_sum_to_hundred() {
    let records = vec![
        exp("2024-01-01", "Food", "25"),
        exp("2024-01-01", "Bills", "75"),
    ];
    let shares = engine::compute_category_shares(&engine::compute_category_totals(&records));
    assert_eq!(shares.len(), 2);
    assert_eq!(shares[0].category, "Bills");
    assert_eq!(shares[0].percent, Some(d("75")));
    assert_eq!(shares[1].percent, Some(d("25")));

    assert!(engine::compute_category_shares(&engine::compute_category_totals(&[])).is_empty());
    let zero = vec![exp("2024-01-01", "Food", "0")];
    assert!(engine::compute_category_shares(&engine::compute_category_totals(&zero)).is_empty());
}

#[test]
fn category_shares_do_not_overflow_on_large_amounts() {
    let huge = vec![exp("2024-01-01", "Food", "79228162514264337593543950335")];
    let shares = engine::compute_category_shares(&engine::compute_category_totals(&huge));
    assert_eq!(shares[0].percent, Some(d("100")));

    let at_limit = vec![
        ExpenseRecord {
            amount: MAX_AMOUNT,
            ..exp("2024-01-01", "Food", "0")
        },
        ExpenseRecord {
            amount: MAX_AMOUNT,
            ..exp("2024-01-02", "Bills", "0")
        },
    ];
    let shares = engine::compute_category_shares(&engine::compute_category_totals(&at_limit));
    assert_eq!(shares[0].percent, Some(d("50")));
    assert_eq!(shares[1].percent, Some(d("50")));
}

#[test]
fn category_share_out_of_range_is_none() {
    let records = vec![
        exp("2024-01-01", "Food", "0.0000000000000000000000000001"),
        exp("2024-01-01", "Bills", "1"),
        exp("2024-01-01", "Other", "-1"),
    ];
    let shares = engine::compute_category_shares(&engine::compute_category_totals(&records));
    assert_eq!(shares.len(), 3);
    assert_eq!(shares[0].category, "Bills");
    assert_eq!(shares[0].percent, None);
    assert_eq!(shares[1].percent, Some(d("100")));
    assert_eq!(shares[2].percent, None);
}

#[test]
fn totals_at_amount_limit_stay_in_range() {
    let expenses: Vec<ExpenseRecord> = (1..=28)
        .map(|day| ExpenseRecord {
            amount: MAX_AMOUNT,
            ..exp(&format!("2024-02-{:02}", day), "Bills", "0")
        })
        .collect();
    let incomes = vec![IncomeRecord {
        amount: MAX_AMOUNT,
        ..inc("2024-02-01", "Salary", "0")
    }];
    let totals = engine::compute_totals(&expenses, &incomes);
    assert_eq!(totals.expense, MAX_AMOUNT * Decimal::from(28));
    assert_eq!(totals.savings, MAX_AMOUNT - MAX_AMOUNT * Decimal::from(28));
}

#[test]
fn daily_series_groups_by_date_ascending() {
    let records = vec![
        exp("2024-01-03", "Food", "1"),
        exp("2024-01-01", "Food", "2"),
        exp("2024-01-03", "Bills", "4"),
    ];
    let series = engine::compute_daily_series(&records);
    let points: Vec<(NaiveDate, Decimal)> = series.into_iter().collect();
    assert_eq!(
        points,
        vec![(date("2024-01-01"), d("2")), (date("2024-01-03"), d("5"))]
    );
}

#[test]
fn monthly_category_series_truncates_to_month() {
    let records = vec![
        exp("2024-01-03", "Food", "1"),
        exp("2024-01-28", "Food", "2"),
        exp("2024-01-15", "Bills", "4"),
        exp("2024-02-01", "Food", "8"),
        exp("2023-12-31", "Food", "16"),
    ];
    let series = engine::compute_monthly_category_series(&records);
    let keys: Vec<String> = series
        .keys()
        .map(|(m, c)| format!("{} {}", m, c))
        .collect();
    assert_eq!(
        keys,
        vec!["2023-12 Food", "2024-01 Bills", "2024-01 Food", "2024-02 Food"]
    );
    assert_eq!(series[&(month("2024-01"), "Food".to_string())], d("3"));
}

#[test]
fn monthly_comparison_keeps_months_from_both_sides() {
    let expenses = vec![
        exp("2024-03-05", "Food", "10"),
        exp("2024-05-05", "Food", "20"),
    ];
    let incomes = vec![
        inc("2024-01-01", "Salary", "100"),
        inc("2024-03-01", "Salary", "100"),
    ];
    let cmp = engine::compute_monthly_comparison(&incomes, &expenses);
    let months: Vec<String> = cmp.iter().map(|c| c.month.to_string()).collect();
    assert_eq!(months, vec!["2024-01", "2024-03", "2024-05"]);

    assert_eq!(cmp[0].expense, Decimal::ZERO);
    assert_eq!(cmp[0].income, d("100"));
    assert_eq!(cmp[1].income, d("100"));
    assert_eq!(cmp[1].expense, d("10"));
    assert_eq!(cmp[2].income, Decimal::ZERO);
    assert_eq!(cmp[2].expense, d("20"));

    let income_months = engine::compute_monthly_income_series(&incomes);
    let expense_months = engine::compute_monthly_expense_series(&expenses);
    for m in income_months.keys().chain(expense_months.keys()) {
        assert!(cmp.iter().any(|c| c.month == *m), "dropped {}", m);
    }
}

#[test]
fn monthly_comparison_of_empty_inputs_is_empty() {
    assert!(engine::compute_monthly_comparison(&[], &[]).is_empty());
    let only_income = engine::compute_monthly_comparison(&[inc("2024-06-30", "Gift", "5")], &[]);
    assert_eq!(only_income.len(), 1);
    assert_eq!(only_income[0].expense, Decimal::ZERO);
}

#[test]
fn cumulative_savings_is_prefix_sum() {
    let cmp = vec![
        MonthlyComparison {
            month: month("2024-03"),
            income: d("10"),
            expense: d("50"),
        },
        MonthlyComparison {
            month: month("2024-01"),
            income: d("100"),
            expense: d("30"),
        },
        MonthlyComparison {
            month: month("2024-02"),
            income: d("0"),
            expense: d("20"),
        },
    ];
    let points = engine::compute_cumulative_savings(&cmp);
    let months: Vec<String> = points.iter().map(|p| p.month.to_string()).collect();
    assert_eq!(months, vec!["2024-01", "2024-02", "2024-03"]);
    let values: Vec<Decimal> = points.iter().map(|p| p.savings).collect();
    assert_eq!(values, vec![d("70"), d("50"), d("10")]);

    let mut sorted = cmp.clone();
    sorted.sort_by_key(|c| c.month);
    for (i, p) in points.iter().enumerate() {
        let expected: Decimal = sorted[..=i].iter().map(|c| c.net()).sum();
        assert_eq!(p.savings, expected);
    }
}

#[test]
fn cumulative_savings_monotonic_when_every_month_saves() {
    let expenses = vec![
        exp("2024-01-10", "Food", "10"),
        exp("2024-02-10", "Food", "100"),
        exp("2024-03-10", "Food", "5"),
    ];
    let incomes = vec![
        inc("2024-01-01", "Salary", "10"),
        inc("2024-02-01", "Salary", "150"),
        inc("2024-03-01", "Salary", "50"),
    ];
    let cmp = engine::compute_monthly_comparison(&incomes, &expenses);
    let points = engine::compute_cumulative_savings(&cmp);
    assert!(points.windows(2).all(|w| w[0].savings <= w[1].savings));

    let overspent = vec![exp("2024-02-20", "Shopping", "500")];
    let mut more = expenses.clone();
    more.extend(overspent);
    let cmp = engine::compute_monthly_comparison(&incomes, &more);
    let points = engine::compute_cumulative_savings(&cmp);
    assert!(!points.windows(2).all(|w| w[0].savings <= w[1].savings));
}

#[test]
fn month_key_orders_chronologically() {
    assert!(month("2023-12") < month("2024-01"));
    assert!(month("2024-02") < month("2024-10"));
    assert_eq!(month("2024-02").to_string(), "2024-02");
    assert_eq!(Month::of(date("2024-02-29")), month("2024-02"));
    assert!("2024-13".parse::<Month>().is_err());
    assert!("Jan 2024".parse::<Month>().is_err());
}

#[test]
fn dashboard_bundles_every_view() {
    let (expenses, incomes) = sample();
    let dash = Dashboard::build(&expenses, &incomes, 5);
    assert_eq!(dash.totals.savings, d("850"));
    assert_eq!(dash.top_categories.len(), 1);
    assert_eq!(dash.daily.len(), 2);
    assert_eq!(dash.monthly_by_category.len(), 2);
    assert_eq!(dash.income_by_source.len(), 1);
    assert_eq!(dash.monthly_income.len(), 1);
    assert_eq!(dash.comparison.len(), 2);
    assert_eq!(dash.cumulative_savings.last().unwrap().savings, d("850"));

    let json = serde_json::to_value(&dash).unwrap();
    assert_eq!(json["comparison"][1]["month"], "2024-02");
    assert_eq!(json["cumulative_savings"][0]["month"], "2024-01");
}

#[test]
fn dashboard_of_empty_ledgers() {
    let dash = Dashboard::build(&[], &[], 5);
    assert_eq!(dash.totals.savings, Decimal::ZERO);
    assert!(dash.category_shares.is_empty());
    assert!(dash.comparison.is_empty());
    assert!(dash.cumulative_savings.is_empty());
}
