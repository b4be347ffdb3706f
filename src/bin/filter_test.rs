use chrono::NaiveDate;
use hr_dashboard::employee::EmployeeTable;
use hr_dashboard::filter::{FilterOptions, FilterSpec, apply};
use hr_dashboard::loader::load_from_bytes;
use hr_dashboard::sample::sample_xlsx_bytes;

fn load_sample() -> std::sync::Arc<EmployeeTable> {
    let bytes = sample_xlsx_bytes().expect("sample workbook should build");
    load_from_bytes(&bytes).expect("sample workbook should parse")
}

fn names(rows: &[hr_dashboard::Employee]) -> Vec<&str> {
    rows.iter().filter_map(|e| e.name.as_deref()).collect()
}

fn test_no_filters_pass_everything() {
    println!("\n====== Testing the empty specification ======");
    let table = load_sample();
    let rows = apply(&table, &FilterSpec::default());
    assert_eq!(rows.len(), 10);
    println!("✓ Default specification keeps all 10 rows");
}

fn test_area_filter() {
    println!("\n====== Testing categorical selection ======");
    let table = load_sample();

    let spec = FilterSpec {
        areas: vec!["ENGENHARIA".to_string()],
        ..Default::default()
    };
    let rows = apply(&table, &spec);
    assert_eq!(rows.len(), 3);
    assert_eq!(names(&rows), vec!["DIANA SOUZA", "GABRIEL ROCHA", "ISABELA LIMA"]);
    println!("✓ area = ENGENHARIA yields exactly 3 rows");

    // OR within the selection list.
    let spec = FilterSpec {
        areas: vec!["ENGENHARIA".to_string(), "MARKETING".to_string()],
        ..Default::default()
    };
    assert_eq!(apply(&table, &spec).len(), 5);
    println!("✓ Two selected areas combine with OR");
}

fn test_empty_selection_means_no_filter() {
    println!("\n====== Testing empty vs full selection ======");
    let table = load_sample();
    let options = FilterOptions::from_table(&table);

    let empty = apply(&table, &FilterSpec::default());
    let full = apply(
        &table,
        &FilterSpec {
            areas: options.areas.clone(),
            levels: options.levels.clone(),
            titles: options.titles.clone(),
            genders: options.genders.clone(),
            statuses: options.statuses.clone(),
            ..Default::default()
        },
    );
    assert_eq!(empty, full);
    println!("✓ Empty selection equals selecting every available category");
}

fn test_filter_idempotence() {
    println!("\n====== Testing idempotence ======");
    let table = load_sample();
    let spec = FilterSpec {
        areas: vec!["VENDAS".to_string()],
        salary_range: Some((3000.0, 5000.0)),
        ..Default::default()
    };

    let once = apply(&table, &spec);
    let again = apply(
        &EmployeeTable {
            rows: once.clone(),
            columns: table.columns.clone(),
        },
        &spec,
    );
    assert_eq!(once, again);
    println!("✓ Re-applying the same specification changes nothing");
}

fn test_name_search() {
    println!("\n====== Testing name search ======");
    let table = load_sample();

    let spec = FilterSpec {
        name_search: Some("silva".to_string()),
        ..Default::default()
    };
    let rows = apply(&table, &spec);
    assert_eq!(names(&rows), vec!["ANA SILVA"]);
    println!("✓ Lower-case search term matches the upper-cased field");

    let spec = FilterSpec {
        name_search: Some("   ".to_string()),
        ..Default::default()
    };
    assert_eq!(apply(&table, &spec).len(), 10);
    println!("✓ Whitespace-only search applies no restriction");
}

fn test_predicates_compose_with_and() {
    println!("\n====== Testing AND composition ======");
    let table = load_sample();

    let spec = FilterSpec {
        areas: vec!["VENDAS".to_string()],
        levels: vec!["JUNIOR".to_string()],
        ..Default::default()
    };
    let rows = apply(&table, &spec);
    assert_eq!(names(&rows), vec!["CARLOS MENDES", "JOÃO ALMEIDA"]);
    println!("✓ Area and level predicates intersect");
}

fn test_salary_range_inclusive() {
    println!("\n====== Testing numeric ranges ======");
    let table = load_sample();

    let spec = FilterSpec {
        salary_range: Some((4000.0, 5000.0)),
        ..Default::default()
    };
    let rows = apply(&table, &spec);
    assert_eq!(names(&rows), vec!["ANA SILVA", "GABRIEL ROCHA", "HELENA MARTINS"]);
    println!("✓ Salary range keeps 4500, 4000 and 4800");

    // Both bounds are inclusive.
    let spec = FilterSpec {
        salary_range: Some((3200.0, 3200.0)),
        ..Default::default()
    };
    assert_eq!(names(&apply(&table, &spec)), vec!["CARLOS MENDES"]);
    println!("✓ Degenerate range keeps the exact boundary value");
}

fn test_age_range_from_observed_bounds() {
    println!("\n====== Testing age range ======");
    let table = load_sample();
    let options = FilterOptions::from_table(&table);

    // Bounds come from the table, not from constants; the full observed
    // span must keep every row that has an age at all.
    let bounds = options.age_bounds.expect("sample table has ages");
    let spec = FilterSpec {
        age_range: Some(bounds),
        ..Default::default()
    };
    assert_eq!(apply(&table, &spec).len(), 10);
    println!("✓ Full observed age span keeps all rows");

    let spec = FilterSpec {
        age_range: Some((bounds.1 + 1, bounds.1 + 10)),
        ..Default::default()
    };
    assert!(apply(&table, &spec).is_empty());
    println!("✓ A span beyond the maximum matches nothing");
}

fn test_date_ranges() {
    println!("\n====== Testing date ranges ======");
    let table = load_sample();
    let d = |y, m, day| NaiveDate::from_ymd_opt(y, m, day).unwrap();

    // An applied termination range excludes rows without a termination date.
    let spec = FilterSpec {
        termination_range: Some((d(2023, 1, 1), d(2023, 12, 31))),
        ..Default::default()
    };
    let rows = apply(&table, &spec);
    assert_eq!(names(&rows), vec!["BRUNO COSTA", "ISABELA LIMA"]);
    println!("✓ Termination range keeps only the terminated rows");

    let spec = FilterSpec {
        hire_range: Some((d(2018, 1, 1), d(2019, 12, 31))),
        ..Default::default()
    };
    let rows = apply(&table, &spec);
    assert_eq!(names(&rows), vec!["ANA SILVA", "DIANA SOUZA", "HELENA MARTINS"]);
    println!("✓ Hire range keeps the 2018-2019 cohort");
}

fn test_options_reflect_the_full_table() {
    println!("\n====== Testing filter options ======");
    let table = load_sample();
    let options = FilterOptions::from_table(&table);

    assert_eq!(options.areas, vec!["VENDAS", "MARKETING", "ENGENHARIA"]);
    assert_eq!(options.levels, vec!["PLENO", "SENIOR", "JUNIOR"]);
    assert_eq!(options.genders, vec!["F", "M"]);
    assert_eq!(options.statuses, vec!["ACTIVE", "TERMINATED"]);
    println!("✓ Categorical options keep first-appearance order");

    assert_eq!(options.salary_bounds, Some((3200.0, 12000.0)));
    let d = |y, m, day| NaiveDate::from_ymd_opt(y, m, day).unwrap();
    assert_eq!(options.hire_bounds, Some((d(2013, 10, 17), d(2022, 1, 30))));
    assert_eq!(
        options.termination_bounds,
        Some((d(2023, 1, 20), d(2023, 11, 10)))
    );
    println!("✓ Range bounds are the observed min/max");
}

fn test_empty_result_is_reachable() {
    println!("\n====== Testing the empty result ======");
    let table = load_sample();

    let spec = FilterSpec {
        name_search: Some("no such employee".to_string()),
        ..Default::default()
    };
    let rows = apply(&table, &spec);
    assert!(rows.is_empty());
    assert!(!table.is_empty());
    println!("✓ \"no rows match\" is distinct from \"no data loaded\"");
}

pub fn run_tests() {
    println!("Starting filter engine tests");
    test_no_filters_pass_everything();
    test_area_filter();
    test_empty_selection_means_no_filter();
    test_filter_idempotence();
    test_name_search();
    test_predicates_compose_with_and();
    test_salary_range_inclusive();
    test_age_range_from_observed_bounds();
    test_date_ranges();
    test_options_reflect_the_full_table();
    test_empty_result_is_reachable();
    println!("\nAll tests passed!");
}

fn main() {
    run_tests();
}
