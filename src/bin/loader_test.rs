use chrono::NaiveDate;
use hr_dashboard::employee::{age_from_hire_date, months_between, status_from_termination};
use hr_dashboard::error::LoadError;
use hr_dashboard::loader::{load, load_from_bytes, normalize_header, parse_count};
use hr_dashboard::sample::sample_xlsx_bytes;
use rust_xlsxwriter::{Workbook, Worksheet};

enum Cell {
    S(&'static str),
    N(f64),
    Blank,
}

// Build a one-sheet workbook from headers plus data rows.
fn workbook_bytes(headers: &[&str], rows: &[Vec<Cell>]) -> Vec<u8> {
    let mut workbook = Workbook::new();
    let mut worksheet = Worksheet::new();
    for (col, header) in headers.iter().enumerate() {
        worksheet.write_string(0, col as u16, *header).unwrap();
    }
    for (r, row) in rows.iter().enumerate() {
        for (c, cell) in row.iter().enumerate() {
            match cell {
                Cell::S(s) => {
                    worksheet.write_string((r + 1) as u32, c as u16, *s).unwrap();
                }
                Cell::N(n) => {
                    worksheet.write_number((r + 1) as u32, c as u16, *n).unwrap();
                }
                Cell::Blank => {}
            };
        }
    }
    workbook.push_worksheet(worksheet);
    workbook.save_to_buffer().unwrap()
}

const FULL_HEADERS: [&str; 9] = [
    "Nome Completo",
    "Sexo",
    "Data de Contratacao",
    "Data de Demissao",
    "Salario Base",
    "Impostos",
    "Beneficios",
    "VT",
    "VR",
];

fn full_row(name: &'static str, hire: &'static str, termination: Option<&'static str>) -> Vec<Cell> {
    vec![
        Cell::S(name),
        Cell::S("Masculino"),
        Cell::S(hire),
        termination.map(Cell::S).unwrap_or(Cell::Blank),
        Cell::N(1000.0),
        Cell::N(200.0),
        Cell::N(100.0),
        Cell::N(50.0),
        Cell::N(50.0),
    ]
}

fn test_normalize_header() {
    println!("\n====== Testing header normalization ======");

    assert_eq!(normalize_header("Nome Completo"), "nome_completo");
    assert_eq!(normalize_header("NOME COMPLETO"), "nome_completo");
    assert_eq!(normalize_header("Avaliacao do Funcionario"), "avaliacao_do_funcionario");
    assert_eq!(normalize_header("Data de Demissao"), "data_de_demissao");
    assert_eq!(normalize_header("VT"), "vt");
    println!("✓ Spacing and casing variants map to the canonical key");

    assert_eq!(normalize_header("Preço"), "preco");
    assert_eq!(normalize_header("Sal. Base"), "sal_base");
    println!("✓ Cedilla and periods are stripped");
}

fn test_derivation_helpers() {
    println!("\n====== Testing derivation helpers ======");
    let hire = NaiveDate::from_ymd_opt(2015, 6, 25).unwrap();

    // Before the anniversary within the year.
    let today = NaiveDate::from_ymd_opt(2023, 1, 20).unwrap();
    assert_eq!(age_from_hire_date(hire, today), 7);
    assert_eq!(months_between(hire, today), 91);

    // On and after the anniversary.
    let anniversary = NaiveDate::from_ymd_opt(2023, 6, 25).unwrap();
    assert_eq!(age_from_hire_date(hire, anniversary), 8);
    let after = NaiveDate::from_ymd_opt(2023, 12, 1).unwrap();
    assert_eq!(age_from_hire_date(hire, after), 8);
    assert_eq!(months_between(hire, after), 102);
    println!("✓ Age and tenure follow the anniversary adjustment");

    assert_eq!(status_from_termination(Some(today)), "TERMINATED");
    assert_eq!(status_from_termination(None), "ACTIVE");
    println!("✓ Status derives from termination presence");
}

fn test_status_scenario() {
    println!("\n====== Testing termination scenario ======");
    let bytes = workbook_bytes(
        &FULL_HEADERS,
        &[
            full_row("Maria", "2015-06-25", Some("2023-01-20")),
            full_row("Pedro", "2020-01-01", None),
            full_row("Rita", "2019-05-05", Some("not a date")),
        ],
    );
    let table = load_from_bytes(&bytes).unwrap();

    assert_eq!(table.rows[0].status.as_deref(), Some("TERMINATED"));
    assert_eq!(
        table.rows[0].termination_date,
        NaiveDate::from_ymd_opt(2023, 1, 20)
    );
    assert_eq!(table.rows[1].status.as_deref(), Some("ACTIVE"));
    println!("✓ Termination date 2023-01-20 yields TERMINATED, absence yields ACTIVE");

    // A bad date value becomes "missing", never an error.
    assert_eq!(table.rows[2].termination_date, None);
    assert_eq!(table.rows[2].status.as_deref(), Some("ACTIVE"));
    println!("✓ Unparseable date degrades to missing");
}

fn test_cache_hits() {
    println!("\n====== Testing the content-identity cache ======");
    let bytes = workbook_bytes(&FULL_HEADERS, &[full_row("Ana", "2020-02-02", None)]);

    let first = load_from_bytes(&bytes).unwrap();
    let parses_after_first = parse_count();

    let second = load_from_bytes(&bytes).unwrap();
    assert_eq!(parse_count(), parses_after_first);
    assert_eq!(*first, *second);
    println!("✓ Identical bytes hit the cache (no new parse, equal table)");

    let changed = workbook_bytes(&FULL_HEADERS, &[full_row("Bia", "2021-03-03", None)]);
    load_from_bytes(&changed).unwrap();
    assert_eq!(parse_count(), parses_after_first + 1);
    println!("✓ Different bytes invalidate the cache and re-parse");
}

fn test_parse_failure_keeps_previous_table() {
    println!("\n====== Testing parse failure ======");
    let good = workbook_bytes(&FULL_HEADERS, &[full_row("Ana", "2020-02-02", None)]);
    let table = load_from_bytes(&good).unwrap();

    let garbage = b"\x00\x01\x02 definitely not a workbook \xff\xfe";
    match load_from_bytes(garbage) {
        Err(LoadError::Parse(_)) => println!("✓ Binary garbage yields a parse error"),
        other => panic!("expected a parse error, got {:?}", other.map(|t| t.len())),
    }

    // The failed attempt must not disturb the cached table.
    let parses_before = parse_count();
    let again = load_from_bytes(&good).unwrap();
    assert_eq!(parse_count(), parses_before);
    assert_eq!(*table, *again);
    println!("✓ Previously loaded table survives the failure");
}

fn test_schema_error() {
    println!("\n====== Testing schema validation ======");
    // No VT column: the total-cost derivation cannot run.
    let headers = ["Nome Completo", "Salario Base", "Impostos", "Beneficios", "VR"];
    let bytes = workbook_bytes(
        &headers,
        &[vec![
            Cell::S("Ana"),
            Cell::N(1000.0),
            Cell::N(200.0),
            Cell::N(100.0),
            Cell::N(50.0),
        ]],
    );
    match load_from_bytes(&bytes) {
        Err(LoadError::Schema(column)) => {
            assert_eq!(column, "vt");
            println!("✓ Missing monetary column reported as a schema error");
        }
        other => panic!("expected a schema error, got {:?}", other.map(|t| t.len())),
    }
}

fn test_optional_columns_degrade() {
    println!("\n====== Testing optional column degradation ======");
    // Monetary columns only: no names, dates or evaluation.
    let headers = ["Salario Base", "Impostos", "Beneficios", "VT", "VR"];
    let bytes = workbook_bytes(
        &headers,
        &[vec![
            Cell::N(1000.0),
            Cell::N(200.0),
            Cell::N(100.0),
            Cell::N(50.0),
            Cell::N(50.0),
        ]],
    );
    let table = load_from_bytes(&bytes).unwrap();
    let e = &table.rows[0];

    assert_eq!(e.name, None);
    assert_eq!(e.evaluation, None);
    assert_eq!(e.age, None);
    assert_eq!(e.tenure_months, None);
    assert_eq!(e.status, None);
    assert_eq!(e.total_monthly_cost, 1400.0);
    println!("✓ Absent optional columns degrade to None, cost still derives");
}

fn test_numeric_coercion() {
    println!("\n====== Testing numeric coercion ======");
    let headers = ["Nome Completo", "Salario Base", "Impostos", "Beneficios", "VT", "VR"];
    let bytes = workbook_bytes(
        &headers,
        &[vec![
            Cell::S("Ana"),
            Cell::S("not a number"),
            Cell::Blank,
            Cell::S("123.5"),
            Cell::N(50.0),
            Cell::N(50.0),
        ]],
    );
    let table = load_from_bytes(&bytes).unwrap();
    let e = &table.rows[0];

    assert_eq!(e.base_salary, 0.0);
    assert_eq!(e.taxes, 0.0);
    assert_eq!(e.benefits, 123.5);
    assert_eq!(e.total_monthly_cost, 223.5);
    println!("✓ Unparseable and blank numerics coerce to 0.0, strings parse");
}

fn test_source_resolution() {
    println!("\n====== Testing source resolution order ======");
    let dir = tempfile::tempdir().unwrap();
    let default_path = dir.path().join("dados_rh.xlsx");

    // No upload, no default file: the sample dataset is the fallback.
    let table = load(None, &default_path).unwrap();
    assert_eq!(table.len(), 10);
    println!("✓ Missing default file falls back to the 10-row sample");

    // A default file on disk wins over the fallback.
    let on_disk = workbook_bytes(&FULL_HEADERS, &[full_row("Ana", "2020-02-02", None)]);
    std::fs::write(&default_path, &on_disk).unwrap();
    let table = load(None, &default_path).unwrap();
    assert_eq!(table.len(), 1);
    println!("✓ Default file is used when present");

    // An upload wins over everything.
    let upload = sample_xlsx_bytes().unwrap();
    let table = load(Some(&upload), &default_path).unwrap();
    assert_eq!(table.len(), 10);
    println!("✓ Uploaded bytes take priority over the default file");
}

pub fn run_tests() {
    println!("Starting loader unit tests");
    test_normalize_header();
    test_derivation_helpers();
    test_status_scenario();
    test_cache_hits();
    test_parse_failure_keeps_previous_table();
    test_schema_error();
    test_optional_columns_degrade();
    test_numeric_coercion();
    test_source_resolution();
    println!("\nAll tests passed!");
}

fn main() {
    run_tests();
}
