use crate::employee::{
    Employee, EmployeeTable, age_from_hire_date, columns, months_between, normalize_gender,
    status_from_termination,
};
use crate::error::LoadError;
use crate::sample;
use calamine::{Data, Reader, Xlsx};
use chrono::{Local, NaiveDate, NaiveDateTime};
use lazy_static::lazy_static;
use log::warn;
use std::collections::{BTreeSet, HashMap};
use std::io::Cursor;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

lazy_static! {
    // Single-slot session cache: digest of the source bytes plus the table
    // built from them. A different source replaces the slot wholesale.
    static ref CACHE: RwLock<Option<(String, Arc<EmployeeTable>)>> = RwLock::new(None);
}

static PARSE_COUNT: AtomicU64 = AtomicU64::new(0);

/// Number of times the parser has actually run this session. Cache hits do
/// not increment it, which makes them observable from the test harnesses.
pub fn parse_count() -> u64 {
    PARSE_COUNT.load(Ordering::SeqCst)
}

/// Load the employee table, resolving the source in priority order
///
/// Exactly one source is used per call, first available wins:
/// 1. explicitly uploaded file bytes,
/// 2. the file at `default_path`, if it exists,
/// 3. the built-in sample dataset (logged as a fallback warning).
///
/// All three routes feed the same byte parser, so the sample data passes
/// through the identical normalization pipeline as a real upload.
///
/// # Arguments
/// * `upload` - Bytes of a user-uploaded XLSX file, if any
/// * `default_path` - Well-known location checked when no upload is given
///
/// # Returns
/// * `Result<Arc<EmployeeTable>, LoadError>` - The normalized table or the
///   error that aborted the load
///
/// # Examples
/// ```no_run
/// use std::path::Path;
/// use hr_dashboard::loader::load;
///
/// match load(None, Path::new("dados_rh.xlsx")) {
///     Ok(table) => println!("Loaded {} employees", table.len()),
///     Err(e) => eprintln!("Error loading data: {}", e),
/// }
/// ```
pub fn load(upload: Option<&[u8]>, default_path: &Path) -> Result<Arc<EmployeeTable>, LoadError> {
    if let Some(bytes) = upload {
        return load_from_bytes(bytes);
    }

    if default_path.exists() {
        let bytes = std::fs::read(default_path).map_err(|e| {
            LoadError::Parse(format!("could not read {}: {}", default_path.display(), e))
        })?;
        return load_from_bytes(&bytes);
    }

    warn!(
        "data file not found at {}; using the built-in sample dataset",
        default_path.display()
    );
    let bytes = sample::sample_xlsx_bytes().map_err(|e| LoadError::Parse(e.to_string()))?;
    load_from_bytes(&bytes)
}

/// Parse XLSX bytes into a normalized table, with content-identity caching
///
/// Repeated calls with byte-identical input return the previously computed
/// table without re-parsing; different input invalidates the cache slot and
/// triggers a fresh parse.
///
/// # Arguments
/// * `bytes` - Complete XLSX file content
///
/// # Returns
/// * `Result<Arc<EmployeeTable>, LoadError>` - The normalized table, or
///   `LoadError::Parse` for unreadable input, or `LoadError::Schema` when a
///   monetary column required for the total-cost derivation is absent
pub fn load_from_bytes(bytes: &[u8]) -> Result<Arc<EmployeeTable>, LoadError> {
    let digest = format!("{:x}", md5::compute(bytes));

    if let Some((cached_digest, table)) = CACHE.read().unwrap().as_ref() {
        if *cached_digest == digest {
            return Ok(Arc::clone(table));
        }
    }

    PARSE_COUNT.fetch_add(1, Ordering::SeqCst);
    let table = Arc::new(parse_table(bytes, Local::now().date_naive())?);
    *CACHE.write().unwrap() = Some((digest, Arc::clone(&table)));
    Ok(table)
}

/// Canonicalize a header cell into a stable column key
///
/// Spaces become underscores, periods are dropped, the cedilla maps to a
/// plain `c`, and everything is lowercased. "Avaliacao do Funcionario"
/// therefore becomes `avaliacao_do_funcionario` regardless of the exact
/// casing or spacing in the source file.
pub fn normalize_header(raw: &str) -> String {
    let mut key = String::with_capacity(raw.len());
    for c in raw.trim().chars() {
        match c {
            ' ' => key.push('_'),
            '.' => {}
            'ç' | 'Ç' => key.push('c'),
            _ => key.extend(c.to_lowercase()),
        }
    }
    key
}

fn parse_table(bytes: &[u8], today: NaiveDate) -> Result<EmployeeTable, LoadError> {
    let cursor = Cursor::new(bytes.to_vec());
    let mut workbook: Xlsx<_> = Xlsx::new(cursor).map_err(|e| LoadError::Parse(e.to_string()))?;

    // First sheet only; its header row defines the schema.
    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| LoadError::Parse("no sheets found in the workbook".to_string()))?;
    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| LoadError::Parse(e.to_string()))?;

    let mut data_rows = range.rows();
    let header = data_rows
        .next()
        .ok_or_else(|| LoadError::Parse("worksheet has no header row".to_string()))?;

    let mut index: HashMap<String, usize> = HashMap::new();
    for (i, cell) in header.iter().enumerate() {
        let raw = cell_to_string(cell);
        if raw.trim().is_empty() {
            continue;
        }
        index.entry(normalize_header(&raw)).or_insert(i);
    }
    let observed: BTreeSet<String> = index.keys().cloned().collect();

    // The total-cost derivation needs every monetary column.
    for key in columns::MONETARY {
        if !index.contains_key(key) {
            return Err(LoadError::Schema(key.to_string()));
        }
    }

    let has_hire_column = index.contains_key(columns::HIRE_DATE);
    let has_termination_column = index.contains_key(columns::TERMINATION_DATE);

    let mut rows = Vec::new();
    for row in data_rows {
        let name = text_field(&index, row, columns::NAME);
        let area = text_field(&index, row, columns::AREA);
        let level = text_field(&index, row, columns::LEVEL);
        let title = text_field(&index, row, columns::TITLE);
        let gender = text_field(&index, row, columns::GENDER).map(|g| normalize_gender(&g));
        let source_status = text_field(&index, row, columns::STATUS);

        let birth_date = date_field(&index, row, columns::BIRTH_DATE);
        let hire_date = date_field(&index, row, columns::HIRE_DATE);
        let termination_date = date_field(&index, row, columns::TERMINATION_DATE);

        let base_salary = number_field(&index, row, columns::BASE_SALARY).unwrap_or(0.0);
        let taxes = number_field(&index, row, columns::TAXES).unwrap_or(0.0);
        let benefits = number_field(&index, row, columns::BENEFITS).unwrap_or(0.0);
        let transport_allowance = number_field(&index, row, columns::TRANSPORT).unwrap_or(0.0);
        let meal_allowance = number_field(&index, row, columns::MEAL).unwrap_or(0.0);
        let evaluation = if index.contains_key(columns::EVALUATION) {
            Some(number_field(&index, row, columns::EVALUATION).unwrap_or(0.0))
        } else {
            None
        };

        // Derivation order: age, tenure, status, total cost.
        let age = if has_hire_column {
            hire_date.map(|h| age_from_hire_date(h, today))
        } else {
            None
        };
        let tenure_months = if has_hire_column {
            Some(hire_date.map(|h| months_between(h, today)).unwrap_or(0))
        } else {
            None
        };
        let status = if has_termination_column {
            Some(status_from_termination(termination_date))
        } else {
            source_status
        };
        let total_monthly_cost =
            base_salary + taxes + benefits + transport_allowance + meal_allowance;

        rows.push(Employee {
            name,
            area,
            level,
            title,
            gender,
            birth_date,
            hire_date,
            termination_date,
            base_salary,
            taxes,
            benefits,
            transport_allowance,
            meal_allowance,
            evaluation,
            age,
            tenure_months,
            status,
            total_monthly_cost,
        });
    }

    Ok(EmployeeTable {
        rows,
        columns: observed,
    })
}

/// Trimmed, upper-cased text value; `None` when the column is absent from
/// the source, empty string for a blank cell in a present column.
fn text_field(index: &HashMap<String, usize>, row: &[Data], key: &str) -> Option<String> {
    let i = *index.get(key)?;
    let raw = row.get(i).map(cell_to_string).unwrap_or_default();
    Some(raw.trim().to_uppercase())
}

/// Date value; `None` for an absent column, a blank cell, or an unparseable
/// value. A bad date never fails the load.
fn date_field(index: &HashMap<String, usize>, row: &[Data], key: &str) -> Option<NaiveDate> {
    let i = *index.get(key)?;
    row.get(i).and_then(cell_to_date)
}

/// Numeric value; `None` for an absent column or an uncoercible cell.
fn number_field(index: &HashMap<String, usize>, row: &[Data], key: &str) -> Option<f64> {
    let i = *index.get(key)?;
    row.get(i).and_then(cell_to_number)
}

fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::String(s) => s.clone(),
        Data::Float(f) => f.to_string(),
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::DateTimeIso(s) => s.clone(),
        Data::DateTime(dt) => dt.as_datetime().map(|d| d.to_string()).unwrap_or_default(),
        Data::Empty | Data::Error(_) | Data::DurationIso(_) => String::new(),
    }
}

fn cell_to_date(cell: &Data) -> Option<NaiveDate> {
    match cell {
        Data::DateTime(dt) => dt.as_datetime().map(|d| d.date()),
        Data::DateTimeIso(s) | Data::String(s) => parse_date_str(s),
        _ => None,
    }
}

fn cell_to_number(cell: &Data) -> Option<f64> {
    match cell {
        Data::Float(f) => Some(*f),
        Data::Int(i) => Some(*i as f64),
        Data::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

fn parse_date_str(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
                .ok()
                .map(|d| d.date())
        })
        .or_else(|| {
            NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S")
                .ok()
                .map(|d| d.date())
        })
        .or_else(|| NaiveDate::parse_from_str(s, "%d/%m/%Y").ok())
}
