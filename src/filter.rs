use crate::employee::{Employee, EmployeeTable};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One round of sidebar selections, decoded straight from the client.
///
/// Every field is optional and defaults to "no restriction". An empty
/// selection list applies no filter at all (the controls default to
/// everything selected), so deselecting every option never means "exclude
/// every row".
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterSpec {
    /// Case-insensitive substring match on the employee name.
    pub name_search: Option<String>,
    pub areas: Vec<String>,
    pub levels: Vec<String>,
    pub titles: Vec<String>,
    pub genders: Vec<String>,
    pub statuses: Vec<String>,
    /// Inclusive bounds.
    pub age_range: Option<(i32, i32)>,
    pub salary_range: Option<(f64, f64)>,
    pub hire_range: Option<(NaiveDate, NaiveDate)>,
    pub termination_range: Option<(NaiveDate, NaiveDate)>,
}

/// The filter controls the full table supports, with observed bounds.
///
/// Categorical options keep first-appearance order. A range field is `None`
/// when the backing column is absent or entirely missing, in which case the
/// client must not offer that control.
#[derive(Debug, Clone, Serialize)]
pub struct FilterOptions {
    pub areas: Vec<String>,
    pub levels: Vec<String>,
    pub titles: Vec<String>,
    pub genders: Vec<String>,
    pub statuses: Vec<String>,
    pub age_bounds: Option<(i32, i32)>,
    pub salary_bounds: Option<(f64, f64)>,
    pub hire_bounds: Option<(NaiveDate, NaiveDate)>,
    pub termination_bounds: Option<(NaiveDate, NaiveDate)>,
}

impl FilterOptions {
    /// Derive the available controls from the full (unfiltered) table, so a
    /// narrowed view never shrinks the options it was narrowed with.
    pub fn from_table(table: &EmployeeTable) -> Self {
        let rows = &table.rows;

        let age_bounds = min_max(rows.iter().filter_map(|e| e.age));
        // The salary control is only offered when the observed maximum is
        // positive.
        let salary_bounds = min_max_f64(rows.iter().map(|e| e.base_salary))
            .filter(|&(_, max)| max > 0.0);
        let hire_bounds = min_max(rows.iter().filter_map(|e| e.hire_date));
        let termination_bounds = min_max(rows.iter().filter_map(|e| e.termination_date));

        FilterOptions {
            areas: distinct(rows.iter().map(|e| &e.area)),
            levels: distinct(rows.iter().map(|e| &e.level)),
            titles: distinct(rows.iter().map(|e| &e.title)),
            genders: distinct(rows.iter().map(|e| &e.gender)),
            statuses: distinct(rows.iter().map(|e| &e.status)),
            age_bounds,
            salary_bounds,
            hire_bounds,
            termination_bounds,
        }
    }
}

/// Apply a filter specification to the full table.
///
/// Predicates compose with logical AND across categories and logical OR
/// within a categorical selection. The result is a fresh copy; the full
/// table is never mutated. An empty result means "no rows match", which the
/// caller must treat as distinct from "no data loaded".
pub fn apply(table: &EmployeeTable, spec: &FilterSpec) -> Vec<Employee> {
    table
        .rows
        .iter()
        .filter(|e| matches(e, spec))
        .cloned()
        .collect()
}

fn matches(e: &Employee, spec: &FilterSpec) -> bool {
    if let Some(term) = spec.name_search.as_deref() {
        let term = term.trim();
        if !term.is_empty() {
            let needle = term.to_uppercase();
            let hit = e.name.as_deref().is_some_and(|n| n.contains(&needle));
            if !hit {
                return false;
            }
        }
    }

    if !selection_passes(&spec.areas, &e.area)
        || !selection_passes(&spec.levels, &e.level)
        || !selection_passes(&spec.titles, &e.title)
        || !selection_passes(&spec.genders, &e.gender)
        || !selection_passes(&spec.statuses, &e.status)
    {
        return false;
    }

    // An applied range excludes rows whose value is missing; only an unset
    // range leaves them in.
    if let Some((lo, hi)) = spec.age_range {
        match e.age {
            Some(a) if a >= lo && a <= hi => {}
            _ => return false,
        }
    }
    if let Some((lo, hi)) = spec.salary_range {
        if e.base_salary < lo || e.base_salary > hi {
            return false;
        }
    }
    if let Some((lo, hi)) = spec.hire_range {
        match e.hire_date {
            Some(d) if d >= lo && d <= hi => {}
            _ => return false,
        }
    }
    if let Some((lo, hi)) = spec.termination_range {
        match e.termination_date {
            Some(d) if d >= lo && d <= hi => {}
            _ => return false,
        }
    }

    true
}

// Empty selection = no filter.
fn selection_passes(selected: &[String], value: &Option<String>) -> bool {
    if selected.is_empty() {
        return true;
    }
    match value {
        Some(v) => selected.iter().any(|s| s == v),
        None => false,
    }
}

fn distinct<'a>(values: impl Iterator<Item = &'a Option<String>>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for value in values.flatten() {
        if !out.iter().any(|seen| seen == value) {
            out.push(value.clone());
        }
    }
    out
}

fn min_max<T: Copy + PartialOrd>(values: impl Iterator<Item = T>) -> Option<(T, T)> {
    let mut bounds: Option<(T, T)> = None;
    for v in values {
        bounds = Some(match bounds {
            None => (v, v),
            Some((lo, hi)) => (
                if v < lo { v } else { lo },
                if v > hi { v } else { hi },
            ),
        });
    }
    bounds
}

fn min_max_f64(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    min_max(values.filter(|v| !v.is_nan()))
}
