use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Canonical column keys produced by header normalization.
///
/// The source spreadsheet carries Portuguese headers ("Nome Completo",
/// "Data de Contratacao", ...); after normalization they become the stable
/// snake_case keys below. Unknown columns are ignored by the loader.
pub mod columns {
    pub const NAME: &str = "nome_completo";
    pub const AREA: &str = "area";
    pub const LEVEL: &str = "nivel";
    pub const TITLE: &str = "cargo";
    pub const GENDER: &str = "sexo";
    pub const STATUS: &str = "status";
    pub const BIRTH_DATE: &str = "data_de_nascimento";
    pub const HIRE_DATE: &str = "data_de_contratacao";
    pub const TERMINATION_DATE: &str = "data_de_demissao";
    pub const BASE_SALARY: &str = "salario_base";
    pub const TAXES: &str = "impostos";
    pub const BENEFITS: &str = "beneficios";
    pub const TRANSPORT: &str = "vt";
    pub const MEAL: &str = "vr";
    pub const EVALUATION: &str = "avaliacao_do_funcionario";

    /// The five columns summed into the total monthly cost. All of them must
    /// be present in the source header.
    pub const MONETARY: [&str; 5] = [BASE_SALARY, TAXES, BENEFITS, TRANSPORT, MEAL];
}

/// Employment status labels derived from termination-date presence.
pub const STATUS_ACTIVE: &str = "ACTIVE";
pub const STATUS_TERMINATED: &str = "TERMINATED";

/// One normalized employee record.
///
/// Text fields are trimmed and upper-cased; `None` means the column was
/// absent from the source. Monetary fields are always present (the loader
/// rejects a source missing any of them) and default to `0.0` for blank or
/// unparseable cells. Derived fields are computed once at load time.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Employee {
    pub name: Option<String>,
    pub area: Option<String>,
    pub level: Option<String>,
    pub title: Option<String>,
    pub gender: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub hire_date: Option<NaiveDate>,
    pub termination_date: Option<NaiveDate>,
    pub base_salary: f64,
    pub taxes: f64,
    pub benefits: f64,
    pub transport_allowance: f64,
    pub meal_allowance: f64,
    /// `None` only when the evaluation column is absent from the source.
    pub evaluation: Option<f64>,
    /// Derived. `None` when the hire-date column is absent or this row has
    /// no parseable hire date.
    pub age: Option<i32>,
    /// Derived. `Some(0)` for a present column with a missing date, `None`
    /// when the column is absent.
    pub tenure_months: Option<i32>,
    /// Derived from termination-date presence when that column exists;
    /// otherwise whatever the source's own status column held.
    pub status: Option<String>,
    /// Derived: sum of the five monetary fields.
    pub total_monthly_cost: f64,
}

impl Employee {
    pub fn is_active(&self) -> bool {
        self.status.as_deref() == Some(STATUS_ACTIVE)
    }

    pub fn is_terminated(&self) -> bool {
        self.status.as_deref() == Some(STATUS_TERMINATED)
    }
}

/// The full normalized table for the current source: the session's single
/// piece of shared state. The loader builds it once per distinct source and
/// it is never mutated afterwards; filtered views are always fresh copies.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct EmployeeTable {
    pub rows: Vec<Employee>,
    /// Canonical keys observed in the source header. Lets downstream layers
    /// tell "column absent" apart from "all values missing".
    pub columns: BTreeSet<String>,
}

impl EmployeeTable {
    pub fn has_column(&self, key: &str) -> bool {
        self.columns.contains(key)
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }
}

/// Years elapsed between `hire` and `today`, adjusted down by one when
/// today's month/day precedes the hire month/day.
///
/// The dashboard's "age" column is defined over the hire date, not the
/// birth date. The birth-date column is ingested but feeds nothing.
pub fn age_from_hire_date(hire: NaiveDate, today: NaiveDate) -> i32 {
    let before_anniversary = (today.month(), today.day()) < (hire.month(), hire.day());
    today.year() - hire.year() - before_anniversary as i32
}

/// Whole months elapsed between `hire` and `today`, day-of-month ignored.
pub fn months_between(hire: NaiveDate, today: NaiveDate) -> i32 {
    (today.year() - hire.year()) * 12 + today.month() as i32 - hire.month() as i32
}

/// Status label from termination-date presence.
pub fn status_from_termination(termination: Option<NaiveDate>) -> String {
    if termination.is_some() {
        STATUS_TERMINATED.to_string()
    } else {
        STATUS_ACTIVE.to_string()
    }
}

/// Uppercase gender free text reduced to the canonical two-value code.
/// Unrecognized values pass through unchanged.
pub fn normalize_gender(value: &str) -> String {
    match value {
        "MASCULINO" => "M".to_string(),
        "FEMININO" => "F".to_string(),
        other => other.to_string(),
    }
}
