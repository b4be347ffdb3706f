use rust_xlsxwriter::{Workbook, Worksheet, XlsxError};

/// One row of the built-in demonstration dataset, in source-header order.
struct SampleRow {
    name: &'static str,
    area: &'static str,
    level: &'static str,
    title: &'static str,
    gender: &'static str,
    birth_date: &'static str,
    hire_date: &'static str,
    termination_date: Option<&'static str>,
    base_salary: f64,
    taxes: f64,
    benefits: f64,
    transport: f64,
    meal: f64,
    evaluation: f64,
}

/// Column headers exactly as the source spreadsheet carries them; the loader
/// normalizes them into the canonical key set.
const HEADERS: [&str; 14] = [
    "Nome Completo",
    "Area",
    "Nivel",
    "Cargo",
    "Sexo",
    "Data de Nascimento",
    "Data de Contratacao",
    "Data de Demissao",
    "Salario Base",
    "Impostos",
    "Beneficios",
    "VT",
    "VR",
    "Avaliacao do Funcionario",
];

#[rustfmt::skip]
const ROWS: [SampleRow; 10] = [
    SampleRow { name: "Ana Silva",       area: "Vendas",     level: "Pleno",  title: "Vendedor",       gender: "Feminino",  birth_date: "1990-05-15", hire_date: "2018-01-10", termination_date: None,               base_salary: 4500.0,  taxes: 1200.0, benefits: 500.0, transport: 150.0, meal: 300.0, evaluation: 8.5 },
    SampleRow { name: "Bruno Costa",     area: "Marketing",  level: "Senior", title: "Analista Mkt",   gender: "Masculino", birth_date: "1985-11-20", hire_date: "2015-06-25", termination_date: Some("2023-01-20"), base_salary: 8500.0,  taxes: 2500.0, benefits: 700.0, transport: 200.0, meal: 400.0, evaluation: 9.2 },
    SampleRow { name: "Carlos Mendes",   area: "Vendas",     level: "Junior", title: "Vendedor",       gender: "Masculino", birth_date: "1998-03-01", hire_date: "2021-09-15", termination_date: None,               base_salary: 3200.0,  taxes: 850.0,  benefits: 300.0, transport: 150.0, meal: 250.0, evaluation: 7.8 },
    SampleRow { name: "Diana Souza",     area: "Engenharia", level: "Pleno",  title: "Engenheiro",     gender: "Feminino",  birth_date: "1992-09-22", hire_date: "2019-03-20", termination_date: None,               base_salary: 7000.0,  taxes: 2100.0, benefits: 600.0, transport: 180.0, meal: 350.0, evaluation: 9.1 },
    SampleRow { name: "Eduarda Pereira", area: "Vendas",     level: "Senior", title: "Gerente Vendas", gender: "Feminino",  birth_date: "1988-07-10", hire_date: "2014-05-01", termination_date: None,               base_salary: 12000.0, taxes: 3500.0, benefits: 800.0, transport: 200.0, meal: 400.0, evaluation: 9.5 },
    SampleRow { name: "Fábio Gomes",   area: "Marketing",  level: "Pleno",  title: "Analista Mkt",   gender: "Masculino", birth_date: "1995-02-28", hire_date: "2017-08-08", termination_date: None,               base_salary: 6000.0,  taxes: 1500.0, benefits: 550.0, transport: 150.0, meal: 300.0, evaluation: 8.0 },
    SampleRow { name: "Gabriel Rocha",   area: "Engenharia", level: "Junior", title: "Engenheiro",     gender: "Masculino", birth_date: "2000-04-12", hire_date: "2022-01-30", termination_date: None,               base_salary: 4000.0,  taxes: 1000.0, benefits: 450.0, transport: 150.0, meal: 280.0, evaluation: 7.5 },
    SampleRow { name: "Helena Martins",  area: "Vendas",     level: "Pleno",  title: "Vendedor",       gender: "Feminino",  birth_date: "1993-08-05", hire_date: "2018-02-14", termination_date: None,               base_salary: 4800.0,  taxes: 1300.0, benefits: 420.0, transport: 160.0, meal: 320.0, evaluation: 8.8 },
    SampleRow { name: "Isabela Lima",    area: "Engenharia", level: "Senior", title: "Engenheiro",     gender: "Feminino",  birth_date: "1987-12-30", hire_date: "2013-10-17", termination_date: Some("2023-11-10"), base_salary: 9500.0,  taxes: 2800.0, benefits: 750.0, transport: 200.0, meal: 400.0, evaluation: 9.0 },
    SampleRow { name: "João Almeida",   area: "Vendas",     level: "Junior", title: "Vendedor",       gender: "Masculino", birth_date: "1999-06-18", hire_date: "2020-04-05", termination_date: None,               base_salary: 3500.0,  taxes: 900.0,  benefits: 350.0, transport: 150.0, meal: 280.0, evaluation: 8.2 },
];

/// Build the demonstration spreadsheet as XLSX bytes.
///
/// Deterministic and side-effect free: ten illustrative employees with mixed
/// areas, levels and salaries, two of them terminated. The loader parses
/// these bytes through the same pipeline as a real upload, and the web layer
/// serves them verbatim as the downloadable example file.
///
/// # Returns
/// * `Result<Vec<u8>, XlsxError>` - XLSX file content as bytes or an error
///
/// # Examples
/// ```no_run
/// use hr_dashboard::sample::sample_xlsx_bytes;
///
/// match sample_xlsx_bytes() {
///     Ok(bytes) => println!("Sample workbook: {} bytes", bytes.len()),
///     Err(e) => eprintln!("Failed to build sample workbook: {}", e),
/// }
/// ```
pub fn sample_xlsx_bytes() -> Result<Vec<u8>, XlsxError> {
    let mut workbook = Workbook::new();
    let mut worksheet = Worksheet::new();
    worksheet.set_name("Sheet1")?;

    for (col, header) in HEADERS.iter().enumerate() {
        worksheet.write_string(0, col as u16, *header)?;
    }

    for (i, employee) in ROWS.iter().enumerate() {
        let row = (i + 1) as u32;
        worksheet.write_string(row, 0, employee.name)?;
        worksheet.write_string(row, 1, employee.area)?;
        worksheet.write_string(row, 2, employee.level)?;
        worksheet.write_string(row, 3, employee.title)?;
        worksheet.write_string(row, 4, employee.gender)?;
        worksheet.write_string(row, 5, employee.birth_date)?;
        worksheet.write_string(row, 6, employee.hire_date)?;
        if let Some(termination) = employee.termination_date {
            worksheet.write_string(row, 7, termination)?;
        }
        worksheet.write_number(row, 8, employee.base_salary)?;
        worksheet.write_number(row, 9, employee.taxes)?;
        worksheet.write_number(row, 10, employee.benefits)?;
        worksheet.write_number(row, 11, employee.transport)?;
        worksheet.write_number(row, 12, employee.meal)?;
        worksheet.write_number(row, 13, employee.evaluation)?;
    }

    workbook.push_worksheet(worksheet);
    workbook.save_to_buffer()
}

/// File name offered for the sample download.
pub const SAMPLE_FILE_NAME: &str = "dados_rh_exemplo.xlsx";

/// MIME type for XLSX downloads.
pub const XLSX_MIME: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";
