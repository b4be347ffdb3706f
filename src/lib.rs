/*!
# HR Analytics Dashboard

A browser-based human-resources analytics dashboard, built in Rust.

## Overview

The application ingests a spreadsheet of employee records, derives computed
fields (age, tenure, employment status, total monthly cost), lets the user
narrow the dataset through independent sidebar filters, and renders KPI
summaries and charts over the filtered subset. Everything lives in memory
for the lifetime of the session; the source file is never written back.

## Architecture

The application follows a client-server architecture:

### Frontend Layer
- **Technologies**: HTML, CSS, vanilla JavaScript
- **Key Components**:
  - Sidebar Controls - Name search, categorical multi-selects, range inputs
  - KPI Cards - Headcount, payroll and average indicators
  - Chart Panels - Server-rendered PNG visualizations
  - Data Table - The filtered rows

### Backend Layer
- **Technologies**: Rust, axum
- **Core Components**:
  - Data Loader/Normalizer - Parses the spreadsheet, canonicalizes headers,
    coerces types and derives columns, with a content-identity cache
  - Filter Engine - Composes the sidebar selections into one filtered view
  - KPI Aggregator - Scalar summaries over the filtered subset
  - Chart Renderer - Histogram, boxplot, bar, pie and line renders
  - Error Handler - Parse and schema failures, empty-result signaling

### Data Flow

The full table is built once per distinct source (upload, default file, or
the built-in sample) and replaced wholesale when a new source arrives; the
filtered view is recomputed from it on every filter change and never
persisted.

## Key Features

- XLSX ingestion with tolerant, column-by-column normalization
- Derived columns: age, tenure in months, status, total monthly cost
- AND-composed filters: text search, multi-selects, numeric and date ranges
- KPIs split by employment status with explicit "N/A" for missing columns
- Five chart types rendered server-side as PNG
- Downloadable example spreadsheet

## Modules

- **employee**: Record/table types and derived-field computation
- **sample**: Built-in demonstration dataset and its XLSX serialization
- **loader**: Ingestion, normalization, derivation and caching
- **filter**: Filter specification, observed bounds, predicate application
- **kpi**: Scalar aggregates over a filtered subset
- **charts**: PNG chart rendering (feature `web`)
- **app**: Routing and shared state (feature `web`)
- **error**: Load-pipeline error taxonomy

## REST API Endpoints

- `GET /api/options` - Filter controls derived from the full table
- `POST /api/view` - Filtered rows plus KPI summary
- `POST /api/upload` - Replace the session table from an uploaded file
- `POST /api/chart/{kind}` - Render one chart over the filtered subset
- `GET /api/sample` - Download the example spreadsheet
- `POST /api/reload` - Re-run source resolution
*/

// Re-export all modules so they appear in the documentation
pub mod employee;
pub mod error;
pub mod filter;
pub mod kpi;
pub mod loader;
pub mod sample;

#[cfg(feature = "web")]
pub mod app;
#[cfg(feature = "web")]
pub mod charts;

/// Re-export the core types to make them easier to use
pub use employee::{Employee, EmployeeTable};
pub use error::LoadError;
pub use filter::{FilterOptions, FilterSpec};
pub use kpi::KpiSummary;
