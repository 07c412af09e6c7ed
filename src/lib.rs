/*!
# Sales Performance Analysis App

A browser-based sales analytics tool built in Rust: upload an Excel workbook
of sales records and get four fixed aggregate views of it.

## Overview

The application is a single linear pipeline over the uploaded workbook. There
is no persistence and no background work; each upload replaces the in-memory
dataset and every view is recomputed from it on request.

1. **Loader** - parses the uploaded XLSX bytes into a rows-by-named-columns
   table (first worksheet, first row as headers).
2. **Normalizer** - trims header whitespace, folds known header variants onto
   canonical names, and coerces the four measure columns to numeric with
   per-cell recovery (bad cells become missing values).
3. **Aggregator** - four independent views of the normalized table:
   - quota vs credit summed per business unit
   - mean attainment-per-tenure per business unit
   - top 10 managers by mean-attainment / mean-tenure
   - quota achievement percentage per business unit
4. **Presenter/Exporter** - the first, second and fourth views render as PNG
   bar charts; the top-managers view renders as a table and downloads as
   `top_managers.csv`.

## Architecture

- **Frontend**: a single static page with an upload form; charts are plain
  `<img>` elements pointed at the chart endpoints.
- **Backend**: axum server holding the current dataset behind a mutex.
  Charts are drawn server-side with plotters.

## Modules

- **table**: tabular data model (named columns over rows of values) and
  grouping/statistics helpers
- **loader**: XLSX parsing via calamine
- **normalize**: header reconciliation and numeric coercion
- **views**: the four aggregate views as pure functions of the table
- **graph**: PNG bar-chart rendering
- **downloader**: CSV export of the top-managers view
- **error**: pipeline error type
- **app**: routing, handlers and shared state

## REST API Endpoints

- `GET  /` - landing page with upload form
- `POST /api/upload` - multipart workbook upload, replaces the dataset
- `GET  /api/top_managers` - top-managers view as JSON
- `GET  /charts/quota_credit.png` - quota vs credit bar chart
- `GET  /charts/performance_tenure.png` - performance-per-tenure bar chart
- `GET  /charts/quota_achievement.png` - quota achievement bar chart
- `GET  /download/top_managers.csv` - top-managers view as CSV download
*/

pub mod app;
pub mod downloader;
pub mod error;
pub mod graph;
pub mod loader;
pub mod normalize;
pub mod table;
pub mod views;

/// Re-export the core pipeline types to make the crate easier to use
pub use error::PipelineError;
pub use table::{DataTable, Value};
