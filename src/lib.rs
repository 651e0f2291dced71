//! Core entry point for the sales_report crate.
//!
//! The pipeline loads a sales CSV ([`storage`]), cleans it in place ([`clean`]), summarises it
//! ([`summary`]), and hands the result to the chart, PDF, and email stages. [`pipeline::run`]
//! wires the stages together.

pub mod builder;
pub mod chart;
pub mod clean;
pub mod config;
pub mod elements;
pub mod error;
pub mod fonts;
pub mod generator;
pub mod model;
pub mod notify;
pub mod pipeline;
pub mod report;
pub mod richtext;
pub mod storage;
pub mod summary;
pub mod table;
