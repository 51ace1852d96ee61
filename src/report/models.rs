// src/report/models.rs
use chrono::{NaiveDate, NaiveDateTime};
use serde::Deserialize;

/// Company-analysis report record as returned by
/// `GET /api/v1/company-analysis/{id}`. Only the fields this tool reads are kept.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportDetail {
    pub company_analysis_id: u64,
    #[serde(default)]
    pub company_analysis_title: Option<String>,
    pub company_name: String,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub dart_company_analysis: Option<String>,
    // Field name is spelled this way by the backend.
    #[serde(default)]
    pub dart_financial_summery: Option<String>,
    #[serde(default)]
    pub dart_category: Option<Vec<String>>,
}

impl ReportDetail {
    /// The text fields written in the `((title))` / `(label) : {body}` format,
    /// keyed by the name used for output files.
    pub fn disclosure_fields(&self) -> [(&'static str, Option<&str>); 2] {
        [
            ("company_analysis", self.dart_company_analysis.as_deref()),
            ("financial_summary", self.dart_financial_summery.as_deref()),
        ]
    }

    /// Date part of `createdAt`, which the backend sends without an offset.
    pub fn created_date(&self) -> Option<NaiveDate> {
        let raw = self.created_at.as_deref()?;
        NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
            .map(|dt| dt.date())
            .or_else(|_| NaiveDate::parse_from_str(raw, "%Y-%m-%d"))
            .ok()
    }
}
