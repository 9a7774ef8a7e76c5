//! Ticker and filing lookups over EDGAR's JSON documents.

use super::Cik;
use crate::error::{KlausulError, Result};
use serde::Deserialize;
use std::collections::HashMap;

/// One entry of `company_tickers.json`.
#[derive(Debug, Deserialize)]
struct TickerEntry {
    cik_str: CikField,
    ticker: String,
}

/// EDGAR serves the CIK as a number, but tolerate a string too.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum CikField {
    Number(u64),
    Text(String),
}

impl CikField {
    fn to_cik(&self) -> Result<Cik> {
        match self {
            CikField::Number(n) => Ok(Cik::from_number(*n)),
            CikField::Text(s) => s
                .trim()
                .parse::<u64>()
                .map(Cik::from_number)
                .map_err(|_| KlausulError::Edgar(format!("Malformed CIK in directory: {}", s))),
        }
    }
}

/// Find the CIK for `ticker` in the issuer directory document.
///
/// Matching is case-insensitive and exact. Entries are scanned in the
/// directory's numeric key order.
pub fn find_cik(directory_json: &str, ticker: &str) -> Result<Cik> {
    let directory: HashMap<String, TickerEntry> = serde_json::from_str(directory_json)
        .map_err(|e| KlausulError::Edgar(format!("Unreadable issuer directory: {}", e)))?;

    let mut entries: Vec<(&String, &TickerEntry)> = directory.iter().collect();
    entries.sort_by_key(|(key, _)| (key.parse::<u64>().unwrap_or(u64::MAX), key.to_string()));

    let wanted = ticker.trim();
    entries
        .into_iter()
        .map(|(_, entry)| entry)
        .find(|entry| entry.ticker.eq_ignore_ascii_case(wanted))
        .ok_or_else(|| KlausulError::NotFound(format!("CIK not found for ticker {}", ticker)))?
        .cik_str
        .to_cik()
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Submissions {
    filings: Filings,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Filings {
    recent: RecentFilings,
}

/// Parallel arrays describing the issuer's recent filings.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RecentFilings {
    form: Vec<String>,
    #[serde(rename = "accessionNumber")]
    accession_number: Vec<String>,
}

/// Build the index URL of the first filing of `form_type` in the submissions document.
///
/// Filings are scanned in the order EDGAR lists them (newest first), so the
/// first exact match is the latest filing of that type.
pub fn find_filing_url(
    submissions_json: &str,
    cik: &Cik,
    form_type: &str,
    archives_base_url: &str,
) -> Result<String> {
    let submissions: Submissions = serde_json::from_str(submissions_json)
        .map_err(|e| KlausulError::Edgar(format!("Unreadable filing history: {}", e)))?;
    let recent = submissions.filings.recent;

    let index = recent
        .form
        .iter()
        .position(|form| form == form_type)
        .ok_or_else(|| {
            KlausulError::NotFound(format!("No {} filing found for CIK {}", form_type, cik))
        })?;

    let accession = recent.accession_number.get(index).ok_or_else(|| {
        KlausulError::Edgar(format!("Filing history for CIK {} has no accession number at {}", cik, index))
    })?;

    Ok(format!(
        "{}/Archives/edgar/data/{}/{}/index.html",
        archives_base_url.trim_end_matches('/'),
        cik.as_number(),
        accession.replace('-', "")
    ))
}
