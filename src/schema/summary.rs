//! The contract summary produced at the end of a query.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt::Write;

/// One extracted clause with a plain-language rewrite and its risks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct ClauseAnalysis {
    /// Kind of clause (e.g. "Indemnification", "Termination").
    pub clause_type: String,
    /// The clause as written in the filing.
    pub original_text: String,
    /// The clause rewritten in plain English.
    pub simplified_text: String,
    /// Risks the clause creates for the reader, most serious first.
    #[serde(default)]
    pub risk_flags: Option<Vec<String>>,
}

/// Structured analysis of a filing.
///
/// Only built by [`super::parse`]; a value that exists has passed strict
/// validation against this shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct ContractSummary {
    /// Name of the filing company.
    #[serde(default)]
    pub company_name: Option<String>,
    /// Parties bound by the contract.
    pub parties: Vec<String>,
    /// Date the contract takes effect, as written in the filing.
    #[serde(default)]
    pub effective_date: Option<String>,
    /// Key commercial and legal terms.
    pub key_terms: Vec<String>,
    /// Clauses that carry legal or financial risk.
    pub high_risk_clauses: Vec<ClauseAnalysis>,
    /// Plain-language summary of the whole document.
    pub simplified_summary: String,
    /// URLs or filing references the analysis relied on.
    pub sources: Vec<String>,
}

impl ContractSummary {
    /// Render the summary for a terminal or a text file.
    pub fn to_report(&self) -> String {
        let mut out = String::new();

        if let Some(name) = &self.company_name {
            let _ = writeln!(out, "Company: {}", name);
        }
        if let Some(date) = &self.effective_date {
            let _ = writeln!(out, "Effective date: {}", date);
        }
        if !self.parties.is_empty() {
            let _ = writeln!(out, "Parties: {}", self.parties.join("; "));
        }

        let _ = writeln!(out, "\n{}", self.simplified_summary);

        if !self.key_terms.is_empty() {
            out.push_str("\nKey terms:\n");
            for term in &self.key_terms {
                let _ = writeln!(out, "  - {}", term);
            }
        }

        if !self.high_risk_clauses.is_empty() {
            out.push_str("\nHigh-risk clauses:\n");
            for (i, clause) in self.high_risk_clauses.iter().enumerate() {
                let _ = writeln!(out, "  {}. {}", i + 1, clause.clause_type);
                let _ = writeln!(out, "     Plain English: {}", clause.simplified_text);
                if let Some(flags) = clause.risk_flags.as_ref().filter(|f| !f.is_empty()) {
                    let _ = writeln!(out, "     Risks: {}", flags.join(", "));
                }
            }
        }

        if !self.sources.is_empty() {
            out.push_str("\nSources:\n");
            for source in &self.sources {
                let _ = writeln!(out, "  - {}", source);
            }
        }

        out
    }
}
