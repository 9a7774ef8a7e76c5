//! SEC EDGAR access: from a ticker symbol to the plain text of a filing.
//!
//! The lookup runs as a chain, and any failing step ends it:
//!
//! 1. ticker → CIK, via the public issuer directory
//! 2. CIK + form type → filing index URL, via the issuer's filing history
//! 3. index URL → document URL, by picking a link on the index page
//! 4. document URL → plain text
//!
//! Every request goes through a [`Transport`], which carries the
//! identifying User-Agent EDGAR requires.

pub mod html;
mod lookup;
mod transport;

pub use html::{html_to_text, select_document, truncate};
pub use lookup::{find_cik, find_filing_url};
pub use transport::{HttpTransport, Transport};

use crate::config::EdgarSettings;
use crate::error::{KlausulError, Result};
use std::sync::Arc;
use tracing::{info, instrument};
use url::Url;

/// Central Index Key: EDGAR's issuer identifier, zero-padded to 10 digits.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Cik(String);

impl Cik {
    pub fn from_number(number: u64) -> Self {
        Cik(format!("{:010}", number))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The CIK without padding, as used in archive paths.
    pub fn as_number(&self) -> u64 {
        self.0.parse().unwrap_or_default()
    }
}

impl std::fmt::Display for Cik {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A filing document fetched end to end.
#[derive(Debug, Clone)]
pub struct FetchedFiling {
    pub cik: Cik,
    pub index_url: String,
    pub document_url: String,
    /// Full plain text of the document.
    pub text: String,
}

/// Client for the EDGAR lookup chain.
pub struct EdgarClient {
    transport: Arc<dyn Transport>,
    settings: EdgarSettings,
}

impl EdgarClient {
    /// Create a client that talks to the live EDGAR endpoints.
    pub fn new(settings: &EdgarSettings) -> Result<Self> {
        let transport = HttpTransport::new(&settings.user_agent, settings.timeout())?;
        Ok(Self::with_transport(Arc::new(transport), settings))
    }

    /// Create a client over a custom transport.
    pub fn with_transport(transport: Arc<dyn Transport>, settings: &EdgarSettings) -> Self {
        Self {
            transport,
            settings: settings.clone(),
        }
    }

    pub fn settings(&self) -> &EdgarSettings {
        &self.settings
    }

    /// Resolve a ticker symbol to its CIK.
    #[instrument(skip(self))]
    pub async fn resolve_cik(&self, ticker: &str) -> Result<Cik> {
        let directory = self.transport.get(&self.settings.tickers_url).await?;
        let cik = find_cik(&directory, ticker)?;
        info!("Resolved {} to CIK {}", ticker, cik);
        Ok(cik)
    }

    /// Resolve the index URL of the latest filing of `form_type`.
    #[instrument(skip(self), fields(cik = %cik))]
    pub async fn resolve_filing_url(&self, cik: &Cik, form_type: &str) -> Result<String> {
        let url = format!(
            "{}/CIK{}.json",
            self.settings.submissions_base_url.trim_end_matches('/'),
            cik
        );
        let submissions = self.transport.get(&url).await?;
        let filing_url = find_filing_url(
            &submissions,
            cik,
            form_type,
            &self.settings.archives_base_url,
        )?;
        info!("Latest {} filing index: {}", form_type, filing_url);
        Ok(filing_url)
    }

    /// Pick the document to read from a filing index page.
    #[instrument(skip(self))]
    pub async fn resolve_document_url(&self, index_url: &str) -> Result<String> {
        let index_html = self.transport.get(index_url).await?;
        let links = html::extract_links(&index_html);

        let selected = select_document(&links).ok_or_else(|| {
            KlausulError::NoDocument(format!("No valid .htm document links found in {}", index_url))
        })?;

        // Inline XBRL viewer links wrap the archive path of the real document.
        let href = selected.strip_prefix("/ix?doc=").unwrap_or(selected);

        let base = Url::parse(index_url)
            .map_err(|e| KlausulError::InvalidInput(format!("Bad index URL {}: {}", index_url, e)))?;
        let document_url = base
            .join(href)
            .map_err(|e| KlausulError::Edgar(format!("Bad document link {}: {}", href, e)))?;

        Ok(document_url.to_string())
    }

    /// Fetch an index page, pick its document and return the document's plain text.
    pub async fn extract_document_text(&self, index_url: &str) -> Result<String> {
        let document_url = self.resolve_document_url(index_url).await?;
        self.document_text(&document_url).await
    }

    async fn document_text(&self, document_url: &str) -> Result<String> {
        info!("Fetching filing document from: {}", document_url);
        let document_html = self.transport.get(document_url).await?;
        Ok(html_to_text(&document_html))
    }

    /// Run the whole chain for `ticker` and `form_type`.
    pub async fn fetch_filing(&self, ticker: &str, form_type: &str) -> Result<FetchedFiling> {
        let cik = self.resolve_cik(ticker).await?;
        let index_url = self.resolve_filing_url(&cik, form_type).await?;
        let document_url = self.resolve_document_url(&index_url).await?;
        let text = self.document_text(&document_url).await?;

        Ok(FetchedFiling {
            cik,
            index_url,
            document_url,
            text,
        })
    }
}
