//! Request builder
//!
//! Turns an [`Operation`] and a [`Locale`] into a [`RequestDescriptor`].

use super::envelope;
use super::types::{Operation, RequestDescriptor};
use crate::error::{Error, Result};
use crate::types::{EntityKind, Locale};

/// Default marketplace host
pub const DEFAULT_BASE_URL: &str = "https://play.google.com";

const BATCH_EXECUTE_PATH: &str = "/_/PlayStoreUi/data/batchexecute";
const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded;charset=UTF-8";

/// Builds transport requests for marketplace operations
#[derive(Debug, Clone)]
pub struct RequestBuilder {
    base_url: String,
}

impl Default for RequestBuilder {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

impl RequestBuilder {
    /// Create a builder against `base_url` (no trailing slash needed)
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { base_url }
    }

    /// Host all requests are sent to
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build the request for `op` under `locale`.
    ///
    /// When the locale has no country, `gl` is omitted from the query.
    pub fn build(&self, op: &Operation, locale: &Locale) -> RequestDescriptor {
        let base = &self.base_url;
        let hl = urlencoding::encode(&locale.lang);
        let gl = locale
            .country
            .as_deref()
            .filter(|c| !c.is_empty())
            .map(urlencoding::encode);
        let hl_gl = match &gl {
            Some(gl) => format!("hl={hl}&gl={gl}"),
            None => format!("hl={hl}"),
        };

        match op {
            Operation::AppDetails { app_id } => RequestDescriptor::get(format!(
                "{base}/store/apps/details?id={}&{hl_gl}",
                urlencoding::encode(app_id)
            )),
            Operation::SearchPage { query } => RequestDescriptor::get(format!(
                "{base}/work/search?q={}&{hl_gl}&price=0",
                urlencoding::encode(query)
            )),
            Operation::SearchContinuation { token, needed } => form_post(
                format!(
                    "{base}{BATCH_EXECUTE_PATH}?rpcids={}&source-path=%2Fwork%2Fsearch&{hl_gl}",
                    envelope::SEARCH_RPC
                ),
                envelope::search_continuation(token, *needed),
            ),
            Operation::Reviews {
                app_id,
                sort,
                count,
                token,
            } => RequestDescriptor::post(
                format!("{base}{BATCH_EXECUTE_PATH}?{hl_gl}"),
                envelope::reviews(app_id, *sort, *count, token.as_deref()),
            )
            .header("content-type", "application/x-www-form-urlencoded"),
            Operation::DeveloperPage { dev_id } => {
                let page = if is_numeric_developer(dev_id) {
                    "dev"
                } else {
                    "developer"
                };
                RequestDescriptor::get(format!(
                    "{base}/store/apps/{page}?id={}&{hl_gl}",
                    urlencoding::encode(dev_id)
                ))
            }
            Operation::ClusterPage { path } => {
                let gl_hl = match &gl {
                    Some(gl) => format!("gl={gl}&hl={hl}"),
                    None => format!("hl={hl}"),
                };
                let sep = if path.contains('?') { '&' } else { '?' };
                RequestDescriptor::get(format!("{base}{path}{sep}{gl_hl}"))
            }
            Operation::TopChart {
                collection,
                category,
                count,
            } => form_post(
                format!(
                    "{base}{BATCH_EXECUTE_PATH}?rpcids={}&source-path=%2Fstore%2Fapps&{hl_gl}",
                    envelope::TOP_CHART_RPC
                ),
                envelope::top_chart(*collection, category, *count),
            ),
            Operation::Suggest { term } => form_post(
                format!(
                    "{base}{BATCH_EXECUTE_PATH}?rpcids={}&f.sid=-697906427155521722\
                     &bl=boq_playuiserver_20190903.08_p0&{hl_gl}&authuser\
                     &soc-app=121&soc-platform=1&soc-device=1&_reqid=1065213",
                    envelope::SUGGEST_RPC
                ),
                envelope::suggest(term),
            ),
        }
    }
}

fn form_post(url: String, body: String) -> RequestDescriptor {
    RequestDescriptor::post(url, body).header("Content-Type", FORM_CONTENT_TYPE)
}

/// Numeric developer ids use the `/dev` page, names use `/developer`
pub fn is_numeric_developer(dev_id: &str) -> bool {
    !dev_id.is_empty() && dev_id.bytes().all(|b| b.is_ascii_digit())
}

/// Pick the search operation for a query or a continuation token.
///
/// Exactly one of `query` and `token` must be given; a continuation also
/// needs the number of results still wanted.
pub fn search_request(
    query: Option<&str>,
    token: Option<&str>,
    needed: Option<usize>,
) -> Result<Operation> {
    match (query, token) {
        (Some(query), None) => {
            if query.trim().is_empty() {
                return Err(Error::invalid_identifier(
                    EntityKind::SearchResult,
                    "query must not be empty",
                ));
            }
            Ok(Operation::SearchPage {
                query: query.to_string(),
            })
        }
        (None, Some(token)) => {
            if token.trim().is_empty() {
                return Err(Error::invalid_identifier(
                    EntityKind::SearchResult,
                    "continuation token must not be empty",
                ));
            }
            let needed = needed.filter(|&n| n > 0).ok_or_else(|| {
                Error::invalid_identifier(
                    EntityKind::SearchResult,
                    "continuation requires a positive number of results needed",
                )
            })?;
            Ok(Operation::SearchContinuation {
                token: token.to_string(),
                needed,
            })
        }
        (Some(_), Some(_)) => Err(Error::invalid_identifier(
            EntityKind::SearchResult,
            "query and continuation token are mutually exclusive",
        )),
        (None, None) => Err(Error::invalid_identifier(
            EntityKind::SearchResult,
            "either a query or a continuation token is required",
        )),
    }
}
