//! PostgREST-style REST client.
//!
//! Each table lives at `{base_url}/{table}`, with the name percent-encoded as a single
//! path segment. A `schema.table` name is sent as `table` plus a schema profile header.
//! Equality filters travel as `col=eq.value`
//! query pairs, mutations ask for `Prefer: return=representation`, counts use `HEAD`
//! with `Prefer: count=exact` and read the total from `Content-Range`.

use super::DocumentStore;
use crate::config::StoreConfig;
use crate::core::{Result, Row, ShimError, StoreError, StoreResult, filter_text};
use crate::parser::Predicate;
use async_trait::async_trait;
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_RANGE, HeaderMap, HeaderValue};
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode, Url};
use serde::Deserialize;
use serde_json::Value;

const SINGLE_OBJECT: &str = "application/vnd.pgrst.object+json";
const RETURN_REPRESENTATION: &str = "return=representation";
const COUNT_EXACT: &str = "count=exact";
const NO_ROWS_CODE: &str = "PGRST116";

#[derive(Debug, Default, Deserialize)]
struct ApiErrorBody {
    code: Option<String>,
    message: Option<String>,
    details: Option<String>,
    hint: Option<String>,
}

pub struct RestStore {
    client: Client,
    base: Url,
    config: StoreConfig,
}

impl RestStore {
    pub fn new(config: StoreConfig) -> Result<Self> {
        config.validate()?;
        let base = Url::parse(&config.base_url)
            .map_err(|e| ShimError::Config(format!("invalid base_url '{}': {}", config.base_url, e)))?;
        if base.cannot_be_a_base() {
            return Err(ShimError::Config(format!(
                "base_url '{}' cannot take a path",
                config.base_url
            )));
        }

        let mut headers = HeaderMap::new();
        let key = HeaderValue::from_str(&config.api_key)
            .map_err(|e| ShimError::Config(format!("invalid api key: {}", e)))?;
        let bearer = HeaderValue::from_str(&format!("Bearer {}", config.api_key))
            .map_err(|e| ShimError::Config(format!("invalid api key: {}", e)))?;
        headers.insert("apikey", key);
        headers.insert(AUTHORIZATION, bearer);

        let client = Client::builder()
            .timeout(config.timeout)
            .default_headers(headers)
            .build()
            .map_err(|e| ShimError::Config(format!("cannot build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base,
            config,
        })
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Table URL and the schema profile to send with it. A qualified name picks its own
    /// schema; a bare name uses the configured one.
    fn endpoint(&self, table: &str) -> StoreResult<(Url, Option<String>)> {
        let (schema, name) = match table.split_once('.') {
            Some((schema, name)) if !schema.is_empty() && !name.is_empty() => {
                (Some(schema.to_string()), name)
            }
            _ => (self.config.schema.clone(), table),
        };

        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| StoreError::Transport(format!("base url '{}' cannot take a path", self.base)))?
            .pop_if_empty()
            .push(name);
        Ok((url, schema))
    }

    fn request(&self, method: Method, table: &str) -> StoreResult<RequestBuilder> {
        let (url, schema) = self.endpoint(table)?;
        let reads = method == Method::GET || method == Method::HEAD;
        let mut builder = self.client.request(method, url);
        if let Some(schema) = schema {
            let header = if reads { "Accept-Profile" } else { "Content-Profile" };
            builder = builder.header(header, schema);
        }
        Ok(builder)
    }

    async fn rows(response: Response, table: &str) -> StoreResult<Vec<Row>> {
        let response = check(response, table).await?;
        Ok(response.json::<Vec<Row>>().await?)
    }
}

/// Query pair for the equality filter. NULL equality is `is.null`.
pub(crate) fn filter_pair(filter: &Predicate) -> (String, String) {
    let op = match &filter.value {
        Value::Null => "is.null".to_string(),
        value => format!("eq.{}", filter_text(value)),
    };
    (filter.column.clone(), op)
}

pub(crate) fn read_query(filter: Option<&Predicate>, limit: Option<u64>) -> Vec<(String, String)> {
    let mut pairs = vec![("select".to_string(), "*".to_string())];
    pairs.extend(filter.map(filter_pair));
    if let Some(limit) = limit {
        pairs.push(("limit".to_string(), limit.to_string()));
    }
    pairs
}

/// Total from a `Content-Range` header such as `0-24/3573` or `*/0`.
pub(crate) fn parse_content_range(header: &str) -> Option<u64> {
    header.rsplit_once('/')?.1.trim().parse().ok()
}

pub(crate) fn api_error(status: u16, body: &str, table: &str) -> StoreError {
    let parsed: ApiErrorBody = serde_json::from_str(body).unwrap_or_default();
    if parsed.code.as_deref() == Some(NO_ROWS_CODE) {
        return StoreError::NotFound {
            table: table.to_string(),
        };
    }

    let mut message = parsed.message.unwrap_or_else(|| {
        if body.trim().is_empty() {
            StatusCode::from_u16(status)
                .ok()
                .and_then(|s| s.canonical_reason())
                .unwrap_or("request failed")
                .to_string()
        } else {
            body.trim().to_string()
        }
    });
    for extra in [parsed.details, parsed.hint].into_iter().flatten() {
        message.push_str(" (");
        message.push_str(&extra);
        message.push(')');
    }

    StoreError::Api {
        status,
        code: parsed.code,
        message,
    }
}

async fn check(response: Response, table: &str) -> StoreResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(api_error(status.as_u16(), &body, table))
}

#[async_trait]
impl DocumentStore for RestStore {
    fn name(&self) -> &'static str {
        "rest"
    }

    async fn insert(&self, table: &str, values: &Row) -> StoreResult<Vec<Row>> {
        let response = self
            .request(Method::POST, table)?
            .header("Prefer", RETURN_REPRESENTATION)
            .json(values)
            .send()
            .await?;
        Self::rows(response, table).await
    }

    async fn update(&self, table: &str, values: &Row, filter: &Predicate) -> StoreResult<Vec<Row>> {
        let response = self
            .request(Method::PATCH, table)?
            .query(&[filter_pair(filter)])
            .header("Prefer", RETURN_REPRESENTATION)
            .json(values)
            .send()
            .await?;
        Self::rows(response, table).await
    }

    async fn delete(&self, table: &str, filter: &Predicate) -> StoreResult<Vec<Row>> {
        let response = self
            .request(Method::DELETE, table)?
            .query(&[filter_pair(filter)])
            .header("Prefer", RETURN_REPRESENTATION)
            .send()
            .await?;
        Self::rows(response, table).await
    }

    async fn select(
        &self,
        table: &str,
        filter: Option<&Predicate>,
        limit: Option<u64>,
    ) -> StoreResult<Vec<Row>> {
        let response = self
            .request(Method::GET, table)?
            .query(&read_query(filter, limit))
            .send()
            .await?;
        Self::rows(response, table).await
    }

    async fn select_single(&self, table: &str, filter: Option<&Predicate>) -> StoreResult<Row> {
        let response = self
            .request(Method::GET, table)?
            .query(&read_query(filter, Some(1)))
            .header(ACCEPT, SINGLE_OBJECT)
            .send()
            .await?;
        let response = check(response, table).await?;
        Ok(response.json::<Row>().await?)
    }

    async fn count(&self, table: &str, filter: Option<&Predicate>) -> StoreResult<u64> {
        let response = self
            .request(Method::HEAD, table)?
            .query(&read_query(filter, None))
            .header("Prefer", COUNT_EXACT)
            .send()
            .await?;
        let response = check(response, table).await?;

        let range = response
            .headers()
            .get(CONTENT_RANGE)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| StoreError::Decode("count response has no Content-Range".to_string()))?;
        parse_content_range(range)
            .ok_or_else(|| StoreError::Decode(format!("unreadable Content-Range '{}'", range)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_filter_pairs() {
        assert_eq!(
            filter_pair(&Predicate::new("role", json!("admin"))),
            ("role".to_string(), "eq.admin".to_string())
        );
        assert_eq!(
            filter_pair(&Predicate::new("id", json!(42))),
            ("id".to_string(), "eq.42".to_string())
        );
        assert_eq!(
            filter_pair(&Predicate::new("deleted_at", Value::Null)),
            ("deleted_at".to_string(), "is.null".to_string())
        );
    }

    #[test]
    fn test_read_query() {
        let filter = Predicate::new("category_id", json!(5));
        assert_eq!(
            read_query(Some(&filter), Some(5)),
            vec![
                ("select".to_string(), "*".to_string()),
                ("category_id".to_string(), "eq.5".to_string()),
                ("limit".to_string(), "5".to_string()),
            ]
        );
        assert_eq!(read_query(None, None).len(), 1);
    }

    #[test]
    fn test_content_range() {
        assert_eq!(parse_content_range("0-24/3573"), Some(3573));
        assert_eq!(parse_content_range("*/0"), Some(0));
        assert_eq!(parse_content_range("0-9/*"), None);
        assert_eq!(parse_content_range("garbage"), None);
    }

    #[test]
    fn test_no_rows_code_is_not_found() {
        let body = r#"{"code":"PGRST116","details":"The result contains 0 rows","hint":null,"message":"JSON object requested, multiple (or no) rows returned"}"#;
        assert!(api_error(406, body, "users").is_not_found());
    }

    #[test]
    fn test_api_error_keeps_code_and_details() {
        let body = r#"{"code":"23505","details":"Key (email) already exists.","message":"duplicate key value"}"#;
        let err = api_error(409, body, "users");
        assert_eq!(
            err,
            StoreError::Api {
                status: 409,
                code: Some("23505".to_string()),
                message: "duplicate key value (Key (email) already exists.)".to_string(),
            }
        );
    }

    #[test]
    fn test_api_error_without_body() {
        let err = api_error(503, "", "users");
        assert!(matches!(err, StoreError::Api { status: 503, code: None, ref message } if message == "Service Unavailable"));
    }

    #[test]
    fn test_table_name_is_one_encoded_segment() {
        let store = RestStore::new(StoreConfig::new("https://db.example.com/rest/v1", "key")).unwrap();

        let (url, schema) = store.endpoint("users").unwrap();
        assert_eq!(url.as_str(), "https://db.example.com/rest/v1/users");
        assert_eq!(schema, None);

        let (url, _) = store.endpoint("users?select=password_hash&x").unwrap();
        assert_eq!(url.query(), None);
        assert!(url.path().starts_with("/rest/v1/users%3Fselect"));

        let (url, _) = store.endpoint("admin/users").unwrap();
        assert_eq!(url.path_segments().unwrap().count(), 3);
    }

    #[test]
    fn test_qualified_table_sets_schema() {
        let store = RestStore::new(
            StoreConfig::new("https://db.example.com/rest/v1/", "key").schema("app"),
        )
        .unwrap();

        let (url, schema) = store.endpoint("public.shoots").unwrap();
        assert_eq!(url.as_str(), "https://db.example.com/rest/v1/shoots");
        assert_eq!(schema.as_deref(), Some("public"));

        let (_, schema) = store.endpoint("shoots").unwrap();
        assert_eq!(schema.as_deref(), Some("app"));
    }

    #[test]
    fn test_rejects_invalid_config() {
        assert!(RestStore::new(StoreConfig::new("not-a-url", "key")).is_err());
    }
}
