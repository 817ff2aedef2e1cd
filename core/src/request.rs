use std::str::FromStr;

use bytes::Bytes;
use http::uri::Authority;
use http::uri::PathAndQuery;
use http::uri::Scheme;
use http::HeaderMap;
use http::HeaderValue;
use http::Method;
use http::Uri;

use crate::Result;

/// Owned description of an outbound request while it is being signed.
///
/// Query pairs are stored exactly as they will appear on the wire: callers
/// push already encoded keys and values.
#[derive(Debug, Clone)]
pub struct SigningRequest {
    /// HTTP method.
    pub method: Method,
    /// HTTP scheme.
    pub scheme: Scheme,
    /// HTTP authority.
    pub authority: Authority,
    /// HTTP path.
    pub path: String,
    /// HTTP query parameters.
    pub query: Vec<(String, String)>,
    /// HTTP headers.
    pub headers: HeaderMap,
}

impl SigningRequest {
    /// Create a request for `/` on `authority`.
    pub fn new(method: Method, scheme: Scheme, authority: &str) -> Result<Self> {
        Ok(SigningRequest {
            method,
            scheme,
            authority: Authority::from_str(authority)?,
            path: "/".to_string(),
            query: Vec::new(),
            headers: HeaderMap::new(),
        })
    }

    /// Get query size.
    #[inline]
    pub fn query_size(&self) -> usize {
        self.query
            .iter()
            .map(|(k, v)| k.len() + v.len())
            .sum::<usize>()
    }

    /// Push a new query pair into query list.
    #[inline]
    pub fn query_push(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.query.push((key.into(), value.into()));
    }

    /// Insert a header, replacing any previous value.
    pub fn header_insert(&mut self, key: http::header::HeaderName, value: &str) -> Result<()> {
        self.headers.insert(key, HeaderValue::from_str(value)?);
        Ok(())
    }

    /// Convert sorted query to string.
    ///
    /// ```shell
    /// [(c, d), (a, b)] => "a=b&c=d"  (sep = "=", join = "&")
    /// ```
    pub fn query_to_string(mut query: Vec<(String, String)>, sep: &str, join: &str) -> String {
        let mut s = String::with_capacity(16);

        // Sort via query name.
        query.sort();

        for (idx, (k, v)) in query.into_iter().enumerate() {
            if idx != 0 {
                s.push_str(join);
            }

            s.push_str(&k);
            s.push_str(sep);
            s.push_str(&v);
        }

        s
    }

    /// Build the full uri of this request.
    pub fn uri(&self) -> Result<Uri> {
        let paq = if self.query.is_empty() {
            self.path.clone()
        } else {
            let mut s = self.path.clone();
            s.reserve(self.query_size() + 2 * self.query.len() + 1);
            s.push('?');
            s.push_str(&Self::query_to_string(self.query.clone(), "=", "&"));
            s
        };

        let uri = Uri::builder()
            .scheme(self.scheme.clone())
            .authority(self.authority.clone())
            .path_and_query(PathAndQuery::from_str(&paq)?)
            .build()?;
        Ok(uri)
    }

    /// Convert into an `http::Request` with an empty body.
    pub fn into_http_request(self) -> Result<http::Request<Bytes>> {
        let uri = self.uri()?;

        let mut req = http::Request::new(Bytes::new());
        *req.method_mut() = self.method;
        *req.uri_mut() = uri;
        *req.headers_mut() = self.headers;
        Ok(req)
    }
}
