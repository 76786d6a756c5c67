//! Individual OData request model
//!
//! An [`ODataRequest`] is one logical operation. It renders either as the URL
//! of a direct call ([`ODataRequest::url`]) or as the embedded HTTP message
//! carried inside a `$batch` part ([`ODataRequest::serialize`]).

use crate::utils::encoding::url_encode;
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Default media type for request bodies and accepted responses
pub const APPLICATION_JSON: &str = "application/json";

/// Query option the service uses to pick the response format
const FORMAT_OPTION: &str = "format";

/// Available methods for OData requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    GET,
    POST,
    PATCH,
    PUT,
    DELETE,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::GET => "GET",
            Method::POST => "POST",
            Method::PATCH => "PATCH",
            Method::PUT => "PUT",
            Method::DELETE => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::GET => reqwest::Method::GET,
            Method::POST => reqwest::Method::POST,
            Method::PATCH => reqwest::Method::PATCH,
            Method::PUT => reqwest::Method::PUT,
            Method::DELETE => reqwest::Method::DELETE,
        }
    }
}

/// Ordered query options (`$filter`, `$top`, ...), names stored without `$`
///
/// Insertion order is the order on the wire. Inserting an existing name
/// replaces its value in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryOptions {
    entries: Vec<(String, String)>,
}

impl QueryOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    /// Render as `?$a=1&$b=2`, or an empty string when there are no options
    pub fn to_query_string(&self) -> String {
        let mut query = String::new();
        for (i, (name, value)) in self.iter().enumerate() {
            query.push(if i == 0 { '?' } else { '&' });
            query.push('$');
            query.push_str(name);
            query.push('=');
            query.push_str(&url_encode(value));
        }
        query
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for QueryOptions {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut options = QueryOptions::new();
        for (name, value) in iter {
            options.insert(name, value);
        }
        options
    }
}

impl Serialize for QueryOptions {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, value) in &self.entries {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for QueryOptions {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct OrderedVisitor;

        impl<'de> Visitor<'de> for OrderedVisitor {
            type Value = QueryOptions;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of query option names to values")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<QueryOptions, A::Error> {
                let mut options = QueryOptions::new();
                while let Some((name, value)) = access.next_entry::<String, String>()? {
                    options.insert(name, value);
                }
                Ok(options)
            }
        }

        deserializer.deserialize_map(OrderedVisitor)
    }
}

fn default_media_type() -> String {
    APPLICATION_JSON.to_string()
}

/// A single OData operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ODataRequest {
    pub method: Method,
    /// Resource path relative to the service root, e.g. `CorporateAccountCollection`
    pub path: String,
    #[serde(default, skip_serializing_if = "QueryOptions::is_empty")]
    pub query: QueryOptions,
    /// Label other parts of the same changeset can reference as `$<id>`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(default = "default_media_type")]
    pub content_type: String,
    #[serde(default = "default_media_type")]
    pub accept: String,
}

impl ODataRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: QueryOptions::new(),
            content_id: None,
            body: None,
            content_type: default_media_type(),
            accept: default_media_type(),
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(Method::PATCH, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Add a query option; the name is given without the leading `$`
    pub fn query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.insert(name, value);
        self
    }

    pub fn content_id(mut self, id: impl Into<String>) -> Self {
        self.content_id = Some(id.into());
        self
    }

    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Serialize `value` as the JSON body
    pub fn json_body<T: Serialize>(mut self, value: &T) -> crate::utils::error::Result<Self> {
        self.body = Some(serde_json::to_string(value)?);
        Ok(self)
    }

    pub fn content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = content_type.into();
        self
    }

    pub fn accept(mut self, accept: impl Into<String>) -> Self {
        self.accept = accept.into();
        self
    }

    /// Query options as sent: GETs default to `$format=json` unless a format is set
    fn effective_query(&self) -> std::borrow::Cow<'_, QueryOptions> {
        if self.method == Method::GET && !self.query.contains(FORMAT_OPTION) {
            let mut query = self.query.clone();
            query.insert(FORMAT_OPTION, "json");
            std::borrow::Cow::Owned(query)
        } else {
            std::borrow::Cow::Borrowed(&self.query)
        }
    }

    /// `<path>[?query]`, the request target relative to the service root
    pub fn url(&self) -> String {
        format!("{}{}", self.path, self.effective_query().to_query_string())
    }

    /// Render the embedded HTTP message used inside a batch part
    pub fn serialize(&self) -> String {
        let is_get = self.method == Method::GET;
        let mut request = format!("{} {} HTTP/1.1", self.method, self.url());

        if !is_get {
            request.push_str("\nContent-Type: ");
            request.push_str(&self.content_type);
        }
        if let Some(id) = &self.content_id {
            request.push_str("\nContent-ID: ");
            request.push_str(id);
        }
        if let Some(body) = &self.body {
            request.push_str(&format!("\nContent-Length: {}", body.len()));
        }
        if !is_get {
            request.push_str("\nAccept: ");
            request.push_str(&self.accept);
        }

        match &self.body {
            Some(body) => {
                request.push_str("\n\n");
                request.push_str(body);
            }
            None => request.push('\n'),
        }
        request
    }
}

impl fmt::Display for ODataRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.serialize())
    }
}
