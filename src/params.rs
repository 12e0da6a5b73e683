//! Request-scoped parameters.
//!
//! Path parameters are captured by the dispatcher for the one binding that
//! matched and attached to the [`Request`] before the handler runs. Query
//! parameters are never captured up front: they are parsed from the raw query
//! string every time they are asked for.

use crate::request::Request;

/// Named path parameters captured for the matched binding, in pattern order.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct PathParams {
    entries: Vec<(String, String)>,
}

impl PathParams {
    /// Pairs each parameter name with the value captured at the same position.
    pub(crate) fn new(names: &[String], values: Vec<String>) -> Self {
        let entries = names.iter().cloned().zip(values).collect();
        Self { entries }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// The path parameter bound to `key` for this request, if any.
///
/// Absent when the matched pattern has no parameter by that name, or when the
/// request never went through dispatch.
pub fn path_param<'r>(req: &'r Request, key: &str) -> Option<&'r str> {
    req.params()?.get(key)
}

/// Every value of `key` in the request's query string, decoded, in order of
/// appearance. Empty when the key is absent or there is no query string.
pub fn query_param(req: &Request, key: &str) -> Vec<String> {
    let Some(query) = req.query() else {
        return Vec::new();
    };
    url::form_urlencoded::parse(query.as_bytes())
        .filter(|(name, _)| name == key)
        .map(|(_, value)| value.into_owned())
        .collect()
}
