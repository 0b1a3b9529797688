//! Request parameters.
//!
//! The service takes every argument as a flat string map, sent as form
//! fields on POST and as the query string on GET.

use std::collections::HashMap;

use reqwest::multipart::Form;

/// Unordered string-to-string request parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Parameters(HashMap<String, String>);

impl Parameters {
    /// Create an empty parameter set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    /// Insert or replace a parameter.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    /// Look up a parameter.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Merge `other` into `self`; keys already present are overwritten.
    pub fn extend(&mut self, other: Parameters) {
        self.0.extend(other.0);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// The underlying map, for use as a query string.
    pub fn as_map(&self) -> &HashMap<String, String> {
        &self.0
    }

    /// Append every parameter to a multipart form as a text field.
    pub(crate) fn append_to(&self, mut form: Form) -> Form {
        for (key, value) in &self.0 {
            form = form.text(key.clone(), value.clone());
        }
        form
    }

    /// Build a multipart form holding only these parameters.
    pub(crate) fn to_form(&self) -> Form {
        self.append_to(Form::new())
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Parameters {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}
