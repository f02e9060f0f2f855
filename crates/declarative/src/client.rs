//! Resource client - CRUD over a wire model's collection endpoint
//!
//! Each call is one request, never retried. Item paths are
//! `<collection>/<id>`; list filters become query parameters.

use crate::error::{Error, Result};
use crate::model::{ConfigField, ConfigModel, WireModel};
use serde::Serialize;
use serde::de::DeserializeOwned;
use srakit::{Method, Transport};

/// Ordered query filter for list calls.
///
/// Keys whose value is empty are kept but never sent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filter {
    entries: Vec<(String, String)>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`Filter::insert`].
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    /// Set a key, replacing an earlier value in place.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Query pairs to send, skipping empty values.
    pub fn pairs(&self) -> Vec<(String, String)> {
        self.entries
            .iter()
            .filter(|(_, v)| !v.is_empty())
            .cloned()
            .collect()
    }

    /// Check if nothing would be sent
    pub fn is_empty(&self) -> bool {
        self.entries.iter().all(|(_, v)| v.is_empty())
    }

    /// Build a filter from known scalar fields of a config model.
    ///
    /// `keys` maps config field names to query keys. Null and unknown
    /// fields produce empty (unsent) values.
    pub fn from_config<C: ConfigModel>(config: &C, keys: &[(&str, &str)]) -> Self {
        let mut filter = Self::new();
        for (field, query_key) in keys {
            let value = match config.field(field) {
                Some(ConfigField::Str(v)) => v.as_known().cloned().unwrap_or_default(),
                Some(ConfigField::Int(v)) => v.as_known().map(i64::to_string).unwrap_or_default(),
                Some(ConfigField::Bool(v)) => {
                    v.as_known().map(bool::to_string).unwrap_or_default()
                }
                Some(ConfigField::StrList(_)) | None => String::new(),
            };
            filter.insert(*query_key, value);
        }
        filter
    }
}

/// Generic CRUD client over a [`Transport`].
#[derive(Clone, Copy)]
pub struct ResourceClient<'a> {
    transport: &'a dyn Transport,
}

impl<'a> ResourceClient<'a> {
    pub fn new(transport: &'a dyn Transport) -> Self {
        Self { transport }
    }

    /// List a collection, applying non-empty filter values.
    pub fn list<W: WireModel>(&self, filter: &Filter) -> Result<Vec<W>> {
        let body = self
            .transport
            .do_request(Method::Get, W::PATH, &filter.pairs(), None)?;
        match body {
            Some(bytes) => decode(W::PATH, &bytes),
            None => Ok(Vec::new()),
        }
    }

    /// Fetch one record. `None` means the server no longer has it.
    pub fn get<W: WireModel>(&self, id: i64) -> Result<Option<W>> {
        self.get_path(&item_path::<W>(id))
    }

    /// Create a record; the server's copy is returned when it sends one.
    pub fn create<W: WireModel>(&self, model: &W) -> Result<Option<W>> {
        self.post_path(W::PATH, model)
    }

    /// Patch a record by the model's id.
    pub fn update<W: WireModel>(&self, model: &W) -> Result<Option<W>> {
        let id = model.id().ok_or_else(|| Error::MissingId {
            resource: W::PATH.to_string(),
        })?;
        let path = item_path::<W>(id);
        let body = encode(&path, model)?;
        let response = self
            .transport
            .do_request(Method::Patch, &path, &[], Some(&body))?;
        response.map(|bytes| decode(&path, &bytes)).transpose()
    }

    /// Delete a record by id.
    pub fn delete<W: WireModel>(&self, id: i64) -> Result<()> {
        self.delete_path(&item_path::<W>(id))
    }

    /// GET an arbitrary path; 404 and empty bodies are `None`.
    pub fn get_path<T: DeserializeOwned>(&self, path: &str) -> Result<Option<T>> {
        match self.transport.do_request(Method::Get, path, &[], None) {
            Ok(Some(bytes)) => decode(path, &bytes).map(Some),
            Ok(None) => Ok(None),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// POST a JSON body to an arbitrary path.
    pub fn post_path<B, T>(&self, path: &str, body: &B) -> Result<Option<T>>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let body = encode(path, body)?;
        let response = self
            .transport
            .do_request(Method::Post, path, &[], Some(&body))?;
        response.map(|bytes| decode(path, &bytes)).transpose()
    }

    /// POST without a body, ignoring any response.
    pub fn post_empty(&self, path: &str) -> Result<()> {
        self.transport.do_request(Method::Post, path, &[], None)?;
        Ok(())
    }

    /// DELETE an arbitrary path.
    pub fn delete_path(&self, path: &str) -> Result<()> {
        self.transport.do_request(Method::Delete, path, &[], None)?;
        Ok(())
    }
}

fn item_path<W: WireModel>(id: i64) -> String {
    format!("{}/{}", W::PATH, id)
}

fn encode<B: Serialize + ?Sized>(path: &str, body: &B) -> Result<Vec<u8>> {
    serde_json::to_vec(body).map_err(|e| Error::Encode {
        path: path.to_string(),
        message: e.to_string(),
    })
}

fn decode<T: DeserializeOwned>(path: &str, bytes: &[u8]) -> Result<T> {
    serde_json::from_slice(bytes).map_err(|e| Error::Decode {
        path: path.to_string(),
        message: e.to_string(),
    })
}
