//! Raw JSON shapes returned by the backend.
//!
//! Everything here is lenient: optional fields default, IDs may arrive as
//! `_id` or `id`, and relations may be embedded objects or bare ID strings.
//! Nothing outside the `api` module sees these types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Response body that may or may not be wrapped in `{"data": ...}`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum Envelope<T> {
    Wrapped { data: T },
    Bare(T),
}

impl<T> Envelope<T> {
    pub fn into_inner(self) -> T {
        match self {
            Self::Wrapped { data } | Self::Bare(data) => data,
        }
    }
}

/// Error body sent with non-success responses.
#[derive(Debug, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default, alias = "error", alias = "msg")]
    pub message: Option<String>,
}

/// Document identity: `_id` from the database, `id` from serializers.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct RawId {
    #[serde(default, rename = "_id")]
    pub underscore_id: Option<String>,
    #[serde(default)]
    pub id: Option<String>,
}

impl RawId {
    /// The first non-blank identifier, preferring `_id`.
    pub fn resolve(&self) -> Option<&str> {
        [self.underscore_id.as_deref(), self.id.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|s| !s.is_empty())
    }
}

/// A relation: embedded document or bare ID.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawRef {
    Id(String),
    Embedded {
        #[serde(flatten)]
        id: RawId,
        #[serde(default)]
        name: Option<String>,
    },
}

/// An uploaded image: either a URL string or an upload record.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawUpload {
    Url(String),
    Record {
        #[serde(default, alias = "secure_url", alias = "path")]
        url: Option<String>,
    },
}

/// Image fields shared by every catalog entity.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawImage {
    #[serde(default)]
    pub image_upload: Option<RawUpload>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawDepartment {
    #[serde(flatten)]
    pub id: RawId,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(flatten)]
    pub image: RawImage,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawCategory {
    #[serde(flatten)]
    pub id: RawId,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub department: Option<RawRef>,
    #[serde(flatten)]
    pub image: RawImage,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawProduct {
    #[serde(flatten)]
    pub id: RawId,
    #[serde(default, alias = "title")]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub price: Option<Decimal>,
    #[serde(default)]
    pub discount: Option<Decimal>,
    #[serde(default)]
    pub department: Option<RawRef>,
    #[serde(default)]
    pub category: Option<RawRef>,
    #[serde(default)]
    pub stock: Option<i64>,
    #[serde(flatten)]
    pub image: RawImage,
}

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawPagination {
    #[serde(default, alias = "currentPage")]
    pub page: Option<u32>,
    #[serde(default, alias = "pages")]
    pub total_pages: Option<u32>,
    #[serde(default, alias = "total", alias = "totalProducts")]
    pub total_items: Option<u64>,
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct RawFilters {
    #[serde(default)]
    pub departments: Vec<RawDepartment>,
    #[serde(default)]
    pub categories: Vec<RawCategory>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawProductListing {
    #[serde(default)]
    pub products: Vec<RawProduct>,
    #[serde(default)]
    pub pagination: Option<RawPagination>,
    #[serde(default)]
    pub filters: Option<RawFilters>,
}

/// Department detail: either `{department, categories}` or a bare department
/// carrying its own `categories` array.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawDepartmentDetail {
    Nested {
        department: RawDepartment,
        #[serde(default)]
        categories: Vec<RawCategory>,
    },
    Flat {
        #[serde(flatten)]
        department: RawDepartment,
        #[serde(default)]
        categories: Vec<RawCategory>,
    },
}

#[derive(Debug, Deserialize)]
pub struct TokenBody {
    pub token: String,
}

#[derive(Debug, Deserialize)]
pub struct CountBody {
    #[serde(default)]
    pub count: u64,
}

// =============================================================================
// Request Bodies
// =============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddToCartBody<'a> {
    pub product_id: &'a str,
    pub quantity: u32,
}

#[derive(Debug, Serialize)]
pub struct LoginBody<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Serialize)]
pub struct RegisterBody<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub password: &'a str,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_accepts_wrapped_and_bare() {
        let wrapped: Envelope<Vec<u32>> = serde_json::from_str(r#"{"data":[1,2]}"#).unwrap();
        assert_eq!(wrapped.into_inner(), vec![1, 2]);

        let bare: Envelope<Vec<u32>> = serde_json::from_str("[3]").unwrap();
        assert_eq!(bare.into_inner(), vec![3]);
    }

    #[test]
    fn test_raw_id_prefers_underscore_id() {
        let id: RawId = serde_json::from_str(r#"{"_id":"abc","id":"xyz"}"#).unwrap();
        assert_eq!(id.resolve(), Some("abc"));

        let id: RawId = serde_json::from_str(r#"{"_id":"  ","id":"xyz"}"#).unwrap();
        assert_eq!(id.resolve(), Some("xyz"));
    }

    #[test]
    fn test_raw_ref_variants() {
        let r: RawRef = serde_json::from_str(r#""d1""#).unwrap();
        assert!(matches!(r, RawRef::Id(ref id) if id == "d1"));

        let r: RawRef = serde_json::from_str(r#"{"_id":"d1","name":"Garden"}"#).unwrap();
        assert!(matches!(r, RawRef::Embedded { ref name, .. } if name.as_deref() == Some("Garden")));
    }

    #[test]
    fn test_department_detail_shapes() {
        let nested = r#"{"department":{"_id":"d1","name":"Garden"},"categories":[{"_id":"c1","name":"Tools"}]}"#;
        let detail: RawDepartmentDetail = serde_json::from_str(nested).unwrap();
        assert!(matches!(detail, RawDepartmentDetail::Nested { ref categories, .. } if categories.len() == 1));

        let flat = r#"{"_id":"d1","name":"Garden"}"#;
        let detail: RawDepartmentDetail = serde_json::from_str(flat).unwrap();
        assert!(matches!(detail, RawDepartmentDetail::Flat { .. }));
    }
}
