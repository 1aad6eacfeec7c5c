//! Conversion from raw wire shapes to canonical entities.
//!
//! Entities without a usable identifier cannot be linked to or added to a
//! cart, so list conversions skip them with a warning and single-entity
//! conversions fail with [`ApiError::Malformed`].

use rust_decimal::Decimal;
use shopfront_core::{CategoryId, DepartmentId, Discount, ProductId};

use super::ApiError;
use super::types::{
    Category, Department, DepartmentPage, EntityRef, FilterOptions, Pagination, Product,
    ProductListing,
};
use super::wire::{
    RawCategory, RawDepartment, RawDepartmentDetail, RawFilters, RawImage, RawPagination,
    RawProduct, RawProductListing, RawRef, RawUpload,
};

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_owned())
        .filter(|s| !s.is_empty())
}

fn convert_image(image: RawImage) -> Option<String> {
    let upload = image.image_upload.and_then(|upload| match upload {
        RawUpload::Url(url) => Some(url),
        RawUpload::Record { url } => url,
    });
    non_blank(upload)
        .or_else(|| non_blank(image.image))
        .or_else(|| non_blank(image.image_url))
}

fn convert_ref<Id: From<String>>(raw: RawRef) -> Option<EntityRef<Id>> {
    match raw {
        RawRef::Id(id) => non_blank(Some(id)).map(|id| EntityRef {
            id: Some(Id::from(id)),
            name: None,
        }),
        RawRef::Embedded { id, name } => {
            let id = id.resolve().map(|id| Id::from(id.to_owned()));
            let name = non_blank(name);
            (id.is_some() || name.is_some()).then_some(EntityRef { id, name })
        }
    }
}

/// Convert a raw department.
///
/// # Errors
///
/// Returns [`ApiError::Malformed`] when the department has no ID.
pub fn convert_department(raw: RawDepartment) -> Result<Department, ApiError> {
    let id = raw
        .id
        .resolve()
        .ok_or_else(|| ApiError::Malformed("department without an id".to_string()))?;
    Ok(Department {
        id: DepartmentId::new(id),
        name: non_blank(raw.name).unwrap_or_default(),
        description: non_blank(raw.description),
        image: convert_image(raw.image),
    })
}

/// Convert a raw category.
///
/// # Errors
///
/// Returns [`ApiError::Malformed`] when the category has no ID.
pub fn convert_category(raw: RawCategory) -> Result<Category, ApiError> {
    let id = raw
        .id
        .resolve()
        .ok_or_else(|| ApiError::Malformed("category without an id".to_string()))?;
    Ok(Category {
        id: CategoryId::new(id),
        name: non_blank(raw.name).unwrap_or_default(),
        description: non_blank(raw.description),
        department: raw.department.and_then(convert_ref),
        image: convert_image(raw.image),
    })
}

/// Convert a raw product.
///
/// Missing prices become zero, discounts are clamped into `0..=100`, and a
/// negative stock count is treated as zero.
///
/// # Errors
///
/// Returns [`ApiError::Malformed`] when the product has no ID.
pub fn convert_product(raw: RawProduct) -> Result<Product, ApiError> {
    let id = raw
        .id
        .resolve()
        .ok_or_else(|| ApiError::Malformed("product without an id".to_string()))?;
    Ok(Product {
        id: ProductId::new(id),
        name: non_blank(raw.name).unwrap_or_default(),
        description: non_blank(raw.description).unwrap_or_default(),
        price: raw.price.unwrap_or(Decimal::ZERO).max(Decimal::ZERO),
        discount: raw.discount.map_or(Discount::NONE, Discount::clamped),
        image: convert_image(raw.image),
        department: raw.department.and_then(convert_ref),
        category: raw.category.and_then(convert_ref),
        stock: raw
            .stock
            .map(|stock| u32::try_from(stock.max(0)).unwrap_or(u32::MAX)),
    })
}

/// Convert a list, dropping entries that fail to convert.
pub fn convert_all<R, T>(raw: Vec<R>, convert: fn(R) -> Result<T, ApiError>) -> Vec<T> {
    raw.into_iter()
        .filter_map(|item| match convert(item) {
            Ok(entity) => Some(entity),
            Err(e) => {
                tracing::warn!(error = %e, "Skipping malformed catalog entity");
                None
            }
        })
        .collect()
}

fn convert_pagination(raw: Option<RawPagination>, product_count: usize) -> Pagination {
    let raw = raw.unwrap_or_default();
    let page = raw.page.unwrap_or(1).max(1);
    Pagination {
        page,
        total_pages: raw.total_pages.unwrap_or(page).max(page).max(1),
        total_items: raw
            .total_items
            .unwrap_or_else(|| u64::try_from(product_count).unwrap_or(u64::MAX)),
    }
}

fn convert_filters(raw: Option<RawFilters>) -> FilterOptions {
    let raw = raw.unwrap_or_default();
    FilterOptions {
        departments: convert_all(raw.departments, convert_department),
        categories: convert_all(raw.categories, convert_category),
    }
}

/// Convert a product listing response.
#[must_use]
pub fn convert_listing(raw: RawProductListing) -> ProductListing {
    let products = convert_all(raw.products, convert_product);
    ProductListing {
        pagination: convert_pagination(raw.pagination, products.len()),
        filters: convert_filters(raw.filters),
        products,
    }
}

/// Convert a department detail response.
///
/// # Errors
///
/// Returns [`ApiError::Malformed`] when the department has no ID.
pub fn convert_department_detail(raw: RawDepartmentDetail) -> Result<DepartmentPage, ApiError> {
    let (department, categories) = match raw {
        RawDepartmentDetail::Nested {
            department,
            categories,
        }
        | RawDepartmentDetail::Flat {
            department,
            categories,
        } => (department, categories),
    };
    Ok(DepartmentPage {
        department: convert_department(department)?,
        categories: convert_all(categories, convert_category),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn product(json: &str) -> Product {
        convert_product(serde_json::from_str(json).unwrap()).unwrap()
    }

    #[test]
    fn test_underscore_id_and_id_normalize_identically() {
        let a = product(r#"{"_id":"p1","name":"Lamp","price":10}"#);
        let b = product(r#"{"id":"p1","name":"Lamp","price":10}"#);
        assert_eq!(a, b);
    }

    #[test]
    fn test_image_upload_takes_precedence() {
        let p = product(
            r#"{"_id":"p1","imageUpload":{"url":"/uploads/lamp.jpg"},"image":"/legacy.jpg"}"#,
        );
        assert_eq!(p.image.as_deref(), Some("/uploads/lamp.jpg"));

        let p = product(r#"{"_id":"p1","imageUpload":"/uploads/a.png"}"#);
        assert_eq!(p.image.as_deref(), Some("/uploads/a.png"));

        let p = product(r#"{"_id":"p1","image":"  "}"#);
        assert_eq!(p.image, None);
    }

    #[test]
    fn test_relations_embedded_or_referenced() {
        let p = product(
            r#"{"_id":"p1","department":{"_id":"d1","name":"Home"},"category":"c9"}"#,
        );
        let department = p.department.unwrap();
        assert_eq!(department.id.unwrap().as_str(), "d1");
        assert_eq!(department.name.as_deref(), Some("Home"));
        let category = p.category.unwrap();
        assert_eq!(category.id.unwrap().as_str(), "c9");
        assert_eq!(category.name, None);
    }

    #[test]
    fn test_named_relation_without_id_keeps_name() {
        let p = product(r#"{"_id":"p1","department":{"name":"Office"},"category":{}}"#);
        let department = p.department.unwrap();
        assert_eq!(department.id, None);
        assert_eq!(department.name.as_deref(), Some("Office"));
        assert!(p.category.is_none());
    }

    #[test]
    fn test_product_defaults_and_clamping() {
        let p = product(r#"{"_id":"p1","discount":140,"stock":-4}"#);
        assert_eq!(p.price, Decimal::ZERO);
        assert_eq!(p.discount.percent(), Decimal::ONE_HUNDRED);
        assert_eq!(p.stock, Some(0));
        assert!(!p.in_stock());
    }

    #[test]
    fn test_product_without_id_is_malformed() {
        let raw: RawProduct = serde_json::from_str(r#"{"name":"Ghost"}"#).unwrap();
        assert!(matches!(convert_product(raw), Err(ApiError::Malformed(_))));
    }

    #[test]
    fn test_listing_skips_malformed_and_defaults_pagination() {
        let raw: RawProductListing =
            serde_json::from_str(r#"{"products":[{"_id":"p1"},{"name":"no id"}]}"#).unwrap();
        let listing = convert_listing(raw);
        assert_eq!(listing.products.len(), 1);
        assert_eq!(listing.pagination, Pagination {
            page: 1,
            total_pages: 1,
            total_items: 1,
        });
        assert!(listing.filters.departments.is_empty());
    }

    #[test]
    fn test_listing_pagination_aliases() {
        let raw: RawProductListing = serde_json::from_str(
            r#"{"products":[],"pagination":{"currentPage":2,"totalPages":5,"totalProducts":58}}"#,
        )
        .unwrap();
        let pagination = convert_listing(raw).pagination;
        assert_eq!(pagination.page, 2);
        assert_eq!(pagination.total_pages, 5);
        assert_eq!(pagination.total_items, 58);
        assert!(pagination.has_previous());
        assert!(pagination.has_next());
    }
}
