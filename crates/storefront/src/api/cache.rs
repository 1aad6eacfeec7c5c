//! Cache types for catalog API responses.

use shopfront_core::{DepartmentId, ProductId};

use super::types::{Category, Department, DepartmentPage, Product};

/// Cache key for read-only catalog lookups.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub enum CacheKey {
    Departments,
    Categories { department: Option<DepartmentId> },
    Department(DepartmentId),
    Product(ProductId),
}

/// Cached value types.
#[derive(Debug, Clone)]
pub enum CacheValue {
    Departments(Vec<Department>),
    Categories(Vec<Category>),
    Department(Box<DepartmentPage>),
    Product(Box<Product>),
}
