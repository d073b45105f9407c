//! Opaque references to a row's backing data.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// A reference to the data item behind a row.
///
/// The item is borrowed from the host's data source: the cell system only
/// hands it to providers and controls, it never inspects it. Equality is
/// reference identity, so two `CellItem`s are equal only when they point at
/// the same allocation (or are both empty).
#[derive(Clone, Default)]
pub struct CellItem(Option<Arc<dyn Any + Send + Sync>>);

impl CellItem {
    /// Wrap a value in a new shared item.
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self(Some(Arc::new(value)))
    }

    /// Reference an item the data source already shares.
    pub fn from_arc(item: Arc<dyn Any + Send + Sync>) -> Self {
        Self(Some(item))
    }

    /// The empty sentinel, for rows without a backing item.
    pub const fn none() -> Self {
        Self(None)
    }

    #[inline]
    pub fn is_none(&self) -> bool {
        self.0.is_none()
    }

    #[inline]
    pub fn is_some(&self) -> bool {
        self.0.is_some()
    }

    /// Borrow the item as a `T`, if that is its type.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.0.as_deref().and_then(|item| item.downcast_ref::<T>())
    }

    /// The shared item, if any.
    pub fn as_arc(&self) -> Option<&Arc<dyn Any + Send + Sync>> {
        self.0.as_ref()
    }
}

impl PartialEq for CellItem {
    fn eq(&self, other: &Self) -> bool {
        match (&self.0, &other.0) {
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            (None, None) => true,
            _ => false,
        }
    }
}

impl Eq for CellItem {}

impl fmt::Debug for CellItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Some(item) => write!(f, "CellItem({:p})", Arc::as_ptr(item)),
            None => f.write_str("CellItem(None)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equality_is_reference_identity() {
        let a = CellItem::new(5_u32);
        let same = a.clone();
        let equal_value = CellItem::new(5_u32);

        assert_eq!(a, same);
        assert_ne!(a, equal_value);
        assert_eq!(CellItem::none(), CellItem::default());
        assert_ne!(a, CellItem::none());
    }

    #[test]
    fn test_downcast() {
        let item = CellItem::new("row".to_string());
        assert_eq!(item.downcast_ref::<String>().map(String::as_str), Some("row"));
        assert!(item.downcast_ref::<u32>().is_none());
        assert!(CellItem::none().downcast_ref::<String>().is_none());
    }
}
