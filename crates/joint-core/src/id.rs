//! Shape labels.
//!
//! Scene membership never uses these: nodes and edges are tracked by
//! reference identity. A `ShapeId` only names a node to the outside world,
//! in bus payloads and across the JS bridge.

use lasso::{Spur, ThreadedRodeo};
use serde::{Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;
use std::sync::LazyLock;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};

static NAMES: LazyLock<ThreadedRodeo> = LazyLock::new(ThreadedRodeo::default);
static GENERATED: AtomicU64 = AtomicU64::new(0);

/// Interned shape label. `Copy`, hashes and compares for equality by index.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ShapeId(Spur);

impl ShapeId {
    pub fn intern(name: &str) -> Self {
        Self(NAMES.get_or_intern(name))
    }

    /// The id for `name` if it was ever interned.
    pub fn lookup(name: &str) -> Option<Self> {
        NAMES.get(name).map(Self)
    }

    /// A fresh `<kind>_<n>` label.
    pub fn generate(kind: &str) -> Self {
        let n = GENERATED.fetch_add(1, AtomicOrdering::Relaxed);
        Self::intern(&format!("{kind}_{n}"))
    }

    pub fn as_str(&self) -> &'static str {
        NAMES.resolve(&self.0)
    }
}

// By name, so id sets in payloads come out sorted.
impl Ord for ShapeId {
    fn cmp(&self, other: &Self) -> Ordering {
        self.as_str().cmp(other.as_str())
    }
}

impl PartialOrd for ShapeId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Debug for ShapeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ShapeId({:?})", self.as_str())
    }
}

impl fmt::Display for ShapeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ShapeId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn same_name_same_id() {
        let a = ShapeId::intern("start_box");
        assert_eq!(a, ShapeId::intern("start_box"));
        assert_eq!(a.to_string(), "start_box");
    }

    #[test]
    fn lookup_does_not_intern() {
        assert_eq!(ShapeId::lookup("never_interned_anywhere"), None);
        let id = ShapeId::intern("looked_up");
        assert_eq!(ShapeId::lookup("looked_up"), Some(id));
    }

    #[test]
    fn generated_ids_differ() {
        let a = ShapeId::generate("rect");
        let b = ShapeId::generate("rect");
        assert_ne!(a, b);
        assert!(a.as_str().starts_with("rect_"));
    }

    #[test]
    fn sorted_by_name() {
        assert!(ShapeId::intern("alpha") < ShapeId::intern("zeta"));
        assert_eq!(serde_json::to_string(&ShapeId::intern("n1")).unwrap(), r#""n1""#);
    }
}
