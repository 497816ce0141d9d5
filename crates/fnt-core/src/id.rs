use lasso::{Spur, ThreadedRodeo};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::sync::LazyLock;

/// Global string interner for server-assigned ids.
static INTERNER: LazyLock<ThreadedRodeo> = LazyLock::new(ThreadedRodeo::default);

macro_rules! interned_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash)]
        pub struct $name(Spur);

        impl $name {
            /// Intern a new string as an id, or return existing if already interned.
            pub fn intern(s: &str) -> Self {
                Self(INTERNER.get_or_intern(s))
            }

            /// Resolve back to a string slice.
            pub fn as_str(&self) -> &'static str {
                INTERNER.resolve(&self.0)
            }

            /// Generate a unique id with a prefix (e.g. `node_1`, `edge_2`).
            pub fn with_prefix(prefix: &str) -> Self {
                use std::sync::atomic::{AtomicU64, Ordering};
                static COUNTER: AtomicU64 = AtomicU64::new(0);
                let n = COUNTER.fetch_add(1, Ordering::Relaxed);
                Self::intern(&format!("{prefix}_{n}"))
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.as_str())
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let s = String::deserialize(deserializer)?;
                Ok(Self::intern(&s))
            }
        }
    };
}

interned_id!(
    /// Identifier of a note node. 4 bytes, Copy, Eq, Hash in O(1).
    NodeId
);

interned_id!(
    /// Identifier of a parent → child edge.
    EdgeId
);

interned_id!(
    /// Identifier of the project a tree belongs to.
    ProjectId
);

/// Bucket key for children lists: either the root level or a real parent node.
///
/// The root bucket is a separate variant, so it can never collide with a
/// node whose id happens to be the string `"root"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParentKey {
    Root,
    Node(NodeId),
}

impl ParentKey {
    pub fn node(self) -> Option<NodeId> {
        match self {
            ParentKey::Root => None,
            ParentKey::Node(id) => Some(id),
        }
    }
}

impl From<Option<NodeId>> for ParentKey {
    fn from(parent: Option<NodeId>) -> Self {
        parent.map_or(ParentKey::Root, ParentKey::Node)
    }
}

impl From<NodeId> for ParentKey {
    fn from(id: NodeId) -> Self {
        ParentKey::Node(id)
    }
}
