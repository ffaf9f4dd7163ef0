//! Rig and attribute addressing.
//!
//! Grammar for attribute references (simple, host-agnostic):
//!   [namespace:]control.attr[.subattr]
//! - An optional namespace prefix ends at the last ':' (namespaces may nest,
//!   e.g. "crowd:hero01:arm_ctrl.twist")
//! - `control` is the controllable node, `attr` the '.'-separated attribute
//!   selector on it
//!   Examples:
//!   "spine_ctrl.rotateX"        -> namespace=None, control="spine_ctrl", attr="rotateX"
//!   "hero:hand_ctrl.spread"     -> namespace="hero", control="hand_ctrl", attr="spread"
//!
//! Pose assets are authored rig-agnostic, so their keys usually carry no
//! namespace; [`AttrRef::local`] strips the namespace a scene rig adds so the
//! two forms can be matched.

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Key naming one rig in the host scene.
///
/// Hosts decide what the key means (the original tool uses the rig's display
/// name); the engine only ever passes it back to the adapter.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RigHandle(pub String);

impl RigHandle {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RigHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RigHandle {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for RigHandle {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Reference to one controllable attribute on one rig control.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AttrRef {
    /// Optional namespace prefix (may contain ':' when namespaces nest)
    pub namespace: Option<String>,
    /// Controllable node carrying the attribute
    pub control: String,
    /// '.'-separated attribute selector on the control
    pub attr: String,
}

impl AttrRef {
    /// Construct an AttrRef from components.
    pub fn new(
        namespace: Option<String>,
        control: impl Into<String>,
        attr: impl Into<String>,
    ) -> Self {
        Self {
            namespace,
            control: control.into(),
            attr: attr.into(),
        }
    }

    /// Parse a reference string according to the grammar described above.
    pub fn parse(s: &str) -> Result<Self, String> {
        if s.is_empty() {
            return Err("empty attribute reference".to_string());
        }
        let (namespace, rest) = match s.rfind(':') {
            Some(idx) => {
                let ns = &s[..idx];
                if ns.split(':').any(|seg| seg.is_empty()) {
                    return Err("invalid attribute reference: empty namespace segment".to_string());
                }
                (Some(ns.to_string()), &s[idx + 1..])
            }
            None => (None, s),
        };
        let (control, attr) = match rest.find('.') {
            Some(idx) => (&rest[..idx], &rest[idx + 1..]),
            None => {
                return Err("invalid attribute reference: missing '.attr' selector".to_string())
            }
        };
        if control.is_empty() {
            return Err("invalid attribute reference: empty control name".to_string());
        }
        if attr.split('.').any(|seg| seg.is_empty()) {
            return Err("invalid attribute reference: empty attribute segment".to_string());
        }
        if s.chars().any(char::is_whitespace) {
            return Err("invalid attribute reference: contains whitespace".to_string());
        }
        Ok(AttrRef {
            namespace,
            control: control.to_string(),
            attr: attr.to_string(),
        })
    }

    /// Return the namespace prefix, if any.
    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    /// Return the control node name.
    pub fn control(&self) -> &str {
        &self.control
    }

    /// Return the attribute selector.
    pub fn attr(&self) -> &str {
        &self.attr
    }

    /// True when the reference carries a namespace prefix.
    pub fn is_namespaced(&self) -> bool {
        self.namespace.is_some()
    }

    /// Leaf attribute name ("tx" for "translate.tx"); what ignore rules
    /// match against.
    pub fn short_name(&self) -> &str {
        self.attr.rsplit('.').next().unwrap_or(self.attr.as_str())
    }

    /// The same reference with the namespace stripped, for matching a scene
    /// attribute against a rig-agnostic pose key.
    pub fn local(&self) -> AttrRef {
        AttrRef {
            namespace: None,
            control: self.control.clone(),
            attr: self.attr.clone(),
        }
    }
}

impl fmt::Display for AttrRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(ns) = &self.namespace {
            write!(f, "{}:{}.{}", ns, self.control, self.attr)
        } else {
            write!(f, "{}.{}", self.control, self.attr)
        }
    }
}

impl FromStr for AttrRef {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AttrRef::parse(s)
    }
}

// Serde support: serialize as string, deserialize from string
impl Serialize for AttrRef {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for AttrRef {
    fn deserialize<D>(deserializer: D) -> Result<AttrRef, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        AttrRef::parse(&s).map_err(de::Error::custom)
    }
}
