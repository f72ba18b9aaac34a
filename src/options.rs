use serde::{Deserialize, Serialize};

/// Conventions passed in for translation, used throughout the various
/// translation components. Serialized alongside stored index definitions, so
/// absent fields deserialize to their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapConventions {
    /// The member name that denotes a document's identity in map
    /// expressions.
    #[serde(default = "default_identity_member_name")]
    pub identity_member_name: String,
    /// The reserved field name identity accesses are rewritten to.
    #[serde(default = "default_internal_field_name")]
    pub internal_field_name: String,
    /// The token the emitted pipeline is rooted in.
    #[serde(default = "default_root_source_token")]
    pub root_source_token: String,
}

impl Default for MapConventions {
    fn default() -> Self {
        MapConventions {
            identity_member_name: default_identity_member_name(),
            internal_field_name: default_internal_field_name(),
            root_source_token: default_root_source_token(),
        }
    }
}

fn default_identity_member_name() -> String {
    "Id".to_string()
}

fn default_internal_field_name() -> String {
    "__document_id".to_string()
}

fn default_root_source_token() -> String {
    "docs".to_string()
}
