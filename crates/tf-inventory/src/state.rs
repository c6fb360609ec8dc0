//! terraform state document (format v3) and the walk over its ansible resources
//!
//! Only the fields needed to build an inventory are modelled, everything else is ignored.
//! ```json
//! { "modules": [ { "resources": { "<key>": {
//!     "type": "ansible_host",
//!     "primary": { "attributes": { "inventory_hostname": "h1", "groups.#": "0" } } } } } ] }
//! ```
use crate::flatmap::{self, DecodeError, FlatAttributes};
use crate::value::{Mapping, Value};
use serde::Deserialize;
use std::path::Path;

/// Resource type describing one host
pub const HOST_TYPE: &str = "ansible_host";

/// Resource type describing one group
pub const GROUP_TYPE: &str = "ansible_group";

#[derive(Deserialize, Debug)]
pub struct State {
    pub modules: Vec<Module>,
}

#[derive(Deserialize, Debug)]
pub struct Module {
    #[serde(default)]
    pub path: Vec<String>,
    pub resources: indexmap::IndexMap<String, Resource>,
}

#[derive(Deserialize, Debug)]
pub struct Resource {
    #[serde(rename = "type")]
    pub kind: String,
    /// Only read for ansible resources, others may omit it
    #[serde(default)]
    pub primary: Option<Primary>,
}

#[derive(Deserialize, Debug)]
pub struct Primary {
    #[serde(default)]
    pub attributes: FlatAttributes,
}

impl std::str::FromStr for State {
    type Err = LoadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(serde_json::from_str(s)?)
    }
}

impl State {
    pub fn from_reader(reader: impl std::io::Read) -> Result<Self, LoadError> {
        Ok(serde_json::from_reader(std::io::BufReader::new(reader))?)
    }

    pub fn load_file(file_path: &Path) -> Result<Self, LoadError> {
        tracing::info!(path=%file_path.display(), "loading state file");
        let file = std::fs::File::open(file_path)?;
        Self::from_reader(file)
    }

    /// Run `<bin> state pull -input=false` in `dir` and parse its stdout
    pub fn pull(bin: &str, dir: &Path) -> Result<Self, LoadError> {
        tracing::info!(bin, directory=%dir.display(), "pulling state");

        let output = std::process::Command::new(bin)
            .args(["state", "pull", "-input=false"])
            .current_dir(dir)
            .stdin(std::process::Stdio::null())
            .stderr(std::process::Stdio::inherit())
            .output()
            .map_err(|source| LoadError::Spawn {
                bin: bin.to_string(),
                source,
            })?;

        if !output.status.success() {
            return Err(LoadError::CommandFailed {
                bin: bin.to_string(),
                status: output.status,
            });
        }

        Ok(serde_json::from_slice(&output.stdout)?)
    }

    /// All resources of all modules as `(key, resource)`, in document order
    pub fn resources(&self) -> impl Iterator<Item = (&str, &Resource)> {
        self.modules.iter().flat_map(|module| {
            module
                .resources
                .iter()
                .map(|(key, resource)| (key.as_str(), resource))
        })
    }

    /// Decode every ansible resource, one at a time
    ///
    /// Resources of other types are skipped.
    pub fn walk(&self) -> impl Iterator<Item = Result<Entry, WalkError>> + '_ {
        self.resources()
            .filter_map(|(key, resource)| Entry::from_resource(key, resource).transpose())
    }
}

/// Decoded ansible resource
#[derive(Debug, PartialEq)]
pub enum Entry {
    Host(HostEntry),
    Group(GroupEntry),
}

#[derive(derive_new::new, Debug, PartialEq)]
pub struct HostEntry {
    pub name: String,
    pub vars: Mapping,
    pub groups: Vec<Option<Value>>,
}

#[derive(derive_new::new, Debug, PartialEq)]
pub struct GroupEntry {
    pub name: String,
    pub vars: Mapping,
    pub children: Vec<Option<Value>>,
}

impl Entry {
    /// Returns `None` for resources that are not ansible resources
    #[tracing::instrument(level = "trace", skip(resource), fields(kind = %resource.kind))]
    pub fn from_resource(key: &str, resource: &Resource) -> Result<Option<Self>, WalkError> {
        if resource.kind != HOST_TYPE && resource.kind != GROUP_TYPE {
            tracing::debug!(resource = key, kind = %resource.kind, "skipping resource");
            return Ok(None);
        }

        let Some(primary) = &resource.primary else {
            return Err(WalkError::MissingPrimary {
                resource: key.to_string(),
            });
        };
        let attributes = &primary.attributes;

        let decode_error = |source| WalkError::Decode {
            resource: key.to_string(),
            source,
        };

        let entry = if resource.kind == HOST_TYPE {
            Entry::Host(HostEntry::new(
                required(key, attributes, "inventory_hostname")?,
                flatmap::decode_mapping("vars", attributes),
                flatmap::decode_sequence("groups", attributes).map_err(decode_error)?,
            ))
        } else {
            Entry::Group(GroupEntry::new(
                required(key, attributes, "inventory_group_name")?,
                flatmap::decode_mapping("vars", attributes),
                flatmap::decode_sequence("children", attributes).map_err(decode_error)?,
            ))
        };

        tracing::trace!(?entry, "decoded");
        Ok(Some(entry))
    }
}

fn required(resource: &str, attributes: &FlatAttributes, name: &str) -> Result<String, WalkError> {
    attributes
        .get(name)
        .cloned()
        .ok_or_else(|| WalkError::MissingAttribute {
            resource: resource.to_string(),
            attribute: name.to_string(),
        })
}

#[derive(thiserror::Error, Debug)]
pub enum LoadError {
    #[error("IO error")]
    IoError(#[from] std::io::Error),
    #[error("Unable to parse terraform state")]
    Parse(#[from] serde_json::Error),
    #[error("Unable to run `{bin}`")]
    Spawn {
        bin: String,
        #[source]
        source: std::io::Error,
    },
    #[error("`{bin} state pull` failed ({status})")]
    CommandFailed {
        bin: String,
        status: std::process::ExitStatus,
    },
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum WalkError {
    #[error("resource `{resource}` has no primary instance")]
    MissingPrimary { resource: String },
    #[error("resource `{resource}` is missing attribute `{attribute}`")]
    MissingAttribute { resource: String, attribute: String },
    #[error("resource `{resource}` has invalid attributes")]
    Decode {
        resource: String,
        #[source]
        source: DecodeError,
    },
}
