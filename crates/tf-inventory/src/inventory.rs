//! Ansible inventory built from decoded state entries
//!
//! The rendered document follows the ansible dynamic inventory format:
//! ```json
//! {
//!   "all": ["web1", "db1"],
//!   "web": ["web1"],
//!   "db": { "hosts": ["db1"], "vars": { "port": "5432" }, "children": [] },
//!   "_meta": { "hostvars": { "web1": {}, "db1": { "user": "postgres" } } }
//! }
//! ```
//! A group is rendered as a plain host list unless it carries vars or children.
use crate::state::{Entry, GroupEntry, HostEntry, State, WalkError};
use crate::value::{Mapping, Value};

/// Implicit group every host belongs to
pub const ALL_GROUP: &str = "all";

/// Reserved top-level key holding per-host variables
pub const META_KEY: &str = "_meta";

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Group {
    /// Insertion order, may contain duplicates
    pub hosts: Vec<String>,
    pub vars: Mapping,
    pub children: Vec<String>,
}

impl Group {
    fn render(&self) -> Value {
        let hosts = Value::from(self.hosts.clone());
        if self.vars.is_empty() && self.children.is_empty() {
            return hosts;
        }

        let mut object = Mapping::new();
        object.insert("hosts".into(), hosts);
        object.insert("vars".into(), Value::Mapping(self.vars.clone()));
        object.insert("children".into(), Value::from(self.children.clone()));
        Value::Mapping(object)
    }
}

#[derive(Debug)]
pub struct Inventory {
    groups: indexmap::IndexMap<String, Group>,
    hostvars: indexmap::IndexMap<String, Mapping>,
}

impl Default for Inventory {
    fn default() -> Self {
        let mut groups = indexmap::IndexMap::new();
        groups.insert(ALL_GROUP.to_string(), Group::default());

        Self {
            groups,
            hostvars: Default::default(),
        }
    }
}

impl Inventory {
    /// Walk all resources of `state` and collect them
    ///
    /// Aborts on the first resource that fails to decode.
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn from_state(state: &State) -> Result<Self, WalkError> {
        let mut inventory = Self::default();
        for entry in state.walk() {
            inventory.add_entry(entry?);
        }

        tracing::debug!(
            hosts = inventory.hostvars.len(),
            groups = inventory.groups.len(),
            "inventory collected"
        );
        Ok(inventory)
    }

    pub fn add_entry(&mut self, entry: Entry) {
        match entry {
            Entry::Host(HostEntry { name, vars, groups }) => self.add_host(&name, vars, &groups),
            Entry::Group(GroupEntry {
                name,
                vars,
                children,
            }) => self.add_group(&name, vars, &children),
        }
    }

    /// Record a host, its variables and its group memberships
    ///
    /// - variables replace those of an earlier host with the same name
    /// - the host is appended once per entry of `groups`, and to [ALL_GROUP] unless it was named
    /// - empty slots in `groups` are skipped
    /// - membership is never deduplicated, repeated names append repeatedly
    pub fn add_host(&mut self, host: &str, vars: Mapping, groups: &[Option<Value>]) {
        if self.hostvars.insert(host.to_string(), vars).is_some() {
            tracing::debug!(host, "host defined more than once, variables replaced");
        }

        let mut names: Vec<&str> = groups.iter().flatten().filter_map(Value::as_str).collect();

        if !names.contains(&ALL_GROUP) {
            names.push(ALL_GROUP);
        }

        for name in names {
            tracing::trace!(host, group = name, "add host to group");
            self.group_mut(name).hosts.push(host.to_string());
        }
    }

    /// Record vars and children of a group
    ///
    /// A later definition of the same group replaces vars and children, hosts are kept.
    pub fn add_group(&mut self, name: &str, vars: Mapping, children: &[Option<Value>]) {
        let group = self.group_mut(name);
        group.vars = vars;
        group.children = children
            .iter()
            .flatten()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect();
    }

    fn group_mut(&mut self, name: &str) -> &mut Group {
        self.groups.entry(name.to_string()).or_default()
    }

    pub fn group(&self, name: &str) -> Option<&Group> {
        self.groups.get(name)
    }

    pub fn hostvars(&self, host: &str) -> Option<&Mapping> {
        self.hostvars.get(host)
    }

    /// Render the full inventory document
    pub fn render(&self) -> Value {
        let mut document = Mapping::new();

        for (name, group) in &self.groups {
            if name == META_KEY {
                tracing::warn!(group = %name, "group name is reserved, group is not rendered");
                continue;
            }
            document.insert(name.clone(), group.render());
        }

        let hostvars: Mapping = self
            .hostvars
            .iter()
            .map(|(host, vars)| (host.clone(), Value::Mapping(vars.clone())))
            .collect();

        let mut meta = Mapping::new();
        meta.insert("hostvars".into(), Value::Mapping(hostvars));
        document.insert(META_KEY.into(), Value::Mapping(meta));

        Value::Mapping(document)
    }
}
