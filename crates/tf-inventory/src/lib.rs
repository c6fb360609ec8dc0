//! # tf-inventory - ansible dynamic inventory from terraform state
//!
//! ## Introduction for developers
//!
//! Read this to understand how `tf-inventory` works internally.
//!
//! ### Terraform state
//!
//! Hosts and groups are declared in terraform as `ansible_host` and `ansible_group` resources.
//! Terraform persists them in its state document ([state::State]) where each resource carries
//! a flat table of string attributes.
//!
//! ```hcl
//! resource "ansible_host" "web" {
//!   inventory_hostname = "web1.example.com"
//!   groups             = ["web"]
//!   vars = {
//!     ansible_user = "admin"
//!   }
//! }
//! ```
//!
//! is stored as
//!
//! | **key**              | **value**          |
//! |----------------------|--------------------|
//! | `inventory_hostname` | `web1.example.com` |
//! | `groups.#`           | `1`                |
//! | `groups.0`           | `web`              |
//! | `vars.%`             | `1`                |
//! | `vars.ansible_user`  | `admin`            |
//!
//! ### Decoding
//!
//! [flatmap] turns these tables back into [value::Value]s: `vars` into a mapping, `groups`
//! and `children` into sequences. Sequences are strict. A missing or garbled count marker or
//! an index outside of the declared length is an error.
//!
//! ### Walking
//!
//! [state::State::walk] visits every resource of every module, skips anything that is not an
//! ansible resource and yields one decoded [state::Entry] at a time.
//!
//! ### Output
//!
//! [inventory::Inventory] collects the entries. Every host ends up in the `all` group.
//! [inventory::Inventory::render] produces the document ansible expects from an inventory
//! script, which in turn gets serialized via [serde].
//!
pub mod flatmap;
pub mod inventory;
pub mod state;
pub mod value;
