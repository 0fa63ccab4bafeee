// vmrest-api: Async Rust client for the Cisco Unity Connection CUPI API.
//
// The crate is one generic CRUD mechanism -- session + query + list
// envelope + dirty-tracking entity handle -- instantiated per resource
// type through the `Resource` trait's field-descriptor tables.

mod dispatch;
pub mod error;
pub mod list;
pub mod model;
pub mod query;
pub mod resource;
pub mod session;
pub mod track;
pub mod transport;

pub use error::Error;
pub use list::{ListResult, fetch_all, fetch_list};
pub use model::{
    CallHandler, DistributionList, DistributionListMember, Greeting, GreetingType, Schedule,
    Tenant, User,
};
pub use query::{FilterOp, Query, SortOrder};
pub use resource::{Entity, EntityState, FieldDescriptor, Resource};
pub use session::Session;
pub use track::{ChangeTracker, FieldKind, FieldValue};
pub use transport::{TlsMode, TransportConfig};
