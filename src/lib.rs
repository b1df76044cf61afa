//! # sovran-collections
//!
//! Runtime-typed arrays, collections, sets, queues and maps.
//!
//! `sovran-collections` stores dynamic [`Value`]s in containers that are each
//! declared with a type descriptor such as `"int"`, `"string"` or a class name
//! like `"Person"`. Every insertion is checked against the declared type, and a
//! rejected value never reaches storage. This is useful when the shape of data
//! is only known at runtime (decoded documents, scripting bridges, plugin
//! payloads) but should still be held to a contract.
//!
//! ## Key Features
//!
//! - **Type-checked**: Values are checked against the declared type before they are stored
//! - **Collection algebra**: `sort`, `filter`, `where_eq`, `map`, `diff`, `intersect`,
//!   `merge` and `unique` return new collections and never touch the receiver
//! - **Queues**: FIFO and double-ended queues with non-failing `offer`/`peek`/`poll`
//! - **Maps**: untyped, key/value typed, and named-parameter maps sharing one interface
//! - **Snapshots**: JSON snapshots that are re-validated when restored
//!
//! ## Usage Examples
//!
//! ### Basic Usage
//!
//! ```rust
//! use sovran_collections::{Collection, CollectionError, Container, SortOrder, Value};
//!
//! fn main() -> Result<(), CollectionError> {
//!     let mut numbers = Collection::with_values("int", [3, 1, 2])?;
//!
//!     // Values of the wrong type are refused
//!     assert!(numbers.add("four").is_err());
//!
//!     // Transformations return new collections
//!     let sorted = numbers.sort(None, SortOrder::Ascending)?;
//!     println!("Sorted: {:?}", sorted.values());
//!     println!("Original: {:?}", numbers.values());
//!
//!     let total = numbers.reduce(0i64, |sum, value| match value {
//!         Value::Int(n) => sum + n,
//!         _ => sum,
//!     });
//!     println!("Total: {}", total);
//!
//!     Ok(())
//! }
//! ```
//!
//! ### Collections of Objects
//!
//! ```rust
//! use sovran_collections::{Collection, CollectionError, Record, SortOrder, Value};
//!
//! fn person(name: &str, age: i64) -> Value {
//!     Record::new("Person")
//!         .with_field("name", name)
//!         .with_field("age", age)
//!         .into_ref()
//!         .into()
//! }
//!
//! fn main() -> Result<(), CollectionError> {
//!     let ada = person("Ada", 36);
//!     let people = Collection::with_values("Person", [ada.clone(), person("Bob", 20)])?;
//!
//!     let by_age = people.sort(Some("age"), SortOrder::Descending)?;
//!     println!("Oldest first: {:?}", by_age.column("name")?);
//!
//!     // diff and intersect compare objects by identity
//!     let others = people.diff(&Collection::with_values("Person", [ada])?)?;
//!     println!("Everyone but Ada: {:?}", others.column("name")?);
//!
//!     Ok(())
//! }
//! ```
//!
//! ### Queues
//!
//! ```rust
//! use sovran_collections::{CollectionError, DoubleEndedQueue, Queue};
//!
//! fn main() -> Result<(), CollectionError> {
//!     let mut jobs = Queue::with_values("string", ["build", "test"])?;
//!     while let Some(job) = jobs.poll() {
//!         println!("Running {}", job);
//!     }
//!
//!     let mut history = DoubleEndedQueue::new("int");
//!     history.add_last(2)?;
//!     history.add_first(1)?;
//!     println!("Newest: {:?}", history.peek_last());
//!
//!     Ok(())
//! }
//! ```
//!
//! ### Error Handling
//!
//! ```rust
//! use sovran_collections::{CollectionError, Container, Key, TypedMap, Value};
//!
//! let mut ages = TypedMap::new("string", "int");
//!
//! match ages.set(Some(Key::Int(5)), Value::Int(1)) {
//!     Ok(()) => println!("Stored"),
//!     Err(CollectionError::InvalidArgument(message)) => println!("Refused: {}", message),
//!     Err(e) => println!("Other error: {}", e),
//! }
//!
//! match ages.set(None, Value::Int(1)) {
//!     Ok(()) => println!("Stored"),
//!     Err(e) => println!("Maps need keys: {}", e),
//! }
//! ```

mod algebra;
mod array;
mod collection;
mod container;
mod deque;
mod entries;
mod error;
mod extract;
mod format;
mod map;
mod named_parameter_map;
mod object;
mod queue;
mod set;
mod snapshot;
mod typed_map;
mod types;
mod value;

pub use algebra::SortOrder;
pub use array::GenericArray;
pub use collection::{Collection, Membership, Plain, TypedCollection};
pub use container::{Container, ContainerIter};
pub use deque::DoubleEndedQueue;
pub use entries::{Entries, Key};
pub use error::CollectionError;
pub use extract::extract;
pub use format::value_to_string;
pub use map::{AssociativeArrayMap, MapInterface};
pub use named_parameter_map::NamedParameterMap;
pub use object::{same_type_name, Object, ObjectRef, Record};
pub use queue::Queue;
pub use set::{Distinct, Set};
pub use snapshot::{ContainerKind, DeclaredType, ObjectRegistry, Restorable};
pub use typed_map::TypedMap;
pub use types::TypeDescriptor;
pub use value::{compare_values, Callable, Resource, Value};
