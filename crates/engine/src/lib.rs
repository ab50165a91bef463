//! Group expense splitting.
//!
//! The crate computes equal splits of shared expenses in integer cents and
//! folds a group's expenses into per-member net balances. Storage is
//! abstracted behind [`Repository`]; [`Engine`] ties the two together.

pub use balances::{GroupBalance, GroupsOverview, aggregate, member_shares, overview};
pub use cache::GroupCache;
pub use error::EngineError;
pub use expenses::{Expense, ExpenseDraft};
pub use groups::Group;
pub use memory::MemoryRepository;
pub use money::MoneyCents;
pub use ops::{Engine, EngineBuilder, GroupWatch};
pub use repository::{Repository, Subscription};
pub use split::{Split, compute_split, split_between};
pub use users::{UNKNOWN_USER, User, UserDirectory, UserId, initials};

mod balances;
mod cache;
mod error;
mod expenses;
mod groups;
mod memory;
mod money;
mod ops;
mod repository;
mod split;
mod users;
mod util;

pub type ResultEngine<T> = Result<T, EngineError>;
