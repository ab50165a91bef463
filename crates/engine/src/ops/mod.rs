use crate::Repository;

mod balances;
mod expenses;
mod groups;
mod watch;

pub use watch::GroupWatch;

/// Orchestrates writes and reads against a [`Repository`].
///
/// Validation and splitting happen before anything is written. The group's
/// denormalized total is always recomputed from the stored expense set.
#[derive(Debug)]
pub struct Engine<R> {
    repository: R,
}

impl Engine<()> {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder<()> {
        EngineBuilder { repository: () }
    }
}

impl<R: Repository> Engine<R> {
    pub fn repository(&self) -> &R {
        &self.repository
    }
}

/// The builder for `Engine`
#[derive(Debug, Default)]
pub struct EngineBuilder<R> {
    repository: R,
}

impl<R> EngineBuilder<R> {
    /// Pass the required repository
    pub fn repository<T: Repository>(self, repository: T) -> EngineBuilder<T> {
        EngineBuilder { repository }
    }
}

impl<R: Repository> EngineBuilder<R> {
    /// Construct `Engine`
    pub fn build(self) -> Engine<R> {
        Engine {
            repository: self.repository,
        }
    }
}
