use once_cell::unsync::OnceCell;
use std::fmt;

/// A named value computed on first access and cached afterwards.
///
/// A failed computation leaves the cell empty, so the next access runs the
/// computation again from scratch. Not thread-safe; each session owns its
/// own cells.
pub struct LazyProperty<T> {
    name: &'static str,
    cell: OnceCell<T>,
}

impl<T> LazyProperty<T> {
    pub fn new(name: &'static str) -> Self {
        Self { name, cell: OnceCell::new() }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Return the cached value, computing it first if necessary.
    pub fn get_or_compute<E>(&self, compute: impl FnOnce() -> Result<T, E>) -> Result<&T, E> {
        self.cell.get_or_try_init(|| {
            tracing::debug!(property = self.name, "Computing lazy property");
            compute()
        })
    }

    pub fn get(&self) -> Option<&T> {
        self.cell.get()
    }

    pub fn is_computed(&self) -> bool {
        self.cell.get().is_some()
    }
}

impl<T> fmt::Debug for LazyProperty<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LazyProperty")
            .field("name", &self.name)
            .field("computed", &self.is_computed())
            .finish()
    }
}
