use crate::markers::{Marker, MarkerError, MarkerStore};

#[derive(Debug, thiserror::Error)]
pub enum LockError {
    #[error("a sync run is already in progress")]
    AlreadyRunning,
    #[error(transparent)]
    Marker(MarkerError),
}

/// Guards single-instance execution with the `lock` marker.
#[derive(Debug)]
pub struct LockCoordinator<'a> {
    markers: &'a MarkerStore,
}

impl<'a> LockCoordinator<'a> {
    pub fn new(markers: &'a MarkerStore) -> Self {
        LockCoordinator { markers }
    }

    /// Takes the lock without waiting. Fails with `AlreadyRunning` if any
    /// other holder, in this process or another, owns it.
    pub fn acquire(&self) -> Result<LockHandle<'a>, LockError> {
        match self.markers.create_exclusive(Marker::Lock) {
            Ok(()) => {
                tracing::debug!("acquired run lock");
                Ok(LockHandle {
                    markers: self.markers,
                    released: false,
                })
            }
            Err(MarkerError::AlreadyExists(_)) => Err(LockError::AlreadyRunning),
            Err(e) => Err(LockError::Marker(e)),
        }
    }
}

/// A held run lock. Released explicitly with [`LockHandle::release`], or on
/// drop if that never happened.
#[derive(Debug)]
#[must_use = "the lock is released as soon as the handle is dropped"]
pub struct LockHandle<'a> {
    markers: &'a MarkerStore,
    released: bool,
}

impl LockHandle<'_> {
    pub fn release(mut self) -> Result<(), MarkerError> {
        self.released = true;
        self.markers.remove(Marker::Lock)?;
        tracing::debug!("released run lock");
        Ok(())
    }
}

impl Drop for LockHandle<'_> {
    fn drop(&mut self) {
        if !self.released {
            if let Err(error) = self.markers.remove(Marker::Lock) {
                tracing::error!(%error, "failed to release run lock");
            }
        }
    }
}
