use syncbar_core::{
    markers::{MarkerError, MarkerStore},
    status::{RunStatus, StatusResolver},
    workdir::Workdir,
};

pub mod job;
pub mod pid;
pub mod schedule;
pub mod stop;

/// Everything an invocation needs to find its state on disk. Built once at
/// startup and passed down by reference.
#[derive(Debug, Clone)]
pub struct Context {
    pub workdir: Workdir,
    pub markers: MarkerStore,
}

impl Context {
    pub fn new(workdir: Workdir) -> Self {
        let markers = workdir.marker_store();
        Context { workdir, markers }
    }

    pub fn status(&self) -> Result<RunStatus, MarkerError> {
        StatusResolver::new(&self.markers).resolve()
    }
}
