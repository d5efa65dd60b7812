//! External picture viewer
//!
//! A viewer is shown while the user decides about a picture and must be
//! gone once the decision is made, whichever way it ends.

use crate::error::{Error, Result};
use std::path::Path;
use std::process::{Child, Command, Stdio};
use tracing::{debug, warn};

/// Something displaying a picture that can later be dismissed
pub trait ViewerHandle {
    fn close(&mut self);
}

/// Opens pictures for display
pub trait Viewer {
    fn open(&self, image: &Path) -> Result<Box<dyn ViewerHandle>>;

    /// Open `image` for the lifetime of the returned session
    ///
    /// A viewer that fails to start is logged and the session carries on
    /// without one.
    fn session(&self, image: &Path) -> ViewerSession {
        match self.open(image) {
            Ok(handle) => ViewerSession {
                handle: Some(handle),
            },
            Err(e) => {
                warn!(error = %e, "Could not display picture");
                ViewerSession { handle: None }
            }
        }
    }
}

/// Scope of a displayed picture; closes the viewer when dropped
pub struct ViewerSession {
    handle: Option<Box<dyn ViewerHandle>>,
}

impl ViewerSession {
    pub fn is_showing(&self) -> bool {
        self.handle.is_some()
    }
}

impl Drop for ViewerSession {
    fn drop(&mut self) {
        if let Some(mut handle) = self.handle.take() {
            handle.close();
        }
    }
}

/// Launches an external program with the picture path as its argument
#[derive(Debug, Clone)]
pub struct ProcessViewer {
    program: String,
}

impl ProcessViewer {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Viewer for ProcessViewer {
    fn open(&self, image: &Path) -> Result<Box<dyn ViewerHandle>> {
        if self.program.is_empty() {
            return Ok(Box::new(NoViewer));
        }

        let child = Command::new(&self.program)
            .arg(image)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| Error::Viewer {
                program: self.program.clone(),
                message: e.to_string(),
            })?;

        debug!(program = %self.program, pid = child.id(), ?image, "Viewer started");
        Ok(Box::new(ChildViewer { child }))
    }
}

struct ChildViewer {
    child: Child,
}

impl ViewerHandle for ChildViewer {
    fn close(&mut self) {
        // The viewer may already have been closed by the user
        if let Err(e) = self.child.kill() {
            debug!(error = %e, "Viewer already exited");
        }
        let _ = self.child.wait();
    }
}

/// Handle used when no viewer program is configured
pub struct NoViewer;

impl ViewerHandle for NoViewer {
    fn close(&mut self) {}
}
