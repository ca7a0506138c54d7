//! # Application
//!
//! The host's `app` global, and undo groups opened against it.

use tracing::debug;
use tracing::warn;

use crate::capability::Remote;
use crate::error::Result;
use crate::object::Object;
use crate::object::remote_kind;

remote_kind! {
    /// The host application, the root of its object model.
    Application
}

impl Application {
    pub fn project(&self) -> Result<Object> {
        self.get("project")?.into_object()
    }

    /// Opens an undo group. A native transport hook wins over scripting it.
    pub fn begin_undo_group(&self, name: &str) -> Result<()> {
        let session = self.proxy.session();
        if !session.transport().begin_undo_group(name)? {
            self.call("beginUndoGroup", &[name.into()])?;
        }
        debug!(name, "undo group opened");
        Ok(())
    }

    pub fn end_undo_group(&self) -> Result<()> {
        let session = self.proxy.session();
        if !session.transport().end_undo_group()? {
            self.call("endUndoGroup", &[])?;
        }
        debug!("undo group closed");
        Ok(())
    }

    /// Opens an undo group that closes when the guard goes out of scope.
    pub fn undo_group(&self, name: &str) -> Result<UndoGroup> {
        self.begin_undo_group(name)?;
        Ok(UndoGroup { app: self.clone(), open: true })
    }
}

/// An open undo group. Closed by [`UndoGroup::close`] or on drop.
#[must_use = "the undo group closes as soon as the guard is dropped"]
pub struct UndoGroup {
    app: Application,
    open: bool,
}

impl UndoGroup {
    /// Closes the group, surfacing the error a drop would only log.
    pub fn close(mut self) -> Result<()> {
        self.open = false;
        self.app.end_undo_group()
    }
}

impl Drop for UndoGroup {
    fn drop(&mut self) {
        if !self.open {
            return;
        }
        self.open = false;
        if let Err(e) = self.app.end_undo_group() {
            warn!(error = %e, "failed to close undo group");
        }
    }
}
