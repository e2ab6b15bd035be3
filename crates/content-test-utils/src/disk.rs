//! [`CountingDisk`]: a recording, fault-injecting `DiskIo`.

use content_fs::{DiskIo, Error, LocalDisk, NormalizedPath, Result};
use std::cell::RefCell;
use std::rc::Rc;
use std::time::SystemTime;

/// The mutating operations of [`DiskIo`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiskOp {
    Copy,
    Rename,
    Delete,
    CreateDir,
    CreateFile,
    WriteText,
    SetModified,
}

/// One recorded mutating call. `to` is set for copy and rename.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiskCall {
    pub op: DiskOp,
    pub path: NormalizedPath,
    pub to: Option<NormalizedPath>,
}

#[derive(Debug, Default)]
struct State {
    calls: Vec<DiskCall>,
    /// Operations to fail, each with the number of calls still allowed
    /// through first.
    failing: Vec<(DiskOp, usize)>,
}

/// Wraps [`LocalDisk`], recording every mutating call and failing the
/// operations it is told to fail. Queries pass straight through.
///
/// Clones share state: hand one to the project and keep one to inspect.
#[derive(Debug, Clone, Default)]
pub struct CountingDisk {
    inner: LocalDisk,
    state: Rc<RefCell<State>>,
}

impl CountingDisk {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every later call of `op` fail with an I/O error.
    pub fn fail(&self, op: DiskOp) {
        self.fail_after(op, 0);
    }

    /// Let `passes` calls of `op` through, then fail every later one.
    pub fn fail_after(&self, op: DiskOp, passes: usize) {
        self.state.borrow_mut().failing.push((op, passes));
    }

    pub fn heal(&self) {
        self.state.borrow_mut().failing.clear();
    }

    pub fn calls(&self) -> Vec<DiskCall> {
        self.state.borrow().calls.clone()
    }

    pub fn ops(&self) -> Vec<DiskOp> {
        self.state.borrow().calls.iter().map(|call| call.op).collect()
    }

    pub fn reset(&self) {
        self.state.borrow_mut().calls.clear();
    }

    fn record(&self, op: DiskOp, path: &NormalizedPath, to: Option<&NormalizedPath>) -> Result<()> {
        let mut state = self.state.borrow_mut();
        state.calls.push(DiskCall {
            op,
            path: path.clone(),
            to: to.cloned(),
        });
        let Some((_, passes)) = state.failing.iter_mut().find(|(failing, _)| *failing == op) else {
            return Ok(());
        };
        if *passes > 0 {
            *passes -= 1;
            return Ok(());
        }
        let source = std::io::Error::other(format!("injected {op:?} failure"));
        Err(Error::io(path.to_native(), source))
    }
}

impl DiskIo for CountingDisk {
    fn copy(&self, from: &NormalizedPath, to: &NormalizedPath) -> Result<()> {
        self.record(DiskOp::Copy, from, Some(to))?;
        self.inner.copy(from, to)
    }

    fn rename(&self, from: &NormalizedPath, to: &NormalizedPath) -> Result<()> {
        self.record(DiskOp::Rename, from, Some(to))?;
        self.inner.rename(from, to)
    }

    fn delete(&self, path: &NormalizedPath) -> Result<()> {
        self.record(DiskOp::Delete, path, None)?;
        self.inner.delete(path)
    }

    fn create_dir(&self, path: &NormalizedPath) -> Result<()> {
        self.record(DiskOp::CreateDir, path, None)?;
        self.inner.create_dir(path)
    }

    fn create_file(&self, path: &NormalizedPath) -> Result<()> {
        self.record(DiskOp::CreateFile, path, None)?;
        self.inner.create_file(path)
    }

    fn write_text(&self, path: &NormalizedPath, content: &str) -> Result<()> {
        self.record(DiskOp::WriteText, path, None)?;
        self.inner.write_text(path, content)
    }

    fn exists(&self, path: &NormalizedPath) -> bool {
        self.inner.exists(path)
    }

    fn is_dir(&self, path: &NormalizedPath) -> bool {
        self.inner.is_dir(path)
    }

    fn read_dir(&self, path: &NormalizedPath) -> Result<Vec<NormalizedPath>> {
        self.inner.read_dir(path)
    }

    fn modified(&self, path: &NormalizedPath) -> Result<SystemTime> {
        self.inner.modified(path)
    }

    fn set_modified(&self, path: &NormalizedPath, time: SystemTime) -> Result<()> {
        self.record(DiskOp::SetModified, path, None)?;
        self.inner.set_modified(path, time)
    }
}
