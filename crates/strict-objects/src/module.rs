use std::rc::{Rc, Weak};

/// An analysis scope that creates abstract values. Values keep a non-owning
/// handle to their creator for attribution and the mutation guard.
#[derive(Debug)]
pub struct StrictModule {
    name: String,
    filename: String,
}

pub type ModuleRef = Rc<StrictModule>;
pub type WeakModuleRef = Weak<StrictModule>;

impl StrictModule {
    pub fn new(name: impl Into<String>, filename: impl Into<String>) -> ModuleRef {
        Rc::new(Self {
            name: name.into(),
            filename: filename.into(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }
}
