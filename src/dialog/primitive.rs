use std::cell::Cell;
use std::rc::Rc;

use tracing::trace;

/// Transition a [`ModalDialog`] notifies hooks about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogLifecycle {
    Show,
    Hide,
}

type Hook = Box<dyn FnMut()>;

/// The show/hide primitive behind the analysis dialog.
///
/// Showing an already visible dialog (or hiding a hidden one) does
/// nothing and does not run hooks.
pub struct ModalDialog {
    id: String,
    visible: bool,
    on_show: Vec<Hook>,
    on_hide: Vec<Hook>,
}

impl ModalDialog {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            visible: false,
            on_show: Vec::new(),
            on_hide: Vec::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub const fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn on(&mut self, lifecycle: DialogLifecycle, hook: impl FnMut() + 'static) -> &mut Self {
        match lifecycle {
            DialogLifecycle::Show => self.on_show.push(Box::new(hook)),
            DialogLifecycle::Hide => self.on_hide.push(Box::new(hook)),
        }
        self
    }

    pub fn show(&mut self) {
        if self.visible {
            return;
        }
        self.visible = true;
        trace!(dialog = %self.id, "show");
        self.on_show.iter_mut().for_each(|hook| hook());
    }

    pub fn hide(&mut self) {
        if !self.visible {
            return;
        }
        self.visible = false;
        trace!(dialog = %self.id, "hide");
        self.on_hide.iter_mut().for_each(|hook| hook());
    }
}

/// Page-wide scroll lock, held while a modal covers the page.
///
/// Clones share the same flag.
#[derive(Debug, Clone, Default)]
pub struct ScrollLock(Rc<Cell<bool>>);

impl ScrollLock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lock(&self) {
        self.0.set(true);
    }

    pub fn unlock(&self) {
        self.0.set(false);
    }

    pub fn is_locked(&self) -> bool {
        self.0.get()
    }
}
