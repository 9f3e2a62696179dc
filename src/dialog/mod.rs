//! The analysis progress dialog.
//!
//! - [`DialogController`] - renders pending/error content and shows/hides
//!   the dialog
//! - [`Document`] - page markup the controller binds to via a [`SurfaceLayout`]
//! - [`ModalDialog`] - show/hide primitive with lifecycle hooks

mod controller;
mod document;
mod primitive;
mod regions;

pub use controller::{ActionBinding, ContentVariant, ControllerState, DialogController};
pub use document::{DialogHandle, Document, ElementKind, SurfaceLayout, SurfaceMarkup};
pub use primitive::{DialogLifecycle, ModalDialog, ScrollLock};
pub use regions::{
    ActionButton, BodyContent, BodyRegion, Listener, ListenerId, ListenerOutcome, TitleRegion,
};
