//! List-oriented views.
//!
//! Each view is a [`ListView`] over one [`ListSource`] plus the one-shot
//! actions the screen offers. What a front end shows is read from the view's
//! [`ListState`].

mod list;
mod my_files;
mod nodes;
mod shared_files;

pub use list::{ListSource, ListState, ListView};
pub use my_files::{MyFilesSource, MyFilesView};
pub use nodes::{NodeSource, NodesView};
pub use shared_files::{CatalogSource, SharedFilesView};
