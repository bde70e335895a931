pub mod derive;
pub mod navigation;
pub mod selection;
pub mod transition;
