//! # Labels
//!
//! - [`settings`]: what a label shows and its physical layout
//! - [`compose`]: product + rendered code → HTML label fragment
//! - [`template`]: saved, named label settings with a single default

pub mod compose;
pub mod settings;
pub mod template;

pub use compose::{
    LabelFragment, check_date_format, compose, format_date, format_price, try_format_date,
};
pub use settings::{BorderKind, BorderStyle, LabelSettings};
pub use template::{LabelTemplate, TemplateInput, TemplateStore};
