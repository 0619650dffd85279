//! # Invoice Design
//!
//! A flat design config (colors, type, logo, layout details) with preset
//! [`Theme`]s, plus a separate choice of one of five [`InvoiceTemplate`]
//! layouts. Both are persisted independently through [`ConfigSlot`]s, so a
//! template change never touches unsaved design edits and vice versa.
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use labelkit::invoice::{InvoiceDesignStore, SampleInvoice, Theme, render_preview};
//! use labelkit::storage::MemoryStore;
//!
//! let mut store = InvoiceDesignStore::open(Arc::new(MemoryStore::new())).unwrap();
//! store.apply_theme(Theme::Elegant);
//! store.design.save().unwrap();
//!
//! let html = render_preview(store.design.current(), *store.template.current(), &SampleInvoice::demo());
//! assert!(html.contains("INV-0042"));
//! ```

pub mod design;
pub mod preview;
pub mod slot;

pub use design::{FontWeight, InvoiceDesignConfig, InvoiceTemplate, LogoPosition, LogoSize, Theme};
pub use preview::{InvoiceLine, Party, SampleInvoice, render_preview};
pub use slot::{ConfigSlot, ResetRequest, SlotState};

use std::sync::Arc;

use crate::error::Result;
use crate::storage::SettingsStore;

pub const DESIGN_KEY: &str = "invoice_design";
pub const TEMPLATE_KEY: &str = "invoice_template";

/// The two persisted invoice slots.
pub struct InvoiceDesignStore {
    pub design: ConfigSlot<InvoiceDesignConfig>,
    pub template: ConfigSlot<InvoiceTemplate>,
}

impl InvoiceDesignStore {
    pub fn open(store: Arc<dyn SettingsStore>) -> Result<Self> {
        Ok(Self {
            design: ConfigSlot::open(store.clone(), DESIGN_KEY)?,
            template: ConfigSlot::open(store, TEMPLATE_KEY)?,
        })
    }

    /// Validate and stage a design edit.
    pub fn edit_design(&mut self, config: InvoiceDesignConfig) -> Result<()> {
        config.validate()?;
        self.design.edit(config);
        Ok(())
    }

    /// Stage a theme's config as an edit, keeping the current logo.
    pub fn apply_theme(&mut self, theme: Theme) {
        let mut config = theme.config();
        config.logo_url = self.design.current().logo_url.clone();
        self.design.edit(config);
    }

    /// Choose and persist a template immediately.
    pub fn choose_template(&mut self, template: InvoiceTemplate) -> Result<()> {
        self.template.edit(template);
        self.template.save()
    }

    /// Preview the current (possibly unsaved) design.
    pub fn preview(&self, sample: &SampleInvoice) -> String {
        render_preview(self.design.current(), *self.template.current(), sample)
    }
}
