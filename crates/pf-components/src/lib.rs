//! pf-components: component library for DC power-delivery trees.
//!
//! Provides models for the elements of a power tree:
//! - Sources (ideal voltage with series resistance)
//! - Loads (constant power, constant current, resistive)
//! - Series losses (resistance and/or fixed voltage drop)
//! - Converters (fixed efficiency) and linear regulators
//!
//! Every kind exposes the same five evaluations — initial voltage/current,
//! output voltage, input current, and power/loss — dispatched through the
//! [`Component`] enum, so the solver never matches on kinds itself.
//!
//! # Example
//!
//! ```
//! use pf_components::{Component, Converter, PowerLoad, Source};
//!
//! let src: Component = Source::new("5V rail", 5.0, 0.1).into();
//! let buck: Component = Converter::new("Buck 1.8V", 1.8, 0.87).unwrap().into();
//! let mcu: Component = PowerLoad::new("MCU", 27e-3).into();
//!
//! // a converter's input current reflects its output power and efficiency
//! let ii = buck.input_current(5.0, 1.8, 0.015, None);
//! assert!(ii > 0.0);
//! # let _ = (src, mcu);
//! ```

pub mod common;
pub mod component;
pub mod converter;
pub mod error;
pub mod limits;
pub mod linreg;
pub mod load;
pub mod loss;
pub mod source;

// Re-exports
pub use common::ParamMap;
pub use component::{Component, ComponentKind, PowerLoss};
pub use converter::Converter;
pub use error::{ComponentError, ComponentResult};
pub use limits::Limits;
pub use linreg::LinReg;
pub use load::{CurrentLoad, PhaseLoads, PowerLoad, ResistiveLoad};
pub use loss::Loss;
pub use source::Source;
