//! Recipe wheel engine: catalog filtering, slice geometry, rendering onto an
//! abstract surface, the spin animation state machine and result resolution.

mod macros;

pub mod catalog;
pub mod config;
pub mod control;
pub mod layout;
pub mod recipe;
pub mod render;
pub mod result;
pub mod source;
pub mod spin;
pub mod wheel;

pub use catalog::{Cuisine, FilterOutcome, RecipeCatalog, TimeBucket};
pub use config::{Language, Settings};
pub use control::{ControlCommand, SOCKET_PATH};
pub use layout::{WheelLayout, WheelSlice};
pub use recipe::{Category, CategoryId, Country, CountryCode, Recipe, RecipeId};
pub use render::{Surface, WheelStyle, render};
pub use result::{CountryNames, Difficulty, Instructions, ResultCard};
pub use source::{CatalogOrigin, load_catalog};
pub use spin::{Easing, RandomSource, RngSource, SpinEngine, SpinError, resolve_index};
pub use wheel::{Frame, LayoutPolicy, SpinOutcome, Wheel};
